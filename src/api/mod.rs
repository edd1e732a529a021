mod health;
pub mod models;
mod nonce;
mod score;
mod stats;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(nonce::post_nonce)
            .service(score::get_score)
            .service(score::next_score)
            .service(score::verify_score)
            .service(stats::get_stats),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pow::{digest, strength_of};
    use crate::score::DEFAULT_INVOICE;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn state(strength: u32) -> web::Data<AppState> {
        web::Data::new(AppState::new(Config {
            score_strength: strength,
            threads: Some(2),
            ..Config::default()
        }))
    }

    #[actix_web::test]
    async fn health_is_up() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn nonce_meets_requested_strength() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/nonce/")
            .set_json(json!({ "prefix": "abc", "strength": 3 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let nonce = body["nonce"].as_str().unwrap();
        assert_eq!(body["encoding"], "hex");
        assert!(body["strength"].as_u64().unwrap() >= 3);
        let d = digest(format!("abc {nonce}").as_bytes());
        assert!(strength_of(&d) >= 3);
        assert_eq!(body["hash"].as_str().unwrap(), hex::encode(d));
    }

    #[actix_web::test]
    async fn nonce_rejects_unsatisfiable_strength() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/nonce/")
            .set_json(json!({ "prefix": "abc", "strength": 65 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn nonce_reports_exhausted_trial_cap() {
        let data = web::Data::new(AppState::new(Config {
            threads: Some(2),
            max_trials: Some(100),
            ..Config::default()
        }));
        let app = test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/nonce/")
            .set_json(json!({ "prefix": "abc", "strength": 64 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(data.searches_failed.load(Ordering::Relaxed), 1);
    }

    #[actix_web::test]
    async fn nonce_times_out_at_deadline() {
        let data = web::Data::new(AppState::new(Config {
            threads: Some(2),
            deadline: Duration::from_millis(200),
            ..Config::default()
        }));
        let app = test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/nonce/")
            .set_json(json!({ "prefix": "abc", "strength": 64 }))
            .to_request();
        let resp = actix_web::rt::time::timeout(Duration::from_secs(10), test::call_service(&app, req))
            .await
            .expect("search must stop at the deadline");
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(data.searches_failed.load(Ordering::Relaxed), 1);
    }

    #[actix_web::test]
    async fn score_grows_by_one_link() {
        let data = state(1);
        let app = test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/score/").to_request();
        let before: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(before["value"], 0);

        for expected in 1..=2 {
            let req = test::TestRequest::post().uri("/api/v1/score/next/").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["value"], expected);
            assert_eq!(body["valid"], true);
        }

        let req = test::TestRequest::get().uri("/api/v1/stats/").to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["score_value"], 2);
        assert_eq!(stats["searches_ok"], 2);
        assert_eq!(stats["threads"], 2);
    }

    #[actix_web::test]
    async fn verifies_score_text() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let good = format!("2 596fce23 localhost 1bb {DEFAULT_INVOICE} 2ab 123 df");
        let req = test::TestRequest::post()
            .uri("/api/v1/score/verify/")
            .set_json(json!({ "score": good }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["value"], 3);
        assert_eq!(body["expired"], true);

        let req = test::TestRequest::post()
            .uri("/api/v1/score/verify/")
            .set_json(json!({ "score": "garbage" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn verify_names_the_bad_compact_field() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let bad_time = format!("2 zz localhost 1bb {DEFAULT_INVOICE} 2ab");
        let req = test::TestRequest::post()
            .uri("/api/v1/score/verify/")
            .set_json(json!({ "score": bad_time }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        let message = String::from_utf8_lossy(&body);
        assert!(message.contains("invalid time"), "{message}");

        let req = test::TestRequest::post()
            .uri("/api/v1/score/verify/")
            .set_json(json!({ "score": "2/1: yesterday localhost 443 inv 2ab" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("invalid time"));
    }
}
