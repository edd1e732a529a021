use actix_web::{HttpResponse, Responder, get, web};
use std::sync::atomic::Ordering;

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let score_value = {
        let score = state.score.lock().expect("mutex poisoned");
        score.value()
    };

    HttpResponse::Ok().json(StatsResponse {
        threads: state.coordinator.threads(),
        deadline_secs: state.coordinator.deadline().map(|d| d.as_secs()),
        max_trials: state.coordinator.max_trials(),
        encoding: state.config.encoding,
        score_strength: state.config.score_strength,
        score_value,
        searches_ok: state.searches_ok.load(Ordering::Relaxed),
        searches_failed: state.searches_failed.load(Ordering::Relaxed),
    })
}
