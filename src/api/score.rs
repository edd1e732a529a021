use actix_web::{HttpResponse, Responder, get, post, web};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::atomic::Ordering;

use super::models::{AppState, ScoreResponse, VerifyScoreRequest, fresh_score};
use super::nonce::pow_error_response;
use crate::score::Score;

/// Current node score.
#[get("/score/")]
pub async fn get_score(state: web::Data<AppState>) -> impl Responder {
    let score = state.score.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ScoreResponse::of(&score))
}

/// Extend the node score by one link. An expired score is restarted first.
#[post("/score/next/")]
pub async fn next_score(state: web::Data<AppState>) -> impl Responder {
    // Snapshot and release the lock before hashing
    let current = {
        let score = state.score.lock().expect("mutex poisoned");
        score.clone()
    };
    let base = if current.expired(Utc::now()) {
        debug!("SCORE - {} expired, starting over", current);
        fresh_score(&state.config)
    } else {
        current
    };

    let coordinator = state.coordinator.clone();
    let outcome = web::block(move || base.next(&coordinator)).await;

    let next = match outcome {
        Ok(Ok(next)) => next,
        Ok(Err(e)) => {
            state.searches_failed.fetch_add(1, Ordering::Relaxed);
            warn!("POST /score/next/ - search failed: {e}");
            return pow_error_response(&e);
        }
        Err(e) => {
            state.searches_failed.fetch_add(1, Ordering::Relaxed);
            warn!("POST /score/next/ - blocking task failed: {e}");
            return HttpResponse::InternalServerError().body("search task failed");
        }
    };
    state.searches_ok.fetch_add(1, Ordering::Relaxed);

    // Keep whichever is best; a concurrent request may have got further
    let mut score = state.score.lock().expect("mutex poisoned");
    if next.value() > score.value() || score.expired(Utc::now()) {
        info!("SCORE - now {}/{} hash={:?}", next.value(), next.strength, next.hash());
        *score = next;
    }
    HttpResponse::Ok().json(ScoreResponse::of(&score))
}

/// Check a score in either text form; only the display form has a `": "` header.
#[post("/score/verify/")]
pub async fn verify_score(body: web::Json<VerifyScoreRequest>) -> impl Responder {
    let text = body.score.trim();
    let parsed = if text.contains(": ") {
        text.parse::<Score>()
    } else {
        Score::parse_text(text)
    };
    match parsed {
        Ok(score) => {
            debug!("POST /score/verify/ - {} links, strength {}", score.value(), score.strength);
            HttpResponse::Ok().json(ScoreResponse::of(&score))
        }
        Err(e) => {
            warn!("POST /score/verify/ - rejected: {e}");
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}
