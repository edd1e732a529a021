use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, info, warn};
use std::sync::atomic::Ordering;
use std::time::Instant;

use super::models::{AppState, NonceRequest, NonceResponse};
use crate::pow::{PowError, Puzzle, strength_of, to_hex};

/// Map a search failure to an HTTP answer.
pub(super) fn pow_error_response(err: &PowError) -> HttpResponse {
    match err {
        PowError::UnsatisfiableStrength { .. } => HttpResponse::BadRequest().body(err.to_string()),
        PowError::NotFound { .. } | PowError::Exhausted { .. } => {
            HttpResponse::UnprocessableEntity().body(err.to_string())
        }
        PowError::DeadlineExceeded(_) => HttpResponse::GatewayTimeout().body(err.to_string()),
        PowError::Spawn(_) | PowError::WorkerPanicked => {
            HttpResponse::InternalServerError().body(err.to_string())
        }
    }
}

/// Find a nonce for an arbitrary prefix and strength.
/// The search runs on the blocking pool, never on the async workers.
#[post("/nonce/")]
pub async fn post_nonce(state: web::Data<AppState>, body: web::Json<NonceRequest>) -> impl Responder {
    let encoding = body.encoding.unwrap_or(state.config.encoding);
    let puzzle = match Puzzle::new(body.prefix.clone(), body.strength) {
        Ok(p) => p.with_encoding(encoding),
        Err(e) => {
            warn!("POST /nonce/ - rejected: {e}");
            return pow_error_response(&e);
        }
    };
    debug!(
        "POST /nonce/ - prefix={:?} strength={} encoding={}",
        puzzle.prefix(),
        puzzle.strength(),
        encoding
    );

    let t0 = Instant::now();
    let coordinator = state.coordinator.clone();
    let outcome = web::block(move || coordinator.run(&puzzle).map(|nonce| (puzzle, nonce))).await;

    match outcome {
        Ok(Ok((puzzle, nonce))) => {
            state.searches_ok.fetch_add(1, Ordering::Relaxed);
            let d = puzzle.digest_encoded(&nonce);
            let elapsed_ms = t0.elapsed().as_millis();
            info!(
                "NONCE strength={} nonce={} in {}ms",
                puzzle.strength(),
                nonce,
                elapsed_ms
            );
            HttpResponse::Ok().json(NonceResponse {
                nonce,
                encoding,
                hash: to_hex(&d),
                strength: strength_of(&d),
                elapsed_ms,
            })
        }
        Ok(Err(e)) => {
            state.searches_failed.fetch_add(1, Ordering::Relaxed);
            warn!("POST /nonce/ - search failed: {e}");
            pow_error_response(&e)
        }
        Err(e) => {
            state.searches_failed.fetch_add(1, Ordering::Relaxed);
            warn!("POST /nonce/ - blocking task failed: {e}");
            HttpResponse::InternalServerError().body("search task failed")
        }
    }
}
