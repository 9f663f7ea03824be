use crate::core::{Matcher, ReviewSource, SentimentBackend};
use crate::models::{
    CuratedFeedRequest, ErrorResponse, FeedResponse, HealthResponse, RankRequest,
    SimilarityQuery, SimilarityResponse,
};
use crate::services::{SupabaseClient, SupabaseError};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseClient>,
    pub reviews: Arc<dyn ReviewSource>,
    pub sentiment: Arc<dyn SentimentBackend>,
    pub matcher: Matcher,
    pub max_limit: u16,
}

/// Configure all feed-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/feed/for-you", web::post().to(for_you))
        .route("/feed/rank", web::post().to(rank_all))
        .route("/feed/similarity", web::get().to(similarity));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn profile_error(dog_id: &str, e: SupabaseError) -> HttpResponse {
    tracing::error!("Failed to fetch profile for {}: {}", dog_id, e);
    match e {
        SupabaseError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Dog not found".to_string(),
            message: e.to_string(),
            status_code: 404,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Failed to fetch dog profile".to_string(),
            message: e.to_string(),
            status_code: 500,
        }),
    }
}

/// Curated "for you" feed endpoint
///
/// POST /api/v1/feed/for-you
///
/// Request body:
/// ```json
/// {
///   "dogId": "string",
///   "limit": 20
/// }
/// ```
///
/// Candidates are restricted to the reference dog's state and filtered to
/// those at or above the compatibility threshold.
async fn for_you(
    state: web::Data<AppState>,
    req: web::Json<CuratedFeedRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let limit = req.limit.min(state.max_limit) as usize;

    tracing::info!("Building curated feed for dog: {}, limit: {}", req.dog_id, limit);

    let reference = match state.supabase.get_dog(&req.dog_id).await {
        Ok(dog) => dog,
        Err(e) => return profile_error(&req.dog_id, e),
    };

    // The state filter is pushed into the store query; the ranker applies
    // the same gate over whatever comes back
    let candidates = match state.supabase.list_dogs_by_state(&reference.state).await {
        Ok(dogs) => dogs,
        Err(e) => {
            tracing::error!("Failed to list candidates for {}: {}", req.dog_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to query candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let result = state
        .matcher
        .curated_feed(
            &reference,
            candidates,
            state.reviews.as_ref(),
            state.sentiment.as_ref(),
            limit,
        )
        .await;

    tracing::info!(
        "Returning {} curated results for dog {} (from {} candidates)",
        result.results.len(),
        req.dog_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(FeedResponse {
        results: result.results,
        total_candidates: result.total_candidates,
    })
}

/// Generic ranking endpoint
///
/// POST /api/v1/feed/rank
///
/// Ranks the full listing against the reference dog with no region gate and
/// no threshold filter; callers keep the top `limit` results.
async fn rank_all(state: web::Data<AppState>, req: web::Json<RankRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let limit = req.limit.min(state.max_limit) as usize;

    let reference = match state.supabase.get_dog(&req.dog_id).await {
        Ok(dog) => dog,
        Err(e) => return profile_error(&req.dog_id, e),
    };

    let mut candidates = match state.supabase.list_dogs().await {
        Ok(dogs) => dogs,
        Err(e) => {
            tracing::error!("Failed to list candidates for {}: {}", req.dog_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to query candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if !req.exclude_dog_ids.is_empty() {
        candidates.retain(|c| !req.exclude_dog_ids.contains(&c.dog_id));
    }

    let result = state
        .matcher
        .rank(
            &reference,
            candidates,
            state.reviews.as_ref(),
            state.sentiment.as_ref(),
            limit,
        )
        .await;

    HttpResponse::Ok().json(FeedResponse {
        results: result.results,
        total_candidates: result.total_candidates,
    })
}

/// Display-only trait similarity for one pair
///
/// GET /api/v1/feed/similarity?dogId={id}&otherDogId={id}
///
/// Skips sentiment enrichment entirely; used for quick per-card display.
async fn similarity(
    state: web::Data<AppState>,
    query: web::Query<SimilarityQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let reference = match state.supabase.get_dog(&query.dog_id).await {
        Ok(dog) => dog,
        Err(e) => return profile_error(&query.dog_id, e),
    };

    let other = match state.supabase.get_dog(&query.other_dog_id).await {
        Ok(dog) => dog,
        Err(e) => return profile_error(&query.other_dog_id, e),
    };

    let cosine = state.matcher.similarity_only(&reference, &other);

    HttpResponse::Ok().json(SimilarityResponse {
        dog_id: query.dog_id.clone(),
        other_dog_id: query.other_dog_id.clone(),
        cosine_similarity: cosine,
    })
}
