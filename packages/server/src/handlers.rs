//! HTTP handler functions for the quarter map API.

use actix_web::{HttpResponse, web};
use quarter_map_pipeline::stats::batch_stats;
use quarter_map_server_models::{
    ApiHealth, ApiLoadResult, ApiQuarters, ApiSourceInfo, ApiStats, ApiVisibility,
    LoadQueryParams, batch_to_feature_collection,
};
use quarter_map_source::registry;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/sources`
///
/// Lists all registered quarter data sources.
pub async fn sources() -> HttpResponse {
    let sources: Vec<ApiSourceInfo> = registry::all_sources().iter().map(Into::into).collect();
    HttpResponse::Ok().json(sources)
}

/// `POST /api/sources/{id}/load`
///
/// Fetches and normalizes a source, stores the batch in the session,
/// and returns counts and statistics. A batch with zero surviving
/// quarters is stored as-is and flagged with a warning for the caller
/// to surface.
pub async fn load(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<LoadQueryParams>,
) -> HttpResponse {
    let id = path.into_inner();

    let Some(source) = registry::find_source(&id) else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Unknown source: {id}")
        }));
    };

    match quarter_map_source::load_source(&state.client, &source, params.limit).await {
        Ok(batch) => {
            let warning = batch.is_empty().then(|| {
                "No quarters survived normalization; check the source's coordinate format"
                    .to_owned()
            });

            let result = ApiLoadResult {
                source_id: source.id.clone(),
                counts: batch.counts.into(),
                stats: batch_stats(&batch.features).into(),
                bbox: batch.bounding_rect(),
                warning,
            };

            let mut session = state.session.write().await;
            session.source = Some(source);
            session.batch = Some(batch);

            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::error!("Failed to load source {id}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to load source"
            }))
        }
    }
}

/// `GET /api/quarters`
///
/// Returns the loaded quarters as a `GeoJSON` `FeatureCollection`
/// together with the layer-visibility flag.
pub async fn quarters(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session.read().await;

    let Some(batch) = session.batch.as_ref() else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": "No dataset loaded"
        }));
    };

    HttpResponse::Ok().json(ApiQuarters {
        visible: session.visible,
        bbox: batch.bounding_rect(),
        quarters: batch_to_feature_collection(batch),
    })
}

/// `GET /api/stats`
///
/// Returns aggregates over the loaded batch.
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session.read().await;

    let Some(batch) = session.batch.as_ref() else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": "No dataset loaded"
        }));
    };

    HttpResponse::Ok().json(ApiStats::from(batch_stats(&batch.features)))
}

/// `POST /api/clear`
///
/// Drops the loaded batch and selected source from the session.
pub async fn clear(state: web::Data<AppState>) -> HttpResponse {
    let mut session = state.session.write().await;
    session.source = None;
    session.batch = None;

    HttpResponse::Ok().json(serde_json::json!({ "cleared": true }))
}

/// `POST /api/visibility`
///
/// Sets the layer-visibility flag.
pub async fn visibility(
    state: web::Data<AppState>,
    body: web::Json<ApiVisibility>,
) -> HttpResponse {
    let mut session = state.session.write().await;
    session.visible = body.visible;

    HttpResponse::Ok().json(*body)
}
