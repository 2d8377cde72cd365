use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{HealthResponse, PoolStats, ReadyzChecks, ReadyzResponse};
use crate::AppState;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "unlate-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Ready once the pool can run a trivial query.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyzResponse>) {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .map_err(|e| tracing::warn!(error = %e, "Readiness probe failed"))
        .is_ok();

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = ReadyzResponse {
        status: if database { "ready" } else { "not_ready" },
        checks: ReadyzChecks { database },
        pool: PoolStats {
            size: state.db.size(),
            idle: state.db.num_idle(),
        },
    };

    (status, Json(body))
}
