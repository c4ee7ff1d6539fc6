use crate::api::error::{ApiError, Result as ApiResult};

use bx_stream::AppState;

use axum::{Json, extract::State};

/// GET /api/v1/getblockcount - latest known block height
pub async fn get_block_count(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    let height = state.live.height.snapshot();

    // Version 0 means neither the bootstrap nor a height event has landed
    if height.version == 0 {
        return Err(ApiError::unavailable("block height not known yet"));
    }

    Ok(Json(height.value))
}
