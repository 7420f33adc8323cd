use axum::{body::Bytes, Json};

use crate::gateway::{GatewayError, Previewer, PreviewerReturn};

pub async fn preview_handler(body: Bytes) -> Result<Json<PreviewerReturn>, GatewayError> {
    let previewer: Previewer = serde_json::from_slice(&body).map_err(GatewayError::Render)?;

    Ok(Json(PreviewerReturn {
        params: previewer.params.render(),
    }))
}
