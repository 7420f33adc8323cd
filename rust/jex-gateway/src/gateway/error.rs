use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jex_messaging::{DispatchError, PublishError, TopologyError};
use jex_model::ModelError;
use serde_json::json;
use thiserror::Error;

/// Everything a dispatch request can fail with. Client mistakes are reported
/// back in detail; infrastructure failures are logged and reported only as a
/// generic server error.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The submitted job was malformed or incomplete
    #[error(transparent)]
    Validation(#[from] ModelError),

    /// The preview request was not a parameter list
    #[error("Malformed preview request: {0}")]
    Render(serde_json::Error),

    /// Control queues could not be provisioned
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// A message could not be published
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// The bus did not finish within the request deadline
    #[error("Dispatch did not complete within {0:?}")]
    Timeout(Duration),
}

impl From<DispatchError> for GatewayError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::Topology(error) => GatewayError::Topology(error),
            DispatchError::Publish(error) => GatewayError::Publish(error),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::Validation(_) | GatewayError::Render(_) => {
                warn!("Rejected request: {}", self);
                let body = Json(json!({
                    "error": self.to_string(),
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            _ => {
                error!("Internal server error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
