use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension};
use jex_messaging::{Dispatcher, MessageBus};
use jex_model::check_invocation_id;

use crate::gateway::{handlers::RequestDeadline, GatewayError};

pub async fn stop_handler<B: MessageBus>(
    Extension(dispatcher): Extension<Arc<Dispatcher<B>>>,
    Extension(deadline): Extension<RequestDeadline>,
    Path(invocation_id): Path<String>,
) -> Result<StatusCode, GatewayError> {
    debug!("Invoking stop handler for {}...", invocation_id);

    check_invocation_id(&invocation_id)?;

    deadline.bound(dispatcher.stop(&invocation_id)).await??;

    Ok(StatusCode::OK)
}
