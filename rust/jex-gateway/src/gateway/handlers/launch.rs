use std::sync::Arc;

use axum::{body::Bytes, http::StatusCode, Extension};
use jex_messaging::{Dispatcher, MessageBus};
use jex_model::{Job, SubmissionSettings};

use crate::gateway::{handlers::RequestDeadline, GatewayError};

pub async fn launch_handler<B: MessageBus>(
    Extension(dispatcher): Extension<Arc<Dispatcher<B>>>,
    Extension(settings): Extension<Arc<SubmissionSettings>>,
    Extension(deadline): Extension<RequestDeadline>,
    body: Bytes,
) -> Result<StatusCode, GatewayError> {
    debug!("Invoking launch handler...");

    let job = Job::from_submission(&body, &settings)?;

    deadline.bound(dispatcher.launch(&job)).await??;

    Ok(StatusCode::OK)
}
