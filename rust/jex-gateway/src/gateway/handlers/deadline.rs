use std::{future::Future, time::Duration};

use crate::gateway::GatewayError;

/// Upper bound on how long a request may spend talking to the bus.
#[derive(Clone, Copy, Debug)]
pub struct RequestDeadline(pub Duration);

impl RequestDeadline {
    /// Run `work`, giving up with [GatewayError::Timeout] once the deadline
    /// passes. Whatever the bus already did is left as it is.
    pub async fn bound<F: Future>(self, work: F) -> Result<F::Output, GatewayError> {
        tokio::time::timeout(self.0, work)
            .await
            .map_err(|_| GatewayError::Timeout(self.0))
    }
}
