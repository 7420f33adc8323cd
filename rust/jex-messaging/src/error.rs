use thiserror::Error;

use crate::BusError;

/// The bus refused to provision one of an invocation's control queues.
#[derive(Error, Debug)]
#[error("Could not provision control queues for invocation {invocation_id}: {source}")]
pub struct TopologyError {
    /// The invocation being provisioned
    pub invocation_id: String,
    /// The declaration failure
    pub source: BusError,
}

/// A message could not be handed to the bus.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The message could not be serialized
    #[error("Could not encode message for {routing_key}: {source}")]
    Encode {
        /// Where the message was headed
        routing_key: String,
        /// The serialization failure
        source: serde_json::Error,
    },

    /// The bus rejected the message or failed to confirm it
    #[error("Message for {routing_key} was not accepted: {source}")]
    Bus {
        /// Where the message was headed
        routing_key: String,
        /// The bus failure
        source: BusError,
    },
}

/// Everything that can go wrong while launching a job.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Control queues could not be provisioned; nothing was published
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// The launch message was not published; control queues may exist
    #[error(transparent)]
    Publish(#[from] PublishError),
}
