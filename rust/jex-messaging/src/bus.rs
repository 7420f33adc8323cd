use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a [MessageBus] implementation.
#[derive(Error, Debug)]
pub enum BusError {
    /// The bus could not be reached, or the connection was lost
    #[error("Message bus connection failed: {0}")]
    Connection(String),

    /// The bus refused to declare or bind a queue
    #[error("Could not declare queue {queue}: {reason}")]
    Declare {
        /// The queue being declared
        queue: String,
        /// What the bus reported
        reason: String,
    },

    /// The bus refused or did not confirm a published message
    #[error("Could not publish to {routing_key}: {reason}")]
    Publish {
        /// The routing key the message was addressed to
        routing_key: String,
        /// What the bus reported
        reason: String,
    },

    /// The bus could not answer a query about a queue
    #[error("Could not inspect queue {queue}: {reason}")]
    Inspect {
        /// The queue being inspected
        queue: String,
        /// What the bus reported
        reason: String,
    },
}

/// The slice of a topic-exchange message bus that the gateway relies on. All
/// operations address the single shared exchange the bus was opened against.
///
/// Implementations are cheap to clone and safe to share across concurrently
/// running requests.
#[async_trait]
pub trait MessageBus: Clone + Send + Sync + 'static {
    /// Name of the exchange messages are published to
    fn exchange(&self) -> &str;

    /// Ensure a durable queue named `queue` exists and is bound to
    /// `routing_key`. Declaring a queue that already exists with the same
    /// binding is a no-op.
    async fn declare_queue(&self, queue: &str, routing_key: &str) -> Result<(), BusError>;

    /// Publish a persistent message, resolving once the bus has accepted it.
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), BusError>;

    /// Whether a queue named `queue` currently exists.
    async fn queue_exists(&self, queue: &str) -> Result<bool, BusError>;
}
