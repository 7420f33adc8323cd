use async_trait::async_trait;
use std::{
    collections::{BTreeMap, VecDeque},
    sync::Arc,
};
use tokio::sync::Mutex;

use crate::{BusError, MessageBus};

/// A message as it was handed to the bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// The routing key it was published with
    pub routing_key: String,
    /// The raw message body
    pub payload: Vec<u8>,
}

/// A bus operation, recorded in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusOperation {
    /// A queue was declared and bound
    Declare {
        /// Queue name
        queue: String,
        /// Routing key it was bound to
        routing_key: String,
    },
    /// A message was published
    Publish {
        /// Routing key of the message
        routing_key: String,
    },
}

#[derive(Debug, Default)]
struct MemoryQueue {
    bindings: Vec<String>,
    messages: VecDeque<Delivery>,
}

#[derive(Debug, Default)]
struct MemoryBusState {
    queues: BTreeMap<String, MemoryQueue>,
    published: Vec<Delivery>,
    operations: Vec<BusOperation>,
    fail_declarations: bool,
    fail_publishes: bool,
}

/// A memory-backed [MessageBus] with topic-exchange routing.
///
/// Useful for running the gateway without a broker, and for testing. Every
/// operation is recorded, and failures can be switched on to exercise error
/// paths.
#[derive(Clone, Debug)]
pub struct MemoryBus {
    exchange: String,
    state: Arc<Mutex<MemoryBusState>>,
}

impl MemoryBus {
    /// A bus with no queues, routing through `exchange`.
    pub fn new(exchange: &str) -> Self {
        MemoryBus {
            exchange: exchange.to_string(),
            state: Default::default(),
        }
    }

    /// Make every subsequent queue declaration fail (or stop failing).
    pub async fn fail_declarations(&self, fail: bool) {
        self.state.lock().await.fail_declarations = fail;
    }

    /// Make every subsequent publish fail (or stop failing).
    pub async fn fail_publishes(&self, fail: bool) {
        self.state.lock().await.fail_publishes = fail;
    }

    /// Names of all declared queues, sorted.
    pub async fn queue_names(&self) -> Vec<String> {
        self.state.lock().await.queues.keys().cloned().collect()
    }

    /// Routing keys `queue` is bound to; empty if it does not exist.
    pub async fn queue_bindings(&self, queue: &str) -> Vec<String> {
        self.state
            .lock()
            .await
            .queues
            .get(queue)
            .map(|queue| queue.bindings.clone())
            .unwrap_or_default()
    }

    /// Every message accepted by the bus, in publish order.
    pub async fn published(&self) -> Vec<Delivery> {
        self.state.lock().await.published.clone()
    }

    /// Accepted messages that were published with exactly `routing_key`.
    pub async fn published_to(&self, routing_key: &str) -> Vec<Delivery> {
        self.published()
            .await
            .into_iter()
            .filter(|delivery| delivery.routing_key == routing_key)
            .collect()
    }

    /// Every successful declare and publish, in the order they happened.
    pub async fn operations(&self) -> Vec<BusOperation> {
        self.state.lock().await.operations.clone()
    }

    /// Remove and return all messages waiting in `queue`, the way a consumer
    /// acknowledging everything would.
    pub async fn consume(&self, queue: &str) -> Vec<Delivery> {
        self.state
            .lock()
            .await
            .queues
            .get_mut(queue)
            .map(|queue| queue.messages.drain(..).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MessageBus for MemoryBus {
    fn exchange(&self) -> &str {
        &self.exchange
    }

    async fn declare_queue(&self, queue: &str, routing_key: &str) -> Result<(), BusError> {
        let mut state = self.state.lock().await;

        if state.fail_declarations {
            return Err(BusError::Declare {
                queue: queue.to_string(),
                reason: "declarations are switched off".into(),
            });
        }

        let entry = state.queues.entry(queue.to_string()).or_default();
        if !entry.bindings.iter().any(|binding| binding == routing_key) {
            entry.bindings.push(routing_key.to_string());
        }

        state.operations.push(BusOperation::Declare {
            queue: queue.to_string(),
            routing_key: routing_key.to_string(),
        });

        Ok(())
    }

    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), BusError> {
        let mut state = self.state.lock().await;

        if state.fail_publishes {
            return Err(BusError::Publish {
                routing_key: routing_key.to_string(),
                reason: "publishing is switched off".into(),
            });
        }

        let delivery = Delivery {
            routing_key: routing_key.to_string(),
            payload: payload.to_vec(),
        };

        for queue in state.queues.values_mut() {
            if queue
                .bindings
                .iter()
                .any(|pattern| topic_matches(pattern, routing_key))
            {
                queue.messages.push_back(delivery.clone());
            }
        }

        state.published.push(delivery);
        state.operations.push(BusOperation::Publish {
            routing_key: routing_key.to_string(),
        });

        Ok(())
    }

    async fn queue_exists(&self, queue: &str) -> Result<bool, BusError> {
        Ok(self.state.lock().await.queues.contains_key(queue))
    }
}

/// Topic-exchange matching: `*` stands for exactly one dot-separated word and
/// `#` for zero or more.
pub fn topic_matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = routing_key.split('.').collect();

    words_match(&pattern, &key)
}

fn words_match(pattern: &[&str], key: &[&str]) -> bool {
    match (pattern.split_first(), key.split_first()) {
        (None, None) => true,
        (Some((&"#", rest)), _) => {
            words_match(rest, key) || (!key.is_empty() && words_match(pattern, &key[1..]))
        }
        (Some((&"*", rest)), Some((_, key_rest))) => words_match(rest, key_rest),
        (Some((word, rest)), Some((key_word, key_rest))) => {
            word == key_word && words_match(rest, key_rest)
        }
        _ => false,
    }
}
