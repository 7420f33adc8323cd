//! Deterministic names for everything the gateway addresses on the bus.
//!
//! Per-invocation queue names and routing keys are pure functions of the
//! invocation ID, so any consumer that knows the ID can derive them without
//! a lookup. The scheme is:
//!
//! | Queue | Name | Routing key |
//! |---|---|---|
//! | time-limit delta | `road-runner-<id>-tl-delta` | `timelimits.deltas.<id>` |
//! | time-limit request | `road-runner-<id>-tl-request` | `timelimits.requests.<id>` |
//! | time-limit response | `road-runner-<id>-tl-response` | `timelimits.responses.<id>` |
//! | stop | `road-runner-<id>-stop` | `stops.<id>` |
//!
//! Launch messages are not per-invocation and go to [LAUNCHES_KEY].

/// Routing key for launch messages
pub const LAUNCHES_KEY: &str = "launches";
/// Prefix of the per-invocation stop routing keys
pub const STOPS_KEY: &str = "stops";
/// Prefix of the per-invocation time-limit delta routing keys
pub const TIME_LIMIT_DELTAS_KEY: &str = "timelimits.deltas";
/// Prefix of the per-invocation time-limit request routing keys
pub const TIME_LIMIT_REQUESTS_KEY: &str = "timelimits.requests";
/// Prefix of the per-invocation time-limit response routing keys
pub const TIME_LIMIT_RESPONSES_KEY: &str = "timelimits.responses";
/// Prefix shared by every per-invocation queue name
pub const QUEUE_PREFIX: &str = "road-runner";

/// The four control channels provisioned for every launched invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlQueue {
    /// Time-limit adjustments the backend consumes
    TimeLimitDelta,
    /// Requests from the backend for a time-limit extension
    TimeLimitRequest,
    /// Decisions on time-limit extension requests
    TimeLimitResponse,
    /// Stop signals for the running job
    Stop,
}

impl ControlQueue {
    /// Every control queue, in the order they are provisioned.
    pub const ALL: [ControlQueue; 4] = [
        ControlQueue::TimeLimitDelta,
        ControlQueue::TimeLimitRequest,
        ControlQueue::TimeLimitResponse,
        ControlQueue::Stop,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            ControlQueue::TimeLimitDelta => "tl-delta",
            ControlQueue::TimeLimitRequest => "tl-request",
            ControlQueue::TimeLimitResponse => "tl-response",
            ControlQueue::Stop => "stop",
        }
    }

    fn key_prefix(&self) -> &'static str {
        match self {
            ControlQueue::TimeLimitDelta => TIME_LIMIT_DELTAS_KEY,
            ControlQueue::TimeLimitRequest => TIME_LIMIT_REQUESTS_KEY,
            ControlQueue::TimeLimitResponse => TIME_LIMIT_RESPONSES_KEY,
            ControlQueue::Stop => STOPS_KEY,
        }
    }

    /// Name of this queue for the given invocation
    pub fn queue_name(&self, invocation_id: &str) -> String {
        format!("{QUEUE_PREFIX}-{invocation_id}-{}", self.suffix())
    }

    /// Routing key this queue is bound to for the given invocation
    pub fn routing_key(&self, invocation_id: &str) -> String {
        format!("{}.{invocation_id}", self.key_prefix())
    }
}

/// Routing key a stop request for `invocation_id` is published to.
pub fn stop_routing_key(invocation_id: &str) -> String {
    ControlQueue::Stop.routing_key(invocation_id)
}

/// A queue together with the routing key it is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueBinding {
    /// Which control channel this is
    pub kind: ControlQueue,
    /// Queue name
    pub queue: String,
    /// Routing key on the shared exchange
    pub routing_key: String,
}

impl QueueBinding {
    fn new(kind: ControlQueue, invocation_id: &str) -> Self {
        QueueBinding {
            kind,
            queue: kind.queue_name(invocation_id),
            routing_key: kind.routing_key(invocation_id),
        }
    }
}

/// The complete control queue set of one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationQueues {
    invocation_id: String,
    bindings: [QueueBinding; 4],
}

impl InvocationQueues {
    /// Derive the queue set for `invocation_id`.
    pub fn for_invocation(invocation_id: &str) -> Self {
        InvocationQueues {
            invocation_id: invocation_id.to_string(),
            bindings: ControlQueue::ALL.map(|kind| QueueBinding::new(kind, invocation_id)),
        }
    }

    /// The invocation these queues belong to
    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    /// All bindings, in provisioning order
    pub fn bindings(&self) -> &[QueueBinding] {
        &self.bindings
    }

    /// The binding for a specific control channel
    pub fn get(&self, kind: ControlQueue) -> &QueueBinding {
        let index = match kind {
            ControlQueue::TimeLimitDelta => 0,
            ControlQueue::TimeLimitRequest => 1,
            ControlQueue::TimeLimitResponse => 2,
            ControlQueue::Stop => 3,
        };
        &self.bindings[index]
    }
}
