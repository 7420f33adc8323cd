use jex_model::Job;
use serde::Serialize;

use crate::{
    ensure,
    naming::{stop_routing_key, InvocationQueues, LAUNCHES_KEY},
    DispatchError, JobRequest, MessageBus, PublishError, StopRequest, TopologyError,
};

/// Turns launch and stop decisions into messages on a [MessageBus].
///
/// Dispatch is fire-and-forget: once the bus accepts a message the
/// [Dispatcher] is done with it, and nothing is retried on failure.
#[derive(Clone, Debug)]
pub struct Dispatcher<B: MessageBus> {
    bus: B,
}

impl<B: MessageBus> Dispatcher<B> {
    /// Dispatch through `bus`.
    pub fn new(bus: B) -> Self {
        Dispatcher { bus }
    }

    /// Provision the control queues of `invocation_id`.
    pub async fn ensure_queues(&self, invocation_id: &str) -> Result<InvocationQueues, TopologyError> {
        ensure(&self.bus, invocation_id).await
    }

    /// Provision the job's control queues, then publish its launch request.
    ///
    /// The launch request is only published once every queue exists, so a
    /// consumer reacting to it can rely on them. If publishing fails the
    /// queues are left in place; launching again is safe.
    pub async fn launch(&self, job: &Job) -> Result<InvocationQueues, DispatchError> {
        let queues = self.ensure_queues(&job.invocation_id).await?;

        self.publish_launch(job).await?;

        info!("Dispatched launch of invocation {}", job.invocation_id);

        Ok(queues)
    }

    /// Publish a launch request for `job` without touching the topology.
    pub async fn publish_launch(&self, job: &Job) -> Result<(), PublishError> {
        self.publish_json(LAUNCHES_KEY, &JobRequest::launch(job.clone()))
            .await
    }

    /// Ask whatever is running `invocation_id` to stop. No check is made that
    /// the invocation exists or is still running.
    pub async fn stop(&self, invocation_id: &str) -> Result<StopRequest, PublishError> {
        let request = StopRequest::user_request(invocation_id);

        self.publish_json(&stop_routing_key(invocation_id), &request)
            .await?;

        info!("Dispatched stop of invocation {}", invocation_id);

        Ok(request)
    }

    async fn publish_json<T: Serialize>(
        &self,
        routing_key: &str,
        message: &T,
    ) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(message).map_err(|source| PublishError::Encode {
            routing_key: routing_key.to_string(),
            source,
        })?;

        self.bus
            .publish(routing_key, &payload)
            .await
            .map_err(|source| PublishError::Bus {
                routing_key: routing_key.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use jex_model::{Job, Step};

    use super::Dispatcher;
    use crate::{
        naming::{ControlQueue, LAUNCHES_KEY},
        BusOperation, DispatchError, JobRequest, MemoryBus, MessageBus, StopRequest,
    };

    fn job(invocation_id: &str) -> Job {
        Job {
            description: "a job".into(),
            invocation_id: invocation_id.into(),
            steps: vec![Step::default(), Step::default()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn it_declares_every_queue_before_publishing_the_launch() {
        let bus = MemoryBus::new("de");
        let dispatcher = Dispatcher::new(bus.clone());

        dispatcher.launch(&job("inv-123")).await.unwrap();

        let operations = bus.operations().await;
        assert_eq!(operations.len(), 5);
        assert!(operations[..4]
            .iter()
            .all(|operation| matches!(operation, BusOperation::Declare { .. })));
        assert_eq!(
            operations[4],
            BusOperation::Publish {
                routing_key: LAUNCHES_KEY.into()
            }
        );
    }

    #[tokio::test]
    async fn it_publishes_exactly_one_launch_request() {
        let bus = MemoryBus::new("de");
        let dispatcher = Dispatcher::new(bus.clone());
        let submitted = job("inv-123");

        dispatcher.launch(&submitted).await.unwrap();

        let launches = bus.published_to(LAUNCHES_KEY).await;
        assert_eq!(launches.len(), 1);

        let request: JobRequest = serde_json::from_slice(&launches[0].payload).unwrap();
        assert_eq!(request.job.description, submitted.description);
        assert_eq!(request.invocation_id(), "inv-123");
        assert_eq!(request.job, submitted);
    }

    #[tokio::test]
    async fn it_can_launch_the_same_invocation_twice() {
        let bus = MemoryBus::new("de");
        let dispatcher = Dispatcher::new(bus.clone());

        dispatcher.launch(&job("inv-123")).await.unwrap();
        dispatcher.launch(&job("inv-123")).await.unwrap();

        assert_eq!(bus.queue_names().await.len(), 4);
        assert_eq!(bus.published_to(LAUNCHES_KEY).await.len(), 2);
    }

    #[tokio::test]
    async fn it_publishes_nothing_when_provisioning_fails() {
        let bus = MemoryBus::new("de");
        bus.fail_declarations(true).await;
        let dispatcher = Dispatcher::new(bus.clone());

        let result = dispatcher.launch(&job("inv-123")).await;

        assert!(matches!(result, Err(DispatchError::Topology(_))));
        assert!(bus.published().await.is_empty());
    }

    #[tokio::test]
    async fn it_leaves_queues_behind_when_publishing_fails() {
        let bus = MemoryBus::new("de");
        bus.fail_publishes(true).await;
        let dispatcher = Dispatcher::new(bus.clone());

        let result = dispatcher.launch(&job("inv-123")).await;

        assert!(matches!(result, Err(DispatchError::Publish(_))));
        assert!(bus
            .queue_exists(&ControlQueue::Stop.queue_name("inv-123"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn it_delivers_stops_to_the_invocation_stop_queue() {
        let bus = MemoryBus::new("de");
        let dispatcher = Dispatcher::new(bus.clone());
        dispatcher.ensure_queues("inv-1").await.unwrap();
        dispatcher.ensure_queues("inv-2").await.unwrap();

        dispatcher.stop("inv-1").await.unwrap();

        let delivered = bus.consume(&ControlQueue::Stop.queue_name("inv-1")).await;
        assert_eq!(delivered.len(), 1);
        let request: StopRequest = serde_json::from_slice(&delivered[0].payload).unwrap();
        assert_eq!(request, StopRequest::user_request("inv-1"));

        assert!(bus
            .consume(&ControlQueue::Stop.queue_name("inv-2"))
            .await
            .is_empty());
        assert!(bus
            .consume(&ControlQueue::TimeLimitDelta.queue_name("inv-1"))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn it_publishes_a_stop_per_call() {
        let bus = MemoryBus::new("de");
        let dispatcher = Dispatcher::new(bus.clone());

        dispatcher.stop("inv-1").await.unwrap();
        dispatcher.stop("inv-1").await.unwrap();

        assert_eq!(bus.published_to("stops.inv-1").await.len(), 2);
    }
}
