use crate::{naming::InvocationQueues, MessageBus, TopologyError};

/// Make sure every control queue of `invocation_id` exists and is bound on
/// the bus's exchange. Queues are declared one after another in
/// provisioning order and the first refusal aborts the rest.
///
/// Safe to repeat: the bus treats re-declaration as a no-op, so launching
/// the same invocation again leaves the topology unchanged.
pub async fn ensure<B: MessageBus>(
    bus: &B,
    invocation_id: &str,
) -> Result<InvocationQueues, TopologyError> {
    let queues = InvocationQueues::for_invocation(invocation_id);

    for binding in queues.bindings() {
        trace!(
            "Declaring {} bound to {} on {}",
            binding.queue,
            binding.routing_key,
            bus.exchange()
        );

        bus.declare_queue(&binding.queue, &binding.routing_key)
            .await
            .map_err(|source| TopologyError {
                invocation_id: invocation_id.to_string(),
                source,
            })?;
    }

    debug!("Control queues for invocation {} are in place", invocation_id);

    Ok(queues)
}

#[cfg(test)]
mod tests {
    use super::ensure;
    use crate::{naming::ControlQueue, MemoryBus, MessageBus};

    #[tokio::test]
    async fn it_declares_all_four_control_queues() {
        let bus = MemoryBus::new("de");
        let queues = ensure(&bus, "inv-123").await.unwrap();

        for kind in ControlQueue::ALL {
            let binding = queues.get(kind);
            assert!(bus.queue_exists(&binding.queue).await.unwrap());
            assert_eq!(
                bus.queue_bindings(&binding.queue).await,
                vec![binding.routing_key.clone()]
            );
        }
        assert_eq!(bus.queue_names().await.len(), 4);
    }

    #[tokio::test]
    async fn it_can_be_repeated_without_duplicating_queues() {
        let bus = MemoryBus::new("de");

        ensure(&bus, "inv-123").await.unwrap();
        ensure(&bus, "inv-123").await.unwrap();

        assert_eq!(bus.queue_names().await.len(), 4);
        assert_eq!(
            bus.queue_bindings(&ControlQueue::Stop.queue_name("inv-123"))
                .await
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn it_reports_the_invocation_when_the_bus_refuses() {
        let bus = MemoryBus::new("de");
        bus.fail_declarations(true).await;

        let error = ensure(&bus, "inv-123").await.unwrap_err();

        assert_eq!(error.invocation_id, "inv-123");
        assert!(bus.queue_names().await.is_empty());
    }
}
