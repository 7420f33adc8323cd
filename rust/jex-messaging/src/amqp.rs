use async_trait::async_trait;
use lapin::{
    options::{
        BasicPublishOptions, ConfirmSelectOptions, ExchangeDeclareOptions, QueueBindOptions,
        QueueDeclareOptions,
    },
    protocol::{AMQPErrorKind, AMQPSoftError},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind,
};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

use crate::{BusError, MessageBus};

const PERSISTENT_DELIVERY: u8 = 2;
const REPLY_SUCCESS: u16 = 200;

fn exchange_kind(name: &str) -> ExchangeKind {
    match name {
        "topic" => ExchangeKind::Topic,
        "direct" => ExchangeKind::Direct,
        "fanout" => ExchangeKind::Fanout,
        "headers" => ExchangeKind::Headers,
        other => ExchangeKind::Custom(other.to_string()),
    }
}

/// A [MessageBus] backed by an AMQP 0.9.1 broker.
///
/// One connection is shared by every clone. Declarations and publishes go
/// through a shared channel in publisher-confirm mode, which is replaced if
/// the broker closes it; queue lookups use a throwaway channel because a
/// failed passive declaration closes the channel it was made on.
#[derive(Clone)]
pub struct AmqpBus {
    connection: Arc<Connection>,
    channel: Arc<Mutex<Channel>>,
    exchange: String,
}

impl AmqpBus {
    /// Connect to the broker at `uri` and declare the durable `exchange` of
    /// the given kind (normally `topic`).
    pub async fn connect(uri: &str, exchange: &str, kind: &str) -> Result<Self, BusError> {
        info!("Connecting to message bus...");

        let connection = Connection::connect(uri, ConnectionProperties::default())
            .await
            .map_err(|error| BusError::Connection(error.to_string()))?;

        let channel = open_channel(&connection).await?;

        channel
            .exchange_declare(
                exchange,
                exchange_kind(kind),
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|error| BusError::Connection(error.to_string()))?;

        debug!("Declared {} exchange {}", kind, exchange);

        Ok(AmqpBus {
            connection: Arc::new(connection),
            channel: Arc::new(Mutex::new(channel)),
            exchange: exchange.to_string(),
        })
    }

    async fn channel(&self) -> Result<Channel, BusError> {
        let mut channel = self.channel.lock().await;

        if !channel.status().connected() {
            warn!("Message bus channel was closed; opening a new one");
            *channel = open_channel(&self.connection).await?;
        }

        Ok(channel.clone())
    }

    /// Close the connection to the broker.
    pub async fn close(&self) -> Result<(), BusError> {
        self.connection
            .close(REPLY_SUCCESS, "Gateway shutting down")
            .await
            .map_err(|error| BusError::Connection(error.to_string()))
    }
}

async fn open_channel(connection: &Connection) -> Result<Channel, BusError> {
    let channel = connection
        .create_channel()
        .await
        .map_err(|error| BusError::Connection(error.to_string()))?;

    channel
        .confirm_select(ConfirmSelectOptions::default())
        .await
        .map_err(|error| BusError::Connection(error.to_string()))?;

    Ok(channel)
}

impl fmt::Debug for AmqpBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmqpBus")
            .field("exchange", &self.exchange)
            .finish()
    }
}

#[async_trait]
impl MessageBus for AmqpBus {
    fn exchange(&self) -> &str {
        &self.exchange
    }

    async fn declare_queue(&self, queue: &str, routing_key: &str) -> Result<(), BusError> {
        let declare_error = |error: lapin::Error| BusError::Declare {
            queue: queue.to_string(),
            reason: error.to_string(),
        };
        let channel = self.channel().await?;

        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(declare_error)?;

        channel
            .queue_bind(
                queue,
                &self.exchange,
                routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(declare_error)?;

        Ok(())
    }

    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), BusError> {
        let publish_error = |reason: String| BusError::Publish {
            routing_key: routing_key.to_string(),
            reason,
        };
        let channel = self.channel().await?;

        let confirmation = channel
            .basic_publish(
                &self.exchange,
                routing_key,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_delivery_mode(PERSISTENT_DELIVERY),
            )
            .await
            .map_err(|error| publish_error(error.to_string()))?
            .await
            .map_err(|error| publish_error(error.to_string()))?;

        if confirmation.is_nack() {
            return Err(publish_error("broker did not acknowledge the message".into()));
        }

        Ok(())
    }

    async fn queue_exists(&self, queue: &str) -> Result<bool, BusError> {
        let channel = self
            .connection
            .create_channel()
            .await
            .map_err(|error| BusError::Connection(error.to_string()))?;

        let result = channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    passive: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await;

        match result {
            Ok(_) => {
                if let Err(error) = channel.close(REPLY_SUCCESS, "OK").await {
                    debug!("Could not close inspection channel: {}", error);
                }
                Ok(true)
            }
            Err(lapin::Error::ProtocolError(error))
                if matches!(error.kind(), AMQPErrorKind::Soft(AMQPSoftError::NOTFOUND)) =>
            {
                Ok(false)
            }
            Err(error) => Err(BusError::Inspect {
                queue: queue.to_string(),
                reason: error.to_string(),
            }),
        }
    }
}
