//! Everything the JEX gateway puts on the message bus: the launch and stop
//! messages, the deterministic names of the per-invocation control queues,
//! the provisioning of those queues, and the bus clients that carry it all.
#![warn(missing_docs)]

#[macro_use]
extern crate tracing;

mod amqp;
mod bus;
mod dispatch;
mod error;
mod memory;
pub mod naming;
mod protocol;
mod topology;

pub use amqp::*;
pub use bus::*;
pub use dispatch::*;
pub use error::*;
pub use memory::*;
pub use protocol::*;
pub use topology::*;
