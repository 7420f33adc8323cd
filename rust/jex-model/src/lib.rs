//! The job submission model accepted by the JEX dispatch gateway, along with
//! the renderer that turns a step's parameters into the command-line preview
//! the execution backend will use.
#![warn(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod job;
mod preview;
mod settings;
mod step;

pub use error::*;
pub use job::*;
pub use preview::*;
pub use settings::*;
pub use step::*;
