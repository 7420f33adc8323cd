#[macro_use]
extern crate tracing;

pub mod gateway;

pub use gateway::{commands, environment, handlers, Cli, Command, GatewayError, Previewer, PreviewerReturn};
