pub mod commands;
pub mod environment;
pub mod handlers;
pub mod tracing;

mod cli;
mod error;
mod schema;

pub use cli::*;
pub use error::*;
pub use schema::*;
