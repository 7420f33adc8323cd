//! Stateless [axum] handlers for the dispatch routes.

#[cfg(doc)]
use axum;

mod deadline;
mod home;
mod launch;
mod preview;
mod stop;

pub use deadline::*;
pub use home::*;
pub use launch::*;
pub use preview::*;
pub use stop::*;
