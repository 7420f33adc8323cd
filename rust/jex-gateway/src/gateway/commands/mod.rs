mod serve;

pub use serve::*;
