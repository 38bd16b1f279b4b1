//! Core resolution types and orchestration

pub mod resolver;
pub mod retry;
pub mod stream;

pub use resolver::StreamResolver;
pub use retry::{RetryConfig, RetryExecutor};
pub use stream::*;
