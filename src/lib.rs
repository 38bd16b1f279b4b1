//! # tube - stream resolver for a video platform
//!
//! Turns a watch URL into the best reachable MP4 stream below a height
//! ceiling, and turns a free-text query into a list of search hits. The
//! binary hands the result to an external media player.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tube::{StreamResolver, VideoClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = StreamResolver::new(VideoClient::new()?).with_max_height(1080);
//!     let stream = resolver.resolve("https://youtu.be/VIDEO_ID").await?;
//!     println!("{} ({} px): {}", stream.title, stream.height, stream.url);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod history;
pub mod platform;
pub mod player;
pub mod utils;

// Re-export main types
pub use crate::core::{ContentId, ResolvedStream, SearchHit, StreamResolver};
pub use config::Settings;
pub use error::TubeError;
pub use history::History;
pub use platform::{SearchClient, VideoClient};
pub use player::PlayerLauncher;

/// Result type alias for tube operations
pub type Result<T> = std::result::Result<T, TubeError>;
