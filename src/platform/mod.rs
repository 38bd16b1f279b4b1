//! Video platform client and page parsing

pub mod cipher;
pub mod client;
pub mod formats;
pub mod player_page;
pub mod probe;
pub mod search;

pub use cipher::*;
pub use client::*;
pub use formats::*;
pub use probe::*;
pub use search::SearchClient;
