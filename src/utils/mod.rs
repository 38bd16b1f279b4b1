//! Utility functions for tube

pub mod mime;
pub mod token;
pub mod url;

pub use mime::*;
pub use token::*;
pub use url::*;
