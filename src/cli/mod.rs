//! Command line interface

pub mod args;
pub mod output;
pub mod prompt;

pub use args::{Args, Command, Target, VerbosityLevel};
pub use output::OutputFormatter;
pub use prompt::{parse_search_input, SearchInput};
