//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Largest number of search hits a single search may list
pub const MAX_SEARCH_LIMIT: usize = 50;

/// tube - watch videos from a URL, your history or a search, in your own player
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Video URL or history index to watch
    pub target: Option<String>,

    /// Exclusive ceiling for stream height in pixels (overrides pref_maxres)
    #[arg(long, global = true, value_name = "PIXELS")]
    pub max_height: Option<u32>,

    /// Do not record watched videos in the history
    #[arg(long, global = true)]
    pub no_history: bool,

    /// HTTP timeout (e.g., 30s, 1m)
    #[arg(long, global = true, value_name = "DURATION", default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Override User-Agent header
    #[arg(long, global = true, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Proxy URL (http/https/socks)
    #[arg(long, global = true, value_name = "URL")]
    pub proxy: Option<String>,

    /// Settings file to use instead of ~/.ytrc
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Watch a video without recording it in the history
    Nohist {
        /// Video URL
        url: String,
    },

    /// List the history, or watch the entry at INDEX
    Hist {
        /// 1-based history index
        index: Option<usize>,
    },

    /// Print the watch URL of a history entry
    Geturl {
        /// 1-based history index
        index: usize,
    },

    /// Delete history entries: 'N1 N2 ...', 'N1-N2' or 'last'
    Delhist {
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Search for videos and pick one interactively
    Search {
        /// List at most N hits (1-50)
        #[arg(short = 'n', long, value_name = "N", value_parser = parse_limit)]
        limit: Option<usize>,

        /// Extract the audio track of the chosen hit instead of playing it
        #[arg(short = 'x', long)]
        audio: bool,

        /// Search keywords
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        query: Vec<String>,
    },

    /// Create a ~/.ytrc settings file with default values
    Makedot,

    /// Print extensive documentation
    Docs,
}

/// What the positional argument refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url(String),
    HistoryIndex(usize),
}

impl Target {
    /// Positive integers are history indices, everything else is a URL
    pub fn parse(target: &str) -> Self {
        match target.parse::<usize>() {
            Ok(index) if index > 0 => Target::HistoryIndex(index),
            _ => Target::Url(target.to_string()),
        }
    }
}

impl Args {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Get output verbosity level; `verbose_default` comes from the settings file
    pub fn verbosity_level(&self, verbose_default: bool) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose || verbose_default {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (progress logging)
    Verbose,
}

impl VerbosityLevel {
    /// Default log filter directive for this level
    pub fn log_directive(self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
        }
    }
}

/// Parse a search hit limit
pub fn parse_limit(value: &str) -> Result<usize, String> {
    let limit: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
        return Err(format!("limit must be between 1 and {}", MAX_SEARCH_LIMIT));
    }
    Ok(limit)
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: None,
            target: None,
            max_height: None,
            no_history: false,
            timeout: humantime::Duration::from(Duration::from_secs(30)),
            user_agent: None,
            proxy: None,
            config: None,
            verbose: false,
            quiet: false,
        }
    }
}
