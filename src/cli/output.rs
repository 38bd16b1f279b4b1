//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::stream::SearchHit;
use crate::history::HistoryEntry;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Longest hit line before it is cut
pub const HIT_LINE_WIDTH: usize = 72;

/// Longest query echoed in the result header
pub const QUERY_DISPLAY_WIDTH: usize = 60;

/// Long-form documentation printed by `tube docs`
pub const DOCS: &str = "\
tube - watch videos in your own player

USAGE
  tube <URL>                 Watch a video from a URL containing a video ID.
  tube <INDEX>               Watch entry INDEX of the history list.
  tube nohist <URL>          Watch without recording the video in the history.
  tube hist [INDEX]          List the history, or watch entry INDEX.
  tube geturl <INDEX>        Print the watch URL of history entry INDEX.
  tube delhist 5 8 13        Delete history entries 5, 8 and 13.
  tube delhist 15-22         Delete history entries 15 through 22.
  tube delhist last          Delete the most recent history entry.
  tube search <WORDS...>     Search and pick a hit interactively.
  tube makedot               Create ~/.ytrc with default settings.

SEARCH
  Hits are listed as 'N) Author: Title'. At the 'vid search >' prompt, enter
  a number to play that hit, 'l' to list the hits again, and 'q' or an empty
  line to quit. '--limit N' lists at most N hits (up to 50) and '--audio'
  extracts the audio track with yt-dlp instead of playing the video.

  Searching sends a consent cookie to the provider. Using the search function
  means agreeing to whatever that consent covers.

HISTORY
  Watched videos are stored as a JSON list in ~/.yt_history. Indices start at
  1 and the list stays dense: deleting an entry renumbers the ones after it.
  A video is recorded once; watching it again does not move it.

SETTINGS
  ~/.ytrc is a JSON object with these keys:
    pref_maxres  Streams must be lower than this many pixels. Default 1700.
    verbose      Print progress messages. Default true.
    history      Record watched videos. Default true.
    use_ytdlp    Pipe yt-dlp output into the player. Default true.
    player       Player name (vlc, mpv, mplayer, omxplayer) or a full command
                 as a list. '%url' and '%title' are replaced in every
                 argument. With use_ytdlp, '%url' becomes '-' so the player
                 must read from stdin. Default \"mpv\".

  RUST_LOG overrides the log filter chosen from the verbosity settings.";

/// Output formatter for tube
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    spinner: Option<ProgressBar>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            spinner: None,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Show a spinner while a network operation runs.
    ///
    /// Only shown at normal verbosity, where it would not be interleaved with
    /// progress logging.
    pub fn start_spinner(&mut self, message: &str) {
        if self.verbosity != VerbosityLevel::Normal {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Remove the spinner, if any
    pub fn finish_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose {
            println!("{} {}", "[tube]".cyan(), message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("{}", message.green());
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    /// Print the numbered hit list under a header echoing the query
    pub fn print_hits(&self, query: &str, hits: &[SearchHit]) {
        println!("Result for '{}':", truncate(query, QUERY_DISPLAY_WIDTH));
        for (i, hit) in hits.iter().enumerate() {
            println!(
                "{}) {}",
                format!("{:>3}", i + 1).bold(),
                truncate(&hit.label(), HIT_LINE_WIDTH)
            );
        }
        println!("Enter number to play video, 'l' to list results, empty input or 'q' to quit.");
    }

    /// Print the history as a right-aligned numbered list
    pub fn print_history(&self, entries: &[HistoryEntry]) {
        let width = entries.len().to_string().len();
        for (i, (_, title)) in entries.iter().enumerate() {
            println!("{:>width$}) {}", i + 1, title, width = width);
        }
    }

    pub fn print_docs(&self) {
        println!("{}", DOCS);
    }
}

impl Drop for OutputFormatter {
    fn drop(&mut self) {
        self.finish_spinner();
    }
}

/// Cut `text` to `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
