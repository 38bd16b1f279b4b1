//! External media player launch

use crate::core::stream::{ContentId, ResolvedStream};
use crate::error::TubeError;
use crate::utils::url::short_url;
use std::io::ErrorKind;
use tokio::process::Command;
use tracing::{debug, info};

/// Stream fetcher the player is fed from in pipe mode
pub const YTDLP_BINARY: &str = "yt-dlp";

/// Exit status a POSIX shell reports for an unknown command
const SHELL_COMMAND_NOT_FOUND: i32 = 127;

/// A fully substituted player command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Spawn `program` directly with `args`
    Direct { program: String, args: Vec<String> },
    /// Run a pipeline through `sh -c`; `program` names the player for error reports
    Shell { program: String, script: String },
}

impl Invocation {
    /// Run the command to completion, inheriting the terminal
    pub async fn run(&self) -> Result<(), TubeError> {
        let (program, mut command) = match self {
            Invocation::Direct { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                (program, command)
            }
            Invocation::Shell { program, script } => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(script);
                (program, command)
            }
        };
        debug!("Running {:?}", self);

        let status = command.status().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => TubeError::PlayerNotFound(program.clone()),
            _ => TubeError::Io(e),
        })?;

        match status.code() {
            _ if status.success() => Ok(()),
            Some(SHELL_COMMAND_NOT_FOUND) if matches!(self, Invocation::Shell { .. }) => {
                Err(TubeError::PlayerNotFound(program.clone()))
            }
            code => Err(TubeError::PlayerFailed(code.unwrap_or(-1))),
        }
    }
}

/// Builds and runs player commands from the configured template
#[derive(Debug, Clone)]
pub struct PlayerLauncher {
    command: Vec<String>,
    use_ytdlp: bool,
}

impl PlayerLauncher {
    /// `command` is the expanded player setting, binary first
    pub fn new(command: Vec<String>, use_ytdlp: bool) -> Self {
        Self { command, use_ytdlp }
    }

    /// Build the invocation for a resolved stream.
    ///
    /// In pipe mode the player reads from stdin and yt-dlp fetches `input_url`
    /// itself, so the resolved stream URL is not used.
    pub fn invocation(&self, stream: &ResolvedStream, input_url: &str) -> Result<Invocation, TubeError> {
        let program = self
            .command
            .first()
            .cloned()
            .ok_or_else(|| TubeError::Config("Player command is empty".to_string()))?;
        let title = format!("YouTube ({})", stream.title);

        if self.use_ytdlp {
            let quoted_title = shell_quote(&title);
            let player = self
                .command
                .iter()
                .map(|arg| arg.replace("%title", &quoted_title).replace("%url", "-"))
                .collect::<Vec<_>>()
                .join(" ");
            let script = format!(
                "{} {} -o - | {}",
                YTDLP_BINARY,
                shell_quote(input_url),
                player
            );
            return Ok(Invocation::Shell { program, script });
        }

        let args = self.command[1..]
            .iter()
            .map(|arg| arg.replace("%url", &stream.url).replace("%title", &title))
            .collect();
        Ok(Invocation::Direct { program, args })
    }

    /// Launch the player and wait for it to exit
    pub async fn launch(&self, stream: &ResolvedStream, input_url: &str) -> Result<(), TubeError> {
        let invocation = self.invocation(stream, input_url)?;
        info!("Launching player...");
        invocation.run().await
    }
}

/// Invocation extracting the audio track of a video with yt-dlp
pub fn audio_extraction(id: &ContentId) -> Invocation {
    Invocation::Direct {
        program: YTDLP_BINARY.to_string(),
        args: vec!["-x".to_string(), short_url(id)],
    }
}

/// Quote `word` for a POSIX shell, leaving plain words untouched
pub fn shell_quote(word: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c);
    if !word.is_empty() && word.chars().all(plain) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r#"'"'"'"#))
}
