//! Main entry point for the tube CLI

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::io;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tube::cli::prompt::read_search_input;
use tube::cli::{Args, Command, OutputFormatter, SearchInput, Target, VerbosityLevel};
use tube::config::Settings;
use tube::history::{parse_deletion, History};
use tube::platform::client::HttpClientConfig;
use tube::player::{audio_extraction, PlayerLauncher};
use tube::utils::url::watch_url;
use tube::{SearchClient, StreamResolver, VideoClient};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {:#}", "error:".red().bold(), error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let settings_path = match &args.config {
        Some(path) => path.clone(),
        None => Settings::default_path()?,
    };

    if args.command == Some(Command::Makedot) {
        Settings::make_dotfile(&settings_path).context("Unable to create dotfile")?;
        println!("Created {}", settings_path.display());
        return Ok(());
    }

    let settings = Settings::load(&settings_path)?;
    let verbosity = args.verbosity_level(settings.verbose);
    init_logging(verbosity);
    debug!("Starting tube with args: {:?}", args);

    let mut app = App::new(args, settings, verbosity)?;
    app.dispatch().await
}

/// Wires settings, CLI overrides and collaborators for one run
struct App {
    args: Args,
    settings: Settings,
    history: History,
    output: OutputFormatter,
    client: VideoClient,
}

impl App {
    fn new(args: Args, settings: Settings, verbosity: VerbosityLevel) -> Result<Self> {
        let client = VideoClient::with_config(HttpClientConfig {
            timeout: args.timeout_duration(),
            user_agent: args.user_agent.clone(),
            proxy_url: args.proxy.clone(),
            ..Default::default()
        })?;

        Ok(Self {
            history: History::default_location()?,
            output: OutputFormatter::new(verbosity),
            args,
            settings,
            client,
        })
    }

    async fn dispatch(&mut self) -> Result<()> {
        match self.args.command.clone() {
            Some(Command::Nohist { url }) => self.watch(&url, false).await,
            Some(Command::Hist { index: Some(index) }) => self.watch_history_entry(index).await,
            Some(Command::Hist { index: None }) => self.list_history(),
            Some(Command::Geturl { index }) => {
                let (id, _) = self.history.get(index)?;
                println!("{}", watch_url(&id));
                Ok(())
            }
            Some(Command::Delhist { positions }) => {
                let deletion = parse_deletion(&positions)?;
                self.history
                    .apply(&deletion)
                    .context("Failed to delete history")?;
                Ok(())
            }
            Some(Command::Search {
                limit,
                audio,
                query,
            }) => self.search(&query.join(" "), limit, audio).await,
            Some(Command::Docs) => {
                self.output.print_docs();
                Ok(())
            }
            // Handled before the settings are loaded.
            Some(Command::Makedot) => Ok(()),
            None => match self.args.target.as_deref().map(Target::parse) {
                Some(Target::HistoryIndex(index)) => self.watch_history_entry(index).await,
                Some(Target::Url(url)) => self.watch(&url, true).await,
                None => {
                    Args::command().print_help()?;
                    Ok(())
                }
            },
        }
    }

    fn keeps_history(&self) -> bool {
        self.settings.history && !self.args.no_history
    }

    fn resolver(&self) -> StreamResolver {
        let max_height = self.args.max_height.unwrap_or(self.settings.pref_maxres);
        StreamResolver::new(self.client.clone()).with_max_height(max_height)
    }

    /// Resolve `url`, record it and hand it to the player
    async fn watch(&mut self, url: &str, record: bool) -> Result<()> {
        self.output.start_spinner("Resolving stream...");
        let resolved = self.resolver().resolve(url).await;
        self.output.finish_spinner();
        let stream = resolved?;

        self.output.info(&format!(
            "Found {} px stream for '{}'",
            stream.height, stream.title
        ));

        if record && self.keeps_history() {
            if self.history.append(&stream.id, &stream.title)? {
                debug!("Recorded {} in {}", stream.id, self.history.path().display());
            }
        }

        let launcher = PlayerLauncher::new(self.settings.player_command()?, self.settings.use_ytdlp);
        launcher.launch(&stream, url).await?;
        Ok(())
    }

    async fn watch_history_entry(&mut self, index: usize) -> Result<()> {
        let (id, title) = self
            .history
            .get(index)
            .with_context(|| format!("History: No match for '{}'", index))?;
        info!("Watching history entry {}: {}", index, title);
        self.watch(&watch_url(&id), true).await
    }

    fn list_history(&self) -> Result<()> {
        let entries = self.history.read()?;
        self.output.print_history(&entries);
        Ok(())
    }

    /// Search, then run the result prompt until the user quits
    async fn search(&mut self, query: &str, limit: Option<usize>, audio: bool) -> Result<()> {
        self.output.start_spinner("Searching...");
        let found = SearchClient::new(self.client.clone()).search(query).await;
        self.output.finish_spinner();
        let mut hits = found.context("Failed parsing search result")?;

        if let Some(limit) = limit {
            hits.truncate(limit);
        }
        if hits.is_empty() {
            self.output.success(&format!("No search hits for '{}'", query));
            return Ok(());
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        loop {
            self.output.print_hits(query, &hits);
            match read_search_input(&mut input, hits.len())? {
                SearchInput::Quit => return Ok(()),
                SearchInput::List => continue,
                SearchInput::Select(i) if audio => {
                    self.output
                        .info(&format!("Extracting audio of '{}'", hits[i].title));
                    audio_extraction(&hits[i].id).run().await?;
                }
                SearchInput::Select(i) => {
                    let url = watch_url(&hits[i].id);
                    self.watch(&url, true).await?;
                }
                SearchInput::Unrecognized(other) => {
                    println!("Unrecognized input '{}'", other);
                }
            }
        }
    }
}

/// Initialize logging system
fn init_logging(verbosity: VerbosityLevel) {
    // RUST_LOG wins over the verbosity settings.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,tube={}", verbosity.log_directive()))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}
