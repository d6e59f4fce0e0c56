//! Command-line interface for replybot.
//!
//! Provides commands for the unattended run, the interactive session,
//! the HTTP server, and inspecting tones and configuration.

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::adapters::{GeminiClient, RedditClient};
use crate::config::{self, Settings};
use crate::core::Orchestrator;
use crate::domain::{list_tones, RunState};

pub mod interactive;

pub use interactive::{InteractiveSession, Prompter};

/// replybot - Reddit reply pipeline driven by Gemini
#[derive(Parser, Debug)]
#[command(name = "replybot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the unattended pipeline once (rehearsal unless --live)
    Run {
        /// Actually post the comment, gated by the posting window
        #[arg(long)]
        live: bool,
    },

    /// Pick a channel, post and tone by hand
    Interactive,

    /// Start the HTTP server
    Serve {
        /// Address to bind to (defaults to the configured server address)
        #[arg(short, long)]
        address: Option<String>,
    },

    /// List the available comment tones
    Tones,

    /// Show resolved configuration (secrets redacted)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run { live } => run_unattended(live).await,
            Commands::Interactive => run_interactive().await,
            Commands::Serve { address } => serve(address).await,
            Commands::Tones => {
                show_tones();
                Ok(())
            }
            Commands::Config => show_config(),
        }
    }
}

/// Build the orchestrator over the real Reddit and Gemini clients
pub fn build_orchestrator(settings: &Settings) -> Result<Orchestrator> {
    let provider =
        RedditClient::new(&settings.reddit).context("Failed to initialize Reddit client")?;
    let generator =
        GeminiClient::new(&settings.gemini).context("Failed to initialize Gemini client")?;

    let orchestrator = Orchestrator::new(
        Arc::new(provider),
        Arc::new(generator),
        settings.schedule.clone(),
    );
    info!(
        provider = orchestrator.provider_name(),
        generator = orchestrator.generator_name(),
        can_post = orchestrator.can_write(),
        "Pipeline ready"
    );
    Ok(orchestrator)
}

fn load_settings() -> Result<Settings> {
    Settings::load().context("Failed to load configuration")
}

/// Run the unattended pipeline and report the outcome
async fn run_unattended(live: bool) -> Result<()> {
    let settings = load_settings()?;
    let orchestrator = build_orchestrator(&settings)?;

    let run = orchestrator.run_unattended(!live).await;

    if let Some(text) = run.generated_text() {
        println!("{}", text);
    }

    match &run.state {
        RunState::Submitted => {
            let url = run
                .submission
                .as_ref()
                .and_then(|s| s.reply_url.as_deref())
                .unwrap_or("-");
            eprintln!("\n[Run {} posted comment: {}]", run.id, url);
        }
        RunState::Rehearsed => {
            eprintln!("\n[Run {} completed as a dry run, nothing posted]", run.id);
        }
        RunState::Skipped { reason } => {
            eprintln!("\n[Run {} skipped: {}]", run.id, reason);
        }
        RunState::Failed { stage, error } => {
            eprintln!("\n[Run {} failed during {:?}: {}]", run.id, stage, error);
            std::process::exit(1);
        }
        RunState::Running => {
            eprintln!("\n[Run {} in state: {:?}]", run.id, run.state);
        }
    }

    Ok(())
}

/// Attended session over stdin/stdout until an empty channel name
async fn run_interactive() -> Result<()> {
    let settings = load_settings()?;
    let orchestrator = build_orchestrator(&settings)?;

    let stdin = io::stdin();
    let prompter = Prompter::new(stdin.lock(), io::stdout());
    let mut session = InteractiveSession::new(&orchestrator, prompter);

    println!("Reddit Comment Generator - interactive mode");
    if !orchestrator.can_write() {
        println!("Note: no bot login configured, comments can only be dry-run.");
    }

    while session.run_once().await?.is_some() {}

    println!("Goodbye!");
    Ok(())
}

/// Start the HTTP server
async fn serve(address: Option<String>) -> Result<()> {
    let settings = load_settings()?;
    let orchestrator = build_orchestrator(&settings)?;

    let address = address.unwrap_or_else(|| settings.server.address.clone());
    crate::server::run_server(Arc::new(orchestrator), &address, &settings.server.cors_origin)
        .await
}

fn show_tones() {
    println!("{:<15} DESCRIPTION", "TONE");
    println!("{}", "-".repeat(75));
    for tone in list_tones() {
        println!("{:<15} {}", tone.as_str(), tone.description());
    }
}

fn show_config() -> Result<()> {
    let cfg = load_settings()?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  replybot Configuration");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Reddit:");
    println!("  Client ID:      {}", config::redact(&cfg.reddit.client_id));
    println!("  Client secret:  {}", config::redact(&cfg.reddit.client_secret));
    println!(
        "  Username:       {}",
        cfg.reddit.username.as_deref().unwrap_or("(not set)")
    );
    println!("  Password:       {}", config::redact(&cfg.reddit.password));
    println!("  User agent:     {}", cfg.reddit.user_agent);
    println!("  Can post:       {}", cfg.reddit.can_write());
    println!();
    println!("Gemini:");
    println!("  API key:        {}", config::redact(&cfg.gemini.api_key));
    println!("  Model:          {}", cfg.gemini.model);
    println!("  Temperature:    {}", cfg.gemini.temperature);
    println!("  Max tokens:     {}", cfg.gemini.max_output_tokens);
    println!();
    println!("Schedule:");
    println!("  Subreddits:     {}", cfg.schedule.channels.join(", "));
    let tones: Vec<&str> = cfg.schedule.tones.iter().map(|t| t.as_str()).collect();
    println!("  Tones:          {}", tones.join(", "));
    println!(
        "  Posting hours:  {}:00-{}:00",
        cfg.schedule.window.start_hour, cfg.schedule.window.end_hour
    );
    println!("  Attempts:       {}", cfg.schedule.channel_attempts);
    println!("  Post limit:     {}", cfg.schedule.post_limit);
    println!("  Reply limit:    {}", cfg.schedule.reply_limit);
    println!();
    println!("Server:");
    println!("  Address:        {}", cfg.server.address);
    println!("  CORS origin:    {}", cfg.server.cors_origin);

    Ok(())
}
