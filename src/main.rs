use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use askr::config::{Config, Secrets};
use askr::dispatcher::Dispatcher;
use askr::llm::{GroqClient, Role};
use askr::session::{EntryKind, Session};
use askr::tools::ToolRegistry;
use askr::tui::{self, TuiRunner};
use cli::Cli;
use cli::commands::Commands;

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("askr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("askr.log");

    // The TUI owns stdout, so logs only go to the file
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let default_level = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Wire the model client and tools together; missing secrets stop here
fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let secrets = Secrets::from_env().context("Missing required API keys")?;

    let tools = Arc::new(ToolRegistry::standard(&config.tools, &secrets).context("Failed to set up research tools")?);
    let model = GroqClient::with_api_key(secrets.groq_api_key.clone(), config.model.to_groq())
        .context("Failed to set up model client")?
        .with_tools(tools.definitions());

    info!("Using model {} with tools {:?}", config.model.model, tools.tool_names());
    Ok(Dispatcher::new(Arc::new(model), tools))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let dispatcher = build_dispatcher(config)?;

    match &cli.command {
        None => run_tui(dispatcher, config).await,
        Some(cmd @ Commands::Ask { .. }) => {
            let question = cmd.question().unwrap_or_default();
            handle_ask_command(&dispatcher, &question).await
        }
        Some(Commands::Tools) => handle_tools_command(&dispatcher),
    }
}

async fn run_tui(dispatcher: Dispatcher, config: &Config) -> Result<()> {
    info!("Launching TUI mode");
    let terminal = tui::init_terminal().context("Failed to initialize terminal")?;
    let mut runner = TuiRunner::new(terminal, dispatcher, config.tui.tick_rate_ms, config.tui.scroll_page_size);

    let result = runner.run().await;
    tui::restore_terminal().context("Failed to restore terminal")?;
    result
}

async fn handle_ask_command(dispatcher: &Dispatcher, question: &str) -> Result<()> {
    info!("Answering one-shot question");
    let mut session = Session::new();

    println!("{}", "Processing your question...".dimmed());
    let outcome = session.submit(dispatcher, question).await;

    for entry in session.transcript() {
        let label = format!("{}:", entry.role.label());
        match (entry.kind, entry.role) {
            (EntryKind::Error, _) => println!("{}", entry.text.red()),
            (EntryKind::Normal, Role::User) => println!("{} {}", label.green().bold(), entry.text),
            (EntryKind::Normal, Role::Assistant) => println!("{} {}", label.cyan().bold(), entry.text),
        }
    }

    // The error is already in the transcript; returning it sets the exit status
    outcome.context("Failed to answer question")?;
    Ok(())
}

fn handle_tools_command(dispatcher: &Dispatcher) -> Result<()> {
    println!("{} {}", "Model:".green(), dispatcher.model());
    for tool in dispatcher.tools().iter() {
        println!("  {} - {} ({})", tool.name().cyan(), tool.description(), tool.limits().dimmed());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    setup_logging(&config).context("Failed to setup logging")?;

    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
