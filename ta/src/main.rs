//! ta - tool-calling LLM agent
//!
//! CLI entry point: load config, run the agent loop on the query, write the
//! session log and print the answer.

use std::fs;

use chrono::Local;
use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use toolagent::cli::{Cli, generate_after_help, log_dir, log_path};
use toolagent::config::Config;
use toolagent::llm::create_client;
use toolagent::prompts::{PromptLoader, PromptVars};
use toolagent::r#loop::{AgentLoop, LoopConfig};
use toolagent::session::{SessionLog, SessionStatus};
use toolagent::tools::{ToolContext, ToolRegistry};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    fs::create_dir_all(log_dir()).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_path()).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // A missing .env is normal; the variables may already be exported
    let dotenv = dotenvy::dotenv().ok();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;
    debug!(?dotenv, "main: environment file");

    config.validate()?;

    let root = config.working_root()?;
    info!("Working root: {}", root.display());

    let ctx = ToolContext::new(&root)
        .with_max_chars(config.agent.max_chars)
        .with_runner(config.runner.settings());
    let registry = ToolRegistry::standard();

    let prompts = PromptLoader::new(config.prompts_dir()?);
    let system_prompt = prompts
        .render(
            &config.prompts.active,
            &PromptVars {
                working_directory: root.display().to_string(),
                tools: registry.summary(),
            },
        )
        .context("Failed to load system prompt")?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let model = config.llm.model();
    info!("Using model {} via {}", model, config.llm.provider);

    let started = Local::now();
    let mut agent = AgentLoop::new(
        LoopConfig::from_config(&config, cli.verbose),
        llm,
        registry,
        ctx,
        system_prompt.clone(),
        cli.query.clone(),
    );
    let outcome = agent.run().await.context("Model request failed")?;

    let log = SessionLog {
        timestamp: started,
        model,
        system_prompt,
        prompt: cli.query,
        response: outcome.answer().map(str::to_string),
        status: SessionStatus::from(&outcome),
        iterations: outcome.iterations(),
        usage: agent.usage().into(),
    };
    if let Err(e) = log.write_to(&config.logs.session_dir) {
        warn!("Failed to write session log: {:#}", e);
    }

    let answer = outcome.into_answer()?;
    if cli.verbose {
        println!();
    }
    println!("{}", answer);
    Ok(())
}
