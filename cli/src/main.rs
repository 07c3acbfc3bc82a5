use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;
use wayfinder_core::{
    Agent, AgentConfig, HttpGateway, StepKind, ToolRegistry, config, register_builtin_tools,
};

#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(about = "Location-services agent: places, directions, geocoding", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single request and exit
    Ask {
        /// The request, e.g. "find coffee near me"
        text: Vec<String>,
    },
    /// Interactive session (default)
    Repl,
    /// List the available tools
    Tools,
    /// Show the active configuration, or write a default config file
    Config {
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Repl);

    let cfg = if config::config_exists() {
        config::load_config()?
    } else {
        AgentConfig::default()
    };

    init_logging(cfg.verbose);

    match command {
        Commands::Ask { text } => {
            let request = text.join(" ");
            if request.trim().is_empty() {
                anyhow::bail!("Nothing to ask. Try: wayfinder ask find coffee near me");
            }
            let mut agent = build_agent(cfg);
            run_once(&mut agent, &request).await;
        }
        Commands::Repl => {
            let agent = build_agent(cfg);
            run_repl(agent).await?;
        }
        Commands::Tools => {
            let registry = build_registry(&cfg);
            for spec in registry.list() {
                println!("{}  {}", style(&spec.name).cyan().bold(), spec.description);
            }
        }
        Commands::Config { save } => {
            if save {
                config::save_config(&cfg)?;
                println!("Wrote {}", config::get_config_path().display());
            } else {
                println!("{}", toml_dump(&cfg));
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_registry(cfg: &AgentConfig) -> Arc<ToolRegistry> {
    let mut gateway = HttpGateway::new(cfg.resolve_api_key());
    if let Some(url) = &cfg.gateway_url {
        gateway = gateway.with_base_url(url.clone());
    }

    let mut registry = ToolRegistry::new();
    register_builtin_tools(&mut registry, Arc::new(gateway));
    Arc::new(registry)
}

fn build_agent(cfg: AgentConfig) -> Agent {
    let registry = build_registry(&cfg);
    Agent::new(cfg, registry)
}

/// Pull the step trace for one request, render it as it arrives, and
/// record the exchange in the agent's history.
async fn run_once(agent: &mut Agent, request: &str) {
    let mut sequence = agent.run(request);
    let mut steps = Vec::new();
    while let Some(step) = sequence.next_step().await {
        match step.kind {
            StepKind::Think => {
                println!("{}", style(format!("🤔 {}", step.content)).dim());
            }
            StepKind::Act => {
                let name = step
                    .tool_call
                    .as_ref()
                    .map(|c| c.name.as_str())
                    .unwrap_or("tool");
                println!("{}", style(format!("🔧 {}", name)).cyan());
            }
            StepKind::Observe => {
                println!("{}", style(format!("👁  {}", step.content)).dim());
            }
            StepKind::Answer => {
                println!("\n{}", step.content);
            }
        }
        steps.push(step);
    }
    agent.record_exchange(request, &steps);
}

async fn run_repl(mut agent: Agent) -> Result<()> {
    println!("🧭 Wayfinder: ask about places, routes, and distances.");
    println!("Type 'clear' to reset history, 'exit' or Ctrl-D to quit.\n");

    let mut editor = DefaultEditor::new()?;
    let history_path = config::get_wayfinder_dir().join("history.txt");
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(input);

                match input {
                    "exit" | "quit" => break,
                    "clear" => {
                        agent.clear_history();
                        println!("History cleared.\n");
                    }
                    _ => {
                        run_once(&mut agent, input).await;
                        println!();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Read error: {e}");
                break;
            }
        }
    }

    let _ = editor.save_history(&history_path);
    println!("👋 Goodbye!");
    Ok(())
}

fn toml_dump(cfg: &AgentConfig) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|_| "<unprintable config>".to_string())
}
