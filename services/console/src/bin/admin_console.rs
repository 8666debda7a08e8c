//! services/console/src/bin/admin_console.rs

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use catalog_core::domain::Credentials;
use clap::{Parser, Subcommand};
use console_lib::{
    adapters::{CookieJar, HexApiAdapter},
    app::{Console, Flow, NoticeLevel, Services},
    config::Config,
    error::ConsoleError,
    view,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "admin-console")]
#[command(about = "Manage the product catalog from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Where the session cookie is kept (overrides COOKIE_PATH)
    #[arg(long, value_name = "FILE")]
    cookie: Option<PathBuf>,

    /// Log level (overrides RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Run the interactive console (the default)
    Shell,
    /// Sign in once and store the session cookie
    Login {
        username: String,
        #[arg(long, env = "CATALOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Print the product table using the stored session
    List,
}

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(cookie) = cli.cookie {
        config.cookie_path = cookie;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api_base = %config.api_base, "Configuration loaded");

    // --- 2. Initialize Service Adapters ---
    let api = Arc::new(HexApiAdapter::from_config(&config)?);
    let services = Services {
        auth: api.clone(),
        products: api,
        tokens: Arc::new(CookieJar::new(config.cookie_path.clone())),
    };
    let mut console = Console::new(services);

    // --- 3. Run the Requested Mode ---
    match cli.command.unwrap_or(Mode::Shell) {
        Mode::Login { username, password } => {
            console.sign_in(Credentials { username, password }).await?;
            println!("Signed in. Session saved to {}", config.cookie_path.display());
            for notice in console.state_mut().take_notices() {
                if notice.level == NoticeLevel::Error {
                    eprintln!("{}", notice.text);
                }
            }
        }
        Mode::List => {
            console.init().await;
            print_screen(&mut console);
        }
        Mode::Shell => run_shell(&mut console).await?,
    }

    Ok(())
}

/// Reads one command per line until `quit` or end of input.
async fn run_shell(console: &mut Console) -> Result<(), ConsoleError> {
    console.init().await;
    print_screen(console);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if console.handle_line(&line).await == Flow::Quit {
            break;
        }
        print_screen(console);
    }
    info!("Console closed");
    Ok(())
}

fn print_screen(console: &mut Console) {
    println!("{}", view::render(console.state()));
    console.state_mut().take_notices();
}
