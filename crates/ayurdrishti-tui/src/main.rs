use anyhow::Result;
use clap::{Parser, Subcommand};
use ayurdrishti_core::{BackendClient, Config, Organ};
use ayurdrishti_tui::tui::{self, EventHandler};
use ayurdrishti_tui::{App, handler, logging, oneshot, ui};

#[derive(Parser)]
#[command(name = "ayurdrishti")]
#[command(about = "Identify medicinal plants and ask Ayurveda wellness questions")]
#[command(version)]
struct Cli {
    /// Backend origin (default http://localhost:8000)
    #[arg(long, global = true, env = "AYURDRISHTI_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify a plant from an image file
    Identify {
        /// Path to the image
        image: String,
        /// Plant part shown: leaf, flower, fruit, bark or habit
        #[arg(short, long, value_parser = parse_organ)]
        organ: Option<Organ>,
    },
    /// Ask an Ayurveda wellness question
    Ask {
        /// Your question
        message: String,
    },
    /// Check whether the backend is reachable
    Status,
}

fn parse_organ(s: &str) -> Result<Organ, String> {
    Organ::from_str(s)
        .ok_or_else(|| format!("unknown organ '{}' (leaf, flower, fruit, bark, habit)", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let api_base = config.resolve_api_base(cli.api_base.as_deref());
    let client = BackendClient::new(api_base);

    match cli.command {
        None => run_tui(client, config.organ()).await,
        Some(command) => {
            logging::init_stderr();
            match command {
                Commands::Identify { image, organ } => {
                    oneshot::identify(&client, &image, organ.unwrap_or(config.organ())).await
                }
                Commands::Ask { message } => oneshot::ask(&client, &message).await,
                Commands::Status => oneshot::status(&client).await,
            }
        }
    }
}

async fn run_tui(client: BackendClient, default_organ: Organ) -> Result<()> {
    // Logging is best effort; the TUI works without it.
    let _ = logging::init_file();
    tracing::info!(api_base = %client.base(), "starting tui");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let mut app = App::new(client, default_organ).with_waker(events.waker());
    app.check_backend();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}
