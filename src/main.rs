use anyhow::Result;
use clap::Parser;
use gemini_chat::app::ChatApp;
use gemini_chat::settings::{GeminiModel, SettingsUpdate};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-chat")]
#[command(about = "Interactive terminal chat with the Gemini API")]
struct CliArgs {
    /// Model to start the session with (gemini-pro or gemini-pro-vision).
    #[arg(long)]
    model: Option<GeminiModel>,

    /// Sampling temperature, clamped to [0, 1].
    #[arg(long)]
    temperature: Option<f32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_chat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    info!("Starting gemini-chat");

    let mut app = ChatApp::new();
    if let Some(model) = args.model {
        app.apply_update(SettingsUpdate::Model(model));
    }
    if let Some(temperature) = args.temperature {
        app.apply_update(SettingsUpdate::Temperature(temperature));
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    app.run(&mut stdin.lock(), &mut stdout.lock()).await?;

    info!("Session ended");
    Ok(())
}
