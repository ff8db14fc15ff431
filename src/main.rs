use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use larder_gateway::parser::{variants_of, Unit};
use larder_gateway::voice::mime_for_extension;
use larder_gateway::{CommandParser, Config, SpeechToText, VoicePipeline};

/// Larder - voice command processing for household inventory
#[derive(Parser)]
#[command(name = "larder", version, about)]
struct Cli {
    /// Path to a config file (defaults to the platform config dir)
    #[arg(long, env = "LARDER_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a typed command into a structured instruction
    Parse {
        /// Command text, e.g. "add 2 pounds of chicken to the fridge"
        text: String,
    },
    /// Transcribe an audio file and parse the transcript
    Transcribe {
        /// Path to the audio file (wav, mp3, m4a, ogg, webm, flac)
        file: PathBuf,

        /// Language hint (ISO 639-1)
        #[arg(short, long)]
        language: Option<String>,
    },
    /// List canonical units and their accepted spellings
    Units,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,larder_gateway=info",
        1 => "info,larder_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Parse { text } => cmd_parse(&text),
        Command::Transcribe { file, language } => {
            cmd_transcribe(cli.config.as_deref(), &file, language.as_deref()).await
        }
        Command::Units => cmd_units(),
    }
}

fn cmd_parse(text: &str) -> anyhow::Result<()> {
    let parser = CommandParser::new();
    let result = parser.parse(text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn cmd_transcribe(
    config_path: Option<&std::path::Path>,
    file: &std::path::Path,
    language: Option<&str>,
) -> anyhow::Result<()> {
    let config = Config::load_from(config_path)?;
    let audio = tokio::fs::read(file).await?;

    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("audio.wav");
    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let content_type = mime_for_extension(&extension);

    let pipeline = VoicePipeline::new(SpeechToText::new(config.stt));
    let outcome = pipeline
        .process(&audio, filename, content_type, language)
        .await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn cmd_units() -> anyhow::Result<()> {
    for unit in Unit::ALL {
        println!("{}: {}", unit.as_str(), variants_of(unit).join(", "));
    }
    Ok(())
}
