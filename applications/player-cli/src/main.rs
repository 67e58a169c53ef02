//! Minarets Player - command-line concert player
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use minarets_client::MinaretsClient;
use minarets_core::{ConcertId, PlaylistId};
use minarets_playback::{annotations, resolver, PlayableRef, PlayerSession, ShuffleMode};
use minarets_player::{report, run_until_idle, AppConfig, SimulatedOutput};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minarets-player")]
#[command(about = "Stream concert recordings from the Minarets archive", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./minarets.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the time markers found in a concert note
    Annotations {
        /// File holding the note text
        file: PathBuf,
    },
    /// Resolve a concert or playlist into playable units
    Resolve {
        #[command(flatten)]
        target: Target,
    },
    /// Play a concert or playlist through a simulated output
    Play {
        #[command(flatten)]
        target: Target,

        /// Shuffle everything after the first unit
        #[arg(long, value_enum)]
        shuffle: Option<ShuffleArg>,

        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Concert id
    #[arg(long)]
    concert: Option<String>,

    /// Playlist id
    #[arg(long)]
    playlist: Option<String>,
}

impl Target {
    fn reference(&self) -> anyhow::Result<PlayableRef> {
        match (&self.concert, &self.playlist) {
            (Some(id), _) => Ok(PlayableRef::Concert(ConcertId::new(id.as_str()))),
            (None, Some(id)) => Ok(PlayableRef::Playlist(PlaylistId::new(id.as_str()))),
            (None, None) => anyhow::bail!("either --concert or --playlist is required"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ShuffleArg {
    Random,
    Smart,
}

impl From<ShuffleArg> for ShuffleMode {
    fn from(arg: ShuffleArg) -> Self {
        match arg {
            ShuffleArg::Random => ShuffleMode::Random,
            ShuffleArg::Smart => ShuffleMode::Smart,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minarets_player=info,minarets_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Annotations { file } => {
            show_annotations(&file)?;
        }
        Commands::Resolve { target } => {
            let config = load_config(cli.config.as_deref())?;
            resolve(&config, &target).await?;
        }
        Commands::Play {
            target,
            shuffle,
            seed,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(mode) = shuffle {
                config.playback.shuffle = mode.into();
            }
            if seed.is_some() {
                config.playback.shuffle_seed = seed;
            }
            play(&config, &target, shuffle.is_some()).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

fn show_annotations(file: &std::path::Path) -> anyhow::Result<()> {
    let note = std::fs::read_to_string(file)
        .with_context(|| format!("reading note file {}", file.display()))?;

    let map = annotations::resolve(Some(&note));
    tracing::info!(
        markers = map.len(),
        rejected = map.rejected().len(),
        "Parsed note"
    );

    for line in report::annotation_lines(&map) {
        println!("{line}");
    }
    Ok(())
}

async fn resolve(config: &AppConfig, target: &Target) -> anyhow::Result<()> {
    let client = MinaretsClient::new(config.client_config())?;
    let reference = target.reference()?;

    let batch = resolver::resolve_reference(&client, &reference).await?;
    tracing::info!(
        units = batch.len(),
        complete = batch.is_complete(),
        "Resolved"
    );

    for line in report::resolved_lines(&batch) {
        println!("{line}");
    }
    Ok(())
}

async fn play(config: &AppConfig, target: &Target, shuffle: bool) -> anyhow::Result<()> {
    let client = MinaretsClient::new(config.client_config())?;
    let reference = target.reference()?;

    let (output, mut callbacks) = SimulatedOutput::new();
    let session = PlayerSession::start(config.playback.clone(), output)?;

    let batch = session.play_references(&client, &[reference]).await?;
    if !batch.is_complete() {
        tracing::warn!(
            missing = batch.missing_concerts.len(),
            "Some concerts could not be loaded; their tracks play in full"
        );
    }
    if shuffle {
        session.shuffle_remaining()?;
    }

    let summary = run_until_idle(&session, &mut callbacks).await?;
    session.shutdown()?;

    tracing::info!(
        started = summary.started,
        finished = summary.finished,
        errors = summary.errors,
        "Playback complete"
    );
    Ok(())
}
