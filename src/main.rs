use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use picture_frame::config::Configuration;
use picture_frame::delay::SlideDelay;
use picture_frame::events::ShowPicture;
use picture_frame::store::PictureStore;
use picture_frame::system::PowerController;
use picture_frame::tasks::files::ImageLibrary;
use picture_frame::tasks::{slideshow, viewer};
use picture_frame::web::{self, AppState, Assets};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(
    name = "picture-frame",
    version,
    about = "Digital picture frame with a remote control surface"
)]
struct Cli {
    /// Path to YAML config file. Defaults apply when it does not exist.
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Override the slide delay (ms)
    #[arg(long, value_name = "MILLIS")]
    delay_ms: Option<u64>,

    /// Override the control server bind address
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("picture_frame={level}").parse()?)
        .add_directive("hyper=warn".parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Configuration> {
    let mut cfg = if cli.config.exists() {
        Configuration::from_yaml_file(&cli.config)
            .with_context(|| format!("loading config from {}", cli.config.display()))?
    } else {
        info!(path = %cli.config.display(), "config file not found; using defaults");
        Configuration::default()
    };
    if let Some(ms) = cli.delay_ms {
        cfg.delay = Duration::from_millis(ms);
    }
    if let Some(bind) = cli.bind {
        cfg.bind_address = bind;
    }
    cfg.validated().context("validating configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let cfg = load_config(&cli)?;

    let library = ImageLibrary::new(&cfg.images_folder, &cfg.default_image);
    library
        .ensure_exists()
        .await
        .with_context(|| format!("creating {}", cfg.images_folder.display()))?;

    let cancel = CancellationToken::new();
    let store = Arc::new(PictureStore::new(cfg.default_image.clone()));
    let delay = SlideDelay::new(cfg.delay);
    let (show_tx, show_rx) = mpsc::channel::<ShowPicture>(cfg.channel_capacity);

    let state = AppState {
        store: store.clone(),
        library,
        delay: delay.clone(),
        power: PowerController::new(cfg.power.clone(), cancel.clone()),
        assets: Arc::new(Assets::from_config(&cfg)),
    };
    let mut tasks = JoinSet::new();
    tasks.spawn({
        let cancel = cancel.clone();
        let bind = cfg.bind_address;
        async move {
            web::serve(state, bind, cancel)
                .await
                .context("control server task failed")
        }
    });
    tasks.spawn({
        let folder = cfg.images_folder.clone();
        let cancel = cancel.clone();
        async move {
            slideshow::run(store, folder, delay, show_tx, cancel)
                .await
                .context("slideshow task failed")
        }
    });
    tasks.spawn({
        let cancel = cancel.clone();
        async move {
            viewer::run(show_rx, None, cancel)
                .await
                .context("viewer task failed")
        }
    });

    // Any task ending on its own takes the whole frame down with it.
    tokio::select! {
        _ = cancel.cancelled() => info!("stop requested"),
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                error!(error = %err, "listening for ctrl-c failed");
            }
            info!("interrupt received");
        }
        Some(res) = tasks.join_next() => {
            match res {
                Ok(Ok(())) => warn!("task exited early"),
                Ok(Err(e)) => error!("task error: {e:?}"),
                Err(e) => error!("join error: {e}"),
            }
        }
    }
    cancel.cancel();

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("task error: {e:?}"),
            Err(e) => error!("join error: {e}"),
        }
    }
    info!("picture frame stopped");
    Ok(())
}
