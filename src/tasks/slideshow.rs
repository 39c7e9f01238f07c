use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::delay::SlideDelay;
use crate::events::ShowPicture;
use crate::store::PictureStore;

/// Paces the show: pulls the next frame from the store, hands it to the
/// viewer, then waits for the current delay.
///
/// A delay change made while waiting applies to the following wait.
#[instrument(skip_all, fields(folder = %images_folder.display()))]
pub async fn run(
    store: Arc<PictureStore>,
    images_folder: PathBuf,
    delay: SlideDelay,
    to_viewer: Sender<ShowPicture>,
    cancel: CancellationToken,
) -> Result<()> {
    info!(delay = %humantime::format_duration(delay.get()), "slideshow started");
    loop {
        match store.next() {
            Some(identifier) => {
                let path = images_folder.join(&identifier);
                debug!(%identifier, "next frame");
                select! {
                    _ = cancel.cancelled() => break,
                    res = to_viewer.send(ShowPicture { identifier, path }) => {
                        if res.is_err() {
                            warn!("viewer channel closed");
                            break;
                        }
                    }
                }
            }
            None => warn!("rotation is empty; nothing to show"),
        }

        select! {
            _ = cancel.cancelled() => break,
            _ = sleep(delay.get()) => {}
        }
    }
    info!("slideshow stopped");
    Ok(())
}
