use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::events::{Displayed, ShowPicture};

/// Headless display sink.
///
/// Resolves each identifier to its file and probes the image header.
/// Missing or unreadable files are logged and skipped so the show keeps
/// rotating. Successful displays are reported on `displayed` when present.
pub async fn run(
    mut from_slideshow: Receiver<ShowPicture>,
    displayed: Option<Sender<Displayed>>,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        select! {
            _ = cancel.cancelled() => break,
            maybe = from_slideshow.recv() => {
                let Some(ShowPicture { identifier, path }) = maybe else {
                    break;
                };
                let probe = path.clone();
                let dims = tokio::task::spawn_blocking(move || image::image_dimensions(&probe)).await?;
                match dims {
                    Ok((width, height)) => {
                        info!(%identifier, width, height, "displaying");
                        if let Some(tx) = &displayed {
                            let _ = tx.send(Displayed { identifier, width, height }).await;
                        }
                    }
                    Err(err) => {
                        warn!(%identifier, path = %path.display(), error = %err, "cannot display picture");
                    }
                }
            }
        }
    }
    Ok(())
}
