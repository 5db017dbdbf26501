//! Fetch worker: owns the tokio runtime and executes backend commands
//! sequentially, posting results back to the UI thread as events.

use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use directory_client::DirectoryClient;
use tracing::{debug, error};
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{BatchOrigin, FetchFailure, UiEvent};
use crate::ui::avatar::AvatarImage;

/// Batch size for the initial load and every refresh.
pub const SCREEN_BATCH_SIZE: usize = 10;

pub fn launch(endpoint: Url, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "fetch worker startup failure: failed to build runtime: {err}"
                )));
                error!("failed to build fetch worker runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = DirectoryClient::new(endpoint);
            // Commands run one at a time: rapid add presses queue up instead
            // of racing, and responses apply in issue order.
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadInitial => {
                        run_batch(&client, BatchOrigin::Initial, &ui_tx).await;
                    }
                    BackendCommand::Refresh => {
                        run_batch(&client, BatchOrigin::Refresh, &ui_tx).await;
                    }
                    BackendCommand::AddOne => match client.fetch_one().await {
                        Ok(user) => {
                            let _ = ui_tx.try_send(UiEvent::UserAdded(Box::new(user)));
                        }
                        Err(err) => {
                            debug!("add-one fetch failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::AddFailed(FetchFailure::from(&err)));
                        }
                    },
                    BackendCommand::FetchAvatarImage { user_id, url } => {
                        match load_avatar_image(&client, &url).await {
                            Ok(image) => {
                                let _ =
                                    ui_tx.try_send(UiEvent::AvatarImageLoaded { user_id, image });
                            }
                            Err(err) => {
                                debug!(user_id = user_id.0, "avatar fetch failed: {err:#}");
                                let _ = ui_tx.try_send(UiEvent::AvatarImageFailed {
                                    user_id,
                                    reason: format!("{err:#}"),
                                });
                            }
                        }
                    }
                }
            }
            debug!("ui command queue disconnected; fetch worker exiting");
        });
    });
}

async fn run_batch(client: &DirectoryClient, origin: BatchOrigin, ui_tx: &Sender<UiEvent>) {
    match client.fetch_batch(SCREEN_BATCH_SIZE).await {
        Ok(users) => {
            let _ = ui_tx.try_send(UiEvent::BatchLoaded { origin, users });
        }
        Err(err) => {
            debug!(?origin, "batch fetch failed: {err}");
            let _ = ui_tx.try_send(UiEvent::BatchFailed {
                origin,
                failure: FetchFailure::from(&err),
            });
        }
    }
}

async fn load_avatar_image(client: &DirectoryClient, url: &str) -> Result<AvatarImage> {
    let bytes = client
        .fetch_image_bytes(url)
        .await
        .context("download avatar")?;
    let decoded = image::load_from_memory(&bytes).context("decode avatar")?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(AvatarImage {
        width: width as usize,
        height: height as usize,
        rgba: rgba.into_raw(),
    })
}
