//! Tokio driver for the navigation engine.
//!
//! Spawns one task that owns the sampler, the engine and the page
//! collaborators, clocked by a fixed interval standing in for the host's
//! redraw signal. External scroll notices arrive over an mpsc channel and
//! are drained at the top of each tick; the engine collapses any burst into
//! a single reconciliation pass.

use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::navigator::NavigationEngine;
use crate::feed::{ActionExecutor, FeedSurface, ItemDirectory};
use crate::input::{InputDevice, PadSampler};

/// Handle for the engine task: scroll-notice intake and graceful shutdown.
#[derive(Debug)]
pub struct NavigatorHandle {
    scroll_tx: mpsc::Sender<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task_handle: Option<JoinHandle<()>>,
}

impl NavigatorHandle {
    /// Initializes the sampler and spawns the frame loop over `page`.
    pub fn spawn<P>(config: EngineConfig, mut page: P) -> Result<Self, EngineError>
    where
        P: ItemDirectory + FeedSurface + ActionExecutor<<P as ItemDirectory>::Item>,
        P: Send + 'static,
        <P as ItemDirectory>::Item: Send + 'static,
    {
        info!("Spawning navigator with config: {:?}", config);

        let mut sampler = PadSampler::create()?.initialize()?;
        let mut engine: NavigationEngine<<P as ItemDirectory>::Item> =
            NavigationEngine::new(&config);

        let (scroll_tx, mut scroll_rx) = mpsc::channel::<()>(64);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let frame_interval = Duration::from_millis(config.frame_interval_ms.max(1));
        let task_handle = tokio::spawn(async move {
            info!(
                "Navigator frame loop started ({}ms interval)",
                frame_interval.as_millis()
            );
            let mut interval = tokio::time::interval(frame_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        info!("Navigator shutdown signal received");
                        break;
                    }
                    _ = interval.tick() => {
                        while scroll_rx.try_recv().is_ok() {
                            engine.note_external_scroll();
                        }
                        let frame = sampler.sample();
                        engine.tick(Instant::now(), frame.as_ref(), &mut page);
                    }
                }
            }
            info!("Navigator frame loop finished");
        });

        Ok(Self {
            scroll_tx,
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
        })
    }

    /// Sender for external scroll notices. Hosts push one `()` per observed
    /// scroll event; backpressure loss is harmless since notices coalesce.
    pub fn scroll_notifier(&self) -> mpsc::Sender<()> {
        self.scroll_tx.clone()
    }

    /// Gracefully stops the frame loop and waits for the task to finish.
    pub async fn shutdown(&mut self) -> Result<(), EngineError> {
        debug!("Sending shutdown signal to navigator");
        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                warn!("Navigator task already terminated");
            }
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(()) => {
                    debug!("Navigator task completed");
                    Ok(())
                }
                Err(e) => {
                    error!("Navigator task panicked: {}", e);
                    Err(EngineError::TaskError(format!(
                        "Navigator task panicked: {}",
                        e
                    )))
                }
            }
        } else {
            debug!("Navigator already shut down");
            Ok(())
        }
    }
}
