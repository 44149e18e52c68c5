//! Driver spawns and manages the live refresh task

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::live::{LiveSnapshot, PredictedStandings, Predictor};
use crate::source::SnapshotSource;

/// Consecutive source failures tolerated before the loop gives up.
pub const MAX_ERRORS: u32 = 10;

/// Result of spawning the refresh task
pub struct DriverChannels {
    /// Receiver for predicted standings; `None` before the first prediction and after shutdown
    pub standings: watch::Receiver<Option<Arc<PredictedStandings>>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns and manages the refresh task
///
/// The task owns the source, asks it for a snapshot once per interval and publishes the
/// prediction. An unchanged snapshot is not recomputed.
pub struct Driver;

impl Driver {
    /// Spawn the refresh task for `source`, recomputing at most once per `interval`.
    pub fn spawn<S>(predictor: Arc<Predictor>, source: S, interval: Duration) -> DriverChannels
    where
        S: SnapshotSource,
    {
        let (standings_tx, standings_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        tokio::spawn(async move {
            Self::refresh_task(predictor, source, interval, standings_tx, cancel_task).await;
        });

        DriverChannels { standings: standings_rx, cancel }
    }

    async fn refresh_task<S>(
        predictor: Arc<Predictor>,
        mut source: S,
        interval: Duration,
        standings_tx: watch::Sender<Option<Arc<PredictedStandings>>>,
        cancel: CancellationToken,
    ) where
        S: SnapshotSource,
    {
        info!(interval_ms = interval.as_millis() as u64, "Refresh task started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut refresh_count = 0u64;
        let mut error_count = 0u32;
        let mut last_snapshot: Option<LiveSnapshot> = None;

        loop {
            if cancel.is_cancelled() {
                info!("Refresh task cancelled");
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Refresh task cancelled while waiting");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Refresh task cancelled during read");
                    break;
                }
                result = source.next_snapshot() => result,
            };

            match result {
                Ok(Some(snapshot)) => {
                    error_count = 0;

                    if last_snapshot.as_ref() == Some(&snapshot) {
                        trace!("Snapshot unchanged, keeping previous prediction");
                        continue;
                    }

                    let predicted = predictor.predict(&snapshot);
                    refresh_count += 1;
                    trace!(
                        refresh = refresh_count,
                        subsession_id = %snapshot.subsession_id,
                        classes = predicted.car_class_ids.len(),
                        "Published prediction"
                    );
                    last_snapshot = Some(snapshot);

                    if standings_tx.send(Some(Arc::new(predicted))).is_err() {
                        debug!("Standings receiver dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!(refreshes = refresh_count, "Snapshot source ended");
                    let _ = standings_tx.send(None);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!(error = %e, "Snapshot source error ({}/{})", error_count, MAX_ERRORS);

                    if error_count >= MAX_ERRORS {
                        error!("Too many snapshot source errors, shutting down");
                        let _ = standings_tx.send(None);
                        break;
                    }

                    // Exponential backoff: 100ms, 200ms, 400ms, ... capped at 1.6s
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("Refresh task cancelled during backoff");
                            break;
                        }
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        info!(refreshes = refresh_count, "Refresh task ended");
    }
}
