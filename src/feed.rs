//! Live standings feed
//!
//! Owns a running refresh task and hands its predictions to any number of subscribers.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use pitwall_standings::{ChampionshipConfig, LiveFeed, Predictor, SnapshotSequence};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> pitwall_standings::Result<()> {
//! let config = ChampionshipConfig::load("championship.yaml")?.with_env_overrides()?;
//! let history = pitwall_standings::schema::load_results("results.json")?;
//! let predictor = Arc::new(Predictor::new(config.clone(), history));
//!
//! let feed = LiveFeed::start(predictor, SnapshotSequence::default(), config.refresh_interval());
//! let mut updates = feed.subscribe(Some(Duration::from_secs(1)));
//! while let Some(predicted) = updates.next().await {
//!     if let Some(class) = predicted.own_class() {
//!         for row in class.top(config.show_top_n) {
//!             println!("{:>3} {:<24} {:+}", row.predicted_position, row.driver_name, row.change);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::driver::Driver;
use crate::live::{PredictedStandings, Predictor};
use crate::source::SnapshotSource;
use crate::stream::ThrottleExt;
use crate::{Result, StandingsError};

/// Handle to a running refresh task. Dropping it stops the task.
pub struct LiveFeed {
    standings: watch::Receiver<Option<Arc<PredictedStandings>>>,
    cancel: CancellationToken,
}

impl LiveFeed {
    /// Start refreshing from `source` once per `interval`.
    pub fn start<S: SnapshotSource>(
        predictor: Arc<Predictor>,
        source: S,
        interval: Duration,
    ) -> Self {
        info!(interval_ms = interval.as_millis() as u64, "Starting live feed");
        let channels = Driver::spawn(predictor, source, interval);
        Self { standings: channels.standings, cancel: channels.cancel }
    }

    /// Most recent prediction, if any.
    pub fn latest(&self) -> Option<Arc<PredictedStandings>> {
        self.standings.borrow().clone()
    }

    /// Wait for the first prediction.
    ///
    /// Fails with [`StandingsError::Timeout`] if none arrives in time, or
    /// [`StandingsError::Source`] if the source ends first.
    pub async fn wait_for_first(&self, timeout: Duration) -> Result<Arc<PredictedStandings>> {
        let mut rx = self.standings.clone();
        let waited = tokio::time::timeout(timeout, async {
            loop {
                if let Some(predicted) = rx.borrow_and_update().clone() {
                    return Some(predicted);
                }
                if rx.changed().await.is_err() {
                    return None;
                }
            }
        })
        .await;

        match waited {
            Ok(Some(predicted)) => Ok(predicted),
            Ok(None) => Err(StandingsError::source_failed(
                "snapshot source ended before the first prediction",
            )),
            Err(_) => Err(StandingsError::Timeout { duration: timeout }),
        }
    }

    /// Stream of predictions.
    ///
    /// With `min_interval` set, emits at most once per interval, latest wins.
    pub fn subscribe(
        &self,
        min_interval: Option<Duration>,
    ) -> impl Stream<Item = Arc<PredictedStandings>> + 'static {
        let updates =
            WatchStream::new(self.standings.clone()).filter_map(|opt| async move { opt });

        match min_interval {
            None => updates.boxed(),
            Some(interval) => updates.throttle(interval).boxed(),
        }
    }

    /// Stop the refresh task. Subscribers' streams end.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        debug!("Dropping live feed");
        self.cancel.cancel();
    }
}
