//! Championship configuration
//!
//! Loaded from YAML; every field has a default so an empty document is a valid configuration.
//!
//! ```yaml
//! series_id: 285
//! count_best_of: 10
//! excluded_track_ids: [18]
//! points_per_split:
//!   0: [25, 22, 20, 18, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]
//!   1: [14, 12, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]
//!   2: [9, 6, 4, 3, 2, 1]
//! car_class_ids: [84, 83]
//! refresh_seconds: 5
//! show_top_n: 10
//! ```

use crate::scoring::PointsSchedule;
use crate::types::{CarClassId, SeriesId, TrackId};
use crate::{Result, StandingsError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding [`ChampionshipConfig::refresh_seconds`].
pub const REFRESH_SECONDS_ENV: &str = "STANDINGS_REFRESH_SECONDS";
/// Environment variable overriding [`ChampionshipConfig::count_best_of`].
pub const COUNT_BEST_OF_ENV: &str = "STANDINGS_COUNT_BEST_OF";

/// Series scored when none is configured.
pub const DEFAULT_SERIES_ID: SeriesId = SeriesId(285);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChampionshipConfig {
    pub series_id: SeriesId,
    /// Number of best results counted per driver.
    pub count_best_of: usize,
    pub points_per_split: PointsSchedule,
    /// Results at these tracks are ignored (e.g. non-championship rounds).
    pub excluded_track_ids: Vec<TrackId>,
    /// Classes reported live. Empty means every class racing in the snapshot.
    pub car_class_ids: Vec<CarClassId>,
    pub refresh_seconds: u64,
    /// Rows shown per class by display clients.
    pub show_top_n: usize,
}

impl Default for ChampionshipConfig {
    fn default() -> Self {
        Self {
            series_id: DEFAULT_SERIES_ID,
            count_best_of: 10,
            points_per_split: PointsSchedule::default(),
            excluded_track_ids: Vec::new(),
            car_class_ids: Vec::new(),
            refresh_seconds: 5,
            show_top_n: 10,
        }
    }
}

impl ChampionshipConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ChampionshipConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| StandingsError::parse_error("Championship config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| StandingsError::file_error(path.to_path_buf(), e))?;
        let config = Self::from_yaml(&yaml)?;
        debug!(path = %path.display(), series_id = %config.series_id, "Loaded championship config");
        Ok(config)
    }

    /// Apply `STANDINGS_*` environment overrides, then re-validate.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(REFRESH_SECONDS_ENV) {
            self.refresh_seconds = raw.trim().parse().map_err(|_| {
                StandingsError::config_error(format!("{REFRESH_SECONDS_ENV} is not a number: {raw}"))
            })?;
        }
        if let Some(raw) = lookup(COUNT_BEST_OF_ENV) {
            self.count_best_of = raw.trim().parse().map_err(|_| {
                StandingsError::config_error(format!("{COUNT_BEST_OF_ENV} is not a number: {raw}"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.count_best_of == 0 {
            return Err(StandingsError::config_error("count_best_of must be positive"));
        }
        if self.refresh_seconds == 0 {
            return Err(StandingsError::config_error("refresh_seconds must be positive"));
        }
        for (split, table) in self.points_per_split.iter() {
            if table.windows(2).any(|pair| pair[0] < pair[1]) {
                return Err(StandingsError::config_error(format!(
                    "points for split {split} must not increase with finishing position"
                )));
            }
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_seconds)
    }

    pub fn is_excluded_track(&self, track_id: TrackId) -> bool {
        self.excluded_track_ids.contains(&track_id)
    }
}
