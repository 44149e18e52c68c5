//! Source trait for live snapshots

use crate::live::LiveSnapshot;

/// Supplies live snapshots to the refresh loop.
///
/// The engine never reads telemetry itself. Implementations own shared-memory access, replay
/// files or network feeds, and decide how current each snapshot is. Errors are opaque to the
/// engine: the refresh loop logs them and backs off.
#[async_trait::async_trait]
pub trait SnapshotSource: Send + 'static {
    /// Get the current snapshot
    ///
    /// Returns:
    /// - `Ok(Some(snapshot))` - Snapshot to predict from
    /// - `Ok(None)` - Source finished (normal termination)
    /// - `Err(e)` - Transient failure
    async fn next_snapshot(&mut self) -> anyhow::Result<Option<LiveSnapshot>>;
}

/// Source over a fixed sequence of snapshots, ending when it runs out.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSequence {
    snapshots: std::collections::VecDeque<LiveSnapshot>,
}

impl SnapshotSequence {
    pub fn new(snapshots: impl IntoIterator<Item = LiveSnapshot>) -> Self {
        Self { snapshots: snapshots.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.snapshots.len()
    }
}

#[async_trait::async_trait]
impl SnapshotSource for SnapshotSequence {
    async fn next_snapshot(&mut self) -> anyhow::Result<Option<LiveSnapshot>> {
        Ok(self.snapshots.pop_front())
    }
}
