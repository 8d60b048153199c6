use crate::data::SnapshotSource;

/// Env var consulted for the snapshot location when --data is absent.
pub const SNAPSHOT_ENV_VAR: &str = "TRADEDASH_DATA";

/// Default snapshot location, the path the pipeline writes to.
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/dashboard.json";

/// Position rows shown in the portfolio panel before truncation.
pub const MAX_POSITION_ROWS: usize = 12;

/// Input poll cadence for the event loop, roughly 60 fps.
pub const EVENT_POLL_MILLIS: u64 = 16;

/// Picks the snapshot source: the CLI flag wins, then the environment
/// variable, then the default path next to the binary.
pub fn resolve_snapshot_source(cli_value: Option<&str>) -> SnapshotSource {
    if let Some(value) = cli_value {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return SnapshotSource::parse(trimmed);
        }
    }

    if let Ok(value) = std::env::var(SNAPSHOT_ENV_VAR) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return SnapshotSource::parse(trimmed);
        }
    }

    SnapshotSource::parse(DEFAULT_SNAPSHOT_PATH)
}
