use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::info;

use crate::format::parse_number;

/// Message shown when the snapshot cannot be read at all.
pub const SNAPSHOT_READ_ERROR: &str = "无法读取 dashboard.json";

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// ─────────────────────────── Wire model ───────────────────────────

/// Root snapshot object produced by the trading pipeline.
///
/// Field types drift between pipeline runs, so scalar leaves stay as
/// raw [`serde_json::Value`] until display time and structured
/// subtrees fall back to their default when the shape is wrong.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub generated_at: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub status: RunStatus,
    #[serde(default, deserialize_with = "lenient")]
    pub portfolio: Portfolio,
    #[serde(default, deserialize_with = "lenient")]
    pub latest_signals: SignalBatch,
    #[serde(default, deserialize_with = "lenient")]
    pub equity_curve: Vec<EquityPoint>,
    #[serde(default, deserialize_with = "lenient")]
    pub history: Vec<HistoryRecord>,
    #[serde(default, deserialize_with = "lenient")]
    pub report_summaries: ReportSummaries,
}

/// Pipeline state stamped by the generator.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RunStatus {
    #[serde(default)]
    pub phase: Value,
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub signal_time: Value,
    #[serde(default)]
    pub exec_time: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub cash: Value,
    #[serde(default)]
    pub positions_count: Value,
    #[serde(default)]
    pub invested_cost: Value,
    #[serde(default)]
    pub exposure: Value,
    #[serde(default)]
    pub last_equity: Value,
    #[serde(default)]
    pub total_return: Value,
    #[serde(default)]
    pub last_trade_time: Value,
    #[serde(default)]
    pub last_update: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub positions: Vec<Position>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub symbol: Value,
    #[serde(default)]
    pub shares: Value,
    #[serde(default)]
    pub avg_cost: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SignalBatch {
    #[serde(default)]
    pub signal_time: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub signals: Vec<Signal>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Signal {
    #[serde(default)]
    pub symbol_code: Value,
    #[serde(default)]
    pub symbol_name: Value,
    #[serde(default)]
    pub action: Value,
    #[serde(default)]
    pub probability: Value,
    #[serde(default)]
    pub has_opportunity: Value,
    #[serde(default)]
    pub trigger_time: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EquityPoint {
    #[serde(default)]
    pub equity: Value,
}

impl EquityPoint {
    /// Plotted sample value; unparseable samples plot as zero so one
    /// bad point cannot poison the axis range.
    pub fn value(&self) -> f64 {
        parse_number(&self.equity).unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub time: Value,
    #[serde(default)]
    pub signal_time: Value,
    #[serde(default)]
    pub price_mode: Value,
    #[serde(default)]
    pub ending_equity: Value,
    #[serde(default)]
    pub realized_pnl: Value,
    #[serde(default)]
    pub orders: Value,
    #[serde(default)]
    pub orders_detail: Value,
}

impl HistoryRecord {
    /// Per-day order rows. `orders_detail` wins over `orders` when both
    /// carry an array; older snapshots stored the list under `orders`
    /// and newer ones keep only a count there.
    pub fn order_list(&self) -> Vec<Order> {
        if let Some(orders) = as_order_list(&self.orders_detail) {
            return orders;
        }
        if let Some(orders) = as_order_list(&self.orders) {
            return orders;
        }
        Vec::new()
    }

    /// Displayed order count: the list length when rows exist, else
    /// whatever numeric count `orders` carries, else zero.
    pub fn order_count(&self, order_list: &[Order]) -> f64 {
        if !order_list.is_empty() {
            return order_list.len() as f64;
        }
        parse_number(&self.orders).unwrap_or(0.0)
    }
}

fn as_order_list(value: &Value) -> Option<Vec<Order>> {
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub symbol: Value,
    #[serde(default)]
    pub action: Value,
    #[serde(default)]
    pub shares: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub gross: Value,
    #[serde(default)]
    pub costs: Value,
    #[serde(default)]
    pub total: Value,
}

impl Order {
    /// Fee total: `costs.total_cost`, else `costs.total`, else zero.
    /// An explicit zero is kept, only null or absence falls through.
    pub fn total_cost(&self) -> Value {
        for key in ["total_cost", "total"] {
            if let Some(v) = self.costs.get(key) {
                if !v.is_null() {
                    return v.clone();
                }
            }
        }
        Value::from(0)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportSummaries {
    #[serde(default, deserialize_with = "lenient")]
    pub research: ReportSummary,
    #[serde(default, deserialize_with = "lenient", rename = "data")]
    pub data_report: ReportSummary,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub updated_at: Value,
    #[serde(default)]
    pub summary: Value,
}

// ───────────────────────────── Loader ─────────────────────────────

/// Where the snapshot comes from. Anything that does not look like an
/// http(s) URL is treated as a filesystem path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotSource {
    Url(String),
    File(PathBuf),
}

impl SnapshotSource {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads and parses the snapshot in one shot. No retries: a failure
/// surfaces in the header and the user reloads manually.
pub async fn load_snapshot(source: &SnapshotSource) -> Result<DashboardSnapshot> {
    let body = match source {
        SnapshotSource::Url(url) => {
            let response = reqwest::get(url.as_str()).await?;
            if !response.status().is_success() {
                return Err(anyhow!(SNAPSHOT_READ_ERROR));
            }
            response.text().await?
        }
        SnapshotSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .context(SNAPSHOT_READ_ERROR)?,
    };

    let snapshot: DashboardSnapshot = serde_json::from_str(&body)?;
    info!(
        "Loaded dashboard snapshot from {} ({} bytes, {} history records)",
        source,
        body.len(),
        snapshot.history.len()
    );
    Ok(snapshot)
}
