use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Engine tunables. The column layout is fixed and compiled in; only
/// behavior policies live here.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct BoardConfig {
    /// Reject a reorder that names ids missing from the column instead of
    /// dropping them.
    pub strict_reorder: bool,
}
