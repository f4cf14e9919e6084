use serde::{Deserialize, Serialize};

use crate::band::DEFAULT_ROWS_PER_BAND;

/// Execution settings for the offloaded renderer.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Rayon threads for the worker's pool; 0 lets Rayon decide.
    pub threads: usize,
    /// Height of one unit of parallel work, in rows.
    pub rows_per_band: u32,
    /// Split frames into bands across the pool, or render each frame on the
    /// worker thread alone.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            rows_per_band: DEFAULT_ROWS_PER_BAND,
            parallel: true,
        }
    }
}

impl RenderConfig {
    /// `rows_per_band` with zero treated as one row.
    pub fn band_rows(&self) -> u32 {
        self.rows_per_band.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let cfg: RenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RenderConfig::default());
    }

    #[test]
    fn partial_json_overrides() {
        let cfg: RenderConfig = serde_json::from_str(r#"{"threads":2,"rowsPerBand":0}"#).unwrap();
        assert_eq!(cfg.threads, 2);
        assert_eq!(cfg.band_rows(), 1);
        assert!(cfg.parallel);
    }
}
