use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use fractview_core::Viewport;
use fractview_render::{ColorizerKind, RenderConfig, RenderRequest};

use crate::session::SessionStep;

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Everything the driver needs: the starting view, how to render it, and
/// the scripted session to replay on top of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub viewport: Viewport,
    pub max_iterations: u32,
    pub colorizer: ColorizerKind,
    pub render: RenderConfig,
    /// Block on every frame before replaying the next step. When false,
    /// frames are left in flight and newer ones supersede them.
    pub wait_each_frame: bool,
    pub session: Vec<SessionStep>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            max_iterations: RenderRequest::DEFAULT_MAX_ITERATIONS,
            colorizer: ColorizerKind::default(),
            render: RenderConfig::default(),
            wait_each_frame: true,
            session: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            steps = config.session.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The request for the starting view.
    pub fn initial_request(&self) -> fractview_core::Result<RenderRequest> {
        RenderRequest::new(self.viewport, self.max_iterations, self.colorizer)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
