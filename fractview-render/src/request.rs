use serde::{Deserialize, Serialize};

use fractview_core::{CoreError, Viewport};

use crate::colorizer::ColorizerKind;

/// Everything needed to produce one frame; no hidden state.
///
/// This is also the message a background worker receives, so it is a plain
/// serde value whose invariants are re-checked on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub viewport: Viewport,
    pub max_iterations: u32,
    pub colorizer: ColorizerKind,
}

impl<'de> Deserialize<'de> for RenderRequest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            viewport: Viewport,
            max_iterations: u32,
            #[serde(default)]
            colorizer: ColorizerKind,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.viewport, raw.max_iterations, raw.colorizer)
            .map_err(serde::de::Error::custom)
    }
}

impl RenderRequest {
    /// Iteration cap used when nothing else is configured.
    pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

    pub fn new(
        viewport: Viewport,
        max_iterations: u32,
        colorizer: ColorizerKind,
    ) -> fractview_core::Result<Self> {
        if max_iterations == 0 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        Ok(Self {
            viewport,
            max_iterations,
            colorizer,
        })
    }

    /// Same view and iteration cap with a different colorizer.
    pub fn with_colorizer(self, colorizer: ColorizerKind) -> Self {
        Self { colorizer, ..self }
    }

    /// Length in bytes of the RGBA buffer this request fills.
    pub fn buffer_len(&self) -> usize {
        let size = self.viewport.size() as usize;
        size * size * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_iterations() {
        let vp = Viewport::default_view(4).unwrap();
        assert_eq!(
            RenderRequest::new(vp, 0, ColorizerKind::Rainbow),
            Err(CoreError::InvalidMaxIterations(0))
        );
    }

    #[test]
    fn buffer_len_is_four_bytes_per_pixel() {
        let vp = Viewport::default_view(600).unwrap();
        let req = RenderRequest::new(vp, 200, ColorizerKind::default()).unwrap();
        assert_eq!(req.buffer_len(), 600 * 600 * 4);
    }

    #[test]
    fn json_shape() {
        let vp = Viewport::default_view(8).unwrap();
        let req = RenderRequest::new(vp, 50, ColorizerKind::Psychedelic).unwrap();
        let json = serde_json::to_value(req).unwrap();
        assert_eq!(json["maxIterations"], 50);
        assert_eq!(json["colorizer"], "psychedelic");
        assert_eq!(json["viewport"]["size"], 8);

        let back: RenderRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn deserialize_rejects_invalid() {
        let bad = r#"{"viewport":{"size":8,"center":{"re":0.0,"im":0.0},"zoom":4.0},"maxIterations":0}"#;
        assert!(serde_json::from_str::<RenderRequest>(bad).is_err());

        let defaulted: RenderRequest = serde_json::from_str(
            r#"{"viewport":{"size":8,"center":{"re":0.0,"im":0.0},"zoom":4.0},"maxIterations":10}"#,
        )
        .unwrap();
        assert_eq!(defaulted.colorizer, ColorizerKind::BlackAndWhite);
    }
}
