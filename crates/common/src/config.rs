//! Layout and timing constants.
//!
//! Every position is a fraction of the viewport so the layout is independent of
//! the actual pixel resolution. Defaults are measured against the 2560x1440
//! reference background.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::{Paint, Rgba, StrokeCap, TextAlign};

/// Errors from loading or validating a [`LayoutConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f32 },
    #[error("ground ratio {ground} must lie below the launcher anchor ratio {launcher}")]
    GroundAboveLauncher { ground: f32, launcher: f32 },
    #[error("{0} must be non-zero")]
    ZeroInterval(&'static str),
}

/// Fixed layout, styling and cadence of the slingshot view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Launcher pivot as a fraction of (width, height).
    pub launcher_anchor: Vec2,
    /// Ground line as a fraction of height.
    pub ground_ratio: f32,
    /// Fork tip whose connector is painted before the mounted body.
    pub fork_back: Vec2,
    /// Fork tip whose connector is painted over the mounted body.
    pub fork_front: Vec2,
    /// Connector strokes end this fraction of the body width left of its center.
    pub connector_offset: f32,
    pub frame_interval_ms: u64,
    /// Wait slice of the readiness barrier.
    pub ready_poll_ms: u64,
    pub stroke_color: Rgba,
    pub stroke_width: f32,
    pub overlay_color: Rgba,
    /// Overlay text size as a fraction of the smaller viewport side.
    pub overlay_text_scale: f32,
    /// Overlay baseline as a fraction of height.
    pub overlay_y_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            launcher_anchor: Vec2::new(370.0 / 2560.0, 942.0 / 1440.0),
            ground_ratio: 1236.0 / 1440.0,
            fork_back: Vec2::new(410.0 / 2560.0, 940.0 / 1440.0),
            fork_front: Vec2::new(338.0 / 2560.0, 945.0 / 1440.0),
            connector_offset: 0.25,
            frame_interval_ms: 50,
            ready_poll_ms: 100,
            stroke_color: Rgba::rgb(0x55, 0x28, 0x0f),
            stroke_width: 30.0,
            overlay_color: Rgba::rgba(0x6d, 0x83, 0x46, 0xaa),
            overlay_text_scale: 1.0 / 3.0,
            overlay_y_ratio: 0.6,
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON document. Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratios = [
            ("launcher_anchor.x", self.launcher_anchor.x),
            ("launcher_anchor.y", self.launcher_anchor.y),
            ("ground_ratio", self.ground_ratio),
            ("fork_back.x", self.fork_back.x),
            ("fork_back.y", self.fork_back.y),
            ("fork_front.x", self.fork_front.x),
            ("fork_front.y", self.fork_front.y),
            ("overlay_y_ratio", self.overlay_y_ratio),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if self.ground_ratio <= self.launcher_anchor.y {
            return Err(ConfigError::GroundAboveLauncher {
                ground: self.ground_ratio,
                launcher: self.launcher_anchor.y,
            });
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("frame_interval_ms"));
        }
        if self.ready_poll_ms == 0 {
            return Err(ConfigError::ZeroInterval("ready_poll_ms"));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn ready_poll(&self) -> Duration {
        Duration::from_millis(self.ready_poll_ms)
    }

    /// Paint for the launcher connector strokes and scene bodies.
    pub fn stroke_paint(&self) -> Paint {
        Paint {
            color: self.stroke_color,
            stroke_width: self.stroke_width,
            cap: StrokeCap::Round,
            ..Paint::default()
        }
    }

    /// Paint for the WIN/LOSS overlay on a `width` x `height` viewport.
    pub fn overlay_paint(&self, width: u32, height: u32) -> Paint {
        Paint {
            color: self.overlay_color,
            text_size: width.min(height) as f32 * self.overlay_text_scale,
            text_align: TextAlign::Center,
            ..Paint::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_valid() {
        LayoutConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LayoutConfig::from_json_str(
            r#"{ "launcher_anchor": [0.2, 0.65], "ground_ratio": 0.86 }"#,
        )
        .unwrap();
        assert!(cfg.launcher_anchor.abs_diff_eq(Vec2::new(0.2, 0.65), 1e-6));
        assert!((cfg.ground_ratio - 0.86).abs() < 1e-6);
        assert_eq!(cfg.frame_interval_ms, 50);
        assert_eq!(cfg.stroke_width, 30.0);
    }

    #[test]
    fn colors_load_from_hex_strings() {
        let cfg = LayoutConfig::from_json_str(
            r##"{ "stroke_color": "#55280f", "overlay_color": "#806d8346" }"##,
        )
        .unwrap();
        assert_eq!(cfg.stroke_color, Rgba::rgb(0x55, 0x28, 0x0f));
        assert_eq!(cfg.overlay_color, Rgba::rgba(0x6d, 0x83, 0x46, 0x80));

        let json = serde_json::to_value(LayoutConfig::default()).unwrap();
        assert_eq!(json["stroke_color"], "#55280f");
        assert_eq!(json["overlay_color"], "#aa6d8346");
    }

    #[test]
    fn rejects_malformed_color() {
        let err = LayoutConfig::from_json_str(r#"{ "stroke_color": "brown" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let err = LayoutConfig::from_json_str(r#"{ "ground_ratio": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "ground_ratio",
                ..
            }
        ));
    }

    #[test]
    fn rejects_ground_above_launcher() {
        let err = LayoutConfig::from_json_str(r#"{ "ground_ratio": 0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::GroundAboveLauncher { .. }));
    }

    #[test]
    fn rejects_zero_cadence() {
        let err = LayoutConfig::from_json_str(r#"{ "frame_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroInterval("frame_interval_ms")));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = LayoutConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "frame_interval_ms": 16 }}"#).unwrap();
        let cfg = LayoutConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LayoutConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn overlay_paint_scales_with_smaller_side() {
        let paint = LayoutConfig::default().overlay_paint(900, 300);
        assert_eq!(paint.text_size, 100.0);
        assert_eq!(paint.text_align, TextAlign::Center);
    }
}
