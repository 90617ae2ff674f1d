use glam::Vec2;
use serde::{Deserialize, Serialize};
use slingshot_common::LayoutConfig;

/// Pixel dimensions of the drawing surface. Zero until the surface exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Map a viewport fraction to pixels.
    pub fn at(&self, ratio: Vec2) -> Vec2 {
        Vec2::new(self.width as f32 * ratio.x, self.height as f32 * ratio.y)
    }

    /// Launcher pivot: drag distances are measured from here and launches
    /// report it as their origin.
    pub fn launcher_anchor(&self, config: &LayoutConfig) -> Vec2 {
        self.at(config.launcher_anchor)
    }

    /// Ground line, rounded to whole pixels.
    pub fn ground_y(&self, config: &LayoutConfig) -> u32 {
        (self.height as f32 * config.ground_ratio).round() as u32
    }

    /// Drag radius cap for a mounted body of `body_height`: the vertical room
    /// between launcher and ground minus half the body.
    pub fn drag_limit(&self, config: &LayoutConfig, body_height: f32) -> f32 {
        self.height as f32 * (config.ground_ratio - config.launcher_anchor.y) - body_height / 2.0
    }

    /// The two fork tips the connector strokes start from, in paint order:
    /// the one behind the body first.
    pub fn fork_anchors(&self, config: &LayoutConfig) -> [Vec2; 2] {
        [self.at(config.fork_back), self.at(config.fork_front)]
    }

    /// Baseline anchor of the WIN/LOSS banner.
    pub fn banner_origin(&self, config: &LayoutConfig) -> Vec2 {
        Vec2::new(
            self.width as f32 / 2.0,
            self.height as f32 * config.overlay_y_ratio,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_config() -> LayoutConfig {
        LayoutConfig {
            launcher_anchor: Vec2::new(0.2, 0.65),
            ground_ratio: 0.86,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn default_viewport_is_empty() {
        assert!(Viewport::default().is_empty());
    }

    #[test]
    fn anchor_follows_ratios() {
        let vp = Viewport::new(1000, 1000);
        let anchor = vp.launcher_anchor(&scenario_config());
        assert!(anchor.abs_diff_eq(Vec2::new(200.0, 650.0), 1e-3));
    }

    #[test]
    fn ground_is_whole_pixels() {
        let vp = Viewport::new(1000, 1000);
        assert_eq!(vp.ground_y(&scenario_config()), 860);
    }

    #[test]
    fn drag_limit_subtracts_half_body() {
        let vp = Viewport::new(1000, 1000);
        let limit = vp.drag_limit(&scenario_config(), 100.0);
        assert!((limit - 160.0).abs() < 1e-3);
    }

    #[test]
    fn reference_layout_at_reference_resolution() {
        let vp = Viewport::new(2560, 1440);
        let cfg = LayoutConfig::default();
        assert!(vp.launcher_anchor(&cfg).abs_diff_eq(Vec2::new(370.0, 942.0), 1e-2));
        assert_eq!(vp.ground_y(&cfg), 1236);
        let [back, front] = vp.fork_anchors(&cfg);
        assert!(back.abs_diff_eq(Vec2::new(410.0, 940.0), 1e-2));
        assert!(front.abs_diff_eq(Vec2::new(338.0, 945.0), 1e-2));
    }
}
