use std::sync::Arc;

use glam::Vec2;

use crate::image::Image;
use crate::types::Paint;

/// Drawing target handed to bodies and renderers for one frame.
///
/// Coordinates are viewport pixels with the origin at the top-left corner and
/// y growing downward.
pub trait Canvas {
    /// Pixel size of the target as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Draw `image` with its top-left corner at `origin`.
    fn draw_image(&mut self, image: &Arc<Image>, origin: Vec2, paint: &Paint);

    /// Stroke a straight segment using `paint.stroke_width` and `paint.cap`.
    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &Paint);

    /// Fill a circle.
    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);

    /// Draw a single line of text. `origin` is the baseline anchor, interpreted
    /// according to `paint.text_align`.
    fn draw_text(&mut self, text: &str, origin: Vec2, paint: &Paint);
}
