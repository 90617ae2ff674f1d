use glam::Vec2;

use crate::action::{PointerEvent, PointerKind, SlingAction};

/// Clamp `pointer` onto the disc of radius `limit` centered at `anchor`.
///
/// Inside the disc the pointer is returned unchanged. Outside it the result
/// lies on the boundary along the anchor-to-pointer direction. A negative
/// limit is treated as zero, and a pointer exactly at the anchor stays there.
pub fn clamp_to_radius(anchor: Vec2, pointer: Vec2, limit: f32) -> Vec2 {
    let limit = limit.max(0.0);
    if anchor.distance(pointer) <= limit {
        return pointer;
    }
    anchor + (pointer - anchor).normalize_or_zero() * limit
}

/// Launcher geometry and hit-test result for the currently mounted body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountedTarget {
    /// Whether the event position falls inside the mounted body.
    pub under_pointer: bool,
    pub anchor: Vec2,
    /// Drag radius cap.
    pub limit: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Slingshot drag state machine: `Idle` and `Dragging`.
///
/// A press on the mounted body starts a drag, moves reposition it within the
/// drag radius, and the release launches it. Any release that does not end a
/// drag is a tap.
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Forget any drag in progress.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// Advance on one pointer event. `mounted` is `None` when nothing sits on
    /// the launcher.
    pub fn on_event(&mut self, event: PointerEvent, mounted: Option<MountedTarget>) -> SlingAction {
        match (event.kind, mounted) {
            (PointerKind::Press, Some(target)) if target.under_pointer => {
                self.state = DragState::Dragging;
                tracing::trace!(position = ?event.position, "drag started");
                SlingAction::Grab
            }
            (PointerKind::Press, _) => SlingAction::Noop,
            (PointerKind::Move, Some(target)) if self.is_dragging() => SlingAction::DragTo(
                clamp_to_radius(target.anchor, event.position, target.limit),
            ),
            (PointerKind::Move, _) => SlingAction::Noop,
            (PointerKind::Release, mounted) => {
                let was_dragging = self.is_dragging();
                self.state = DragState::Idle;
                match mounted {
                    Some(target) if was_dragging => {
                        tracing::trace!(position = ?event.position, "drag released");
                        SlingAction::Launch {
                            origin: target.anchor,
                        }
                    }
                    _ => SlingAction::Tap(event.position),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: Vec2 = Vec2::new(200.0, 650.0);

    fn target(under_pointer: bool) -> Option<MountedTarget> {
        Some(MountedTarget {
            under_pointer,
            anchor: ANCHOR,
            limit: 160.0,
        })
    }

    #[test]
    fn clamp_inside_is_exact() {
        let p = Vec2::new(250.0, 700.0);
        assert_eq!(clamp_to_radius(ANCHOR, p, 160.0), p);
    }

    #[test]
    fn clamp_on_boundary_is_exact() {
        let p = ANCHOR + Vec2::new(160.0, 0.0);
        assert_eq!(clamp_to_radius(ANCHOR, p, 160.0), p);
    }

    #[test]
    fn clamp_outside_lands_on_circle_along_drag() {
        let dir = Vec2::new(-3.0, 4.0).normalize();
        let p = ANCHOR + dir * 500.0;
        let q = clamp_to_radius(ANCHOR, p, 160.0);
        assert!((q.distance(ANCHOR) - 160.0).abs() < 1e-3);
        assert!((q - ANCHOR).normalize().abs_diff_eq(dir, 1e-5));
    }

    #[test]
    fn clamp_at_anchor_does_not_divide_by_zero() {
        assert_eq!(clamp_to_radius(ANCHOR, ANCHOR, 160.0), ANCHOR);
        assert_eq!(clamp_to_radius(ANCHOR, ANCHOR, 0.0), ANCHOR);
    }

    #[test]
    fn clamp_negative_limit_pins_to_anchor() {
        let q = clamp_to_radius(ANCHOR, ANCHOR + Vec2::X * 10.0, -5.0);
        assert_eq!(q, ANCHOR);
    }

    #[test]
    fn clamp_never_exceeds_limit() {
        for i in 0..72 {
            let theta = i as f32 * 5.0_f32.to_radians();
            for r in [0.0, 10.0, 159.0, 160.0, 161.0, 1e4] {
                let p = ANCHOR + Vec2::new(theta.cos(), theta.sin()) * r;
                let q = clamp_to_radius(ANCHOR, p, 160.0);
                assert!(q.distance(ANCHOR) <= 160.0 + 1e-3);
                if ANCHOR.distance(p) <= 160.0 {
                    assert_eq!(q, p);
                }
            }
        }
    }

    #[test]
    fn press_on_mounted_body_starts_drag() {
        let mut s = DragSession::new();
        assert_eq!(s.on_event(PointerEvent::press(200.0, 650.0), target(true)), SlingAction::Grab);
        assert!(s.is_dragging());
    }

    #[test]
    fn press_off_body_stays_idle() {
        let mut s = DragSession::new();
        assert_eq!(s.on_event(PointerEvent::press(0.0, 0.0), target(false)), SlingAction::Noop);
        assert_eq!(s.on_event(PointerEvent::press(0.0, 0.0), None), SlingAction::Noop);
        assert!(!s.is_dragging());
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let mut s = DragSession::new();
        assert_eq!(s.on_event(PointerEvent::moved(1.0, 1.0), target(true)), SlingAction::Noop);
    }

    #[test]
    fn drag_then_release_launches_from_anchor() {
        let mut s = DragSession::new();
        s.on_event(PointerEvent::press(200.0, 650.0), target(true));
        let moved = s.on_event(PointerEvent::moved(120.0, 700.0), target(false));
        assert_eq!(moved, SlingAction::DragTo(Vec2::new(120.0, 700.0)));
        let up = s.on_event(PointerEvent::release(120.0, 700.0), target(false));
        assert_eq!(up, SlingAction::Launch { origin: ANCHOR });
        assert!(!s.is_dragging());
    }

    #[test]
    fn release_after_missed_press_is_tap() {
        let mut s = DragSession::new();
        s.on_event(PointerEvent::press(5.0, 5.0), target(false));
        let up = s.on_event(PointerEvent::release(6.0, 7.0), target(false));
        assert_eq!(up, SlingAction::Tap(Vec2::new(6.0, 7.0)));
    }

    #[test]
    fn release_without_press_or_mount_is_tap() {
        let mut s = DragSession::new();
        let up = s.on_event(PointerEvent::release(30.0, 40.0), None);
        assert_eq!(up, SlingAction::Tap(Vec2::new(30.0, 40.0)));
    }

    #[test]
    fn mount_vanishing_mid_drag_turns_release_into_tap() {
        let mut s = DragSession::new();
        s.on_event(PointerEvent::press(200.0, 650.0), target(true));
        assert_eq!(s.on_event(PointerEvent::moved(210.0, 650.0), None), SlingAction::Noop);
        let up = s.on_event(PointerEvent::release(210.0, 650.0), None);
        assert_eq!(up, SlingAction::Tap(Vec2::new(210.0, 650.0)));
        assert!(!s.is_dragging());
    }

    #[test]
    fn reset_abandons_drag() {
        let mut s = DragSession::new();
        s.on_event(PointerEvent::press(200.0, 650.0), target(true));
        s.reset();
        let up = s.on_event(PointerEvent::release(200.0, 650.0), target(true));
        assert!(matches!(up, SlingAction::Tap(_)));
    }
}
