use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec2;
use slingshot_common::{BodyId, Canvas, Paint};

/// A positioned, sized, drawable entity.
///
/// Geometry and physics live with the implementor. The view only needs to
/// paint it, hit-test it, and move it while it sits on the launcher.
/// `position` is the body's center.
pub trait Body: Send {
    fn draw(&self, canvas: &mut dyn Canvas, paint: &Paint);

    /// Hit test in viewport pixels.
    fn point_in(&self, point: Vec2) -> bool;

    fn position(&self) -> Vec2;

    fn set_position(&mut self, position: Vec2);

    fn width(&self) -> f32;

    fn height(&self) -> f32;
}

/// Shared, identity-carrying reference to a body.
///
/// Cloning is cheap and yields the same identity. Equality compares ids only,
/// so two handles are equal exactly when they refer to the same body.
#[derive(Clone)]
pub struct BodyHandle {
    id: BodyId,
    inner: Arc<Mutex<dyn Body>>,
}

impl BodyHandle {
    pub fn new<B: Body + 'static>(body: B) -> Self {
        Self {
            id: BodyId::new(),
            inner: Arc::new(Mutex::new(body)),
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Lock the body for reading or mutation.
    ///
    /// A body whose draw panicked on the render thread leaves the mutex
    /// poisoned; the data is still usable, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, dyn Body + 'static> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn position(&self) -> Vec2 {
        self.lock().position()
    }

    pub fn set_position(&self, position: Vec2) {
        self.lock().set_position(position);
    }

    pub fn height(&self) -> f32 {
        self.lock().height()
    }

    pub fn point_in(&self, point: Vec2) -> bool {
        self.lock().point_in(point)
    }
}

impl PartialEq for BodyHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BodyHandle {}

impl fmt::Debug for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyHandle")
            .field("id", &self.id.short())
            .finish()
    }
}

/// A round body of fixed radius. Enough for demos and tests; real games plug
/// in their own [`Body`] implementations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscBody {
    pub center: Vec2,
    pub radius: f32,
}

impl DiscBody {
    pub fn new(radius: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            radius,
        }
    }
}

impl Body for DiscBody {
    fn draw(&self, canvas: &mut dyn Canvas, paint: &Paint) {
        canvas.draw_circle(self.center, self.radius, paint);
    }

    fn point_in(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }

    fn position(&self) -> Vec2 {
        self.center
    }

    fn set_position(&mut self, position: Vec2) {
        self.center = position;
    }

    fn width(&self) -> f32 {
        self.radius * 2.0
    }

    fn height(&self) -> f32 {
        self.radius * 2.0
    }
}
