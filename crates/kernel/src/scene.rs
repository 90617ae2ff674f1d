use slingshot_common::BodyId;

use crate::body::BodyHandle;

/// Bodies currently on screen plus the one mounted on the launcher.
///
/// `bodies` is paint order: later entries are drawn on top. Duplicates are
/// allowed. The mounted body is held by id, a weak reference into `bodies`.
///
/// # Invariants
/// - If a body is mounted, a body with that id is present in `bodies`.
/// - Removing the mounted body clears the mount first.
#[derive(Debug, Default)]
pub struct SceneState {
    bodies: Vec<BodyHandle>,
    mounted: Option<BodyId>,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Bodies in paint order.
    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    pub fn contains(&self, body: &BodyHandle) -> bool {
        self.bodies.contains(body)
    }

    pub fn mounted_id(&self) -> Option<BodyId> {
        self.mounted
    }

    /// The mounted body, resolved against `bodies`.
    pub fn mounted(&self) -> Option<&BodyHandle> {
        let id = self.mounted?;
        self.bodies.iter().find(|b| b.id() == id)
    }

    /// Append to the top of the paint order.
    pub fn push(&mut self, body: BodyHandle) {
        tracing::trace!(body = %body.id().short(), "body added");
        self.bodies.push(body);
    }

    /// Remove the first entry equal to `body`. Returns false if absent.
    pub fn remove(&mut self, body: &BodyHandle) -> bool {
        if self.mounted == Some(body.id()) {
            self.mounted = None;
        }
        match self.bodies.iter().position(|b| b == body) {
            Some(index) => {
                self.bodies.remove(index);
                tracing::trace!(body = %body.id().short(), "body removed");
                true
            }
            None => false,
        }
    }

    /// Append `body` and mark it mounted, replacing any previous mount. The
    /// previous mounted body stays in the scene as an ordinary member.
    pub fn mount(&mut self, body: BodyHandle) {
        self.mounted = Some(body.id());
        self.push(body);
    }

    /// Clear the mount and hand back the body that was mounted.
    pub fn take_mounted(&mut self) -> Option<BodyHandle> {
        let body = self.mounted().cloned();
        self.mounted = None;
        body
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.mounted = None;
    }

    /// Check the mount invariant.
    pub fn is_consistent(&self) -> bool {
        self.mounted.is_none() || self.mounted().is_some()
    }
}
