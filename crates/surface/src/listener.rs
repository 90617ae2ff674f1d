//! Notifications from the game surface to external game logic.
//!
//! Each capability is its own single-method trait. Closures implement them
//! directly, and [`EventChannel`] turns all of them into [`GameEvent`]
//! messages. An unregistered listener is a silent no-op.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slingshot_common::BodyId;
use slingshot_kernel::BodyHandle;

/// Fired when the mounted body is released from a drag. `origin` is the
/// launcher anchor the physics layer must treat as the launch origin.
pub trait LaunchListener: Send + Sync {
    fn on_launch(&self, body: &BodyHandle, origin: Vec2);
}

/// Fired on any release that is not a slingshot release.
pub trait TapListener: Send + Sync {
    fn on_tap(&self, position: Vec2);
}

/// Fired once the surface and viewport are established.
pub trait CreatedListener: Send + Sync {
    fn on_created(&self);
}

/// Fired when the surface is torn down.
pub trait DestroyedListener: Send + Sync {
    fn on_destroyed(&self);
}

/// Fired when the game is reset.
pub trait ResumedListener: Send + Sync {
    fn on_resumed(&self);
}

impl<F> LaunchListener for F
where
    F: Fn(&BodyHandle, Vec2) + Send + Sync,
{
    fn on_launch(&self, body: &BodyHandle, origin: Vec2) {
        self(body, origin)
    }
}

impl<F> TapListener for F
where
    F: Fn(Vec2) + Send + Sync,
{
    fn on_tap(&self, position: Vec2) {
        self(position)
    }
}

impl<F> CreatedListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_created(&self) {
        self()
    }
}

impl<F> DestroyedListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_destroyed(&self) {
        self()
    }
}

impl<F> ResumedListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_resumed(&self) {
        self()
    }
}

/// A notification as a message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { body: BodyId, origin: Vec2 },
    Tapped { position: Vec2 },
    Created,
    Destroyed,
    Resumed,
}

/// Listener that forwards every notification into an mpsc channel.
///
/// A dropped receiver is not an error; events are discarded.
#[derive(Debug, Clone)]
pub struct EventChannel {
    tx: Sender<GameEvent>,
}

impl EventChannel {
    pub fn new() -> (Self, Receiver<GameEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: GameEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(?event, "event receiver gone, dropping event");
        }
    }
}

impl LaunchListener for EventChannel {
    fn on_launch(&self, body: &BodyHandle, origin: Vec2) {
        self.send(GameEvent::Launched {
            body: body.id(),
            origin,
        });
    }
}

impl TapListener for EventChannel {
    fn on_tap(&self, position: Vec2) {
        self.send(GameEvent::Tapped { position });
    }
}

impl CreatedListener for EventChannel {
    fn on_created(&self) {
        self.send(GameEvent::Created);
    }
}

impl DestroyedListener for EventChannel {
    fn on_destroyed(&self) {
        self.send(GameEvent::Destroyed);
    }
}

impl ResumedListener for EventChannel {
    fn on_resumed(&self) {
        self.send(GameEvent::Resumed);
    }
}
