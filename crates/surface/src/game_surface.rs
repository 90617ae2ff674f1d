use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use glam::Vec2;
use slingshot_common::{Image, LayoutConfig};
use slingshot_input::{DragSession, MountedTarget, PointerEvent, SlingAction};
use slingshot_kernel::{
    BodyHandle, GameStatus, ReadinessGate, SceneState, StatusError, StatusTransition, Viewport,
};
use slingshot_render::{FrameSnapshot, RenderError, RenderLoop, SceneRenderer, SceneSource, Surface};

use crate::listener::{
    CreatedListener, DestroyedListener, LaunchListener, ResumedListener, TapListener,
};

/// Errors from driving the surface lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("render loop failed to start: {0}")]
    Render(#[from] RenderError),
    #[error(transparent)]
    Status(#[from] StatusError),
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T: ?Sized>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T: ?Sized>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Scene plus the launch callback recorded with the current mount. Kept
/// under one lock so a mount and its listener change together.
#[derive(Default)]
struct Stage {
    scene: SceneState,
    launch: Option<Arc<dyn LaunchListener>>,
}

#[derive(Default, Clone)]
struct Listeners {
    tap: Option<Arc<dyn TapListener>>,
    created: Option<Arc<dyn CreatedListener>>,
    destroyed: Option<Arc<dyn DestroyedListener>>,
    resumed: Option<Arc<dyn ResumedListener>>,
}

/// State reachable from both the caller's context and the render thread.
struct Shared {
    config: LayoutConfig,
    gate: ReadinessGate,
    stage: Mutex<Stage>,
    viewport: RwLock<Viewport>,
    background_source: Option<Image>,
    background: RwLock<Option<Arc<Image>>>,
    listeners: RwLock<Listeners>,
}

impl Shared {
    fn viewport(&self) -> Viewport {
        *read(&self.viewport)
    }

    /// Measure the viewport and fit the background to it.
    fn measure(&self, width: u32, height: u32) {
        *write(&self.viewport) = Viewport::new(width, height);
        let scaled = self
            .background_source
            .as_ref()
            .map(|image| Arc::new(image.scaled(width, height)));
        *write(&self.background) = scaled;
    }
}

impl SceneSource for Shared {
    fn snapshot(&self) -> FrameSnapshot {
        let (bodies, mounted) = {
            let stage = lock(&self.stage);
            (stage.scene.bodies().to_vec(), stage.scene.mounted_id())
        };
        FrameSnapshot {
            status: self.gate.get(),
            viewport: self.viewport(),
            background: read(&self.background).clone(),
            bodies,
            mounted,
        }
    }
}

/// A listener call decided under the locks and made after they are released.
enum Notify {
    Launch(Arc<dyn LaunchListener>, BodyHandle, Vec2),
    Tap(Arc<dyn TapListener>, Vec2),
}

/// The slingshot game view.
///
/// Owns the scene, the game status and the render loop, and turns pointer
/// events into drags, launches and taps. All methods take `&self`; share the
/// surface across threads with an `Arc`.
///
/// Geometry getters, [`add_body`](Self::add_body) and
/// [`mount_on_launcher`](Self::mount_on_launcher) block until
/// [`surface_created`](Self::surface_created) has run once.
pub struct GameSurface {
    shared: Arc<Shared>,
    display: Arc<dyn Surface>,
    drag: Mutex<DragSession>,
    render_loop: Mutex<Option<RenderLoop>>,
}

impl GameSurface {
    pub fn new(config: LayoutConfig, display: Arc<dyn Surface>, background: Option<Image>) -> Self {
        let gate = ReadinessGate::new(config.ready_poll());
        Self {
            shared: Arc::new(Shared {
                config,
                gate,
                stage: Mutex::new(Stage::default()),
                viewport: RwLock::new(Viewport::default()),
                background_source: background,
                background: RwLock::new(None),
                listeners: RwLock::new(Listeners::default()),
            }),
            display,
            drag: Mutex::new(DragSession::new()),
            render_loop: Mutex::new(None),
        }
    }

    // --- Lifecycle ---

    /// The display surface exists with the given size.
    ///
    /// Measures the viewport, prepares the background, starts the render loop,
    /// marks the game ready (first time only) and fires `on_created`.
    pub fn surface_created(&self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.shared.measure(width, height);

        let previous = lock(&self.render_loop).take();
        if let Some(previous) = previous {
            tracing::debug!("surface created twice, restarting render loop");
            previous.stop();
        }
        let source: Arc<dyn SceneSource> = self.shared.clone();
        let render_loop = RenderLoop::spawn(
            source,
            Arc::clone(&self.display),
            SceneRenderer::new(self.shared.config.clone()),
            self.shared.config.frame_interval(),
        )?;
        *lock(&self.render_loop) = Some(render_loop);

        if self.shared.gate.get() == GameStatus::NotReady {
            self.shared.gate.apply(StatusTransition::SurfaceReady)?;
        }
        tracing::info!(width, height, "surface created");

        let created = read(&self.shared.listeners).created.clone();
        if let Some(listener) = created {
            listener.on_created();
        }
        Ok(())
    }

    /// The display surface was resized. Status is unaffected.
    pub fn surface_changed(&self, width: u32, height: u32) {
        self.shared.measure(width, height);
        tracing::debug!(width, height, "surface changed");
    }

    /// The display surface is gone. Stops the render loop and fires
    /// `on_destroyed`; the status is kept.
    pub fn surface_destroyed(&self) {
        let render_loop = lock(&self.render_loop).take();
        if let Some(render_loop) = render_loop {
            let presented = render_loop.stop();
            tracing::debug!(presented, "render loop joined");
        }
        lock(&self.drag).reset();
        tracing::info!("surface destroyed");

        let destroyed = read(&self.shared.listeners).destroyed.clone();
        if let Some(listener) = destroyed {
            listener.on_destroyed();
        }
    }

    /// Whether the render loop is currently painting.
    pub fn is_rendering(&self) -> bool {
        lock(&self.render_loop)
            .as_ref()
            .is_some_and(RenderLoop::is_running)
    }

    // --- Geometry ---

    fn ready_viewport(&self) -> Viewport {
        self.shared.gate.wait_ready();
        self.shared.viewport()
    }

    /// Viewport width in pixels. Blocks until the surface is ready.
    pub fn viewport_width(&self) -> u32 {
        self.ready_viewport().width
    }

    /// Viewport height in pixels. Blocks until the surface is ready.
    pub fn viewport_height(&self) -> u32 {
        self.ready_viewport().height
    }

    /// Y coordinate of the ground line. Blocks until the surface is ready.
    pub fn ground_y(&self) -> u32 {
        self.ready_viewport().ground_y(&self.shared.config)
    }

    // --- Scene ---

    /// Append `body` to the paint list. Blocks until the surface is ready.
    pub fn add_body(&self, body: BodyHandle) {
        self.shared.gate.wait_ready();
        lock(&self.shared.stage).scene.push(body);
    }

    /// Remove the first occurrence of `body`, unmounting it if needed.
    /// Returns false if it was not in the scene.
    pub fn remove_body(&self, body: &BodyHandle) -> bool {
        let mut stage = lock(&self.shared.stage);
        let was_mounted = stage.scene.mounted_id() == Some(body.id());
        let removed = stage.scene.remove(body);
        if was_mounted {
            stage.launch = None;
        }
        removed
    }

    /// Put `body` on the launcher: add it, mount it and move it to the
    /// launcher anchor. `listener` is notified when the body is released.
    ///
    /// A previously mounted body stays in the scene as an ordinary member.
    /// Blocks until the surface is ready.
    pub fn mount_on_launcher(&self, body: BodyHandle, listener: Option<Arc<dyn LaunchListener>>) {
        let viewport = self.ready_viewport();
        body.set_position(viewport.launcher_anchor(&self.shared.config));
        let id = body.id();
        let mut stage = lock(&self.shared.stage);
        stage.scene.mount(body);
        stage.launch = listener;
        drop(stage);
        tracing::debug!(body = %id.short(), "body mounted on launcher");
    }

    /// Clear the scene, abandon any drag in progress, and return to `Ready`
    /// if the surface has been ready before. Fires `on_resumed`.
    pub fn reset_game(&self) {
        {
            let mut stage = lock(&self.shared.stage);
            stage.scene.clear();
            stage.launch = None;
        }
        lock(&self.drag).reset();
        if self.shared.gate.get() != GameStatus::NotReady {
            if let Err(err) = self.shared.gate.apply(StatusTransition::Resume) {
                tracing::warn!("reset rejected: {err}");
            }
        }
        tracing::debug!("game reset");

        let resumed = read(&self.shared.listeners).resumed.clone();
        if let Some(listener) = resumed {
            listener.on_resumed();
        }
    }

    /// End the round. Only legal while `Ready`; otherwise the status is left
    /// unchanged and the rejection is returned.
    pub fn game_over(&self, won: bool) -> Result<GameStatus, StatusError> {
        self.shared
            .gate
            .apply(StatusTransition::GameOver { won })
            .inspect_err(|err| tracing::warn!("game over rejected: {err}"))
    }

    // --- Queries ---

    pub fn status(&self) -> GameStatus {
        self.shared.gate.get()
    }

    /// Number of bodies in the scene.
    pub fn scene_len(&self) -> usize {
        lock(&self.shared.stage).scene.len()
    }

    pub fn mounted_body(&self) -> Option<BodyHandle> {
        lock(&self.shared.stage).scene.mounted().cloned()
    }

    /// Bodies in paint order.
    pub fn bodies(&self) -> Vec<BodyHandle> {
        lock(&self.shared.stage).scene.bodies().to_vec()
    }

    /// The same view of the scene the render loop paints.
    pub fn snapshot(&self) -> FrameSnapshot {
        self.shared.snapshot()
    }

    // --- Listeners ---

    pub fn set_tap_listener(&self, listener: Option<Arc<dyn TapListener>>) {
        write(&self.shared.listeners).tap = listener;
    }

    pub fn set_created_listener(&self, listener: Option<Arc<dyn CreatedListener>>) {
        write(&self.shared.listeners).created = listener;
    }

    pub fn set_destroyed_listener(&self, listener: Option<Arc<dyn DestroyedListener>>) {
        write(&self.shared.listeners).destroyed = listener;
    }

    pub fn set_resumed_listener(&self, listener: Option<Arc<dyn ResumedListener>>) {
        write(&self.shared.listeners).resumed = listener;
    }

    // --- Input ---

    /// Feed one pointer event through the slingshot drag rules and apply the
    /// result. Listeners fire after every internal lock is released.
    pub fn on_pointer(&self, event: PointerEvent) -> SlingAction {
        let (action, notify) = {
            let mut drag = lock(&self.drag);
            let mut stage = lock(&self.shared.stage);
            let viewport = self.shared.viewport();
            let config = &self.shared.config;
            let target = stage.scene.mounted().map(|body| {
                let body = body.lock();
                MountedTarget {
                    under_pointer: body.point_in(event.position),
                    anchor: viewport.launcher_anchor(config),
                    limit: viewport.drag_limit(config, body.height()),
                }
            });

            let action = drag.on_event(event, target);
            let notify = match action {
                SlingAction::DragTo(position) => {
                    if let Some(body) = stage.scene.mounted() {
                        body.set_position(position);
                    }
                    None
                }
                SlingAction::Launch { origin } => {
                    let body = stage.scene.take_mounted();
                    match (body, stage.launch.clone()) {
                        (Some(body), Some(listener)) => {
                            tracing::debug!(body = %body.id().short(), "body launched");
                            Some(Notify::Launch(listener, body, origin))
                        }
                        _ => None,
                    }
                }
                SlingAction::Tap(position) => read(&self.shared.listeners)
                    .tap
                    .clone()
                    .map(|listener| Notify::Tap(listener, position)),
                SlingAction::Grab | SlingAction::Noop => None,
            };
            (action, notify)
        };

        match notify {
            Some(Notify::Launch(listener, body, origin)) => listener.on_launch(&body, origin),
            Some(Notify::Tap(listener, position)) => listener.on_tap(position),
            None => {}
        }
        action
    }
}

impl Drop for GameSurface {
    fn drop(&mut self) {
        if let Some(render_loop) = lock(&self.render_loop).take() {
            render_loop.stop();
        }
    }
}
