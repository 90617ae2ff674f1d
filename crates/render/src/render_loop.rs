use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::frame::{FrameLease, Surface};
use crate::renderer::{FrameSnapshot, RenderError, Renderer};

/// Something that can hand the render loop a consistent view of the scene.
pub trait SceneSource: Send + Sync {
    fn snapshot(&self) -> FrameSnapshot;
}

/// Result of one paint attempt.
#[derive(Debug)]
pub enum FrameOutcome {
    Presented,
    /// The surface had no frame to give, or the viewport has no area;
    /// nothing was painted.
    Skipped,
    /// Painting failed. The frame was still posted.
    Failed(RenderError),
}

/// Paint one frame: lease a buffer, paint the current snapshot into it, and
/// post it back. The buffer is posted on every path, including a panicking
/// body. An empty viewport is skipped without leasing.
pub fn paint_frame<R>(source: &dyn SceneSource, surface: &dyn Surface, renderer: &R) -> FrameOutcome
where
    R: Renderer + ?Sized,
{
    let snapshot = source.snapshot();
    if snapshot.viewport.is_empty() {
        return FrameOutcome::Skipped;
    }
    let Some(mut lease) = FrameLease::acquire(surface) else {
        return FrameOutcome::Skipped;
    };
    let painted = panic::catch_unwind(AssertUnwindSafe(|| {
        renderer.render(&snapshot, &mut *lease)
    }));
    drop(lease);
    match painted {
        Ok(Ok(())) => FrameOutcome::Presented,
        Ok(Err(err)) => FrameOutcome::Failed(err),
        Err(payload) => FrameOutcome::Failed(RenderError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// Background thread repainting the scene at a fixed cadence until stopped.
///
/// Stopping is cooperative: the flag is checked once per iteration and the
/// sleeping thread is woken, so the loop exits within one frame interval.
/// Dropping the handle stops the loop.
#[derive(Debug)]
pub struct RenderLoop {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
}

impl RenderLoop {
    pub fn spawn<R>(
        source: Arc<dyn SceneSource>,
        surface: Arc<dyn Surface>,
        renderer: R,
        interval: Duration,
    ) -> Result<Self, RenderError>
    where
        R: Renderer + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("slingshot-render".into())
            .spawn(move || {
                tracing::debug!(interval_ms = interval.as_millis() as u64, "render loop started");
                let mut presented = 0u64;
                while flag.load(Ordering::Acquire) {
                    let started = Instant::now();
                    match paint_frame(source.as_ref(), surface.as_ref(), &renderer) {
                        FrameOutcome::Presented => presented += 1,
                        FrameOutcome::Skipped => tracing::trace!("nothing to paint into, frame skipped"),
                        FrameOutcome::Failed(err) => tracing::warn!("frame dropped: {err}"),
                    }
                    thread::park_timeout(interval.saturating_sub(started.elapsed()));
                }
                tracing::debug!(presented, "render loop stopped");
                presented
            })?;
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop to stop and wait for it. Returns the number of frames
    /// presented.
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        self.running.store(false, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        handle.thread().unpark();
        if handle.thread().id() == thread::current().id() {
            // Stopped from inside a frame; the loop exits on its own.
            return 0;
        }
        handle.join().unwrap_or_else(|_| {
            tracing::error!("render thread panicked outside a frame");
            0
        })
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::HeadlessSurface;
    use crate::renderer::SceneRenderer;
    use glam::Vec2;
    use slingshot_common::{Canvas, Paint};
    use slingshot_kernel::{Body, BodyHandle, DiscBody, GameStatus, Viewport};
    use std::sync::Mutex;

    struct FixedScene(Mutex<FrameSnapshot>);

    impl SceneSource for FixedScene {
        fn snapshot(&self) -> FrameSnapshot {
            self.0.lock().unwrap().clone()
        }
    }

    fn ready_scene(bodies: Vec<BodyHandle>) -> Arc<FixedScene> {
        Arc::new(FixedScene(Mutex::new(FrameSnapshot {
            status: GameStatus::Ready,
            viewport: Viewport::new(100, 100),
            bodies,
            ..FrameSnapshot::default()
        })))
    }

    struct ExplodingBody;

    impl Body for ExplodingBody {
        fn draw(&self, _canvas: &mut dyn Canvas, _paint: &Paint) {
            panic!("texture missing");
        }
        fn point_in(&self, _point: Vec2) -> bool {
            false
        }
        fn position(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn set_position(&mut self, _position: Vec2) {}
        fn width(&self) -> f32 {
            1.0
        }
        fn height(&self) -> f32 {
            1.0
        }
    }

    #[test]
    fn paint_frame_presents() {
        let scene = ready_scene(vec![BodyHandle::new(DiscBody::new(5.0))]);
        let surface = HeadlessSurface::new(100, 100);
        let outcome = paint_frame(scene.as_ref(), &surface, &SceneRenderer::default());
        assert!(matches!(outcome, FrameOutcome::Presented));
        assert_eq!(surface.last_frame().unwrap().commands().len(), 1);
    }

    #[test]
    fn paint_frame_skips_busy_surface() {
        let scene = ready_scene(Vec::new());
        let surface = HeadlessSurface::new(100, 100);
        surface.set_busy(true);
        let outcome = paint_frame(scene.as_ref(), &surface, &SceneRenderer::default());
        assert!(matches!(outcome, FrameOutcome::Skipped));
        assert_eq!(surface.frames_posted(), 0);
    }

    #[test]
    fn paint_frame_skips_empty_viewport() {
        let scene = ready_scene(vec![BodyHandle::new(DiscBody::new(5.0))]);
        scene.0.lock().unwrap().viewport = Viewport::new(0, 0);
        let surface = HeadlessSurface::new(0, 0);
        let outcome = paint_frame(scene.as_ref(), &surface, &SceneRenderer::default());
        assert!(matches!(outcome, FrameOutcome::Skipped));
        assert_eq!(surface.frames_posted(), 0);
        assert!(!surface.is_locked());
    }

    #[test]
    fn loop_idles_quietly_on_empty_viewport() {
        let scene = ready_scene(Vec::new());
        scene.0.lock().unwrap().viewport = Viewport::new(100, 0);
        let surface = Arc::new(HeadlessSurface::new(100, 0));
        let render_loop = RenderLoop::spawn(
            scene.clone(),
            surface.clone(),
            SceneRenderer::default(),
            Duration::from_millis(2),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(surface.frames_posted(), 0);

        scene.0.lock().unwrap().viewport = Viewport::new(100, 100);
        assert!(surface.wait_for_frames(1, Duration::from_secs(5)));
        assert!(render_loop.stop() >= 1);
    }

    #[test]
    fn paint_panic_is_contained_and_frame_released() {
        let scene = ready_scene(vec![BodyHandle::new(ExplodingBody)]);
        let surface = HeadlessSurface::new(100, 100);
        let outcome = paint_frame(scene.as_ref(), &surface, &SceneRenderer::default());
        match outcome {
            FrameOutcome::Failed(RenderError::Panicked(msg)) => assert_eq!(msg, "texture missing"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!surface.is_locked());
        assert_eq!(surface.frames_posted(), 1);
    }

    #[test]
    fn loop_keeps_painting_after_failures() {
        let scene = ready_scene(vec![BodyHandle::new(ExplodingBody)]);
        let surface = Arc::new(HeadlessSurface::new(100, 100));
        let render_loop = RenderLoop::spawn(
            scene,
            surface.clone(),
            SceneRenderer::default(),
            Duration::from_millis(5),
        )
        .unwrap();
        assert!(surface.wait_for_frames(3, Duration::from_secs(5)));
        assert!(render_loop.is_running());
        assert_eq!(render_loop.stop(), 0);
    }

    #[test]
    fn loop_stops_within_one_interval() {
        let scene = ready_scene(Vec::new());
        let surface = Arc::new(HeadlessSurface::new(100, 100));
        let render_loop = RenderLoop::spawn(
            scene,
            surface.clone(),
            SceneRenderer::default(),
            Duration::from_millis(200),
        )
        .unwrap();
        assert!(surface.wait_for_frames(1, Duration::from_secs(5)));
        let started = Instant::now();
        let presented = render_loop.stop();
        assert!(started.elapsed() < Duration::from_millis(200));
        assert!(presented >= 1);
        let posted = surface.frames_posted();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(surface.frames_posted(), posted);
    }

    #[test]
    fn loop_observes_scene_changes() {
        let scene = ready_scene(Vec::new());
        let surface = Arc::new(HeadlessSurface::new(100, 100));
        let _render_loop = RenderLoop::spawn(
            scene.clone(),
            surface.clone(),
            SceneRenderer::default(),
            Duration::from_millis(5),
        )
        .unwrap();
        assert!(surface.wait_for_frames(1, Duration::from_secs(5)));
        scene.0.lock().unwrap().status = GameStatus::Win;
        let seen = surface.frames_posted();
        assert!(surface.wait_for_frames(seen + 2, Duration::from_secs(5)));
        let frame = surface.last_frame().unwrap();
        assert_eq!(frame.texts().collect::<Vec<_>>(), vec!["WIN"]);
    }
}
