//! Engine Core Module
//!
//! [`Engine`] bundles the subsystems a frame works with: graphics, the
//! sound bank, the active camera and frame timing. It has no window logic
//! of its own; [`App`](crate::app::App) drives it from a
//! [`Platform`](crate::app::Platform), but it can be driven by hand just as
//! well:
//!
//! ```rust,ignore
//! let mut engine = Engine::new(HeadlessBackend::new(), NullAudio::new(), &settings, None);
//! engine.set_active_camera(Some(Camera::default()));
//! loop {
//!     engine.tick();
//!     engine.begin_frame();
//!     engine.draw_all();
//! }
//! ```

use crate::audio::{AudioBackend, SoundBank};
use crate::graphics::Graphics;
use crate::render::{FrameContext, RenderBackend};
use crate::resources::{SpriteHandle, TextHandle};
use crate::scene::Camera;
use crate::settings::EngineSettings;
use crate::utils::Timer;

/// Graphics, audio, active camera and timing for one application.
#[derive(Debug)]
pub struct Engine<B: RenderBackend, A: AudioBackend> {
    pub gfx: Graphics<B>,
    pub audio: SoundBank<A>,

    active_camera: Option<Camera>,
    timer: Timer,
    quit_requested: bool,
}

impl<B: RenderBackend, A: AudioBackend> Engine<B, A> {
    #[must_use]
    pub fn new(render_backend: B, audio_backend: A, settings: &EngineSettings, camera: Option<Camera>) -> Self {
        Self {
            gfx: Graphics::new(render_backend, settings),
            audio: SoundBank::new(audio_backend, settings.sound_capacity),
            active_camera: camera,
            timer: Timer::new(),
            quit_requested: false,
        }
    }

    /// Advances frame timing. Called once per frame by the app loop.
    pub fn tick(&mut self) {
        self.timer.tick();
    }

    /// Seconds since the engine started.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.timer.elapsed_seconds()
    }

    /// Seconds between the last two ticks.
    #[inline]
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.timer.dt_seconds()
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count
    }

    /// Replaces the camera that [`draw_sprite`](Self::draw_sprite),
    /// [`draw_text`](Self::draw_text) and [`draw_all`](Self::draw_all) use.
    /// `None` draws in clip space.
    pub fn set_active_camera(&mut self, camera: Option<Camera>) {
        self.active_camera = camera;
    }

    #[must_use]
    pub fn active_camera(&self) -> Option<&Camera> {
        self.active_camera.as_ref()
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.active_camera.as_mut()
    }

    /// Context built from the active camera and the current time.
    #[must_use]
    pub fn frame_context(&self) -> FrameContext<'_> {
        FrameContext::new(self.active_camera.as_ref(), self.time())
    }

    /// Window resized: keeps the active camera's aspect in step.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(camera) = self.active_camera.as_mut() {
            camera.set_aspect(width as f32 / height as f32);
        }
    }

    pub fn begin_frame(&mut self) {
        self.gfx.begin_frame();
    }

    pub fn draw_sprite(&mut self, handle: SpriteHandle) {
        let ctx = FrameContext::new(self.active_camera.as_ref(), self.timer.elapsed_seconds());
        self.gfx.draw_sprite(handle, &ctx);
    }

    pub fn draw_text(&mut self, handle: TextHandle) {
        let ctx = FrameContext::new(self.active_camera.as_ref(), self.timer.elapsed_seconds());
        self.gfx.draw_text(handle, &ctx);
    }

    /// Draws every live sprite and text through the active camera.
    pub fn draw_all(&mut self) {
        let ctx = FrameContext::new(self.active_camera.as_ref(), self.timer.elapsed_seconds());
        self.gfx.draw_all(&ctx);
    }

    /// Asks the app loop to stop after the current frame.
    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Releases every graphics and audio resource.
    pub fn shutdown(&mut self) {
        log::info!("Engine shutting down after {} frames", self.timer.frame_count);
        self.gfx.shutdown();
        self.audio.shutdown();
    }
}
