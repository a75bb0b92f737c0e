//! Application Framework
//!
//! - [`App`]: owns a [`Platform`] and an [`Engine`] and runs the frame loop
//! - [`AppHandler`]: trait users implement to define application behavior
//! - [`Platform`]: window and event source the loop polls
//!
//! # Frame order
//!
//! Each iteration ticks the timer, starts a new input frame, polls platform
//! events, clears the frame, then calls [`AppHandler::update`] and
//! [`AppHandler::draw`] before presenting. The loop ends when the platform
//! closes or [`Engine::quit`] is called; [`AppHandler::cleanup`] and
//! [`Engine::shutdown`] follow.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Game { ship: SpriteHandle }
//!
//! impl<B: RenderBackend, A: AudioBackend> AppHandler<B, A> for Game {
//!     fn update(&mut self, engine: &mut Engine<B, A>, input: &InputState, dt: f32) {
//!         if input.key_pressed(Key::Escape) {
//!             engine.quit();
//!         }
//!         engine.gfx.set_rotation_z(self.ship, engine.time());
//!     }
//! }
//! ```

pub mod headless;

use serde::{Deserialize, Serialize};

pub use self::headless::{HeadlessPlatform, PlatformEvent};
pub use crate::engine::Engine;

use crate::audio::AudioBackend;
use crate::errors::Result;
use crate::input::InputState;
use crate::render::RenderBackend;
use crate::scene::{Camera, CameraDescriptor};
use crate::settings::EngineSettings;

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Raster".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Everything [`App::new`] needs besides the backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppDescriptor {
    pub window: WindowConfig,
    pub camera: CameraDescriptor,
    pub settings: EngineSettings,
}

/// Window and event source driven by [`App`].
pub trait Platform {
    /// Feeds pending window events into `input`.
    fn poll_events(&mut self, input: &mut InputState);

    fn should_close(&self) -> bool;

    /// Shows the finished frame.
    fn present(&mut self);

    fn request_close(&mut self);
}

/// Application behavior.
///
/// # Lifecycle
///
/// 1. [`init`](Self::init) - once, before the first frame
/// 2. [`update`](Self::update) - every frame, after events are polled
/// 3. [`draw`](Self::draw) - every frame, after the frame is cleared
/// 4. [`cleanup`](Self::cleanup) - once, before the engine shuts down
pub trait AppHandler<B: RenderBackend, A: AudioBackend> {
    #[allow(unused_variables)]
    fn init(&mut self, engine: &mut Engine<B, A>) -> Result<()> {
        Ok(())
    }

    #[allow(unused_variables)]
    fn update(&mut self, engine: &mut Engine<B, A>, input: &InputState, dt: f32) {}

    /// Defaults to drawing everything through the active camera.
    fn draw(&mut self, engine: &mut Engine<B, A>) {
        engine.draw_all();
    }

    #[allow(unused_variables)]
    fn cleanup(&mut self, engine: &mut Engine<B, A>) {}
}

/// Frame loop over a [`Platform`].
#[derive(Debug)]
pub struct App<P: Platform, B: RenderBackend, A: AudioBackend> {
    platform: P,
    engine: Engine<B, A>,
    input: InputState,
    window: WindowConfig,
}

impl<P: Platform, B: RenderBackend, A: AudioBackend> App<P, B, A> {
    #[must_use]
    pub fn new(platform: P, render_backend: B, audio_backend: A, desc: AppDescriptor) -> Self {
        let camera = Camera::new(&desc.camera);
        let mut engine = Engine::new(render_backend, audio_backend, &desc.settings, Some(camera));
        engine.resize(desc.window.width, desc.window.height);

        log::info!(
            "App '{}' created ({}x{})",
            desc.window.title,
            desc.window.width,
            desc.window.height
        );

        Self {
            platform,
            engine,
            input: InputState::new(),
            window: desc.window,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine<B, A> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<B, A> {
        &mut self.engine
    }

    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn window(&self) -> &WindowConfig {
        &self.window
    }

    /// Runs `handler` until the platform closes or the engine quits, then
    /// cleans up and shuts the engine down.
    pub fn run<H: AppHandler<B, A>>(&mut self, handler: &mut H) -> Result<()> {
        if let Err(err) = handler.init(&mut self.engine) {
            log::error!("Application init failed: {err}");
            self.engine.shutdown();
            return Err(err);
        }

        while self.frame(handler) {}

        handler.cleanup(&mut self.engine);
        self.engine.shutdown();
        Ok(())
    }

    /// Runs one iteration of the loop. Returns `false`, without doing
    /// anything, once the platform has closed or a quit was requested.
    pub fn frame<H: AppHandler<B, A>>(&mut self, handler: &mut H) -> bool {
        if self.platform.should_close() || self.engine.quit_requested() {
            return false;
        }

        self.engine.tick();
        self.input.begin_frame();
        self.platform.poll_events(&mut self.input);

        let dt = self.engine.dt();
        handler.update(&mut self.engine, &self.input, dt);

        self.engine.begin_frame();
        handler.draw(&mut self.engine);
        self.platform.present();

        if self.engine.quit_requested() {
            self.platform.request_close();
        }
        true
    }
}
