//! Hello World
//!
//! A body sprite with an arm attached to it, spinning in front of the
//! camera. Runs headless for a fixed number of frames and prints where the
//! arm ended up.
//!
//! ```sh
//! cargo run --example hello_world
//! ```

use glam::{Vec2, Vec3};
use raster::{
    App, AppDescriptor, AppHandler, AudioBackend, Color, Engine, HeadlessBackend, HeadlessPlatform, InputState, Key,
    LoggingConfig, NullAudio, PlatformEvent, RenderBackend, SpriteDescriptor, SpriteHandle, init_logging,
};

const FRAMES: u64 = 120;

struct HelloWorld {
    body: Option<SpriteHandle>,
    arm: Option<SpriteHandle>,
}

impl<B: RenderBackend, A: AudioBackend> AppHandler<B, A> for HelloWorld {
    fn init(&mut self, engine: &mut Engine<B, A>) -> raster::Result<()> {
        let gfx = &mut engine.gfx;
        gfx.set_clear_color(Color::rgb(0.1, 0.1, 0.15));

        let body = gfx.create_sprite(&SpriteDescriptor {
            color: Color::rgb(0.9, 0.4, 0.2),
            ..SpriteDescriptor::default()
        })?;
        let arm = gfx.create_sprite(&SpriteDescriptor {
            position: Vec3::new(1.5, 0.0, 0.0),
            color: Color::rgb(0.2, 0.6, 0.9),
            ..SpriteDescriptor::default()
        })?;
        gfx.sprite_mut(arm).set_size(Vec2::new(1.0, 0.25));
        gfx.set_parent(arm, Some(body.into()))?;

        self.body = Some(body);
        self.arm = Some(arm);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine<B, A>, input: &InputState, _dt: f32) {
        if input.key_pressed(Key::Escape) {
            engine.quit();
            return;
        }
        let t = engine.time();
        if let Some(body) = self.body {
            engine.gfx.sprite_mut(body).set_rotation_z(t);
        }
    }

    fn cleanup(&mut self, engine: &mut Engine<B, A>) {
        if let Some(arm) = self.arm
            && let Some(pos) = engine.gfx.world_position(arm)
        {
            println!("Arm ended at ({:.2}, {:.2}, {:.2})", pos.x, pos.y, pos.z);
        }
        println!("Drew {} frames", engine.frame_count());
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let mut platform = HeadlessPlatform::with_frame_limit(FRAMES);
    for _ in 0..FRAMES - 1 {
        platform.push_frame([]);
    }
    platform.push_frame([PlatformEvent::Key { key: Key::Escape, pressed: true }]);

    let mut app = App::new(platform, HeadlessBackend::new(), NullAudio::new(), AppDescriptor::default());
    app.run(&mut HelloWorld { body: None, arm: None })?;

    let draws = app.engine().gfx.backend().draws().len();
    println!("Submitted {draws} draw calls");
    Ok(())
}
