//! Graphics facade tests
//!
//! Tests for:
//! - Sprite creation, drawing and the parent/child scenario
//! - Stale handle tolerance
//! - Cleanup after failed construction and on shutdown
//! - Shader parameters and texture fallback
//! - Text layout, alignment and the shared text program

use std::path::PathBuf;
use std::rc::Rc;

use glam::{Mat4, UVec2, Vec2, Vec3};
use raster::render::QuadLayout;
use raster::resources::{MAX_FONT_SIZE, MAX_SHADER_PARAMS, ShaderParam};
use raster::text::{GlyphBitmap, LineMetrics};
use raster::{
    Camera, Color, EngineSettings, FrameContext, GlyphRasterizer, Graphics, HeadlessBackend, ParamValue,
    RasterError, SpriteDescriptor, TextAlign, TextDescriptor,
};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;
const FONT: &str = "block.ttf";

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

/// Monospace font of solid boxes: every glyph is `px / 2` wide and
/// `ascent` tall, sitting on the baseline. Spaces are blank.
struct BlockFont;

impl GlyphRasterizer for BlockFont {
    fn line_metrics(&self, px: f32) -> LineMetrics {
        LineMetrics {
            ascent: px * 0.75,
            descent: -px * 0.25,
        }
    }

    fn advance(&self, _ch: char, px: f32) -> f32 {
        px * 0.5
    }

    fn rasterize(&self, ch: char, px: f32) -> GlyphBitmap {
        if ch == ' ' {
            return GlyphBitmap::default();
        }
        let width = (px * 0.5).round() as usize;
        let height = (px * 0.75).round() as usize;
        GlyphBitmap {
            left: 0,
            top: -(height as i32),
            width,
            height,
            coverage: vec![255; width * height],
        }
    }
}

/// Reports metrics for any size but draws nothing.
struct MetricsOnlyFont;

impl GlyphRasterizer for MetricsOnlyFont {
    fn line_metrics(&self, px: f32) -> LineMetrics {
        LineMetrics {
            ascent: px * 0.8,
            descent: -px * 0.2,
        }
    }

    fn advance(&self, _ch: char, px: f32) -> f32 {
        px * 0.6
    }

    fn rasterize(&self, _ch: char, _px: f32) -> GlyphBitmap {
        GlyphBitmap::default()
    }
}

fn graphics() -> Graphics<HeadlessBackend> {
    graphics_with(HeadlessBackend::new(), &EngineSettings::default())
}

fn graphics_with(backend: HeadlessBackend, settings: &EngineSettings) -> Graphics<HeadlessBackend> {
    let mut gfx = Graphics::new(backend, settings);
    gfx.fonts_mut().register(FONT, Rc::new(BlockFont));
    gfx
}

fn text_desc(text: &str) -> TextDescriptor {
    TextDescriptor {
        font_path: FONT.into(),
        text: text.into(),
        ..Default::default()
    }
}

fn sprite_at(position: Vec3) -> SpriteDescriptor {
    SpriteDescriptor {
        position,
        ..Default::default()
    }
}

// ============================================================================
// Sprites
// ============================================================================

#[test]
fn create_sprite_allocates_backend_objects() {
    let mut gfx = graphics();
    let sprite = gfx
        .create_sprite(&SpriteDescriptor {
            color: Color::rgb(1.0, 0.0, 0.0),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(gfx.sprite_count(), 1);
    assert_eq!(gfx.graph().len(), 1);
    assert_eq!(gfx.backend().live_programs(), 1);
    assert_eq!(gfx.backend().live_meshes(), 1);
    assert_eq!(gfx.sprite_color(sprite), Some(Color::rgb(1.0, 0.0, 0.0)));

    // Built-in shader samples a texture, so the quad carries texcoords.
    let mesh = gfx.sprite(sprite).unwrap().mesh();
    assert_eq!(gfx.backend().mesh_layout(mesh), Some(QuadLayout::Textured));
}

#[test]
fn parented_sprite_follows_parent() {
    let mut gfx = graphics();
    let s1 = gfx.create_sprite(&sprite_at(Vec3::ZERO)).unwrap();
    let s2 = gfx.create_sprite(&sprite_at(Vec3::new(1.5, 0.0, 0.0))).unwrap();

    gfx.set_parent(s2, Some(s1.into())).unwrap();
    gfx.set_position(s1, Vec3::new(0.0, 2.0, 0.0));

    assert!(vec3_approx(gfx.world_position(s2).unwrap(), Vec3::new(1.5, 2.0, 0.0)));
    assert!(vec3_approx(gfx.position(s2).unwrap(), Vec3::new(1.5, 0.0, 0.0)));

    gfx.draw_sprite(s2, &FrameContext::default());
    let draw = &gfx.backend().draws()[0];
    assert!(vec3_approx(draw.model.w_axis.truncate(), Vec3::new(1.5, 2.0, 0.0)));
}

#[test]
fn draw_uses_camera_matrices() {
    let mut gfx = graphics();
    let sprite = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    let camera = Camera::default();

    gfx.draw_sprite(sprite, &FrameContext::new(Some(&camera), 1.5));
    let draw = &gfx.backend().draws()[0];
    assert_eq!(draw.view, camera.view_matrix());
    assert_eq!(draw.projection, camera.projection_matrix());
    assert!(approx_eq(draw.time, 1.5));

    gfx.draw_sprite(sprite, &FrameContext::default());
    let draw = &gfx.backend().draws()[1];
    assert_eq!(draw.view, Mat4::IDENTITY);
    assert_eq!(draw.projection, Mat4::IDENTITY);
}

#[test]
fn sprite_size_is_node_scale() {
    let mut gfx = graphics();
    let sprite = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();

    gfx.set_sprite_size(sprite, Vec2::new(2.0, 0.5));
    assert_eq!(gfx.sprite_size(sprite), Some(Vec2::new(2.0, 0.5)));
    assert!(approx_eq(gfx.sprite_scale(sprite).unwrap().z, 1.0));

    gfx.draw_sprite(sprite, &FrameContext::default());
    assert_eq!(gfx.backend().draws()[0].size, Vec2::new(2.0, 0.5));
}

#[test]
fn sprite_rotation_is_applied_to_model() {
    let mut gfx = graphics();
    let sprite = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    gfx.set_rotation_z(sprite, std::f32::consts::FRAC_PI_2);

    let model = Mat4::from(gfx.world_matrix(sprite).unwrap());
    assert!(vec3_approx(model.transform_vector3(Vec3::X), Vec3::Y));
}

#[test]
fn chained_setters_apply_in_order() {
    let mut gfx = graphics();
    let sprite = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();

    gfx.sprite_mut(sprite)
        .set_position(Vec3::new(1.0, 2.0, 3.0))
        .set_size(Vec2::splat(0.5))
        .set_color(Color::BLACK)
        .set_param("uGlow", 0.8_f32);

    assert_eq!(gfx.position(sprite), Some(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(gfx.sprite_size(sprite), Some(Vec2::splat(0.5)));
    assert_eq!(gfx.sprite_color(sprite), Some(Color::BLACK));
    assert_eq!(gfx.sprite_param(sprite, "uGlow"), Some(ParamValue::Float(0.8)));
}

#[test]
fn sprite_pool_exhaustion_leaves_state_unchanged() {
    let settings = EngineSettings {
        sprite_capacity: 2,
        ..Default::default()
    };
    let mut gfx = graphics_with(HeadlessBackend::new(), &settings);
    gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    gfx.create_sprite(&SpriteDescriptor::default()).unwrap();

    let err = gfx.create_sprite(&SpriteDescriptor::default()).unwrap_err();
    assert!(matches!(err, RasterError::ResourceExhausted { kind: "sprite", capacity: 2 }));
    assert_eq!(gfx.sprite_count(), 2);
    assert_eq!(gfx.graph().len(), 2);
    assert_eq!(gfx.backend().live_programs(), 2);
}

// ============================================================================
// Stale handles
// ============================================================================

#[test]
fn destroyed_sprite_is_inert() {
    let mut gfx = graphics();
    let sprite = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    gfx.destroy_sprite(sprite);

    assert!(gfx.sprite(sprite).is_none());
    assert!(gfx.position(sprite).is_none());
    assert!(gfx.sprite_color(sprite).is_none());

    gfx.draw_sprite(sprite, &FrameContext::default());
    gfx.set_position(sprite, Vec3::ONE);
    gfx.set_sprite_color(sprite, Color::BLACK);
    assert!(gfx.set_sprite_param(sprite, "uGlow", 1.0_f32).is_ok());
    gfx.destroy_sprite(sprite);

    assert!(gfx.backend().draws().is_empty());
    assert!(gfx.backend().is_clean());
    assert!(gfx.graph().is_empty());
}

#[test]
fn reused_slot_does_not_answer_old_handle() {
    let mut gfx = graphics();
    let old = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    gfx.destroy_sprite(old);
    let new = gfx.create_sprite(&sprite_at(Vec3::X)).unwrap();

    assert_eq!(old.index(), new.index());
    assert!(gfx.position(old).is_none());
    assert_eq!(gfx.position(new), Some(Vec3::X));
}

#[test]
fn stale_parent_is_reported() {
    let mut gfx = graphics();
    let parent = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    let child = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    gfx.destroy_sprite(parent);

    assert!(matches!(
        gfx.set_parent(child, Some(parent.into())),
        Err(RasterError::StaleHandle { kind: "sprite" })
    ));
}

#[test]
fn destroying_parent_sprite_keeps_child_drawable() {
    let mut gfx = graphics();
    let parent = gfx.create_sprite(&sprite_at(Vec3::new(0.0, 5.0, 0.0))).unwrap();
    let child = gfx.create_sprite(&sprite_at(Vec3::X)).unwrap();
    gfx.set_parent(child, Some(parent.into())).unwrap();

    gfx.destroy_sprite(parent);
    assert!(vec3_approx(gfx.world_position(child).unwrap(), Vec3::X));

    gfx.draw_all(&FrameContext::default());
    assert_eq!(gfx.backend().draws().len(), 1);
}

// ============================================================================
// Failed construction
// ============================================================================

#[test]
fn failed_mesh_releases_program_and_node() {
    let mut backend = HeadlessBackend::new();
    backend.fail_meshes = true;
    let mut gfx = graphics_with(backend, &EngineSettings::default());

    let err = gfx.create_sprite(&SpriteDescriptor::default()).unwrap_err();
    assert!(matches!(err, RasterError::Backend(_)));
    assert_eq!(gfx.sprite_count(), 0);
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
}

#[test]
fn failed_program_releases_node() {
    let mut backend = HeadlessBackend::new();
    backend.fail_programs = true;
    let mut gfx = graphics_with(backend, &EngineSettings::default());

    assert!(matches!(
        gfx.create_sprite(&SpriteDescriptor::default()),
        Err(RasterError::ShaderError(_))
    ));
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
}

#[test]
fn missing_shader_file_fails_cleanly() {
    let mut gfx = graphics();
    let desc = SpriteDescriptor {
        vertex_shader_path: Some(PathBuf::from("does/not/exist.vert")),
        ..Default::default()
    };

    assert!(matches!(gfx.create_sprite(&desc), Err(RasterError::IoError(_))));
    assert_eq!(gfx.sprite_count(), 0);
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
}

#[test]
fn malformed_descriptor_allocates_nothing() {
    let mut gfx = graphics();
    let desc = SpriteDescriptor {
        texture_path: Some(PathBuf::new()),
        ..Default::default()
    };
    assert!(matches!(gfx.create_sprite(&desc), Err(RasterError::MalformedDescriptor(_))));

    let too_many = SpriteDescriptor {
        params: (0..=MAX_SHADER_PARAMS).map(|i| ShaderParam::new(format!("p{i}"), 1.0_f32)).collect(),
        ..Default::default()
    };
    assert!(matches!(gfx.create_sprite(&too_many), Err(RasterError::MalformedDescriptor(_))));
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
}

#[test]
fn failed_text_upload_releases_shared_program() {
    let mut backend = HeadlessBackend::new();
    backend.fail_textures = true;
    let mut gfx = graphics_with(backend, &EngineSettings::default());

    assert!(gfx.create_text(&text_desc("Hi")).is_err());
    assert_eq!(gfx.text_count(), 0);
    assert_eq!(gfx.text_program_users(), 0);
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
}

#[test]
fn oversized_font_is_rejected_without_allocating() {
    let mut gfx = graphics();
    gfx.fonts_mut().register("f.ttf", Rc::new(MetricsOnlyFont));
    let desc = TextDescriptor {
        font_path: "f.ttf".into(),
        text: "a\n".repeat(40),
        font_size: 5.0e8,
        ..Default::default()
    };

    assert!(matches!(gfx.create_text(&desc), Err(RasterError::MalformedDescriptor(_))));
    assert_eq!(gfx.text_count(), 0);
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
}

#[test]
fn text_taller_than_bitmap_limit_fails_cleanly() {
    let mut gfx = graphics();
    // round(1000 * 1.2) per line over 21 lines is past MAX_TEXT_BITMAP_DIMENSION.
    let desc = TextDescriptor {
        font_size: 1000.0,
        ..text_desc(&"a\n".repeat(20))
    };

    assert!(matches!(gfx.create_text(&desc), Err(RasterError::MalformedDescriptor(_))));
    assert_eq!(gfx.text_count(), 0);
    assert_eq!(gfx.text_program_users(), 0);
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
}

#[test]
fn unknown_font_fails_before_allocating() {
    let mut gfx = graphics();
    let desc = TextDescriptor {
        font_path: "no/such/font.ttf".into(),
        text: "Hi".into(),
        ..Default::default()
    };

    assert!(matches!(gfx.create_text(&desc), Err(RasterError::FontLoad { .. })));
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
}

// ============================================================================
// Shader parameters & textures
// ============================================================================

#[test]
fn param_table_overflow_is_an_error() {
    let mut gfx = graphics();
    let sprite = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();

    for i in 0..MAX_SHADER_PARAMS {
        gfx.set_sprite_param(sprite, &format!("p{i}"), i as f32).unwrap();
    }
    assert!(matches!(
        gfx.set_sprite_param(sprite, "one_too_many", 1.0_f32),
        Err(RasterError::ParameterTableFull { .. })
    ));
    assert!(gfx.sprite_param(sprite, "one_too_many").is_none());

    // Existing names can still be overwritten, even with another kind.
    gfx.set_sprite_param(sprite, "p3", Vec3::ONE).unwrap();
    assert_eq!(gfx.sprite_param(sprite, "p3"), Some(ParamValue::Vec3(Vec3::ONE)));
}

#[test]
fn chained_param_overflow_keeps_the_chain_going() {
    let mut gfx = graphics();
    let sprite = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    for i in 0..MAX_SHADER_PARAMS {
        gfx.set_sprite_param(sprite, &format!("p{i}"), i as f32).unwrap();
    }

    gfx.sprite_mut(sprite)
        .set_param("one_too_many", 1.0_f32)
        .set_color(Color::BLACK)
        .set_param("p0", 9.0_f32);

    let info = gfx.sprite(sprite).unwrap();
    assert_eq!(info.params().len(), MAX_SHADER_PARAMS);
    assert!(gfx.sprite_param(sprite, "one_too_many").is_none());
    assert_eq!(gfx.sprite_param(sprite, "p0"), Some(ParamValue::Float(9.0)));
    assert_eq!(gfx.sprite_color(sprite), Some(Color::BLACK));
}

#[test]
fn params_reach_the_draw_call() {
    let mut gfx = graphics();
    let desc = SpriteDescriptor {
        params: vec![ShaderParam::new("uGlow", 0.5_f32), ShaderParam::new("uTiles", 4_i32)],
        ..Default::default()
    };
    let sprite = gfx.create_sprite(&desc).unwrap();

    gfx.draw_sprite(sprite, &FrameContext::default());
    let params = &gfx.backend().draws()[0].params;
    assert_eq!(params.len(), 2);
    assert_eq!(params[0], ShaderParam::new("uGlow", 0.5_f32));
    assert_eq!(params[1].value, ParamValue::Int(4));
}

#[test]
fn missing_texture_falls_back_to_untextured() {
    let mut backend = HeadlessBackend::new();
    backend.missing_textures.insert(PathBuf::from("missing.png"));
    let mut gfx = graphics_with(backend, &EngineSettings::default());

    let sprite = gfx
        .create_sprite(&SpriteDescriptor {
            texture_path: Some("missing.png".into()),
            ..Default::default()
        })
        .unwrap();

    assert!(gfx.sprite(sprite).unwrap().texture().is_none());
    assert_eq!(gfx.backend().live_textures(), 0);
}

#[test]
fn sprite_texture_can_be_swapped_and_removed() {
    let mut gfx = graphics();
    let sprite = gfx
        .create_sprite(&SpriteDescriptor {
            texture_path: Some("a.png".into()),
            ..Default::default()
        })
        .unwrap();
    let first = gfx.sprite(sprite).unwrap().texture().unwrap();

    gfx.set_sprite_texture(sprite, Some("b.png".as_ref())).unwrap();
    let second = gfx.sprite(sprite).unwrap().texture().unwrap();
    assert_ne!(first, second);
    assert_eq!(gfx.backend().live_textures(), 1);

    gfx.set_sprite_texture(sprite, None).unwrap();
    assert!(gfx.sprite(sprite).unwrap().texture().is_none());
    assert_eq!(gfx.backend().live_textures(), 0);
}

#[test]
fn plain_vertex_shader_gets_plain_quad() {
    let path = std::env::temp_dir().join(format!("raster_plain_{}.vert", std::process::id()));
    std::fs::write(
        &path,
        "layout(location = 0) in vec3 aPos;\nvoid main() { gl_Position = vec4(aPos, 1.0); }\n",
    )
    .unwrap();

    let mut gfx = graphics();
    let sprite = gfx
        .create_sprite(&SpriteDescriptor {
            vertex_shader_path: Some(path.clone()),
            ..Default::default()
        })
        .unwrap();
    let mesh = gfx.sprite(sprite).unwrap().mesh();
    assert_eq!(gfx.backend().mesh_layout(mesh), Some(QuadLayout::Plain));

    std::fs::remove_file(path).ok();
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn text_bitmap_fits_content() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("Hi")).unwrap();

    // 2 glyphs * 16px + 10 padding; line height round(32 * 1.2) + 10.
    let info = gfx.text(text).unwrap();
    assert_eq!(info.bitmap_size(), UVec2::new(42, 48));
    let bitmap = gfx.backend().alpha_bitmap(info.texture()).unwrap();
    assert_eq!((bitmap.width, bitmap.height), (42, 48));

    // Left aligned: first glyph starts after half the padding, on row
    // baseline - ascent = 0.
    assert_eq!(bitmap.coverage_at(4, 10), Some(0));
    assert_eq!(bitmap.coverage_at(5, 0), Some(255));
    assert_eq!(bitmap.coverage_at(36, 23), Some(255));
    assert_eq!(bitmap.coverage_at(37, 23), Some(0));
    assert_eq!(bitmap.coverage_at(5, 24), Some(0));
}

#[test]
fn text_node_is_scaled_by_font_size() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("Hi")).unwrap();
    let scale = gfx.graph().scale(gfx.text(text).unwrap().node()).unwrap();
    assert!(vec3_approx(scale, Vec3::new(1.28, -1.28, 1.0)));

    gfx.set_font_size(text, 16.0).unwrap();
    let scale = gfx.graph().scale(gfx.text(text).unwrap().node()).unwrap();
    assert!(vec3_approx(scale, Vec3::new(0.64, -0.64, 1.0)));
    assert_eq!(gfx.text(text).unwrap().bitmap_size(), UVec2::new(26, 29));

    // Ignored
    gfx.set_font_size(text, -4.0).unwrap();
    assert_eq!(gfx.font_size(text), Some(16.0));
}

#[test]
fn text_draw_is_stretched_to_bitmap_aspect() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("Hi")).unwrap();
    gfx.draw_text(text, &FrameContext::default());

    let draw = &gfx.backend().draws()[0];
    let aspect = 42.0 / 48.0;
    assert!(approx_eq(draw.model.x_axis.x, 1.28 * aspect));
    assert!(approx_eq(draw.model.y_axis.y, -1.28));
    assert!(approx_eq(draw.size.x, 1.28 * aspect));
    assert!(approx_eq(draw.size.y, 1.28));
    assert!(draw.texture.is_some());
}

#[test]
fn font_size_above_maximum_is_rejected() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\nm\nn")).unwrap();
    let before = gfx.text(text).unwrap().bitmap_size();

    assert!(matches!(
        gfx.set_font_size(text, MAX_FONT_SIZE * 2.0),
        Err(RasterError::MalformedDescriptor(_))
    ));
    assert_eq!(gfx.font_size(text), Some(32.0));

    // Allowed size, but 14 lines of round(1000 * 1.2) overflow the bitmap.
    assert!(gfx.set_font_size(text, 1000.0).is_err());
    assert_eq!(gfx.font_size(text), Some(32.0));
    assert_eq!(gfx.text(text).unwrap().bitmap_size(), before);
    let scale = gfx.graph().scale(gfx.text(text).unwrap().node()).unwrap();
    assert!(vec3_approx(scale, Vec3::new(1.28, -1.28, 1.0)));
}

#[test]
fn failed_relayout_leaves_text_unchanged() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("Hi")).unwrap();
    let texture = gfx.text(text).unwrap().texture();
    let bitmap = gfx.backend().alpha_bitmap(texture).unwrap().clone();
    gfx.backend_mut().fail_textures = true;

    assert!(matches!(gfx.set_text(text, "Hello"), Err(RasterError::Backend(_))));
    assert!(gfx.set_font_size(text, 64.0).is_err());
    assert!(gfx.set_text_alignment(text, TextAlign::Right).is_err());
    assert!(gfx.set_line_spacing(text, 2.0).is_err());

    let info = gfx.text(text).unwrap();
    assert_eq!(info.content(), "Hi");
    assert_eq!(info.font_size(), 32.0);
    assert_eq!(info.alignment(), TextAlign::Left);
    assert!(approx_eq(info.line_spacing(), 1.2));
    assert_eq!(info.bitmap_size(), UVec2::new(42, 48));
    assert_eq!(info.texture(), texture);
    let scale = gfx.graph().scale(info.node()).unwrap();
    assert!(vec3_approx(scale, Vec3::new(1.28, -1.28, 1.0)));
    assert_eq!(gfx.backend().alpha_bitmap(texture), Some(&bitmap));

    // Recovers once uploads work again.
    gfx.backend_mut().fail_textures = false;
    gfx.set_text(text, "Hello").unwrap();
    assert_eq!(gfx.text(text).unwrap().bitmap_size(), UVec2::new(90, 48));
}

#[test]
fn alignment_offsets_shorter_lines() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("Hi\nA")).unwrap();
    let texture = gfx.text(text).unwrap().texture();
    // Second line glyph spans rows 38..62.
    let row = 40;

    let bitmap = gfx.backend().alpha_bitmap(texture).unwrap();
    assert_eq!((bitmap.width, bitmap.height), (42, 86));
    assert_eq!(bitmap.coverage_at(5, row), Some(255));
    assert_eq!(bitmap.coverage_at(4, row), Some(0));

    gfx.set_text_alignment(text, TextAlign::Center).unwrap();
    let bitmap = gfx.backend().alpha_bitmap(texture).unwrap();
    assert_eq!(bitmap.coverage_at(12, row), Some(0));
    assert_eq!(bitmap.coverage_at(13, row), Some(255));
    assert_eq!(bitmap.coverage_at(28, row), Some(255));
    assert_eq!(bitmap.coverage_at(29, row), Some(0));

    gfx.set_text_alignment(text, TextAlign::Right).unwrap();
    let bitmap = gfx.backend().alpha_bitmap(texture).unwrap();
    assert_eq!(bitmap.coverage_at(20, row), Some(0));
    assert_eq!(bitmap.coverage_at(21, row), Some(255));
    assert_eq!(bitmap.coverage_at(36, row), Some(255));
    assert_eq!(bitmap.coverage_at(37, row), Some(0));
}

#[test]
fn set_text_relayouts_into_same_texture() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("Hi")).unwrap();
    let texture = gfx.text(text).unwrap().texture();

    gfx.set_text(text, "Hello").unwrap();
    let info = gfx.text(text).unwrap();
    assert_eq!(info.content(), "Hello");
    assert_eq!(info.texture(), texture);
    assert_eq!(info.bitmap_size(), UVec2::new(90, 48));
    assert_eq!(gfx.backend().live_textures(), 1);
}

#[test]
fn long_text_is_truncated() {
    let mut gfx = graphics();
    let long = "x".repeat(300);
    let text = gfx.create_text(&text_desc(&long)).unwrap();
    assert_eq!(gfx.text(text).unwrap().content().chars().count(), 255);
}

#[test]
fn line_spacing_is_clamped() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("Hi")).unwrap();

    gfx.set_line_spacing(text, 10.0).unwrap();
    assert_eq!(gfx.line_spacing(text), Some(3.0));
    assert_eq!(gfx.text(text).unwrap().bitmap_size().y, 96 + 10);

    gfx.set_line_spacing(text, 0.1).unwrap();
    assert_eq!(gfx.line_spacing(text), Some(0.5));
    assert_eq!(gfx.text(text).unwrap().bitmap_size().y, 16 + 10);
}

#[test]
fn texts_share_one_program() {
    let mut gfx = graphics();
    let a = gfx.create_text(&text_desc("a")).unwrap();
    let b = gfx.create_text(&text_desc("b")).unwrap();

    assert_eq!(gfx.text(a).unwrap().program(), gfx.text(b).unwrap().program());
    assert_eq!(gfx.text_program_users(), 2);
    assert_eq!(gfx.backend().live_programs(), 1);

    gfx.destroy_text(a);
    assert_eq!(gfx.text_program_users(), 1);
    assert_eq!(gfx.backend().live_programs(), 1);

    gfx.destroy_text(b);
    assert_eq!(gfx.text_program_users(), 0);
    assert!(gfx.backend().is_clean());
    assert!(gfx.graph().is_empty());
}

#[test]
fn text_can_be_parented_to_sprite() {
    let mut gfx = graphics();
    let body = gfx.create_sprite(&sprite_at(Vec3::new(0.0, 2.0, 0.0))).unwrap();
    let mut desc = text_desc("label");
    desc.position = Vec3::new(0.0, 1.0, 0.0);
    let label = gfx.create_text(&desc).unwrap();

    gfx.set_parent(label, Some(body.into())).unwrap();
    assert!(vec3_approx(gfx.world_position(label).unwrap(), Vec3::new(0.0, 3.0, 0.0)));
}

#[test]
fn chained_text_setters() {
    let mut gfx = graphics();
    let text = gfx.create_text(&text_desc("Hi")).unwrap();

    gfx.text_mut(text)
        .set_text("Bye")
        .set_color(Color::BLACK)
        .set_alignment(TextAlign::Right)
        .set_line_spacing(2.0);

    assert_eq!(gfx.text(text).unwrap().content(), "Bye");
    assert_eq!(gfx.text_color(text), Some(Color::BLACK));
    assert_eq!(gfx.text_alignment(text), Some(TextAlign::Right));
    assert_eq!(gfx.line_spacing(text), Some(2.0));
}

// ============================================================================
// Frame & shutdown
// ============================================================================

#[test]
fn draw_all_submits_every_resource() {
    let mut gfx = graphics();
    gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    gfx.create_text(&text_desc("Hi")).unwrap();

    gfx.begin_frame();
    gfx.draw_all(&FrameContext::default());
    assert_eq!(gfx.backend().frames(), 1);
    assert_eq!(gfx.backend().last_clear_color(), Some(gfx.clear_color()));

    let draws = gfx.backend_mut().take_draws();
    assert_eq!(draws.len(), 3);
    // Sprites first, then texts.
    assert!(draws[2].texture.is_some());
}

#[test]
fn shutdown_releases_everything() {
    let mut gfx = graphics();
    let parent = gfx.create_sprite(&SpriteDescriptor::default()).unwrap();
    let child = gfx.create_text(&text_desc("Hi")).unwrap();
    gfx.set_parent(child, Some(parent.into())).unwrap();

    gfx.shutdown();
    assert_eq!(gfx.sprite_count(), 0);
    assert_eq!(gfx.text_count(), 0);
    assert!(gfx.graph().is_empty());
    assert!(gfx.backend().is_clean());
    assert!(gfx.sprite(parent).is_none());
}
