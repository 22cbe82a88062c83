//! Scene rendering
//!
//! Draws one frame of simulation state into two 320x240 render targets:
//! `world` holds silhouette-casting content (tiles, entities) and
//! `display` holds everything composited in order. The world target is
//! first blitted four times at one-pixel offsets with a translucent
//! black tint, which draws a soft outline behind every sprite, then
//! once untinted on top. The finished display is scaled to the window
//! with the screenshake offset applied.

use macroquad::prelude::*;

use crate::assets::Assets;

use super::scene::{Scene, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use super::spark::{ALIVE_PALETTE, DEAD_PALETTE};

/// Background clear color.
const BACKDROP: Color = Color::new(0.137, 0.153, 0.165, 1.0);

/// Offsets for the silhouette pass.
const SILHOUETTE_OFFSETS: [Vec2; 4] = [
    vec2(-1.0, 0.0),
    vec2(1.0, 0.0),
    vec2(0.0, -1.0),
    vec2(0.0, 1.0),
];

/// Silhouette tint: black at ~20% alpha.
const SILHOUETTE_TINT: Color = Color::new(0.0, 0.0, 0.0, 0.196);

pub struct Display {
    world: RenderTarget,
    display: RenderTarget,
    world_cam: Camera2D,
    display_cam: Camera2D,
}

impl Display {
    pub fn new() -> Self {
        let world = pixel_target();
        let display = pixel_target();

        let mut world_cam =
            Camera2D::from_display_rect(Rect::new(0.0, 0.0, DISPLAY_WIDTH, DISPLAY_HEIGHT));
        world_cam.render_target = Some(world.clone());
        let mut display_cam =
            Camera2D::from_display_rect(Rect::new(0.0, 0.0, DISPLAY_WIDTH, DISPLAY_HEIGHT));
        display_cam.render_target = Some(display.clone());

        Self { world, display, world_cam, display_cam }
    }

    /// Render the scene into the display target.
    pub fn draw_scene(&self, scene: &Scene, assets: &Assets) {
        let rscroll = scene.camera.render_scroll();
        let view = scene.view_size();

        // Parallax backdrop straight onto the display (no outline)
        set_camera(&self.display_cam);
        clear_background(BACKDROP);
        for (layer, textures) in [(&scene.stars, &assets.stars), (&scene.dust, &assets.dust)] {
            for drifter in &layer.drifters {
                let texture = &textures[drifter.image % textures.len()];
                let sprite = vec2(texture.width(), texture.height());
                let pos = drifter.wrapped_pos(rscroll, view, sprite);
                draw_texture(texture, pos.x, pos.y, WHITE);
            }
        }

        // Silhouette-casting content goes to the world target
        set_camera(&self.world_cam);
        clear_background(BLANK);
        self.draw_tiles(scene, assets, rscroll, view);
        self.draw_entities(scene, assets, rscroll);

        // Composite: outline ring first, then the content itself
        set_camera(&self.display_cam);
        for offset in SILHOUETTE_OFFSETS {
            self.blit_target(&self.world, offset, SILHOUETTE_TINT);
        }
        self.blit_target(&self.world, Vec2::ZERO, WHITE);

        // Sparks draw over everything and cast no silhouette
        let palette = if scene.dead > 0 { &DEAD_PALETTE } else { &ALIVE_PALETTE };
        for spark in &scene.sparks {
            spark.render(rscroll, palette);
        }

        // Death transition wipe
        if let Some(radius) = scene.wipe_radius() {
            let center = scene.player.body.center() - rscroll;
            draw_circle(center.x, center.y, radius, BLACK);
        }
    }

    fn draw_tiles(&self, scene: &Scene, assets: &Assets, rscroll: Vec2, view: Vec2) {
        let ts = scene.tilemap.tile_size() as f32;

        // Off-grid decoration sits behind the grid
        for tile in scene.tilemap.offgrid_tiles() {
            if let Some(texture) = assets.tile_texture(tile.kind, tile.variant) {
                let x = tile.pos.0 as f32 - rscroll.x;
                let y = tile.pos.1 as f32 - rscroll.y;
                draw_texture(texture, x, y, WHITE);
            }
        }

        for tile in scene.tilemap.visible_tiles(rscroll, view) {
            if let Some(texture) = assets.tile_texture(tile.kind, tile.variant) {
                let x = tile.pos.0 as f32 * ts - rscroll.x;
                let y = tile.pos.1 as f32 * ts - rscroll.y;
                draw_texture(texture, x, y, WHITE);
            }
        }
    }

    fn draw_entities(&self, scene: &Scene, assets: &Assets, rscroll: Vec2) {
        for enemy in &scene.enemies {
            draw_body_sprite(&enemy.body, assets, rscroll);
        }
        if scene.dead == 0 {
            draw_body_sprite(&scene.player.body, assets, rscroll);
        }
    }

    /// Scale the display to the window, offset by the screenshake.
    pub fn present(&self, scene: &Scene) {
        set_default_camera();
        clear_background(BLACK);

        let scale = (screen_width() / DISPLAY_WIDTH).min(screen_height() / DISPLAY_HEIGHT);
        let size = vec2(DISPLAY_WIDTH, DISPLAY_HEIGHT) * scale;
        let origin = (vec2(screen_width(), screen_height()) - size) / 2.0
            + scene.camera.shake_offset() * scale;

        draw_texture_ex(
            &self.display.texture,
            origin.x,
            origin.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(size),
                // Render target textures come out upside down
                flip_y: true,
                ..Default::default()
            },
        );
    }

    fn blit_target(&self, target: &RenderTarget, offset: Vec2, tint: Color) {
        draw_texture_ex(
            &target.texture,
            offset.x,
            offset.y,
            tint,
            DrawTextureParams {
                dest_size: Some(vec2(DISPLAY_WIDTH, DISPLAY_HEIGHT)),
                flip_y: true,
                ..Default::default()
            },
        );
    }
}

fn pixel_target() -> RenderTarget {
    let target = render_target(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32);
    target.texture.set_filter(FilterMode::Nearest);
    target
}

fn draw_body_sprite(body: &super::physics::Body, assets: &Assets, rscroll: Vec2) {
    let texture = assets.sprite(body.kind, body.action, body.anim.frame_index());
    let pos = body.draw_pos(rscroll);
    draw_texture_ex(
        texture,
        pos.x,
        pos.y,
        WHITE,
        DrawTextureParams { flip_x: body.flip, ..Default::default() },
    );
}
