//! EMBER-240: a low-res 2D action platformer
//!
//! A 320x240 side-scroller in the indie pixel-art mold:
//! - Axis-separated tile collision (X fully resolved before Y)
//! - Rope climbing, double jumps, a hitscan beam weapon
//! - Spark particles, parallax star/dust layers, screenshake
//! - Death handled as a growing wipe followed by a full level reload

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod assets;
mod game;
mod input;
mod level;

use macroquad::audio::play_sound_once;
use macroquad::prelude::*;

use assets::Assets;
use game::events::SoundId;
use game::{Display, Scene};
use input::InputState;

/// Simulation rate; the frame loop sleeps down to this on fast screens.
const TARGET_FRAME_TIME: f64 = 1.0 / 60.0;

/// Level file loaded at startup, falling back to the built-in level.
const LEVEL_PATH: &str = "assets/maps/0.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("EMBER-240 v{}", VERSION),
        window_width: 640,
        window_height: 480,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let level = match level::load_level(std::path::Path::new(LEVEL_PATH)) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Could not load {}: {}, using built-in level", LEVEL_PATH, e);
            let level = level::sample_level();
            // Write it out so there is a file to edit next run
            #[cfg(not(target_arch = "wasm32"))]
            {
                let path = std::path::Path::new(LEVEL_PATH);
                if let Some(dir) = path.parent() {
                    let _ = std::fs::create_dir_all(dir);
                }
                if let Err(e) = level::save_level(path, &level) {
                    eprintln!("Could not write {}: {}", LEVEL_PATH, e);
                }
            }
            level
        }
    };
    let mut scene = Scene::new(level);

    let assets = match Assets::load(&scene.animations).await {
        Ok(assets) => assets,
        Err(e) => {
            eprintln!("Asset loading failed: {}", e);
            return;
        }
    };

    let display = Display::new();
    let input = InputState::new();

    // The cursor is drawn as a sprite so it scales with the pixel art
    show_mouse(false);

    loop {
        let frame_start = get_time();

        let intents = input.intents();
        if intents.quit {
            break;
        }

        scene.simulate(&intents);

        for sound in scene.take_sounds() {
            match sound {
                SoundId::Shoot => {
                    if let Some(s) = &assets.shoot_sound {
                        play_sound_once(s);
                    }
                }
            }
        }

        display.draw_scene(&scene, &assets);
        display.present(&scene);
        draw_overlay(&assets);

        // Frame pacing: simulation constants are tuned per-frame, so we
        // hold 60 fps rather than scale by delta time
        let elapsed = get_time() - frame_start;
        if elapsed < TARGET_FRAME_TIME {
            #[cfg(not(target_arch = "wasm32"))]
            {
                let spin_margin = 0.002;
                while get_time() - frame_start + spin_margin < TARGET_FRAME_TIME {
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                while get_time() - frame_start < TARGET_FRAME_TIME {
                    std::hint::spin_loop();
                }
            }
            // WASM: the browser handles frame pacing
        }

        next_frame().await;
    }
}

/// FPS counter and the custom cursor, drawn in window coordinates on
/// top of the scaled display.
fn draw_overlay(assets: &Assets) {
    draw_text(&format!("FPS {}", get_fps()), 8.0, 20.0, 20.0, WHITE);

    let (mx, my) = mouse_position();
    draw_texture(&assets.cursor, mx, my, WHITE);
}
