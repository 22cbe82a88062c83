//! Asset loading
//!
//! Loads every texture and sound the game needs up front. Animation
//! frames are fatal when missing - the runtime indexes into them by
//! frame number and a hole would panic mid-game. The shoot sound is
//! optional; the game stays playable muted.

use std::collections::HashMap;
use std::fmt;

use macroquad::audio::{load_sound, Sound};
use macroquad::prelude::*;

use crate::game::animation::{ActionState, AnimationSet, EntityKind};
use crate::game::tilemap::TileKind;

/// Star sprite variants under assets/art/stars/.
pub const STAR_IMAGES: usize = 3;
/// Dust sprite variants under assets/art/dust/.
pub const DUST_IMAGES: usize = 3;

/// Tile variant counts per kind, matching the files on disk.
const TILE_VARIANTS: [(TileKind, usize); 7] = [
    (TileKind::Default, 4),
    (TileKind::Grass, 4),
    (TileKind::Pillar, 2),
    (TileKind::Platform, 2),
    (TileKind::Decor, 3),
    (TileKind::Rope, 1),
    (TileKind::Spawner, 2),
];

#[derive(Debug)]
pub enum AssetError {
    /// A required file failed to load.
    Load { path: String, source: macroquad::Error },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Load { path, source } => {
                write!(f, "failed to load {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for AssetError {}

pub struct Assets {
    tiles: HashMap<TileKind, Vec<Texture2D>>,
    sprites: [[Vec<Texture2D>; ActionState::COUNT]; EntityKind::COUNT],
    pub stars: Vec<Texture2D>,
    pub dust: Vec<Texture2D>,
    pub cursor: Texture2D,
    pub shoot_sound: Option<Sound>,
}

impl Assets {
    /// Load everything. Frame counts follow the animation table so the
    /// renderer can index by `frame_index()` without bounds surprises.
    pub async fn load(animations: &AnimationSet) -> Result<Assets, AssetError> {
        let mut tiles = HashMap::new();
        for (kind, count) in TILE_VARIANTS {
            let dir = tile_dir(kind);
            tiles.insert(kind, load_strip(&format!("assets/art/tiles/{}", dir), count).await?);
        }

        let mut sprites: [[Vec<Texture2D>; ActionState::COUNT]; EntityKind::COUNT] =
            std::array::from_fn(|_| std::array::from_fn(|_| Vec::new()));
        for kind in [EntityKind::Player, EntityKind::Enemy] {
            for action in ActionState::ALL {
                if let Some(dir) = sprite_dir(kind, action) {
                    let frames = animations.get(kind, action).frames;
                    sprites[kind.index()][action.index()] =
                        load_strip(&format!("assets/art/entities/{}", dir), frames).await?;
                }
            }
            // Actions with no art of their own fall back to idle
            let idle = sprites[kind.index()][ActionState::Idle.index()].clone();
            for action in ActionState::ALL {
                if sprites[kind.index()][action.index()].is_empty() {
                    sprites[kind.index()][action.index()] = idle.clone();
                }
            }
        }

        let stars = load_strip("assets/art/stars", STAR_IMAGES).await?;
        let dust = load_strip("assets/art/dust", DUST_IMAGES).await?;
        let cursor = load_pixel_texture("assets/art/cursor.png").await?;

        let shoot_sound = match load_sound("assets/sfx/shoot.wav").await {
            Ok(sound) => Some(sound),
            Err(e) => {
                eprintln!("No shoot sound ({}), running silent", e);
                None
            }
        };

        Ok(Assets { tiles, sprites, stars, dust, cursor, shoot_sound })
    }

    /// Texture for a tile; out-of-range variants wrap rather than fail
    /// so a hand-edited level file cannot crash the renderer.
    pub fn tile_texture(&self, kind: TileKind, variant: u8) -> Option<&Texture2D> {
        let set = self.tiles.get(&kind)?;
        set.get(variant as usize % set.len())
    }

    /// Animation frame for an entity.
    pub fn sprite(&self, kind: EntityKind, action: ActionState, frame: usize) -> &Texture2D {
        let set = &self.sprites[kind.index()][action.index()];
        &set[frame.min(set.len() - 1)]
    }
}

fn tile_dir(kind: TileKind) -> &'static str {
    match kind {
        TileKind::Default => "default",
        TileKind::Grass => "grass",
        TileKind::Pillar => "pillar",
        TileKind::Platform => "platform",
        TileKind::Decor => "decor",
        TileKind::Rope => "rope",
        TileKind::Spawner => "spawners",
    }
}

/// Sprite directory per entity action; None means no dedicated art
/// (the loader substitutes idle frames).
fn sprite_dir(kind: EntityKind, action: ActionState) -> Option<&'static str> {
    match (kind, action) {
        (EntityKind::Player, ActionState::Idle) => Some("player/idle"),
        (EntityKind::Player, ActionState::Run) => Some("player/run"),
        (EntityKind::Player, ActionState::Jump) => Some("player/jump"),
        (EntityKind::Player, ActionState::Shoot) => Some("player/shoot"),
        (EntityKind::Player, ActionState::Climb) => Some("player/climb"),
        (EntityKind::Enemy, ActionState::Idle) => Some("enemy/idle"),
        (EntityKind::Enemy, ActionState::Run) => Some("enemy/run"),
        (EntityKind::Enemy, _) => None,
    }
}

/// Load `count` numbered frames from a directory with nearest filtering.
async fn load_strip(dir: &str, count: usize) -> Result<Vec<Texture2D>, AssetError> {
    let mut textures = Vec::with_capacity(count);
    for i in 0..count {
        let path = format!("{}/{}.png", dir, i);
        textures.push(load_pixel_texture(&path).await?);
    }
    Ok(textures)
}

async fn load_pixel_texture(path: &str) -> Result<Texture2D, AssetError> {
    let texture = load_texture(path)
        .await
        .map_err(|source| AssetError::Load { path: path.to_string(), source })?;
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}
