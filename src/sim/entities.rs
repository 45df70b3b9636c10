//! Scrolling entities and the shared per-frame lifecycle
//!
//! Obstacles, items, visual effects and afterimages all go through
//! [`advance_all`]: scroll, variant motion, lifetime, off-screen cull.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Shared interface for anything living in one of the state's collections
pub trait Entity {
    /// Collision / culling bounds
    fn bounds(&self) -> Rect;
    /// Mutable top-left position
    fn pos_mut(&mut self) -> &mut Vec2;
    /// Variant-specific motion for one frame
    fn advance(&mut self, _dt: f32) {}
    /// Remaining lifetime in frames, for entities that expire on their own
    fn life_mut(&mut self) -> Option<&mut f32> {
        None
    }
}

/// Run the uniform lifecycle over a collection.
///
/// Order is preserved and every entity is visited exactly once even when
/// entities are removed along the way.
pub fn advance_all<E: Entity>(entities: &mut Vec<E>, scroll_speed: f32, dt: f32) {
    entities.retain_mut(|e| {
        if scroll_speed > 0.0 {
            e.pos_mut().x -= scroll_speed * dt;
        }
        e.advance(dt);
        if let Some(life) = e.life_mut() {
            *life -= dt;
            if *life <= 0.0 {
                return false;
            }
        }
        e.bounds().right() >= 0.0
    });
}

// === Obstacles ===

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Short block sitting on the ground
    Low,
    /// Tall block sitting on the ground
    High,
    /// Drops in from above the viewport
    Falling,
    /// Ground block with its own leftward velocity on top of scrolling
    Fast,
}

impl ObstacleKind {
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Low => Vec2::new(45.0, 60.0),
            ObstacleKind::High => Vec2::new(90.0, 120.0),
            ObstacleKind::Falling => Vec2::new(48.75, 48.75),
            ObstacleKind::Fast => Vec2::new(112.5, 67.5),
        }
    }

    /// Extra velocity applied every frame (pixels per nominal frame)
    pub fn velocity(&self) -> Vec2 {
        match self {
            ObstacleKind::Falling => Vec2::new(0.0, 4.0),
            ObstacleKind::Fast => Vec2::new(-4.0, 0.0),
            ObstacleKind::Low | ObstacleKind::High => Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            size: kind.size(),
            vel: kind.velocity(),
        }
    }

    /// Obstacle resting on the ground line at `x`
    pub fn on_ground(kind: ObstacleKind, x: f32, ground_y: f32) -> Self {
        let size = kind.size();
        Self::new(kind, Vec2::new(x, ground_y - size.y))
    }
}

impl Entity for Obstacle {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }

    fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

// === Items ===

/// Item variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    ScoreUp,
    Invincible,
    SpeedUp,
    JumpUp,
}

/// Decorative heart circling a score item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbiter {
    pub angle: f32,
    pub radius: f32,
    pub size: f32,
    /// Radians per nominal frame (sign gives direction)
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Only score items carry orbiters
    pub orbiters: Vec<Orbiter>,
}

impl Item {
    pub fn new(kind: ItemKind, pos: Vec2, size: f32) -> Self {
        Self {
            kind,
            pos,
            size: Vec2::splat(size),
            orbiters: Vec::new(),
        }
    }
}

impl Entity for Item {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }

    fn advance(&mut self, dt: f32) {
        for orbiter in &mut self.orbiters {
            orbiter.angle += orbiter.speed * dt;
        }
    }
}

// === Visual effects ===

/// Plain RGB color for effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GOLD: Color = Color::rgb(255, 215, 0);
    pub const HOT_PINK: Color = Color::rgb(255, 105, 180);
    pub const LIME_GREEN: Color = Color::rgb(50, 205, 50);
    pub const DEEP_SKY_BLUE: Color = Color::rgb(0, 191, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
}

/// How an effect looks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectLook {
    /// Filled dot
    Dot { color: Color },
    /// Heart sprite
    Heart,
    /// Floating text
    Text { text: String, color: Color },
}

/// Transient particle or floating text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEffect {
    pub look: EffectLook,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Added to vertical velocity every frame
    pub gravity: f32,
    pub size: f32,
    /// Remaining frames
    pub life: f32,
}

impl VisualEffect {
    /// Opacity derived from remaining life (a full second fades from opaque)
    pub fn alpha(&self) -> f32 {
        (self.life / 60.0).clamp(0.0, 1.0)
    }
}

impl Entity for VisualEffect {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, 0.0, 0.0)
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }

    fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel.y += self.gravity * dt;
    }

    fn life_mut(&mut self) -> Option<&mut f32> {
        Some(&mut self.life)
    }
}

// === Afterimages ===

/// Fading snapshot of the player left behind during a speed boost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Afterimage {
    pub pos: Vec2,
    pub size: Vec2,
    pub life: f32,
}

impl Entity for Afterimage {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }

    fn life_mut(&mut self) -> Option<&mut f32> {
        Some(&mut self.life)
    }
}
