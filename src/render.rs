//! Draw-list description of the simulation
//!
//! The core never draws. Each frame it describes the scene as an ordered list of
//! [`DrawCommand`]s plus a shake offset and a red flash, and hands them to a
//! host [`Renderer`]. A renderer that has no image for a sprite skips that
//! command; nothing here depends on assets being loaded.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::AFTERIMAGE_LIFE;
use crate::settings::Settings;
use crate::sim::entities::{
    Afterimage, Color, EffectLook, Item, ItemKind, Obstacle, ObstacleKind, VisualEffect,
};
use crate::sim::game_over;
use crate::sim::powerups::PowerUp;
use crate::sim::rect::Rect;
use crate::sim::state::SimulationState;

/// Images the host is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    Player,
    ObstacleLow,
    ObstacleHigh,
    FallingObstacle,
    FastObstacle,
    ItemScoreUp,
    ItemInvincible,
    InvincibleAura,
    ItemSpeedUp,
    ItemJumpUp,
    Heart,
}

impl SpriteKey {
    pub fn asset_name(&self) -> &'static str {
        match self {
            SpriteKey::Player => "player",
            SpriteKey::ObstacleLow => "obstacle_low",
            SpriteKey::ObstacleHigh => "obstacle_high",
            SpriteKey::FallingObstacle => "falling_obstacle",
            SpriteKey::FastObstacle => "fast_obstacle",
            SpriteKey::ItemScoreUp => "item_score_up",
            SpriteKey::ItemInvincible => "item_invincible",
            SpriteKey::InvincibleAura => "item_invincible_02",
            SpriteKey::ItemSpeedUp => "item_speed_up",
            SpriteKey::ItemJumpUp => "item_jump_up",
            SpriteKey::Heart => "heart",
        }
    }

    pub fn for_obstacle(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::Low => SpriteKey::ObstacleLow,
            ObstacleKind::High => SpriteKey::ObstacleHigh,
            ObstacleKind::Falling => SpriteKey::FallingObstacle,
            ObstacleKind::Fast => SpriteKey::FastObstacle,
        }
    }

    pub fn for_item(kind: ItemKind) -> Self {
        match kind {
            ItemKind::ScoreUp => SpriteKey::ItemScoreUp,
            ItemKind::Invincible => SpriteKey::ItemInvincible,
            ItemKind::SpeedUp => SpriteKey::ItemSpeedUp,
            ItemKind::JumpUp => SpriteKey::ItemJumpUp,
        }
    }
}

/// Tiled, horizontally scrolling layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackdropLayer {
    /// Parallax background strip, scrolls at half speed
    Background,
    /// Ground strip below the ground line
    Ground,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Tile `layer` across the viewport starting at `offset_x` (wraps on the host)
    Backdrop { layer: BackdropLayer, offset_x: f32 },
    /// Sprite in `rect`, rotated by `rotation` radians around its center
    Image {
        sprite: SpriteKey,
        rect: Rect,
        alpha: f32,
        rotation: f32,
    },
    /// Filled circle
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    /// Text centered on `pos`
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        alpha: f32,
    },
}

impl DrawCommand {
    fn image(sprite: SpriteKey, rect: Rect, alpha: f32) -> Self {
        DrawCommand::Image {
            sprite,
            rect,
            alpha,
            rotation: 0.0,
        }
    }
}

/// Everything needed to present one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    /// Whole-scene translation
    pub shake: Vec2,
    pub commands: Vec<DrawCommand>,
    /// Opacity of the red full-screen overlay (0 = none)
    pub flash_alpha: f32,
}

/// Host drawing surface
pub trait Renderer {
    fn begin_frame(&mut self, shake: Vec2);
    /// Draw one command. Commands for sprites the host cannot show are skipped.
    fn draw(&mut self, command: &DrawCommand);
    fn end_frame(&mut self, flash_alpha: f32);
}

/// Entities that know how to describe themselves for drawing
pub trait DescribeForRender {
    fn describe_for_render(&self, frame_count: u64, out: &mut Vec<DrawCommand>);
}

impl DescribeForRender for Obstacle {
    fn describe_for_render(&self, _frame_count: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::image(
            SpriteKey::for_obstacle(self.kind),
            Rect::from_pos_size(self.pos, self.size),
            1.0,
        ));
    }
}

/// Glow color and how far the glow breathes out past the item edge
fn item_glow(kind: ItemKind) -> (Color, f32) {
    match kind {
        ItemKind::ScoreUp => (Color::GOLD, 15.0),
        ItemKind::Invincible => (Color::DEEP_SKY_BLUE, 18.0),
        ItemKind::SpeedUp => (Color::LIME_GREEN, 15.0),
        ItemKind::JumpUp => (Color::HOT_PINK, 15.0),
    }
}

impl DescribeForRender for Item {
    fn describe_for_render(&self, frame_count: u64, out: &mut Vec<DrawCommand>) {
        let rect = Rect::from_pos_size(self.pos, self.size);
        let center = rect.center();
        let strength = ((frame_count as f32 * 0.05).sin() + 1.0) / 2.0;
        let (color, max_offset) = item_glow(self.kind);

        for i in 0..3 {
            let falloff = i as f32;
            out.push(DrawCommand::Circle {
                center,
                radius: self.size.x / 2.0 + strength * max_offset * (1.0 - falloff * 0.2),
                color,
                alpha: (0.4 - falloff * 0.1) * strength,
            });
        }

        out.push(DrawCommand::image(SpriteKey::for_item(self.kind), rect, 1.0));

        for orbiter in &self.orbiters {
            let at = center + Vec2::from_angle(orbiter.angle) * orbiter.radius;
            out.push(DrawCommand::image(
                SpriteKey::Heart,
                Rect::from_pos_size(
                    at - Vec2::splat(orbiter.size / 2.0),
                    Vec2::splat(orbiter.size),
                ),
                1.0,
            ));
        }
    }
}

impl DescribeForRender for VisualEffect {
    fn describe_for_render(&self, _frame_count: u64, out: &mut Vec<DrawCommand>) {
        let alpha = self.alpha();
        out.push(match &self.look {
            EffectLook::Dot { color } => DrawCommand::Circle {
                center: self.pos,
                radius: self.size / 2.0,
                color: *color,
                alpha,
            },
            EffectLook::Heart => DrawCommand::image(
                SpriteKey::Heart,
                Rect::from_pos_size(self.pos, Vec2::splat(self.size)),
                alpha,
            ),
            EffectLook::Text { text, color } => DrawCommand::Text {
                text: text.clone(),
                pos: self.pos,
                size: self.size,
                color: *color,
                alpha,
            },
        });
    }
}

impl DescribeForRender for Afterimage {
    fn describe_for_render(&self, _frame_count: u64, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::image(
            SpriteKey::Player,
            Rect::from_pos_size(self.pos, self.size),
            (self.life / AFTERIMAGE_LIFE) * 0.4,
        ));
    }
}

/// Spinning, pulsing aura around an invincible player. Blinks in the last second.
fn invincible_aura(state: &SimulationState, out: &mut Vec<DrawCommand>) {
    let remaining = state.power_ups.remaining(PowerUp::Invincibility);
    if remaining <= 0.0 {
        return;
    }
    let frame = state.frame_count as f32;
    let size = state.player.size.x * 1.5 + (frame * 0.1).sin() * 5.0;
    let alpha = if remaining < 60.0 && state.frame_count % 10 < 5 {
        0.3
    } else {
        0.7
    };
    let center = state.player.center();
    out.push(DrawCommand::Image {
        sprite: SpriteKey::InvincibleAura,
        rect: Rect::from_pos_size(center - Vec2::splat(size / 2.0), Vec2::splat(size)),
        alpha,
        rotation: frame * 0.05,
    });
}

/// Scene draw list, back to front
pub fn describe(state: &SimulationState, settings: &Settings) -> Vec<DrawCommand> {
    let frame = state.frame_count;
    let mut out = Vec::with_capacity(
        8 + state.items.len() * 7
            + state.obstacles.len()
            + state.afterimages.len()
            + state.effects.len(),
    );

    out.push(DrawCommand::Backdrop {
        layer: BackdropLayer::Background,
        offset_x: state.background_scroll_x,
    });
    out.push(DrawCommand::Backdrop {
        layer: BackdropLayer::Ground,
        offset_x: state.ground_scroll_x,
    });

    for item in &state.items {
        item.describe_for_render(frame, &mut out);
    }
    for obstacle in &state.obstacles {
        obstacle.describe_for_render(frame, &mut out);
    }
    if settings.afterimages {
        for afterimage in &state.afterimages {
            afterimage.describe_for_render(frame, &mut out);
        }
    }

    invincible_aura(state, &mut out);
    let player_alpha = if state.power_ups.is_active(PowerUp::Invincibility) {
        0.6
    } else {
        1.0
    };
    out.push(DrawCommand::image(SpriteKey::Player, state.player.bounds(), player_alpha));

    if settings.particles {
        for effect in &state.effects {
            effect.describe_for_render(frame, &mut out);
        }
    }
    out
}

/// Describe the scene and work out the frame-level shake and flash.
/// `shake_rng` is presentation-only and must not be the simulation RNG.
pub fn compose<R: Rng>(
    state: &SimulationState,
    settings: &Settings,
    shake_rng: &mut R,
) -> RenderFrame {
    let magnitude = game_over::shake_magnitude(state);
    let shake = if settings.screen_shake && magnitude > 0.0 {
        Vec2::new(
            (shake_rng.random::<f32>() - 0.5) * magnitude,
            (shake_rng.random::<f32>() - 0.5) * magnitude,
        )
    } else {
        Vec2::ZERO
    };
    let flash_alpha = if settings.damage_flash {
        game_over::flash_alpha(state)
    } else {
        0.0
    };

    RenderFrame {
        shake,
        commands: describe(state, settings),
        flash_alpha,
    }
}

/// Push a composed frame through a renderer
pub fn present(frame: &RenderFrame, renderer: &mut dyn Renderer) {
    renderer.begin_frame(frame.shake);
    for command in &frame.commands {
        renderer.draw(command);
    }
    renderer.end_frame(frame.flash_alpha);
}
