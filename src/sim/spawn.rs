//! Procedural spawning
//!
//! Obstacle cadence escalates as the timer runs down (three bands). Items are
//! drawn from a weighted table and only placed where they cannot sit inside or
//! right next to an obstacle.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;

use super::entities::{Item, ItemKind, Obstacle, ObstacleKind, Orbiter};
use super::rect::Rect;
use super::state::SimulationState;
use crate::consts::{ITEM_SAFETY_PADDING, ITEM_SIZE, ITEM_SPAWN_ATTEMPTS};

/// One obstacle in a multi-obstacle pattern; `delay` is in frames and becomes an
/// x offset of `delay * speed` so the pattern arrives spaced in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternStep {
    pub kind: ObstacleKind,
    pub delay: f32,
}

const fn step(kind: ObstacleKind, delay: f32) -> PatternStep {
    PatternStep { kind, delay }
}

pub const LOW_LOW: [PatternStep; 2] = [step(ObstacleKind::Low, 0.0), step(ObstacleKind::Low, 40.0)];
pub const LOW_HIGH: [PatternStep; 2] =
    [step(ObstacleKind::Low, 0.0), step(ObstacleKind::High, 50.0)];
pub const HIGH_LOW: [PatternStep; 2] =
    [step(ObstacleKind::High, 0.0), step(ObstacleKind::Low, 60.0)];

/// What to spawn when the obstacle cooldown runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleSpawn {
    Single(ObstacleKind),
    Pattern(&'static [PatternStep]),
}

/// Difficulty band for the time left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyBand {
    /// More than 40 s left
    Warmup,
    /// 20 - 40 s left
    Mixed,
    /// 20 s or less
    Frantic,
}

impl DifficultyBand {
    pub fn for_timer(timer: u32) -> Self {
        if timer > 40 {
            DifficultyBand::Warmup
        } else if timer > 20 {
            DifficultyBand::Mixed
        } else {
            DifficultyBand::Frantic
        }
    }

    /// Frames until the next obstacle decision
    pub fn cooldown_range(&self) -> RangeInclusive<u32> {
        match self {
            DifficultyBand::Warmup => 90..=120,
            DifficultyBand::Mixed => 65..=95,
            DifficultyBand::Frantic => 50..=80,
        }
    }

    /// Weighted choice; `roll` is uniform in [0, 1)
    pub fn choose(&self, roll: f32) -> ObstacleSpawn {
        match self {
            DifficultyBand::Warmup => ObstacleSpawn::Single(ObstacleKind::Low),
            DifficultyBand::Mixed => {
                if roll < 0.2 {
                    ObstacleSpawn::Single(ObstacleKind::Fast)
                } else if roll < 0.6 {
                    ObstacleSpawn::Single(ObstacleKind::Low)
                } else if roll < 0.85 {
                    ObstacleSpawn::Single(ObstacleKind::High)
                } else {
                    ObstacleSpawn::Pattern(&LOW_LOW)
                }
            }
            DifficultyBand::Frantic => {
                if roll < 0.25 {
                    ObstacleSpawn::Single(ObstacleKind::Falling)
                } else if roll < 0.5 {
                    ObstacleSpawn::Single(ObstacleKind::Fast)
                } else if roll < 0.75 {
                    ObstacleSpawn::Pattern(&LOW_HIGH)
                } else {
                    ObstacleSpawn::Pattern(&HIGH_LOW)
                }
            }
        }
    }
}

/// Item weights, heavily biased toward score items
pub const ITEM_WEIGHTS: [(ItemKind, u32); 4] = [
    (ItemKind::ScoreUp, 6),
    (ItemKind::Invincible, 1),
    (ItemKind::SpeedUp, 1),
    (ItemKind::JumpUp, 1),
];

/// Frames between item spawn attempts
pub const ITEM_COOLDOWN: RangeInclusive<u32> = 200..=350;

pub fn choose_item<R: Rng>(rng: &mut R) -> ItemKind {
    let total: u32 = ITEM_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut pick = rng.random_range(0..total);
    for (kind, weight) in ITEM_WEIGHTS {
        if pick < weight {
            return kind;
        }
        pick -= weight;
    }
    ItemKind::ScoreUp
}

/// Count both cooldowns down and spawn whatever is due
pub fn manage_spawning(state: &mut SimulationState, dt: f32) {
    state.obstacle_cooldown -= dt;
    if state.obstacle_cooldown <= 0.0 {
        let band = DifficultyBand::for_timer(state.timer);
        let roll: f32 = state.rng.random();
        let choice = band.choose(roll);
        spawn_obstacles(state, choice);
        state.obstacle_cooldown = state.rng.random_range(band.cooldown_range()) as f32;
        log::trace!("Spawned {:?} ({:?})", choice, band);
    }

    state.item_cooldown -= dt;
    if state.item_cooldown <= 0.0 {
        let kind = choose_item(&mut state.rng);
        if !try_spawn_item(state, kind) {
            log::debug!("No safe spot for {:?}, skipping", kind);
        }
        state.item_cooldown = state.rng.random_range(ITEM_COOLDOWN) as f32;
    }
}

pub fn spawn_obstacles(state: &mut SimulationState, spawn: ObstacleSpawn) {
    match spawn {
        ObstacleSpawn::Single(kind) => spawn_obstacle(state, kind, 0.0),
        ObstacleSpawn::Pattern(steps) => {
            for p in steps {
                let offset = p.delay * state.speed;
                spawn_obstacle(state, p.kind, offset);
            }
        }
    }
}

/// Add one obstacle at (or beyond) the right edge
pub fn spawn_obstacle(state: &mut SimulationState, kind: ObstacleKind, x_offset: f32) {
    let width = state.config.game_width.max(0.0);
    let obstacle = match kind {
        ObstacleKind::Falling => {
            let max_x = (width * 1.5) as i32;
            let x = state.rng.random_range(width as i32..=max_x) as f32;
            Obstacle::new(kind, Vec2::new(x + x_offset, -30.0))
        }
        _ => Obstacle::on_ground(kind, width + x_offset, state.ground_y),
    };
    state.obstacles.push(obstacle);
}

/// Search for a placement whose padded box clears every near obstacle.
/// Gives up after the attempt budget.
pub fn find_safe_position<R: Rng>(
    rng: &mut R,
    obstacles: &[Obstacle],
    game_width: f32,
    ground_y: f32,
) -> Option<Vec2> {
    let min_y = (ground_y - 200.0) as i32;
    let max_y = (ground_y - 80.0) as i32;

    for _ in 0..ITEM_SPAWN_ATTEMPTS {
        let x = game_width + rng.random_range(0..=200) as f32;
        let y = rng.random_range(min_y..=max_y) as f32;
        let zone = Rect::new(x, y, ITEM_SIZE, ITEM_SIZE).padded(ITEM_SAFETY_PADDING);

        let blocked = obstacles
            .iter()
            .filter(|o| o.pos.x <= game_width * 2.0)
            .any(|o| zone.intersects(&Rect::from_pos_size(o.pos, o.size)));

        if !blocked {
            return Some(Vec2::new(x, y));
        }
    }
    None
}

/// Place an item of `kind` if a safe spot exists. Returns whether one was added.
pub fn try_spawn_item(state: &mut SimulationState, kind: ItemKind) -> bool {
    let Some(pos) = find_safe_position(
        &mut state.rng,
        &state.obstacles,
        state.config.game_width,
        state.ground_y,
    ) else {
        return false;
    };

    let mut item = Item::new(kind, pos, ITEM_SIZE);
    if kind == ItemKind::ScoreUp {
        item.orbiters = (0..3)
            .map(|_| {
                let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
                let radius = state.rng.random_range(30..=40) as f32;
                let size = state.rng.random_range(15..=25) as f32;
                let magnitude = state.rng.random::<f32>() * 0.02 + 0.01;
                let speed = if state.rng.random_bool(0.5) {
                    magnitude
                } else {
                    -magnitude
                };
                Orbiter {
                    angle,
                    radius,
                    size,
                    speed,
                }
            })
            .collect();
    }
    state.items.push(item);
    true
}
