//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Δt-scaled updates only, driven by the caller's clock
//! - Seeded RNG only
//! - Stable collection order
//! - No rendering, audio or platform dependencies (side effects are events)

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod entities;
pub mod game_over;
pub mod particles;
pub mod player;
pub mod powerups;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{Clock, is_valid_dt};
pub use collision::{CollisionReport, resolve_collisions};
pub use entities::{
    Afterimage, Color, EffectLook, Entity, Item, ItemKind, Obstacle, ObstacleKind, Orbiter,
    VisualEffect, advance_all,
};
pub use player::{JumpEffect, Player};
pub use powerups::{PowerUp, PowerUps};
pub use rect::Rect;
pub use state::{GameEvent, RunPhase, SimulationState};
pub use tick::{second_tick, update};
