//! Particle and floating-text bursts
//!
//! Purely cosmetic, but they draw from the simulation RNG so a seeded run
//! reproduces the exact same effects.

use glam::Vec2;
use rand::Rng;

use super::entities::{Color, EffectLook, VisualEffect};

/// Uniform in [-0.5, 0.5) scaled by `spread`
fn jitter<R: Rng>(rng: &mut R, spread: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * spread
}

fn dot(pos: Vec2, vel: Vec2, color: Color, size: f32, life: f32, gravity: f32) -> VisualEffect {
    VisualEffect {
        look: EffectLook::Dot { color },
        pos,
        vel,
        gravity,
        size,
        life,
    }
}

/// 30 orange sparks flying out of the player on a fatal hit
pub fn collision_sparks<R: Rng>(rng: &mut R, at: Vec2) -> Vec<VisualEffect> {
    (0..30)
        .map(|_| {
            let color = Color::rgb(255, rng.random_range(100..=200), 0);
            let size = rng.random_range(3..=8) as f32;
            let life = rng.random_range(20..=40) as f32;
            let vel = Vec2::new(jitter(rng, 15.0), jitter(rng, 15.0));
            dot(at, vel, color, size, life, 0.2)
        })
        .collect()
}

/// Floating bonus text plus a spray of hearts
pub fn score_burst<R: Rng>(rng: &mut R, at: Vec2, bonus: u64) -> Vec<VisualEffect> {
    let mut effects = Vec::with_capacity(16);
    effects.push(VisualEffect {
        look: EffectLook::Text {
            text: format!("+{bonus}"),
            color: Color::GOLD,
        },
        pos: at,
        vel: Vec2::new(0.0, -1.5),
        gravity: 0.0,
        size: 24.0,
        life: 80.0,
    });
    for _ in 0..15 {
        let size = rng.random_range(15..=25) as f32;
        let life = rng.random_range(40..=70) as f32;
        let vel = Vec2::new(jitter(rng, 4.0), jitter(rng, 4.0));
        effects.push(VisualEffect {
            look: EffectLook::Heart,
            pos: at,
            vel,
            gravity: 0.1,
            size,
            life,
        });
    }
    effects
}

/// Pink puff under a boosted jump
pub fn jump_burst<R: Rng>(rng: &mut R, at: Vec2) -> Vec<VisualEffect> {
    (0..10)
        .map(|_| {
            let size = rng.random_range(5..=15) as f32;
            let life = rng.random_range(30..=50) as f32;
            let vel = Vec2::new(jitter(rng, 6.0), -rng.random::<f32>() * 5.0 - 2.0);
            dot(at, vel, Color::HOT_PINK, size, life, 0.2)
        })
        .collect()
}

/// Green ring when a speed boost is picked up
pub fn speed_up_burst<R: Rng>(rng: &mut R, at: Vec2) -> Vec<VisualEffect> {
    (0..20)
        .map(|_| {
            let size = rng.random_range(5..=10) as f32;
            let life = rng.random_range(20..=40) as f32;
            let vel = Vec2::new(jitter(rng, 10.0), jitter(rng, 10.0));
            dot(at, vel, Color::LIME_GREEN, size, life, 0.0)
        })
        .collect()
}

/// Pink fountain when a jump boost is picked up
pub fn jump_up_burst<R: Rng>(rng: &mut R, at: Vec2) -> Vec<VisualEffect> {
    (0..15)
        .map(|_| {
            let size = rng.random_range(8..=18) as f32;
            let life = rng.random_range(40..=60) as f32;
            let vel = Vec2::new(jitter(rng, 8.0), -rng.random::<f32>() * 7.0 - 3.0);
            dot(at, vel, Color::HOT_PINK, size, life, 0.1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_sizes() {
        let mut rng = Pcg32::seed_from_u64(7);
        let at = Vec2::new(80.0, 420.0);
        assert_eq!(collision_sparks(&mut rng, at).len(), 30);
        assert_eq!(score_burst(&mut rng, at, 500).len(), 16);
        assert_eq!(jump_burst(&mut rng, at).len(), 10);
        assert_eq!(speed_up_burst(&mut rng, at).len(), 20);
        assert_eq!(jump_up_burst(&mut rng, at).len(), 15);
    }

    #[test]
    fn test_jump_particles_go_up() {
        let mut rng = Pcg32::seed_from_u64(11);
        for p in jump_burst(&mut rng, Vec2::ZERO) {
            assert!(p.vel.y <= -2.0);
            assert!((30.0..=50.0).contains(&p.life));
        }
    }

    #[test]
    fn test_score_text() {
        let mut rng = Pcg32::seed_from_u64(3);
        let effects = score_burst(&mut rng, Vec2::ZERO, 500);
        assert!(matches!(
            &effects[0].look,
            EffectLook::Text { text, .. } if text == "+500"
        ));
    }

    #[test]
    fn test_sparks_are_seeded() {
        let a = collision_sparks(&mut Pcg32::seed_from_u64(42), Vec2::ZERO);
        let b = collision_sparks(&mut Pcg32::seed_from_u64(42), Vec2::ZERO);
        assert_eq!(a, b);
    }
}
