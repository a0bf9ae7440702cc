// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, Uniform},
    Rng,
};

pub const DEFAULT_DROPS: usize = 20;

pub const MIN_FALL_SPEED: f32 = 5.0;
pub const MAX_FALL_SPEED: f32 = 15.0;

/// Where a streak re-enters once it has fallen off the bottom.
pub const RESPAWN_Y: f32 = -10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

/// Fixed pool of falling streaks.
///
/// Streaks never die: once one passes the bottom edge it jumps back to
/// [`RESPAWN_Y`] keeping its column and speed. The pool is only ever filled
/// as a whole by [`spawn_all`](Self::spawn_all).
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    height: f32,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Replaces the pool with `count` fresh streaks spread across the width
    /// and staggered above the top edge.
    pub fn spawn_all<R: Rng + ?Sized>(&mut self, count: usize, width: f32, height: f32, rng: &mut R) {
        debug_assert!(width > 0.0 && height > 0.0, "empty visible area");
        let width = width.max(1.0);
        let height = height.max(1.0);

        let (Ok(xs), Ok(ys), Ok(speeds)) = (
            Uniform::new(0.0f32, width),
            Uniform::new(-height, 0.0f32),
            Uniform::new(MIN_FALL_SPEED, MAX_FALL_SPEED),
        ) else {
            return;
        };

        self.height = height;
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle {
                x: xs.sample(rng),
                y: ys.sample(rng),
                speed: speeds.sample(rng),
            });
        }
    }

    pub fn set_bounds(&mut self, height: f32) {
        self.height = height.max(1.0);
    }

    pub fn tick(&mut self) {
        let height = self.height;
        for p in &mut self.particles {
            p.y += p.speed;
            if p.y > height {
                p.y = RESPAWN_Y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn spawned(count: usize, seed: u64) -> ParticleSystem {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ps = ParticleSystem::new();
        ps.spawn_all(count, 800.0, 600.0, &mut rng);
        ps
    }

    #[test]
    fn spawn_fills_exactly_count_within_bounds() {
        let ps = spawned(20, 7);
        assert_eq!(ps.len(), 20);
        for p in ps.particles() {
            assert!((0.0..800.0).contains(&p.x));
            assert!((-600.0..0.0).contains(&p.y));
            assert!((MIN_FALL_SPEED..MAX_FALL_SPEED).contains(&p.speed));
        }
    }

    #[test]
    fn respawning_replaces_instead_of_growing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ps = ParticleSystem::new();
        ps.spawn_all(20, 800.0, 600.0, &mut rng);
        ps.spawn_all(20, 800.0, 600.0, &mut rng);
        assert_eq!(ps.len(), 20);
    }

    #[test]
    fn same_seed_same_rain() {
        assert_eq!(spawned(20, 42).particles(), spawned(20, 42).particles());
    }

    #[test]
    fn tick_moves_each_streak_by_its_own_speed() {
        let mut ps = spawned(5, 3);
        let before: Vec<Particle> = ps.particles().to_vec();
        ps.tick();
        for (a, b) in before.iter().zip(ps.particles()) {
            assert_eq!(b.x, a.x);
            assert_eq!(b.speed, a.speed);
            assert!((b.y - (a.y + a.speed)).abs() < 1e-4);
        }
    }

    #[test]
    fn streaks_wrap_to_the_top_after_passing_the_bottom() {
        let mut ps = spawned(20, 9);
        let speeds: Vec<f32> = ps.particles().iter().map(|p| p.speed).collect();
        let mut wrapped = 0usize;
        for _ in 0..500 {
            let before: Vec<f32> = ps.particles().iter().map(|p| p.y).collect();
            ps.tick();
            for ((p, y0), speed) in ps.particles().iter().zip(before).zip(&speeds) {
                assert!(p.y <= 600.0);
                if y0 + speed > 600.0 {
                    assert_eq!(p.y, RESPAWN_Y);
                    wrapped += 1;
                }
            }
        }
        assert!(wrapped > 0);
        assert_eq!(ps.len(), 20);
    }
}
