use crate::core::Particle;
use rand::Rng;

pub const DEFAULT_PARTICLE_COUNT: usize = 50;

/// 產生背景粒子：位置 [0, 100)%，延遲 [0, 6)s，週期 [4, 7)s
pub fn generate_particles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            left_pct: rng.random_range(0.0..100.0),
            top_pct: rng.random_range(0.0..100.0),
            delay_secs: rng.random_range(0.0..6.0),
            duration_secs: rng.random_range(4.0..7.0),
        })
        .collect()
}
