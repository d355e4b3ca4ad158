//! Particle fields.
//!
//! A field owns its particle buffer outright; only [`ParticleField::step`]
//! writes to it. Generation is seeded so a scene looks the same on every run
//! and in tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::Vec3;
use crate::types::Rgba;

/// One particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub size: f32,
    pub opacity: f32,
    pub speed: f32,
    pub color: Rgba,
}

/// How a field moves over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleMotion {
    /// The whole field turns about the y axis, radians per second.
    GroupSpin { rate: f32 },
    /// Each particle rises at `speed * factor` per second and wraps back to
    /// the bottom once it passes `limit`.
    Rise { factor: f32, limit: f32 },
}

/// Generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub count: usize,
    /// Full extent of the box particles are scattered in, centered on 0.
    pub spread: Vec3,
    pub size: (f32, f32),
    pub opacity: (f32, f32),
    pub speed: (f32, f32),
    pub palette: Vec<Rgba>,
    pub motion: ParticleMotion,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            count: 30,
            spread: [7.0, 4.0, 3.0],
            size: (0.02, 0.08),
            opacity: (0.3, 0.8),
            speed: (0.2, 0.7),
            palette: vec![Rgba::VIOLET, Rgba::ORCHID, Rgba::LAVENDER],
            motion: ParticleMotion::GroupSpin { rate: 0.1 },
        }
    }
}

/// Seeded particle buffer with its motion.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
    motion: ParticleMotion,
    /// Field rotation about y for `GroupSpin`.
    group_rotation: f32,
}

impl ParticleField {
    /// Scatter `params.count` particles with a generator seeded by `seed`.
    pub fn generate(seed: u64, params: &FieldSpec) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let particles = (0..params.count)
            .map(|_| {
                let position = [
                    rng.gen_range(-0.5..=0.5) * params.spread[0],
                    rng.gen_range(-0.5..=0.5) * params.spread[1],
                    rng.gen_range(-0.5..=0.5) * params.spread[2],
                ];
                let color = if params.palette.is_empty() {
                    Rgba::WHITE
                } else {
                    params.palette[rng.gen_range(0..params.palette.len())]
                };
                Particle {
                    position,
                    size: sample(&mut rng, params.size),
                    opacity: sample(&mut rng, params.opacity),
                    speed: sample(&mut rng, params.speed),
                    color,
                }
            })
            .collect();

        Self {
            particles,
            motion: params.motion,
            group_rotation: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn motion(&self) -> ParticleMotion {
        self.motion
    }

    pub fn group_rotation(&self) -> f32 {
        self.group_rotation
    }

    /// Advance by `delta` seconds.
    pub fn step(&mut self, delta: f32) {
        match self.motion {
            ParticleMotion::GroupSpin { rate } => {
                self.group_rotation += rate * delta;
            }
            ParticleMotion::Rise { factor, limit } => {
                for particle in &mut self.particles {
                    particle.position[1] += particle.speed * factor * delta;
                    if particle.position[1] > limit {
                        particle.position[1] = -limit;
                    }
                }
            }
        }
    }

    /// Particles with the group rotation applied.
    pub fn world_positions(&self) -> impl Iterator<Item = (Vec3, &Particle)> + '_ {
        let (sin, cos) = self.group_rotation.sin_cos();
        self.particles.iter().map(move |p| {
            let [x, y, z] = p.position;
            ([x * cos + z * sin, y, -x * sin + z * cos], p)
        })
    }
}

fn sample(rng: &mut ChaCha8Rng, (low, high): (f32, f32)) -> f32 {
    if high > low { rng.gen_range(low..high) } else { low }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let params = FieldSpec::default();
        let a = ParticleField::generate(9, &params);
        let b = ParticleField::generate(9, &params);
        let c = ParticleField::generate(10, &params);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 30);
    }

    #[test]
    fn test_particles_inside_spread() {
        let params = FieldSpec {
            count: 200,
            spread: [8.0, 5.0, 4.0],
            ..Default::default()
        };
        let field = ParticleField::generate(1, &params);
        for p in field.particles() {
            assert!(p.position[0].abs() <= 4.0);
            assert!(p.position[1].abs() <= 2.5);
            assert!(p.position[2].abs() <= 2.0);
            assert!(p.size >= 0.02 && p.size < 0.08);
            assert!(params.palette.contains(&p.color));
        }
    }

    #[test]
    fn test_rise_wraps_at_limit() {
        let params = FieldSpec {
            count: 20,
            spread: [6.0, 5.0, 3.0],
            speed: (0.1, 0.5),
            motion: ParticleMotion::Rise { factor: 0.1, limit: 2.5 },
            ..Default::default()
        };
        let mut field = ParticleField::generate(4, &params);
        for _ in 0..2000 {
            field.step(0.5);
            for p in field.particles() {
                assert!(p.position[1] <= 2.5);
                assert!(p.position[1] >= -2.5);
            }
        }
    }

    #[test]
    fn test_group_spin_rotates_positions() {
        let params = FieldSpec {
            count: 5,
            motion: ParticleMotion::GroupSpin { rate: std::f32::consts::PI },
            ..Default::default()
        };
        let mut field = ParticleField::generate(2, &params);
        let before: Vec<Vec3> = field.world_positions().map(|(pos, _)| pos).collect();

        // Half a turn mirrors x and z
        field.step(1.0);
        for ((after, _), original) in field.world_positions().zip(before) {
            assert!((after[0] + original[0]).abs() < 1e-4);
            assert!((after[2] + original[2]).abs() < 1e-4);
            assert_eq!(after[1], original[1]);
        }
    }
}
