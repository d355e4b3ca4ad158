//! One scene per portfolio section.
//!
//! Dimensions, colors and rates follow the site's original 3D scenes. Bob
//! frequencies are radians per second.

use super::particles::{FieldSpec, ParticleField, ParticleMotion};
use super::{Camera, Motion, Scene, Shape, ShapeKind};
use crate::types::Rgba;

const GOLD: Rgba = Rgba::rgb(0xff, 0xd7, 0x00);
const SILVER: Rgba = Rgba::rgb(0xc0, 0xc0, 0xc0);
const BRONZE: Rgba = Rgba::rgb(0xcd, 0x7f, 0x32);

const PALETTE: [Rgba; 3] = [Rgba::VIOLET, Rgba::ORCHID, Rgba::LAVENDER];

fn camera(distance: f32) -> Camera {
    Camera { distance, fov: 50.0 }
}

fn spin(x: f32, y: f32, z: f32) -> Motion {
    Motion::Spin { rates: [x, y, z] }
}

fn bob(frequency: f32, amplitude: f32) -> Motion {
    Motion::Bob {
        frequency,
        amplitude,
        phase: 0.0,
    }
}

fn float(speed: f32, rotation_intensity: f32, float_intensity: f32) -> Motion {
    Motion::Float {
        speed,
        rotation_intensity,
        float_intensity,
    }
}

/// Small icons around a centerpiece, each bobbing out of phase by its x.
fn icons(
    kind: ShapeKind,
    color: Rgba,
    positions: &[[f32; 3]],
    spin_rates: (f32, f32),
    (frequency, amplitude): (f32, f32),
    hover: Motion,
) -> Vec<Shape> {
    positions
        .iter()
        .map(|&position| {
            Shape::new(kind, color)
                .at(position)
                .with(spin(spin_rates.0, spin_rates.1, 0.0))
                .with(Motion::Bob {
                    frequency,
                    amplitude,
                    phase: position[0],
                })
                .with(hover)
        })
        .collect()
}

fn spinning_field(seed: u64, count: usize, spread: [f32; 3], size: (f32, f32), palette: &[Rgba], rate: f32) -> ParticleField {
    ParticleField::generate(
        seed,
        &FieldSpec {
            count,
            spread,
            size,
            palette: palette.to_vec(),
            motion: ParticleMotion::GroupSpin { rate },
            ..Default::default()
        },
    )
}

fn rising_field(seed: u64, count: usize, spread: [f32; 3], size: (f32, f32), speed: (f32, f32), color: Rgba, factor: f32) -> ParticleField {
    ParticleField::generate(
        seed,
        &FieldSpec {
            count,
            spread,
            size,
            speed,
            palette: vec![color],
            motion: ParticleMotion::Rise {
                factor,
                limit: spread[1] / 2.0,
            },
            ..Default::default()
        },
    )
}

// =============================================================================
// Sections
// =============================================================================

pub fn hero(seed: u64) -> Scene {
    Scene::new(camera(5.0))
        .shape(
            Shape::new(ShapeKind::Sphere { radius: 1.2 }, Rgba::VIOLET)
                .with(spin(0.0, 0.3, 0.0))
                .with(float(1.2, 0.4, 0.6)),
        )
        .with_particles(spinning_field(seed, 30, [7.0, 4.0, 3.0], (0.03, 0.08), &PALETTE, 0.05))
}

pub fn about(seed: u64) -> Scene {
    Scene::new(camera(5.2))
        .shape(
            Shape::new(ShapeKind::Icosahedron { radius: 1.05 }, Rgba::VIOLET)
                .at([1.7, 0.2, 0.0])
                .with(spin(0.25, 0.35, 0.0))
                .with(bob(1.0, 0.15))
                .with(float(1.25, 0.6, 0.9)),
        )
        .with_particles(spinning_field(seed, 35, [7.5, 4.5, 3.5], (0.03, 0.09), &PALETTE, 0.1))
}

pub fn skills(seed: u64) -> Scene {
    Scene::new(Camera { distance: 6.0, fov: 45.0 })
        .shape(
            Shape::new(
                ShapeKind::Box {
                    width: 0.6,
                    height: 0.8,
                    depth: 0.2,
                },
                Rgba::VIOLET,
            )
            .with(spin(0.0, 0.4, 0.0))
            .with(bob(1.0, 0.12))
            .with(float(1.8, 0.5, 0.7)),
        )
        .shape(
            Shape::new(
                ShapeKind::Cylinder {
                    radius_top: 0.4,
                    radius_bottom: 0.4,
                    height: 0.6,
                },
                Rgba::ORCHID,
            )
            .at([2.0, 0.0, 0.0])
            .with(spin(0.3, 0.0, 0.0))
            .with(bob(1.2, 0.1))
            .with(float(1.5, 0.4, 0.6)),
        )
        .shape(
            Shape::new(ShapeKind::Cone { radius: 0.3, height: 0.8 }, Rgba::LAVENDER)
                .at([-2.0, 0.0, 0.0])
                .with(spin(0.0, 0.0, 0.35))
                .with(bob(0.8, 0.08))
                .with(float(1.6, 0.3, 0.8)),
        )
        .with_particles(spinning_field(
            seed,
            30,
            [7.0, 4.0, 3.0],
            (0.02, 0.08),
            &[Rgba::VIOLET, Rgba::ORCHID, Rgba::LAVENDER, Rgba::PLUM],
            0.1,
        ))
}

pub fn experience(seed: u64) -> Scene {
    let mut scene = Scene::new(camera(6.0))
        .shape(
            Shape::new(
                ShapeKind::Box {
                    width: 1.5,
                    height: 2.0,
                    depth: 0.8,
                },
                Rgba::VIOLET,
            )
            .with(spin(0.0, 0.1, 0.0))
            .with(bob(0.6, 0.08))
            .with(float(1.5, 0.2, 0.5)),
        )
        .shape(
            Shape::new(
                ShapeKind::Box {
                    width: 0.8,
                    height: 0.05,
                    depth: 0.6,
                },
                Rgba::ORCHID,
            )
            .at([2.0, 0.5, 0.0])
            .with(spin(0.3, 0.0, 0.0))
            .with(bob(1.0, 0.12))
            .with(float(2.0, 0.5, 0.7)),
        )
        .shape(
            Shape::new(
                ShapeKind::Cylinder {
                    radius_top: 0.15,
                    radius_bottom: 0.2,
                    height: 0.3,
                },
                Rgba::PLUM,
            )
            .at([-1.8, -0.5, 0.0])
            .with(spin(0.0, -0.4, 0.0))
            .with(bob(1.2, 0.1))
            .with(float(1.8, 0.6, 0.4)),
        );

    scene.shapes.extend(icons(
        ShapeKind::Octahedron { radius: 0.06 },
        Rgba::LAVENDER,
        &[[1.5, 1.2, 0.0], [-1.5, -1.0, 1.0], [0.8, -1.2, -1.0]],
        (0.6, 0.4),
        (1.0, 0.06),
        float(1.2, 0.8, 0.3),
    ));
    scene.with_particles(rising_field(seed, 20, [6.0, 5.0, 3.0], (0.01, 0.035), (0.1, 0.5), Rgba::ORCHID, 0.1))
}

pub fn projects(seed: u64) -> Scene {
    Scene::new(camera(7.0))
        .shape(
            Shape::new(
                ShapeKind::Box {
                    width: 0.5,
                    height: 0.2,
                    depth: 0.1,
                },
                Rgba::VIOLET,
            )
            .with(spin(0.25, 0.35, 0.0))
            .with(bob(1.2, 0.15))
            .with(float(2.0, 0.6, 0.8)),
        )
        .shape(
            Shape::new(ShapeKind::Plane { width: 1.4, height: 0.9 }, Rgba::ORCHID)
                .at([2.2, 0.0, 0.0])
                .with(spin(0.0, -0.2, 0.0))
                .with(bob(1.0, 0.1))
                .with(float(1.6, 0.4, 0.6)),
        )
        .shape(
            Shape::new(ShapeKind::Cone { radius: 0.4, height: 1.0 }, Rgba::LAVENDER)
                .at([-2.2, 0.0, 0.0])
                .with(spin(0.0, 0.0, 0.3))
                .with(bob(0.9, 0.12))
                .with(float(1.7, 0.5, 0.7)),
        )
        .with_particles(spinning_field(seed, 40, [8.0, 5.0, 4.0], (0.02, 0.07), &PALETTE, 0.08))
}

pub fn resume(seed: u64) -> Scene {
    let mut scene = Scene::new(camera(6.0)).shape(
        Shape::new(
            ShapeKind::Box {
                width: 1.2,
                height: 1.6,
                depth: 0.05,
            },
            Rgba::WHITE,
        )
        .with(spin(0.0, 0.15, 0.0))
        .with(bob(0.8, 0.1))
        .with(float(1.8, 0.3, 0.6)),
    );
    scene.shapes.extend(icons(
        ShapeKind::Octahedron { radius: 0.08 },
        Rgba::VIOLET,
        &[[2.0, 1.5, 0.0], [-2.0, -1.0, 1.0], [1.5, -1.5, -1.0]],
        (0.5, 0.3),
        (1.0, 0.05),
        float(1.2, 0.8, 0.4),
    ));
    scene.with_particles(rising_field(seed, 25, [8.0, 6.0, 4.0], (0.01, 0.04), (0.2, 0.7), Rgba::LAVENDER, 0.1))
}

pub fn achievements(seed: u64) -> Scene {
    let mut scene = Scene::new(camera(6.0)).shape(
        Shape::new(ShapeKind::Cone { radius: 0.6, height: 1.2 }, GOLD)
            .with(spin(0.0, 0.2, 0.0))
            .with(bob(0.8, 0.12))
            .with(float(1.8, 0.3, 0.5)),
    );

    let medal = ShapeKind::Cylinder {
        radius_top: 0.2,
        radius_bottom: 0.2,
        height: 0.1,
    };
    for (position, color) in [
        ([1.8, 1.2, 0.0], SILVER),
        ([-1.8, -0.8, 1.0], BRONZE),
        ([0.5, -1.5, -1.0], SILVER),
    ] {
        scene
            .shapes
            .extend(icons(medal, color, &[position], (0.4, 0.6), (1.0, 0.08), float(1.5, 0.5, 0.4)));
    }
    scene.with_particles(rising_field(seed, 15, [5.0, 4.0, 3.0], (0.02, 0.05), (0.2, 0.7), GOLD, 0.05))
}

pub fn testimonials(seed: u64) -> Scene {
    let mut scene = Scene::new(camera(5.0)).shape(
        Shape::new(
            ShapeKind::Box {
                width: 0.8,
                height: 0.8,
                depth: 0.2,
            },
            Rgba::ORCHID,
        )
        .with(spin(0.0, 0.3, 0.0))
        .with(bob(1.0, 0.1))
        .with(float(2.0, 0.4, 0.6)),
    );
    scene.shapes.extend(icons(
        ShapeKind::Octahedron { radius: 0.15 },
        GOLD,
        &[[1.5, 1.0, 0.0], [-1.5, -0.5, 1.0], [0.8, -1.0, -1.0]],
        (0.5, 0.3),
        (1.2, 0.08),
        float(1.5, 0.6, 0.4),
    ));
    scene.with_particles(rising_field(seed, 15, [4.0, 3.0, 2.0], (0.02, 0.05), (0.2, 0.7), Rgba::LAVENDER, 0.05))
}

pub fn contact(seed: u64) -> Scene {
    Scene::new(camera(6.0))
        .shape(
            Shape::new(
                ShapeKind::Box {
                    width: 0.8,
                    height: 0.6,
                    depth: 0.2,
                },
                Rgba::VIOLET,
            )
            .with(spin(0.0, 0.5, 0.0))
            .with(bob(1.0, 0.1))
            .with(float(2.0, 0.4, 0.8)),
        )
        .shape(
            Shape::new(
                ShapeKind::Box {
                    width: 1.5,
                    height: 0.3,
                    depth: 0.1,
                },
                Rgba::ORCHID,
            )
            .at([0.0, 1.8, 0.0])
            .with(spin(0.0, 0.0, 0.35))
            .with(bob(1.0, 0.15))
            .with(float(1.5, 0.2, 0.5)),
        )
        .with_particles(spinning_field(seed, 40, [8.0, 5.0, 4.0], (0.02, 0.10), &PALETTE, 0.1))
}

/// Preset by section name.
pub fn by_name(name: &str, seed: u64) -> Option<Scene> {
    let build: fn(u64) -> Scene = match name {
        "hero" => hero,
        "about" => about,
        "skills" => skills,
        "experience" => experience,
        "projects" => projects,
        "resume" => resume,
        "achievements" => achievements,
        "testimonials" => testimonials,
        "contact" => contact,
        _ => return None,
    };
    Some(build(seed))
}
