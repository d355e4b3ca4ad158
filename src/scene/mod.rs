//! Scenes - small animated 3D compositions drawn into canvases.
//!
//! A [`Scene`] is plain data plus one [`Scene::step`] loop: every shape
//! carries a list of [`Motion`]s applied each frame, and an optional
//! [`ParticleField`] owns its own buffers. Scenes are registered per canvas
//! index; the pipeline steps and rasterizes only the scenes whose canvas is
//! still allocated.
//!
//! # Example
//!
//! ```ignore
//! use folio_tui::primitives::{canvas, CanvasProps};
//! use folio_tui::scene::presets;
//!
//! let cleanup = canvas(CanvasProps {
//!     height: 10,
//!     scene: Some(presets::skills(42)),
//!     ..Default::default()
//! });
//! ```

pub mod particles;
pub mod presets;
pub mod raster;

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::types::Rgba;

pub use particles::{Particle, ParticleField, ParticleMotion};
pub use raster::{RasterCell, rasterize};

/// World-space vector (x right, y up, z towards the camera).
pub type Vec3 = [f32; 3];

// =============================================================================
// Shapes
// =============================================================================

/// Geometry of a shape, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Sphere { radius: f32 },
    Icosahedron { radius: f32 },
    Octahedron { radius: f32 },
    Box { width: f32, height: f32, depth: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Cone { radius: f32, height: f32 },
    Plane { width: f32, height: f32 },
}

impl ShapeKind {
    /// Radius of a sphere enclosing the shape around its center.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            ShapeKind::Sphere { radius }
            | ShapeKind::Icosahedron { radius }
            | ShapeKind::Octahedron { radius } => radius,
            ShapeKind::Box { width, height, depth } => {
                0.5 * (width * width + height * height + depth * depth).sqrt()
            }
            ShapeKind::Cylinder { radius_top, radius_bottom, height } => {
                let r = radius_top.max(radius_bottom);
                (r * r + 0.25 * height * height).sqrt()
            }
            ShapeKind::Cone { radius, height } => (radius * radius + 0.25 * height * height).sqrt(),
            ShapeKind::Plane { width, height } => 0.5 * (width * width + height * height).sqrt(),
        }
    }
}

/// Per-frame transform applied to a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Continuous rotation, radians per second about each axis.
    Spin { rates: Vec3 },
    /// Vertical sine offset. `frequency` is in radians per second; `phase`
    /// shifts shapes that share a motion.
    Bob { frequency: f32, amplitude: f32, phase: f32 },
    /// Gentle hover: a slow wobble of the rotation plus a small lift.
    Float {
        speed: f32,
        rotation_intensity: f32,
        float_intensity: f32,
    },
}

/// One shape in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Rest position.
    pub position: Vec3,
    /// Accumulated spin.
    pub rotation: Vec3,
    /// Rotation added by hovering this frame.
    pub wobble: Vec3,
    /// Displacement from the rest position this frame.
    pub offset: Vec3,
    pub color: Rgba,
    pub motions: Vec<Motion>,
}

impl Shape {
    pub fn new(kind: ShapeKind, color: Rgba) -> Self {
        Self {
            kind,
            position: [0.0; 3],
            rotation: [0.0; 3],
            wobble: [0.0; 3],
            offset: [0.0; 3],
            color,
            motions: Vec::new(),
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with(mut self, motion: Motion) -> Self {
        self.motions.push(motion);
        self
    }

    /// Center after this frame's motions.
    pub fn center(&self) -> Vec3 {
        [
            self.position[0] + self.offset[0],
            self.position[1] + self.offset[1],
            self.position[2] + self.offset[2],
        ]
    }

    /// Orientation after this frame's motions.
    pub fn orientation(&self) -> Vec3 {
        [
            self.rotation[0] + self.wobble[0],
            self.rotation[1] + self.wobble[1],
            self.rotation[2] + self.wobble[2],
        ]
    }

    fn step(&mut self, delta: f32, elapsed: f32) {
        self.offset = [0.0; 3];
        self.wobble = [0.0; 3];

        for motion in &self.motions {
            match *motion {
                Motion::Spin { rates } => {
                    for axis in 0..3 {
                        self.rotation[axis] += rates[axis] * delta;
                    }
                }
                Motion::Bob { frequency, amplitude, phase } => {
                    self.offset[1] += (elapsed * frequency + phase).sin() * amplitude;
                }
                Motion::Float {
                    speed,
                    rotation_intensity,
                    float_intensity,
                } => {
                    let t = elapsed / 4.0 * speed;
                    self.wobble[0] += t.cos() / 8.0 * rotation_intensity;
                    self.wobble[1] += t.sin() / 8.0 * rotation_intensity;
                    self.wobble[2] += t.sin() / 20.0 * rotation_intensity;
                    self.offset[1] += t.sin() / 10.0 * float_intensity;
                }
            }
        }
    }
}

// =============================================================================
// Scene
// =============================================================================

/// Perspective camera on the z axis looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Distance from the origin.
    pub distance: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { distance: 6.0, fov: 50.0 }
    }
}

/// A camera, its shapes and an optional particle field.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub shapes: Vec<Shape>,
    pub particles: Option<ParticleField>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            shapes: Vec::new(),
            particles: None,
        }
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_particles(mut self, field: ParticleField) -> Self {
        self.particles = Some(field);
        self
    }

    /// Advance every motion. `delta` is the time since the previous step and
    /// `elapsed` the time since the scene was mounted, both in seconds.
    pub fn step(&mut self, delta: f32, elapsed: f32) {
        for shape in &mut self.shapes {
            shape.step(delta, elapsed);
        }
        if let Some(field) = &mut self.particles {
            field.step(delta);
        }
    }
}

// =============================================================================
// Scene registry
// =============================================================================

struct Registered {
    scene: Scene,
    /// Clock reading of the last step, in seconds.
    last_step: Option<f32>,
    /// Clock reading of the first step, in seconds.
    started: f32,
}

thread_local! {
    /// Scenes keyed by the index of the canvas hosting them.
    static SCENES: RefCell<BTreeMap<usize, Registered>> = const { RefCell::new(BTreeMap::new()) };
}

/// Host `scene` in canvas `index`, replacing any previous scene.
pub fn register_scene(index: usize, scene: Scene) {
    SCENES.with(|scenes| {
        scenes.borrow_mut().insert(
            index,
            Registered {
                scene,
                last_step: None,
                started: 0.0,
            },
        );
    });
    tracing::debug!(index, "scene registered");
}

/// Drop the scene hosted in canvas `index`.
pub fn unregister_scene(index: usize) {
    let removed = SCENES.with(|scenes| scenes.borrow_mut().remove(&index));
    if removed.is_some() {
        tracing::debug!(index, "scene dropped");
    }
}

pub fn has_scene(index: usize) -> bool {
    SCENES.with(|scenes| scenes.borrow().contains_key(&index))
}

pub fn scene_count() -> usize {
    SCENES.with(|scenes| scenes.borrow().len())
}

/// Step every registered scene to clock time `now` (seconds).
///
/// A scene's first step has zero delta; elapsed time counts from it.
pub fn step_scenes(now: f32) {
    SCENES.with(|scenes| {
        for entry in scenes.borrow_mut().values_mut() {
            let (delta, elapsed) = match entry.last_step {
                Some(last) => ((now - last).max(0.0), now - entry.started),
                None => {
                    entry.started = now;
                    (0.0, 0.0)
                }
            };
            entry.scene.step(delta, elapsed);
            entry.last_step = Some(now);
        }
    });
}

/// Run `f` with the scene hosted in canvas `index`, if any.
pub fn with_scene<R>(index: usize, f: impl FnOnce(&Scene) -> R) -> Option<R> {
    SCENES.with(|scenes| scenes.borrow().get(&index).map(|entry| f(&entry.scene)))
}

/// Drop every scene (for testing).
pub fn reset_scenes() {
    SCENES.with(|scenes| scenes.borrow_mut().clear());
}
