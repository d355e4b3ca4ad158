//! Scene rasterizer - perspective projection into terminal cells.
//!
//! Shape surfaces are sampled as points with normals, rotated and moved by
//! the shape's current transform, projected through the scene camera and
//! written into a cell grid through a depth buffer. Brightness comes from a
//! fixed directional light and picks both the glyph and the color dimming.
//!
//! Cells are twice as tall as they are wide, so the horizontal projection is
//! scaled by the canvas aspect in pixels, not in cells.

use super::{Scene, Shape, ShapeKind, Vec3};
use crate::observe::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::types::Rgba;

/// Glyph ramp from darkest to brightest.
const RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Surface samples along each parameter.
const RESOLUTION: usize = 24;

const AMBIENT: f32 = 0.15;

/// One drawn cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterCell {
    pub ch: char,
    pub fg: Rgba,
    /// Distance from the camera plane; smaller is nearer.
    pub depth: f32,
}

/// Rasterize `scene` into a `width` x `height` grid (row-major).
///
/// `zoom` scales the projected image around the canvas center.
pub fn rasterize(scene: &Scene, width: u16, height: u16, zoom: f32) -> Vec<Option<RasterCell>> {
    let (w, h) = (width as usize, height as usize);
    let mut cells: Vec<Option<RasterCell>> = vec![None; w * h];
    if w == 0 || h == 0 || zoom <= 0.0 {
        return cells;
    }

    let projector = Projector::new(scene, width, height, zoom);
    let light = normalize([0.5, 0.8, 1.0]);

    for shape in &scene.shapes {
        let center = shape.center();
        let orientation = shape.orientation();

        for (point, normal) in surface(shape) {
            let world = add(rotate(point, orientation), center);
            let Some((col, row, depth)) = projector.project(world) else {
                continue;
            };
            let lit = dot(rotate(normal, orientation), light);
            // Planes are visible from both sides
            let lit = if matches!(shape.kind, ShapeKind::Plane { .. }) { lit.abs() } else { lit };
            let brightness = AMBIENT + (1.0 - AMBIENT) * lit.max(0.0);
            plot(&mut cells, w, col, row, shade(shape.color, brightness, depth));
        }
    }

    if let Some(field) = &scene.particles {
        for (position, particle) in field.world_positions() {
            let Some((col, row, depth)) = projector.project(position) else {
                continue;
            };
            let ch = if particle.size > 0.06 { '•' } else { '·' };
            let cell = RasterCell {
                ch,
                fg: particle.color.dim(particle.opacity.clamp(0.0, 1.0)),
                depth,
            };
            plot(&mut cells, w, col, row, cell);
        }
    }

    cells
}

fn shade(color: Rgba, brightness: f32, depth: f32) -> RasterCell {
    let b = brightness.clamp(0.0, 1.0);
    let slot = ((b * (RAMP.len() - 1) as f32).round() as usize).min(RAMP.len() - 1);
    RasterCell {
        ch: RAMP[slot],
        fg: color.dim(0.4 + 0.6 * b),
        depth,
    }
}

fn plot(cells: &mut [Option<RasterCell>], width: usize, col: usize, row: usize, cell: RasterCell) {
    let slot = &mut cells[row * width + col];
    match slot {
        Some(existing) if existing.depth <= cell.depth => {}
        _ => *slot = Some(cell),
    }
}

// =============================================================================
// Projection
// =============================================================================

struct Projector {
    distance: f32,
    focal: f32,
    aspect: f32,
    width: u16,
    height: u16,
}

impl Projector {
    fn new(scene: &Scene, width: u16, height: u16, zoom: f32) -> Self {
        let half_fov = (scene.camera.fov.clamp(1.0, 179.0) / 2.0).to_radians();
        Self {
            distance: scene.camera.distance,
            focal: zoom / half_fov.tan(),
            aspect: (width as f32 * CELL_WIDTH_PX) / (height as f32 * CELL_HEIGHT_PX),
            width,
            height,
        }
    }

    /// Cell column, row and depth of a world point, if it lands on the canvas
    /// in front of the camera.
    fn project(&self, [x, y, z]: Vec3) -> Option<(usize, usize, f32)> {
        let depth = self.distance - z;
        if depth <= 0.05 {
            return None;
        }
        let ndc_x = x * self.focal / (depth * self.aspect);
        let ndc_y = y * self.focal / depth;

        let col = ((ndc_x + 1.0) * 0.5 * self.width as f32).floor();
        let row = ((1.0 - ndc_y) * 0.5 * self.height as f32).floor();
        if col < 0.0 || row < 0.0 || col >= self.width as f32 || row >= self.height as f32 {
            return None;
        }
        Some((col as usize, row as usize, depth))
    }
}

// =============================================================================
// Surfaces
// =============================================================================

/// Points on the shape's surface with outward normals, in local space.
fn surface(shape: &Shape) -> Vec<(Vec3, Vec3)> {
    let n = RESOLUTION;
    let mut points = Vec::new();

    match shape.kind {
        ShapeKind::Sphere { radius } | ShapeKind::Icosahedron { radius } => {
            for i in 0..=n {
                let theta = std::f32::consts::PI * i as f32 / n as f32;
                for j in 0..n * 2 {
                    let phi = std::f32::consts::PI * j as f32 / n as f32;
                    let normal = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
                    points.push((scale(normal, radius), normal));
                }
            }
        }
        ShapeKind::Octahedron { radius } => {
            // Eight faces |x|+|y|+|z| = r
            for sx in [-1.0f32, 1.0] {
                for sy in [-1.0f32, 1.0] {
                    for sz in [-1.0f32, 1.0] {
                        let normal = normalize([sx, sy, sz]);
                        for (a, b) in grid(n) {
                            if a + b > 1.0 {
                                continue;
                            }
                            let c = 1.0 - a - b;
                            points.push(([sx * a * radius, sy * b * radius, sz * c * radius], normal));
                        }
                    }
                }
            }
        }
        ShapeKind::Box { width, height, depth } => {
            let half = [width / 2.0, height / 2.0, depth / 2.0];
            for axis in 0..3 {
                let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
                for sign in [-1.0f32, 1.0] {
                    let mut normal = [0.0; 3];
                    normal[axis] = sign;
                    for (a, b) in grid(n) {
                        let mut p = [0.0; 3];
                        p[axis] = sign * half[axis];
                        p[u] = (a * 2.0 - 1.0) * half[u];
                        p[v] = (b * 2.0 - 1.0) * half[v];
                        points.push((p, normal));
                    }
                }
            }
        }
        ShapeKind::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } => lathe(&mut points, radius_top, radius_bottom, height, n),
        ShapeKind::Cone { radius, height } => lathe(&mut points, 0.0, radius, height, n),
        ShapeKind::Plane { width, height } => {
            for (a, b) in grid(n) {
                points.push((
                    [(a - 0.5) * width, (b - 0.5) * height, 0.0],
                    [0.0, 0.0, 1.0],
                ));
            }
        }
    }
    points
}

/// Side wall and caps of a solid of revolution about y.
fn lathe(points: &mut Vec<(Vec3, Vec3)>, top: f32, bottom: f32, height: f32, n: usize) {
    let slope = (bottom - top) / height.max(f32::EPSILON);
    for (a, b) in grid(n) {
        let angle = a * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        let y = (b - 0.5) * height;
        let r = bottom + (top - bottom) * b;
        let normal = normalize([cos, slope, sin]);
        points.push(([r * cos, y, r * sin], normal));

        // Caps: b doubles as the radial parameter
        for (cap_r, cap_y, ny) in [(top, height / 2.0, 1.0), (bottom, -height / 2.0, -1.0)] {
            if cap_r > 0.0 {
                points.push(([b * cap_r * cos, cap_y, b * cap_r * sin], [0.0, ny, 0.0]));
            }
        }
    }
}

fn grid(n: usize) -> impl Iterator<Item = (f32, f32)> {
    (0..=n).flat_map(move |i| (0..=n).map(move |j| (i as f32 / n as f32, j as f32 / n as f32)))
}

// =============================================================================
// Vector helpers
// =============================================================================

/// Rotate by Euler angles in x, y, z order (z applied first).
fn rotate(v: Vec3, [rx, ry, rz]: Vec3) -> Vec3 {
    let (s, c) = rz.sin_cos();
    let v = [v[0] * c - v[1] * s, v[0] * s + v[1] * c, v[2]];
    let (s, c) = ry.sin_cos();
    let v = [v[0] * c + v[2] * s, v[1], -v[0] * s + v[2] * c];
    let (s, c) = rx.sin_cos();
    [v[0], v[1] * c - v[2] * s, v[1] * s + v[2] * c]
}

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn scale(v: Vec3, k: f32) -> Vec3 {
    [v[0] * k, v[1] * k, v[2] * k]
}

fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize(v: Vec3) -> Vec3 {
    let len = dot(v, v).sqrt();
    if len == 0.0 { v } else { scale(v, 1.0 / len) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Camera, Motion};

    fn ball(position: Vec3, color: Rgba) -> Shape {
        Shape::new(ShapeKind::Sphere { radius: 1.0 }, color).at(position)
    }

    fn drawn(cells: &[Option<RasterCell>]) -> usize {
        cells.iter().filter(|c| c.is_some()).count()
    }

    #[test]
    fn test_empty_scene_draws_nothing() {
        let scene = Scene::new(Camera::default());
        let cells = rasterize(&scene, 40, 10, 1.0);
        assert_eq!(cells.len(), 400);
        assert_eq!(drawn(&cells), 0);
    }

    #[test]
    fn test_centered_sphere_covers_center() {
        let scene = Scene::new(Camera::default()).shape(ball([0.0; 3], Rgba::VIOLET));
        let cells = rasterize(&scene, 40, 10, 1.0);
        assert!(cells[5 * 40 + 20].is_some());
        assert!(cells[0].is_none());
    }

    #[test]
    fn test_depth_buffer_keeps_nearest() {
        let scene = Scene::new(Camera::default())
            .shape(ball([0.0, 0.0, -2.0], Rgba::ORCHID))
            .shape(ball([0.0, 0.0, 1.0], Rgba::WHITE));
        let cells = rasterize(&scene, 40, 10, 1.0);

        let center = cells[5 * 40 + 20].map(|c| c.depth);
        // Front of the near ball is 1 unit in front of its center
        assert!(center.is_some_and(|d| (d - 4.0).abs() < 0.1));
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let scene = Scene::new(Camera { distance: 5.0, fov: 50.0 }).shape(ball([0.0, 0.0, 9.0], Rgba::WHITE));
        let cells = rasterize(&scene, 40, 10, 1.0);
        assert_eq!(drawn(&cells), 0);
    }

    #[test]
    fn test_zoom_grows_image() {
        let scene = Scene::new(Camera::default()).shape(ball([0.0; 3], Rgba::VIOLET));
        let normal = drawn(&rasterize(&scene, 60, 20, 1.0));
        let zoomed = drawn(&rasterize(&scene, 60, 20, 1.5));
        assert!(zoomed > normal);
        assert_eq!(drawn(&rasterize(&scene, 60, 20, 0.0)), 0);
    }

    #[test]
    fn test_every_kind_draws() {
        let kinds = [
            ShapeKind::Icosahedron { radius: 1.0 },
            ShapeKind::Octahedron { radius: 1.0 },
            ShapeKind::Box { width: 1.0, height: 1.0, depth: 1.0 },
            ShapeKind::Cylinder { radius_top: 0.5, radius_bottom: 0.5, height: 1.0 },
            ShapeKind::Cone { radius: 0.5, height: 1.0 },
            ShapeKind::Plane { width: 1.4, height: 0.9 },
        ];
        for kind in kinds {
            let mut scene = Scene::new(Camera::default())
                .shape(Shape::new(kind, Rgba::LAVENDER).with(Motion::Spin { rates: [0.3, 0.4, 0.0] }));
            scene.step(1.0, 1.0);
            assert!(drawn(&rasterize(&scene, 40, 12, 1.0)) > 0, "{kind:?} drew nothing");
        }
    }

    #[test]
    fn test_rotate_quarter_turn_about_y() {
        let v = rotate([1.0, 0.0, 0.0], [0.0, std::f32::consts::FRAC_PI_2, 0.0]);
        assert!(v[0].abs() < 1e-6);
        assert!((v[2] + 1.0).abs() < 1e-6);
    }
}
