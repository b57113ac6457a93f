//! Shared visualization utilities for the outline viewer.

use std::hash::{Hash, Hasher};

use bsp_solid::{Contour, Polyhedron, Result, SubPlane};
use macroquad::prelude::*;
use nalgebra::{Point2, Point3, Vector3};

pub mod navigator;
pub use navigator::TreeNavigator;

/// Generates a deterministic color from a facet's supporting plane.
///
/// Pieces of a facet split by the tree share a plane and so a color.
pub fn facet_color(facet: &SubPlane) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    let plane = facet.plane();
    let normal = plane.normal();
    for x in [normal.x, normal.y, normal.z, plane.origin_offset()] {
        x.to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    let r = (((hash >> 16) & 0xFF) as u8).max(60);
    let g = (((hash >> 8) & 0xFF) as u8).max(60);
    let b = ((hash & 0xFF) as u8).max(60);

    Color::from_rgba(r, g, b, 255)
}

#[inline]
pub fn to_vec3(p: &Point3<f64>) -> Vec3 {
    vec3(p.x as f32, p.y as f32, p.z as f32)
}

/// Draws the boundary loops of a facet as 3D line segments.
pub fn draw_facet(facet: &SubPlane, color: Color) {
    for l in facet.vertices() {
        let n = l.len();
        for i in 0..n {
            draw_line_3d(to_vec3(&l[i]), to_vec3(&l[(i + 1) % n]), color);
        }
    }
}

/// Maps outline contours into `panel` screen coordinates.
///
/// The contours are scaled uniformly to fit with a margin, and `v` points
/// up on screen.
pub fn fit_to_panel(loops: &[Contour], panel: Rect) -> Vec<Vec<Vec2>> {
    let mut points = loops.iter().flat_map(Contour::points);
    let Some(first) = points.next() else {
        return Vec::new();
    };
    let (mut min, mut max) = (*first, *first);
    for p in points {
        min = min.inf(p);
        max = max.sup(p);
    }

    let extent = (max - min).max().max(f64::EPSILON);
    let margin = 0.1 * panel.w.min(panel.h);
    let scale = f64::from(panel.w.min(panel.h) - 2.0 * margin) / extent;
    let center = nalgebra::center(&min, &max);
    let (cx, cy) = (panel.x + panel.w / 2.0, panel.y + panel.h / 2.0);

    loops
        .iter()
        .map(|l| {
            l.points()
                .iter()
                .map(|p| {
                    let x = (p.x - center.x) * scale;
                    let y = (p.y - center.y) * scale;
                    vec2(cx + x as f32, cy - y as f32)
                })
                .collect()
        })
        .collect()
}

/// Draws outline contours inside a framed screen panel.
///
/// Open contours are drawn without their closing edge.
pub fn draw_outline(loops: &[Contour], panel: Rect, color: Color) {
    draw_rectangle(panel.x, panel.y, panel.w, panel.h, Color::from_rgba(25, 25, 40, 230));
    draw_rectangle_lines(panel.x, panel.y, panel.w, panel.h, 1.0, DARKGRAY);

    for (contour, l) in loops.iter().zip(fit_to_panel(loops, panel)) {
        let n = l.len();
        let edges = if contour.is_open() { n.saturating_sub(1) } else { n };
        for i in 0..edges {
            let (a, b) = (l[i], l[(i + 1) % n]);
            draw_line(a.x, a.y, b.x, b.y, 2.0, color);
        }
        for p in &l {
            draw_circle(p.x, p.y, 3.0, color);
        }
    }
}

/// Solids shown by the viewer, with the point the camera orbits.
pub fn sample_solids(tolerance: f64) -> Result<Vec<(&'static str, Polyhedron, Vec3)>> {
    let cube = Polyhedron::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0), tolerance)?;
    let l_outline = [
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(1.0, 1.0),
        Point2::new(1.0, 2.0),
        Point2::new(0.0, 2.0),
    ];
    let l_prism = Polyhedron::prism(&l_outline, 1.0, tolerance)?;
    let slab = Polyhedron::cuboid(
        Point3::new(-2.0, -0.5, 0.0),
        Point3::new(2.0, 0.5, 0.25),
        tolerance,
    )?;

    Ok(vec![
        ("unit cube", cube, vec3(0.5, 0.5, 0.5)),
        ("L prism", l_prism, vec3(1.0, 1.0, 0.5)),
        ("slab", slab, vec3(0.0, 0.0, 0.125)),
    ])
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 0.5,
            min_distance: 2.0,
            max_distance: 30.0,
        }
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        let scroll = mouse_wheel().1;
        self.distance -= scroll * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }

        // Keep away from the poles, where the view axes degenerate.
        self.pitch = self.pitch.clamp(-1.5, 1.5);
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }

    /// Screen-right and screen-up axes of the current view.
    ///
    /// Their cross product points from the target towards the camera.
    pub fn view_axes(&self) -> (Vector3<f64>, Vector3<f64>) {
        let eye = self.position() - self.target;
        let w = Vector3::new(f64::from(eye.x), f64::from(eye.y), f64::from(eye.z)).normalize();
        let u = Vector3::y().cross(&w).normalize();
        let v = w.cross(&u);
        (u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_axes_are_orthonormal() {
        for (yaw, pitch) in [(0.0, 0.0), (0.7, 0.3), (-2.0, -1.4), (3.0, 1.5)] {
            let camera = OrbitCamera::new(5.0, yaw, pitch);
            let (u, v) = camera.view_axes();
            assert!((u.norm() - 1.0).abs() < 1e-9);
            assert!((v.norm() - 1.0).abs() < 1e-9);
            assert!(u.dot(&v).abs() < 1e-9);

            let eye = camera.position();
            let towards = Vector3::new(f64::from(eye.x), f64::from(eye.y), f64::from(eye.z));
            assert!(u.cross(&v).dot(&towards.normalize()) > 0.999);
        }
    }

    #[test]
    fn front_view_keeps_screen_orientation() {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0);
        let (u, v) = camera.view_axes();
        assert!((u - Vector3::x()).norm() < 1e-6);
        assert!((v - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn fit_to_panel_flips_and_centres() {
        let loops = vec![Contour::Closed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
        ])];
        let panel = Rect::new(100.0, 50.0, 200.0, 200.0);
        let fitted = fit_to_panel(&loops, panel);

        assert_eq!(fitted.len(), 1);
        for p in &fitted[0] {
            assert!(panel.contains(*p));
        }
        // Higher `v` is higher on screen, i.e. a smaller `y`.
        assert!(fitted[0][2].y < fitted[0][1].y);
        assert!((fitted[0][0].x + fitted[0][1].x - 400.0).abs() < 1e-3);
    }

    #[test]
    fn fit_to_panel_of_nothing() {
        assert!(fit_to_panel(&[], Rect::new(0.0, 0.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn sample_solids_build() {
        let solids = sample_solids(1e-10).unwrap();
        assert_eq!(solids.len(), 3);
        for (_, solid, _) in &solids {
            assert!(solid.tree().facet_count() >= 6);
        }
    }
}
