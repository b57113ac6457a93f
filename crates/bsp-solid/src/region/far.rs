//! A bounding frame standing in for infinity.
//!
//! Unbounded regions are closed on a box holding every vertex and every
//! crossing of their infinite edges. The bounded algorithms run on the
//! closed loops, then the result is cut open again wherever it runs along
//! the box.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Point2, Vector2};
use tracing::trace;

use super::{Line2D, PolygonRegion, is_valid_chain};

/// Distance to the frame, relative to its diagonal, under which a point
/// lies on it. Covers the snapping of the boolean operations.
const ON_FRAME: f64 = 1e-7;

/// One infinite end edge of an open chain.
#[derive(Debug, Clone, Copy)]
struct Ray {
    anchor: Point2<f64>,
    direction: Vector2<f64>,
}

impl Ray {
    /// Crossing with the line through `origin` along `direction`, restricted
    /// to the forward half of that line unless `whole_line` is set.
    fn crossing(
        &self,
        origin: Point2<f64>,
        direction: Vector2<f64>,
        whole_line: bool,
    ) -> Option<Point2<f64>> {
        let cross = self.direction.perp(&direction);
        if cross.abs() <= f64::EPSILON * self.direction.norm() * direction.norm() {
            return None;
        }
        let delta = origin - self.anchor;
        let s = delta.perp(&direction) / cross;
        let t = delta.perp(&self.direction) / cross;
        (s >= 0.0 && (whole_line || t >= 0.0)).then(|| self.anchor + self.direction * s)
    }
}

/// The two infinite end edges of an open chain.
fn end_rays(chain: &[Point2<f64>]) -> [Ray; 2] {
    let n = chain.len();
    [
        Ray {
            anchor: chain[1],
            direction: chain[0] - chain[1],
        },
        Ray {
            anchor: chain[n - 2],
            direction: chain[n - 1] - chain[n - 2],
        },
    ]
}

/// Axis-aligned box replacing the points at infinity.
#[derive(Debug, Clone)]
pub(super) struct FarFrame {
    min: Point2<f64>,
    max: Point2<f64>,
    /// Margin between the enclosed geometry and the frame.
    reach: f64,
    eps: f64,
}

impl FarFrame {
    /// Frame around `regions` and `extra`, also holding the crossings of
    /// the regions' infinite edges with each other and with `lines`.
    pub(super) fn enclosing(
        regions: &[&PolygonRegion],
        extra: &[Point2<f64>],
        lines: &[&Line2D],
    ) -> Self {
        let rays: Vec<Ray> = regions
            .iter()
            .flat_map(|r| r.chains.iter())
            .flat_map(|c| end_rays(c))
            .collect();

        // Chain ends only give directions and stay out of the frame.
        let mut points: Vec<Point2<f64>> =
            regions.iter().flat_map(|r| r.loops.iter()).flatten().copied().collect();
        for chain in regions.iter().flat_map(|r| r.chains.iter()) {
            let n = chain.len();
            if n == 2 {
                points.push(nalgebra::center(&chain[0], &chain[1]));
            } else {
                points.extend_from_slice(&chain[1..n - 1]);
            }
        }
        points.extend_from_slice(extra);
        for (i, ray) in rays.iter().enumerate() {
            for other in &rays[i + 1..] {
                points.extend(ray.crossing(other.anchor, other.direction, false));
            }
            for line in lines {
                points.extend(ray.crossing(line.origin(), line.direction(), true));
            }
        }

        let mut min = points.first().copied().unwrap_or_else(Point2::origin);
        let mut max = min;
        for p in &points {
            min = min.inf(p);
            max = max.sup(p);
        }
        let extent = (max - min).norm();
        let reach = if extent > 0.0 { extent } else { 1.0 };
        let (min, max) = (min - Vector2::repeat(reach), max + Vector2::repeat(reach));
        Self {
            min,
            max,
            reach,
            eps: ON_FRAME * (max - min).norm(),
        }
    }

    /// Closes every open chain of `region` along the frame.
    ///
    /// Each chain end is cut where it leaves the frame. The frame is then
    /// followed counter-clockwise from each chain end to the next chain
    /// start, which keeps the interior on the left.
    pub(super) fn close(&self, region: &PolygonRegion) -> Vec<Vec<Point2<f64>>> {
        let mut loops = region.loops.clone();
        let paths: Vec<Vec<Point2<f64>>> = region
            .chains
            .iter()
            .map(|c| {
                let n = c.len();
                let mut path = Vec::with_capacity(n);
                path.push(self.far_end(c[1], c[0]));
                path.extend_from_slice(&c[1..n - 1]);
                path.push(self.far_end(c[n - 2], c[n - 1]));
                path
            })
            .collect();
        if paths.is_empty() {
            return loops;
        }

        let perimeter = self.perimeter();
        let gap = |from: f64, to: f64| (to - from).rem_euclid(perimeter);
        let starts: Vec<f64> = paths.iter().map(|p| self.position(&p[0])).collect();
        let next: Vec<usize> = paths
            .iter()
            .map(|p| {
                let end = self.position(&p[p.len() - 1]);
                (0..paths.len())
                    .min_by(|&a, &b| gap(end, starts[a]).total_cmp(&gap(end, starts[b])))
                    .unwrap_or(0)
            })
            .collect();

        let mut visited = vec![false; paths.len()];
        for first in 0..paths.len() {
            let mut closed = Vec::new();
            let mut i = first;
            while !visited[i] {
                visited[i] = true;
                closed.extend_from_slice(&paths[i]);
                self.walk(&paths[i][paths[i].len() - 1], &paths[next[i]][0], &mut closed);
                i = next[i];
            }
            if !closed.is_empty() {
                loops.push(closed);
            }
        }
        loops
    }

    /// Cuts closed loops open wherever they run along the frame.
    pub(super) fn reopen(&self, loops: Vec<Vec<Point2<f64>>>, tolerance: f64) -> PolygonRegion {
        let mut closed = Vec::new();
        let mut chains = Vec::new();
        for l in loops {
            let n = l.len();
            let far: Vec<bool> = (0..n)
                .map(|i| self.along_frame(&l[i], &l[(i + 1) % n]))
                .collect();

            let Some(start) = (0..n).find(|&i| !far[i] && far[(i + n - 1) % n]) else {
                if far.contains(&true) {
                    trace!(vertices = n, "dropped contour lying at infinity");
                } else {
                    closed.push(l);
                }
                continue;
            };

            let mut chain = Vec::new();
            for j in 0..n {
                let i = (start + j) % n;
                chain.push(l[i]);
                if far[i] {
                    if is_valid_chain(&chain) {
                        self.settle(&mut chain);
                        chains.push(std::mem::take(&mut chain));
                    } else {
                        chain.clear();
                    }
                }
            }
        }

        PolygonRegion {
            loops: closed,
            chains,
            tolerance,
        }
    }

    /// Moves the direction points of a reopened chain back next to the
    /// geometry, so that later frames do not grow with each operation.
    fn settle(&self, chain: &mut [Point2<f64>]) {
        let n = chain.len();
        if n == 2 {
            let u = (chain[1] - chain[0]).normalize();
            let center = nalgebra::center(&self.min, &self.max);
            let mid = chain[0] + u * (center - chain[0]).dot(&u);
            chain[0] = mid - u * (0.5 * self.reach);
            chain[1] = mid + u * (0.5 * self.reach);
        } else {
            chain[0] = chain[1] + (chain[0] - chain[1]).normalize() * self.reach;
            chain[n - 1] = chain[n - 2] + (chain[n - 1] - chain[n - 2]).normalize() * self.reach;
        }
    }

    /// Far end of the half-line starting at `vertex` and going through `toward`.
    ///
    /// The whole line is cut by the frame, then by the perpendicular through
    /// `vertex`, keeping the side `toward` lies on.
    fn far_end(&self, vertex: Point2<f64>, toward: Point2<f64>) -> Point2<f64> {
        let d = toward - vertex;
        let limit = Line2D::from_point_and_angle(vertex, d.y.atan2(d.x) + FRAC_PI_2, 0.0);
        let (a, b) = self.crossings(vertex, d);
        if limit.offset(&a) >= limit.offset(&b) { a } else { b }
    }

    /// Points where the line through `p` along `d` crosses the frame.
    fn crossings(&self, p: Point2<f64>, d: Vector2<f64>) -> (Point2<f64>, Point2<f64>) {
        let mut enter = f64::NEG_INFINITY;
        let mut exit = f64::INFINITY;
        for axis in 0..2 {
            if d[axis] != 0.0 {
                let t1 = (self.min[axis] - p[axis]) / d[axis];
                let t2 = (self.max[axis] - p[axis]) / d[axis];
                enter = enter.max(t1.min(t2));
                exit = exit.min(t1.max(t2));
            }
        }
        (self.snap(p + d * enter), self.snap(p + d * exit))
    }

    fn snap(&self, p: Point2<f64>) -> Point2<f64> {
        let snap = |x: f64, lo: f64, hi: f64| {
            let x = x.clamp(lo, hi);
            if x - lo <= self.eps {
                lo
            } else if hi - x <= self.eps {
                hi
            } else {
                x
            }
        };
        Point2::new(
            snap(p.x, self.min.x, self.max.x),
            snap(p.y, self.min.y, self.max.y),
        )
    }

    fn along_frame(&self, a: &Point2<f64>, b: &Point2<f64>) -> bool {
        let on = |x: f64, bound: f64| (x - bound).abs() <= self.eps;
        (on(a.x, self.min.x) && on(b.x, self.min.x))
            || (on(a.x, self.max.x) && on(b.x, self.max.x))
            || (on(a.y, self.min.y) && on(b.y, self.min.y))
            || (on(a.y, self.max.y) && on(b.y, self.max.y))
    }

    fn perimeter(&self) -> f64 {
        let size = self.max - self.min;
        2.0 * (size.x + size.y)
    }

    /// Counter-clockwise arc length from the lower left corner to `p`.
    fn position(&self, p: &Point2<f64>) -> f64 {
        let size = self.max - self.min;
        if (p.y - self.min.y).abs() <= self.eps {
            p.x - self.min.x
        } else if (p.x - self.max.x).abs() <= self.eps {
            size.x + p.y - self.min.y
        } else if (p.y - self.max.y).abs() <= self.eps {
            size.x + size.y + self.max.x - p.x
        } else {
            2.0 * size.x + size.y + self.max.y - p.y
        }
    }

    /// Appends the corners met going counter-clockwise from `from` to `to`.
    fn walk(&self, from: &Point2<f64>, to: &Point2<f64>, out: &mut Vec<Point2<f64>>) {
        let perimeter = self.perimeter();
        let start = self.position(from);
        let span = (self.position(to) - start).rem_euclid(perimeter);
        let mut corners: Vec<(f64, Point2<f64>)> = [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
        .into_iter()
        .map(|c| ((self.position(&c) - start).rem_euclid(perimeter), c))
        .filter(|(g, _)| *g > 0.0 && *g < span)
        .collect();
        corners.sort_by(|a, b| a.0.total_cmp(&b.0));
        out.extend(corners.into_iter().map(|(_, c)| c));
    }
}
