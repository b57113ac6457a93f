//! 2D regions expressed in a plane's local frame.
//!
//! A [`PolygonRegion`] is a set of closed loops and open chains interpreted
//! with the non-zero winding rule. Canonical regions wind their outer loops
//! counter-clockwise and their holes clockwise. Open chains bound regions
//! that reach infinity; see [`Contour::Open`].
//!
//! Boolean union is delegated to the `i_overlay` crate. Splitting by a line
//! clips each loop independently, which keeps the original coordinates
//! exact and preserves the winding of every point off the line. Unbounded
//! regions go through the same code once closed on a far frame.

mod contour;
mod far;
mod line2d;

pub use contour::Contour;
pub use line2d::Line2D;

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

use crate::plane::Side;
use far::FarFrame;

/// A region of the plane, bounded by closed loops and open chains.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRegion {
    loops: Vec<Vec<Point2<f64>>>,
    chains: Vec<Vec<Point2<f64>>>,
    tolerance: f64,
}

impl PolygonRegion {
    /// Creates a bounded region from loops of vertices.
    ///
    /// Loops with fewer than 3 vertices bound nothing and are dropped.
    pub fn new(loops: Vec<Vec<Point2<f64>>>, tolerance: f64) -> Self {
        Self::from_contours(loops.into_iter().map(Contour::Closed), tolerance)
    }

    /// Creates a region from closed and open contours.
    ///
    /// Closed loops with fewer than 3 vertices are dropped, as are open
    /// chains with fewer than 2 points or a zero-length end edge.
    pub fn from_contours<I>(contours: I, tolerance: f64) -> Self
    where
        I: IntoIterator<Item = Contour>,
    {
        let mut loops = Vec::new();
        let mut chains = Vec::new();
        for contour in contours {
            match contour {
                Contour::Closed(points) if points.len() >= 3 => loops.push(points),
                Contour::Open(points) if is_valid_chain(&points) => chains.push(points),
                _ => {}
            }
        }
        Self {
            loops,
            chains,
            tolerance,
        }
    }

    /// Creates the empty region.
    pub fn empty(tolerance: f64) -> Self {
        Self {
            loops: Vec::new(),
            chains: Vec::new(),
            tolerance,
        }
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the closed boundary loops.
    #[inline]
    pub fn loops(&self) -> &[Vec<Point2<f64>>] {
        &self.loops
    }

    /// Returns the open boundary chains.
    #[inline]
    pub fn open_chains(&self) -> &[Vec<Point2<f64>>] {
        &self.chains
    }

    /// Returns every boundary component, closed loops first.
    pub fn contours(&self) -> Vec<Contour> {
        self.clone().into_contours()
    }

    pub fn into_contours(self) -> Vec<Contour> {
        self.loops
            .into_iter()
            .map(Contour::Closed)
            .chain(self.chains.into_iter().map(Contour::Open))
            .collect()
    }

    /// Returns true if the region has no boundary at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty() && self.chains.is_empty()
    }

    /// Returns true if no boundary component reaches infinity.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.chains.is_empty()
    }

    /// Signed area: positive for counter-clockwise outer loops, infinite
    /// for unbounded regions.
    pub fn area(&self) -> f64 {
        if !self.is_bounded() {
            return f64::INFINITY;
        }
        self.loops.iter().map(|l| signed_area(l)).sum()
    }

    /// Axis-aligned bounding box of all vertices, direction points of open
    /// chains included.
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let mut points = self.loops.iter().chain(self.chains.iter()).flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.inf(p), max.sup(p))))
    }

    /// Checks whether `point` is inside the region (non-zero winding).
    ///
    /// Points exactly on the boundary may go either way.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        let winding = |loops: &[Vec<Point2<f64>>]| {
            loops.iter().map(|l| winding_number(point, l)).sum::<i32>() != 0
        };
        if self.is_bounded() {
            return winding(&self.loops);
        }
        let frame = FarFrame::enclosing(&[self], &[*point], &[]);
        winding(&frame.close(self))
    }

    /// Returns the region with every contour traversed backwards.
    pub fn reversed(&self) -> Self {
        let reverse = |contours: &[Vec<Point2<f64>>]| -> Vec<Vec<Point2<f64>>> {
            contours
                .iter()
                .map(|c| c.iter().rev().copied().collect())
                .collect()
        };
        Self {
            loops: reverse(&self.loops),
            chains: reverse(&self.chains),
            tolerance: self.tolerance,
        }
    }

    /// Maps every vertex through `f`, keeping contour order.
    ///
    /// `f` should be affine so that chain directions stay meaningful.
    pub fn map_points<F>(&self, f: F) -> Self
    where
        F: Fn(&Point2<f64>) -> Point2<f64>,
    {
        let map = |contours: &[Vec<Point2<f64>>]| -> Vec<Vec<Point2<f64>>> {
            contours
                .iter()
                .map(|c| c.iter().map(&f).collect())
                .collect()
        };
        Self {
            loops: map(&self.loops),
            chains: map(&self.chains),
            tolerance: self.tolerance,
        }
    }

    /// Rebuilds the region in canonical form: overlapping loops merged,
    /// outer loops counter-clockwise, holes clockwise.
    pub fn normalized(&self) -> Self {
        self.overlay(&Self::empty(self.tolerance), OverlayRule::Union)
    }

    /// Union of two regions, in canonical form.
    pub fn union(&self, other: &Self) -> Self {
        self.overlay(other, OverlayRule::Union)
    }

    /// Keeps the part of the region on the plus side of `line`.
    ///
    /// Returns `None` when nothing with a non-negligible width remains.
    pub fn clip(&self, line: &Line2D) -> Option<Self> {
        let clip_all = |loops: &[Vec<Point2<f64>>]| -> Vec<Vec<Point2<f64>>> {
            loops
                .iter()
                .flat_map(|l| clip_loop(l, line))
                .filter(|l| !is_sliver(l, self.tolerance))
                .collect()
        };

        let clipped = if self.is_bounded() {
            Self {
                loops: clip_all(&self.loops),
                chains: Vec::new(),
                tolerance: self.tolerance,
            }
        } else {
            let frame = FarFrame::enclosing(&[self], &[], &[line]);
            frame.reopen(clip_all(&frame.close(self)), self.tolerance)
        };

        (!clipped.is_empty()).then_some(clipped)
    }

    /// Splits the region by `line` into its `(plus, minus)` parts.
    pub fn split(&self, line: &Line2D) -> (Option<Self>, Option<Self>) {
        (self.clip(line), self.clip(&line.reverse()))
    }

    fn overlay(&self, other: &Self, rule: OverlayRule) -> Self {
        if self.is_bounded() && other.is_bounded() {
            let loops = overlay_loops(&self.loops, &other.loops, rule, self.tolerance);
            return Self {
                loops,
                chains: Vec::new(),
                tolerance: self.tolerance,
            };
        }
        let frame = FarFrame::enclosing(&[self, other], &[], &[]);
        let loops = overlay_loops(&frame.close(self), &frame.close(other), rule, self.tolerance);
        frame.reopen(loops, self.tolerance)
    }
}

/// Runs `i_overlay` on two sets of loops and returns canonical loops.
///
/// Each output shape is a list of contours: the outer boundary first, then
/// holes. Slivers are dropped.
fn overlay_loops(
    subject: &[Vec<Point2<f64>>],
    clip: &[Vec<Point2<f64>>],
    rule: OverlayRule,
    tolerance: f64,
) -> Vec<Vec<Point2<f64>>> {
    let to_paths = |loops: &[Vec<Point2<f64>>]| -> Vec<Vec<[f64; 2]>> {
        loops
            .iter()
            .map(|l| l.iter().map(|p| [p.x, p.y]).collect())
            .collect()
    };
    let subject = to_paths(subject);
    let clip = to_paths(clip);
    if subject.is_empty() && clip.is_empty() {
        return Vec::new();
    }

    let shapes = subject.overlay(&clip, rule, FillRule::NonZero);
    let mut loops = Vec::new();
    for shape in shapes {
        let mut contours = shape.into_iter().map(|contour| {
            contour
                .into_iter()
                .map(|p| Point2::new(p[0], p[1]))
                .collect::<Vec<_>>()
        });

        let Some(outer) = contours.next() else {
            continue;
        };
        if outer.len() < 3 || is_sliver(&outer, tolerance) {
            continue;
        }
        loops.push(with_orientation(outer, true));

        for hole in contours {
            if hole.len() >= 3 && !is_sliver(&hole, tolerance) {
                loops.push(with_orientation(hole, false));
            }
        }
    }
    loops
}

/// An open chain needs two points and non-degenerate end edges.
fn is_valid_chain(chain: &[Point2<f64>]) -> bool {
    let n = chain.len();
    n >= 2 && chain[0] != chain[1] && chain[n - 1] != chain[n - 2]
}

/// Clips a closed loop to the plus side of `line`.
///
/// Vertices on the plus side are kept and a crossing point is inserted on
/// every edge going strictly from one side to the other. When a
/// non-convex loop leaves the plus side and comes back, the pieces kept
/// are relinked along the line into separate loops rather than joined by
/// zero-width bridges.
fn clip_loop(vertices: &[Point2<f64>], line: &Line2D) -> Vec<Vec<Point2<f64>>> {
    let n = vertices.len();
    let offsets: Vec<f64> = vertices.iter().map(|v| line.offset(v)).collect();
    let sides: Vec<Side> = vertices.iter().map(|v| line.classify_point(v)).collect();
    if !sides.contains(&Side::Plus) {
        return Vec::new();
    }
    if !sides.contains(&Side::Minus) {
        return vec![vertices.to_vec()];
    }

    // Kept points, flagged when they lie on the line.
    let mut kept: Vec<(Point2<f64>, bool)> = Vec::with_capacity(n + 2);
    for i in 0..n {
        let next = (i + 1) % n;
        match sides[i] {
            Side::Plus => kept.push((vertices[i], false)),
            Side::Hyperplane => kept.push((vertices[i], true)),
            Side::Minus | Side::Both => {}
        }
        let crosses = matches!(
            (sides[i], sides[next]),
            (Side::Plus, Side::Minus) | (Side::Minus, Side::Plus)
        );
        if crosses {
            let t = offsets[i] / (offsets[i] - offsets[next]);
            kept.push((vertices[i] + (vertices[next] - vertices[i]) * t, true));
        }
    }
    let bridged = || {
        let points: Vec<Point2<f64>> = kept.iter().map(|(p, _)| *p).collect();
        if points.len() >= 3 { vec![points] } else { Vec::new() }
    };

    // Two consecutive points on the line mean the loop went through the
    // minus side (or along the line) in between.
    let m = kept.len();
    let is_break = |k: usize| kept[k].1 && kept[(k + 1) % m].1;
    let Some(first_break) = (0..m).find(|&k| is_break(k)) else {
        return bridged();
    };

    // Arcs of the loop kept on the plus side, each from the line to the line.
    let mut arcs: Vec<Vec<Point2<f64>>> = Vec::new();
    let mut arc = Vec::new();
    for j in 1..=m {
        let k = (first_break + j) % m;
        arc.push(kept[k].0);
        if is_break(k) {
            if arc.len() >= 2 {
                arcs.push(std::mem::take(&mut arc));
            } else {
                arc.clear();
            }
        }
    }

    // Along the line, arc ends and starts alternate. Each pair of
    // neighbours bounds a segment joining an end to a start.
    let mut ends: Vec<(f64, usize, bool)> = arcs
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            [
                (line.abscissa(&a[0]), i, true),
                (line.abscissa(&a[a.len() - 1]), i, false),
            ]
        })
        .collect();
    ends.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.2.cmp(&b.2)));
    let starts_first = ends.first().is_some_and(|e| e.2);
    let mut next = vec![usize::MAX; arcs.len()];
    for pair in ends.chunks(2) {
        let [a, b] = pair else {
            return bridged();
        };
        if a.2 != starts_first || b.2 == starts_first {
            return bridged();
        }
        let (start, end) = if a.2 { (a, b) } else { (b, a) };
        next[end.1] = start.1;
    }

    let mut loops = Vec::new();
    let mut visited = vec![false; arcs.len()];
    for first in 0..arcs.len() {
        let mut points: Vec<Point2<f64>> = Vec::new();
        let mut i = first;
        while !visited[i] {
            visited[i] = true;
            for p in &arcs[i] {
                if points.last() != Some(p) {
                    points.push(*p);
                }
            }
            i = next[i];
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() >= 3 {
            loops.push(points);
        }
    }
    loops
}

/// Signed area of a closed loop (shoelace formula).
pub fn signed_area(vertices: &[Point2<f64>]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

fn perimeter(vertices: &[Point2<f64>]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| (vertices[(i + 1) % n] - vertices[i]).norm())
        .sum()
}

/// A loop is a sliver when its mean width is below the tolerance.
fn is_sliver(vertices: &[Point2<f64>], tolerance: f64) -> bool {
    let perimeter = perimeter(vertices);
    perimeter == 0.0 || 2.0 * signed_area(vertices).abs() / perimeter < tolerance
}

fn with_orientation(mut vertices: Vec<Point2<f64>>, counter_clockwise: bool) -> Vec<Point2<f64>> {
    if (signed_area(&vertices) > 0.0) != counter_clockwise {
        vertices.reverse();
    }
    vertices
}

fn winding_number(point: &Point2<f64>, vertices: &[Point2<f64>]) -> i32 {
    let n = vertices.len();
    let mut winding = 0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = (b.x - a.x) * (point.y - a.y) - (point.x - a.x) * (b.y - a.y);
        if a.y <= point.y {
            if b.y > point.y && cross > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && cross < 0.0 {
            winding -= 1;
        }
    }
    winding
}
