//! Convex hull of 2D point sets (Graham scan).
//!
//! Used to outline terrain features such as lakes. Orientation tests compare
//! the two halves of the cross product with a relative tolerance so that
//! nearly collinear lattice points do not produce spurious turns.

use std::cmp::Ordering;

/// Relative tolerance for orientation tests.
const EPSILON: f64 = 1e-10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn sub(self, other: Point2) -> Point2 {
        Point2::new(self.x - other.x, self.y - other.y)
    }

    fn dot(self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn distance_sq(self, other: Point2) -> f64 {
        let d = self.sub(other);
        d.dot(d)
    }
}

impl From<(usize, usize)> for Point2 {
    fn from((x, y): (usize, usize)) -> Self {
        Point2::new(x as f64, y as f64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Turn {
    Left,
    Right,
    Collinear,
}

/// Equality with a tolerance relative to the operands; magnitudes below
/// `EPSILON` compare equal to zero.
fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs());
    if scale < EPSILON {
        return true;
    }
    (a - b).abs() <= EPSILON * scale
}

fn turn(a: Point2, b: Point2, c: Point2) -> Turn {
    let lhs = (b.x - a.x) * (c.y - a.y);
    let rhs = (b.y - a.y) * (c.x - a.x);
    if approx_eq(lhs, rhs) {
        Turn::Collinear
    } else if lhs > rhs {
        Turn::Left
    } else {
        Turn::Right
    }
}

/// Compute the convex hull of `points`, counter-clockwise from the lowest
/// point (smallest y, then smallest x).
///
/// Fewer than three points are returned unchanged. Interior points,
/// duplicates and points lying on a hull edge are dropped, so a fully
/// collinear input collapses to its two extremes.
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let pivot = points
        .iter()
        .copied()
        .min_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
        })
        .unwrap_or(points[0]);

    // Polar angle from the pivot lies in [0, pi]; nearer points first on a tie.
    // Near-ties that the angle separates are resolved by the collinear test
    // in the walk below.
    let mut rest: Vec<(f64, f64, Point2)> = points
        .iter()
        .copied()
        .filter(|&p| p != pivot)
        .map(|p| {
            let d = p.sub(pivot);
            (d.y.atan2(d.x), pivot.distance_sq(p), p)
        })
        .collect();
    rest.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut hull = vec![pivot];
    for (_, _, candidate) in rest {
        let mut keep = true;
        while hull.len() >= 2 {
            let a = hull[hull.len() - 2];
            let b = hull[hull.len() - 1];
            match turn(a, b, candidate) {
                Turn::Left => break,
                Turn::Right => {
                    hull.pop();
                }
                Turn::Collinear => {
                    // Moving on past b: b is the middle point. Otherwise the
                    // candidate sits on (or doubles back over) the a-b edge.
                    if b.sub(a).dot(candidate.sub(b)) > 0.0 {
                        hull.pop();
                    } else {
                        keep = false;
                        break;
                    }
                }
            }
        }
        if keep && hull.last() != Some(&candidate) {
            hull.push(candidate);
        }
    }

    hull
}

/// Signed area of a closed polygon; positive when counter-clockwise.
pub fn signed_area(polygon: &[Point2]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}
