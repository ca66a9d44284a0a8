/// A point in panel pixel space.
pub type Point = (f64, f64);

/// One cubic Bézier piece of a smoothed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic {
    pub from: Point,
    pub c1: Point,
    pub c2: Point,
    pub to: Point,
}

impl Cubic {
    pub fn at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        (
            a * self.from.0 + b * self.c1.0 + c * self.c2.0 + d * self.to.0,
            a * self.from.1 + b * self.c1.1 + c * self.c2.1 + d * self.to.1,
        )
    }
}

/// Cardinal spline through `points`. Tension 0 gives a Catmull-Rom-like
/// curve, tension 1 gives straight segments. End points are duplicated to
/// stand in for the missing neighbours.
pub fn cardinal(points: &[Point], tension: f64) -> Vec<Cubic> {
    let k = (1.0 - tension) / 6.0;
    points
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let (p1, p2) = (w[0], w[1]);
            let p0 = if i == 0 { p1 } else { points[i - 1] };
            let p3 = points.get(i + 2).copied().unwrap_or(p2);
            Cubic {
                from: p1,
                c1: (p1.0 + k * (p2.0 - p0.0), p1.1 + k * (p2.1 - p0.1)),
                c2: (p2.0 - k * (p3.0 - p1.0), p2.1 - k * (p3.1 - p1.1)),
                to: p2,
            }
        })
        .collect()
}

/// Flatten a curve into a polyline with `steps` samples per segment.
pub fn flatten(curve: &[Cubic], steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    let mut out = Vec::with_capacity(curve.len() * steps + 1);
    if let Some(first) = curve.first() {
        out.push(first.from);
    }
    for c in curve {
        for s in 1..=steps {
            out.push(c.at(s as f64 / steps as f64));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_every_vertex() {
        let pts = [(0.0, 0.0), (10.0, 5.0), (20.0, -5.0), (30.0, 0.0)];
        let curve = cardinal(&pts, 0.0);
        assert_eq!(curve.len(), 3);
        for (c, w) in curve.iter().zip(pts.windows(2)) {
            assert_eq!(c.at(0.0), w[0]);
            assert_eq!(c.at(1.0), w[1]);
        }
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let curve = cardinal(&[(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)], 0.0);
        for (x, y) in flatten(&curve, 8) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn short_inputs() {
        assert!(cardinal(&[], 0.0).is_empty());
        assert!(cardinal(&[(1.0, 1.0)], 0.0).is_empty());
        assert!(flatten(&[], 4).is_empty());
        assert_eq!(flatten(&cardinal(&[(0.0, 0.0), (4.0, 0.0)], 0.0), 4).len(), 5);
    }
}
