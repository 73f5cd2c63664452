use std::fmt::Write;

use super::Point;

const EPSILON: f64 = 1e-12;
/// Polyline samples per Bézier segment when measuring arc length.
const SAMPLES_PER_SEGMENT: usize = 48;

/// One cubic Bézier segment.
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
        self.from * (u * u * u)
            + self.c1 * (3.0 * u * u * t)
            + self.c2 * (3.0 * u * t * t)
            + self.to * (t * t * t)
    }
}

/// Converts `points` into the Bézier segments of a Catmull-Rom spline with
/// parameter `alpha` (0.5 for centripetal).
///
/// The control points are the ones d3's `curveCatmullRom` produces: end
/// segments reuse their endpoint as the missing neighbour.
pub fn catmull_rom(points: &[Point], alpha: f64) -> Vec<Cubic> {
    if points.len() < 2 {
        return Vec::new();
    }
    if points.len() == 2 {
        let (a, b) = (points[0], points[1]);
        return vec![Cubic {
            from: a,
            c1: a,
            c2: b,
            to: b,
        }];
    }

    let len = |a: Point, b: Point| -> (f64, f64) {
        let d2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
        let l_2a = d2.powf(alpha);
        (l_2a.sqrt(), l_2a)
    };

    let n = points.len();
    let mut segments = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        let p1 = points[i];
        let p2 = points[i + 1];
        let p0 = if i == 0 { p1 } else { points[i - 1] };
        let p3 = if i + 2 < n { points[i + 2] } else { p2 };

        let (l01_a, l01_2a) = len(p0, p1);
        let (l12_a, l12_2a) = len(p1, p2);
        let (l23_a, l23_2a) = len(p2, p3);

        let c1 = if l01_a > EPSILON {
            let a = 2.0 * l01_2a + 3.0 * l01_a * l12_a + l12_2a;
            let m = 3.0 * l01_a * (l01_a + l12_a);
            (p1 * a - p0 * l12_2a + p2 * l01_2a) * (1.0 / m)
        } else {
            p1
        };

        let c2 = if l23_a > EPSILON {
            let b = 2.0 * l23_2a + 3.0 * l23_a * l12_a + l12_2a;
            let m = 3.0 * l23_a * (l23_a + l12_a);
            (p2 * b + p1 * l23_2a - p3 * l12_2a) * (1.0 / m)
        } else {
            p2
        };

        segments.push(Cubic {
            from: p1,
            c1,
            c2,
            to: p2,
        });
    }
    segments
}

/// A smooth path through a few points, parameterised by arc length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurvePath {
    segments: Vec<Cubic>,
    samples: Vec<Point>,
    /// Cumulative length at each sample.
    lengths: Vec<f64>,
}

impl CurvePath {
    /// Centripetal Catmull-Rom spline through `points`.
    pub fn through(points: &[Point]) -> Self {
        Self::from_segments(catmull_rom(points, 0.5))
    }

    pub fn from_segments(segments: Vec<Cubic>) -> Self {
        let mut samples = Vec::with_capacity(segments.len() * SAMPLES_PER_SEGMENT + 1);
        if let Some(first) = segments.first() {
            samples.push(first.from);
        }
        for seg in &segments {
            samples.extend(
                (1..=SAMPLES_PER_SEGMENT).map(|i| seg.at(i as f64 / SAMPLES_PER_SEGMENT as f64)),
            );
        }

        let mut lengths = Vec::with_capacity(samples.len());
        let mut total = 0.0;
        for (i, p) in samples.iter().enumerate() {
            if i > 0 {
                total += samples[i - 1].distance(*p);
            }
            lengths.push(total);
        }

        Self {
            segments,
            samples,
            lengths,
        }
    }

    /// Polyline approximation, suitable for raster hosts.
    pub fn samples(&self) -> &[Point] {
        &self.samples
    }

    pub fn length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    pub fn start(&self) -> Option<Point> {
        self.samples.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.samples.last().copied()
    }

    /// Point at `fraction` of the total arc length, clamped to `[0,1]`.
    pub fn point_at(&self, fraction: f64) -> Option<Point> {
        let first = *self.samples.first()?;
        let total = self.length();
        if total <= EPSILON {
            return Some(first);
        }

        let target = fraction.clamp(0.0, 1.0) * total;
        let i = self.lengths.partition_point(|&l| l < target);
        if i == 0 {
            return Some(first);
        }
        let i = i.min(self.samples.len() - 1);

        let (l0, l1) = (self.lengths[i - 1], self.lengths[i]);
        let t = if l1 - l0 > EPSILON {
            (target - l0) / (l1 - l0)
        } else {
            0.0
        };
        Some(self.samples[i - 1].lerp(self.samples[i], t))
    }

    /// SVG path data (`M … C …`).
    pub fn svg_data(&self) -> String {
        let mut out = String::new();
        let Some(first) = self.segments.first() else {
            return out;
        };
        let _ = write!(out, "M{},{}", fmt(first.from.x), fmt(first.from.y));
        for s in &self.segments {
            let _ = write!(
                out,
                "C{},{},{},{},{},{}",
                fmt(s.c1.x),
                fmt(s.c1.y),
                fmt(s.c2.x),
                fmt(s.c2.y),
                fmt(s.to.x),
                fmt(s.to.y)
            );
        }
        out
    }
}

fn fmt(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".into()
    } else {
        rounded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-6
    }

    #[test]
    fn passes_through_every_point() {
        let pts = [Point::new(0.0, 0.0), Point::new(50.0, -20.0), Point::new(100.0, 10.0)];
        let segs = catmull_rom(&pts, 0.5);
        assert_eq!(segs.len(), 2);
        assert!(close(segs[0].from, pts[0]));
        assert!(close(segs[0].to, pts[1]));
        assert!(close(segs[1].to, pts[2]));
        assert!(close(segs[0].at(1.0), segs[1].at(0.0)));
    }

    #[test]
    fn end_segments_reuse_endpoints() {
        let pts = [Point::new(0.0, 0.0), Point::new(50.0, -20.0), Point::new(100.0, 10.0)];
        let segs = catmull_rom(&pts, 0.5);
        assert_eq!(segs[0].c1, pts[0]);
        assert_eq!(segs[1].c2, pts[2]);
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let pts = [Point::new(0.0, 5.0), Point::new(40.0, 5.0), Point::new(100.0, 5.0)];
        let path = CurvePath::through(&pts);
        for f in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let p = path.point_at(f).unwrap();
            assert!((p.y - 5.0).abs() < 1e-9);
        }
        assert!((path.length() - 100.0).abs() < 1e-6);
        assert!(close(path.point_at(0.5).unwrap(), Point::new(50.0, 5.0)));
    }

    #[test]
    fn point_at_clamps_and_hits_ends() {
        let pts = [Point::new(0.0, 0.0), Point::new(30.0, 30.0), Point::new(60.0, 0.0)];
        let path = CurvePath::through(&pts);
        assert!(close(path.point_at(-1.0).unwrap(), pts[0]));
        assert!(close(path.point_at(0.0).unwrap(), pts[0]));
        assert!(close(path.point_at(1.0).unwrap(), pts[2]));
        assert!(close(path.point_at(7.0).unwrap(), pts[2]));
        assert!(path.length() > pts[0].distance(pts[2]));
    }

    #[test]
    fn arc_length_is_monotonic() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 40.0), Point::new(80.0, 20.0)];
        let path = CurvePath::through(&pts);
        let mut travelled = 0.0;
        let mut prev = path.point_at(0.0).unwrap();
        for i in 1..=100 {
            let p = path.point_at(i as f64 / 100.0).unwrap();
            travelled += prev.distance(p);
            prev = p;
        }
        assert!((travelled - path.length()).abs() < 0.5);
    }

    #[test]
    fn svg_data_has_one_curve_per_segment() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 10.0), Point::new(20.0, 0.0)];
        let d = CurvePath::through(&pts).svg_data();
        assert!(d.starts_with("M0,0C"));
        assert_eq!(d.matches('C').count(), 2);
        assert!(d.ends_with("20,0"));
    }

    #[test]
    fn empty_path() {
        let path = CurvePath::through(&[Point::new(1.0, 1.0)]);
        assert_eq!(path.length(), 0.0);
        assert_eq!(path.point_at(0.5), None);
        assert_eq!(path.svg_data(), "");
    }
}
