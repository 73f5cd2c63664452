/// Evenly spaced positions for `count` ordinal values across a range.
///
/// Matches the semantics of a d3 point scale: `padding` is the outer padding
/// in multiples of the step, and the points are centred in the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScale {
    start: f64,
    step: f64,
    count: usize,
}

impl PointScale {
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> Self {
        let (r0, r1) = range;
        let span = r1 - r0;
        let slots = (count as f64 - 1.0 + padding * 2.0).max(1.0);
        let step = span / slots;
        let start = r0 + (span - step * (count as f64 - 1.0).max(0.0)) * 0.5;
        Self { start, step, count }
    }

    /// Position of the `i`-th value, `None` outside the domain.
    pub fn position(&self, i: usize) -> Option<f64> {
        (i < self.count).then(|| self.start + self.step * i as f64)
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}
