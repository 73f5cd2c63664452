use std::f64::consts::PI;

/// Timing curve applied to a tween's linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    CubicInOut,
    SinInOut,
    QuadOut,
}

impl Ease {
    /// Maps progress `t` in `[0,1]` to eased progress, clamping `t` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
            Ease::SinInOut => (1.0 - (PI * t).cos()) / 2.0,
            Ease::QuadOut => t * (2.0 - t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 4] = [Ease::Linear, Ease::CubicInOut, Ease::SinInOut, Ease::QuadOut];

    #[test]
    fn fixed_endpoints() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-12, "{e:?}");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{e:?}");
        }
    }

    #[test]
    fn symmetric_curves_cross_at_half() {
        assert!((Ease::CubicInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((Ease::SinInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!(Ease::QuadOut.apply(0.5) > 0.5);
        assert!(Ease::CubicInOut.apply(0.25) < 0.25);
    }

    #[test]
    fn monotonic_and_clamped() {
        for e in ALL {
            let mut prev = e.apply(-3.0);
            for i in 1..=50 {
                let v = e.apply(i as f64 / 50.0);
                assert!(v >= prev - 1e-12, "{e:?}");
                prev = v;
            }
            assert_eq!(e.apply(4.0), 1.0);
        }
    }
}
