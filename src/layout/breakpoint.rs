use serde::Deserialize;

/// A discrete layout density, chosen from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    Compact,
    Medium,
    Wide,
}

impl Breakpoint {
    #[inline]
    pub fn is_compact(self) -> bool {
        self == Breakpoint::Compact
    }
}

/// Width thresholds (in pixels) separating the three breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BreakpointPolicy {
    pub compact_below: f64,
    pub medium_below: f64,
}

impl BreakpointPolicy {
    /// Thresholds used by the layered network diagram.
    pub const NETWORK: Self = Self {
        compact_below: 520.0,
        medium_below: 800.0,
    };

    /// Thresholds used by the local loop diagram.
    pub const LOCAL_LOOP: Self = Self {
        compact_below: 480.0,
        medium_below: 720.0,
    };

    pub fn classify(&self, width: f64) -> Breakpoint {
        if width < self.compact_below {
            Breakpoint::Compact
        } else if width < self.medium_below {
            Breakpoint::Medium
        } else {
            Breakpoint::Wide
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_thresholds() {
        let p = BreakpointPolicy::NETWORK;
        assert_eq!(p.classify(400.0), Breakpoint::Compact);
        assert_eq!(p.classify(519.9), Breakpoint::Compact);
        assert_eq!(p.classify(520.0), Breakpoint::Medium);
        assert_eq!(p.classify(799.0), Breakpoint::Medium);
        assert_eq!(p.classify(1000.0), Breakpoint::Wide);
    }

    #[test]
    fn loop_thresholds_are_tighter() {
        let p = BreakpointPolicy::LOCAL_LOOP;
        assert_eq!(p.classify(500.0), Breakpoint::Medium);
        assert_eq!(p.classify(750.0), Breakpoint::Wide);
    }
}
