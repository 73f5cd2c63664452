use neuroflow::Variant;

/// Top-level tabs of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Backprop,
    Predictive,
    LocalLoop,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Backprop, Tab::Predictive, Tab::LocalLoop];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Backprop => "Backpropagation",
            Tab::Predictive => "Predictive Coding",
            Tab::LocalLoop => "Local Loop",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Backprop => 0,
            Tab::Predictive => 1,
            Tab::LocalLoop => 2,
        }
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Network variant shown by this tab, if it shows the network.
    pub fn variant(self) -> Option<Variant> {
        match self {
            Tab::Backprop => Some(Variant::Backprop),
            Tab::Predictive => Some(Variant::Predictive),
            Tab::LocalLoop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_wrap_both_ways() {
        assert_eq!(Tab::LocalLoop.next(), Tab::Backprop);
        assert_eq!(Tab::Backprop.prev(), Tab::LocalLoop);
        for tab in Tab::ALL {
            assert_eq!(tab.next().prev(), tab);
        }
    }
}
