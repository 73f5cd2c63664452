use std::{fmt, str::FromStr};

use crate::error::VizError;

/// Which learning algorithm the diagram illustrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// One global forward sweep followed by one global backward sweep.
    Backprop,
    /// Reciprocal local top-down predictions and bottom-up errors.
    Predictive,
}

impl Variant {
    pub const fn caption(self) -> &'static str {
        match self {
            Variant::Backprop => "Sequential Forward + Backward Gradient Flow",
            Variant::Predictive => "Bidirectional Predictive Inference",
        }
    }
}

impl FromStr for Variant {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backprop" => Ok(Variant::Backprop),
            "predictive" => Ok(Variant::Predictive),
            other => Err(VizError::InvalidConfig(format!("unknown variant: {other}"))),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Backprop => "backprop",
            Variant::Predictive => "predictive",
        })
    }
}

/// Discrete, externally driven animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Forward pass (backprop) or top-down prediction (predictive coding).
    Phase1,
    /// Backward pass (backprop) or bottom-up error (predictive coding).
    Phase2,
}

impl Phase {
    /// Successor in the Idle → Phase1 → Phase2 → Idle cycle.
    pub const fn next(self) -> Phase {
        match self {
            Phase::Idle => Phase::Phase1,
            Phase::Phase1 => Phase::Phase2,
            Phase::Phase2 => Phase::Idle,
        }
    }

    /// Status line shown next to the diagram.
    pub const fn describe(self, variant: Variant) -> &'static str {
        match (variant, self) {
            (Variant::Backprop, Phase::Phase1) => {
                "Forward Pass: Input signals propagate through weights to generate a final output prediction."
            }
            (Variant::Backprop, Phase::Phase2) => {
                "Backward Pass: Global error is calculated at the output and pushed back to update all synapses."
            }
            (Variant::Backprop, Phase::Idle) => "Idle: Waiting for next training sample.",
            (Variant::Predictive, Phase::Phase1) => {
                "Top-Down Prediction: Higher layers project their internal model downward to predict lower-level activity."
            }
            (Variant::Predictive, Phase::Phase2) => {
                "Bottom-Up Error: Lower layers send only the 'surprise' (prediction error) upward to update the model."
            }
            (Variant::Predictive, Phase::Idle) => {
                "Idle: Local synapses are stabilizing their predictions."
            }
        }
    }
}

impl FromStr for Phase {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "idle" => Ok(Phase::Idle),
            "1" | "phase1" | "forward" | "top-down" => Ok(Phase::Phase1),
            "2" | "phase2" | "backward" | "bottom-up" => Ok(Phase::Phase2),
            other => Err(VizError::InvalidConfig(format!("unknown phase: {other}"))),
        }
    }
}
