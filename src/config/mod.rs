mod palette;

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

pub use palette::{Palette, Rgb, Signal};

use crate::{
    error::{Result, VizError},
    layout::BreakpointPolicy,
    model::Topology,
};

/// Timing constants shared by the hosts and the animators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// How long the coordinator dwells in each phase.
    pub phase_period_ms: u64,
    /// Period of the local loop's emission cycle.
    pub loop_period_ms: u64,
    /// Delay before the local loop diagram first draws.
    pub mount_delay_ms: u64,
}

impl Timing {
    pub fn phase_period(&self) -> Duration {
        Duration::from_millis(self.phase_period_ms)
    }

    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(self.loop_period_ms)
    }

    pub fn mount_delay(&self) -> Duration {
        Duration::from_millis(self.mount_delay_ms)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            phase_period_ms: 5000,
            loop_period_ms: 3800,
            mount_delay_ms: 120,
        }
    }
}

/// Top-level visualizer configuration.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub palette: Palette,
    pub timing: Timing,
    pub network_breakpoints: BreakpointPolicy,
    pub loop_breakpoints: BreakpointPolicy,
    pub topology: Vec<usize>,
    /// Seed for sample data and edge weights; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            timing: Timing::default(),
            network_breakpoints: BreakpointPolicy::NETWORK,
            loop_breakpoints: BreakpointPolicy::LOCAL_LOOP,
            topology: vec![3, 4, 4, 2],
            seed: None,
        }
    }
}

impl VizConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`VizError::Json`] on malformed input or any validation error.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file.
    ///
    /// # Errors
    /// Returns [`VizError::Io`] if the file cannot be read, otherwise as
    /// [`VizConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| VizError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Checks cross-field constraints serde cannot express.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        self.topology()?;

        let t = &self.timing;
        if t.phase_period_ms == 0 || t.loop_period_ms == 0 {
            return Err(VizError::InvalidConfig("periods must be positive".into()));
        }

        for (name, bp) in [
            ("network_breakpoints", &self.network_breakpoints),
            ("loop_breakpoints", &self.loop_breakpoints),
        ] {
            if !(bp.compact_below > 0.0 && bp.compact_below < bp.medium_below) {
                return Err(VizError::InvalidConfig(format!(
                    "{name}: expected 0 < compact_below < medium_below, got {} / {}",
                    bp.compact_below, bp.medium_below
                )));
            }
        }

        Ok(())
    }

    /// The configured topology.
    ///
    /// # Errors
    /// Returns [`VizError::InvalidTopology`] if the layer list is invalid.
    pub fn topology(&self) -> Result<Topology> {
        Topology::new(self.topology.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = VizConfig::from_json_str("{}").unwrap();
        assert_eq!(config, VizConfig::default());
    }

    #[test]
    fn partial_overrides() {
        let config = VizConfig::from_json_str(
            r##"{
                "palette": { "error": "#ff0000" },
                "timing": { "phase_period_ms": 2000 },
                "topology": [2, 5, 1],
                "seed": 7
            }"##,
        )
        .unwrap();

        assert_eq!(config.palette.error, Rgb::new(255, 0, 0));
        assert_eq!(config.palette.activation, Palette::default().activation);
        assert_eq!(config.timing.phase_period(), Duration::from_secs(2));
        assert_eq!(config.timing.loop_period_ms, 3800);
        assert_eq!(config.topology().unwrap().sizes(), &[2, 5, 1]);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn rejects_bad_color() {
        let err = VizConfig::from_json_str(r#"{ "palette": { "error": "red" } }"#).unwrap_err();
        assert!(matches!(err, VizError::Json(_)));
    }

    #[test]
    fn rejects_zero_period() {
        let err = VizConfig::from_json_str(r#"{ "timing": { "loop_period_ms": 0 } }"#).unwrap_err();
        assert!(matches!(err, VizError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_inverted_breakpoints() {
        let err = VizConfig::from_json_str(
            r#"{ "network_breakpoints": { "compact_below": 900, "medium_below": 800 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, VizError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_empty_layer() {
        let err = VizConfig::from_json_str(r#"{ "topology": [3, 0, 2] }"#).unwrap_err();
        assert!(matches!(err, VizError::InvalidTopology(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = VizConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, VizError::Io { .. }));
    }
}
