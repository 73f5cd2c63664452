use std::{error::Error, fmt, io};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, VizError>;

/// All errors that can occur while configuring the visualizer.
///
/// Rendering itself never fails: degenerate inputs draw nothing instead.
#[derive(Debug)]
pub enum VizError {
    /// A topology with no layers, or with an empty layer.
    InvalidTopology(String),
    /// A configuration value outside its accepted range.
    InvalidConfig(String),
    /// A color string that is not `#rrggbb`.
    InvalidColor(String),
    /// Reading a configuration file failed.
    Io { path: String, source: io::Error },
    /// A configuration document is not valid JSON for [`crate::VizConfig`].
    Json(serde_json::Error),
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTopology(msg) => write!(f, "invalid topology: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::InvalidColor(value) => write!(f, "invalid color '{value}', expected #rrggbb"),
            Self::Io { path, source } => write!(f, "cannot read '{path}': {source}"),
            Self::Json(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl Error for VizError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for VizError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
