//! Analyzer backend selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::SimpleCardAnalyzer;
use crate::domain::CardAnalyzer;

/// Which analyzer implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerBackend {
    /// Pixel analysis when compiled in, file heuristics otherwise.
    #[default]
    Auto,
    /// Pixel-level analysis.
    Vision,
    /// File name and size heuristics.
    Simple,
}

impl AnalyzerBackend {
    /// Returns true if pixel-level analysis is compiled in.
    #[must_use]
    pub const fn vision_available() -> bool {
        cfg!(feature = "vision")
    }

    /// Resolves `Auto` and unavailable backends to a concrete one.
    #[must_use]
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto if Self::vision_available() => Self::Vision,
            Self::Auto => Self::Simple,
            Self::Vision if !Self::vision_available() => {
                warn!("Vision analyzer not compiled in, falling back to simple analyzer");
                Self::Simple
            }
            other => other,
        }
    }

    /// Lowercase backend name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Vision => "vision",
            Self::Simple => "simple",
        }
    }
}

impl fmt::Display for AnalyzerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyzerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "vision" => Ok(Self::Vision),
            "simple" => Ok(Self::Simple),
            other => Err(format!(
                "unknown analyzer '{other}', expected auto, vision or simple"
            )),
        }
    }
}

/// Creates a fresh analyzer for one card.
#[must_use]
pub fn create_analyzer(backend: AnalyzerBackend) -> Box<dyn CardAnalyzer> {
    let resolved = backend.resolve();
    debug!("Creating {resolved} analyzer (requested {backend})");

    match resolved {
        #[cfg(feature = "vision")]
        AnalyzerBackend::Vision => Box::new(super::VisionCardAnalyzer::default()),
        _ => Box::new(SimpleCardAnalyzer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!("Simple".parse(), Ok(AnalyzerBackend::Simple));
        assert_eq!(" vision ".parse(), Ok(AnalyzerBackend::Vision));
        assert!("opencv".parse::<AnalyzerBackend>().is_err());
    }

    #[test]
    fn test_simple_is_always_available() {
        assert_eq!(AnalyzerBackend::Simple.resolve(), AnalyzerBackend::Simple);
        assert_eq!(create_analyzer(AnalyzerBackend::Simple).name(), "simple");
    }

    #[cfg(feature = "vision")]
    #[test]
    fn test_auto_prefers_vision() {
        assert_eq!(AnalyzerBackend::Auto.resolve(), AnalyzerBackend::Vision);
        assert_eq!(create_analyzer(AnalyzerBackend::Auto).name(), "vision");
    }

    #[cfg(not(feature = "vision"))]
    #[test]
    fn test_vision_falls_back_without_feature() {
        assert_eq!(AnalyzerBackend::Vision.resolve(), AnalyzerBackend::Simple);
        assert_eq!(create_analyzer(AnalyzerBackend::Auto).name(), "simple");
    }
}
