//! Configuration file support for card-grader.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/card-grader/config.toml` (lowest priority)
//! - Project-local: `.card-grader.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use card_grader_core::{AnalyzerBackend, Criterion, WeightSet};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Project-local config file name.
const PROJECT_CONFIG: &str = ".card-grader.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Analyzer backend settings.
    pub analyzer: AnalyzerConfig,
    /// Grading company settings.
    pub grading: GradingConfig,
    /// Criterion weights.
    pub weights: WeightsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Analyzer configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Backend: "auto", "vision" or "simple".
    pub backend: Option<String>,
}

/// Grading configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Grading company whose thresholds are compared against.
    pub company: Option<String>,
}

/// Criterion weight overrides. Must sum to 1.0 when any is set.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    /// Edge weight.
    pub edges: Option<f64>,
    /// Corner weight.
    pub corners: Option<f64>,
    /// Surface weight.
    pub surface: Option<f64>,
    /// Centering weight.
    pub centering: Option<f64>,
}

impl WeightsConfig {
    fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    fn pairs(&self) -> BTreeMap<Criterion, f64> {
        [
            (Criterion::Edges, self.edges),
            (Criterion::Corners, self.corners),
            (Criterion::Surface, self.surface),
            (Criterion::Centering, self.centering),
        ]
        .into_iter()
        .filter_map(|(c, w)| w.map(|w| (c, w)))
        .collect()
    }
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
    /// Include analyzer measurements in text output.
    pub detailed: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/card-grader/config.toml`
    /// 2. Project-local: `.card-grader.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref backend) = self.analyzer.backend {
            backend
                .parse::<AnalyzerBackend>()
                .map_err(|e| format!("analyzer.backend: {e}"))?;
        }

        if !self.weights.is_empty() {
            WeightSet::new(self.weights.pairs()).map_err(|e| format!("weights: {e}"))?;
        }

        if let Some(ref f) = self.output.format {
            if !matches!(f.as_str(), "text" | "json" | "jsonl") {
                return Err(format!(
                    "output.format must be 'text', 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Configured analyzer backend, if set and valid.
    pub fn backend(&self) -> Option<AnalyzerBackend> {
        self.analyzer.backend.as_deref()?.parse().ok()
    }

    /// Configured weights, if any are set and they sum to 1.0.
    pub fn weight_set(&self) -> Option<WeightSet> {
        if self.weights.is_empty() {
            return None;
        }
        match WeightSet::new(self.weights.pairs()) {
            Ok(weights) => Some(weights),
            Err(e) => {
                warn!("Ignoring configured weights: {e}");
                None
            }
        }
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Analyzer
        self.analyzer.backend = other
            .analyzer
            .backend
            .or_else(|| self.analyzer.backend.take());

        // Grading
        self.grading.company = other
            .grading
            .company
            .or_else(|| self.grading.company.take());

        // Weights replace as a set
        if !other.weights.is_empty() {
            self.weights = other.weights;
        }

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
        self.output.detailed = other.output.detailed.or(self.output.detailed);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("card-grader").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.card-grader.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.general.recursive.is_none());
        assert!(config.analyzer.backend.is_none());
        assert!(config.weight_set().is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert!(config.grading.company.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[general]
recursive = true

[analyzer]
backend = 'simple'

[grading]
company = 'BGS'

[weights]
edges = 0.4
corners = 0.2
surface = 0.2
centering = 0.2

[output]
format = 'json'
pretty = true
progress = false
detailed = true
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.general.recursive, Some(true));
        assert_eq!(config.backend(), Some(AnalyzerBackend::Simple));
        assert_eq!(config.grading.company.as_deref(), Some("BGS"));
        assert_eq!(
            config.weight_set().and_then(|w| w.get(Criterion::Edges)),
            Some(0.4)
        );
        assert_eq!(config.output.format, Some("json".to_string()));
        assert_eq!(config.output.detailed, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_configs() {
        let mut base: AppConfig = toml::from_str(
            r"
[grading]
company = 'PSA'

[output]
format = 'text'
pretty = true
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[grading]
company = 'BGS'

[analyzer]
backend = 'simple'
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.grading.company.as_deref(), Some("BGS"));
        assert_eq!(base.output.format.as_deref(), Some("text"));
        assert_eq!(base.output.pretty, Some(true));
        assert_eq!(base.analyzer.backend.as_deref(), Some("simple"));
    }

    #[test]
    fn test_merge_replaces_weights_as_a_set() {
        let mut base: AppConfig = toml::from_str(
            r"
[weights]
edges = 0.25
corners = 0.25
surface = 0.25
centering = 0.25
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[weights]
edges = 0.5
corners = 0.5
",
        )
        .expect("parse override");

        base.merge(override_config);

        let weights = base.weight_set().expect("valid merged weights");
        assert_eq!(weights.len(), 2);
        assert_eq!(weights.get(Criterion::Surface), None);
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[general]
recursive = true

[weights]
edges = 1.0
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());

        assert_eq!(base.general.recursive, Some(true));
        assert_eq!(base.weights.edges, Some(1.0));
    }

    #[test]
    fn test_invalid_toml_syntax_handled() {
        let toml = r"
[grading
company = 'PSA'
";
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "invalid TOML should return error");
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let toml = r#"
[weights]
edges = "heavy"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "type mismatch should return error");
    }

    #[test]
    fn test_validate_weights_sum() {
        let mut config = AppConfig::default();
        config.weights.edges = Some(0.4);
        config.weights.corners = Some(0.4);

        let result = config.validate();
        assert!(result.unwrap_err().contains("weights"));
        assert!(config.weight_set().is_none());
    }

    #[test]
    fn test_validate_backend() {
        let mut config = AppConfig::default();
        config.analyzer.backend = Some("opencv".to_string());

        let result = config.validate();
        assert!(result.unwrap_err().contains("analyzer.backend"));
        assert!(config.backend().is_none());
    }

    #[test]
    fn test_validate_output_format_invalid() {
        let mut config = AppConfig::default();
        config.output.format = Some("xml".to_string());

        let result = config.validate();
        assert!(result.unwrap_err().contains("output.format"));
    }

    #[test]
    fn test_validate_empty_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_find_config_in_parents() {
        let temp = tempfile::tempdir().expect("tempdir");
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(temp.path().join(PROJECT_CONFIG), "").expect("write");

        let found = find_config_in_parents(&nested).expect("config found");
        assert_eq!(found, temp.path().join(PROJECT_CONFIG));
    }
}
