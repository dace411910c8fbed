use crate::core::models::element::Element;
use crate::core::topology::registry::TopologyMap;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_LIG_PAIRS: usize = 1;
pub const DEFAULT_MAX_VEC_LEN: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// How the set of dissociable core atoms is defined.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreSelection {
    /// Explicit 1-based atom indices.
    Indices(Vec<usize>),
    /// Every atom of the given element; bulk atoms are filtered out afterwards.
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DissociationConfig {
    /// Number of ligands removed together with one core atom.
    pub ligand_count: usize,
    /// Number of core/ligand combinations per core atom for the closest-ligand strategy.
    pub lig_pairs: usize,
    pub core: CoreSelection,
    /// Substructure query to dissociate whole core fragments instead of single atoms.
    pub core_query: Option<String>,
    /// Core-core neighbour distance; estimated from the structure when `None`.
    pub max_core_dist: Option<f64>,
    /// Switches pairing to the exhaustive distance-threshold strategy when set.
    pub max_lig_dist: Option<f64>,
    /// Maximum centroid-vector length of a bulk core atom.
    pub max_vec_len: f64,
    pub topology: TopologyMap,
}

impl DissociationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        raw.into_config()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: "<string>".to_string(),
            source: e,
        })?;
        raw.into_config()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ligand_count == 0 {
            return Err(invalid("ligand_count", "must be at least 1"));
        }
        if self.lig_pairs == 0 {
            return Err(invalid("lig_pairs", "must be at least 1"));
        }
        if let CoreSelection::Indices(indices) = &self.core {
            if indices.is_empty() {
                return Err(invalid("core_idx", "at least one core index is required"));
            }
        }
        check_distance("max_core_dist", self.max_core_dist)?;
        check_distance("max_lig_dist", self.max_lig_dist)?;
        if !self.max_vec_len.is_finite() || self.max_vec_len < 0.0 {
            return Err(invalid(
                "max_vec_len",
                format!("expected a finite, non-negative length, got {}", self.max_vec_len),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        reason: reason.into(),
    }
}

fn check_distance(name: &'static str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(d) if !d.is_finite() || d <= 0.0 => Err(invalid(
            name,
            format!("expected a finite, positive distance, got {d}"),
        )),
        _ => Ok(()),
    }
}

#[derive(Default)]
pub struct DissociationConfigBuilder {
    ligand_count: Option<usize>,
    lig_pairs: Option<usize>,
    core: Option<CoreSelection>,
    core_query: Option<String>,
    max_core_dist: Option<f64>,
    max_lig_dist: Option<f64>,
    max_vec_len: Option<f64>,
    topology: Option<TopologyMap>,
}

impl DissociationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ligand_count(mut self, count: usize) -> Self {
        self.ligand_count = Some(count);
        self
    }
    pub fn lig_pairs(mut self, pairs: usize) -> Self {
        self.lig_pairs = Some(pairs);
        self
    }
    pub fn core_indices(mut self, indices: Vec<usize>) -> Self {
        self.core = Some(CoreSelection::Indices(indices));
        self
    }
    pub fn core_element(mut self, element: Element) -> Self {
        self.core = Some(CoreSelection::Element(element));
        self
    }
    pub fn core_query(mut self, query: impl Into<String>) -> Self {
        self.core_query = Some(query.into());
        self
    }
    pub fn max_core_dist(mut self, dist: f64) -> Self {
        self.max_core_dist = Some(dist);
        self
    }
    pub fn max_lig_dist(mut self, dist: f64) -> Self {
        self.max_lig_dist = Some(dist);
        self
    }
    pub fn max_vec_len(mut self, len: f64) -> Self {
        self.max_vec_len = Some(len);
        self
    }
    pub fn topology(mut self, topology: TopologyMap) -> Self {
        self.topology = Some(topology);
        self
    }

    pub fn build(self) -> Result<DissociationConfig, ConfigError> {
        let config = DissociationConfig {
            ligand_count: self
                .ligand_count
                .ok_or(ConfigError::MissingParameter("ligand_count"))?,
            lig_pairs: self.lig_pairs.unwrap_or(DEFAULT_LIG_PAIRS),
            core: self.core.ok_or(ConfigError::MissingParameter("core"))?,
            core_query: self.core_query,
            max_core_dist: self.max_core_dist,
            max_lig_dist: self.max_lig_dist,
            max_vec_len: self.max_vec_len.unwrap_or(DEFAULT_MAX_VEC_LEN),
            topology: self.topology.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ElementSpec {
    Number(u8),
    Symbol(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    ligand_count: Option<usize>,
    lig_pairs: Option<usize>,
    core_idx: Option<Vec<usize>>,
    core_atom: Option<ElementSpec>,
    core_smiles: Option<String>,
    max_core_dist: Option<f64>,
    max_lig_dist: Option<f64>,
    max_vec_len: Option<f64>,
    topology: Option<TopologyMap>,
}

impl RawConfig {
    fn into_config(self) -> Result<DissociationConfig, ConfigError> {
        let mut builder = DissociationConfigBuilder::new();
        if let Some(count) = self.ligand_count {
            builder = builder.ligand_count(count);
        }
        if let Some(pairs) = self.lig_pairs {
            builder = builder.lig_pairs(pairs);
        }

        builder = match (self.core_idx, self.core_atom) {
            (Some(_), Some(_)) => {
                return Err(invalid(
                    "core_atom",
                    "'core_idx' and 'core_atom' are mutually exclusive",
                ));
            }
            (Some(indices), None) => builder.core_indices(indices),
            (None, Some(spec)) => builder.core_element(parse_element(spec)?),
            (None, None) => builder,
        };

        if let Some(query) = self.core_smiles {
            builder = builder.core_query(query);
        }
        if let Some(dist) = self.max_core_dist {
            builder = builder.max_core_dist(dist);
        }
        if let Some(dist) = self.max_lig_dist {
            builder = builder.max_lig_dist(dist);
        }
        if let Some(len) = self.max_vec_len {
            builder = builder.max_vec_len(len);
        }
        if let Some(topology) = self.topology {
            builder = builder.topology(topology);
        }
        builder.build()
    }
}

fn parse_element(spec: ElementSpec) -> Result<Element, ConfigError> {
    let parsed = match spec {
        ElementSpec::Number(n) => Element::from_atomic_number(n),
        ElementSpec::Symbol(s) => s.parse(),
    };
    parsed.map_err(|e| invalid("core_atom", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn builder_applies_defaults() {
        let config = DissociationConfigBuilder::new()
            .ligand_count(2)
            .core_element(Element::Cd)
            .build()
            .unwrap();

        assert_eq!(config.lig_pairs, DEFAULT_LIG_PAIRS);
        assert_eq!(config.max_vec_len, DEFAULT_MAX_VEC_LEN);
        assert!(config.max_core_dist.is_none());
        assert!(config.max_lig_dist.is_none());
        assert!(config.topology.is_empty());
        assert_eq!(config.core, CoreSelection::Element(Element::Cd));
    }

    #[test]
    fn builder_reports_missing_parameters() {
        let result = DissociationConfigBuilder::new()
            .core_indices(vec![1, 2])
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingParameter("ligand_count"))
        ));

        let result = DissociationConfigBuilder::new().ligand_count(1).build();
        assert!(matches!(result, Err(ConfigError::MissingParameter("core"))));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let base = || {
            DissociationConfigBuilder::new()
                .ligand_count(2)
                .core_indices(vec![1])
        };

        assert!(matches!(
            base().lig_pairs(0).build(),
            Err(ConfigError::InvalidValue { name: "lig_pairs", .. })
        ));
        assert!(matches!(
            base().max_core_dist(-1.0).build(),
            Err(ConfigError::InvalidValue { name: "max_core_dist", .. })
        ));
        assert!(matches!(
            base().max_lig_dist(f64::NAN).build(),
            Err(ConfigError::InvalidValue { name: "max_lig_dist", .. })
        ));
        assert!(matches!(
            DissociationConfigBuilder::new()
                .ligand_count(0)
                .core_indices(vec![1])
                .build(),
            Err(ConfigError::InvalidValue { name: "ligand_count", .. })
        ));
        assert!(matches!(
            DissociationConfigBuilder::new()
                .ligand_count(1)
                .core_indices(vec![])
                .build(),
            Err(ConfigError::InvalidValue { name: "core_idx", .. })
        ));
    }

    #[test]
    fn parses_full_toml_document() {
        let toml = r#"
            ligand_count = 2
            lig_pairs = 3
            core_atom = "Cd"
            core_smiles = "[Cd]"
            max_core_dist = 4.5
            max_vec_len = 0.25

            [topology]
            "3" = "vertice"
            "4" = "edge"
        "#;
        let config = DissociationConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.ligand_count, 2);
        assert_eq!(config.lig_pairs, 3);
        assert_eq!(config.core, CoreSelection::Element(Element::Cd));
        assert_eq!(config.core_query.as_deref(), Some("[Cd]"));
        assert_eq!(config.max_core_dist, Some(4.5));
        assert_eq!(config.max_vec_len, 0.25);
        assert_eq!(config.topology.label(3), "vertice");
        assert_eq!(config.topology.label(5), "5_neighbours");
    }

    #[test]
    fn accepts_atomic_number_and_explicit_indices() {
        let config = DissociationConfig::from_toml_str("ligand_count = 1\ncore_atom = 48").unwrap();
        assert_eq!(config.core, CoreSelection::Element(Element::Cd));

        let config =
            DissociationConfig::from_toml_str("ligand_count = 1\ncore_idx = [3, 1]").unwrap();
        assert_eq!(config.core, CoreSelection::Indices(vec![3, 1]));
    }

    #[test]
    fn rejects_conflicting_or_unknown_keys() {
        let result =
            DissociationConfig::from_toml_str("ligand_count = 1\ncore_idx = [1]\ncore_atom = \"Cd\"");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "core_atom", .. })
        ));

        let result = DissociationConfig::from_toml_str("ligand_count = 1\ncore_idx = [1]\nfoo = 1");
        assert!(matches!(result, Err(ConfigError::Toml { .. })));

        let result = DissociationConfig::from_toml_str("ligand_count = 1\ncore_atom = \"Qq\"");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "core_atom", .. })
        ));
    }

    #[test]
    fn load_reads_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ligand_count = 2\ncore_idx = [1, 2, 3]\nmax_lig_dist = 5.0").unwrap();

        let config = DissociationConfig::load(file.path()).unwrap();
        assert_eq!(config.max_lig_dist, Some(5.0));
        assert_eq!(config.core, CoreSelection::Indices(vec![1, 2, 3]));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = DissociationConfig::load(Path::new("/nonexistent/bde.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
