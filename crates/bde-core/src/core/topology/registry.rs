use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Maps neighbouring core-atom counts to user-defined topology descriptors
/// (e.g., `3 => "vertice"`, `4 => "edge"`, `6 => "face"`).
///
/// Counts without an entry are described generically as `"<count>_neighbours"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, String>")]
pub struct TopologyMap {
    labels: HashMap<usize, String>,
}

impl TopologyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a topology table from a TOML file whose keys are neighbour counts.
    ///
    /// ```toml
    /// "3" = "vertice"
    /// "4" = "edge"
    /// "6" = "face"
    /// ```
    pub fn load(path: &Path) -> Result<Self, TopologyLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TopologyLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| TopologyLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn insert(&mut self, count: usize, label: impl Into<String>) -> Option<String> {
        self.labels.insert(count, label.into())
    }

    pub fn get(&self, count: usize) -> Option<&str> {
        self.labels.get(&count).map(String::as_str)
    }

    /// Returns the descriptor for `count`, falling back to `"<count>_neighbours"`.
    pub fn label(&self, count: usize) -> String {
        match self.labels.get(&count) {
            Some(label) => label.clone(),
            None => format!("{count}_neighbours"),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for TopologyMap {
    fn from_iter<T: IntoIterator<Item = (usize, S)>>(iter: T) -> Self {
        Self {
            labels: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl TryFrom<HashMap<String, String>> for TopologyMap {
    type Error = InvalidCountKey;

    fn try_from(raw: HashMap<String, String>) -> Result<Self, Self::Error> {
        let labels = raw
            .into_iter()
            .map(|(key, label)| {
                key.trim()
                    .parse::<usize>()
                    .map(|count| (count, label))
                    .map_err(|_| InvalidCountKey(key))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { labels })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Topology key '{0}' is not a non-negative neighbour count")]
pub struct InvalidCountKey(pub String);

#[derive(Debug, Error)]
pub enum TopologyLoadError {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_counts_fall_back_to_generic_label() {
        let map = TopologyMap::new();
        assert_eq!(map.label(0), "0_neighbours");
        assert_eq!(map.label(5), "5_neighbours");
    }

    #[test]
    fn custom_labels_take_precedence() {
        let map: TopologyMap = [(0, "isolated"), (3, "vertice")].into_iter().collect();
        assert_eq!(map.label(0), "isolated");
        assert_eq!(map.label(3), "vertice");
        assert_eq!(map.label(4), "4_neighbours");
        assert_eq!(map.get(3), Some("vertice"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn load_reads_count_keyed_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\"3\" = \"vertice\"\n\"4\" = \"edge\"\n\"6\" = \"face\"").unwrap();

        let map = TopologyMap::load(file.path()).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.label(4), "edge");
        assert_eq!(map.label(6), "face");
    }

    #[test]
    fn load_rejects_non_numeric_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "vertex = \"vertice\"").unwrap();

        let result = TopologyMap::load(file.path());
        assert!(matches!(result, Err(TopologyLoadError::Toml { .. })));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = TopologyMap::load(Path::new("/nonexistent/topology.toml"));
        match result {
            Err(TopologyLoadError::Io { path, .. }) => {
                assert_eq!(path, "/nonexistent/topology.toml")
            }
            other => panic!("expected I/O error, got {other:?}"),
        }
    }
}
