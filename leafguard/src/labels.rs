//! Class Label Map Module
//!
//! Bidirectional mapping between integer class indices and class name
//! strings, loaded once at startup from the class index JSON file.
//!
//! Two file shapes are seen in the wild, depending on which tool exported
//! the mapping:
//!
//! - `{"0": "Tomato_healthy", "1": ...}` (digit-keyed, index to name)
//! - `{"Tomato_healthy": 0, ...}` (name-keyed, name to index)
//!
//! The loader detects the shape by testing whether the first key is all
//! ASCII digits, then normalizes to index->name. Every index in
//! `[0, num_classes)` must have exactly one name; gaps and duplicates are
//! configuration errors.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::utils::error::{LeafguardError, Result};

/// Normalized index <-> name mapping for the classifier's output classes.
///
/// Immutable after load.
#[derive(Debug, Clone)]
pub struct ClassLabelMap {
    /// Class names ordered by index
    names: Vec<String>,
    /// Reverse lookup from name to index
    indices: HashMap<String, usize>,
}

impl ClassLabelMap {
    /// Load and normalize a label map from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            LeafguardError::Config(format!("class index file {:?}: {}", path, e))
        })?;
        let value: Value = serde_json::from_str(&json)?;
        Self::from_value(&value)
    }

    /// Normalize a parsed JSON object into an index->name map.
    ///
    /// Auto-detects whether the object is digit-keyed (index->name) or
    /// name-keyed (name->index).
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            LeafguardError::Labels("class index file must be a JSON object".to_string())
        })?;

        if object.is_empty() {
            return Err(LeafguardError::Labels(
                "class index file contains no classes".to_string(),
            ));
        }

        let first_key = object.keys().next().map(String::as_str).unwrap_or("");
        let digit_keyed =
            !first_key.is_empty() && first_key.chars().all(|c| c.is_ascii_digit());

        let mut pairs: Vec<(usize, String)> = Vec::with_capacity(object.len());

        if digit_keyed {
            // {"0": "Tomato_healthy"} - parse the keys as indices.
            for (key, name) in object {
                let index: usize = key.parse().map_err(|_| {
                    LeafguardError::Labels(format!("non-numeric class index '{}'", key))
                })?;
                let name = name.as_str().ok_or_else(|| {
                    LeafguardError::Labels(format!(
                        "class name for index {} is not a string",
                        index
                    ))
                })?;
                pairs.push((index, name.to_string()));
            }
        } else {
            // {"Tomato_healthy": 0} - swap keys and values.
            for (name, index) in object {
                let index = index.as_u64().ok_or_else(|| {
                    LeafguardError::Labels(format!(
                        "class index for '{}' is not an integer",
                        name
                    ))
                })? as usize;
                pairs.push((index, name.clone()));
            }
        }

        Self::from_pairs(pairs)
    }

    /// Build the map from (index, name) pairs, enforcing the contiguity
    /// invariant.
    fn from_pairs(pairs: Vec<(usize, String)>) -> Result<Self> {
        let num_classes = pairs.len();
        let mut names: Vec<Option<String>> = vec![None; num_classes];

        for (index, name) in pairs {
            if index >= num_classes {
                return Err(LeafguardError::Labels(format!(
                    "class index {} out of range for {} classes (indices must be contiguous from 0)",
                    index, num_classes
                )));
            }
            if names[index].is_some() {
                return Err(LeafguardError::Labels(format!(
                    "duplicate class index {}",
                    index
                )));
            }
            names[index] = Some(name);
        }

        // Every slot is filled at this point: len == num_classes, no index
        // was out of range and none was assigned twice.
        let names: Vec<String> = names.into_iter().map(|n| n.unwrap_or_default()).collect();

        let indices = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();

        Ok(Self { names, indices })
    }

    /// Get the class name for an index
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Get the index for a class name
    pub fn index(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Number of classes in the map
    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    /// Iterate over class names in index order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_digit_keyed_normalization() {
        let value = json!({"0": "A", "1": "B"});
        let map = ClassLabelMap::from_value(&value).unwrap();

        assert_eq!(map.num_classes(), 2);
        assert_eq!(map.name(0), Some("A"));
        assert_eq!(map.name(1), Some("B"));
    }

    #[test]
    fn test_name_keyed_normalization() {
        let value = json!({"A": 0, "B": 1});
        let map = ClassLabelMap::from_value(&value).unwrap();

        // Same normalized result as the digit-keyed form.
        assert_eq!(map.num_classes(), 2);
        assert_eq!(map.name(0), Some("A"));
        assert_eq!(map.name(1), Some("B"));
        assert_eq!(map.index("B"), Some(1));
    }

    #[test]
    fn test_index_gap_rejected() {
        let value = json!({"0": "A", "2": "C"});
        assert!(ClassLabelMap::from_value(&value).is_err());
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let value = json!({"A": 0, "B": 0});
        assert!(ClassLabelMap::from_value(&value).is_err());
    }

    #[test]
    fn test_empty_map_rejected() {
        let value = json!({});
        assert!(ClassLabelMap::from_value(&value).is_err());
    }

    #[test]
    fn test_unknown_name_returns_none() {
        let value = json!({"0": "A"});
        let map = ClassLabelMap::from_value(&value).unwrap();
        assert_eq!(map.index("missing"), None);
        assert_eq!(map.name(5), None);
    }
}
