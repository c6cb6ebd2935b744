//! Recipe catalog loading.
//!
//! The catalog is a JSON array of element records, each naming the element and
//! listing its alternative ingredient pairs:
//!
//! ```json
//! [
//!   { "name": "Mud", "recipe": [["Water", "Earth"]] },
//!   { "name": "Water", "recipe": [] }
//! ]
//! ```
//!
//! Pairs are kept exactly as they appear in the document. Arity is checked
//! later, when the graph is built, so a catalog with a malformed pair still
//! loads.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// A single element record from the recipe catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Element name, case-sensitive.
    pub name: String,
    /// Alternative ingredient pairs. Missing or `null` means no recipes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recipe: Vec<Vec<String>>,
}

impl CatalogRecord {
    /// Record for a terminal element.
    pub fn terminal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recipe: Vec::new(),
        }
    }

    /// Record with the given ingredient pairs.
    pub fn with_recipes<I, A, B>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            name: name.into(),
            recipe: pairs
                .into_iter()
                .map(|(a, b)| vec![a.into(), b.into()])
                .collect(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Vec<String>>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse catalog records from a JSON document.
pub fn parse_catalog(json: &str) -> Result<Vec<CatalogRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Load catalog records from a JSON file on disk.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogRecord>> {
    if !path.exists() {
        return Err(Error::CatalogNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let records: Vec<CatalogRecord> =
        serde_json::from_str(&contents).map_err(|source| Error::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        path = %path.display(),
        records = records.len(),
        "loaded recipe catalog"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_recipe_field_defaults_to_empty() {
        let records = parse_catalog(r#"[{"name":"Water"}]"#).unwrap();
        assert_eq!(records, vec![CatalogRecord::terminal("Water")]);
    }

    #[test]
    fn null_recipe_field_is_empty() {
        let records = parse_catalog(r#"[{"name":"Fire","recipe":null}]"#).unwrap();
        assert!(records[0].recipe.is_empty());
    }

    #[test]
    fn malformed_pairs_survive_parsing() {
        let records =
            parse_catalog(r#"[{"name":"Mud","recipe":[["Water"],["Water","Earth"]]}]"#).unwrap();
        assert_eq!(records[0].recipe.len(), 2);
        assert_eq!(records[0].recipe[0], vec!["Water".to_string()]);
    }

    #[test]
    fn invalid_document_is_an_error() {
        let err = parse_catalog(r#"{"name":"Mud"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn with_recipes_builds_pairs() {
        let record = CatalogRecord::with_recipes("Steam", [("Water", "Fire"), ("Water", "Air")]);
        assert_eq!(record.recipe.len(), 2);
        assert_eq!(record.recipe[1], vec!["Water".to_string(), "Air".to_string()]);
    }
}
