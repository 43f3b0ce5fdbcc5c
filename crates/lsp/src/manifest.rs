// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Project Manifest
//!
//! Minimal view of the project manifest: the models with their target
//! database and schema. The manifest file is produced by the project
//! build tool; only the fields the ref-conversion and diagnostics paths
//! need are read.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while loading the manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// A model entry from the project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestModel {
    pub name: String,
    pub database: String,
    pub schema: String,
}

/// Extract all model nodes from a parsed manifest document.
pub fn parse_models(manifest: &Value) -> Vec<ManifestModel> {
    let Some(nodes) = manifest.get("nodes").and_then(Value::as_object) else {
        return Vec::new();
    };

    nodes
        .values()
        .filter(|node| {
            node.get("resource_type").and_then(Value::as_str) == Some("model")
        })
        .filter_map(|node| {
            Some(ManifestModel {
                name: node.get("name")?.as_str()?.to_string(),
                database: node
                    .get("database")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                schema: node.get("schema")?.as_str()?.to_string(),
            })
        })
        .collect()
}

/// Load and parse a manifest file.
pub fn load_models(path: &Path) -> Result<Vec<ManifestModel>, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    let manifest: Value = serde_json::from_str(&content)?;
    Ok(parse_models(&manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_model_nodes_only() {
        let manifest = json!({
            "nodes": {
                "model.jaffle_shop.stg_orders": {
                    "resource_type": "model",
                    "name": "stg_orders",
                    "database": "analytics",
                    "schema": "jaffle_shop"
                },
                "test.jaffle_shop.not_null_orders_id": {
                    "resource_type": "test",
                    "name": "not_null_orders_id"
                }
            }
        });

        let models = parse_models(&manifest);
        assert_eq!(models.len(), 1);
        assert_eq!(
            models[0],
            ManifestModel {
                name: "stg_orders".to_string(),
                database: "analytics".to_string(),
                schema: "jaffle_shop".to_string(),
            }
        );
    }

    #[test]
    fn missing_nodes_section_yields_no_models() {
        assert!(parse_models(&json!({})).is_empty());
    }
}
