//! MarkerLoader - Load raw markers from JSON/YAML files

use serde::Deserialize;
use serde_json::Value;
use shared::{CatalogError, FieldValue, RawMarker, Result};
use std::path::{Path, PathBuf};

/// Accepted document layouts; markers are decoded one by one afterwards
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MarkerDocument {
    List(Vec<Value>),
    Wrapped { markers: Vec<Value> },
}

impl MarkerDocument {
    fn into_items(self) -> Vec<Value> {
        match self {
            MarkerDocument::List(items) | MarkerDocument::Wrapped { markers: items } => items,
        }
    }
}

/// Decode one marker, naming the marker and the offending field on failure
fn decode_marker(index: usize, item: &Value) -> std::result::Result<RawMarker, String> {
    RawMarker::deserialize(item).map_err(|e| {
        let element_ref = item
            .get("elementRef")
            .and_then(Value::as_str)
            .unwrap_or("?");

        let bad_field = item
            .get("fields")
            .and_then(Value::as_object)
            .and_then(|fields| {
                fields.iter().find_map(|(name, value)| {
                    FieldValue::deserialize(value)
                        .err()
                        .map(|e| format!("field '{}': {}", name, e))
                })
            });

        format!(
            "marker #{} <{}>: {}",
            index,
            element_ref,
            bad_field.unwrap_or_else(|| e.to_string())
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Option<Format> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "json" => Some(Format::Json),
        "yaml" | "yml" => Some(Format::Yaml),
        _ => None,
    }
}

fn load_error(path: &Path, err: impl std::fmt::Display) -> CatalogError {
    CatalogError::Load(format!("{}: {}", path.display(), err))
}

/// Marker loader
#[derive(Debug, Default)]
pub struct MarkerLoader {
    markers: Vec<RawMarker>,
}

impl MarkerLoader {
    /// Create a new MarkerLoader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a file, a directory or a glob pattern
    pub fn load_input(&mut self, input: &str) -> Result<usize> {
        let path = Path::new(input);
        if path.is_dir() {
            self.load_directory(path)
        } else if path.is_file() {
            self.load_file(path)
        } else {
            self.load_glob(input)
        }
    }

    /// Load markers from one JSON or YAML file
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let format = format_of(path).ok_or_else(|| {
            CatalogError::Load(format!(
                "{}: unsupported file type (expected .json, .yaml or .yml)",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| load_error(path, e))?;

        let document: MarkerDocument = match format {
            Format::Json => serde_json::from_str(&content).map_err(|e| load_error(path, e))?,
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| load_error(path, e))?,
        };

        let markers = document
            .into_items()
            .iter()
            .enumerate()
            .map(|(index, item)| decode_marker(index, item))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| load_error(path, e))?;
        let count = markers.len();
        self.markers.extend(markers);
        Ok(count)
    }

    /// Load every marker file directly inside `dir`, in file-name order
    pub fn load_directory(&mut self, dir: &Path) -> Result<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && format_of(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();

        self.load_all(&files)
    }

    /// Load every file matching a glob pattern, in path order
    pub fn load_glob(&mut self, pattern: &str) -> Result<usize> {
        let paths = glob::glob(pattern)
            .map_err(|e| CatalogError::Load(format!("invalid pattern '{}': {}", pattern, e)))?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| CatalogError::Load(e.to_string()))?;
            if path.is_file() {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(CatalogError::Load(format!("no marker files match '{}'", pattern)));
        }
        files.sort();

        self.load_all(&files)
    }

    fn load_all(&mut self, files: &[PathBuf]) -> Result<usize> {
        let mut total = 0;
        for file in files {
            total += self.load_file(file)?;
        }
        Ok(total)
    }

    /// Get loaded markers
    pub fn markers(&self) -> &[RawMarker] {
        &self.markers
    }

    /// Take the loaded markers
    pub fn into_markers(self) -> Vec<RawMarker> {
        self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_LIST: &str = r#"[
        {"elementRef": "shop.order", "kind": "DddModule", "fields": {"name": "Ordering"}},
        {"elementRef": "shop.order.Order", "kind": "aggregateRoot", "fields": {"memberNames": ["OrderLine"]}}
    ]"#;

    const YAML_WRAPPED: &str = r#"
markers:
  - elementRef: shop.order.OrderLine
    kind: Entity
    fields:
      name: OrderLine
      aggregate: Order
      attributes:
        - key: table
          val: order_lines
"#;

    #[test]
    fn test_load_json_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.json");
        std::fs::write(&path, JSON_LIST).unwrap();

        let mut loader = MarkerLoader::new();
        assert_eq!(loader.load_file(&path).unwrap(), 2);
        assert_eq!(loader.markers()[1].element_ref, "shop.order.Order");
    }

    #[test]
    fn test_load_yaml_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.yaml");
        std::fs::write(&path, YAML_WRAPPED).unwrap();

        let mut loader = MarkerLoader::new();
        assert_eq!(loader.load_file(&path).unwrap(), 1);

        let marker = &loader.markers()[0];
        assert_eq!(marker.kind, "Entity");
        assert_eq!(marker.field("aggregate"), Some(&FieldValue::from("Order")));
        assert!(matches!(marker.field("attributes"), Some(FieldValue::Pairs(p)) if p.len() == 1));
    }

    #[test]
    fn test_load_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.yml"), YAML_WRAPPED).unwrap();
        std::fs::write(dir.path().join("a.json"), JSON_LIST).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut loader = MarkerLoader::new();
        assert_eq!(loader.load_directory(dir.path()).unwrap(), 3);

        let refs: Vec<&str> = loader.markers().iter().map(|m| m.element_ref.as_str()).collect();
        assert_eq!(refs, vec!["shop.order", "shop.order.Order", "shop.order.OrderLine"]);
    }

    #[test]
    fn test_load_missing_directory_is_empty() {
        let mut loader = MarkerLoader::new();
        let count = loader
            .load_directory(Path::new("/nonexistent/markers"))
            .unwrap();
        assert_eq!(count, 0);
        assert!(loader.into_markers().is_empty());
    }

    #[test]
    fn test_load_glob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.json"), JSON_LIST).unwrap();
        std::fs::write(dir.path().join("two.json"), JSON_LIST).unwrap();

        let pattern = format!("{}/*.json", dir.path().display());
        let mut loader = MarkerLoader::new();
        assert_eq!(loader.load_input(&pattern).unwrap(), 4);
    }

    #[test]
    fn test_load_glob_without_matches_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        let mut loader = MarkerLoader::new();
        assert!(loader.load_glob(&pattern).is_err());
    }

    #[test]
    fn test_yaml_numeric_scalars_read_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.yaml");
        std::fs::write(
            &path,
            "- elementRef: shop.Order\n  kind: aggregateRoot\n  fields:\n    id: 42\n    name: Order\n    members: [OrderLine, 7]\n",
        )
        .unwrap();

        let mut loader = MarkerLoader::new();
        assert_eq!(loader.load_file(&path).unwrap(), 1);

        let marker = &loader.markers()[0];
        assert_eq!(marker.field("id"), Some(&FieldValue::from("42")));
        assert_eq!(marker.field("members"), Some(&FieldValue::from(vec!["OrderLine", "7"])));
    }

    #[test]
    fn test_bad_field_error_names_marker_and_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(
            &path,
            "markers:\n  - elementRef: shop.Order\n    kind: aggregateRoot\n    fields:\n      name: {nested: true}\n",
        )
        .unwrap();

        let err = MarkerLoader::new().load_file(&path).unwrap_err().to_string();
        assert!(err.contains("bad.yaml"));
        assert!(err.contains("marker #0 <shop.Order>"));
        assert!(err.contains("field 'name'"));
    }

    #[test]
    fn test_missing_kind_error_names_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nokind.json");
        std::fs::write(&path, r#"[{"elementRef": "shop.Order"}]"#).unwrap();

        let err = MarkerLoader::new().load_file(&path).unwrap_err().to_string();
        assert!(err.contains("marker #0 <shop.Order>"));
        assert!(err.contains("kind"));
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.toml");
        std::fs::write(&path, "").unwrap();

        let err = MarkerLoader::new().load_file(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = MarkerLoader::new().load_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
