#![deny(missing_docs)]

//! # Contract Documents
//!
//! Parses an OpenAPI v3 contract (YAML or JSON) into the raw JSON tree plus
//! a typed index over the routing levels the resolver walks:
//! `paths` → method → `responses`/`requestBody` → `content` → `schema`.
//!
//! Only those levels are modeled. Everything else the document declares
//! (parameters, servers, descriptions, extensions) is preserved untouched in
//! the raw tree and ignored by the index. Existence at each level is an
//! explicit `Option`-returning query; there is no runtime shape probing.

use crate::error::{ValidatorError, ValidatorResult};
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// HTTP methods recognized as operation keys on a path item.
const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Typed index over the routing levels of an OpenAPI v3 document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    /// Path items keyed by literal path template.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

impl Document {
    /// Looks up a path item by its literal template key.
    ///
    /// Templates match by exact string equality: `/users/{id}` is a key,
    /// `/users/42` is not. No templated-parameter matching is performed; the
    /// caller must already pass the template key.
    pub fn path_item(&self, path: &str) -> Option<&PathItem> {
        self.paths.get(path)
    }
}

/// Operations of one path template, keyed by lower-case HTTP method.
#[derive(Debug, Clone, Default)]
pub struct PathItem {
    /// Operations keyed by method.
    pub operations: IndexMap<String, Operation>,
}

impl PathItem {
    /// Looks up an operation by lower-case method name.
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        self.operations.get(method)
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // A path item mixes operations with parameters, servers, summaries
        // and extensions. Keep only the method keys.
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut operations = IndexMap::new();

        for (key, value) in raw {
            if !HTTP_METHODS.contains(&key.as_str()) {
                continue;
            }
            let operation = serde_json::from_value::<Operation>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse operation '{}': {}", key, e))
            })?;
            operations.insert(key, operation);
        }

        Ok(Self { operations })
    }
}

/// A single operation: its response table and optional request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Responses keyed by exact status-code string.
    #[serde(default)]
    pub responses: IndexMap<String, ResponseObject>,
    /// Request body declaration, if any.
    #[serde(default, rename = "requestBody")]
    pub request_body: Option<RequestBody>,
}

impl Operation {
    /// Looks up a declared response by exact status code.
    ///
    /// `default` and range keys such as `2XX` are not matched.
    pub fn response(&self, status: u16) -> Option<&ResponseObject> {
        self.responses.get(status.to_string().as_str())
    }
}

/// One declared response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseObject {
    /// Media types keyed by content type.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl ResponseObject {
    /// Looks up a declared media type by content type.
    pub fn media_type(&self, content_type: &str) -> Option<&MediaType> {
        self.content.get(content_type)
    }
}

/// The declared request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    /// Media types keyed by content type.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
    /// Looks up a declared media type by content type.
    pub fn media_type(&self, content_type: &str) -> Option<&MediaType> {
        self.content.get(content_type)
    }
}

/// One media type entry; only the schema is of interest here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    /// Inline schema or `$ref` for this media type.
    #[serde(default)]
    pub schema: Option<Value>,
}

/// Parses an OpenAPI contract from YAML or JSON text.
///
/// Returns the raw JSON tree (for conversion and storage) alongside the
/// typed index built from it. YAML mapping keys that are numbers or booleans
/// (unquoted status codes, typically) are stringified so both trees address
/// responses by string key.
pub fn parse_contract(text: &str) -> ValidatorResult<(Value, Document)> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| ValidatorError::DocumentParse {
            reason: e.to_string(),
        })?;
    let raw = yaml_to_json(&yaml).map_err(|reason| ValidatorError::DocumentParse { reason })?;
    let document: Document =
        serde_json::from_value(raw.clone()).map_err(|e| ValidatorError::DocumentParse {
            reason: e.to_string(),
        })?;
    Ok((raw, document))
}

/// Converts a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Contract documents use only the JSON-compatible subset of YAML, except
/// that mapping keys may be scalars other than strings (an unquoted `200:`
/// response key parses as an integer). Those keys are stringified.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported mapping key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
