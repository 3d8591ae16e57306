use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

pub type Metadata = Map<String, Value>;

/// A scored match from the vector index. Built once at the retrieval
/// boundary and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHit {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Metadata,
}

impl DocumentHit {
    pub fn new(id: impl Into<String>, score: f32, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            score,
            metadata,
        }
    }

    /// `text_snippet`, else `source`, else the empty string.
    pub fn preferred_text(&self) -> Cow<'_, str> {
        ["text_snippet", "source"]
            .iter()
            .find_map(|key| match self.metadata.get(*key) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(Cow::Borrowed(s.as_str())),
                Some(other) => Some(Cow::Owned(other.to_string())),
            })
            .unwrap_or(Cow::Borrowed(""))
    }
}

/// A location node matched by keyword search in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphHit {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl GraphHit {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One row of the locations file, as written to the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
}

/// A directed edge between two location ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEdge {
    pub from: String,
    pub to: String,
    pub rel_type: String,
}

/// One row of the documents file, prior to embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(metadata: Value) -> DocumentHit {
        let metadata = match metadata {
            Value::Object(map) => map,
            _ => Metadata::new(),
        };
        DocumentHit::new("doc1", 0.9, metadata)
    }

    #[test]
    fn preferred_text_prefers_snippet_over_source() {
        let doc = hit(json!({"text_snippet": "foo snippet", "source": "wiki"}));
        assert_eq!(doc.preferred_text(), "foo snippet");
    }

    #[test]
    fn preferred_text_falls_back_to_source_then_empty() {
        assert_eq!(hit(json!({"source": "wiki"})).preferred_text(), "wiki");
        assert_eq!(hit(json!({"text_snippet": null, "source": "wiki"})).preferred_text(), "wiki");
        assert_eq!(hit(json!({"other": 1})).preferred_text(), "");
    }

    #[test]
    fn non_string_metadata_is_rendered_as_json() {
        assert_eq!(hit(json!({"text_snippet": 42})).preferred_text(), "42");
    }
}
