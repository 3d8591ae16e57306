use serde::{Deserialize, Serialize};

/// One text or a batch of texts. A single string behaves exactly like a
/// one-element batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

impl TextInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TextInput::Single(text) => vec![text],
            TextInput::Multiple(texts) => texts,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TextInput::Single(_) => 1,
            TextInput::Multiple(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Single(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Single(text)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Multiple(texts)
    }
}

impl From<&[String]> for TextInput {
    fn from(texts: &[String]) -> Self {
        TextInput::Multiple(texts.to_vec())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAIEmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIEmbeddingResponse {
    pub data: Vec<OpenAIEmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIEmbeddingData {
    pub embedding: Vec<f32>,
    pub index: usize,
}
