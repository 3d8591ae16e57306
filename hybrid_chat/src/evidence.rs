use enigma_models::HybridResult;
use serde::Serialize;

/// Display-only retrieval result. A failed fetch yields no items plus the
/// reason, so showing evidence can never block an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl<T> Evidence<T> {
    pub fn found(items: Vec<T>) -> Self {
        Self {
            items,
            diagnostic: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            diagnostic: Some(reason.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn from_result(kind: &'static str, result: HybridResult<Vec<T>>) -> Self {
        match result {
            Ok(items) => Self::found(items),
            Err(e) => {
                tracing::warn!(evidence = kind, error = %e, "Evidence fetch failed; showing none");
                Self::unavailable(e.to_string())
            }
        }
    }
}
