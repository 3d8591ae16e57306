use enigma_models::{DocumentHit, GraphHit};

pub const INSTRUCTION: &str = "You are an assistant that answers location/travel questions. \
Use the provided documents and graph facts to answer and include citations.";

/// Render the grounded prompt. Documents and graph facts appear in the order
/// given, each tagged with its id so the model can cite it. Empty inputs
/// produce empty sections, never an error.
pub fn compose(query: &str, docs: &[DocumentHit], graph: &[GraphHit]) -> String {
    let context_docs = docs
        .iter()
        .map(|d| format!("[doc:{}] {}", d.id, d.preferred_text()))
        .collect::<Vec<_>>()
        .join("\n");

    let context_graph = graph
        .iter()
        .map(|g| format!("[graph:{}] {} - {}", g.id, g.name, g.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{INSTRUCTION}\n\nDocuments:\n{context_docs}\n\nGraph facts:\n{context_graph}\n\nQuestion: {query}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, metadata: serde_json::Value) -> DocumentHit {
        DocumentHit::new(id, 0.5, metadata.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn empty_inputs_render_empty_sections() {
        let prompt = compose("Where should I eat in Lisbon?", &[], &[]);

        assert!(prompt.contains("Documents:\n\n\nGraph facts:\n\n\nQuestion:"));
        assert!(prompt.contains("Where should I eat in Lisbon?"));
    }

    #[test]
    fn includes_labels_question_and_preferred_snippet() {
        let docs = vec![doc("doc1", json!({"text_snippet": "foo snippet", "source": "wiki"}))];
        let graph = vec![GraphHit::new("g1", "Place", "A nice place")];

        let prompt = compose("Tell me about Place", &docs, &graph);

        assert!(prompt.contains("Documents:"));
        assert!(prompt.contains("Graph facts:"));
        assert!(prompt.contains("Tell me about Place"));
        assert!(prompt.contains("foo snippet"));
        assert!(!prompt.contains("wiki"));
        assert!(prompt.contains("[doc:doc1] foo snippet"));
        assert!(prompt.contains("[graph:g1] Place - A nice place"));
    }

    #[test]
    fn exact_layout() {
        let docs = vec![
            doc("d2", json!({"source": "guidebook"})),
            doc("d1", json!({})),
        ];
        let graph = vec![
            GraphHit::new("g9", "Alfama", "Old quarter"),
            GraphHit::new("g3", "Belém", "Riverside district"),
        ];

        let expected = format!(
            "{INSTRUCTION}\n\n\
             Documents:\n[doc:d2] guidebook\n[doc:d1] \n\n\
             Graph facts:\n[graph:g9] Alfama - Old quarter\n[graph:g3] Belém - Riverside district\n\n\
             Question: Lisbon?\n"
        );
        assert_eq!(compose("Lisbon?", &docs, &graph), expected);
    }

    #[test]
    fn is_deterministic() {
        let docs = vec![doc("d1", json!({"text_snippet": "x", "rank": 1, "tags": ["a", "b"]}))];
        let graph = vec![GraphHit::new("g1", "Kyoto", "Former capital")];

        assert_eq!(compose("q", &docs, &graph), compose("q", &docs, &graph));
    }
}
