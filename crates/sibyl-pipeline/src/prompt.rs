//! Prompt assembler
//!
//! Renders one retrieval bundle into the fixed prompt layout:
//! instructions, schema, business rules, worked examples, then the
//! question. When the rendered prompt exceeds the character budget,
//! whole context items are dropped lowest-score-first across all three
//! sections; the question and instructions are never dropped and no item
//! is ever cut mid-text.

use sibyl_core::ContextBundle;
use tracing::debug;

const INSTRUCTIONS: &str = "You are a SQL generator. Answer with exactly one SQL statement \
for the user's question. No explanations, no markdown, no prose.";

/// Render the final prompt, honoring the character budget
pub fn assemble_prompt(bundle: &ContextBundle, question: &str, max_chars: usize) -> String {
    let mut bundle = bundle.clone();
    let mut rendered = render(&bundle, question);

    while rendered.chars().count() > max_chars {
        if !drop_lowest_scored(&mut bundle) {
            break;
        }
        rendered = render(&bundle, question);
    }

    debug!(
        chars = rendered.chars().count(),
        context_items = bundle.len(),
        "Assembled prompt"
    );
    rendered
}

fn render(bundle: &ContextBundle, question: &str) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\n\n");

    if !bundle.ddl.is_empty() {
        prompt.push_str("=== Schema ===\n");
        for item in &bundle.ddl {
            prompt.push_str(&item.record.content);
            prompt.push_str("\n\n");
        }
    }

    if !bundle.docs.is_empty() {
        prompt.push_str("=== Business rules ===\n");
        for item in &bundle.docs {
            prompt.push_str(&item.record.content);
            prompt.push_str("\n\n");
        }
    }

    if !bundle.examples.is_empty() {
        prompt.push_str("=== Examples ===\n");
        for example in &bundle.examples {
            prompt.push_str("Q: ");
            prompt.push_str(&example.question);
            prompt.push_str("\nSQL: ");
            prompt.push_str(&example.sql);
            prompt.push_str("\n\n");
        }
    }

    prompt.push_str("Question: ");
    prompt.push_str(question);
    prompt
}

/// Remove the globally lowest-scored item from the bundle; false when
/// nothing is left to drop
fn drop_lowest_scored(bundle: &mut ContextBundle) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Section {
        Ddl,
        Docs,
        Examples,
    }

    let mut lowest: Option<(Section, usize, f32)> = None;
    let mut consider = |section: Section, index: usize, score: f32| {
        let beats = match lowest {
            Some((_, _, best)) => score < best,
            None => true,
        };
        if beats {
            lowest = Some((section, index, score));
        }
    };

    for (i, item) in bundle.ddl.iter().enumerate() {
        consider(Section::Ddl, i, item.score);
    }
    for (i, item) in bundle.docs.iter().enumerate() {
        consider(Section::Docs, i, item.score);
    }
    for (i, item) in bundle.examples.iter().enumerate() {
        consider(Section::Examples, i, item.score);
    }

    match lowest {
        Some((Section::Ddl, i, _)) => {
            bundle.ddl.remove(i);
            true
        }
        Some((Section::Docs, i, _)) => {
            bundle.docs.remove(i);
            true
        }
        Some((Section::Examples, i, _)) => {
            bundle.examples.remove(i);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sibyl_core::{CollectionKind, ContextRecord, ScoredExample, ScoredRecord};

    fn record(collection: CollectionKind, content: &str) -> ContextRecord {
        ContextRecord {
            id: format!("id-{content}"),
            collection,
            content: content.to_string(),
            metadata: None,
            embedding_model: "test".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    fn scored(collection: CollectionKind, content: &str, score: f32) -> ScoredRecord {
        ScoredRecord {
            record: record(collection, content),
            score,
        }
    }

    fn bundle() -> ContextBundle {
        ContextBundle {
            ddl: vec![scored(
                CollectionKind::Ddl,
                "CREATE TABLE orders (id INTEGER)",
                0.9,
            )],
            docs: vec![scored(
                CollectionKind::Documentation,
                "Orders are either completed or pending.",
                0.5,
            )],
            examples: vec![ScoredExample {
                question: "how many orders".to_string(),
                sql: "SELECT COUNT(*) FROM orders".to_string(),
                score: 0.8,
            }],
        }
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let prompt = assemble_prompt(&bundle(), "count orders", 24_000);
        let schema = prompt.find("=== Schema ===").unwrap();
        let rules = prompt.find("=== Business rules ===").unwrap();
        let examples = prompt.find("=== Examples ===").unwrap();
        let question = prompt.find("Question: count orders").unwrap();
        assert!(schema < rules && rules < examples && examples < question);
        assert!(prompt.contains("CREATE TABLE orders (id INTEGER)"));
        assert!(prompt.contains("Q: how many orders\nSQL: SELECT COUNT(*) FROM orders"));
    }

    #[test]
    fn empty_bundle_keeps_instructions_and_question() {
        let prompt = assemble_prompt(&ContextBundle::default(), "count orders", 24_000);
        assert!(prompt.starts_with(INSTRUCTIONS));
        assert!(prompt.ends_with("Question: count orders"));
        assert!(!prompt.contains("=== Schema ==="));
        assert!(!prompt.contains("=== Examples ==="));
    }

    #[test]
    fn over_budget_drops_lowest_scored_first() {
        let full = assemble_prompt(&bundle(), "count orders", 24_000);
        // Tight enough to force exactly one drop: the 0.5 documentation item
        let squeezed = assemble_prompt(&bundle(), "count orders", full.chars().count() - 1);
        assert!(!squeezed.contains("Orders are either completed or pending."));
        assert!(squeezed.contains("CREATE TABLE orders (id INTEGER)"));
        assert!(squeezed.contains("SELECT COUNT(*) FROM orders"));
    }

    #[test]
    fn question_survives_impossible_budget() {
        let prompt = assemble_prompt(&bundle(), "count orders", 1);
        assert!(prompt.contains("Question: count orders"));
        assert!(!prompt.contains("=== Schema ==="));
    }
}
