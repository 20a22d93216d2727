//! Placeholder substitution and loop expansion
//!
//! Both transformers operate on the raw text of a part:
//!
//! ```text
//! Hello {{NAME}}!                       -> TextSubstitution
//! {{#each items}}- {{NAME}}{{/each}}    -> LoopExpansion
//! ```
//!
//! Replacement values are inserted verbatim. Callers are responsible for
//! producing markup-safe values.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DocxError, Result};
use crate::markers::{self, LoopScanner};
use crate::transform::PartTransformer;

/// Field name to literal value
pub type FieldMap = BTreeMap<String, String>;

/// Replaces `{{KEY}}` markers with literal values
#[derive(Debug, Clone, Default)]
pub struct TextSubstitution {
    replacements: FieldMap,
}

impl TextSubstitution {
    pub fn new(replacements: FieldMap) -> Self {
        Self { replacements }
    }

    /// Build from any iterator of key/value pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build from a JSON object whose values are strings
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            DocxError::InvalidInput("replacement data must be a JSON object".to_string())
        })?;
        let mut replacements = FieldMap::new();
        for (key, value) in object {
            match value.as_str() {
                Some(s) => {
                    replacements.insert(key.clone(), s.to_string());
                }
                None => {
                    return Err(DocxError::InvalidInput(format!(
                        "replacement '{}' must be a string",
                        key
                    )))
                }
            }
        }
        Ok(Self::new(replacements))
    }

    pub fn replacements(&self) -> &FieldMap {
        &self.replacements
    }

    /// Apply to a single text
    pub fn apply(&self, text: &str) -> String {
        markers::substitute(text, &self.replacements)
    }
}

impl PartTransformer for TextSubstitution {
    fn transform(&self, _path: &str, text: &str) -> Result<String> {
        Ok(self.apply(text))
    }
}

/// Expands `{{#each name}}…{{/each}}` regions once per item
///
/// Loops are processed in name order, each against the text produced by the
/// previous one. Only the first region of a given name is expanded.
#[derive(Debug, Clone, Default)]
pub struct LoopExpansion {
    loops: BTreeMap<String, Vec<FieldMap>>,
}

impl LoopExpansion {
    pub fn new(loops: BTreeMap<String, Vec<FieldMap>>) -> Self {
        Self { loops }
    }

    /// Add or replace one loop
    pub fn with_loop(mut self, name: impl Into<String>, items: Vec<FieldMap>) -> Self {
        self.loops.insert(name.into(), items);
        self
    }

    /// Build from a JSON object mapping loop names to arrays of string maps
    ///
    /// Entries whose value is not an array of objects with string values are
    /// skipped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            DocxError::InvalidInput("loop data must be a JSON object".to_string())
        })?;
        let mut loops = BTreeMap::new();
        for (name, value) in object {
            match items_from_json(value) {
                Some(items) => {
                    loops.insert(name.clone(), items);
                }
                None => warn!(loop_name = %name, "skipping loop: value is not a list of string maps"),
            }
        }
        Ok(Self { loops })
    }

    pub fn loops(&self) -> &BTreeMap<String, Vec<FieldMap>> {
        &self.loops
    }

    /// Apply to a single text
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for (name, items) in &self.loops {
            let Some(span) = LoopScanner::new(&current, name).locate() else {
                continue;
            };
            let body = &current[span.body.clone()];
            let rendered: String = items
                .iter()
                .map(|item| markers::substitute(body, item))
                .collect();
            debug!(loop_name = %name, items = items.len(), "expanded loop");
            current = markers::splice(&current, span.outer, &rendered);
        }
        current
    }
}

fn items_from_json(value: &Value) -> Option<Vec<FieldMap>> {
    value
        .as_array()?
        .iter()
        .map(|item| {
            item.as_object()?
                .iter()
                .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect::<Option<FieldMap>>()
        })
        .collect()
}

impl PartTransformer for LoopExpansion {
    fn transform(&self, _path: &str, text: &str) -> Result<String> {
        Ok(self.apply(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_basic_replacement() {
        let sub = TextSubstitution::from_pairs([("NAME", "John Doe"), ("PLACE", "Rustland")]);
        assert_eq!(
            sub.apply("Hello {{NAME}}, welcome to {{PLACE}}."),
            "Hello John Doe, welcome to Rustland."
        );
    }

    #[test]
    fn test_empty_value() {
        let sub = TextSubstitution::from_pairs([("NAME", "")]);
        assert_eq!(sub.apply("Hi {{NAME}}!"), "Hi !");
    }

    #[test]
    fn test_values_are_not_escaped() {
        let sub = TextSubstitution::from_pairs([("X", "<w:br/>")]);
        assert_eq!(sub.apply("a{{X}}b"), "a<w:br/>b");
    }

    #[test]
    fn test_order_independence() {
        let text = "{{A}}{{B}}{{C}}";
        let forward = TextSubstitution::from_pairs([("A", "1"), ("B", "2"), ("C", "3")]);
        let backward = TextSubstitution::from_pairs([("C", "3"), ("B", "2"), ("A", "1")]);
        assert_eq!(forward.apply(text), backward.apply(text));
    }

    #[test]
    fn test_replacements_from_json() {
        let sub = TextSubstitution::from_json(&json!({"NAME": "Alice"})).unwrap();
        assert_eq!(
            sub.apply("Hello {{NAME}}, you are {{NAME}} right?"),
            "Hello Alice, you are Alice right?"
        );
        assert!(TextSubstitution::from_json(&json!({"N": 1})).is_err());
        assert!(TextSubstitution::from_json(&json!(["x"])).is_err());
    }

    #[test]
    fn test_basic_loop() {
        let loops = LoopExpansion::default().with_loop(
            "items",
            vec![
                item(&[("NAME", "Item 1"), ("PRICE", "10")]),
                item(&[("NAME", "Item 2"), ("PRICE", "20")]),
            ],
        );
        assert_eq!(
            loops.apply("Items:\n{{#each items}}- {{NAME}}, ${{PRICE}}\n{{/each}}"),
            "Items:\n- Item 1, $10\n- Item 2, $20\n"
        );
    }

    #[test]
    fn test_loop_from_json() {
        let loops = LoopExpansion::from_json(&json!({
            "items": [{"NAME": "A", "PRICE": "1"}, {"NAME": "B", "PRICE": "2"}]
        }))
        .unwrap();
        assert_eq!(
            loops.apply("{{#each items}}-{{NAME}}:{{PRICE}}\n{{/each}}"),
            "-A:1\n-B:2\n"
        );
    }

    #[test]
    fn test_empty_loop_removes_region() {
        let loops = LoopExpansion::default().with_loop("items", Vec::new());
        assert_eq!(loops.apply("a{{#each items}}x{{/each}}b"), "ab");
    }

    #[test]
    fn test_missing_markers_skip_loop() {
        let loops = LoopExpansion::default().with_loop("items", vec![item(&[("A", "1")])]);
        assert_eq!(loops.apply("{{#each items}} no end"), "{{#each items}} no end");
        assert_eq!(loops.apply("plain"), "plain");
    }

    #[test]
    fn test_only_first_region_expands() {
        let loops = LoopExpansion::default().with_loop("x", vec![item(&[("V", "1")])]);
        assert_eq!(
            loops.apply("{{#each x}}{{V}}{{/each}}|{{#each x}}{{V}}{{/each}}"),
            "1|{{#each x}}{{V}}{{/each}}"
        );
    }

    #[test]
    fn test_two_loops() {
        let loops = LoopExpansion::default()
            .with_loop("a", vec![item(&[("V", "1")]), item(&[("V", "2")])])
            .with_loop("b", vec![item(&[("W", "x")])]);
        assert_eq!(
            loops.apply("{{#each a}}{{V}}{{/each}};{{#each b}}{{W}}{{/each}}"),
            "12;x"
        );
    }

    #[test]
    fn test_unknown_fields_left_in_place() {
        let loops = LoopExpansion::default().with_loop("a", vec![item(&[("V", "1")])]);
        assert_eq!(loops.apply("{{#each a}}{{V}}{{W}}{{/each}}"), "1{{W}}");
    }

    #[test]
    fn test_malformed_loop_values_skipped() {
        let loops = LoopExpansion::from_json(&json!({
            "bad": "not a list",
            "nested": [{"A": 1}],
            "good": [{"A": "ok"}]
        }))
        .unwrap();
        assert_eq!(loops.loops().len(), 1);
        assert!(loops.loops().contains_key("good"));
        assert_eq!(
            loops.apply("{{#each bad}}{{A}}{{/each}}"),
            "{{#each bad}}{{A}}{{/each}}"
        );
    }
}
