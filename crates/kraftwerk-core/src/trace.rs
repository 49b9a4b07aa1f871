//! Diagnostic record of one interpretation.

use serde::{Deserialize, Serialize};

/// One visited instruction node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    /// Default text of the instruction, e.g. `int[0, 10)`
    pub description: String,
    /// Label attached with `labeled`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    /// Seed signature on entry
    pub seed_value: i64,
    /// `Debug` rendering of the produced value
    pub value: String,
    /// Child nodes in visitation order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<Trace>,
}

impl Trace {
    /// The label, or the description when there is none.
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.description)
    }

    /// First node, depth first, carrying `label`.
    pub fn find(&self, label: &str) -> Option<&Trace> {
        if self.label.as_deref() == Some(label) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(label))
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Trace::node_count).sum::<usize>()
    }
}

/// Indented text rendering of a [`Trace`].
///
/// The root always prints. Below it, only labeled nodes print unless the
/// printer is verbose; unlabeled nodes are skipped and their labeled
/// descendants take their place.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracePrinter {
    verbose: bool,
}

impl TracePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print every node, labeled or not.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }

    pub fn render(&self, trace: &Trace) -> Vec<String> {
        let mut lines = Vec::new();
        self.push_line(&mut lines, trace, 0);
        self.render_children(&mut lines, trace, 1);
        lines
    }

    pub fn render_to_string(&self, trace: &Trace) -> String {
        self.render(trace).join("\n")
    }

    fn render_children(&self, lines: &mut Vec<String>, trace: &Trace, depth: usize) {
        for child in &trace.children {
            if self.verbose || child.label.is_some() {
                self.push_line(lines, child, depth);
                self.render_children(lines, child, depth + 1);
            } else {
                self.render_children(lines, child, depth);
            }
        }
    }

    fn push_line(&self, lines: &mut Vec<String>, trace: &Trace, depth: usize) {
        lines.push(format!(
            "{:indent$}{}: {}",
            "",
            trace.name(),
            trace.value,
            indent = depth * 2
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(description: &str, label: Option<&str>, value: &str, children: Vec<Trace>) -> Trace {
        Trace {
            description: description.to_string(),
            label: label.map(str::to_string),
            seed_value: 0,
            value: value.to_string(),
            children,
        }
    }

    fn sample() -> Trace {
        node(
            "product2",
            None,
            "(1, [true])",
            vec![
                node("int[0, 5)", Some("count"), "1", vec![]),
                node(
                    "fmap",
                    None,
                    "[true]",
                    vec![node("boolean", Some("flag"), "true", vec![])],
                ),
            ],
        )
    }

    #[test]
    fn test_default_rendering_skips_unlabeled() {
        let lines = TracePrinter::new().render(&sample());
        assert_eq!(
            lines,
            vec!["product2: (1, [true])", "  count: 1", "  flag: true"]
        );
    }

    #[test]
    fn test_verbose_rendering() {
        let lines = TracePrinter::verbose().render(&sample());
        assert_eq!(
            lines,
            vec![
                "product2: (1, [true])",
                "  count: 1",
                "  fmap: [true]",
                "    flag: true",
            ]
        );
    }

    #[test]
    fn test_find_and_count() {
        let trace = sample();
        assert_eq!(trace.find("flag").map(|t| t.value.as_str()), Some("true"));
        assert!(trace.find("missing").is_none());
        assert_eq!(trace.node_count(), 4);
    }

    #[test]
    fn test_json_skips_empty_fields() {
        let json = serde_json::to_value(node("int", None, "3", vec![])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"description": "int", "seed_value": 0, "value": "3"})
        );
        let back: Trace = serde_json::from_value(json).unwrap();
        assert_eq!(back.description, "int");
    }
}
