//! Plain-text difference report.

use super::{plural, DifferenceReporter, ReportError, ReportFormat};
use crate::diff::{element_path, field_path, index_path, key_path, Difference, Snapshot};
use crate::reconcile::ReconcileReport;
use std::borrow::Cow;
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
}

const INDENT: &str = "  ";

/// Indented listing of a difference tree, one line per disagreement.
///
/// Expected values are shown in green and actual values in red when colors
/// are enabled. Values wider than the configured width are truncated with an
/// ellipsis.
#[derive(Debug, Clone)]
pub struct TextReporter {
    use_colors: bool,
    max_value_width: usize,
}

impl TextReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            use_colors: false,
            max_value_width: 80,
        }
    }

    /// Enable or disable ANSI colors
    #[must_use]
    pub const fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the display width after which values are truncated
    #[must_use]
    pub const fn max_value_width(mut self, width: usize) -> Self {
        self.max_value_width = width;
        self
    }

    const fn col(&self, code: &'static str) -> &'static str {
        if self.use_colors {
            code
        } else {
            ""
        }
    }

    fn value(&self, snapshot: &Snapshot, color: &'static str) -> String {
        format!(
            "{}{}{}",
            self.col(color),
            truncate(snapshot.as_str(), self.max_value_width),
            self.col(colors::RESET)
        )
    }

    fn values(&self, snapshots: &[Snapshot], color: &'static str) -> String {
        snapshots
            .iter()
            .map(|s| self.value(s, color))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn write_header(&self, out: &mut String, text: &str) -> std::fmt::Result {
        writeln!(
            out,
            "{}{text}{}",
            self.col(colors::BOLD),
            self.col(colors::RESET)
        )
    }

    fn write_node(
        &self,
        out: &mut String,
        label: &str,
        node: &Difference,
        depth: usize,
    ) -> std::fmt::Result {
        let pad = INDENT.repeat(depth);
        match node {
            Difference::Leaf {
                expected,
                actual,
                reason,
            } => writeln!(
                out,
                "{pad}{label}: expected {}, actual {} ({reason})",
                self.value(expected, colors::GREEN),
                self.value(actual, colors::RED)
            ),
            Difference::Record {
                kind,
                identity,
                fields,
            } => {
                writeln!(out, "{pad}{label} ({}):", identity.as_deref().unwrap_or(kind))?;
                for (name, child) in fields {
                    self.write_node(out, &field_path("", name), child, depth + 1)?;
                }
                Ok(())
            }
            Difference::Sequence {
                expected_len,
                actual_len,
                elements,
            } => {
                if expected_len == actual_len {
                    writeln!(out, "{pad}{label}:")?;
                } else {
                    writeln!(
                        out,
                        "{pad}{label}: sequence (expected {expected_len} elements, actual {actual_len})"
                    )?;
                }
                for (index, child) in elements {
                    self.write_node(out, &index_path("", *index), child, depth + 1)?;
                }
                Ok(())
            }
            Difference::Unordered {
                expected_len,
                actual_len,
                unmatched_expected,
                unmatched_actual,
                closest,
            } => {
                writeln!(
                    out,
                    "{pad}{label}: unordered collection (expected {expected_len} elements, actual {actual_len})"
                )?;
                if !unmatched_expected.is_empty() {
                    writeln!(
                        out,
                        "{pad}{INDENT}missing: {}",
                        self.values(unmatched_expected, colors::GREEN)
                    )?;
                }
                if !unmatched_actual.is_empty() {
                    writeln!(
                        out,
                        "{pad}{INDENT}unexpected: {}",
                        self.values(unmatched_actual, colors::RED)
                    )?;
                }
                for pair in closest {
                    let label = element_path("", &pair.element);
                    self.write_node(out, &label, &pair.difference, depth + 1)?;
                }
                Ok(())
            }
            Difference::Mapping {
                missing,
                unexpected,
                values,
            } => {
                writeln!(out, "{pad}{label}:")?;
                for (key, value) in missing {
                    writeln!(
                        out,
                        "{pad}{INDENT}{}: missing, expected {}",
                        key_path("", key),
                        self.value(value, colors::GREEN)
                    )?;
                }
                for (key, value) in unexpected {
                    writeln!(
                        out,
                        "{pad}{INDENT}{}: unexpected, actual {}",
                        key_path("", key),
                        self.value(value, colors::RED)
                    )?;
                }
                for (key, child) in values {
                    self.write_node(out, &key_path("", key), child, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DifferenceReporter for TextReporter {
    fn render(&self, difference: &Difference) -> Result<String, ReportError> {
        let mut out = String::new();
        let header = format!("{} found", plural(difference.count(), "difference"));
        self.write_header(&mut out, &header)?;
        self.write_node(&mut out, "$", difference, 0)?;
        Ok(out)
    }

    fn render_reconciliation(&self, report: &ReconcileReport) -> Result<String, ReportError> {
        let mut out = String::new();
        if report.is_success() {
            let header = format!(
                "Reconciliation succeeded ({} checked)",
                plural(report.checked, "record")
            );
            self.write_header(&mut out, &header)?;
            return Ok(out);
        }

        let header = format!(
            "Reconciliation failed: {} ({} checked)",
            plural(report.failure_count(), "failure"),
            plural(report.checked, "record")
        );
        self.write_header(&mut out, &header)?;
        for identity in &report.still_present {
            writeln!(out, "Expected removed, but present: {identity}")?;
        }
        for mismatch in &report.mismatches {
            writeln!(
                out,
                "{}: {} found",
                mismatch.identity,
                plural(mismatch.difference.count(), "difference")
            )?;
            self.write_node(&mut out, "$", &mismatch.difference, 1)?;
        }
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}

/// Cut `text` to `max_width` display columns, marking the cut with an ellipsis.
fn truncate(text: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(text) <= max_width {
        return Cow::Borrowed(text);
    }
    let budget = max_width.saturating_sub(1);
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push('…');
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{ClosestMatch, MismatchReason};
    use crate::reconcile::RecordMismatch;
    use indexmap::IndexMap;
    use std::collections::BTreeMap;

    fn leaf(expected: &str, actual: &str, reason: MismatchReason) -> Difference {
        Difference::leaf(Snapshot::new(expected), Snapshot::new(actual), reason)
    }

    fn sample() -> Difference {
        let mut elements = BTreeMap::new();
        elements.insert(1, leaf("2", "5", MismatchReason::Numeric));
        elements.insert(
            2,
            Difference::leaf(Snapshot::absent(), Snapshot::new("7"), MismatchReason::Unexpected),
        );

        let mut missing = IndexMap::new();
        missing.insert("k".to_string(), Snapshot::new("1"));
        let mut values = IndexMap::new();
        values.insert("j".to_string(), leaf("true", "false", MismatchReason::Value));

        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), leaf("\"p\"", "\"q\"", MismatchReason::Value));
        fields.insert(
            "scores".to_string(),
            Difference::Sequence {
                expected_len: 2,
                actual_len: 3,
                elements,
            },
        );
        fields.insert(
            "tags".to_string(),
            Difference::Unordered {
                expected_len: 2,
                actual_len: 2,
                unmatched_expected: vec![Snapshot::new("\"a\"")],
                unmatched_actual: vec![Snapshot::new("\"b\"")],
                closest: Vec::new(),
            },
        );
        fields.insert(
            "attrs".to_string(),
            Difference::Mapping {
                missing,
                unexpected: IndexMap::new(),
                values,
            },
        );

        Difference::Record {
            kind: "Parent".to_string(),
            identity: Some("Parent#1".to_string()),
            fields,
        }
    }

    #[test]
    fn test_render_nested_tree() {
        let report = TextReporter::new().render(&sample()).unwrap();
        insta::assert_snapshot!(report.trim_end(), @r###"
        7 differences found
        $ (Parent#1):
          .name: expected "p", actual "q" (values differ)
          .scores: sequence (expected 2 elements, actual 3)
            [1]: expected 2, actual 5 (numbers differ beyond tolerance)
            [2]: expected <absent>, actual 7 (unexpected)
          .tags: unordered collection (expected 2 elements, actual 2)
            missing: "a"
            unexpected: "b"
          .attrs:
            ["k"]: missing, expected 1
            ["j"]: expected true, actual false (values differ)
        "###);
    }

    #[test]
    fn test_render_closest_match() {
        let mut fields = IndexMap::new();
        fields.insert("owner".to_string(), leaf("\"ann\"", "\"bob\"", MismatchReason::Value));
        let tree = Difference::Unordered {
            expected_len: 2,
            actual_len: 2,
            unmatched_expected: Vec::new(),
            unmatched_actual: Vec::new(),
            closest: vec![ClosestMatch {
                element: Snapshot::new("Account#1"),
                difference: Difference::Record {
                    kind: "Account".to_string(),
                    identity: Some("Account#1".to_string()),
                    fields,
                },
            }],
        };
        let report = TextReporter::new().render(&tree).unwrap();
        insta::assert_snapshot!(report.trim_end(), @r###"
        1 difference found
        $: unordered collection (expected 2 elements, actual 2)
          {Account#1} (Account#1):
            .owner: expected "ann", actual "bob" (values differ)
        "###);
    }

    #[test]
    fn test_render_is_deterministic() {
        let reporter = TextReporter::new();
        assert_eq!(
            reporter.render(&sample()).unwrap(),
            reporter.render(&sample()).unwrap()
        );
    }

    #[test]
    fn test_single_leaf_header() {
        let report = TextReporter::new()
            .render(&leaf("1", "2", MismatchReason::Value))
            .unwrap();
        assert_eq!(
            report,
            "1 difference found\n$: expected 1, actual 2 (values differ)\n"
        );
    }

    #[test]
    fn test_colors() {
        let report = TextReporter::new()
            .with_colors(true)
            .render(&leaf("1", "2", MismatchReason::Value))
            .unwrap();
        assert!(report.contains("\x1b[32m1\x1b[0m"));
        assert!(report.contains("\x1b[31m2\x1b[0m"));
        assert!(!TextReporter::new()
            .render(&leaf("1", "2", MismatchReason::Value))
            .unwrap()
            .contains('\x1b'));
    }

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijklmnop", 10), "abcdefghi…");
        assert_eq!(truncate("日本語テキスト", 10), "日本語テ…");
    }

    #[test]
    fn test_render_reconciliation() {
        let report = ReconcileReport {
            checked: 1,
            expected_removed: vec!["Account#2".to_string()],
            still_present: vec!["Account#2".to_string()],
            mismatches: vec![RecordMismatch {
                identity: "Account#1".to_string(),
                difference: leaf("10", "15", MismatchReason::Numeric),
            }],
        };
        let text = TextReporter::new().render_reconciliation(&report).unwrap();
        insta::assert_snapshot!(text.trim_end(), @r###"
        Reconciliation failed: 2 failures (1 record checked)
        Expected removed, but present: Account#2
        Account#1: 1 difference found
          $: expected 10, actual 15 (numbers differ beyond tolerance)
        "###);
    }

    #[test]
    fn test_render_successful_reconciliation() {
        let report = ReconcileReport {
            checked: 3,
            ..ReconcileReport::default()
        };
        let text = TextReporter::new().render_reconciliation(&report).unwrap();
        assert_eq!(text, "Reconciliation succeeded (3 records checked)\n");
    }
}
