//! Scenario Builder - normalizes extracted records and assembles the final
//! YAML-serializable document.
//!
//! Queries are re-indented to remove their common leading whitespace, and
//! every expected error's column is rebased by the amount stripped, so the
//! downstream harness sees locations relative to the normalized query.

use serde::Serialize;

use crate::extractor::{ExpectedError, TestCaseRecord};

/// Fixed background reference every generated scenario points at.
pub const SCHEMA_FILE: &str = "validation.schema.graphql";

// ============================================================================
// DOCUMENT MODEL
// ============================================================================

/// The final output document, one per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioDocument {
    pub scenario: String,
    pub background: Background,
    /// Source declaration order, minus skipped cases.
    pub tests: Vec<ScenarioTest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Background {
    #[serde(rename = "schema-file")]
    pub schema_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioTest {
    pub name: String,
    pub given: Given,
    pub when: When,
    pub then: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Given {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct When {
    /// Single-element sequence holding the rule under test.
    pub validate: Vec<String>,
}

/// Either a plain pass expectation or an ordered error sequence led by the
/// synthetic count entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Passes { passes: bool },
    Errors(Vec<ThenEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ThenEntry {
    Count {
        #[serde(rename = "error-count")]
        error_count: usize,
    },
    Error(ExpectedError),
}

// ============================================================================
// INDENTATION NORMALIZATION
// ============================================================================

/// Minimum leading `[ \t]` run across all lines that contain a
/// non-whitespace character; 0 when no such line exists.
pub fn min_indent(text: &str) -> usize {
    text.lines()
        .filter_map(|line| {
            let rest = line.trim_start_matches(|c| c == ' ' || c == '\t');
            if rest.is_empty() {
                None
            } else {
                Some(line.len() - rest.len())
            }
        })
        .min()
        .unwrap_or(0)
}

/// Remove exactly `min_indent` leading whitespace characters from every line
/// that has them. Lines with a shorter whitespace run (blank lines) are left
/// untouched, matching a line-anchored `^[ \t]{n}` replacement.
pub fn strip_indent(text: &str) -> String {
    let indent = min_indent(text);
    if indent == 0 {
        return text.to_string();
    }
    text.split('\n')
        .map(|line| {
            let leading = line.len() - line.trim_start_matches(|c| c == ' ' || c == '\t').len();
            if leading >= indent {
                &line[indent..]
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Assemble the final document from extracted records, in source order.
pub fn build_document(scenario_name: String, records: Vec<TestCaseRecord>) -> ScenarioDocument {
    let tests = records.into_iter().map(normalize_record).collect();

    ScenarioDocument {
        scenario: scenario_name,
        background: Background {
            schema_file: SCHEMA_FILE.to_string(),
        },
        tests,
    }
}

fn normalize_record(record: TestCaseRecord) -> ScenarioTest {
    let indent = min_indent(&record.raw_query) as i64;
    let query = strip_indent(&record.raw_query);

    let then = match record.expected_errors {
        Some(errors) => Outcome::Errors(rebase_errors(errors, indent)),
        None => Outcome::Passes { passes: true },
    };

    ScenarioTest {
        name: record.name,
        given: Given { query },
        when: When {
            validate: vec![record.rule],
        },
        then,
    }
}

/// Rebase every error column by the stripped indent and prepend the count.
fn rebase_errors(errors: Vec<ExpectedError>, indent: i64) -> Vec<ThenEntry> {
    let mut entries = Vec::with_capacity(errors.len() + 1);
    entries.push(ThenEntry::Count {
        error_count: errors.len(),
    });
    for mut error in errors {
        if let Some(column) = error.loc.column.as_mut() {
            *column -= indent;
        }
        entries.push(ThenEntry::Error(error));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ErrorLocation;
    use std::collections::BTreeMap;

    fn failing_record(raw_query: &str, line: i64, column: i64) -> TestCaseRecord {
        TestCaseRecord {
            name: "case".to_string(),
            rule: "SomeRule".to_string(),
            raw_query: raw_query.to_string(),
            expected_errors: Some(vec![ExpectedError {
                error_code: "UnknownField".to_string(),
                args: BTreeMap::new(),
                loc: ErrorLocation {
                    line: Some(line),
                    column: Some(column),
                },
            }]),
        }
    }

    #[test]
    fn min_indent_ignores_blank_lines() {
        assert_eq!(min_indent("\n    a\n  b\n\n"), 2);
        assert_eq!(min_indent("a\n  b"), 0);
        assert_eq!(min_indent("   \n\t\n"), 0);
        assert_eq!(min_indent(""), 0);
    }

    #[test]
    fn strip_indent_removes_common_prefix_only() {
        assert_eq!(strip_indent("  a\n    b\n  c"), "a\n  b\nc");
        assert_eq!(strip_indent("a\n  b"), "a\n  b");
    }

    #[test]
    fn strip_indent_leaves_short_blank_lines_alone() {
        // The blank line has fewer whitespace characters than the indent.
        assert_eq!(strip_indent("    a\n \n    b"), "a\n \nb");
    }

    #[test]
    fn strip_indent_is_idempotent() {
        for sample in ["\n  { bad }\n", "  a\n    b\n", "a\nb", "", "   \n"] {
            let once = strip_indent(sample);
            assert_eq!(strip_indent(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn stripped_text_has_zero_indent() {
        for sample in ["\n  { bad }\n", "\t\ta\n\t\t\tb", "  x"] {
            assert_eq!(min_indent(&strip_indent(sample)), 0, "sample {sample:?}");
        }
    }

    #[test]
    fn error_count_leads_the_then_sequence() {
        let document = build_document(
            "Example".to_string(),
            vec![failing_record("\n  { bad }\n", 1, 3)],
        );
        let Outcome::Errors(entries) = &document.tests[0].then else {
            panic!("expected error entries");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ThenEntry::Count { error_count: 1 });
    }

    #[test]
    fn columns_are_rebased_by_the_stripped_indent() {
        let document = build_document(
            "Example".to_string(),
            vec![failing_record("\n  { bad }\n", 1, 3)],
        );
        assert_eq!(document.tests[0].given.query, "\n{ bad }\n");
        let Outcome::Errors(entries) = &document.tests[0].then else {
            panic!("expected error entries");
        };
        let ThenEntry::Error(error) = &entries[1] else {
            panic!("expected an error entry");
        };
        assert_eq!(error.loc.line, Some(1));
        assert_eq!(error.loc.column, Some(1));
    }

    #[test]
    fn passing_record_becomes_passes_true() {
        let record = TestCaseRecord {
            name: "ok".to_string(),
            rule: "SomeRule".to_string(),
            raw_query: "{ ok }".to_string(),
            expected_errors: None,
        };
        let document = build_document("Example".to_string(), vec![record]);
        assert_eq!(document.tests[0].then, Outcome::Passes { passes: true });
        assert_eq!(document.tests[0].when.validate, vec!["SomeRule".to_string()]);
    }

    #[test]
    fn document_serializes_with_renamed_keys() {
        let document = build_document(
            "Example".to_string(),
            vec![failing_record("\n  { bad }\n", 1, 3)],
        );
        let yaml = serde_yaml::to_string(&document).unwrap();
        assert!(yaml.contains("schema-file: validation.schema.graphql"));
        assert!(yaml.contains("error-count: 1"));
        assert!(yaml.contains("error-code: UnknownField"));
    }
}
