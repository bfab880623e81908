// Integration tests for the full generate pipeline: parse, locate, extract,
// build, all the way to the serialized YAML shape.

use std::fs;

use serde_yaml::Value;

use scenarist::engine;
use scenarist::locator;
use scenarist::syntax;
use scenarist::SourceContext;

const MINIMAL_SOURCE: &str = r#"
function UnknownField(field, line, column) {
  return { message: field, locations: [{ line: line, column: column }] };
}

describe("Example", () => {
  it("rejects bad field", () => {
    expectFailsRule(SomeRule, `
  { bad }
`, [UnknownField("bad", 1, 3)]);
  });

  it("accepts good field", () => {
    expectPassesRule(SomeRule, `{ ok }`);
  });
});
"#;

fn generate_value(source: &str) -> Value {
    let generation = engine::generate(source, "test.js").unwrap();
    serde_yaml::to_value(&generation.document).unwrap()
}

#[test]
fn minimal_source_produces_the_expected_entry() {
    let value = generate_value(MINIMAL_SOURCE);

    assert_eq!(value["scenario"], Value::from("Example"));
    assert_eq!(
        value["background"]["schema-file"],
        Value::from("validation.schema.graphql")
    );

    let test = &value["tests"][0];
    assert_eq!(test["name"], Value::from("rejects bad field"));
    assert_eq!(test["given"]["query"], Value::from("\n{ bad }\n"));
    assert_eq!(test["when"]["validate"][0], Value::from("SomeRule"));
    assert_eq!(test["then"][0]["error-count"], Value::from(1));
    assert_eq!(test["then"][1]["error-code"], Value::from("UnknownField"));
    assert_eq!(test["then"][1]["args"]["field"], Value::from("bad"));
    assert_eq!(test["then"][1]["loc"]["line"], Value::from(1));
    // Rebased from 3: the query's common indentation was 2.
    assert_eq!(test["then"][1]["loc"]["column"], Value::from(1));
}

#[test]
fn minimal_source_passing_case_has_no_error_entries() {
    let value = generate_value(MINIMAL_SOURCE);

    let test = &value["tests"][1];
    assert_eq!(test["name"], Value::from("accepts good field"));
    assert_eq!(test["then"]["passes"], Value::from(true));
    assert!(test["then"].as_mapping().is_some());
}

#[test]
fn fixture_preserves_source_order_minus_skips() {
    let source = fs::read_to_string("tests/fixtures/fields_tests.js").unwrap();
    let generation = engine::generate(&source, "fields_tests.js").unwrap();

    let names: Vec<&str> = generation
        .document
        .tests
        .iter()
        .map(|test| test.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "rejects a field that does not exist",
            "accepts a defined field",
            "reports every unknown field",
        ]
    );
    assert_eq!(
        generation.skipped,
        vec!["needs a harness extension first".to_string()]
    );
}

#[test]
fn fixture_error_counts_match_entry_lengths() {
    let source = fs::read_to_string("tests/fixtures/fields_tests.js").unwrap();
    let value = generate_value(&source);

    for test in value["tests"].as_sequence().unwrap() {
        let Some(entries) = test["then"].as_sequence() else {
            continue; // passing test
        };
        let count = entries[0]["error-count"].as_u64().unwrap() as usize;
        assert_eq!(count, entries.len() - 1);
    }
}

#[test]
fn fixture_error_codes_all_resolve_to_declared_constructors() {
    let source = fs::read_to_string("tests/fixtures/fields_tests.js").unwrap();

    let source_context = SourceContext::from_file("fields_tests.js", source.as_str());
    let tree = syntax::parse(&source, &source_context).unwrap();
    let signatures = locator::locate_error_constructors(tree.root_node(), &source);

    let value = generate_value(&source);
    for test in value["tests"].as_sequence().unwrap() {
        let Some(entries) = test["then"].as_sequence() else {
            continue;
        };
        for entry in &entries[1..] {
            let code = entry["error-code"].as_str().unwrap();
            let signature = signatures.get(code).expect("declared constructor");
            assert!(signature.parameters.iter().any(|p| p == "line"));
            assert!(signature.parameters.iter().any(|p| p == "column"));
        }
    }
}

#[test]
fn fixture_rebases_columns_and_strips_queries() {
    let source = fs::read_to_string("tests/fixtures/fields_tests.js").unwrap();
    let value = generate_value(&source);

    let test = &value["tests"][0];
    let query = test["given"]["query"].as_str().unwrap();
    assert!(query.starts_with("\n{\n  unknownField\n}"));
    // Written at column 9 under 6 spaces of common indentation.
    assert_eq!(test["then"][1]["loc"]["column"], Value::from(3));
    assert_eq!(test["then"][1]["loc"]["line"], Value::from(3));
    assert_eq!(
        test["then"][1]["args"]["suggestions"][0],
        Value::from("knownField")
    );
}

#[test]
fn fixture_reports_multiple_errors_in_array_order() {
    let source = fs::read_to_string("tests/fixtures/fields_tests.js").unwrap();
    let value = generate_value(&source);

    let test = &value["tests"][2];
    assert_eq!(test["then"][0]["error-count"], Value::from(2));
    assert_eq!(test["then"][1]["args"]["field"], Value::from("first"));
    assert_eq!(test["then"][2]["args"]["field"], Value::from("second"));
    assert_eq!(test["then"][1]["loc"]["line"], Value::from(3));
    assert_eq!(test["then"][2]["loc"]["line"], Value::from(4));
}
