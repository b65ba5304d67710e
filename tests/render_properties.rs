//! Integration tests for the observable rendering properties of parsed templates.
//!
//! These tests drive `Query` end to end: indexing of repeated and anonymous
//! markers, optional block stripping, missing-value reporting, and escaping.

use sql_placeholder_rs::{
    CoercionError, Config, Error, Index, PlaceholderType, Query, SourceKind, Value,
};

fn config() -> Config {
    Config::new(|raw| raw.replace('\'', "''"))
}

fn query(sql: &str) -> Query {
    Query::new(config(), sql).expect("Failed to parse template")
}

// =============================================================================
// Escaping
// =============================================================================

#[test]
fn test_string_literal_is_escaped_and_quoted() {
    let mut query = query("SELECT :s");
    for raw in ["plain", "it's", "''", "", "multi\nline", "{0} [x] :i"] {
        let rendered = query.list([raw]).unwrap();
        assert_eq!(rendered, format!("SELECT '{}'", raw.replace('\'', "''")));
    }
}

// =============================================================================
// Indexing
// =============================================================================

#[test]
fn test_parsing_twice_gives_the_same_result() {
    let sql = "SELECT :i, name:s FROM t [WHERE x = {name}] AND y = ?d";
    let first = query(sql);
    let second = query(sql);
    assert_eq!(first.canonical(), second.canonical());
    assert!(first.placeholders().eq(second.placeholders()));
}

#[test]
fn test_repeated_index_resolves_to_one_placeholder() {
    let mut query = query(":i {0} :0");
    let placeholders: Vec<_> = query.placeholders().collect();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].index(), &Index::Ordinal(0));
    assert_eq!(placeholders[0].kind(), PlaceholderType::Integer);
    assert_eq!(query.list([3]).unwrap(), "3 3 3");
}

#[test]
fn test_type_conflict_names_both_types() {
    let err = Query::new(config(), "SELECT :0i, :0s").unwrap_err();
    assert_eq!(
        err,
        Error::TypeChangeDetected {
            statement: "SELECT :0i, :0s".into(),
            index: Index::Ordinal(0),
            from: PlaceholderType::Integer,
            to: PlaceholderType::String,
        }
    );
    let message = err.to_string();
    assert!(message.contains("':i'"));
    assert!(message.contains("':s'"));
}

#[test]
fn test_explicit_ordinals_shift_anonymous_markers() {
    let mut query = query("SELECT :s, 0:i, :s");
    assert_eq!(query.canonical(), "SELECT {1}, {0}, {2}");
    assert_eq!(
        query.list([Value::from(1), "a".into(), "b".into()]).unwrap(),
        "SELECT 'a', 1, 'b'"
    );
}

// =============================================================================
// Optional blocks
// =============================================================================

#[test]
fn test_conditional_block_is_stripped_without_value() {
    let mut query = query("SELECT * FROM t WHERE 1=1 [AND x = :i]");
    assert!(query.placeholder(&Index::Ordinal(0)).unwrap().is_conditional());
    assert_eq!(
        query.list(Vec::<Value>::new()).unwrap(),
        "SELECT * FROM t WHERE 1=1 "
    );
}

#[test]
fn test_any_unconditional_occurrence_makes_value_mandatory() {
    let mut query = query("SELECT * FROM t WHERE y = :i [AND x = {0}]");
    let err = query.list(Vec::<Value>::new()).unwrap_err();
    assert_eq!(
        err,
        Error::PlaceholdersWithoutValue {
            query: "SELECT * FROM t WHERE y = {0} [AND x = {0}]".into(),
            missing: vec![(Index::Ordinal(0), PlaceholderType::Integer)],
        }
    );
}

#[test]
fn test_reference_conditionality_is_per_occurrence() {
    // An occurrence outside any block keeps the index mandatory.
    let query = query("[a = :i] b = {0}");
    assert!(!query.placeholder(&Index::Ordinal(0)).unwrap().is_conditional());

    // Typed occurrences all inside blocks make the index optional.
    let query = self::query("[a = :i] [b = {0}]");
    assert!(query.placeholder(&Index::Ordinal(0)).unwrap().is_conditional());
}

#[test]
fn test_block_with_bound_value_keeps_content() {
    let mut query = query("SELECT * FROM t [WHERE name = name:s] [LIMIT :u]");
    assert_eq!(
        query.map([("name", "x")]).unwrap(),
        "SELECT * FROM t WHERE name = 'x' "
    );
    assert_eq!(
        query.map([("name", Value::from("x")), ("0", Value::from(10))]).unwrap(),
        "SELECT * FROM t WHERE name = 'x' LIMIT 10"
    );
}

#[test]
fn test_brackets_without_placeholders_are_kept() {
    let mut query = query("SELECT arr[1] FROM t [WHERE x = :i]");
    assert_eq!(
        query.list(Vec::<Value>::new()).unwrap(),
        "SELECT arr[1] FROM t "
    );
}

#[test]
fn test_configured_brackets() {
    let config = config().brackets("[#", "#]").unwrap();
    let mut query = Query::new(config, "SELECT a[1] [#WHERE x = :i#]").unwrap();
    assert_eq!(query.list([2]).unwrap(), "SELECT a[1] WHERE x = 2");
    assert_eq!(query.list(Vec::<Value>::new()).unwrap(), "SELECT a[1] ");
}

// =============================================================================
// Missing values and failures
// =============================================================================

#[test]
fn test_all_missing_values_are_listed() {
    let mut query = query("INSERT INTO t VALUES (:i, :s, flag:b)");
    let err = query.list(Vec::<Value>::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "When filling the \"INSERT INTO t VALUES ({0}, {1}, {flag})\" query, some placeholders \
         were left without a value: '0:i', '1:s', 'flag:b'"
    );
}

#[test]
fn test_failed_render_does_not_leak_bindings() {
    let mut query = query("SELECT :i [AND y = :s]");
    let err = query.list([Value::from("nope"), Value::from("x")]).unwrap_err();
    assert_eq!(
        err,
        Error::Coercion {
            index: Index::Ordinal(0),
            kind: PlaceholderType::Integer,
            found: SourceKind::String,
            reason: CoercionError::NotNumeric("nope".into()),
        }
    );
    assert!(query.placeholders().all(|p| p.value().is_none()));
    assert_eq!(query.list([1]).unwrap(), "SELECT 1 ");
}

#[test]
fn test_escaped_markers() {
    let mut query = query("SELECT a::int, b ?? c, :i");
    assert_eq!(query.canonical(), "SELECT a:int, b ? c, {0}");
    assert_eq!(query.list([1]).unwrap(), "SELECT a:int, b ? c, 1");
}

#[test]
fn test_unknown_type_code_is_rejected() {
    let err = Query::new(config(), "SELECT ?z").unwrap_err();
    assert_eq!(
        err,
        Error::UnexpectedPlaceholderType {
            code: "?z".into(),
            index: Index::Ordinal(0),
        }
    );
}
