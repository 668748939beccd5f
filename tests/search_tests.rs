// tests/search_tests.rs
mod common;
mod support;

use memory_cipher::{CoreError, SearchOutcome};

use common::{engine, other_engine};
use support::{seal_v1, FIXED_IV};

#[test]
fn test_whole_value_matches_without_decryption() {
    let stored = engine().encrypt_to_string("123 Main Street").unwrap();
    let outcome = engine().query(&stored, "123 Main Street").unwrap();
    assert_eq!(outcome, SearchOutcome::EXACT);
    assert!(outcome.matches);
    assert_eq!(outcome.score, 1.0);
    assert!(!outcome.via_decryption);
}

#[test]
fn test_substring_is_case_insensitive() {
    let stored = engine().encrypt_to_string("Hello World").unwrap();

    let hit = engine().query(&stored, "hello").unwrap();
    assert!(hit.matches);
    assert!(hit.via_decryption);
    assert_eq!(hit.score, 1.0);

    let miss = engine().query(&stored, "xyz").unwrap();
    assert!(!miss.matches);
    assert_eq!(miss.score, 0.0);
}

#[test]
fn test_substring_score_is_position_weighted() {
    let stored = engine().encrypt_to_string("Hello World").unwrap();
    let outcome = engine().query(&stored, "WORLD").unwrap();
    assert!(outcome.matches);
    let expected = 1.0 - (6.0 / 11.0) * 0.3;
    assert!((outcome.score - expected).abs() < 1e-12);
    assert!(outcome.score > 0.0 && outcome.score < 1.0);
}

#[test]
fn test_whole_value_in_other_case_falls_back_to_decryption() {
    let stored = engine().encrypt_to_string("Hello World").unwrap();
    let outcome = engine().query(&stored, "hello world").unwrap();
    assert!(outcome.matches);
    assert!(outcome.via_decryption);
    assert_eq!(outcome.score, 1.0);
}

#[test]
fn test_empty_inputs_never_match() {
    let stored = engine().encrypt_to_string("anything").unwrap();
    assert_eq!(engine().query("", "anything").unwrap(), SearchOutcome::NO_MATCH);
    assert_eq!(engine().query(&stored, "").unwrap(), SearchOutcome::NO_MATCH);
}

#[test]
fn test_pii_scenario() {
    let stored = engine()
        .encrypt_to_string("This is sensitive PII data")
        .unwrap();
    assert!(stored.starts_with("HE_v2:"));
    assert_eq!(stored.split(':').count(), 4);
    assert_eq!(
        engine().decrypt(&stored).unwrap(),
        "This is sensitive PII data"
    );

    let hit = engine().query(&stored, "sensitive").unwrap();
    assert!(hit.matches);
    assert!(hit.score > 0.0);

    let miss = engine().query(&stored, "nonexistent").unwrap();
    assert!(!miss.matches);
    assert_eq!(miss.score, 0.0);
}

#[test]
fn test_legacy_envelopes_are_searchable_by_decryption() {
    let stored = seal_v1(engine().keys(), &FIXED_IV, "Allergic to penicillin");
    let exact = engine().query(&stored, "Allergic to penicillin").unwrap();
    assert!(exact.matches);
    assert!(exact.via_decryption);
    assert_eq!(exact.score, 1.0);

    let partial = engine().query(&stored, "PENICILLIN").unwrap();
    assert!(partial.matches);
    assert!(partial.score < 1.0);
}

#[test]
fn test_query_does_not_swallow_errors() {
    let err = engine().query("HE_v2:broken", "x").unwrap_err();
    assert!(matches!(err, CoreError::MalformedEnvelope(_)));

    let err = engine().query("HE_v1:broken", "x").unwrap_err();
    assert!(matches!(err, CoreError::DecryptionFailure));

    let foreign = other_engine().encrypt_to_string("not yours").unwrap();
    let err = engine().query(&foreign, "not").unwrap_err();
    assert!(matches!(err, CoreError::DecryptionFailure));
}

#[test]
fn test_query_leaves_envelope_unchanged() {
    let stored = engine().encrypt_to_string("lives in Springfield").unwrap();
    let before = stored.clone();
    engine().query(&stored, "springfield").unwrap();
    engine().query(&stored, "lives in Springfield").unwrap();
    assert_eq!(stored, before);
    assert_eq!(engine().decrypt(&stored).unwrap(), "lives in Springfield");
}

#[test]
fn test_query_many_keeps_order() {
    let values = ["cardiology visit", "dentist", "visit to cardiology ward"];
    let stored: Vec<String> = values
        .iter()
        .map(|v| engine().encrypt_to_string(v).unwrap())
        .collect();

    let outcomes = engine().query_many(&stored, "cardiology").unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].matches && outcomes[0].score == 1.0);
    assert!(!outcomes[1].matches);
    assert!(outcomes[2].matches && outcomes[2].score < 1.0);
}
