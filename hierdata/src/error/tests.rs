//! Unit tests for error classification and rendering.

use rstest::rstest;

use super::HieraError;

#[rstest]
#[case(HieraError::NoBackends)]
#[case(HieraError::MissingHierarchy)]
#[case(HieraError::configuration("bad"))]
#[case(HieraError::interpolation("%{alias('a')}x", "alias cannot be combined"))]
#[case(HieraError::ResolutionCycle { cycle: "a -> a".into() })]
fn only_not_found_is_recoverable(#[case] err: HieraError) {
    assert!(!err.is_not_found(), "{err} should be fatal");
}

#[test]
fn not_found_names_the_key() {
    let err = HieraError::not_found("db.host");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "key 'db.host' not found");
}

#[test]
fn load_error_carries_path_and_backend() {
    let err = HieraError::load(
        camino::Utf8Path::new("/data/common.yaml"),
        "yaml",
        std::io::Error::other("boom"),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("/data/common.yaml"), "{rendered}");
    assert!(rendered.contains("`yaml`"), "{rendered}");
    assert!(rendered.ends_with("boom"), "{rendered}");
}

#[test]
fn reference_not_found_mentions_function() {
    let err = HieraError::ReferenceNotFound {
        function: "alias".into(),
        key: "missing".into(),
    };
    assert_eq!(
        err.to_string(),
        "alias lookup failed: key 'missing' does not exist"
    );
}
