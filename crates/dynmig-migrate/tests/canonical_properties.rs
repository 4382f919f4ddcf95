//! Properties of the canonical-element helpers and version normalization.

use std::collections::BTreeMap;

use dynmig_core::document::TYPE_ATTRIBUTE;
use dynmig_core::{compare_version, normalize_version_string, Document, Element, Version};
use dynmig_migrate::element::CANONICAL_TYPE;
use dynmig_migrate::{
    duplicate_with_all_attributes, duplicate_with_attributes, migrate_to_canonical,
    MigrationError, NodeMigrationData,
};
use proptest::prelude::*;

fn attribute_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", "[ -~]{0,12}", 0..8)
        .prop_filter("source must not carry its own type", |m| {
            !m.contains_key(TYPE_ATTRIBUTE)
        })
}

fn element_from(attributes: &BTreeMap<String, String>) -> Element {
    let mut element = Element::new("Legacy");
    for (name, value) in attributes {
        element.set_attribute(name.as_str(), value.as_str());
    }
    element
}

proptest! {
    #[test]
    fn prop_duplicate_all_copies_every_attribute(attributes in attribute_map()) {
        let source = element_from(&attributes);
        let copy = duplicate_with_all_attributes(&source);

        prop_assert_eq!(copy.attributes().len(), attributes.len() + 1);
        for (name, value) in &attributes {
            prop_assert_eq!(copy.attribute(name), Some(value.as_str()));
        }
        prop_assert_eq!(copy.attribute(TYPE_ATTRIBUTE), Some(CANONICAL_TYPE));
    }

    #[test]
    fn prop_duplicate_named_fills_missing_with_empty(
        attributes in attribute_map(),
        absent in prop::collection::vec("[A-Z]{1,6}", 1..4),
    ) {
        let source = element_from(&attributes);
        let mut names: Vec<&str> = attributes.keys().map(String::as_str).collect();
        names.extend(absent.iter().map(String::as_str));

        let copy = duplicate_with_attributes(&source, &names).unwrap();
        for name in &absent {
            prop_assert_eq!(copy.attribute(name), Some(""));
        }
        for (name, value) in &attributes {
            prop_assert_eq!(copy.attribute(name), Some(value.as_str()));
        }
        prop_assert_eq!(copy.attribute(TYPE_ATTRIBUTE), Some(CANONICAL_TYPE));
    }

    #[test]
    fn prop_revision_is_ignored(
        major in 0u32..10,
        minor in 0u32..10,
        build in 0u32..100,
        revision in 0u32..100_000,
    ) {
        let with = format!("{}.{}.{}.{}", major, minor, build, revision);
        let without = format!("{}.{}.{}", major, minor, build);
        prop_assert_eq!(
            normalize_version_string(Some(&with)).unwrap(),
            normalize_version_string(Some(&without)).unwrap()
        );
    }
}

#[test]
fn empty_name_list_is_invalid_argument() {
    let source = Element::new("Legacy").with_attribute("x", "1");
    assert!(matches!(
        duplicate_with_attributes(&source, &[]),
        Err(MigrationError::InvalidArgument { .. })
    ));
}

#[test]
fn migrating_an_empty_container_is_invalid_argument() {
    let mut doc = Document::new(Element::new("Workspace"));
    let data = NodeMigrationData::new(&mut doc);
    let err = migrate_to_canonical(data, "Lib.dll", "F", "F@double").unwrap_err();
    assert!(matches!(
        err,
        MigrationError::InvalidArgument { argument: "data", .. }
    ));
}

#[test]
fn empty_and_missing_versions_normalize_to_zero() {
    assert_eq!(normalize_version_string(Some("")).unwrap(), Version::ZERO);
    assert_eq!(normalize_version_string(None).unwrap(), Version::ZERO);
}

#[test]
fn four_part_version_compares_equal_to_three_part() {
    let a = normalize_version_string(Some("0.6.3.20048")).unwrap();
    let b = normalize_version_string(Some("0.6.3")).unwrap();
    assert_eq!(compare_version(&a, &b), std::cmp::Ordering::Equal);
}
