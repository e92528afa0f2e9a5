// Integration tests for the instance store and its collaborator surface

use std::collections::BTreeSet;
use std::sync::Arc;

use wirerecord::prelude::*;

/// A forum-post model shared by the tests below.
fn post_registry() -> Arc<Registry> {
    Arc::new(
        Registry::builder()
            .string_attr("forum_uuid", AttrConfig::builder().hash_key(true).build())
            .unwrap()
            .integer_attr("post_id", AttrConfig::builder().range_key(true).build())
            .unwrap()
            .string_attr(
                "title",
                AttrConfig::builder().database_attribute_name("PostTitle").build(),
            )
            .unwrap()
            .boolean_attr("pinned", AttrConfig::default())
            .unwrap()
            .list_attr(
                "replies",
                ListOptions::builder().nil_as_empty_list(true).build(),
                AttrConfig::default(),
            )
            .unwrap()
            .string_set_attr("tags", AttrConfig::default())
            .unwrap()
            .build(),
    )
}

#[test]
fn test_write_then_read_casts_lazily() -> WirerecordResult<()> {
    let mut post = Item::new(post_registry());

    // The write path stores the raw string verbatim.
    post.write_attribute("post_id", "42")?;
    assert_eq!(
        post.to_h().get("post_id"),
        Some(&Value::Str("42".to_string()))
    );

    // The read path casts it, every time.
    assert_eq!(post.read_attribute("post_id")?, Value::Int(42));
    assert_eq!(post.read_attribute("post_id")?, Value::Int(42));
    Ok(())
}

#[test]
fn test_absent_values_read_as_nil_or_coerced_empty() -> WirerecordResult<()> {
    let post = Item::new(post_registry());

    assert_eq!(post.read_attribute("title")?, Value::Nil);
    // `replies` coerces nil to an empty list; absence routes through the
    // same cast.
    assert_eq!(post.read_attribute("replies")?, Value::List(Vec::new()));
    // `tags` casts nil to the empty set.
    assert_eq!(post.read_attribute("tags")?, Value::StringSet(BTreeSet::new()));
    Ok(())
}

#[test]
fn test_unknown_attribute_errors() {
    let mut post = Item::new(post_registry());

    assert!(matches!(
        post.read_attribute("author"),
        Err(WirerecordError::UnknownAttribute(_))
    ));
    assert!(matches!(
        post.write_attribute("author", "nobody"),
        Err(WirerecordError::UnknownAttribute(_))
    ));
}

#[test]
fn test_out_of_type_write_fails_only_on_read() -> WirerecordResult<()> {
    let mut post = Item::new(post_registry());

    // Storing a boolean under an integer attribute succeeds.
    post.write_attribute("post_id", true)?;

    // The mismatch surfaces when the value is read against its marshaler.
    assert!(matches!(
        post.read_attribute("post_id"),
        Err(WirerecordError::TypeMismatch(_))
    ));
    Ok(())
}

#[test]
fn test_to_h_is_a_snapshot() -> WirerecordResult<()> {
    let mut post = Item::new(post_registry());
    post.write_attribute("title", "First post")?;

    let mut snapshot = post.to_h();
    snapshot.insert("title".to_string(), Value::Str("mutated".to_string()));
    snapshot.remove("title");

    assert_eq!(
        post.read_attribute("title")?,
        Value::Str("First post".to_string())
    );
    Ok(())
}

#[test]
fn test_with_values_bulk_initialization() -> WirerecordResult<()> {
    let post = Item::with_values(
        post_registry(),
        [
            ("forum_uuid", Value::Str("f-1".to_string())),
            ("post_id", Value::Int(7)),
            ("pinned", Value::Bool(true)),
        ],
    )?;

    assert_eq!(post.read_attribute("pinned")?, Value::Bool(true));

    let unknown = Item::with_values(post_registry(), [("author", Value::Nil)]);
    assert!(matches!(unknown, Err(WirerecordError::UnknownAttribute(_))));
    Ok(())
}

#[test]
fn test_to_wire_uses_storage_names_and_omits_empties() -> WirerecordResult<()> {
    let mut post = Item::new(post_registry());
    post.write_attribute("forum_uuid", "f-1")?;
    post.write_attribute("post_id", 7)?;
    post.write_attribute("title", "First post")?;

    let wire = post.to_wire()?;
    assert_eq!(wire.get("forum_uuid"), Some(&WireValue::S("f-1".to_string())));
    assert_eq!(wire.get("post_id"), Some(&WireValue::N("7".to_string())));
    // Storage-name override applies on the wire.
    assert_eq!(
        wire.get("PostTitle"),
        Some(&WireValue::S("First post".to_string()))
    );
    assert!(!wire.contains_key("title"));

    // Nil boolean and empty tag set produce nothing to persist; the
    // nil-coerced replies list persists as empty L.
    assert!(!wire.contains_key("pinned"));
    assert!(!wire.contains_key("tags"));
    assert_eq!(wire.get("replies"), Some(&WireValue::L(Vec::new())));
    Ok(())
}

#[test]
fn test_key_values_extraction() -> WirerecordResult<()> {
    let mut post = Item::new(post_registry());
    post.write_attribute("forum_uuid", "f-1")?;
    post.write_attribute("post_id", 7)?;

    let keys = post.key_values()?;
    assert_eq!(keys.len(), 2);
    assert_eq!(keys.get("forum_uuid"), Some(&WireValue::S("f-1".to_string())));
    assert_eq!(keys.get("post_id"), Some(&WireValue::N("7".to_string())));
    Ok(())
}

#[test]
fn test_key_values_require_serializable_keys() -> WirerecordResult<()> {
    let mut post = Item::new(post_registry());
    post.write_attribute("forum_uuid", "f-1")?;
    // post_id left nil

    assert!(matches!(
        post.key_values(),
        Err(WirerecordError::TypeMismatch(_))
    ));
    Ok(())
}
