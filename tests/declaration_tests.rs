// Integration tests for attribute declaration and registry invariants

use std::sync::Arc;

use wirerecord::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_duplicate_name_collides() {
    init_logging();
    let result = Registry::builder()
        .string_attr("title", AttrConfig::default())
        .unwrap()
        .integer_attr("title", AttrConfig::default());

    assert!(matches!(result, Err(WirerecordError::NameCollision(_))));
}

#[test]
fn test_storage_name_collides_with_existing_name() {
    // An override pointing at another attribute's name must fail.
    let result = Registry::builder()
        .string_attr("title", AttrConfig::default())
        .unwrap()
        .string_attr(
            "headline",
            AttrConfig::builder().database_attribute_name("title").build(),
        );

    assert!(matches!(result, Err(WirerecordError::NameCollision(_))));
}

#[test]
fn test_name_collides_with_existing_storage_name() {
    // The reverse direction: a new name landing on an existing override.
    let result = Registry::builder()
        .string_attr(
            "headline",
            AttrConfig::builder().database_attribute_name("title").build(),
        )
        .unwrap()
        .string_attr("title", AttrConfig::default());

    assert!(matches!(result, Err(WirerecordError::NameCollision(_))));
}

#[test]
fn test_storage_name_collides_with_storage_name() {
    let result = Registry::builder()
        .string_attr(
            "headline",
            AttrConfig::builder().database_attribute_name("Title").build(),
        )
        .unwrap()
        .string_attr(
            "subject",
            AttrConfig::builder().database_attribute_name("Title").build(),
        );

    assert!(matches!(result, Err(WirerecordError::NameCollision(_))));
}

#[test]
fn test_collision_is_order_independent() {
    for (first, second) in [("title", "headline"), ("headline", "title")] {
        let result = Registry::builder()
            .string_attr(
                first,
                AttrConfig::builder().database_attribute_name("shared").build(),
            )
            .unwrap()
            .string_attr(
                second,
                AttrConfig::builder().database_attribute_name("shared").build(),
            );
        assert!(
            matches!(result, Err(WirerecordError::NameCollision(_))),
            "declaring `{second}` after `{first}` should collide"
        );
    }
}

#[test]
fn test_invalid_identifiers_rejected() {
    for bad in ["", "9lives", "has space", "with-dash", "emoji🙂"] {
        let result = Registry::builder().string_attr(bad, AttrConfig::default());
        assert!(
            matches!(result, Err(WirerecordError::Configuration(_))),
            "`{bad}` should be rejected as an identifier"
        );
    }
}

#[test]
fn test_reserved_names_rejected_before_any_instance_exists() {
    for reserved in RESERVED_NAMES {
        let result = Registry::builder().string_attr(reserved, AttrConfig::default());
        assert!(
            matches!(result, Err(WirerecordError::ReservedName(_))),
            "`{reserved}` should be reserved"
        );
    }
}

#[test]
fn test_reserve_names_extension() {
    let result = Registry::builder()
        .reserve_names(["published"])
        .string_attr("published", AttrConfig::default());

    assert!(matches!(result, Err(WirerecordError::ReservedName(_))));
}

#[test]
fn test_hash_and_range_on_same_attribute_rejected() {
    let result = Registry::builder().string_attr(
        "id",
        AttrConfig::builder().hash_key(true).range_key(true).build(),
    );

    assert!(matches!(result, Err(WirerecordError::Configuration(_))));
}

#[test]
fn test_second_hash_key_rejected() {
    let result = Registry::builder()
        .string_attr("id", AttrConfig::builder().hash_key(true).build())
        .unwrap()
        .string_attr("other_id", AttrConfig::builder().hash_key(true).build());

    assert!(matches!(result, Err(WirerecordError::Configuration(_))));
}

#[test]
fn test_split_key_roles_reported() -> WirerecordResult<()> {
    init_logging();
    let registry = Registry::builder()
        .string_attr("forum_uuid", AttrConfig::builder().hash_key(true).build())?
        .integer_attr("post_id", AttrConfig::builder().range_key(true).build())?
        .string_attr("title", AttrConfig::default())?
        .build();

    assert_eq!(registry.hash_key().unwrap().name(), "forum_uuid");
    assert_eq!(registry.range_key().unwrap().name(), "post_id");
    assert!(registry.hash_key().unwrap().is_hash_key());

    let keys = registry.keys();
    assert_eq!(keys.get(&KeyRole::Hash).copied(), Some("forum_uuid"));
    assert_eq!(keys.get(&KeyRole::Range).copied(), Some("post_id"));
    Ok(())
}

#[test]
fn test_storage_name_override_and_reverse_index() -> WirerecordResult<()> {
    let registry = Registry::builder()
        .string_attr(
            "title",
            AttrConfig::builder().database_attribute_name("PostTitle").build(),
        )?
        .build();

    let attribute = registry.attribute("title").unwrap();
    assert_eq!(attribute.database_name(), "PostTitle");
    assert_eq!(registry.storage_attributes().get("PostTitle").unwrap(), "title");
    assert_eq!(
        registry.attribute_for_storage_name("PostTitle").unwrap().name(),
        "title"
    );
    Ok(())
}

#[test]
fn test_wire_type_tags_per_preset() -> WirerecordResult<()> {
    let registry = Registry::builder()
        .string_attr("a", AttrConfig::default())?
        .boolean_attr("b", AttrConfig::default())?
        .integer_attr("c", AttrConfig::default())?
        .float_attr("d", AttrConfig::default())?
        .date_attr("e", AttrConfig::default())?
        .datetime_attr("f", AttrConfig::default())?
        .list_attr("g", ListOptions::default(), AttrConfig::default())?
        .map_attr("h", MapOptions::default(), AttrConfig::default())?
        .string_set_attr("i", AttrConfig::default())?
        .numeric_set_attr("j", AttrConfig::default())?
        .build();

    let tag = |name: &str| registry.attribute(name).unwrap().wire_type();
    assert_eq!(tag("a"), WireType::S);
    assert_eq!(tag("b"), WireType::Bool);
    assert_eq!(tag("c"), WireType::N);
    assert_eq!(tag("d"), WireType::N);
    assert_eq!(tag("e"), WireType::S);
    assert_eq!(tag("f"), WireType::S);
    assert_eq!(tag("g"), WireType::L);
    assert_eq!(tag("h"), WireType::M);
    assert_eq!(tag("i"), WireType::Ss);
    assert_eq!(tag("j"), WireType::Ns);
    Ok(())
}

#[test]
fn test_mutation_tracking_defaults() -> WirerecordResult<()> {
    let registry = Registry::builder()
        .string_attr("title", AttrConfig::default())?
        .list_attr("tags", ListOptions::default(), AttrConfig::default())?
        .map_attr(
            "metadata",
            MapOptions::default(),
            AttrConfig::builder().mutation_tracking(false).build(),
        )?
        .integer_attr(
            "views",
            AttrConfig::builder().mutation_tracking(true).build(),
        )?
        .build();

    // Scalars default off, collections default on, overrides win.
    assert!(!registry.track_mutations("title"));
    assert!(registry.track_mutations("tags"));
    assert!(!registry.track_mutations("metadata"));
    assert!(registry.track_mutations("views"));
    assert!(!registry.track_mutations("undeclared"));
    Ok(())
}

#[test]
fn test_global_mutation_tracking_gate() -> WirerecordResult<()> {
    let registry = Registry::builder()
        .disable_mutation_tracking()
        .list_attr("tags", ListOptions::default(), AttrConfig::default())?
        .build();

    // The per-attribute flag survives; the predicate gates on the global.
    assert!(registry.attribute("tags").unwrap().mutation_tracking());
    assert!(!registry.track_mutations("tags"));
    Ok(())
}

#[derive(Debug)]
struct UppercaseMarshaler;

impl Marshaler for UppercaseMarshaler {
    fn type_cast(&self, raw: &Value) -> WirerecordResult<Value> {
        match raw {
            Value::Nil => Ok(Value::Nil),
            Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
            other => Err(WirerecordError::TypeMismatch(format!(
                "cannot cast {} into an uppercase string",
                other.type_name()
            ))),
        }
    }

    fn serialize(&self, raw: &Value) -> WirerecordResult<Option<WireValue>> {
        match self.type_cast(raw)? {
            Value::Nil => Ok(None),
            Value::Str(s) => Ok(Some(WireValue::S(s))),
            cast => Err(WirerecordError::TypeMismatch(format!(
                "unexpected cast result {}",
                cast.type_name()
            ))),
        }
    }
}

#[test]
fn test_custom_marshaler_declaration() -> WirerecordResult<()> {
    let registry = Registry::builder()
        .attr("ticker", Arc::new(UppercaseMarshaler), AttrConfig::default())?
        .build();

    let attribute = registry.attribute("ticker").unwrap();
    assert_eq!(attribute.wire_type(), WireType::S);
    assert_eq!(
        attribute.type_cast(&Value::Str("amzn".to_string()))?,
        Value::Str("AMZN".to_string())
    );
    Ok(())
}

#[test]
fn test_generic_attr_wire_type_override() -> WirerecordResult<()> {
    let registry = Registry::builder()
        .attr(
            "score",
            Arc::new(IntegerMarshaler),
            AttrConfig::builder().wire_type(WireType::N).build(),
        )?
        .build();

    assert_eq!(registry.attribute("score").unwrap().wire_type(), WireType::N);
    Ok(())
}

#[test]
fn test_sealed_registry_is_shareable_across_threads() -> WirerecordResult<()> {
    let registry = Arc::new(
        Registry::builder()
            .string_attr("id", AttrConfig::builder().hash_key(true).build())?
            .string_set_attr("tags", AttrConfig::default())?
            .build(),
    );

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                assert_eq!(registry.attributes().len(), 2);
                assert_eq!(registry.hash_key().unwrap().name(), "id");
                assert!(registry.track_mutations("tags"));
            });
        }
    });
    Ok(())
}
