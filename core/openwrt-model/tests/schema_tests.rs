use openwrt_model::{AttrKind, AttrMode, AttrValue, AttributeSchema, EntitySchema};

fn interface_schema() -> EntitySchema {
    EntitySchema::new("Network Configuration data source")
        .with_attribute(AttributeSchema::computed_int64("id"))
        .with_attribute(AttributeSchema::required_string("name").describe("Interface Name"))
        .with_attribute(AttributeSchema::optional_string("device"))
        .with_attribute(AttributeSchema::optional_string("password").sensitive())
}

// ── AttributeSchema constructors ─────────────────────────────────

#[test]
fn required_string_flags() {
    let a = AttributeSchema::required_string("name");
    assert_eq!(a.kind, AttrKind::String);
    assert!(a.required());
    assert!(!a.optional());
    assert!(!a.computed());
    assert!(a.accepts_config());
}

#[test]
fn optional_string_flags() {
    let a = AttributeSchema::optional_string("device");
    assert!(!a.required());
    assert!(a.optional());
    assert!(!a.computed());
}

#[test]
fn computed_int64_is_read_only() {
    let a = AttributeSchema::computed_int64("id");
    assert_eq!(a.kind, AttrKind::Int64);
    assert!(a.computed());
    assert!(!a.accepts_config());
}

#[test]
fn optional_computed_accepts_config() {
    let a = AttributeSchema::new("model_id", AttrKind::String, AttrMode::OptionalComputed);
    assert!(a.optional());
    assert!(a.computed());
    assert!(a.accepts_config());
}

#[test]
fn sensitive_and_description() {
    let a = AttributeSchema::optional_string("password")
        .sensitive()
        .describe("Interface Login Password");
    assert!(a.sensitive);
    assert_eq!(a.description.as_deref(), Some("Interface Login Password"));
}

// ── EntitySchema ─────────────────────────────────────────────────

#[test]
fn attributes_keep_registration_order() {
    let schema = interface_schema();
    let names: Vec<_> = schema.names().collect();
    assert_eq!(names, vec!["id", "name", "device", "password"]);
    assert_eq!(schema.len(), 4);
}

#[test]
fn duplicate_attribute_replaces_earlier() {
    let schema = EntitySchema::new("x")
        .with_attribute(AttributeSchema::optional_string("a"))
        .with_attribute(AttributeSchema::required_string("a"));
    assert_eq!(schema.len(), 1);
    assert!(schema.attribute("a").unwrap().required());
}

#[test]
fn sensitive_lookup() {
    let schema = interface_schema();
    assert!(schema.is_sensitive("password"));
    assert!(!schema.is_sensitive("device"));
    assert!(!schema.is_sensitive("missing"));
    assert_eq!(
        schema.sensitive_attributes().into_iter().collect::<Vec<_>>(),
        vec!["password".to_string()]
    );
}

#[test]
fn version_defaults_to_zero() {
    assert_eq!(EntitySchema::new("x").version, 0);
    assert_eq!(EntitySchema::new("x").with_version(2).version, 2);
}

#[test]
fn schema_serde_roundtrip() {
    let schema = interface_schema();
    let json = serde_json::to_string(&schema).unwrap();
    let back: EntitySchema = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schema);
}

// ── AttrKind ─────────────────────────────────────────────────────

#[test]
fn kind_accepts_matching_scalars() {
    assert!(AttrKind::String.accepts(&AttrValue::from("x")));
    assert!(AttrKind::Int64.accepts(&AttrValue::from(3)));
    assert!(AttrKind::Bool.accepts(&AttrValue::from(true)));
    assert!(!AttrKind::Int64.accepts(&AttrValue::from("3")));
}

#[test]
fn kind_accepts_null_and_unknown() {
    assert!(AttrKind::Int64.accepts(&AttrValue::Null));
    assert!(AttrKind::String.accepts(&AttrValue::Unknown));
}

#[test]
fn kind_checks_collection_elements() {
    let ports = AttrKind::list(AttrKind::String);
    assert!(ports.accepts(&AttrValue::List(vec!["lan1".into(), "lan2".into()])));
    assert!(!ports.accepts(&AttrValue::List(vec!["lan1".into(), AttrValue::from(2)])));

    let labels = AttrKind::map(AttrKind::Int64);
    let ok = AttrValue::from(serde_json::json!({"a": 1, "b": 2}));
    let bad = AttrValue::from(serde_json::json!({"a": "1"}));
    assert!(labels.accepts(&ok));
    assert!(!labels.accepts(&bad));
}

#[test]
fn kind_display() {
    assert_eq!(AttrKind::map(AttrKind::list(AttrKind::Bool)).to_string(), "map(list(bool))");
}
