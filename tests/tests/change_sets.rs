use chrono::{DateTime, Utc};
use docket::{clause, FieldId, Input, Model, Record, Value};
use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Default, Record)]
struct User {
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
    #[docket(document = "meta")]
    pub picture: String,
    #[docket(rename = "-")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Record)]
struct Tag {
    pub id: i64,
    pub label: String,
}

const NAME: FieldId = FieldId(1);
const AGE: FieldId = FieldId(2);
const PICTURE: FieldId = FieldId(3);
const ROLE: FieldId = FieldId(4);

#[test]
fn permit_then_insert() {
    let model = Model::<User>::new();
    let changes = model
        .permit(&["name", "picture"])
        .filter(r#"{"name": "hello", "picture": "world!", "age": 9}"#);

    assert_eq!(changes.field_names(), ["name", "picture"]);

    let query = model.insert(&[changes], "RETURNING id");
    assert_eq!(
        query.sql(),
        "INSERT INTO users (name, meta) VALUES ($1, $2) RETURNING id"
    );
    assert_eq!(
        query.values(),
        [Value::from("hello"), Value::from("{\"picture\":\"world!\"}")]
    );
}

#[test]
fn permit_then_update() {
    let model = Model::<User>::new();
    let changes = model
        .permit(&["picture"])
        .filter(json!({ "name": "ignored", "picture": "WORLD!" }));

    let query = model.update(&[changes], clause!("WHERE id = $1", 7));
    assert_eq!(
        query.sql(),
        "UPDATE users SET meta = jsonb_set(COALESCE(meta, '{}'::jsonb), '{picture}', $2) WHERE id = $1"
    );
    assert_eq!(query.values(), [Value::I32(7), Value::from("\"WORLD!\"")]);
}

#[test]
fn permitted_fields_follow_declaration_order() {
    let model = Model::<User>::new();

    let permit = model.permit(&["picture", "name", "picture"]);
    assert_eq!(permit.fields(), ["name", "picture"]);
    assert!(permit.is_permitted(NAME));
    assert!(!permit.is_permitted(AGE));
}

#[test]
fn unknown_and_empty_permits() {
    let model = Model::<User>::new();
    let input = r#"{"name": "hello", "nope": 1}"#;

    let permit = model.permit(&["nope"]);
    assert!(permit.fields().is_empty());
    assert!(permit.filter(input).is_empty());

    assert!(model.permit(&[]).filter(input).is_empty());
}

#[test]
fn permit_all_except() {
    let model = Model::<User>::new();

    let permit = model.permit_all_except(&["id", "created_at"]);
    assert_eq!(permit.fields(), ["name", "age", "picture", "role"]);

    let changes = permit.filter(json!({ "id": 5, "name": "ann", "age": 30 }));
    assert_eq!(changes.field_names(), ["name", "age"]);
    assert_eq!(changes.get(AGE), Some(&Value::I32(30)));
}

#[test]
fn values_that_do_not_convert_are_dropped() {
    let model = Model::<User>::new();
    let changes = model
        .permit(&["name", "age", "picture"])
        .filter(json!({ "name": 12, "age": "thirty", "picture": "p.png" }));

    assert_eq!(changes.field_names(), ["picture"]);
}

#[test]
fn null_clears_nullable_fields_only() {
    let model = Model::<User>::new();
    let changes = model
        .permit(&["name", "age"])
        .filter(json!({ "name": null, "age": null }));

    assert_eq!(changes.field_names(), ["age"]);
    assert_eq!(changes.get(AGE), Some(&Value::Null));
}

#[test]
fn hidden_fields_ignore_untyped_input() {
    let model = Model::<User>::new();
    let permit = model.permit(&["name", "role"]);

    let changes = permit.filter(json!({ "name": "ann", "role": "admin", "-": "admin" }));
    assert_eq!(changes.field_names(), ["name"]);

    #[derive(Serialize)]
    struct Promotion {
        role: &'static str,
    }

    let changes = permit.filter(Input::record(&Promotion { role: "admin" }));
    assert_eq!(changes.field_names(), ["role"]);
    assert_eq!(changes.get(ROLE), Some(&Value::from("admin")));
}

#[test]
fn record_inputs_follow_declared_names() {
    #[derive(Debug, Default, Serialize, Record)]
    struct Draft {
        pub id: i64,
        #[serde(rename = "title")]
        pub name: String,
        #[docket(document = "meta")]
        pub picture: String,
    }

    let draft = Draft {
        id: 3,
        name: "ann".to_string(),
        picture: "a.png".to_string(),
    };
    let model = Model::<User>::new();
    let permit = model.permit(&["name", "picture"]);

    // serde writes `title`, which no declared name matches
    let changes = permit.filter(Input::record(&draft));
    assert_eq!(changes.field_names(), ["picture"]);

    let changes = permit.filter(Input::from_record(&draft));
    assert_eq!(changes.field_names(), ["name", "picture"]);
    assert_eq!(changes.get(NAME), Some(&Value::from("ann")));
    assert_eq!(changes.get(PICTURE), Some(&Value::from("a.png")));
}

#[test]
fn every_input_shape_is_accepted() {
    let model = Model::<User>::new();
    let permit = model.permit(&["name"]);
    let text = r#"{"name": "ann"}"#;

    let inputs = [
        Input::from(text),
        Input::from(text.to_string()),
        Input::from(text.as_bytes()),
        Input::from(text.as_bytes().to_vec()),
        Input::reader(std::io::Cursor::new(text.as_bytes().to_vec())),
        Input::from(json!({ "name": "ann" })),
    ];

    for input in inputs {
        assert_eq!(permit.filter(input).get(NAME), Some(&Value::from("ann")));
    }
}

#[test]
fn malformed_input_yields_nothing() {
    let model = Model::<User>::new();
    let permit = model.permit(&["name"]);

    assert!(permit.filter("{not json").is_empty());
    assert!(permit.filter(json!(["name", "ann"])).is_empty());
    assert!(permit.filter(&b""[..]).is_empty());
}

#[test]
fn later_inputs_override_earlier_ones() {
    let model = Model::<User>::new();
    let changes = model.permit(&["name", "age"]).filter_all([
        Input::from(json!({ "name": "first", "age": 1 })),
        Input::from(json!({ "name": "second" })),
    ]);

    assert_eq!(changes.field_names(), ["name", "age"]);
    assert_eq!(changes.get(NAME), Some(&Value::from("second")));
    assert_eq!(changes.get(AGE), Some(&Value::I32(1)));
}

#[test]
fn changes_without_a_permit() {
    let model = Model::<User>::new();
    let changes = model.changes(json!({ "id": 3, "picture": "p.png", "extra": true }));

    assert_eq!(changes.field_names(), ["id", "picture"]);
    assert_eq!(changes.get(FieldId(0)), Some(&Value::I64(3)));
}

#[test]
fn created_at_stamps_the_current_time() {
    let model = Model::<User>::new();
    let before = Utc::now();
    let changes = model.created_at();

    assert_eq!(changes.field_names(), ["created_at"]);
    match changes.get_by_name("created_at") {
        Some(Value::Timestamp(at)) => assert!(*at >= before - chrono::Duration::seconds(1)),
        other => panic!("expected a timestamp, got {other:?}"),
    }

    // No `updated_at` field on the record
    assert!(model.updated_at().is_empty());
}

#[test]
fn assign_copies_values_onto_a_record() {
    let model = Model::<User>::new();
    let mut user = User {
        name: "ann".to_string(),
        age: Some(30),
        ..User::default()
    };

    let first = model.permit(&["name", "age"]).filter(json!({ "name": "bob", "age": null }));
    let second = model.permit(&["name"]).filter(json!({ "name": "cat" }));
    let foreign = Model::<Tag>::new().changes(json!({ "label": "x", "id": 99 }));

    let changes = model.assign(&mut user, vec![first, second, foreign]);

    assert_eq!(user.name, "cat");
    assert_eq!(user.age, None);
    assert_eq!(user.id, 0);
    assert_eq!(changes.len(), 3);
}

#[test]
fn assigned_change_sets_feed_an_update() {
    let model = Model::<User>::new();
    let mut user = User::default();

    let changes = model.assign(
        &mut user,
        vec![model.permit(&["name"]).filter(json!({ "name": "dee" }))],
    );
    let query = model.update(&changes, clause!("WHERE id = $1", 1));

    assert_eq!(user.name, "dee");
    assert_eq!(query.sql(), "UPDATE users SET name = $2 WHERE id = $1");
}

#[test]
fn change_sets_serialize_by_external_name() {
    let model = Model::<User>::new();
    let mut changes = model.changes(json!({ "name": "ann", "picture": "p.png" }));
    changes.insert(ROLE, "admin");

    assert_eq!(
        serde_json::to_value(&changes).unwrap(),
        json!({ "name": "ann", "picture": "p.png" })
    );
    assert_eq!(
        changes.to_string(),
        "{\n  \"name\": \"ann\",\n  \"picture\": \"p.png\"\n}"
    );
}

#[test]
fn change_sets_are_plain_values() {
    let model = Model::<User>::new();
    let a = model.changes(json!({ "name": "ann" }));
    let b = a.clone();

    assert_eq!(a, b);
    assert!(std::ptr::eq(a.schema(), User::schema()));
}
