use docket::{clause, Clause, Driver, Model, Record, Value};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::*;

#[derive(Debug, Default, Record)]
struct Order {
    pub id: i64,
    pub trade_number: String,
    #[docket(document = "meta")]
    pub note: String,
    #[docket(document = "meta", rename = "customer")]
    pub customer_name: String,
    pub total: f64,
}

fn model(driver: &LoggingDriver) -> Model<Order> {
    Model::new().with_driver(driver.handle())
}

#[test]
fn find_selects_flat_columns_then_documents() {
    let model = Model::<Order>::new();
    let query = model.find(clause!("WHERE id = $1", 4));

    assert_eq!(
        query.sql(),
        "SELECT id, trade_number, total, meta FROM orders WHERE id = $1"
    );
    assert_eq!(query.values(), [Value::I32(4)]);
}

#[test]
fn statements_without_a_clause() {
    let model = Model::<Order>::new();

    assert_eq!(model.find(()).sql(), "SELECT id, trade_number, total, meta FROM orders");
    assert_eq!(model.delete("").sql(), "DELETE FROM orders");
    assert_eq!(model.select("COUNT(*)", ()).sql(), "SELECT COUNT(*) FROM orders");
}

#[test]
fn insert_merges_change_sets_last_wins() {
    let model = Model::<Order>::new();
    let first = model.changes(json!({ "trade_number": "T-1", "note": "gift", "total": 10 }));
    let second = model.changes(json!({ "trade_number": "T-2", "customer": "ann" }));

    let query = model.insert(&[first, second], "RETURNING id");
    assert_eq!(
        query.sql(),
        "INSERT INTO orders (trade_number, total, meta) VALUES ($1, $2, $3) RETURNING id"
    );
    assert_eq!(
        query.values(),
        [
            Value::from("T-2"),
            Value::F64(10.0),
            Value::from("{\"customer_name\":\"ann\",\"note\":\"gift\"}"),
        ]
    );
}

#[test]
fn update_numbers_assignments_after_the_clause() {
    let model = Model::<Order>::new();
    let changes = model.changes(json!({ "total": 2.5, "customer": "bob", "note": "rush" }));

    let query = model.update(&[changes], clause!("WHERE id = $1 AND trade_number = $2", 3, "T-9"));
    assert_eq!(
        query.sql(),
        "UPDATE orders SET total = $3, meta = jsonb_set(jsonb_set(COALESCE(meta, '{}'::jsonb), '{note}', $4), '{customer_name}', $5) WHERE id = $1 AND trade_number = $2"
    );
    assert_eq!(
        query.values(),
        [
            Value::I32(3),
            Value::from("T-9"),
            Value::F64(2.5),
            Value::from("\"rush\""),
            Value::from("\"bob\""),
        ]
    );
}

#[test]
fn runtime_table_name_applies_to_every_statement() {
    let model = Model::<Order>::new().with_table_name("archived_orders");

    assert_eq!(
        model.delete(clause!("WHERE id = $1", 1)).sql(),
        "DELETE FROM archived_orders WHERE id = $1"
    );
    assert!(model.schema().starts_with("CREATE TABLE archived_orders ("));
}

#[test]
fn raw_sql_keeps_its_arguments() {
    let model = Model::<Order>::new();
    let query = model.sql(clause!("SELECT 1 WHERE $1 = $2", 1, 1));

    assert_eq!(query.sql(), "SELECT 1 WHERE $1 = $2");
    assert_eq!(query.values(), [Value::I32(1), Value::I32(1)]);

    let statement = query.into_statement();
    assert_eq!(statement.to_string(), "SELECT 1 WHERE $1 = $2");
}

#[test]
fn clauses_from_strings() {
    let clause = Clause::from(String::from("ORDER BY id DESC")).arg(5);

    assert_eq!(clause.sql, "ORDER BY id DESC");
    assert_eq!(clause.args, [Value::I32(5)]);
}

#[tokio::test]
async fn execute_sends_sql_and_arguments() {
    let driver = LoggingDriver::new();
    driver.push_count(1);
    let model = model(&driver);

    let changes = model.permit(&["trade_number"]).filter(r#"{"trade_number": "T-1"}"#);
    let affected = assert_ok!(model.update(&[changes], clause!("WHERE id = $1", 8)).execute().await);

    assert_eq!(affected, 1);
    assert_eq!(
        driver.log().ops(),
        [DriverOp::Execute {
            sql: "UPDATE orders SET trade_number = $2 WHERE id = $1".to_string(),
            args: vec![Value::I32(8), Value::from("T-1")],
        }]
    );
}

#[tokio::test]
async fn execute_reports_rows_affected() {
    let driver = LoggingDriver::new();
    driver.push_count(3);
    let model = model(&driver);

    let affected = model
        .delete(clause!("WHERE total < $1", 1.0))
        .must_execute()
        .await;

    assert_eq!(affected, 3);
    assert_eq!(driver.log().last_args(), [Value::F64(1.0)]);
}

#[tokio::test]
async fn driver_errors_propagate() {
    let driver = LoggingDriver::new();
    driver.fail_on("DELETE");
    let model = model(&driver);

    let err = assert_err!(model.delete(()).execute().await);
    assert!(err.is_driver());
    assert_eq!(err.to_string(), "scripted failure: DELETE FROM orders");
}

#[tokio::test]
#[should_panic(expected = "scripted failure")]
async fn must_execute_panics_on_error() {
    let driver = LoggingDriver::new();
    driver.fail_on("DELETE");

    model(&driver).delete(()).must_execute().await;
}

#[tokio::test]
async fn statements_need_a_driver() {
    let model = Model::<Order>::new();

    let err = assert_err!(model.delete(()).execute().await);
    assert!(err.is_no_connection());
}

#[tokio::test]
async fn closed_drivers_refuse_statements() {
    let driver = LoggingDriver::new();
    let model = model(&driver);

    assert_ok!(driver.handle().close().await);

    let err = assert_err!(model.delete(()).execute().await);
    assert!(err.is_no_connection());
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn logging_does_not_change_what_runs() {
    let driver = LoggingDriver::new();
    let model = model(&driver).with_logging(true);

    assert_ok!(model.sql("TRUNCATE orders").execute().await);
    assert_eq!(driver.log().sql(), ["TRUNCATE orders"]);
}
