use docket::{bail, clause, IsolationLevel, Model, Record, Transaction, TxOptions, Value};
use pretty_assertions::assert_eq;
use tests::*;

#[derive(Debug, Default, Record)]
struct Order {
    pub id: i64,
    pub status: String,
}

fn orders(driver: &LoggingDriver) -> Model<Order> {
    Model::new().with_driver(driver.handle())
}

fn audit(note: &'static str) -> TxOptions<'static> {
    TxOptions::new().before(move |tx| {
        Box::pin(async move {
            tx.execute("INSERT INTO audit_log (note) VALUES ($1)", &[Value::from(note)])
                .await?;
            Ok(())
        })
    })
}

async fn locked() -> docket::Result<()> {
    bail!("order is locked")
}

async fn explode() -> docket::Result<()> {
    panic!("hook exploded")
}

#[tokio::test]
async fn no_options_runs_directly() {
    let driver = LoggingDriver::new();
    let model = orders(&driver);

    assert_ok!(model.delete(clause!("WHERE id = $1", 1)).execute_in(TxOptions::new()).await);

    assert_eq!(driver.log().sql(), ["DELETE FROM orders WHERE id = $1"]);
}

#[tokio::test]
async fn isolation_alone_opens_a_transaction() {
    let driver = LoggingDriver::new();
    driver.push_count(2);
    let model = orders(&driver);

    let affected = assert_ok!(
        model
            .sql("UPDATE orders SET status = 'paid'")
            .execute_in(TxOptions::new().isolation(IsolationLevel::Serializable))
            .await
    );

    assert_eq!(affected, 2);
    assert_eq!(
        driver.log().ops(),
        [
            DriverOp::Begin(Some(IsolationLevel::Serializable)),
            DriverOp::Execute {
                sql: "UPDATE orders SET status = 'paid'".to_string(),
                args: vec![],
            },
            DriverOp::Commit,
        ]
    );
}

#[tokio::test]
async fn hooks_surround_the_statement() {
    let driver = LoggingDriver::new();
    let model = orders(&driver);
    let follow_up = model.clone();

    let options = audit("before").after(move |tx| {
        Box::pin(async move {
            follow_up
                .sql(clause!("UPDATE orders SET status = $1 WHERE status = $2", "sent", "paid"))
                .exec_tx(tx)
                .await?;
            Ok(())
        })
    });

    let changes = model.changes(r#"{"status": "paid"}"#);
    assert_ok!(model.insert(&[changes], "").execute_in(options).await);

    assert_eq!(
        driver.log().sql(),
        [
            "BEGIN",
            "INSERT INTO audit_log (note) VALUES ($1)",
            "INSERT INTO orders (status) VALUES ($1)",
            "UPDATE orders SET status = $1 WHERE status = $2",
            "COMMIT",
        ]
    );
    assert_eq!(driver.log().last_args(), [Value::from("sent"), Value::from("paid")]);
}

#[tokio::test]
async fn failing_before_hook_rolls_back() {
    let driver = LoggingDriver::new();
    let model = orders(&driver);

    let options = TxOptions::new().before(|_tx| Box::pin(locked()));
    let err = assert_err!(model.delete(()).execute_in(options).await);

    assert_eq!(err.to_string(), "order is locked");
    assert_eq!(driver.log().sql(), ["BEGIN", "ROLLBACK"]);
}

#[tokio::test]
async fn failing_statement_rolls_back_and_skips_after_hook() {
    let driver = LoggingDriver::new();
    driver.fail_on("DELETE");
    let model = orders(&driver);

    let options = audit("before").after(|tx| {
        Box::pin(async move {
            tx.execute("SELECT 'unreachable'", &[]).await?;
            Ok(())
        })
    });
    let err = assert_err!(model.delete(()).execute_in(options).await);

    assert!(err.is_driver());
    assert_eq!(
        driver.log().sql(),
        [
            "BEGIN",
            "INSERT INTO audit_log (note) VALUES ($1)",
            "DELETE FROM orders",
            "ROLLBACK",
        ]
    );
}

#[tokio::test]
async fn failing_after_hook_rolls_back() {
    let driver = LoggingDriver::new();
    driver.fail_on("audit_log");
    let model = orders(&driver);

    let options = TxOptions::new().after(|tx| {
        Box::pin(async move {
            tx.execute("INSERT INTO audit_log (note) VALUES ('after')", &[])
                .await?;
            Ok(())
        })
    });
    let err = assert_err!(model.delete(()).execute_in(options).await);

    assert!(err.to_string().contains("audit_log"));
    assert_eq!(
        driver.log().sql(),
        [
            "BEGIN",
            "DELETE FROM orders",
            "INSERT INTO audit_log (note) VALUES ('after')",
            "ROLLBACK",
        ]
    );
}

#[tokio::test]
async fn failed_rollback_keeps_the_original_error() {
    let driver = LoggingDriver::new();
    driver.fail_on("DELETE").fail_on("ROLLBACK");
    let model = orders(&driver);

    let err = assert_err!(model.delete(()).execute_in(audit("x")).await);

    assert_eq!(err.to_string(), "scripted failure: DELETE FROM orders");
    assert_eq!(driver.log().sql().last().map(String::as_str), Some("ROLLBACK"));
}

#[tokio::test]
async fn failed_commit_is_reported() {
    let driver = LoggingDriver::new();
    driver.fail_on("COMMIT");
    let model = orders(&driver);

    let err = assert_err!(model.delete(()).execute_in(audit("x")).await);

    assert_eq!(err.to_string(), "scripted failure: COMMIT");
    assert_eq!(driver.log().sql().last().map(String::as_str), Some("COMMIT"));
}

#[tokio::test]
async fn failed_begin_runs_nothing() {
    let driver = LoggingDriver::new();
    driver.fail_on("BEGIN");
    let model = orders(&driver);

    let err = assert_err!(model.delete(()).execute_in(audit("x")).await);

    assert!(err.is_driver());
    assert_eq!(driver.log().sql(), ["BEGIN"]);
}

#[tokio::test]
async fn panicking_hook_drops_the_transaction() {
    let driver = LoggingDriver::new();
    let model = orders(&driver).with_logging(true);

    let task = tokio::spawn(async move {
        let options = TxOptions::new().before(|_tx| Box::pin(explode()));
        model.delete(()).execute_in(options).await
    });

    let err = assert_err!(task.await);
    assert!(err.is_panic());
    assert_eq!(driver.log().ops(), [DriverOp::Begin(None), DriverOp::Dropped]);
}

#[tokio::test]
async fn query_in_loads_inside_the_transaction() {
    let driver = LoggingDriver::new();
    driver.push_rows(vec![vec![Value::I64(4), Value::from("paid")]]);
    let model = orders(&driver);

    let mut order = Order::default();
    assert_ok!(
        model
            .find(clause!("WHERE id = $1 FOR UPDATE", 4))
            .query_in(
                TxOptions::new().isolation(IsolationLevel::RepeatableRead),
                &mut order
            )
            .await
    );

    assert_eq!(order.id, 4);
    assert_eq!(order.status, "paid");
    assert_eq!(
        driver.log().sql(),
        [
            "BEGIN ISOLATION LEVEL REPEATABLE READ",
            "SELECT id, status FROM orders WHERE id = $1 FOR UPDATE",
            "COMMIT",
        ]
    );
}

#[tokio::test]
async fn query_in_rolls_back_when_nothing_is_found() {
    let driver = LoggingDriver::new();
    let model = orders(&driver);

    let mut order = Order::default();
    let err = assert_err!(
        model
            .find(clause!("WHERE id = $1", 404))
            .query_in(audit("lookup"), &mut order)
            .await
    );

    assert!(err.is_no_rows());
    assert_eq!(driver.log().sql().last().map(String::as_str), Some("ROLLBACK"));
}

#[tokio::test]
async fn transactions_need_a_driver() {
    let model = Model::<Order>::new();

    let err = assert_err!(model.delete(()).execute_in(audit("x")).await);
    assert!(err.is_no_connection());
}
