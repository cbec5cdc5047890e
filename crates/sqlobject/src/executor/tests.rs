use super::*;
use crate::row;
use crate::testing::ScriptedExecutor;

fn select_widget() -> Statement {
    let mut stmt = Statement::new("SELECT * FROM widgets WHERE guid = ");
    stmt.push_bind("w-1");
    stmt
}

#[tokio::test]
async fn execute_returns_only_rows() {
    let db = ScriptedExecutor::new().reply(Ok(Response {
        rows: vec![row! { "guid" => "w-1" }],
        rows_affected: 7,
        last_insert_id: Some(9),
    }));

    let rows = execute(&db, &select_widget()).await.unwrap();
    assert_eq!(rows, vec![row! { "guid" => "w-1" }]);
}

#[tokio::test]
async fn execute_propagates_driver_errors() {
    let db = ScriptedExecutor::new().fail("connection reset");
    let err = execute(&db, &select_widget()).await.unwrap_err();
    assert!(matches!(err, DbError::Other(ref m) if m == "connection reset"));
}

#[tokio::test]
async fn retry_succeeds_on_third_attempt() {
    let db = ScriptedExecutor::new()
        .fail("deadlock")
        .fail("deadlock")
        .rows(vec![row! { "guid" => "w-1", "name" => "a" }]);

    let rows = execute_with_retry(&db, &select_widget(), DEFAULT_RETRIES)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(db.statements().len(), 3);
}

#[tokio::test]
async fn retry_exhaustion_reports_attempts() {
    let db = ScriptedExecutor::new()
        .fail("down")
        .fail("down")
        .fail("still down")
        .rows(vec![]);

    let err = execute_with_retry(&db, &select_widget(), 3).await.unwrap_err();
    assert_eq!(err.attempts(), Some(3));
    match err {
        DbError::RetryExhausted { source, .. } => {
            assert_eq!(source.to_string(), "still down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // The fourth reply was never consumed.
    assert_eq!(db.remaining(), 1);
}

#[tokio::test]
async fn zero_retries_still_attempts_once() {
    let db = ScriptedExecutor::new().fail("down");
    let err = run_with_retry(&db, &select_widget(), 0).await.unwrap_err();
    assert_eq!(err.attempts(), Some(1));
    assert_eq!(db.statements().len(), 1);
}

#[tokio::test]
async fn executor_is_usable_through_references_and_arcs() {
    let db = std::sync::Arc::new(ScriptedExecutor::new().affected(1, None));
    let by_ref: &dyn Executor = &db;
    let response = by_ref.run(&Statement::new("DELETE FROM widgets")).await.unwrap();
    assert_eq!(response.rows_affected, 1);
    assert_eq!(by_ref.schema_name(), "shop");
}

#[test]
fn truncation_respects_char_boundaries() {
    assert_eq!(truncate_sql_bytes("héllo", 2), "h");
    assert_eq!(truncate_sql_bytes("short", 200), "short");
}
