use super::*;
use crate::row;
use crate::testing::ScriptedExecutor;

fn column(name: &str, data_type: &str, extra: &str) -> Row {
    row! {
        "column_name" => name,
        "data_type" => data_type,
        "column_type" => data_type,
        "extra" => extra,
    }
}

/// `widgets {guid, name}` schema reply.
fn widgets_schema() -> RowSet {
    vec![column("guid", "char", ""), column("name", "varchar", "")]
}

/// `orders {id auto_increment, guid, placed_on}` schema reply.
fn orders_schema() -> RowSet {
    vec![
        column("id", "int", "auto_increment"),
        column("guid", "char", ""),
        column("placed_on", "date", ""),
    ]
}

fn inserts(db: &ScriptedExecutor) -> usize {
    db.sql().iter().filter(|s| s.starts_with("INSERT")).count()
}

#[test]
fn rejects_invalid_identifiers() {
    let db = ScriptedExecutor::new();
    assert!(SqlObject::new(&db, RecordConfig::new("widgets; DROP TABLE x")).is_err());
    assert!(SqlObject::new(&db, RecordConfig::new("widgets").key("guid = 1")).is_err());
    assert!(db.sql().is_empty());
}

#[test]
fn backticked_key_is_stored_bare() {
    let db = ScriptedExecutor::new();
    let obj = SqlObject::new(
        &db,
        RecordConfig::new("widgets")
            .key("`guid`")
            .data(vec![row! { "guid" => "g1" }]),
    )
    .unwrap();
    assert_eq!(obj.state().key(), "guid");
    assert_eq!(obj.state().id(), Some(&Value::from("g1")));
}

#[tokio::test]
async fn reserved_word_key_and_columns_round_trip() {
    let db = ScriptedExecutor::new()
        .rows(vec![column("key", "varchar", ""), column("order", "int", "")])
        .rows(vec![row! { "key" => "k1", "order" => 1 }])
        .affected(1, None);
    let mut obj = SqlObject::new(&db, RecordConfig::new("slots").key("`key`").id("k1")).unwrap();

    obj.update(row! { "order" => 2 }).await.unwrap();
    assert_eq!(db.sql()[1], "SELECT * FROM slots WHERE `key` = ?");
    assert_eq!(db.sql()[2], "UPDATE slots SET `order` = ? WHERE `key` = ?");
    assert_eq!(obj.state().id(), Some(&Value::from("k1")));
}

#[tokio::test]
async fn initialize_loads_schema_once() {
    let db = ScriptedExecutor::new().rows(widgets_schema());
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets")).unwrap();

    assert!(!obj.state().is_initialized());
    let names: Vec<String> = obj
        .initialize()
        .await
        .unwrap()
        .column_names()
        .map(str::to_string)
        .collect();
    assert_eq!(names, vec!["guid", "name"]);
    obj.initialize().await.unwrap();

    assert!(obj.state().is_initialized());
    assert_eq!(db.statements().len(), 1);
}

#[tokio::test]
async fn missing_table_fails_with_schema_error() {
    let db = ScriptedExecutor::new().rows(vec![]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("nope")).unwrap();
    let err = obj.read(SelectOptions::new()).await.unwrap_err();
    assert!(err.is_schema());
}

#[test]
fn datum_and_id_are_derived() {
    let db = ScriptedExecutor::new();
    let mut obj = SqlObject::new(
        &db,
        RecordConfig::new("widgets")
            .id("fallback")
            .data(vec![row! { "guid" => "g1", "name" => "a" }, row! { "guid" => "g2" }]),
    )
    .unwrap();

    let state = obj.state();
    assert_eq!(state.datum(), Some(&row! { "guid" => "g1", "name" => "a" }));
    assert_eq!(state.id(), Some(&Value::from("g1")));

    let state = obj.state_mut();
    state.set_datum(row! { "name" => "b" });
    assert_eq!(state.id(), Some(&Value::from("fallback")));

    state.set_data(vec![row! { "guid" => "g2" }]);
    assert_eq!(state.datum(), Some(&row! { "guid" => "g2" }));
    assert_eq!(state.id(), Some(&Value::from("g2")));
}

#[tokio::test]
async fn read_replaces_data_and_marks_read() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        .rows(vec![row! { "guid" => "g1", "name" => "a" }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets").id("g1")).unwrap();

    let outcome = obj.read(SelectOptions::new()).await.unwrap();
    assert!(outcome.is_found());
    assert_eq!(outcome.rows().len(), 1);
    assert!(obj.state().is_read());
    assert_eq!(obj.state().datum().and_then(|d| d.get("name")), Some(&Value::from("a")));
    assert_eq!(
        obj.state().last_operation().map(|op| op.query.as_str()),
        Some(r#"SELECT * FROM widgets WHERE `guid` = "g1""#)
    );
}

#[tokio::test]
async fn empty_read_leaves_state_alone() {
    let db = ScriptedExecutor::new().rows(widgets_schema()).rows(vec![]);
    let mut obj = SqlObject::new(
        &db,
        RecordConfig::new("widgets").data(vec![row! { "guid" => "g1", "name" => "old" }]),
    )
    .unwrap();

    let outcome = obj.read(SelectOptions::new()).await.unwrap();
    assert_eq!(outcome, ReadOutcome::NotFound);
    assert!(!obj.state().is_read());
    assert_eq!(obj.state().data(), &vec![row! { "guid" => "g1", "name" => "old" }]);
    assert!(obj.state().last_operation().unwrap().response.rows.is_empty());
}

#[tokio::test]
async fn read_all_has_no_filter_and_formats_dates() {
    let db = ScriptedExecutor::new()
        .rows(orders_schema())
        .rows(vec![row! { "id" => 1 }, row! { "id" => 2 }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("orders").all(true)).unwrap();

    let outcome = obj.read(SelectOptions::new().limit(2)).await.unwrap();
    assert_eq!(outcome.rows().len(), 2);
    assert_eq!(
        db.sql()[1],
        "SELECT *, DATE_FORMAT(`placed_on`, '%Y-%m-%d %H:%i:%s') AS `placed_on_formatted` \
         FROM orders LIMIT 2"
    );
}

#[tokio::test]
async fn create_with_auto_increment_switches_key() {
    let db = ScriptedExecutor::new()
        .rows(orders_schema())
        .affected(1, Some(42))
        .rows(vec![row! { "id" => 42, "guid" => "o1" }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("orders")).unwrap();

    let outcome = obj
        .create(row! { "guid" => "o1", "bogus" => "x" }, true)
        .await
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Applied { rows_affected: 1 });

    assert_eq!(obj.state().key(), "id");
    assert_eq!(obj.state().id(), Some(&Value::Int(42)));
    let sql = db.sql();
    assert_eq!(sql[1], "INSERT INTO orders (`guid`) VALUES (?)");
    assert!(sql[2].ends_with("FROM orders WHERE `id` = ?"));
    assert_eq!(
        db.statements()[2].params().cloned().collect::<Vec<_>>(),
        vec![Value::UInt(42)]
    );
}

#[tokio::test]
async fn create_takes_id_from_fields() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        .affected(1, None)
        .rows(vec![row! { "guid" => "g9", "name" => "z" }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets")).unwrap();

    obj.create(row! { "guid" => "g9", "name" => "z" }, true)
        .await
        .unwrap();
    assert_eq!(obj.state().key(), "guid");
    assert_eq!(db.sql()[2], "SELECT * FROM widgets WHERE `guid` = ?");
    assert!(obj.state().is_read());
}

#[tokio::test]
async fn create_after_read_forgets_the_previous_id() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        .rows(vec![row! { "guid" => "g1", "name" => "old" }])
        .affected(1, None)
        .rows(vec![row! { "guid" => "g2", "name" => "new" }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets").id("g1")).unwrap();

    assert!(obj.read(SelectOptions::new()).await.unwrap().is_found());
    obj.create(row! { "name" => "new" }, true).await.unwrap();

    assert_eq!(db.sql()[3], "SELECT * FROM widgets WHERE `name` = ?");
    assert_eq!(
        db.statements()[3].params().cloned().collect::<Vec<_>>(),
        vec![Value::from("new")]
    );
    assert_eq!(
        obj.state().datum(),
        Some(&row! { "guid" => "g2", "name" => "new" })
    );
    assert_eq!(obj.state().id(), Some(&Value::from("g2")));
}

#[tokio::test]
async fn create_with_nothing_to_write_sends_nothing() {
    let db = ScriptedExecutor::new().rows(widgets_schema());
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets")).unwrap();

    let outcome = obj.create(row! { "name" => "", "other" => "x" }, true).await.unwrap();
    assert_eq!(outcome, WriteOutcome::NothingToDo);
    assert_eq!(db.statements().len(), 1);
}

#[tokio::test]
async fn create_propagates_execution_errors() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        .fail("duplicate entry");
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets")).unwrap();

    let err = obj.create(row! { "guid" => "g1" }, true).await.unwrap_err();
    assert_eq!(err.to_string(), "duplicate entry");
}

#[tokio::test]
async fn update_writes_and_overrides_datum() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        .rows(vec![row! { "guid" => "g1", "name" => "a" }])
        .affected(1, None);
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets").id("g1")).unwrap();

    let outcome = obj
        .update(row! { "name" => "b", "ignored" => "x" })
        .await
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Applied { rows_affected: 1 });

    assert_eq!(db.sql()[2], "UPDATE widgets SET `name` = ? WHERE `guid` = ?");
    assert_eq!(obj.state().datum(), Some(&row! { "name" => "b" }));
    // Still addressable after the datum lost its key column.
    assert_eq!(obj.state().id(), Some(&Value::from("g1")));
    // The stored rows are not re-read.
    assert_eq!(obj.state().data()[0].get("name"), Some(&Value::from("a")));
}

#[tokio::test]
async fn update_with_nothing_settable_is_a_no_op() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        .rows(vec![row! { "guid" => "g1", "name" => "a" }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets").id("g1")).unwrap();

    assert_eq!(obj.update(Row::new()).await.unwrap(), WriteOutcome::NothingToDo);
    // Empty fields return before the schema load.
    assert!(db.statements().is_empty());
    assert!(!obj.state().is_read());

    assert_eq!(
        obj.update(row! { "name" => "undefined" }).await.unwrap(),
        WriteOutcome::NothingToDo
    );
    // Schema load and the automatic read only.
    assert_eq!(db.statements().len(), 2);
    assert!(obj.state().is_read());
}

#[tokio::test]
async fn destroy_deletes_by_key() {
    let db = ScriptedExecutor::new()
        .rows(orders_schema())
        .affected(1, None);
    let mut obj = SqlObject::new(&db, RecordConfig::new("orders").key("id").id(7)).unwrap();

    assert_eq!(
        obj.destroy().await.unwrap(),
        WriteOutcome::Applied { rows_affected: 1 }
    );
    assert_eq!(
        obj.state().last_operation().map(|op| op.query.as_str()),
        Some(r#"DELETE FROM orders WHERE `id` = "7""#)
    );
}

#[tokio::test]
async fn destroy_without_id_does_nothing() {
    let db = ScriptedExecutor::new().rows(widgets_schema());
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets")).unwrap();
    assert_eq!(obj.destroy().await.unwrap(), WriteOutcome::NothingToDo);
    assert_eq!(db.statements().len(), 1);
}

#[tokio::test]
async fn read_or_create_inserts_once_then_reads() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        // lookup by fields: empty table
        .rows(vec![])
        .affected(1, None)
        .rows(vec![row! { "guid" => "w-1", "name" => "a" }])
        // explicit read afterwards
        .rows(vec![row! { "guid" => "w-1", "name" => "a" }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets")).unwrap();

    let outcome = obj.read_or_create(row! { "name" => "a" }).await.unwrap();
    assert!(outcome.is_found());
    assert_eq!(inserts(&db), 1);
    assert_eq!(db.sql()[1], "SELECT * FROM widgets WHERE `name` = ?");
    assert_eq!(db.sql()[3], "SELECT * FROM widgets WHERE `name` = ?");

    let again = obj.read(SelectOptions::new()).await.unwrap();
    assert_eq!(again.rows().len(), 1);
    assert_eq!(again.rows()[0].get("name"), Some(&Value::from("a")));
    assert_eq!(db.sql()[4], "SELECT * FROM widgets WHERE `guid` = ?");
    assert_eq!(db.remaining(), 0);
}

#[tokio::test]
async fn read_or_create_returns_existing_row() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        .rows(vec![row! { "guid" => "g1", "name" => "a" }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets").id("g1")).unwrap();

    let outcome = obj.read_or_create(row! { "name" => "a" }).await.unwrap();
    assert!(outcome.is_found());
    assert_eq!(inserts(&db), 0);
}

#[tokio::test]
async fn retries_apply_to_record_statements() {
    let db = ScriptedExecutor::new()
        .rows(widgets_schema())
        .fail("lock wait timeout")
        .rows(vec![row! { "guid" => "g1" }]);
    let mut obj = SqlObject::new(&db, RecordConfig::new("widgets").id("g1").retries(2)).unwrap();

    assert!(obj.read(SelectOptions::new()).await.unwrap().is_found());
}
