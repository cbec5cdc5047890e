use crate::cli::{GetArgs, ListArgs};
use crate::connect::connect;
use crate::output::{print_json, rows_table};
use colored::Colorize;
use sqlobject::{
    ReadOutcome, RecordConfig, SelectOptions, SqlObject, Value, build_pagination,
};

/// Interpret a command-line id: integers bind as integers, anything else as text.
fn parse_id(raw: &str) -> Value {
    raw.parse::<i64>().map(Value::Int).unwrap_or_else(|_| Value::from(raw))
}

pub async fn get(args: GetArgs) -> anyhow::Result<()> {
    let mut config = RecordConfig::new(&args.table).id(parse_id(&args.id));
    if let Some(key) = &args.key {
        config = config.key(key);
    }

    let db = connect(&args.global).await?;
    let outcome = async {
        let mut record = SqlObject::new(&db, config)?;
        record.read(SelectOptions::new().limit(1)).await
    }
    .await;
    db.close().await;

    match outcome? {
        ReadOutcome::Found(rows) => {
            if args.global.json {
                return print_json(&rows[0]);
            }
            println!("{}", rows_table(&rows[..1]));
            Ok(())
        }
        ReadOutcome::NotFound => anyhow::bail!(
            "no row in '{}' with {} = {}",
            args.table,
            args.key.as_deref().unwrap_or(sqlobject::DEFAULT_KEY),
            args.id
        ),
    }
}

pub async fn list(args: ListArgs) -> anyhow::Result<()> {
    let page = build_pagination(args.page, args.page_size);
    let config = RecordConfig::new(&args.table).all(true);

    let db = connect(&args.global).await?;
    let outcome = async {
        let mut record = SqlObject::new(&db, config)?;
        record.read(SelectOptions::new().paginate(page)).await
    }
    .await;
    db.close().await;
    let rows = outcome?.rows().to_vec();

    if args.global.json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("{}", format!("page {} of '{}' is empty", args.page.max(1), args.table).dimmed());
        return Ok(());
    }
    println!("{}", rows_table(&rows));
    println!(
        "{}",
        format!("page {} · {} row(s) · offset {}", args.page.max(1), rows.len(), page.offset).dimmed()
    );
    Ok(())
}
