use crate::cli::{CountArgs, DescribeArgs};
use crate::connect::connect;
use crate::output::{header, print_json, table};
use colored::Colorize;
use comfy_table::{Cell, Color};
use sqlobject::{Executor, Ident, TableDescription, schema};

pub async fn describe(args: DescribeArgs) -> anyhow::Result<()> {
    let name = Ident::parse(&args.table)?;
    let db = connect(&args.global).await?;
    let described = schema::describe(&db, name.name()).await;
    db.close().await;
    let described = described?;

    if args.global.json {
        return print_json(&described);
    }
    print_description(&described);
    Ok(())
}

fn print_description(d: &TableDescription) {
    let kind = if d.is_view { "view" } else { "table" };
    println!(
        "{} {} ({kind}, ~{} rows)",
        "▶".cyan(),
        d.schema.table.bold(),
        d.row_count
    );

    let mut columns = table();
    columns.set_header(header(["Column", "Type", "Declared", "Extra"]));
    for c in &d.schema.columns {
        let extra = if c.auto_increment { "auto_increment" } else { "" };
        columns.add_row(vec![
            Cell::new(&c.name).fg(Color::White),
            Cell::new(&c.data_type).fg(Color::Yellow),
            Cell::new(&c.column_type).fg(Color::DarkGrey),
            Cell::new(extra).fg(Color::Green),
        ]);
    }
    println!("{columns}");

    if !d.enums.is_empty() {
        println!("{}", "Enums".bold());
        for (column, values) in &d.enums {
            println!("  {column}: {}", values.join(", "));
        }
    }

    if !d.foreign_keys.is_empty() {
        println!("{}", "Foreign keys".bold());
        for fk in &d.foreign_keys {
            println!(
                "  {} {} → {}.{}",
                fk.constraint_name.dimmed(),
                fk.column,
                fk.referenced_table,
                fk.referenced_column
            );
        }
    }
}

pub async fn count(args: CountArgs) -> anyhow::Result<()> {
    let name = Ident::parse(&args.table)?;
    let db = connect(&args.global).await?;
    let result = async {
        if schema::is_view(&db, name.name()).await?.is_none() {
            anyhow::bail!("table '{}' not found in schema '{}'", name.name(), db.schema_name());
        }
        Ok::<u64, anyhow::Error>(schema::row_count(&db, name.name()).await?)
    }
    .await;
    db.close().await;
    let rows = result?;

    if args.global.json {
        return print_json(&serde_json::json!({ "table": name.name(), "row_count": rows }));
    }
    println!("{rows}");
    Ok(())
}
