use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use sqlobject::{Row, Value};

pub fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header<I, S>(names: I) -> Vec<Cell>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(|n| {
            Cell::new(n.into())
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan)
        })
        .collect()
}

pub fn value_cell(value: Option<&Value>) -> Cell {
    match value {
        None | Some(Value::Null) => Cell::new("(null)").fg(Color::DarkGrey),
        Some(v @ (Value::Int(_) | Value::UInt(_) | Value::Float(_))) => {
            Cell::new(v.to_string()).fg(Color::Yellow)
        }
        Some(v) => Cell::new(v.to_string()),
    }
}

/// Rows as a table; columns are the union of every row's keys, in first-seen order.
pub fn rows_table(rows: &[Row]) -> Table {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut table = table();
    table.set_header(header(columns.iter().copied()));
    for row in rows {
        table.add_row(columns.iter().map(|c| value_cell(row.get(*c))));
    }
    table
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlobject::row;

    #[test]
    fn rows_table_unions_columns() {
        let rows = vec![
            row! { "guid" => "g1", "name" => "a" },
            row! { "guid" => "g2", "qty" => 3 },
        ];
        let rendered = rows_table(&rows).to_string();
        for needle in ["guid", "name", "qty", "g1", "g2", "(null)"] {
            assert!(rendered.contains(needle), "missing {needle} in\n{rendered}");
        }
    }
}
