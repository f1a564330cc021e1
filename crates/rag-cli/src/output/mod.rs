use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

use table::{Table, TableOptions};

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(serde_json::to_value(value)?, table_options())),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response to stdout in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> TableOptions {
    let prefs = ui::prefs();
    TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: Value, options: TableOptions) -> String {
    match value {
        Value::Array(items) => rows_table(&items, options),
        Value::Object(map) => sections(map, options),
        scalar => Table::new(vec!["value".into()])
            .row(vec![cell(&scalar)])
            .render(options),
    }
}

/// An object renders as a key/value table; its list-valued fields follow as
/// their own tables, headed by the field name.
fn sections(map: Map<String, Value>, options: TableOptions) -> String {
    let mut fields = Table::new(vec!["key".into(), "value".into()]);
    let mut lists = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) if items.iter().any(Value::is_object) => lists.push((key, items)),
            other => fields = fields.row(vec![key, cell(&other)]),
        }
    }

    let mut out = Vec::new();
    if !fields.is_empty() {
        out.push(fields.render(options));
    }
    for (key, items) in lists {
        out.push(format!("\n{key} ({})", items.len()));
        out.push(rows_table(&items, options));
    }
    out.join("\n")
}

fn rows_table(items: &[Value], options: TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        return items
            .iter()
            .fold(Table::new(vec!["value".into()]), |table, item| {
                table.row(vec![cell(item)])
            })
            .render(options);
    }

    let mut headers = Vec::<String>::new();
    for key in items.iter().filter_map(Value::as_object).flat_map(Map::keys) {
        if !headers.contains(key) {
            headers.push(key.clone());
        }
    }
    // Identifiers first, the rest alphabetical.
    headers.sort_by_key(|header| header != "id");

    let mut table = Table::new(headers.clone());
    for map in items.iter().filter_map(Value::as_object) {
        table = table.row(
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), cell))
                .collect(),
        );
    }
    table.render(options)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.replace('\n', " "),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
