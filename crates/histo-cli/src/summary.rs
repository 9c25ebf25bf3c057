use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use histo_cli::types::{DatasetOutcome, DatasetStatus, RunResult};

pub fn print_summary(result: &RunResult) {
    println!("Mode: {}", result.mode);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Dataset"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Status"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for outcome in &result.outcomes {
        table.add_row(outcome_row(outcome));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} dataset(s)", result.outcomes.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.total_rows()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        totals_cell(result),
        dim_cell(if result.aborted { "aborted" } else { "-" }),
    ]);
    println!("{table}");

    let failures: Vec<&DatasetOutcome> = result
        .outcomes
        .iter()
        .filter(|outcome| outcome.status == DatasetStatus::Failed)
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for outcome in failures {
            eprintln!("- {}: {}", outcome.dataset, outcome.detail);
        }
    }
}

fn outcome_row(outcome: &DatasetOutcome) -> Vec<Cell> {
    vec![
        dim_cell(&outcome.sheet),
        Cell::new(&outcome.dataset)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        optional_cell(outcome.rows),
        optional_cell(outcome.columns),
        status_cell(outcome.status),
        Cell::new(&outcome.detail),
    ]
}

fn totals_cell(result: &RunResult) -> Cell {
    let failed = result.count(DatasetStatus::Failed);
    let text = format!(
        "{} done / {} skipped / {} failed",
        result.count(DatasetStatus::Done),
        result.count(DatasetStatus::Skipped),
        failed
    );
    let cell = Cell::new(text).add_attribute(Attribute::Bold);
    if failed > 0 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn status_cell(status: DatasetStatus) -> Cell {
    match status {
        DatasetStatus::Done => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        DatasetStatus::Skipped => dim_cell(status.as_str()),
        DatasetStatus::Failed => Cell::new(status.as_str())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn optional_cell<T: ToString>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value.to_string()),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
