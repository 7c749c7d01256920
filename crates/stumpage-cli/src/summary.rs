use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use stumpage_cli::types::{RunSummary, SourceReport, SourceStatus};
use stumpage_transform::YearSpan;

pub fn print_summary(summary: &RunSummary) {
    if summary.written {
        println!("Output: {}", summary.output.display());
    } else {
        println!("Output: {} (dry run, not written)", summary.output.display());
    }
    if summary.existing_records > 0 {
        println!("Merged into {} existing records", summary.existing_records);
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Name"),
        header_cell("Kind"),
        header_cell("Status"),
        header_cell("Records"),
        header_cell("Skipped"),
        header_cell("Years"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Center);
    let mut total_records = 0usize;
    let mut total_skipped = 0usize;
    for source in &summary.sources {
        total_records += source.records;
        total_skipped += source.skipped;
        table.add_row(source_row(source));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} sources", summary.sources.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(summary.failed_sources(), Color::Red).add_attribute(Attribute::Bold),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        count_cell(total_skipped, Color::Yellow).add_attribute(Attribute::Bold),
        years_cell(summary.dataset.years),
    ]);
    println!("{table}");
    print_dataset_table(summary);
}

fn source_row(source: &SourceReport) -> Vec<Cell> {
    vec![
        Cell::new(&source.code)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(&source.name),
        dim_cell(source.kind),
        status_cell(&source.status),
        Cell::new(source.records),
        count_cell(source.skipped, Color::Yellow),
        years_cell(source.years),
    ]
}

fn print_dataset_table(summary: &RunSummary) {
    let dataset = &summary.dataset;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Unified records"), Cell::new(dataset.records)]);
    table.add_row(vec![Cell::new("With price"), Cell::new(dataset.with_price)]);
    table.add_row(vec![
        Cell::new("Converted to $/ton"),
        Cell::new(format!(
            "{} ({:.1}%)",
            dataset.converted,
            dataset.conversion_rate()
        )),
    ]);
    table.add_row(vec![
        Cell::new("Duplicates dropped"),
        count_cell(summary.duplicates_dropped, Color::Yellow),
    ]);
    for (unit, count) in &dataset.by_unit {
        table.add_row(vec![dim_cell(format!("  unit {unit}")), Cell::new(count)]);
    }
    println!();
    println!("Dataset:");
    println!("{table}");

    if dataset.by_product.is_empty() {
        return;
    }
    let mut products = Table::new();
    products.set_header(vec![
        header_cell("Product"),
        header_cell("Records"),
        header_cell("Mean $/ton"),
        header_cell("Median $/ton"),
    ]);
    apply_table_style(&mut products);
    align_column(&mut products, 1, CellAlignment::Right);
    align_column(&mut products, 2, CellAlignment::Right);
    align_column(&mut products, 3, CellAlignment::Right);
    for (product, count) in &dataset.by_product {
        let prices = dataset.price_per_ton_by_product.get(product);
        products.add_row(vec![
            Cell::new(product),
            Cell::new(count),
            price_cell(prices.map(|summary| summary.mean)),
            price_cell(prices.map(|summary| summary.median)),
        ]);
    }
    println!();
    println!("Products:");
    println!("{products}");
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

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: &SourceStatus) -> Cell {
    match status {
        SourceStatus::Ok => Cell::new("ok")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        SourceStatus::Empty => Cell::new("empty").fg(Color::Yellow),
        SourceStatus::Error(message) => Cell::new(format!("error: {message}")).fg(Color::Red),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn years_cell(years: Option<YearSpan>) -> Cell {
    match years {
        Some(span) if span.first == span.last => Cell::new(span.first),
        Some(span) => Cell::new(format!("{}-{}", span.first, span.last)),
        None => dim_cell("-"),
    }
}

fn price_cell(value: Option<f64>) -> Cell {
    match value {
        Some(price) => Cell::new(format!("{price:.2}")),
        None => dim_cell("-"),
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
