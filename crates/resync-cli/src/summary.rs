//! Run summaries printed after a command finishes.

use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{DiscoverOutcome, SyncOutcome};

pub fn print_sync_summary(outcome: &SyncOutcome) {
    println!("Output: {}", outcome.output_dir.display());
    if outcome.dry_run {
        println!("Dry run: no files were written.");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Batch"),
        header_cell("Records"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let batches: [(&str, usize); 5] = [
        ("Organisations", outcome.counts.organizations),
        ("Organisation Attributes", outcome.counts.org_attributes),
        ("Phones", outcome.counts.contacts),
        ("Addresses", outcome.counts.addresses),
        ("Custom Fields", outcome.counts.custom_fields),
    ];
    let mut total = 0usize;
    for (index, (name, count)) in batches.iter().enumerate() {
        total += count;
        table.add_row(vec![
            Cell::new(name).fg(Color::Blue),
            count_cell(*count),
            file_cell(outcome.files.get(index)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn print_discover_summary(outcome: &DiscoverOutcome) {
    println!("Proposed links: {}", outcome.candidates);
    println!("File: {}", outcome.output_file.display());
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn file_cell(path: Option<&PathBuf>) -> Cell {
    match path {
        Some(path) => Cell::new(path.display()),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
