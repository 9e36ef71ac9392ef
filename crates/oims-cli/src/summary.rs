use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use oims_cli::pipeline::RunResult;

pub fn print_summary(result: &RunResult) {
    println!(
        "Strategy: {} ({}{})",
        result.strategy,
        result.rule,
        if result.generic_conversion {
            ", generic conversion"
        } else {
            ""
        }
    );
    match &result.paths.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: not written (dry run)"),
    }
    if let Some(path) = &result.paths.compiled_mapping {
        println!("Compiled mapping: {}", path.display());
    }
    if let Some(path) = &result.paths.report {
        println!("Report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Section"),
        header_cell("Entities"),
        header_cell("Properties"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut total_entities = 0usize;
    let mut total_properties = 0usize;
    for sheet in &result.sheets {
        total_entities += sheet.entities;
        total_properties += sheet.properties;
        table.add_row(vec![
            Cell::new(&sheet.sheet)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&sheet.section),
            count_cell(sheet.entities),
            count_cell(sheet.properties),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_entities).add_attribute(Attribute::Bold),
        Cell::new(total_properties).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn status_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::Green)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}
