use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::info_span;

use oims_cli::pipeline::{
    RunOptions, RunResult, load_mapping, load_registry, resolve_ids, run_conversion,
    validate_inputs,
};
use oims_cli::settings::{MappingFormat, Settings};
use oims_ingest::{Workbook, read_json_document};
use oims_map::compile_mapping_file;
use oims_model::SchemaDocument;
use oims_transform::{MapperIds, default_registry};
use oims_validate::{SheetPolicy, validate_workbook};

use crate::cli::{CompileMappingArgs, MappersArgs, ResolveArgs, RunArgs, ValidateArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell, status_cell};

pub fn run_run(args: &RunArgs) -> Result<RunResult> {
    let settings = Settings::load(&args.settings).context("load settings")?;
    let options = RunOptions {
        output_path: args.output.clone(),
        report_path: args.report.clone(),
        dry_run: args.dry_run,
        write_compiled_mapping: !args.no_write_compiled_mapping,
    };
    run_conversion(&settings, &options)
}

pub fn run_compile_mapping(args: &CompileMappingArgs) -> Result<()> {
    let _span = info_span!("compile_mapping", path = %args.mapping.display()).entered();
    let compiled = compile_mapping_file(&args.mapping, args.output.as_deref())
        .context("compile mapping workbook")?;
    let written = compiled.write().context("write compiled mapping")?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Section"),
        header_cell("Orientation"),
        header_cell("Pairs"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for mapping in &compiled.document.content {
        table.add_row(vec![
            Cell::new(&mapping.sheetname),
            Cell::new(&mapping.oims_section),
            Cell::new(&mapping.table_orientation),
            Cell::new(mapping.attribute_pairs.len()),
        ]);
    }
    println!("{table}");
    if let Some(path) = written {
        println!("Compiled mapping: {}", path.display());
    }
    Ok(())
}

pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let format = MappingFormat::from_path(&args.mapping)
        .ok_or_else(|| anyhow!("unsupported mapping file: {}", args.mapping.display()))?;
    let workbook = Workbook::open(&args.workbook).context("open workbook")?;
    let (mapping, _) = load_mapping(&args.mapping, format, false)?;
    let policy = SheetPolicy::new(args.allow_missing.iter().cloned(), args.skip.iter().cloned());

    let mut table = Table::new();
    table.set_header(vec![header_cell("Check"), header_cell("Result")]);
    apply_table_style(&mut table);

    match &args.schema {
        Some(path) => {
            let schema: SchemaDocument = read_json_document(path).context("load metadata schema")?;
            let (summary, checked) = validate_inputs(&workbook, &mapping, &schema, &policy)?;
            table.add_row(vec![
                Cell::new("Workbook vs. mapping"),
                status_cell(format!(
                    "{} sheets, {} labels",
                    summary.sheets_checked, summary.labels_checked
                )),
            ]);
            table.add_row(vec![
                Cell::new("Mapping vs. schema"),
                status_cell(format!("{checked} attribute ids")),
            ]);
        }
        None => {
            let summary = validate_workbook(&workbook, &mapping, &policy)
                .context("workbook does not match mapping")?;
            table.add_row(vec![
                Cell::new("Workbook vs. mapping"),
                status_cell(format!(
                    "{} sheets, {} labels",
                    summary.sheets_checked, summary.labels_checked
                )),
            ]);
            table.add_row(vec![Cell::new("Mapping vs. schema"), dim_cell("not run")]);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let ids = MapperIds::new(&args.mapping_id, &args.classification_id, &args.schema_id);
    let resolution = resolve_ids(&ids, args.registry.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Mapping id"), Cell::new(&ids.mapping_id)]);
    table.add_row(vec![
        Cell::new("Classification id"),
        Cell::new(&ids.classification_id),
    ]);
    table.add_row(vec![Cell::new("Schema id"), Cell::new(&ids.schema_id)]);
    table.add_row(vec![Cell::new("Strategy"), status_cell(&resolution.strategy)]);
    table.add_row(vec![Cell::new("Rule"), Cell::new(resolution.rule)]);
    table.add_row(vec![
        Cell::new("Generic conversion"),
        Cell::new(resolution.generic_conversion),
    ]);
    println!("{table}");
    Ok(())
}

pub fn run_mappers(args: &MappersArgs) -> Result<()> {
    let config = load_registry(args.registry.as_deref())?;
    let strategies = default_registry();

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Key"),
        header_cell("Strategy"),
    ]);
    apply_table_style(&mut table);
    for (mapping_id, strategy) in &config.known_mappings {
        table.add_row(vec![
            Cell::new("mapping"),
            Cell::new(mapping_id),
            strategy_cell(strategy, strategies.contains(strategy)),
        ]);
    }
    for combination in &config.combinations {
        table.add_row(vec![
            Cell::new("combination"),
            Cell::new(format!(
                "{} + {}",
                combination.classification_id, combination.schema_id
            )),
            strategy_cell(
                &combination.strategy,
                strategies.contains(&combination.strategy),
            ),
        ]);
    }
    table.add_row(vec![
        Cell::new("fallback"),
        dim_cell("-"),
        strategy_cell(&config.fallback, strategies.contains(&config.fallback)),
    ]);
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec![header_cell("Strategy"), header_cell("Description")]);
    apply_table_style(&mut table);
    for strategy in strategies.iter() {
        table.add_row(vec![
            Cell::new(strategy.name()),
            Cell::new(strategy.description()),
        ]);
    }
    println!();
    println!("Implemented strategies:");
    println!("{table}");
    Ok(())
}

fn strategy_cell(name: &str, implemented: bool) -> Cell {
    if implemented {
        Cell::new(name)
    } else {
        Cell::new(format!("{name} (not implemented)")).fg(comfy_table::Color::Red)
    }
}
