//! Table rendering for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use varcur_config::AppConfig;
use varcur_ingest::ImportJob;
use varcur_state::{CodeCategory, code_category, upgrade_downgrade_code};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn flag_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn category_label(category: Option<CodeCategory>) -> &'static str {
    match category {
        Some(CodeCategory::Pathogenic) => "pathogenic",
        Some(CodeCategory::Benign) => "benign",
        None => "other",
    }
}

pub fn classification_table(config: &AppConfig) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Value"),
        header_cell("Name"),
        header_cell("Outdated after"),
        header_cell("Report"),
        header_cell("Findings"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for option in &config.classification.options {
        let outdated = match option.outdated_after_days {
            Some(days) => Cell::new(format!("{days} days")),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&option.value).add_attribute(Attribute::Bold),
            Cell::new(&option.name),
            outdated,
            flag_cell(option.include_report),
            flag_cell(option.include_analysis_with_findings),
        ]);
    }
    table
}

pub fn acmg_orderings_table(config: &AppConfig) -> Table {
    let codes = &config.acmg.codes;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Category"), header_cell("Strengths")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new("pathogenic"),
        Cell::new(format!("{} (strongest first)", codes.pathogenic.join(" > "))),
    ]);
    table.add_row(vec![
        Cell::new("benign"),
        Cell::new(format!("{} (weakest first)", codes.benign.join(" < "))),
    ]);
    if !codes.other.is_empty() {
        table.add_row(vec![Cell::new("other"), Cell::new(codes.other.join(", "))]);
    }
    table
}

/// One row per code: its category and the result of one upgrade and one
/// downgrade step.
pub fn acmg_code_table(codes: &[String], config: &AppConfig) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Category"),
        header_cell("Upgrade"),
        header_cell("Downgrade"),
    ]);
    apply_table_style(&mut table);
    for code in codes {
        let step = |upgrade: bool| {
            let next = upgrade_downgrade_code(code, config, upgrade);
            if &next == code { dim_cell(next) } else { Cell::new(next) }
        };
        table.add_row(vec![
            Cell::new(code).add_attribute(Attribute::Bold),
            Cell::new(category_label(code_category(code, config))),
            step(true),
            step(false),
        ]);
    }
    table
}

pub fn import_job_table(job: &ImportJob) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Variant"),
        header_cell("Genotype"),
        header_cell("Include"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, line) in job.parsed.variant_data_lines.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&line.display),
            flag_cell(line.has_genotype),
            flag_cell(line.include),
        ]);
    }
    table
}

/// Heading printed above each job's table.
pub fn import_job_heading(index: usize, job: &ImportJob) -> String {
    format!(
        "Job {}: {} ({}, {} of {} lines included)",
        index + 1,
        job.data.display_name(),
        job.parsed.dialect,
        job.included_count(),
        job.parsed.variant_data_lines.len()
    )
}
