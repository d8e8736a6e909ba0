use std::fs;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::info;

use bunsen_cli::replay::{action_list, read_json, registry_with, replay, validate_value};
use bunsen_core::{RendererRegistry, Validation, resolve_widget_name};
use bunsen_model::{FormOptions, ValidationIssue};

use crate::cli::{ReduceArgs, ValidateArgs, WidgetArgs};

pub fn run_reduce(args: &ReduceArgs) -> Result<()> {
    let model = read_json(&args.model)?;
    let actions = action_list(read_json(&args.actions)?)?;
    let initial = args.initial.as_deref().map(read_json).transpose()?;
    let options = FormOptions::default()
        .with_validate_on_change(args.validate)
        .with_apply_defaults(!args.no_defaults);

    let outcome = replay(model, initial, &actions, options)?;
    let rendered = serde_json::to_string_pretty(&outcome.state.to_json())?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "state written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

pub fn run_validate(args: &ValidateArgs) -> Result<Validation> {
    let model = read_json(&args.model)?;
    let value = read_json(&args.value)?;
    let validation = validate_value(&model, &value)?;
    print_issues(&validation);
    Ok(validation)
}

pub fn run_widget(args: &WidgetArgs) -> Result<()> {
    let extra = args.registry.as_deref().map(read_json).transpose()?;
    let registry = registry_with(extra)?;
    let editable = args.not_editable.then_some(false);
    let widget = resolve_widget_name(
        args.renderer.as_deref(),
        editable,
        args.field_type.as_deref(),
        args.read_only,
        !args.dependency_unmet,
        &registry,
    )?;
    match widget {
        Some(widget) => println!("{widget}"),
        None => println!("(none)"),
    }
    Ok(())
}

pub fn run_renderers() -> Result<()> {
    let registry = RendererRegistry::builtin();
    let mut table = Table::new();
    table.set_header(vec![header_cell("Name"), header_cell("Widget")]);
    apply_table_style(&mut table);
    for (name, widget) in registry.iter() {
        table.add_row(vec![name, widget]);
    }
    println!("{table}");
    Ok(())
}

fn print_issues(validation: &Validation) {
    let result = &validation.result;
    if result.is_valid() {
        println!("Value is valid.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for issue in &result.errors {
        table.add_row(issue_row(issue, Cell::new("error").fg(Color::Red)));
    }
    for issue in &result.warnings {
        table.add_row(issue_row(issue, Cell::new("warning").fg(Color::Yellow)));
    }
    println!("{table}");
    println!(
        "{} error(s), {} warning(s)",
        result.error_count(),
        result.warning_count()
    );
}

fn issue_row(issue: &ValidationIssue, severity: Cell) -> Vec<Cell> {
    vec![
        severity,
        Cell::new(&issue.path),
        Cell::new(&issue.message),
    ]
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
