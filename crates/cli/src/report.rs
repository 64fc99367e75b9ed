//! Report

use std::io;

use hpp::prelude::*;
use jiff::tz::TimeZone;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub(crate) enum ReportError {
    /// Output could not be written.
    #[error("failed to write report: {0}")]
    IO(#[from] io::Error),
}

/// Format an amount as whole rupiah.
pub(crate) fn rupiah(amount: Decimal) -> String {
    let whole = amount.round_dp(0);

    whole
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .map_or_else(
            || format!("Rp{whole}"),
            |minor| Money::from_minor(minor, iso::IDR).to_string(),
        )
}

/// Write the line items and cost summary of a calculation.
pub(crate) fn write_result(
    mut out: impl io::Write,
    result: &CostingResult,
) -> Result<(), ReportError> {
    let input = &result.input;

    writeln!(out, "\n{} ({} units)", input.product_name, input.unit_count)?;

    write_items_table(&mut out, result)?;
    write_summary_table(&mut out, result)?;

    Ok(())
}

fn write_items_table(out: &mut impl io::Write, result: &CostingResult) -> Result<(), ReportError> {
    let input = &result.input;

    let mut builder = Builder::default();
    builder.push_record(["Group", "Item", "Cost"]);

    for item in &input.material_items {
        builder.push_record(["Material", item.name(), &rupiah(item.cost())]);
    }

    if !input.labor_cost.is_zero() {
        builder.push_record(["Labor", "Direct labor", &rupiah(input.labor_cost)]);
    }

    for item in &input.overhead_items {
        builder.push_record(["Overhead", item.name(), &rupiah(item.cost())]);
    }

    let mut table = builder.build();
    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn write_summary_table(
    out: &mut impl io::Write,
    result: &CostingResult,
) -> Result<(), ReportError> {
    let composition = result.composition().rounded();

    let mut builder = Builder::default();
    builder.push_record(["", "Amount", "Share"]);
    builder.push_record([
        "Raw materials (BB)".to_string(),
        rupiah(result.total_material),
        format!("{}%", composition.material),
    ]);
    builder.push_record([
        "Direct labor (BTKL)".to_string(),
        rupiah(result.input.labor_cost),
        format!("{}%", composition.labor),
    ]);
    builder.push_record([
        "Overhead (BOP)".to_string(),
        rupiah(result.total_overhead),
        format!("{}%", composition.overhead),
    ]);
    builder.push_record([
        "Production cost (HPP)".to_string(),
        rupiah(result.total_production_cost),
        String::new(),
    ]);
    builder.push_record([
        "HPP per unit".to_string(),
        rupiah(result.cost_per_unit),
        String::new(),
    ]);

    if let Some(price) = result.suggested_price {
        builder.push_record([
            format!("Suggested price ({}% margin)", result.input.margin_percent.normalize()),
            rupiah(price),
            String::new(),
        ]);
    }

    let mut table = builder.build();
    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..3), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write saved records as a table, most recent first.
pub(crate) fn write_history(
    mut out: impl io::Write,
    records: &[HistoryRecord],
) -> Result<(), ReportError> {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Saved", "Product", "Units", "HPP / unit", "Price"]);

    for record in records {
        let calculation = &record.calculation;

        builder.push_record([
            record.id.to_string(),
            record
                .saved_at
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M")
                .to_string(),
            calculation.input.product_name.clone(),
            calculation.input.unit_count.to_string(),
            rupiah(calculation.cost_per_unit),
            calculation
                .suggested_price
                .map_or_else(|| "-".to_string(), rupiah),
        ]);
    }

    let mut table = builder.build();
    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write validation failures, one field per line.
pub(crate) fn write_validation_errors(
    mut out: impl io::Write,
    errors: &ValidationErrors,
) -> Result<(), ReportError> {
    writeln!(out, "input has {} invalid field(s):", errors.len())?;

    for (field, error) in errors.iter() {
        writeln!(out, "  {field}: {error}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use super::*;

    fn bakery() -> TestResult<CostingResult> {
        let input = CostingInput::new("Roti Tawar", 10)
            .with_material("Tepung", Decimal::from(5000))
            .with_material("Gula", Decimal::from(2000))
            .with_labor_cost(Decimal::from(3000))
            .with_overhead("Listrik", Decimal::from(1000));

        Ok(compute_at(input, Timestamp::UNIX_EPOCH)?)
    }

    #[test]
    fn rupiah_rounds_to_whole_amounts() {
        let formatted = rupiah(Decimal::new(1_375_49, 2));

        assert!(formatted.contains("Rp"), "{formatted}");
        assert!(formatted.contains("375"), "{formatted}");
        assert!(!formatted.contains("49"), "{formatted}");
    }

    #[test]
    fn result_report_lists_items_and_totals() -> TestResult {
        let mut out = Vec::new();

        write_result(&mut out, &bakery()?)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Roti Tawar (10 units)"));
        assert!(text.contains("Tepung"));
        assert!(text.contains("Direct labor"));
        assert!(text.contains("Listrik"));
        assert!(text.contains("Production cost (HPP)"));
        assert!(text.contains("63.64%"));
        assert!(!text.contains("Suggested price"));

        Ok(())
    }

    #[test]
    fn priced_result_shows_margin() -> TestResult {
        let mut out = Vec::new();

        write_result(&mut out, &bakery()?.with_suggested_price(Decimal::from(20))?)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Suggested price (20% margin)"));

        Ok(())
    }

    #[test]
    fn history_report_has_a_row_per_record() -> TestResult {
        let mut store = HistoryStore::new(MemoryStore::new());
        store.save_at(bakery()?, Timestamp::UNIX_EPOCH)?;

        let mut out = Vec::new();

        write_history(&mut out, &store.list())?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Roti Tawar"));
        assert!(text.contains("HPP / unit"));

        Ok(())
    }

    #[test]
    fn validation_errors_are_listed_by_field() -> TestResult {
        let form = CostingForm {
            unit_count: "0".to_string(),
            ..CostingForm::default()
        };

        let result = form.validate();
        assert!(result.is_err());

        let errors = result.err().unwrap_or_default();

        let mut out = Vec::new();

        write_validation_errors(&mut out, &errors)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("productName: required"));
        assert!(text.contains("unitCount: must be at least 1 unit"));

        Ok(())
    }
}
