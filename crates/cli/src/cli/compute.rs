use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use clap::Args;
use hpp::prelude::*;
use tracing::info;

use crate::{cli::write_line, report};

#[derive(Debug, Args)]
pub(crate) struct ComputeArgs {
    /// YAML form with the batch to cost
    #[arg(short, long)]
    input: PathBuf,

    /// Margin percentage, replacing the one in the form
    #[arg(short, long)]
    margin: Option<String>,

    /// Save the calculation to history
    #[arg(long)]
    save: bool,
}

pub(crate) fn run<S: KeyValueStore>(
    args: ComputeArgs,
    store: &mut HistoryStore<S>,
    out: &mut impl Write,
) -> Result<(), String> {
    let mut form = read_form(&args.input)?;

    if let Some(margin) = args.margin {
        form.margin_percent = margin;
    }

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            report::write_validation_errors(&mut *out, &errors)
                .map_err(|error| error.to_string())?;

            return Err(format!("{} is not a valid costing form", args.input.display()));
        }
    };

    let margin = input.margin_percent;
    let mut result = compute(input).map_err(|error| format!("failed to compute: {error}"))?;

    // An empty margin leaves the result unpriced
    if !form.margin_percent.trim().is_empty() {
        result = result
            .with_suggested_price(margin)
            .map_err(|error| format!("failed to price: {error}"))?;
    }

    report::write_result(&mut *out, &result).map_err(|error| error.to_string())?;

    if args.save {
        let record = store
            .save(result)
            .map_err(|error| format!("failed to save calculation: {error}"))?;

        info!(id = %record.id, "calculation saved");

        write_line(out, &format!("saved as {}", record.id))?;
    }

    Ok(())
}

fn read_form(path: &Path) -> Result<CostingForm, String> {
    let contents = fs::read_to_string(path)
        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;

    serde_norway::from_str(&contents)
        .map_err(|error| format!("failed to parse {}: {error}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io;

    use testresult::TestResult;

    use crate::cli::tests::{execute, execute_captured};

    use super::*;

    const BAKERY: &str = "\
productName: Roti Tawar
unitCount: 10
laborCost: 3000
marginPercent: 20
materialItems:
  - name: Tepung
    cost: 5000
  - name: Gula
    cost: 2000
overheadItems:
  - name: Listrik
    cost: 1000
";

    fn form_file(contents: &str) -> TestResult<tempfile::NamedTempFile> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;

        Ok(file)
    }

    fn path_of(file: &tempfile::NamedTempFile) -> TestResult<String> {
        Ok(file
            .path()
            .to_str()
            .ok_or_else(|| io::Error::other("temp path is not UTF-8"))?
            .to_string())
    }

    #[test]
    fn computes_and_prices_a_form() -> TestResult {
        let file = form_file(BAKERY)?;
        let mut store = HistoryStore::new(MemoryStore::new());

        let output = execute(&mut store, ["compute", "--input", &path_of(&file)?])?;

        assert!(output.contains("Suggested price (20% margin)"));
        assert!(store.list().is_empty(), "nothing saved without --save");

        Ok(())
    }

    #[test]
    fn save_flag_records_the_calculation() -> TestResult {
        let file = form_file(BAKERY)?;
        let mut store = HistoryStore::new(MemoryStore::new());

        let output = execute(
            &mut store,
            [
                "compute",
                "--input",
                &path_of(&file)?,
                "--margin",
                "150",
                "--save",
            ],
        )?;

        let records = store.list();
        let saved = records.first().ok_or_else(|| io::Error::other("no record"))?;

        assert!(output.contains(&format!("saved as {}", saved.id)));
        assert_eq!(
            saved.calculation.suggested_price,
            Some(rust_decimal::Decimal::from(2750))
        );

        Ok(())
    }

    #[test]
    fn invalid_form_reports_fields_and_fails() -> TestResult {
        let file = form_file("productName: ''\nunitCount: 0\nmarginPercent: 1500\n")?;
        let path = path_of(&file)?;
        let mut store = HistoryStore::new(MemoryStore::new());

        let (outcome, output) = execute_captured(&mut store, ["compute", "--input", &path])?;

        assert!(outcome.is_err(), "invalid form should fail");
        assert!(output.contains("productName: required"), "{output}");
        assert!(
            output.contains("unitCount: must be at least 1 unit"),
            "{output}"
        );
        assert!(
            output.contains("marginPercent: margin must be a number between 0 and 1000"),
            "{output}"
        );
        assert!(store.list().is_empty(), "nothing saved for an invalid form");

        Ok(())
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let mut store = HistoryStore::new(MemoryStore::new());

        let result = execute(&mut store, ["compute", "--input", "/nonexistent/form.yml"]);

        assert!(result.is_err(), "missing file should fail");
    }
}
