use clap::Args;
use ipgeo::lens::utils::OutputFormat;
use ipgeo::lens::validate::FormatCheck;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Arguments for the Validate command
#[derive(Args)]
pub struct ValidateArgs {
    /// Texts to check
    #[clap(required = true, value_name = "TEXT")]
    pub inputs: Vec<String>,
}

#[derive(Serialize, Tabled)]
struct CheckRow {
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Valid")]
    valid: bool,
    #[tabled(rename = "Format")]
    format: String,
}

impl From<&FormatCheck> for CheckRow {
    fn from(check: &FormatCheck) -> Self {
        CheckRow {
            input: check.input.clone(),
            valid: check.valid,
            format: check
                .format
                .map(|f| f.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Prints one row per input; fails when any input is not a well-formed address
pub fn run(args: ValidateArgs, output_format: OutputFormat) -> bool {
    let checks: Vec<FormatCheck> = args.inputs.iter().map(|s| FormatCheck::new(s)).collect();
    let all_valid = checks.iter().all(|c| c.valid);

    match output_format {
        OutputFormat::Json => match serde_json::to_string(&checks) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing checks: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(&checks) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing checks: {}", e),
        },
        OutputFormat::JsonLine => {
            for check in &checks {
                match serde_json::to_string(check) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Error serializing check: {}", e),
                }
            }
        }
        OutputFormat::Psv => {
            println!("input|valid|format");
            for row in checks.iter().map(CheckRow::from) {
                println!("{}|{}|{}", row.input, row.valid, row.format);
            }
        }
        OutputFormat::Text => {
            for row in checks.iter().map(CheckRow::from) {
                println!("{}: {}", row.input, if row.valid { row.format } else { "invalid".to_string() });
            }
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            let rows: Vec<CheckRow> = checks.iter().map(CheckRow::from).collect();
            let mut table = Table::new(rows);
            match output_format {
                OutputFormat::Markdown => table.with(Style::markdown()),
                _ => table.with(Style::rounded()),
            };
            println!("{}", table);
        }
    }

    all_valid
}
