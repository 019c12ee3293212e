use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use plotdeck::data::example::{example_workbook, EXAMPLE_TITLE};
use plotdeck::data::loader::load_file;
use plotdeck::state::graph_state::{ColumnRole, Dimensionality};
use plotdeck::{GraphSession, SessionConfig};

#[derive(Parser)]
#[command(name = "plotdeck")]
#[command(about = "Build plot descriptors from spreadsheet data", long_about = None)]
struct Cli {
    /// CSV or Excel file; the built-in example data when omitted
    input: Option<PathBuf>,
    /// Sheet to plot instead of the first one
    #[arg(long)]
    sheet: Option<String>,
    /// Session config (JSON); defaults when omitted, an error when missing
    #[arg(long)]
    config: Option<PathBuf>,
    /// Graph dimensionality
    #[arg(long, value_enum)]
    dimension: Option<DimensionArg>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DimensionArg {
    #[value(name = "2d")]
    TwoD,
    #[value(name = "2d-color")]
    TwoDColor,
    #[value(name = "3d")]
    ThreeD,
    #[value(name = "3d-color")]
    ThreeDColor,
}

impl From<DimensionArg> for Dimensionality {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::TwoD => Dimensionality::TwoD,
            DimensionArg::TwoDColor => Dimensionality::TwoDColor,
            DimensionArg::ThreeD => Dimensionality::ThreeD,
            DimensionArg::ThreeDColor => Dimensionality::ThreeDColor,
        }
    }
}

fn run(cli: Cli) -> Result<String, String> {
    let config = match &cli.config {
        Some(path) => {
            SessionConfig::from_json_file(path).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    let quiet = config.quiet_period_ms;
    let mut session = GraphSession::new(config);

    let (workbook, example) = match &cli.input {
        Some(path) => (load_file(path).map_err(|e| e.to_string())?, false),
        None => (example_workbook(), true),
    };
    let id = session
        .load_workbook(workbook)
        .ok_or_else(|| "no sheets to plot".to_string())?;

    if let Some(sheet) = &cli.sheet {
        if !session.set_sheet(id, sheet) {
            return Err(format!("sheet \"{sheet}\" not found"));
        }
    }

    let dimension = match (cli.dimension, example) {
        (Some(arg), _) => Some(Dimensionality::from(arg)),
        (None, true) => Some(Dimensionality::ThreeDColor),
        (None, false) => None,
    };
    if let Some(dim) = dimension {
        session.set_dimensionality(id, dim);
    }
    if example {
        session.set_column(id, ColumnRole::Color, Some("Amplitude"));
        session.set_title(id, EXAMPLE_TITLE);
        session.advance(quiet);
    }

    let outcome = session
        .render(id)
        .ok_or_else(|| "graph disappeared".to_string())?;
    info!(traces = outcome.traces.len(), warnings = outcome.warnings.len(), "rendered");

    let json = if cli.pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    };
    json.map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the descriptor.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match run(Cli::parse()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
