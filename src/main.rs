//! Resisto - resistor circuit analyzer
//!
//! Classifies a circuit layout and reports its equivalent resistance,
//! current and power, or evaluates a Wheatstone bridge.
//!
//! # Usage
//!
//! ```bash
//! resisto analyze divider.cir
//! resisto analyze divider.cir --json --tolerance 30 -vv
//! resisto bridge --r1 100 --r2 200 --r3 150 --rx 300
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use resisto_core::{
    analysis::{AnalysisResult, AnalyzerConfig},
    bridge::{WheatstoneBridge, BALANCE_TOLERANCE},
    circuit::CircuitState,
    dsl,
    error::Result,
};
use tracing::{debug, info, warn, Level};

/// Resistor circuit topology analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a layout file and compute R, I and P
    Analyze {
        /// Path to the circuit layout file (.cir)
        #[arg(value_name = "CIRCUIT_FILE")]
        circuit_file: PathBuf,

        /// Print the result record as JSON
        #[arg(long)]
        json: bool,

        /// Row tolerance for the layout hint (overrides `.tolerance`)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Evaluate a Wheatstone bridge
    Bridge {
        #[arg(long, default_value_t = 100.0)]
        r1: f64,
        #[arg(long, default_value_t = 200.0)]
        r2: f64,
        #[arg(long, default_value_t = 150.0)]
        r3: f64,
        #[arg(long, default_value_t = 300.0)]
        rx: f64,

        /// Balance tolerance in ohms
        #[arg(long, default_value_t = BALANCE_TOLERANCE)]
        tolerance: f64,

        /// Print the balance report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_report(state: &CircuitState, result: &AnalysisResult) {
    let parts: Vec<String> = state
        .components()
        .iter()
        .map(|c| format!("{} {}", c.id, c.value_label()))
        .collect();
    println!("Components:   {}", parts.join(", "));
    println!("Circuit type: {}", result.circuit_type);
    println!("Resistance:   {}", result.resistance_label());
    println!("Current:      {}", result.current_label());
    println!("Power:        {}", result.power_label());
    println!("Formula:      {}", result.formula());
    println!();
    println!("{}", result.analysis_text);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Analyze {
            circuit_file,
            json,
            tolerance,
        } => {
            let ast = dsl::parse_file(&circuit_file)?;
            let mut config: AnalyzerConfig = ast.analyzer_config();
            if let Some(tolerance) = tolerance {
                config = config.with_row_tolerance(tolerance);
            }

            let mut state = CircuitState::from_ast(ast)?;
            info!(
                file = %circuit_file.display(),
                resistors = state.resistors().count(),
                sources = state.voltage_sources().count(),
                wires = state.connections().len(),
                "loaded layout"
            );
            let graph = state.rebuild_graph();
            debug!(
                terminals = graph.terminal_count(),
                edges = graph.edge_count(),
                "connectivity graph"
            );

            let result = state.analyze(&config);
            if result.circuit_type.is_error() {
                warn!(circuit_type = %result.circuit_type, "circuit is not ready for analysis");
            }
            if json {
                println!("{}", result.to_json()?);
            } else {
                print_report(&state, &result);
            }
        }
        Command::Bridge {
            r1,
            r2,
            r3,
            rx,
            tolerance,
            json,
        } => {
            let balance = WheatstoneBridge::new(r1, r2, r3, rx)?.solve_with_tolerance(tolerance);
            if json {
                println!("{}", serde_json::to_string_pretty(&balance)?);
            } else {
                println!("{}", balance);
            }
        }
    }

    Ok(())
}
