/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::path::PathBuf;
use std::{env, process};

use clap::Parser;
use log::debug;
use unit_algebra::{Quantity, UnitError, UnitSystem};

#[derive(Parser)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
/// Unit Calculator
///
/// Evaluates quantities with units, left to right, eg.
/// `unit_calc -t W "1 kJ/s" "*" "2 s" "/" "1 min"`.
struct Args {
    #[clap(long, short)]
    /// Convert the result to this unit.
    to: Option<String>,
    #[clap(long, short)]
    /// Output the result as JSON.
    json: bool,
    #[clap(long, short)]
    /// Load extra unit definitions from a JSON file.
    units: Option<PathBuf>,
    /// Increase verbosity. Log messages are sent to stderr.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbosity: u8,
    #[clap(required = true, allow_hyphen_values = true)]
    /// Quantities separated by operators (+, -, *, /, ^).
    expr: Vec<String>,
}

impl Args {
    fn init_logger(&self) {
        if let Err(e) = simplelog::TermLogger::init(
            match self.verbosity {
                0 => simplelog::LevelFilter::Warn,
                1 => simplelog::LevelFilter::Info,
                2 => simplelog::LevelFilter::Debug,
                3.. => simplelog::LevelFilter::Trace,
            },
            simplelog::ConfigBuilder::new().build(),
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        ) {
            eprintln!("Error: failed to initialize logging: {}", e);
            process::exit(1);
        }
    }
}

fn evaluate(
    system: &UnitSystem,
    expr: &[String],
    to: Option<&str>,
) -> Result<Quantity, UnitError> {
    let mut tokens = expr.iter();
    let first = tokens
        .next()
        .ok_or_else(|| UnitError::Parse(String::from("empty expression")))?;
    let mut result = Quantity::parse(first)?;

    while let Some(op) = tokens.next() {
        let operand = tokens.next().ok_or_else(|| {
            UnitError::Parse(format!("missing operand after {}", op))
        })?;
        result = match op.as_str() {
            "+" => system.add(&result, &Quantity::parse(operand)?)?,
            "-" => system.sub(&result, &Quantity::parse(operand)?)?,
            "*" | "x" => system.mul(&result, &Quantity::parse(operand)?)?,
            "/" => system.div(&result, &Quantity::parse(operand)?)?,
            "^" => {
                let n = operand.parse::<f64>().map_err(|_| {
                    UnitError::Parse(format!("invalid exponent: {}", operand))
                })?;
                system.powf(&result, n)?
            }
            _ => {
                return Err(UnitError::Parse(format!(
                    "unknown operator: {}",
                    op
                )))
            }
        };
        debug!("{} {} -> {}", op, operand, result);
    }

    match to {
        Some(unit) => system.convert(&result, unit),
        None => Ok(result),
    }
}

fn main() {
    let args = Args::parse();
    args.init_logger();

    let system = match &args.units {
        Some(path) => UnitSystem::with_definitions(path),
        None => Ok(UnitSystem::standard()),
    };

    match system.and_then(|s| evaluate(&s, &args.expr, args.to.as_deref())) {
        Ok(result) => match args.json {
            true => println!(
                "{}",
                serde_json::to_string(&result).expect("serialization failed!?")
            ),
            false => println!("{}", result),
        },
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1)
        }
    }
}
