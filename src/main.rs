use clap::{Parser, Subcommand};
use pgm_demand::config::{Config, OutputFormat};
use pgm_demand::dim::{self, UnitFormatter};
use pgm_demand::formula::{self, Environment, Evaluator};
use pgm_demand::notebook::{self, Notebook};
use std::collections::HashMap;

#[derive(Parser)]
#[command(name = "pgm-demand")]
#[command(about = "Precious-metal demand estimates for PEM electrolysis", long_about = None)]
struct Cli {
    /// Settings file (display precision, preferred units)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log more detail (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every problem of a notebook
    Run {
        /// Notebook file (default: built-in PEM notebook)
        #[arg(short, long)]
        notebook: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Override a constant, e.g. --set "platinum_loading=0.5 mg/cm^2"
        #[arg(long = "set", value_name = "NAME=VALUE")]
        overrides: Vec<String>,
    },

    /// List the constants of a notebook with their citations
    Constants {
        /// Notebook file (default: built-in PEM notebook)
        #[arg(short, long)]
        notebook: Option<String>,

        /// Print the constants as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate an expression against a notebook's constants and results
    Eval {
        /// Expression (e.g., "iridium_production / iridium_loading")
        expression: String,

        /// Unit to express the result in
        #[arg(long)]
        to: Option<String>,

        /// Notebook file (default: built-in PEM notebook)
        #[arg(short, long)]
        notebook: Option<String>,

        /// Override a constant before evaluating
        #[arg(long = "set", value_name = "NAME=VALUE")]
        overrides: Vec<String>,
    },

    /// Convert a quantity to another unit
    Convert {
        /// Quantity (e.g., "1500 GW")
        quantity: String,

        /// Target unit (e.g., "TW")
        unit: String,
    },

    /// Show the dimension of a quantity
    Dimension {
        /// Quantity (e.g., "2 mg/cm^2")
        quantity: String,

        /// Fail unless the quantity has this named dimension
        #[arg(long)]
        expect: Option<String>,
    },

    /// List known unit symbols and dimension names
    Units,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Run {
            notebook,
            json,
            overrides,
        } => run_notebook(&config, notebook.as_deref(), json, &overrides),
        Commands::Constants { notebook, json } => {
            list_constants(&config, notebook.as_deref(), json)
        }
        Commands::Eval {
            expression,
            to,
            notebook,
            overrides,
        } => eval_expression(
            &config,
            &expression,
            to.as_deref(),
            notebook.as_deref(),
            &overrides,
        ),
        Commands::Convert { quantity, unit } => convert_quantity(&config, &quantity, &unit),
        Commands::Dimension { quantity, expect } => {
            show_dimension(&quantity, expect.as_deref())
        }
        Commands::Units => list_units(),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Config::load_from_file(path),
        None => Ok(Config::empty()),
    }
}

fn load_notebook(path: Option<&str>) -> Result<Notebook, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(notebook::builtin_notebook()?);
    };

    let (notebook, validation) = notebook::load_notebook_from_file(path)?;

    if validation.has_issues() {
        log::info!(
            "Notebook {}: {} error(s), {} warning(s)",
            path,
            validation.errors.len(),
            validation.warnings.len()
        );
        validation.log_issues();
    }
    if !validation.is_valid() {
        return Err(format!("Notebook {} has {} error(s)", path, validation.errors.len()).into());
    }

    Ok(notebook)
}

fn parse_overrides(
    assignments: &[String],
) -> Result<HashMap<String, dim::Quantity>, Box<dyn std::error::Error>> {
    let mut overrides = HashMap::new();
    for assignment in assignments {
        let (name, quantity) = formula::parse_assignment(assignment)?;
        overrides.insert(name, quantity);
    }
    Ok(overrides)
}

fn environment_for(
    notebook: &Notebook,
    assignments: &[String],
) -> Result<Environment, Box<dyn std::error::Error>> {
    let overrides = parse_overrides(assignments)?;
    for name in overrides.keys() {
        if notebook.constant(name).is_none() {
            log::warn!("Override '{}' does not match any constant", name);
        }
    }
    let env = Environment::from_notebook(notebook).with_overrides(overrides);
    log::debug!("Scope chain: {:?}", env.scope_chain());
    Ok(env)
}

fn run_notebook(
    config: &Config,
    path: Option<&str>,
    json: bool,
    assignments: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let notebook = load_notebook(path)?;
    let env = environment_for(&notebook, assignments)?;
    let report = formula::run_notebook(&notebook, env);

    let formatter = UnitFormatter::new(config.unit_preferences());
    if json || config.output.format == OutputFormat::Json {
        println!("{}", formula::format_json(&report, &formatter)?);
    } else {
        print!("{}", formula::format_text(&report, &formatter));
    }

    let failures = report.failures();
    if failures > 0 {
        return Err(format!("{} of {} problem(s) failed", failures, report.outcomes.len()).into());
    }

    Ok(())
}

fn list_constants(
    config: &Config,
    path: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let notebook = load_notebook(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&notebook.constants)?);
        return Ok(());
    }
    let formatter = UnitFormatter::new(config.unit_preferences());

    println!("{}", notebook.title);
    println!("\nConstants ({}):", notebook.constants.len());
    for constant in &notebook.constants {
        println!(
            "  - {} = {}",
            constant.name,
            formatter.display(&constant.quantity)
        );
        if let Some(citation) = &constant.citation {
            println!("      source: {}", citation);
        }
        if let Some(note) = &constant.note {
            println!("      note: {}", note);
        }
    }

    Ok(())
}

fn eval_expression(
    config: &Config,
    expression: &str,
    to: Option<&str>,
    path: Option<&str>,
    assignments: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let notebook = load_notebook(path)?;
    let env = environment_for(&notebook, assignments)?;

    // Results of the notebook's problems are in scope too
    let mut evaluator = Evaluator::new(env);
    let report = evaluator.run(&notebook);
    if report.failures() > 0 {
        log::warn!("{} problem(s) failed; their names are unavailable", report.failures());
    }

    let value = evaluator.evaluate_expression(expression)?;
    let value = match to {
        Some(unit) => value.convert_to(&dim::parse_unit(unit)?)?,
        None => value,
    };

    let formatter = UnitFormatter::new(config.unit_preferences());
    println!("{}", formatter.display(&value));
    Ok(())
}

fn convert_quantity(
    config: &Config,
    quantity: &str,
    unit: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let quantity = dim::parse_quantity(quantity)?;
    let converted = quantity.convert_to(&dim::parse_unit(unit)?)?;

    let formatter = UnitFormatter::new(config.unit_preferences());
    println!(
        "{} = {}",
        formatter.display(&quantity),
        formatter.display(&converted)
    );
    Ok(())
}

fn show_dimension(quantity: &str, expect: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let quantity = dim::parse_quantity(quantity)?;
    if let Some(expected) = expect {
        dim::validate_dimension(&quantity, expected)?;
    }

    let dimension = quantity.dimension();
    println!("Quantity: {}", quantity);
    println!("Dimension: {}", dim::get_dimension(&quantity));
    println!("Signature: {}", dimension.signature());
    println!("SI value: {}", quantity.to_base_units());
    Ok(())
}

fn list_units() -> Result<(), Box<dyn std::error::Error>> {
    println!("Units:");
    for symbol in dim::units::known_symbols() {
        let atom = dim::units::lookup_atom(symbol)
            .ok_or_else(|| format!("Unit table entry '{}' does not resolve", symbol))?;
        println!(
            "  - {} ({}) = {} {}",
            symbol,
            dim::units::unit_name(symbol).unwrap_or(symbol),
            atom.factor,
            atom.dimension.signature()
        );
    }

    println!("\nDimensions:");
    for name in dim::validator::dimension_names() {
        if let Some(dimension) = dim::validator::dimension_by_name(name) {
            println!("  - {} {}", name, dimension.signature());
        }
    }

    Ok(())
}
