use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use st_core::{Dimension, UnitSystem};
use st_state::{Axis, Property, Region, State};
use st_tables::TableStore;
use tracing::info;

mod error;

use error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "st-cli")]
#[command(about = "Steam tables - water/steam state lookup", long_about = None)]
struct Cli {
    /// YAML file with the display unit system (temperature, pressure, mass, volume, energy)
    #[arg(long, global = true)]
    units: Option<PathBuf>,
    /// Inline unit overrides, e.g. "temperature=K,pressure=bar"
    #[arg(long, global = true, conflicts_with = "units")]
    unit_system: Option<String>,
    /// Directory with saturated.json, superheated.json and subcooled.json
    #[arg(long, global = true)]
    tables: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a state from two inputs
    State(StateArgs),
    /// Show the tabulated ranges
    Avail,
}

#[derive(Args)]
struct StateArgs {
    /// Temperature
    #[arg(short = 'T', long)]
    temperature: Option<f64>,
    /// Pressure
    #[arg(short = 'P', long)]
    pressure: Option<f64>,
    /// Vapor quality (0 to 1)
    #[arg(short = 'x', long)]
    quality: Option<f64>,
    /// Specific volume
    #[arg(short = 'v', long)]
    volume: Option<f64>,
    /// Specific internal energy
    #[arg(short = 'u', long)]
    energy: Option<f64>,
    /// Specific enthalpy
    #[arg(short = 'H', long)]
    enthalpy: Option<f64>,
    /// Specific entropy
    #[arg(short = 's', long)]
    entropy: Option<f64>,
}

impl StateArgs {
    fn given(&self) -> Vec<(Property, f64)> {
        [
            (Property::T, self.temperature),
            (Property::P, self.pressure),
            (Property::V, self.volume),
            (Property::U, self.energy),
            (Property::H, self.enthalpy),
            (Property::S, self.entropy),
        ]
        .into_iter()
        .filter_map(|(p, v)| v.map(|v| (p, v)))
        .collect()
    }
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let units = load_units(cli.units.as_deref(), cli.unit_system.as_deref())?;
    let store = Arc::new(match &cli.tables {
        Some(dir) => TableStore::load_dir(dir)?,
        None => TableStore::bundled()?,
    });

    match cli.command {
        Commands::State(args) => cmd_state(store, units, &args),
        Commands::Avail => cmd_avail(&store, &units),
    }
}

fn load_units(path: Option<&Path>, inline: Option<&str>) -> CliResult<UnitSystem> {
    if let Some(path) = path {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::UnitsRead {
            path: path.to_path_buf(),
            source,
        })?;
        let units = serde_yaml::from_str(&text).map_err(|source| CliError::UnitsParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded unit system");
        return Ok(units);
    }
    match inline {
        Some(spec) => Ok(spec.parse()?),
        None => Ok(UnitSystem::default()),
    }
}

fn cmd_state(store: Arc<TableStore>, units: UnitSystem, args: &StateArgs) -> CliResult<()> {
    let given = args.given();
    let needed = if args.quality.is_some() { 1 } else { 2 };
    if given.len() != needed {
        return Err(CliError::InvalidInput(format!(
            "expected {} of -T, -P, -v, -u, -H, -s{}, got {}",
            needed,
            if args.quality.is_some() { " alongside -x" } else { "" },
            given.len()
        )));
    }

    let mut state = State::with_units(store, units);
    for &(property, value) in &given {
        state.set(property, value)?;
    }
    if let Some(x) = args.quality {
        state.set_quality(x)?;
    }

    let region = state.region()?;
    print_state(&format!("State ({region})"), &mut state)?;
    if region == Region::Saturated {
        if let Some(liquid) = state.liquid()? {
            print_state("Saturated liquid", &mut liquid.clone())?;
        }
        if let Some(vapor) = state.vapor()? {
            print_state("Saturated vapor", &mut vapor.clone())?;
        }
    }
    Ok(())
}

fn print_state(title: &str, state: &mut State) -> CliResult<()> {
    let units = *state.units();
    let properties = state.properties()?;
    println!("{title}:");
    for (property, value) in properties.iter() {
        println!(
            "  {:<2} = {:>12.6} {}",
            property.symbol(),
            value,
            units.label(property.dimension())
        );
    }
    if let Some(x) = state.quality()? {
        println!("  {:<2} = {:>12.6} {}", "x", x, units.label(Dimension::Fraction));
    }
    Ok(())
}

fn cmd_avail(store: &TableStore, units: &UnitSystem) -> CliResult<()> {
    let t_label = units.label(Dimension::Temperature);
    let p_label = units.label(Dimension::Pressure);
    let t = |value: f64| units.to_display(Dimension::Temperature, value);
    let p = |value: f64| units.to_display(Dimension::Pressure, value);

    let (t_lo, t_hi) = store.saturation_domain(Axis::Temperature)?;
    let (p_lo, p_hi) = store.saturation_domain(Axis::Pressure)?;
    println!("Saturation curve:");
    println!("  T: {} .. {} {}", t(t_lo), t(t_hi), t_label);
    println!("  P: {} .. {} {}", p(p_lo), p(p_hi), p_label);

    for region in [Region::Superheated, Region::Subcooled] {
        let Some(grid) = store.grid(region) else {
            continue;
        };
        println!(
            "{} grid ({} blocks, {} rows):",
            region,
            grid.blocks().len(),
            grid.row_count()
        );
        for block in grid.blocks() {
            let temps = block.temperatures();
            let (first, last) = match (temps.first(), temps.last()) {
                (Some(first), Some(last)) => (*first, *last),
                _ => continue,
            };
            let sat = block
                .saturation_temperature
                .map(|ts| format!("  Tsat = {} {}", t(ts), t_label))
                .unwrap_or_default();
            println!(
                "  P = {} {}: T {} .. {} {} ({} rows){}",
                p(block.pressure),
                p_label,
                t(first),
                t(last),
                t_label,
                temps.len(),
                sat
            );
        }
    }
    Ok(())
}
