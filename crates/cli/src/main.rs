//! Staking economics simulator command line interface
//!
//! Loads parameters, runs the engine once, and renders or replays the
//! finished trajectory.

mod playback;
mod render;
mod settings;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use render::OutputFormat;
use stakesim_economics::{
    propensity_curve, yield_grid, ParameterMap, ParameterValue, Policy, SimulationConfig,
    DEFAULT_MAX_YIELD, DEFAULT_SAMPLES, STAKED_POLICY, TOTAL_YEARS, UNSTAKED_POLICY,
    YIELD_LOCATION, YIELD_SCALE,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "stakesim")]
#[command(about = "Proof-of-stake token economics simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and print the trajectory
    Run(RunCommand),
    /// Preview the proactive behaviour curve
    Propensity(PropensityCommand),
    /// Print the effective parameters after all layers are merged
    Defaults(ParameterArgs),
}

#[derive(Args)]
struct ParameterArgs {
    /// Config file (YAML, TOML or JSON) layered over the bundled defaults
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override any parameter, e.g. `--set base_inflation_rate=0.07`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = settings::parse_override)]
    overrides: Vec<(String, ParameterValue)>,
}

impl ParameterArgs {
    fn load(&self, extra: Vec<(String, ParameterValue)>) -> Result<ParameterMap> {
        let mut overrides = self.overrides.clone();
        overrides.extend(extra);
        settings::load_parameters(self.config.as_deref(), &overrides)
    }
}

#[derive(Args)]
struct RunCommand {
    #[command(flatten)]
    parameters: ParameterArgs,

    /// Simulation horizon in years
    #[arg(short = 'y', long)]
    years: Option<u32>,

    /// Behaviour policy of the staked cohort (constant | proactive)
    #[arg(long)]
    staked_policy: Option<String>,

    /// Behaviour policy of the unstaked cohort (constant | proactive)
    #[arg(long)]
    unstaked_policy: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Replay rows one at a time with the configured `speed` delay
    #[arg(long)]
    animate: bool,
}

#[derive(Args)]
struct PropensityCommand {
    #[command(flatten)]
    parameters: ParameterArgs,

    /// Centre of the S-curve (yield at which propensity is 50%)
    #[arg(long)]
    location: Option<f64>,

    /// Width of the S-curve
    #[arg(long)]
    scale: Option<f64>,

    /// Highest yield sampled
    #[arg(long, default_value_t = DEFAULT_MAX_YIELD)]
    max_yield: f64,

    /// Number of evenly spaced samples
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Run(cmd) => handle_run(cmd, &mut out),
        Commands::Propensity(cmd) => handle_propensity(cmd, &mut out),
        Commands::Defaults(args) => handle_defaults(args, &mut out),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn handle_run<W: Write>(cmd: RunCommand, out: &mut W) -> Result<()> {
    let mut extra = Vec::new();
    if let Some(years) = cmd.years {
        extra.push((TOTAL_YEARS.to_string(), ParameterValue::Number(years.into())));
    }
    if let Some(policy) = cmd.staked_policy {
        extra.push((STAKED_POLICY.to_string(), ParameterValue::Text(policy)));
    }
    if let Some(policy) = cmd.unstaked_policy {
        extra.push((UNSTAKED_POLICY.to_string(), ParameterValue::Text(policy)));
    }

    let map = cmd.parameters.load(extra)?;
    let config = SimulationConfig::from_map(&map).context("invalid simulation parameters")?;
    debug!(?config, "resolved simulation config");

    let simulation = config.build().context("failed to set up simulation")?;
    let trajectory = simulation.run().context("simulation failed")?;
    info!(rows = trajectory.len(), "trajectory ready");

    if cmd.animate {
        let delay = settings::playback_delay(&map)?;
        playback::replay(out, &mut io::stderr(), &trajectory, delay)
    } else {
        render::write_trajectory(out, cmd.format, &config, &trajectory)
    }
}

fn handle_propensity<W: Write>(cmd: PropensityCommand, out: &mut W) -> Result<()> {
    let mut extra = Vec::new();
    if let Some(location) = cmd.location {
        extra.push((YIELD_LOCATION.to_string(), ParameterValue::Number(location)));
    }
    if let Some(scale) = cmd.scale {
        extra.push((YIELD_SCALE.to_string(), ParameterValue::Number(scale)));
    }
    let map = cmd.parameters.load(extra)?;

    let shape = |key: &str| {
        map.get(key)
            .and_then(ParameterValue::as_f64)
            .with_context(|| format!("{key} must be set to a number"))
    };
    let (location, scale) = (shape(YIELD_LOCATION)?, shape(YIELD_SCALE)?);
    Policy::proactive(location, scale)?;

    let curve = propensity_curve(&yield_grid(cmd.max_yield, cmd.samples), location, scale);
    render::write_propensity(out, cmd.format, &curve)
}

fn handle_defaults<W: Write>(args: ParameterArgs, out: &mut W) -> Result<()> {
    let map = args.load(Vec::new())?;
    serde_yaml::to_writer(&mut *out, &map).context("failed to write parameters")?;
    Ok(())
}
