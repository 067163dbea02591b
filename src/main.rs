// src/main.rs

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use motor_loop_render::constants::{
    DEFAULT_BETA, DEFAULT_BLEND_A, DEFAULT_BLEND_B, DEFAULT_GAMMA, DEFAULT_KP,
    DEFAULT_OVERSAMPLE_FACTOR, DEFAULT_SAMPLES_PER_SECOND, DEFAULT_SIMULATION_DURATION_S,
    DEFAULT_START_SPEED, DEFAULT_TARGET_SPEED, ROOT_AGREEMENT_TOLERANCE, SWEEP_GRID_SAMPLES,
};
use motor_loop_render::controller_config::{BlendCoefficients, ControllerConstants};
use motor_loop_render::crate_version;
use motor_loop_render::data_analysis::characteristic_roots::{
    closed_form_roots, coefficient_grid, companion_roots, sweep, RootMethod,
};
use motor_loop_render::data_analysis::recurrence::{deviation_series, steady_state};
use motor_loop_render::data_analysis::stability_search::{find_most_stable, StabilityCriterion};
use motor_loop_render::data_output::sweep_export::export_sweep_csv;
use motor_loop_render::plot_functions::plot_root_paths::plot_root_paths;
use motor_loop_render::plot_functions::plot_root_scatter::plot_root_scatter;
use motor_loop_render::plot_functions::plot_speed_deviation::plot_speed_deviation;

#[derive(Parser)]
#[command(name = "motor_loop_render")]
#[command(about = "Discrete proportional motor-speed loop: step response and root stability sweep")]
#[command(version = crate_version())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate the speed recurrence and plot its deviation from the target
    Simulate(SimulateArgs),
    /// Sweep (a, b) with a + b = 1 and report the pair with the smallest natural frequency
    Sweep(SweepArgs),
}

#[derive(Args, Clone)]
struct ControllerArgs {
    /// Proportional gain
    #[arg(long, default_value_t = DEFAULT_KP)]
    kp: f64,
    /// Plant decay coefficient
    #[arg(long, default_value_t = DEFAULT_BETA, allow_hyphen_values = true)]
    beta: f64,
    /// Plant input gain
    #[arg(long, default_value_t = DEFAULT_GAMMA)]
    gamma: f64,
    /// Controller updates per second
    #[arg(long, default_value_t = DEFAULT_SAMPLES_PER_SECOND)]
    rps: f64,
    /// Target angular velocity (rad/s)
    #[arg(long, default_value_t = DEFAULT_TARGET_SPEED)]
    target: f64,
}

impl ControllerArgs {
    fn constants(&self) -> Result<ControllerConstants, Box<dyn Error>> {
        Ok(ControllerConstants::new(
            self.kp,
            self.beta,
            self.gamma,
            self.rps,
            self.target,
        )?)
    }
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    controller: ControllerArgs,
    /// Weight of the current speed sample
    #[arg(long, default_value_t = DEFAULT_BLEND_A)]
    a: f64,
    /// Weight of the previous speed sample
    #[arg(long, default_value_t = DEFAULT_BLEND_B)]
    b: f64,
    /// Initial angular velocity
    #[arg(long, default_value_t = DEFAULT_START_SPEED, allow_hyphen_values = true)]
    start: f64,
    /// Simulated duration in seconds
    #[arg(long, default_value_t = DEFAULT_SIMULATION_DURATION_S)]
    duration: f64,
    /// Plot sub-steps per controller sample
    #[arg(long, default_value_t = DEFAULT_OVERSAMPLE_FACTOR)]
    oversample: usize,
    /// Directory for the PNG output
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    ClosedForm,
    Companion,
}

impl From<MethodArg> for RootMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::ClosedForm => RootMethod::ClosedForm,
            MethodArg::Companion => RootMethod::CompanionMatrix,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CriterionArg {
    FirstRoot,
    Summed,
}

impl From<CriterionArg> for StabilityCriterion {
    fn from(value: CriterionArg) -> Self {
        match value {
            CriterionArg::FirstRoot => StabilityCriterion::FirstRoot,
            CriterionArg::Summed => StabilityCriterion::SummedRoots,
        }
    }
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    controller: ControllerArgs,
    /// How the characteristic roots are computed
    #[arg(long, value_enum, default_value_t = MethodArg::ClosedForm)]
    method: MethodArg,
    /// Magnitude used to rank coefficient pairs
    #[arg(long, value_enum, default_value_t = CriterionArg::FirstRoot)]
    criterion: CriterionArg,
    /// Samples of a and of b on [0, 1]
    #[arg(long, default_value_t = SWEEP_GRID_SAMPLES)]
    samples: usize,
    /// Also write every swept pair and its roots to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Skip the PNG plots
    #[arg(long)]
    no_plot: bool,
    /// Directory for the PNG output
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn run_simulate(args: &SimulateArgs) -> Result<(), Box<dyn Error>> {
    let constants = args.controller.constants()?;
    let coefficients = BlendCoefficients::new(args.a, args.b)?;
    info!("Simulating speed loop: {constants}, (a, b) = {coefficients}");

    println!("\n--- Simulating Speed Recurrence ---");
    let series = deviation_series(
        &constants,
        &coefficients,
        args.start,
        args.duration,
        args.oversample,
    );
    println!("  Generated {} samples over {:.2} s.", series.len(), args.duration);
    if let Some(&(time, deviation)) = series.last() {
        println!("  Final deviation at {time:.3} s: {deviation:.6} rad/s");
    }
    match steady_state(&constants, &coefficients) {
        Some(ss) => println!("  Steady-state speed: {ss:.6} rad/s (target {})", constants.target_speed),
        None => warn!("Loop has no finite steady state for these constants"),
    }

    println!("\n--- Generating Speed Deviation Plot ---");
    fs::create_dir_all(&args.output_dir)?;
    plot_speed_deviation(&series, &constants, &coefficients, &args.output_dir, "motor_speed")?;
    Ok(())
}

fn run_sweep(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let constants = args.controller.constants()?;
    let method = RootMethod::from(args.method);
    let criterion = StabilityCriterion::from(args.criterion);

    println!("\n--- Sweeping Coefficient Pairs ---");
    let pairs = coefficient_grid(args.samples);
    println!(
        "  {} of {} grid candidates satisfy a + b = 1.",
        pairs.len(),
        args.samples.saturating_mul(args.samples)
    );
    let result = sweep(&constants, &pairs, method);

    // Cross-check the two root computations over the whole sweep
    let disagreements = pairs
        .iter()
        .filter(|pair| {
            let (c1, c2) = closed_form_roots(&constants, pair);
            let (e1, e2) = companion_roots(&constants, pair);
            (c1 - e1).norm() > ROOT_AGREEMENT_TOLERANCE || (c2 - e2).norm() > ROOT_AGREEMENT_TOLERANCE
        })
        .count();
    if disagreements > 0 {
        warn!("{disagreements} pairs where closed-form and companion-matrix roots disagree");
    } else {
        info!("Closed-form and companion-matrix roots agree for all {} pairs", pairs.len());
    }

    let optimum = find_most_stable(&result, criterion);
    match &optimum {
        Some(best) => {
            println!("{best}");
            if !best.is_stable() {
                warn!("Best pair {} is not stable", best.coefficients);
            }
        }
        None => println!("  No coefficient pairs to rank."),
    }

    if let Some(path) = &args.csv {
        export_sweep_csv(&result, path)?;
    }

    if !args.no_plot {
        println!("\n--- Generating Root Plots ---");
        fs::create_dir_all(&args.output_dir)?;
        plot_root_paths(&result, &args.output_dir, "natural_frequencies")?;
        plot_root_scatter(&result, optimum.as_ref(), &args.output_dir, "natural_frequencies")?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Simulate(args) => run_simulate(args),
        Command::Sweep(args) => run_sweep(args),
    }
}
