// src/main.rs

use clap::Parser;
use hyspecppt::config::Config;
use hyspecppt::model::{CrosshairUpdate, ExperimentMode, PlotType};
use hyspecppt::utils::{logger, report};
use hyspecppt::{io, rendering, ScatteringEngine};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const IMAGE_SIZE: (u32, u32) = (800, 600);

/// Kinematic coverage and Scharpf angle planner for polarized
/// direct-geometry experiments.
#[derive(Parser, Debug)]
#[command(name = "hyspecppt", version, about)]
struct Cli {
    /// Incident energy (meV)
    #[arg(long)]
    ei: Option<f64>,

    /// Detector tank angle (degrees); negative puts the tank on the other side
    #[arg(long, allow_negative_numbers = true)]
    s2: Option<f64>,

    /// Polarization direction (degrees)
    #[arg(long, allow_negative_numbers = true)]
    alpha_p: Option<f64>,

    /// angle | cos2 | half_one_plus_cos2 | cos2_minus_sin2
    #[arg(long)]
    plot_type: Option<String>,

    /// powder | single-crystal
    #[arg(long)]
    mode: Option<String>,

    /// Crosshair energy transfer (meV)
    #[arg(long, allow_negative_numbers = true)]
    delta_e: Option<f64>,

    /// Crosshair |Q| (1/Å), used in powder mode
    #[arg(long)]
    mod_q: Option<f64>,

    /// Unit cell: a b c alpha beta gamma
    #[arg(long, num_args = 6, value_names = ["A", "B", "C", "ALPHA", "BETA", "GAMMA"])]
    cell: Option<Vec<f64>>,

    /// Reflection: h k l
    #[arg(long, num_args = 3, value_names = ["H", "K", "L"], allow_negative_numbers = true)]
    hkl: Option<Vec<f64>>,

    /// Write the heatmap as PNG
    #[arg(long)]
    png: Option<String>,

    /// Write the heatmap as SVG
    #[arg(long)]
    svg: Option<String>,

    /// Write the field data (.json or .csv)
    #[arg(long)]
    export: Option<String>,

    /// Settings file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store the resulting settings back into the settings file
    #[arg(long)]
    save_config: bool,

    /// Debug output on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logger::init(logger::level_for(cli.verbose)) {
        eprintln!("Logger already installed: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // 1. Settings
    let (mut config, _) = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    if config.verbose_logging {
        log::set_max_level(logger::level_for(true));
    }
    let mut engine = ScatteringEngine::from_config(&config)?;

    // 2. Experiment (replaced as a whole)
    if cli.ei.is_some() || cli.s2.is_some() || cli.alpha_p.is_some() || cli.plot_type.is_some() {
        let mut exp = engine.get_experiment();
        if let Some(ei) = cli.ei {
            exp.ei = ei;
        }
        if let Some(s2) = cli.s2 {
            exp.s2 = s2;
        }
        if let Some(alpha_p) = cli.alpha_p {
            exp.alpha_p = alpha_p;
        }
        if let Some(label) = &cli.plot_type {
            exp.plot_type = label.parse::<PlotType>()?;
        }
        engine.set_experiment(exp)?;
    }

    // 3. Crystal
    if cli.cell.is_some() || cli.hkl.is_some() {
        let mut lattice = engine.get_lattice();
        if let Some(cell) = &cli.cell {
            lattice.a = cell[0];
            lattice.b = cell[1];
            lattice.c = cell[2];
            lattice.alpha = cell[3];
            lattice.beta = cell[4];
            lattice.gamma = cell[5];
        }
        if let Some(hkl) = &cli.hkl {
            lattice.h = hkl[0];
            lattice.k = hkl[1];
            lattice.l = hkl[2];
        }
        engine.set_lattice(lattice)?;
    }

    // 4. Crosshair (sparse)
    let mut update = CrosshairUpdate::new();
    if let Some(mode) = &cli.mode {
        update = update.mode(mode.parse::<ExperimentMode>()?);
    }
    if let Some(delta_e) = cli.delta_e {
        update = update.delta_e(delta_e);
    }
    if let Some(mod_q) = cli.mod_q {
        update = update.mod_q(mod_q);
    }
    engine.set_crosshair(update)?;
    let point = engine.get_crosshair();

    // 5. Report
    let field = engine.calculate_field();
    println!("{}", report::settings_summary(&engine));
    println!("{}", report::field_summary(&field));
    println!("Documentation: {}", config.help_url);

    // 6. Outputs
    if let Some(path) = &cli.png {
        rendering::export_png(path, &field, Some(point), IMAGE_SIZE)?;
    }
    if let Some(path) = &cli.svg {
        rendering::export_svg(path, &field, Some(point), IMAGE_SIZE)?;
    }
    if let Some(path) = &cli.export {
        io::save_field(path, &field)?;
        log::info!("Field data written to {}", path);
    }

    if cli.save_config {
        config.experiment = engine.get_experiment();
        config.lattice = engine.get_lattice();
        config.default_mode = engine.mode();
        config.crosshair.delta_e = point.delta_e;
        config.crosshair.mod_q = engine.crosshair_state().stored_mod_q();
        match &cli.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        };
    }

    Ok(())
}
