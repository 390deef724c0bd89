use std::fs;
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use itertools::Itertools;
use log::{info, warn};
use mbb::config::MbbConfig;
use mbb::io;
use mbb::io::cli::Cli;
use mbb::io::ext_repr::ExtReport;
use mbb::io::svg_export::solution_to_svg;
use opack::{BoxDims, Instance, probe};
use thousands::Separable;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config: MbbConfig = match args.config_file {
        None => {
            warn!("no config file provided, use --config-file to provide a custom config");
            MbbConfig::default()
        }
        Some(config_file) => {
            let file = File::open(config_file)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };
    info!("config: {config:?}");

    let ext_instance = io::read_instance(args.input_file.as_path())?;
    let instance = Instance::new(&ext_instance.rects)?;
    let box_dims = BoxDims::new(args.width, args.height)?;
    info!(
        "probing {} rectangles (total area {}) against box {}x{}",
        instance.len(),
        instance.total_area.separate_with_commas(),
        box_dims.width,
        box_dims.height
    );

    let report = probe(&instance, box_dims, &config.pack);
    info!(
        "{}: {} nodes in {:.1}ms (+{:.1}ms tables)",
        if report.feasible { "FEASIBLE" } else { "INFEASIBLE" },
        report.counters.total().separate_with_commas(),
        report.search_time.as_secs_f64() * 1e3,
        report.table_time.as_secs_f64() * 1e3,
    );
    if let Some(solution) = &report.solution {
        let summary = solution
            .placements
            .iter()
            .map(|p| format!("{}@({},{}){}", p.id, p.x, p.y, if p.rotated { "r" } else { "" }))
            .join(" ");
        info!("placement: {summary}");
    }

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!("could not create solution folder: {:?}", args.solution_folder)
        })?;
    }

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("instance");

    let report_path = args
        .solution_folder
        .join(format!("probe_{input_stem}_{}x{}.json", box_dims.width, box_dims.height));
    io::write_report(&ExtReport::new(&report), &report_path)?;

    if let Some(solution) = &report.solution {
        let svg_path = args
            .solution_folder
            .join(format!("probe_{input_stem}_{}x{}.svg", box_dims.width, box_dims.height));
        let svg = solution_to_svg(solution, &instance, config.svg);
        io::write_svg(&svg, &svg_path)?;
    }

    Ok(())
}
