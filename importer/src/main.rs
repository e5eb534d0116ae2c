use anyhow::Context;
use clap::{Parser, ValueEnum};
use deshakecore::config::{FilterResponse, SincConfig, SmoothingStrategy};
use generator::profile::{write_log, GeneratorConfig};
use log::info;
use output::keyframes::{write_keyframes, OutputFormat};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod output;
mod workflow;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Pure integration
    None,
    /// Magnitude-dependent damping of the running pose
    Damping,
    /// Windowed-sinc FIR with lookahead
    Sinc,
}

impl From<StrategyArg> for SmoothingStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::None => SmoothingStrategy::None,
            StrategyArg::Damping => SmoothingStrategy::Damping,
            StrategyArg::Sinc => SmoothingStrategy::WindowedSinc,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Turn a Deshaker log into stabilization keyframes")]
struct Args {
    /// Deshaker log to import
    #[arg(long)]
    log: Option<PathBuf>,
    /// Write a synthetic log here first (imported when --log is absent)
    #[arg(long)]
    generate: Option<PathBuf>,
    /// Rows in the synthetic log
    #[arg(long, default_value_t = 300)]
    frames: u64,
    /// Seed for the synthetic log
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = StrategyArg::Sinc)]
    strategy: StrategyArg,
    #[arg(long, default_value_t = 1.0)]
    cutoff_hz: f64,
    #[arg(long, default_value_t = 30.0)]
    frame_rate: f64,
    #[arg(long, default_value_t = 32)]
    half_width: usize,
    /// Emit the smoothed path instead of the shake residue
    #[arg(long, default_value_t = false)]
    low_pass: bool,
    /// Reset the pose to zero on `new_scene` markers
    #[arg(long, default_value_t = false)]
    reset_on_new_scene: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Keyframe destination (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Append a one-line run summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Do not fail when the log yields no keyframes
    #[arg(long, default_value_t = false)]
    allow_empty: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let sinc = SincConfig {
            cutoff_frequency_hz: args.cutoff_hz,
            frame_rate: args.frame_rate,
            kernel_half_width: args.half_width,
            response: if args.low_pass {
                FilterResponse::LowPass
            } else {
                FilterResponse::HighPass
            },
        };
        WorkflowConfig::from_args(
            args.strategy.into(),
            sinc,
            args.reset_on_new_scene,
            args.format,
            args.allow_empty,
        )
    };

    if let Some(path) = &args.generate {
        let generator = GeneratorConfig {
            frames: args.frames,
            seed: args.seed,
            ..Default::default()
        };
        write_log(path, &generator)?;
        info!("wrote synthetic log with {} rows to {}", args.frames, path.display());
    }

    let log_path = args
        .log
        .clone()
        .or_else(|| args.generate.clone())
        .context("either --log or --generate is required")?;

    let runner = Runner::new(workflow_config.clone());
    let result = runner.execute(&log_path)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating keyframe output {}", path.display()))?;
            write_keyframes(
                &mut BufWriter::new(file),
                &result.poses,
                workflow_config.output_format,
            )?;
        }
        None => {
            let stdout = io::stdout();
            write_keyframes(
                &mut stdout.lock(),
                &result.poses,
                workflow_config.output_format,
            )?;
        }
    }

    let summary = format!(
        "log={} lines={} keyframes={} integrated={} skipped={} scene_cuts={} rms=[{:.3}, {:.3}, {:.3}] peak=[{:.3}, {:.3}, {:.3}]\n",
        log_path.display(),
        result.metrics.lines_read,
        result.poses.len(),
        result.metrics.records_integrated,
        result.metrics.records_skipped,
        result.metrics.scene_cuts,
        result.rms[0],
        result.rms[1],
        result.rms[2],
        result.peak[0],
        result.peak[1],
        result.peak[2],
    );
    eprint!("{}", summary);

    if let Some(report_path) = &args.report {
        if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        file.write_all(summary.as_bytes())?;
    }

    Ok(())
}
