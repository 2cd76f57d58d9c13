//! Rendering of the four sweeps (both directions, both ears) of one config.

use std::fs;
use std::path::PathBuf;
use std::thread;

use movejudge_dxx::DxxError;
use serde::Serialize;

use crate::assembler::SweepAssembler;
use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::sltf::{CachedSource, SltfDirectory, TransferFunctionSource};
use crate::timing::SweepTiming;
use crate::trajectory::{Angle, Channel, Direction};

/// Summary of one written sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Sweep direction.
    pub direction: Direction,
    /// Ear the sweep was rendered for.
    pub channel: Channel,
    /// File the sweep was written to.
    pub path: PathBuf,
    /// Number of samples written.
    pub length: usize,
    /// Angle of every step, in order.
    pub used_angles: Vec<Angle>,
}

impl RunReport {
    /// `"<path>: length=<N>"`.
    pub fn length_line(&self) -> String {
        format!("{}: length={}", self.path.display(), self.length)
    }

    /// `"used angle:[a, b, ...]"`.
    pub fn angles_line(&self) -> String {
        let angles: Vec<String> = self.used_angles.iter().map(Angle::to_string).collect();
        format!("used angle:[{}]", angles.join(", "))
    }
}

/// Result of one (direction, channel) run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Sweep direction.
    pub direction: Direction,
    /// Ear the sweep was rendered for.
    pub channel: Channel,
    /// The written sweep, or why it could not be produced.
    pub result: RenderResult<RunReport>,
}

/// Results of every run of one config.
#[derive(Debug)]
pub struct RenderReport {
    /// Timing shared by all runs.
    pub timing: SweepTiming,
    /// Length of the dry signal in samples.
    pub dry_samples: usize,
    /// One outcome per (direction, channel), clockwise first, left first.
    pub runs: Vec<RunOutcome>,
}

impl RenderReport {
    /// Returns true if every run wrote its output.
    pub fn all_succeeded(&self) -> bool {
        self.runs.iter().all(|run| run.result.is_ok())
    }

    /// Successful runs.
    pub fn succeeded(&self) -> impl Iterator<Item = &RunReport> {
        self.runs.iter().filter_map(|run| run.result.as_ref().ok())
    }

    /// Failed runs with their errors.
    pub fn failed(&self) -> impl Iterator<Item = (&RunOutcome, &RenderError)> {
        self.runs
            .iter()
            .filter_map(|run| run.result.as_ref().err().map(|err| (run, err)))
    }
}

/// Every (direction, channel) combination, in render order.
pub fn combinations() -> impl Iterator<Item = (Direction, Channel)> {
    Direction::ALL
        .into_iter()
        .flat_map(|direction| Channel::ALL.into_iter().map(move |channel| (direction, channel)))
}

/// Renders all four sweeps described by `config`.
///
/// A bad config, an unreadable dry signal or an uncreatable output directory
/// fails the whole render. Failures inside a run are reported per run and do
/// not stop the others.
pub fn render_all(config: &RenderConfig) -> RenderResult<RenderReport> {
    let timing = config.validate()?;

    let dry = movejudge_dxx::read(&config.input).map_err(|source| RenderError::Input {
        path: config.input.clone(),
        source,
    })?;

    fs::create_dir_all(&config.out_dir).map_err(|e| RenderError::Output {
        path: config.out_dir.clone(),
        source: DxxError::from(e),
    })?;

    let source = CachedSource::new(SltfDirectory::new(&config.subject, config.sltf_format));
    Ok(render_with_source(config, timing, &dry, &source))
}

/// Renders all four sweeps from an already loaded dry signal.
///
/// Runs concurrently when `config.parallel` is set; the outcomes are in the
/// same order either way.
pub fn render_with_source<S>(
    config: &RenderConfig,
    timing: SweepTiming,
    dry: &[f64],
    source: &S,
) -> RenderReport
where
    S: TransferFunctionSource + Sync + ?Sized,
{
    let runs = if config.parallel {
        render_parallel(config, timing, dry, source)
    } else {
        render_sequential(config, timing, dry, source)
    };

    RenderReport {
        timing,
        dry_samples: dry.len(),
        runs,
    }
}

fn render_sequential<S>(
    config: &RenderConfig,
    timing: SweepTiming,
    dry: &[f64],
    source: &S,
) -> Vec<RunOutcome>
where
    S: TransferFunctionSource + ?Sized,
{
    let mut runs = Vec::with_capacity(4);
    for direction in Direction::ALL {
        let mut assembler = SweepAssembler::new(config.sweep(direction), timing);
        for channel in Channel::ALL {
            runs.push(RunOutcome {
                direction,
                channel,
                result: run_one(config, &mut assembler, dry, channel, source),
            });
        }
    }
    runs
}

fn render_parallel<S>(
    config: &RenderConfig,
    timing: SweepTiming,
    dry: &[f64],
    source: &S,
) -> Vec<RunOutcome>
where
    S: TransferFunctionSource + Sync + ?Sized,
{
    thread::scope(|scope| {
        let handles: Vec<_> = combinations()
            .map(|(direction, channel)| {
                let handle = scope.spawn(move || {
                    let mut assembler = SweepAssembler::new(config.sweep(direction), timing);
                    run_one(config, &mut assembler, dry, channel, source)
                });
                (direction, channel, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(direction, channel, handle)| RunOutcome {
                direction,
                channel,
                result: handle.join().unwrap_or_else(|_| {
                    Err(RenderError::invariant(format!(
                        "render thread for {}/{} panicked",
                        direction, channel
                    )))
                }),
            })
            .collect()
    })
}

fn run_one<S>(
    config: &RenderConfig,
    assembler: &mut SweepAssembler,
    dry: &[f64],
    channel: Channel,
    source: &S,
) -> RenderResult<RunReport>
where
    S: TransferFunctionSource + ?Sized,
{
    let direction = assembler.params().direction;
    let output = assembler.assemble(dry, channel, source)?;

    let path = config.output_path(direction, channel);
    movejudge_dxx::write_with_rate(&path, &output.samples, config.sample_rate()).map_err(
        |source| RenderError::Output {
            path: path.clone(),
            source,
        },
    )?;

    Ok(RunReport {
        direction,
        channel,
        path,
        length: output.samples.len(),
        used_angles: output.used_angles,
    })
}
