//! Trajectory command implementation
//!
//! Prints the angle sequence and segment timing a render would use, without
//! touching any files.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use movejudge_render::{Angle, Direction, RenderResult, SweepParams, SweepTiming};

use super::json_output::{render_error_to_json, DirectionAngles, TrajectoryOutput};

/// Sweep parameters given on the command line.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryArgs {
    /// Sweep width in tenths of a degree
    pub move_width: u32,
    /// Angular velocity in tenths of a degree per second
    pub move_velocity: u32,
    /// Out-and-back cycles
    pub repeat_times: u32,
    /// End angle in tenths of a degree
    pub end_angle: u32,
    /// Sampling frequency in kHz
    pub sampling_freq_khz: u32,
}

/// Run the trajectory command
///
/// # Returns
/// Exit code: 0 on success, 1 on invalid parameters
pub fn run(args: &TrajectoryArgs, json_output: bool) -> Result<ExitCode> {
    let planned = plan(args);

    if json_output {
        let output = match &planned {
            Ok((timing, directions)) => {
                let step_count = directions.first().map_or(0, |d| d.angles.len());
                TrajectoryOutput::success(*timing, step_count, directions.clone())
            }
            Err(err) => TrajectoryOutput::failure(vec![render_error_to_json(err)]),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(if planned.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    let (timing, directions) = planned?;
    let steps = directions.first().map_or(0, |d| d.angles.len());

    println!("{}", "Sweep:".cyan().bold());
    println!(
        "  {} width={} velocity={} repeat={} end={}",
        "Params:".dimmed(),
        args.move_width,
        args.move_velocity,
        args.repeat_times,
        args.end_angle
    );
    println!(
        "  {} duration={} overlap={} samples at {} kHz",
        "Timing:".dimmed(),
        timing.duration_samples(),
        timing.overlap_samples(),
        args.sampling_freq_khz
    );
    println!(
        "  {} {} steps, {} samples per sweep",
        "Length:".dimmed(),
        steps,
        timing.output_len(steps)
    );

    for entry in &directions {
        let angles: Vec<String> = entry.angles.iter().map(Angle::to_string).collect();
        println!("  {:>3}: [{}]", entry.direction.tag(), angles.join(", "));
    }

    Ok(ExitCode::SUCCESS)
}

fn plan(args: &TrajectoryArgs) -> RenderResult<(SweepTiming, Vec<DirectionAngles>)> {
    let end_angle = Angle::checked("end_angle", args.end_angle)?;

    let timing = SweepTiming::from_motion(
        args.move_width,
        args.move_velocity,
        args.repeat_times,
        args.sampling_freq_khz,
    )?;

    let directions = Direction::ALL
        .into_iter()
        .map(|direction| {
            let params = SweepParams {
                move_width: args.move_width,
                repeat_times: args.repeat_times,
                direction,
                end_angle,
            };
            DirectionAngles {
                direction,
                angles: params.trajectory().collect(),
            }
        })
        .collect();

    Ok((timing, directions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(move_width: u32, end_angle: u32) -> TrajectoryArgs {
        TrajectoryArgs {
            move_width,
            move_velocity: 10,
            repeat_times: 1,
            end_angle,
            sampling_freq_khz: 48,
        }
    }

    #[test]
    fn plan_lists_both_directions() {
        let (timing, directions) = plan(&args(2, 0)).unwrap();
        assert_eq!(timing.duration_samples(), 1890);

        let tenths = |i: usize| -> Vec<u16> {
            directions[i].angles.iter().map(|a| a.tenths()).collect()
        };
        assert_eq!(directions[0].direction, Direction::Clockwise);
        assert_eq!(tenths(0), vec![0, 1, 2, 1, 0]);
        assert_eq!(directions[1].direction, Direction::Counterclockwise);
        assert_eq!(tenths(1), vec![0, 3599, 3598, 3599, 0]);
    }

    #[test]
    fn plan_rejects_out_of_range_end_angle() {
        let err = plan(&args(2, 3600)).unwrap_err();
        assert_eq!(err.code(), "RENDER_001");
        assert!(err.to_string().contains("end_angle"));
        assert!(err.to_string().contains("below 3600"));
    }

    #[test]
    fn run_exit_codes() {
        assert_eq!(run(&args(2, 0), true).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(&args(0, 0), true).unwrap(), ExitCode::from(1));
    }
}
