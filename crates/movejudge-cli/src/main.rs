//! movejudge CLI - Moving sound source stimulus renderer
//!
//! This binary renders sweeping-source stimuli from a subject's transfer
//! function database and converts between sample file formats.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use movejudge_cli::commands;
use movejudge_dxx::DEFAULT_SAMPLE_RATE;
use movejudge_render::DEFAULT_SAMPLING_FREQ_KHZ;

/// movejudge - Moving Sound Source Renderer
#[derive(Parser)]
#[command(name = "movejudge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render clockwise and counterclockwise sweeps for both ears
    Render {
        /// Path to a JSON render config (flags override its values)
        #[arg(short, long)]
        config: Option<String>,

        /// Subject directory containing the SLTF database
        #[arg(short, long)]
        subject: Option<String>,

        /// Dry source signal (DXX or WAV)
        #[arg(short, long)]
        input: Option<String>,

        /// Sweep width in tenths of a degree
        #[arg(short = 'w', long)]
        move_width: Option<u32>,

        /// Angular velocity in tenths of a degree per second
        #[arg(short = 'm', long)]
        move_velocity: Option<u32>,

        /// Number of out-and-back cycles (default: 1)
        #[arg(short, long)]
        repeat_times: Option<u32>,

        /// Angle every sweep starts and ends at, tenths of a degree
        #[arg(short, long)]
        end_angle: Option<u32>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<String>,

        /// Sampling frequency in kHz (default: 48)
        #[arg(long)]
        sampling_freq_khz: Option<u32>,

        /// Output file format (DSA, DFA, DDA, DSB, DFB, DDB, wav; default: DDB)
        #[arg(short, long)]
        format: Option<String>,

        /// Transfer function file format (default: DDB)
        #[arg(long)]
        sltf_format: Option<String>,

        /// Render one sweep at a time instead of all four concurrently
        #[arg(long)]
        sequential: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the angle sequence and segment timing of a sweep
    Trajectory {
        /// Sweep width in tenths of a degree
        #[arg(short = 'w', long)]
        move_width: u32,

        /// Angular velocity in tenths of a degree per second
        #[arg(short = 'm', long)]
        move_velocity: u32,

        /// Number of out-and-back cycles
        #[arg(short, long, default_value_t = 1)]
        repeat_times: u32,

        /// Angle the sweep starts and ends at, tenths of a degree
        #[arg(short, long, default_value_t = 0)]
        end_angle: u32,

        /// Sampling frequency in kHz
        #[arg(long, default_value_t = DEFAULT_SAMPLING_FREQ_KHZ)]
        sampling_freq_khz: u32,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Convert a sample file to the format named by the output extension
    Convert {
        /// Source file
        input: String,

        /// Destination file
        output: String,

        /// Sample rate written into WAV headers
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },

    /// Print the number of samples in a file
    Len {
        /// File to measure
        file: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            config,
            subject,
            input,
            move_width,
            move_velocity,
            repeat_times,
            end_angle,
            out_dir,
            sampling_freq_khz,
            format,
            sltf_format,
            sequential,
            json,
        } => {
            let args = commands::render::RenderArgs {
                config,
                subject,
                input,
                move_width,
                move_velocity,
                repeat_times,
                end_angle,
                out_dir,
                sampling_freq_khz,
                format,
                sltf_format,
                sequential,
            };
            commands::render::run(&args, json)
        }
        Commands::Trajectory {
            move_width,
            move_velocity,
            repeat_times,
            end_angle,
            sampling_freq_khz,
            json,
        } => {
            let args = commands::trajectory::TrajectoryArgs {
                move_width,
                move_velocity,
                repeat_times,
                end_angle,
                sampling_freq_khz,
            };
            commands::trajectory::run(&args, json)
        }
        Commands::Convert {
            input,
            output,
            sample_rate,
        } => commands::convert::run(&input, &output, sample_rate),
        Commands::Len { file } => commands::len::run(&file),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
