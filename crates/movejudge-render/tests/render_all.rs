//! End-to-end renders against a transfer function database on disk.

use std::fs;
use std::path::Path;

use movejudge_dxx::FileFormat;
use movejudge_render::{render_all, Channel, Direction, RenderConfig, RenderError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Angles a width-2 sweep around 0 visits in either direction.
const ANGLES: [u16; 5] = [0, 1, 2, 3598, 3599];

/// At 1 kHz, 2 units at 10 units/s give 39 samples per segment.
const SEGMENT: usize = 39;

fn write_database(subject: &Path, skip: Option<u16>) {
    let sltf = subject.join("SLTF");
    fs::create_dir_all(&sltf).unwrap();
    for angle in ANGLES {
        if Some(angle) == skip {
            continue;
        }
        for (channel, gain) in [("L", 1.0), ("R", 0.5)] {
            let response = [gain, 0.25 * gain, 0.0, 0.125];
            let path = sltf.join(format!("SLTF_{}_{}.DDB", angle, channel));
            movejudge_dxx::write(&path, &response).unwrap();
        }
    }
}

fn setup(dry_len: usize, skip: Option<u16>) -> (TempDir, RenderConfig) {
    let tmp = tempfile::tempdir().unwrap();
    let subject = tmp.path().join("subject");
    write_database(&subject, skip);

    let dry: Vec<f64> = (0..dry_len).map(|i| ((i * 37) % 101) as f64 / 50.0 - 1.0).collect();
    let input = tmp.path().join("dry.DDB");
    movejudge_dxx::write(&input, &dry).unwrap();

    let mut config = RenderConfig::new(subject, input, 2, 10, 0, tmp.path().join("out"));
    config.sampling_freq_khz = 1;
    (tmp, config)
}

#[test]
fn test_renders_four_sweeps() {
    let (_tmp, config) = setup(1000, None);

    let report = render_all(&config).unwrap();

    assert!(report.all_succeeded());
    assert_eq!(report.timing.duration_samples(), SEGMENT);
    assert_eq!(report.dry_samples, 1000);
    assert_eq!(report.runs.len(), 4);

    for run in report.succeeded() {
        assert_eq!(run.length, 5 * SEGMENT);
        assert_eq!(run.path, config.output_path(run.direction, run.channel));
        let written = movejudge_dxx::read(&run.path).unwrap();
        assert_eq!(written.len(), run.length);
        assert_eq!(movejudge_dxx::len_file(&run.path).unwrap(), run.length);
    }
}

#[test]
fn test_used_angles_per_direction() {
    let (_tmp, config) = setup(1000, None);

    let report = render_all(&config).unwrap();

    let angles = |direction: Direction| -> Vec<u16> {
        report
            .succeeded()
            .find(|run| run.direction == direction)
            .unwrap()
            .used_angles
            .iter()
            .map(|a| a.tenths())
            .collect()
    };
    assert_eq!(angles(Direction::Clockwise), vec![0, 1, 2, 1, 0]);
    assert_eq!(angles(Direction::Counterclockwise), vec![0, 3599, 3598, 3599, 0]);
}

#[test]
fn test_output_file_names() {
    let (_tmp, config) = setup(1000, None);

    render_all(&config).unwrap();

    let mut names: Vec<String> = fs::read_dir(config.out_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "move_judge_w002_mt010_c_0_L.DDB",
            "move_judge_w002_mt010_c_0_R.DDB",
            "move_judge_w002_mt010_cc_0_L.DDB",
            "move_judge_w002_mt010_cc_0_R.DDB",
        ]
    );
}

#[test]
fn test_channels_use_their_own_transfer_functions() {
    let (_tmp, config) = setup(1000, None);

    let report = render_all(&config).unwrap();

    // The right-ear database is the left one at half gain.
    let read = |channel: Channel| {
        movejudge_dxx::read(config.output_path(Direction::Clockwise, channel)).unwrap()
    };
    let left = read(Channel::Left);
    let right = read(Channel::Right);
    assert!(report.all_succeeded());
    for (l, r) in left.iter().zip(&right) {
        assert!((l * 0.5 - r).abs() < 1e-9);
    }
}

#[test]
fn test_missing_transfer_function_fails_only_affected_runs() {
    let (_tmp, config) = setup(1000, Some(3598));

    let report = render_all(&config).unwrap();

    assert!(!report.all_succeeded());
    for run in &report.runs {
        match run.direction {
            Direction::Clockwise => assert!(run.result.is_ok()),
            Direction::Counterclockwise => {
                let err = run.result.as_ref().unwrap_err();
                match err {
                    RenderError::TransferFunction { angle, channel, .. } => {
                        assert_eq!(angle.tenths(), 3598);
                        assert_eq!(*channel, run.channel);
                    }
                    other => panic!("expected TransferFunction error, got {other:?}"),
                }
                assert!(!config.output_path(run.direction, run.channel).exists());
            }
        }
    }
    assert_eq!(report.failed().count(), 2);
}

#[test]
fn test_short_dry_signal_fails_every_run() {
    let (_tmp, config) = setup(300, None);

    let report = render_all(&config).unwrap();

    assert_eq!(report.failed().count(), 4);
    for (_, err) in report.failed() {
        assert!(matches!(err, RenderError::DryTooShort { .. }));
    }
    assert_eq!(fs::read_dir(config.out_dir()).unwrap().count(), 0);
}

#[test]
fn test_missing_dry_signal_is_fatal() {
    let (_tmp, mut config) = setup(1000, None);
    config.input = config.input.with_file_name("nope.DDB");

    let err = render_all(&config).unwrap_err();

    assert!(matches!(err, RenderError::Input { .. }));
    assert_eq!(err.code(), "RENDER_004");
    assert!(!config.out_dir().exists());
}

#[test]
fn test_invalid_config_is_fatal() {
    let (_tmp, mut config) = setup(1000, None);
    config.move_velocity = 0;

    let err = render_all(&config).unwrap_err();

    assert!(matches!(err, RenderError::InvalidParameter { .. }));
}

#[test]
fn test_sequential_matches_parallel() {
    let (_tmp, mut config) = setup(1000, None);

    render_all(&config).unwrap();
    let parallel: Vec<Vec<u8>> = movejudge_render::combinations()
        .map(|(d, c)| fs::read(config.output_path(d, c)).unwrap())
        .collect();

    config.parallel = false;
    config.out_dir = config.out_dir.with_file_name("out_seq");
    let report = render_all(&config).unwrap();
    assert!(report.all_succeeded());
    let sequential: Vec<Vec<u8>> = movejudge_render::combinations()
        .map(|(d, c)| fs::read(config.output_path(d, c)).unwrap())
        .collect();

    assert_eq!(parallel, sequential);
}

#[test]
fn test_wav_output_and_ascii_database() {
    let (tmp, mut config) = setup(1000, None);

    // Re-encode the database as text.
    let ascii = tmp.path().join("ascii");
    fs::create_dir_all(ascii.join("SLTF")).unwrap();
    for entry in fs::read_dir(config.subject.join("SLTF")).unwrap() {
        let path = entry.unwrap().path();
        let samples = movejudge_dxx::read(&path).unwrap();
        let name = path.with_extension("DDA");
        let target = ascii.join("SLTF").join(name.file_name().unwrap());
        movejudge_dxx::write(&target, &samples).unwrap();
    }
    config.subject = ascii;
    config.sltf_format = FileFormat::Dda;
    config.format = FileFormat::Wav;

    let report = render_all(&config).unwrap();

    assert!(report.all_succeeded());
    let run = report.succeeded().next().unwrap();
    assert_eq!(run.path.extension().unwrap(), "wav");
    let reader = hound::WavReader::open(&run.path).unwrap();
    assert_eq!(reader.spec().sample_rate, 1000);
    assert_eq!(reader.duration() as usize, 5 * SEGMENT);
}
