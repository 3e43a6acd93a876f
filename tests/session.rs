use live_lpp::live::{parse_cli_from, run_session, LiveConfig};
use live_lpp::{ChartRenderer, Frame, LiveError, SessionEnd, StopSignal};
use std::error::Error;
use std::io::Write;
use std::path::Path;

fn write_samples(dir: &Path, lines: &[String]) -> std::path::PathBuf {
    let path = dir.join("samples.txt");
    let mut f = std::fs::File::create(&path).unwrap();
    for l in lines {
        writeln!(f, "{}", l).unwrap();
    }
    path
}

fn config(data: &Path, extra: &[&str]) -> LiveConfig {
    let data = data.to_str().unwrap();
    let mut args = vec!["live_plot", "-s", "10:00", "-e", "14:00", "-d", data, "-p", "0"];
    args.extend_from_slice(extra);
    parse_cli_from(args).unwrap()
}

#[test]
fn test_replay_of_downsampled_file() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..90).map(|i| (i * 2).to_string()).collect();
    let data = write_samples(dir.path(), &lines);
    let config = config(&data, &["-t", "0", "-n", "200"]);

    let mut frames: Vec<(Vec<String>, Vec<i64>)> = Vec::new();
    let mut record = |frame: &Frame<'_>| -> Result<(), Box<dyn Error>> {
        assert_eq!(frame.y_ceiling, 200.);
        frames.push((frame.labels.to_vec(), frame.values.to_vec()));
        Ok(())
    };
    let end = run_session(&config, &mut record, &StopSignal::new()).unwrap();

    assert_eq!(end, SessionEnd::Completed { frames: 9 });
    assert_eq!(frames.len(), 9);
    let (labels, first) = &frames[0];
    assert_eq!(labels[0], "10:00");
    assert_eq!(labels[8], "14:00");
    assert_eq!(first, &vec![0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(frames[1].1, vec![0, 20, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(frames[8].1, vec![0, 20, 40, 60, 80, 100, 120, 140, 160]);
}

#[test]
fn test_short_file_fails_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..5).map(|i| i.to_string()).collect();
    let data = write_samples(dir.path(), &lines);
    let config = config(&data, &[]);

    let mut rendered = false;
    let mut record = |_: &Frame<'_>| -> Result<(), Box<dyn Error>> {
        rendered = true;
        Ok(())
    };
    let err = run_session(&config, &mut record, &StopSignal::new()).unwrap_err();
    assert!(matches!(
        err,
        LiveError::NotEnoughSamples {
            samples: 5,
            slots: 9
        }
    ));
    assert_eq!(err.exit_code(), 2);
    assert!(!rendered);
}

#[test]
fn test_malformed_file_fails_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines: Vec<String> = (0..20).map(|i| i.to_string()).collect();
    lines[6] = String::from("n/a");
    let data = write_samples(dir.path(), &lines);
    let config = config(&data, &[]);

    let mut record = |_: &Frame<'_>| -> Result<(), Box<dyn Error>> { panic!("rendered") };
    match run_session(&config, &mut record, &StopSignal::new()) {
        Err(e @ LiveError::SampleParse { .. }) => {
            assert_eq!(e.exit_code(), 2);
            assert!(e.to_string().contains("line 7"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_missing_file_is_a_data_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir.path().join("nope.txt"), &[]);
    let mut record = |_: &Frame<'_>| -> Result<(), Box<dyn Error>> { Ok(()) };
    let err = run_session(&config, &mut record, &StopSignal::new()).unwrap_err();
    assert!(matches!(err, LiveError::DataSource { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_stopped_session_renders_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..9).map(|i| i.to_string()).collect();
    let data = write_samples(dir.path(), &lines);
    let config = config(&data, &[]);
    let stop = StopSignal::new();
    stop.stop();
    let mut record = |_: &Frame<'_>| -> Result<(), Box<dyn Error>> { panic!("rendered") };
    let end = run_session(&config, &mut record, &stop).unwrap();
    assert_eq!(end, SessionEnd::Stopped { frames: 0 });
}

#[test]
fn test_svg_session_for_every_plot_kind() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..18).map(|i| (i * 5).to_string()).collect();
    let data = write_samples(dir.path(), &lines);
    for kind in &["0", "1", "2"] {
        let output = dir.path().join(format!("live_{}.svg", kind));
        let output_arg = output.to_str().unwrap().to_string();
        let config = config(&data, &["-t", *kind, "-o", output_arg.as_str()]);
        let mut renderer = ChartRenderer::new(config.render.clone());
        let end = run_session(&config, &mut renderer, &StopSignal::new()).unwrap();
        assert_eq!(end, SessionEnd::Completed { frames: 9 });
        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("10:00"));
        assert!(svg.contains("chart"));
    }
}

#[test]
fn test_svg_session_keeps_numbered_frames() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..9).map(|i| i.to_string()).collect();
    let data = write_samples(dir.path(), &lines);
    let output = dir.path().join("live.svg");
    let output_arg = output.to_str().unwrap().to_string();
    let config = config(&data, &["-o", output_arg.as_str(), "--frames"]);
    let mut renderer = ChartRenderer::new(config.render.clone());
    run_session(&config, &mut renderer, &StopSignal::new()).unwrap();
    for i in 0..9 {
        assert!(dir.path().join(format!("live_{:04}.svg", i)).exists());
    }
    assert!(!output.exists());
}
