use super::VERSION;
use crate::axis::{TimeAxis, TimeSpec};
use crate::error::LiveError;
use crate::feed::{downsample, SampleSeries};
use crate::playback::{self, PlaybackSettings, Renderer, SessionEnd, StopSignal};
use crate::render::{PlotKind, RenderConfig};
use crate::TIME_FORMAT;
use clap::{App, Arg, ArgMatches};
use std::ffi::OsString;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// The validated settings of one replay session.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveConfig {
    pub spec: TimeSpec,
    pub data: PathBuf,
    pub kind: PlotKind,
    pub y_ceiling: f64,
    pub pause: Duration,
    pub render: RenderConfig,
    pub hold: bool,
    pub verbose: bool,
}

impl LiveConfig {
    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            y_ceiling: self.y_ceiling,
            kind: self.kind,
            pause: self.pause,
        }
    }
}

/// Takes the CLI arguments that control the live replay.
pub fn parse_cli() -> Result<LiveConfig, LiveError> {
    parse_cli_from(std::env::args_os())
}

pub fn parse_cli_from<I, T>(args: I) -> Result<LiveConfig, LiveError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let arg_start = Arg::with_name("start")
        .help("x-axis start time, HH:MM between 00:00 and 23:59")
        .short("s")
        .long("start")
        .takes_value(true)
        .required(true);
    let arg_end = Arg::with_name("end")
        .help("x-axis end time, HH:MM after the start time")
        .short("e")
        .long("end")
        .takes_value(true)
        .required(true);
    let arg_dir = Arg::with_name("dir")
        .help("path of the file with one integer sample per line")
        .short("d")
        .long("dir")
        .takes_value(true)
        .required(true);
    let arg_type = Arg::with_name("type")
        .help("type of plot, 0: line, 1: bar, 2: stacked bar")
        .short("t")
        .long("type")
        .takes_value(true)
        .possible_values(&["0", "1", "2"])
        .default_value("1");
    let arg_font = Arg::with_name("font")
        .help("font family for the chart texts")
        .short("f")
        .long("font")
        .takes_value(true)
        .default_value("sans-serif");
    let arg_interval = Arg::with_name("interval")
        .help("x-axis time interval in minutes, must divide 60 (15, 20, 30, 60)")
        .short("i")
        .long("interval")
        .takes_value(true)
        .default_value("30");
    let arg_number = Arg::with_name("number")
        .help("y-axis max range")
        .short("n")
        .long("number")
        .takes_value(true)
        .allow_hyphen_values(true)
        .default_value("100");
    let arg_pause = Arg::with_name("pause_time")
        .help("pause between frames, in seconds")
        .short("p")
        .long("pause_time")
        .takes_value(true)
        .allow_hyphen_values(true)
        .default_value("0.5");
    let arg_output = Arg::with_name("output")
        .help("output chart file, svg or png; defaults to the data file with svg extension")
        .short("o")
        .long("output")
        .takes_value(true);
    let arg_frames = Arg::with_name("frames")
        .help("keep every frame as a numbered file instead of redrawing one file")
        .long("frames")
        .takes_value(false);
    let arg_hold = Arg::with_name("hold")
        .help("wait for enter after the replay before exiting")
        .long("hold")
        .takes_value(false);
    let arg_verbose = Arg::with_name("verbose")
        .help("print verbose information")
        .short("v")
        .long("verbose")
        .takes_value(false);

    let cli_args = App::new("live_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to replay a sample file as a live chart")
        .arg(arg_start)
        .arg(arg_end)
        .arg(arg_dir)
        .arg(arg_type)
        .arg(arg_font)
        .arg(arg_interval)
        .arg(arg_number)
        .arg(arg_pause)
        .arg(arg_output)
        .arg(arg_frames)
        .arg(arg_hold)
        .arg(arg_verbose)
        .get_matches_from_safe(args)?;

    let interval: u32 = parse_value(&cli_args, "interval")?;
    let spec = TimeSpec::parse(
        cli_args.value_of("start").unwrap_or_default(),
        cli_args.value_of("end").unwrap_or_default(),
        interval,
    )?;

    let y_ceiling: f64 = parse_value(&cli_args, "number")?;
    if !(y_ceiling.is_finite() && y_ceiling > 0.) {
        return Err(LiveError::InvalidArgument {
            name: "number",
            reason: format!("y-axis max range must be positive, got {}", y_ceiling),
        });
    }
    let pause_time: f64 = parse_value(&cli_args, "pause_time")?;
    let pause = Duration::try_from_secs_f64(pause_time).map_err(|e| LiveError::InvalidArgument {
        name: "pause_time",
        reason: format!("pause must be zero or more seconds, got {} ({})", pause_time, e),
    })?;
    let kind: PlotKind = cli_args.value_of("type").unwrap_or_default().parse()?;

    let data = PathBuf::from(cli_args.value_of("dir").unwrap_or_default());
    let output = match cli_args.value_of("output") {
        Some(p) => PathBuf::from(p),
        None => {
            let mut output = data.clone();
            output.set_extension("svg");
            output
        }
    };
    let mut render = RenderConfig::new(output, cli_args.value_of("font").unwrap_or_default());
    render.keep_frames = cli_args.is_present("frames");

    Ok(LiveConfig {
        spec,
        data,
        kind,
        y_ceiling,
        pause,
        render,
        hold: cli_args.is_present("hold"),
        verbose: cli_args.is_present("verbose"),
    })
}

fn parse_value<T>(cli_args: &ArgMatches, name: &'static str) -> Result<T, LiveError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = cli_args.value_of(name).unwrap_or_default();
    raw.trim().parse::<T>().map_err(|e| LiveError::InvalidArgument {
        name,
        reason: format!("`{}`: {}", raw, e),
    })
}

/// Builds the axis, loads and downsamples the samples, then replays them through `renderer`.
/// Nothing is rendered unless the axis and the data are both valid.
pub fn run_session<R: Renderer + ?Sized>(
    config: &LiveConfig,
    renderer: &mut R,
    stop: &StopSignal,
) -> Result<SessionEnd, LiveError> {
    let axis = TimeAxis::build(&config.spec);
    info!(
        start = %config.spec.start().format(TIME_FORMAT),
        end = %config.spec.end().format(TIME_FORMAT),
        interval = config.spec.interval(),
        slots = axis.len(),
        "built time axis"
    );
    let series = SampleSeries::load(&config.data)?;
    let values = downsample(&series, axis.len())?;
    playback::run(&axis, &values, &config.playback_settings(), renderer, stop)
}
