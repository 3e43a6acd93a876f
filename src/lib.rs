pub mod axis;
pub mod error;
pub mod feed;
pub mod live;
pub mod playback;
pub mod render;

pub use axis::{build, TimeAxis, TimeSlot, TimeSpec};
pub use error::{ErrorKind, LiveError};
pub use feed::{downsample, SampleSeries};
pub use playback::{Frame, PlaybackSettings, Renderer, SessionEnd, StopSignal};
pub use render::{ChartRenderer, PlotKind, RenderConfig};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// format of the start and end times given on the command line
pub const TIME_FORMAT: &str = "%H:%M";

pub const HOUR_MINUTES: u32 = 60;
