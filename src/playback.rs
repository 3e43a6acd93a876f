use crate::axis::TimeAxis;
use crate::error::LiveError;
use crate::render::PlotKind;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// What the renderer receives for one step of the replay.
/// `values` always has one entry per label; positions after `position` are still zero.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub position: usize,
    pub labels: &'a [String],
    pub values: &'a [i64],
    pub y_ceiling: f64,
    pub kind: PlotKind,
}

/// Draws one frame. Any closure over a Frame is a Renderer too.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), Box<dyn Error>>;
}

impl<F> Renderer for F
where
    F: FnMut(&Frame<'_>) -> Result<(), Box<dyn Error>>,
{
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), Box<dyn Error>> {
        self(frame)
    }
}

/// Cooperative stop flag, checked before every frame.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> StopSignal {
        StopSignal::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    pub y_ceiling: f64,
    pub kind: PlotKind,
    pub pause: Duration,
}

/// How a replay ended, with the number of frames drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed { frames: usize },
    Stopped { frames: usize },
}

impl SessionEnd {
    pub fn frames(&self) -> usize {
        match *self {
            SessionEnd::Completed { frames } | SessionEnd::Stopped { frames } => frames,
        }
    }
}

/// Replays `values` along the axis, one rendered frame per slot,
/// blocking for `settings.pause` after each frame.
pub fn run<R: Renderer + ?Sized>(
    axis: &TimeAxis,
    values: &[i64],
    settings: &PlaybackSettings,
    renderer: &mut R,
    stop: &StopSignal,
) -> Result<SessionEnd, LiveError> {
    if values.len() < axis.len() {
        return Err(LiveError::NotEnoughSamples {
            samples: values.len(),
            slots: axis.len(),
        });
    }
    let labels = axis.labels();
    let mut buffer = vec![0i64; axis.len()];
    info!(slots = axis.len(), kind = ?settings.kind, "starting playback");

    for (i, &value) in values.iter().take(axis.len()).enumerate() {
        if stop.is_stopped() {
            info!(frames = i, "playback stopped");
            return Ok(SessionEnd::Stopped { frames: i });
        }
        buffer[i] = value;
        let frame = Frame {
            position: i,
            labels: &labels,
            values: &buffer,
            y_ceiling: settings.y_ceiling,
            kind: settings.kind,
        };
        renderer
            .render(&frame)
            .map_err(|e| LiveError::Render(format!("frame {} ({}): {}", i, labels[i], e)))?;
        debug!(position = i, label = %labels[i], value, "frame drawn");
        if !settings.pause.is_zero() {
            std::thread::sleep(settings.pause);
        }
    }

    info!(frames = axis.len(), "playback finished");
    Ok(SessionEnd::Completed { frames: axis.len() })
}
