use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of the failures, used to pick the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidTimeSpec,
    DataSource,
    SampleParse,
    Render,
}

#[derive(Debug, Error)]
pub enum LiveError {
    #[error("invalid time spec: {0}")]
    InvalidTimeSpec(String),
    #[error("invalid value for `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("could not read samples from {}: {source}", .path.display())]
    DataSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("not enough samples: {samples} sample(s) for {slots} axis slot(s)")]
    NotEnoughSamples { samples: usize, slots: usize },
    #[error("line {line}: `{content}` is not an integer sample")]
    SampleParse { line: usize, content: String },
    #[error("could not render frame: {0}")]
    Render(String),
}

impl LiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LiveError::InvalidTimeSpec(_) | LiveError::InvalidArgument { .. } | LiveError::Cli(_) => {
                ErrorKind::InvalidTimeSpec
            }
            LiveError::DataSource { .. } | LiveError::NotEnoughSamples { .. } => ErrorKind::DataSource,
            LiveError::SampleParse { .. } => ErrorKind::SampleParse,
            LiveError::Render(_) => ErrorKind::Render,
        }
    }

    /// 1 for bad arguments or time spec, 2 for data problems, 3 when playback fails
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidTimeSpec => 1,
            ErrorKind::DataSource | ErrorKind::SampleParse => 2,
            ErrorKind::Render => 3,
        }
    }
}
