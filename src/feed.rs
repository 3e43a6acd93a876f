use crate::error::LiveError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// The raw integer samples, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSeries {
    samples: Vec<i64>,
}

impl SampleSeries {
    pub fn new(samples: Vec<i64>) -> SampleSeries {
        SampleSeries { samples }
    }

    /// Init a SampleSeries from a file with one integer per line.
    /// Blank lines are skipped, anything else that is not an integer aborts the load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SampleSeries, LiveError> {
        let path = path.as_ref();
        let data_source = |source| LiveError::DataSource {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(data_source)?;
        let series = SampleSeries::from_reader(file).map_err(|e| match e {
            LiveError::DataSource { source, .. } => data_source(source),
            other => other,
        })?;
        debug!(samples = series.len(), path = %path.display(), "loaded samples");
        Ok(series)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SampleSeries, LiveError> {
        let buf = BufReader::new(reader);
        let mut samples = Vec::new();
        for (i, l) in buf.lines().enumerate() {
            let line = l.map_err(|source| match source.kind() {
                io::ErrorKind::InvalidData => LiveError::SampleParse {
                    line: i + 1,
                    content: String::from("<invalid utf-8>"),
                },
                _ => LiveError::DataSource {
                    path: Default::default(),
                    source,
                },
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value = trimmed.parse::<i64>().map_err(|_| LiveError::SampleParse {
                line: i + 1,
                content: trimmed.to_string(),
            })?;
            samples.push(value);
        }
        Ok(SampleSeries { samples })
    }

    pub fn samples(&self) -> &[i64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Picks every `len / target_len`-th sample, starting at the first,
/// until `target_len` values are taken; the tail past the last full stride is dropped.
pub fn downsample(series: &SampleSeries, target_len: usize) -> Result<Vec<i64>, LiveError> {
    if target_len == 0 {
        return Ok(Vec::new());
    }
    let n = series.len();
    if n < target_len {
        return Err(LiveError::NotEnoughSamples {
            samples: n,
            slots: target_len,
        });
    }
    let stride = n / target_len;
    debug!(samples = n, slots = target_len, stride, "downsampling");
    Ok(series
        .samples
        .iter()
        .step_by(stride)
        .take(target_len)
        .copied()
        .collect())
}
