//! Growable inflate buffer
//!
//! zTXt chunks do not record their uncompressed size. [`InflateBuffer`]
//! starts small and doubles its capacity whenever the decompressor fills it,
//! up to a hard limit.

use flate2::{Decompress, FlushDecompress, Status};
use log::{debug, trace};

use crate::metadata::errors::{AnalysisError, AnalysisResult};

/// Output buffer for zlib inflation with bounded doubling growth
#[derive(Debug)]
pub struct InflateBuffer {
    /// Inflated bytes so far; capacity is the current buffer size
    output: Vec<u8>,
    /// Capacity beyond which inflation fails
    max_capacity: usize,
}

impl InflateBuffer {
    /// Creates a buffer of `initial` bytes that may grow to `max_capacity`
    pub fn new(initial: usize, max_capacity: usize) -> Self {
        let initial = initial.clamp(1, max_capacity.max(1));
        InflateBuffer {
            output: Vec::with_capacity(initial),
            max_capacity: max_capacity.max(1),
        }
    }

    /// Current buffer size
    pub fn capacity(&self) -> usize {
        self.output.capacity()
    }

    /// Inflates a complete zlib stream
    ///
    /// The decompressor is driven incrementally so that a full buffer can be
    /// grown and the call resumed where it stopped.
    ///
    /// # Returns
    /// The inflated bytes, exactly as long as the original data
    pub fn inflate(mut self, input: &[u8]) -> AnalysisResult<Vec<u8>> {
        let mut decompressor = Decompress::new(true);

        loop {
            let consumed = decompressor.total_in() as usize;
            let produced = decompressor.total_out();

            let status = decompressor
                .decompress_vec(&input[consumed..], &mut self.output, FlushDecompress::None)
                .map_err(|e| AnalysisError::DecompressionFailed(e.to_string()))?;

            match status {
                Status::StreamEnd => {
                    if self.output.len() > self.max_capacity {
                        return Err(self.limit_error());
                    }
                    debug!("Inflated {} bytes into {}", input.len(), self.output.len());
                    return Ok(self.output);
                }
                Status::Ok | Status::BufError => {
                    if self.output.len() == self.output.capacity() {
                        self.grow()?;
                        continue;
                    }

                    let progressed = decompressor.total_in() as usize != consumed
                        || decompressor.total_out() != produced;
                    if !progressed {
                        return Err(AnalysisError::DecompressionFailed(
                            "zlib stream ends early".to_string(),
                        ));
                    }
                }
            }
        }
    }

    /// Doubles the buffer, failing once the limit has been reached
    ///
    /// The buffer may reach one byte past the limit so that output of
    /// exactly `max_capacity` bytes can still see the end of the stream.
    fn grow(&mut self) -> AnalysisResult<()> {
        let capacity = self.output.capacity();
        let hard_limit = self.max_capacity.saturating_add(1);
        if capacity >= hard_limit {
            return Err(self.limit_error());
        }

        let target = capacity.saturating_mul(2).clamp(1, hard_limit);
        trace!("Growing inflate buffer from {} to {}", capacity, target);
        self.output.reserve_exact(target - self.output.len());
        Ok(())
    }

    fn limit_error(&self) -> AnalysisError {
        AnalysisError::DecompressionFailed(format!("output exceeds {} bytes", self.max_capacity))
    }
}
