use std::io::{Result, Write};

use super::progress::{GrowProgress, GrowProgressSink};

/// How a padding run splits into fixed-size chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    pub total: u64,
    pub chunk_size: usize,
    pub full_chunks: u64,
    /// Bytes in the trailing partial chunk (0 when `total` divides evenly).
    pub remainder: usize,
}

impl ChunkPlan {
    /// `chunk_size` must be non-zero; callers validate it first.
    pub fn new(total: u64, chunk_size: usize) -> Self {
        let cs = chunk_size as u64;
        Self {
            total,
            chunk_size,
            full_chunks: total / cs,
            remainder: (total % cs) as usize,
        }
    }

    pub fn total_chunks(&self) -> u64 {
        self.full_chunks + u64::from(self.remainder > 0)
    }

    /// Size of the one buffer the run needs.
    fn buffer_len(&self) -> usize {
        if self.full_chunks > 0 {
            self.chunk_size
        } else {
            self.remainder
        }
    }
}

/// Append `plan.total` copies of `byte` to `w`, one chunk buffer reused for the whole run.
///
/// `every` is the notification stride in chunks; the last chunk always notifies.
pub fn write_filler<W: Write + ?Sized>(
    w: &mut W,
    byte: u8,
    plan: &ChunkPlan,
    every: u64,
    sink: &mut dyn GrowProgressSink,
) -> Result<u64> {
    let total_chunks = plan.total_chunks();
    if total_chunks == 0 {
        return Ok(0);
    }
    let buf = vec![byte; plan.buffer_len()];
    let every = every.max(1);
    let mut written = 0u64;

    for i in 0..total_chunks {
        let n = if i < plan.full_chunks {
            plan.chunk_size
        } else {
            plan.remainder
        };
        w.write_all(&buf[..n])?;
        written += n as u64;

        let last = i + 1 == total_chunks;
        if i % every == 0 || last {
            sink.on_progress(GrowProgress {
                chunks_written: i + 1,
                total_chunks,
                bytes_written: written,
                total_bytes: plan.total,
            });
        }
    }
    Ok(written)
}
