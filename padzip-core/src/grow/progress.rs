/// Snapshot emitted while filler chunks are written.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GrowProgress {
    pub chunks_written: u64,
    pub total_chunks: u64,
    pub bytes_written: u64,
    pub total_bytes: u64,
}

impl GrowProgress {
    pub fn is_done(&self) -> bool {
        self.bytes_written == self.total_bytes
    }
}

/// Receiver for padding progress. Purely informational.
pub trait GrowProgressSink {
    fn on_progress(&mut self, progress: GrowProgress);
}

impl<F: FnMut(GrowProgress)> GrowProgressSink for F {
    fn on_progress(&mut self, progress: GrowProgress) {
        self(progress)
    }
}

/// Sink that drops every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoProgress;

impl GrowProgressSink for NoProgress {
    fn on_progress(&mut self, _progress: GrowProgress) {}
}
