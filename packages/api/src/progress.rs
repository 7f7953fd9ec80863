//! # Upload progress reporting
//!
//! Progress is published through an explicit subscription instead of a
//! callback: [`ProgressTracker::channel`] returns the tracker (handed to the
//! transport) and a [`ProgressStream`] (handed to whoever renders the bar).
//! The stream yields whole percentages and ends once every clone of the
//! tracker has been dropped, which happens when the upload call returns.
//!
//! Guarantees on the values a stream yields:
//!
//! - each is within `0..=100`;
//! - each is strictly greater than the one before (duplicates and regressions
//!   are swallowed), so the sequence is non-decreasing by construction.

use std::sync::{Arc, Mutex};

use futures::channel::mpsc;

/// Receiving half of a progress subscription.
pub type ProgressStream = mpsc::UnboundedReceiver<u8>;

/// Size of the slices an upload body is streamed in.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Sending half of a progress subscription. Cheap to clone, safe to move to
/// the thread that writes the request body.
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    inner: Arc<Mutex<u8>>,
    sink: Option<mpsc::UnboundedSender<u8>>,
}

impl ProgressTracker {
    /// A tracker together with the stream of values it reports.
    pub fn channel() -> (Self, ProgressStream) {
        let (tx, rx) = mpsc::unbounded();
        let tracker = Self {
            inner: Arc::new(Mutex::new(0)),
            sink: Some(tx),
        };
        (tracker, rx)
    }

    /// A tracker nobody listens to.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self {
            inner: Arc::new(Mutex::new(0)),
            sink: None,
        }
    }

    /// Report a percentage. Values above 100 are clamped; values not above
    /// the last reported one are ignored.
    pub fn report(&self, percent: u8) {
        let percent = percent.min(100);
        let Ok(mut last) = self.inner.lock() else {
            return;
        };
        if percent <= *last {
            return;
        }
        *last = percent;
        if let Some(sink) = &self.sink {
            let _ = sink.unbounded_send(percent);
        }
    }

    /// Report progress as bytes sent out of bytes total, rounded to the
    /// nearest percent. An empty body counts as complete.
    pub fn report_bytes(&self, sent: u64, total: u64) {
        if total == 0 {
            self.report(100);
            return;
        }
        let sent = sent.min(total);
        let percent = (sent * 100 + total / 2) / total;
        self.report(percent as u8);
    }
}

/// Split a payload into the chunks the transport sends one by one.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub(crate) fn chunked(bytes: &[u8]) -> Vec<Vec<u8>> {
    bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_stream_is_monotonic_and_bounded() {
        let (tracker, stream) = ProgressTracker::channel();

        tracker.report(10);
        tracker.report(5);
        tracker.report(10);
        tracker.report(50);
        tracker.report(250);
        tracker.report(99);
        drop(tracker);

        let values: Vec<u8> = stream.collect().await;
        assert_eq!(values, vec![10, 50, 100]);
    }

    #[tokio::test]
    async fn test_clones_share_progress() {
        let (tracker, stream) = ProgressTracker::channel();
        let transport_side = tracker.clone();

        transport_side.report_bytes(1, 4);
        tracker.report_bytes(1, 4);
        transport_side.report_bytes(4, 4);
        drop(tracker);
        drop(transport_side);

        let values: Vec<u8> = stream.collect().await;
        assert_eq!(values, vec![25, 100]);
    }

    #[tokio::test]
    async fn test_report_bytes_rounding() {
        let (tracker, stream) = ProgressTracker::channel();
        tracker.report_bytes(1, 3);
        tracker.report_bytes(2, 3);
        tracker.report_bytes(10, 3);
        drop(tracker);
        assert_eq!(stream.collect::<Vec<u8>>().await, vec![33, 67, 100]);

        let (empty, stream) = ProgressTracker::channel();
        empty.report_bytes(0, 0);
        drop(empty);
        assert_eq!(stream.collect::<Vec<u8>>().await, vec![100]);
    }

    #[test]
    fn test_chunked_sizes() {
        let payload = vec![7u8; CHUNK_SIZE * 2 + 10];
        let chunks = chunked(&payload);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 10);
        assert!(chunked(&[]).is_empty());
    }
}
