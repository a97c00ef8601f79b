// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MJPEG passthrough: pulls already-encoded frames from an opaque
//! `FrameSource` and frames them for `multipart/x-mixed-replace`.
//!
//! Frame capture and JPEG encoding are external collaborators (spec.md §1);
//! this module only owns the multipart framing, pacing, and the synthetic
//! placeholder frame emitted on a read failure.

use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{self, Stream};

/// A source of opaque, already-encoded video frames.
pub trait FrameSource: Send {
    /// Returns the next frame, or `None` on a read failure. `overlays`
    /// requests that the source burn in its own overlay (e.g. a timestamp);
    /// rendering detail is entirely the source's concern.
    fn next_frame(&mut self, overlays: bool) -> Option<Vec<u8>>;
}

/// Synthetic frame emitted in place of a disconnect when the source fails a
/// read, so the stream keeps flowing rather than dropping the connection.
const PLACEHOLDER_FRAME: &[u8] = b"placeholder-frame: camera disconnected";

/// Deterministic frame source used when no real camera is configured.
pub struct MockFrameSource {
    seq: u64,
}

impl MockFrameSource {
    pub fn new() -> Self {
        Self { seq: 0 }
    }
}

impl Default for MockFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for MockFrameSource {
    fn next_frame(&mut self, overlays: bool) -> Option<Vec<u8>> {
        self.seq += 1;
        let tag = if overlays { "overlay" } else { "raw" };
        Some(format!("mock-frame seq={} {tag}", self.seq).into_bytes())
    }
}

/// Wrap one frame's bytes in the literal MJPEG boundary framing.
pub fn frame_chunk(payload: &[u8]) -> Bytes {
    let mut buf = Vec::with_capacity(payload.len() + 48);
    buf.extend_from_slice(b"--frame\r\n");
    buf.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    buf.extend_from_slice(payload);
    buf.extend_from_slice(b"\r\n");
    Bytes::from(buf)
}

/// Build an unending stream of framed MJPEG chunks, paced to `frame_interval`.
pub fn mjpeg_stream(
    source: Box<dyn FrameSource>,
    overlays: bool,
    frame_interval: Duration,
) -> impl Stream<Item = Result<Bytes, std::convert::Infallible>> {
    stream::unfold(source, move |mut source| async move {
        tokio::time::sleep(frame_interval).await;
        let payload = source.next_frame(overlays).unwrap_or_else(|| PLACEHOLDER_FRAME.to_vec());
        Some((Ok(frame_chunk(payload.as_slice())), source))
    })
}
