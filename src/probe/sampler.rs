//! Frame sampling
//!
//! Drives a frame sequence until a frame cap is reached or the stream ends,
//! collecting presentation timestamps in arrival order plus the first
//! successfully decoded frame.

use tracing::{debug, warn};

use crate::domain::model::FrameTimingSample;
use crate::ports::{DecodedFrame, FrameEvent, FrameSequence};

/// Default number of decoded frames to sample
pub const DEFAULT_SAMPLE_FRAMES: usize = 600;

/// Smallest useful cap: two timestamps are needed for one delta
pub const MIN_SAMPLE_FRAMES: usize = 2;

/// What the sampler collected from one stream
#[derive(Debug, Clone, Default)]
pub struct SampleOutcome {
    pub timing: FrameTimingSample,
    /// First successfully decoded frame; carries pixel format and size
    pub first_frame: Option<DecodedFrame>,
    pub decoded_frames: usize,
    pub corrupt_frames: usize,
    /// Frames without a presentation timestamp
    pub missing_timestamps: usize,
    /// Timestamps dropped for arriving out of order
    pub dropped_timestamps: usize,
    /// Whether the whole stream was consumed before the cap
    pub exhausted: bool,
}

impl SampleOutcome {
    /// At least one frame decoded
    pub fn any_decoded(&self) -> bool {
        self.decoded_frames > 0
    }

    /// Playback span covered by the sample, including the last frame's
    /// display time. Only meaningful when the whole stream was sampled.
    pub fn observed_duration(&self) -> Option<f64> {
        if !self.exhausted {
            return None;
        }
        let timestamps = self.timing.timestamps();
        let (first, last) = (timestamps.first()?, timestamps.last()?);
        let deltas = self.timing.deltas();
        if deltas.is_empty() {
            return None;
        }
        let mean_delta = deltas.iter().sum::<f64>() / deltas.len() as f64;
        Some(last - first + mean_delta)
    }
}

/// Frame sampler with a bounded decode budget
#[derive(Debug, Clone, Copy)]
pub struct FrameSampler {
    max_frames: usize,
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_FRAMES)
    }
}

impl FrameSampler {
    pub fn new(max_frames: usize) -> Self {
        Self {
            max_frames: max_frames.max(MIN_SAMPLE_FRAMES),
        }
    }

    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// Consume frames until the cap is reached or the sequence ends.
    /// Per-frame failures are counted and skipped.
    pub fn sample(&self, mut frames: FrameSequence) -> SampleOutcome {
        let mut outcome = SampleOutcome::default();

        loop {
            if outcome.decoded_frames >= self.max_frames {
                break;
            }
            let event = match frames.next() {
                Some(event) => event,
                None => {
                    outcome.exhausted = true;
                    break;
                }
            };

            match event {
                FrameEvent::Decoded(frame) => {
                    outcome.decoded_frames += 1;
                    match frame.pts_seconds {
                        Some(pts) => {
                            if !outcome.timing.push(pts) {
                                debug!(pts, "Dropping out-of-order timestamp");
                                outcome.dropped_timestamps += 1;
                            }
                        }
                        None => outcome.missing_timestamps += 1,
                    }
                    if outcome.first_frame.is_none() {
                        outcome.first_frame = Some(frame);
                    }
                }
                FrameEvent::Corrupt { reason } => {
                    debug!("Skipping unreadable frame: {}", reason);
                    outcome.corrupt_frames += 1;
                }
            }
        }

        if outcome.corrupt_frames > 0 {
            warn!(
                corrupt = outcome.corrupt_frames,
                decoded = outcome.decoded_frames,
                "Some frames could not be decoded"
            );
        }
        if outcome.dropped_timestamps > 0 {
            warn!(
                dropped = outcome.dropped_timestamps,
                "Timestamps arrived out of presentation order"
            );
        }

        outcome
    }
}
