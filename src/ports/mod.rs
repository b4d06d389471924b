// Ports - Interface definitions (contracts)

use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Cheap file liveness signal, available even when decoding fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Liveness {
    /// First and last bytes of the file could be read
    pub readable: bool,
    /// File size is greater than zero
    pub non_zero_bytes: bool,
}

/// A frame the decoder produced successfully
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// Presentation timestamp in seconds, when the frame carries one
    pub pts_seconds: Option<f64>,
    /// Decoder-native pixel format name
    pub pixel_format: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// One step of a frame sequence
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    Decoded(DecodedFrame),
    /// A frame or packet failed to decode; the sequence continues
    Corrupt { reason: String },
}

/// Lazy, finite, non-restartable frame sequence
pub type FrameSequence = Box<dyn Iterator<Item = FrameEvent>>;

/// Port for opening and decoding media files
pub trait DecoderPort: Send + Sync {
    /// Read the first and last byte of the file without decoding it
    fn probe_liveness(&self, path: &Path) -> Liveness;

    /// Open the container. Fails with `DecodeFail` when it cannot be demuxed.
    fn open(&self, path: &Path) -> Result<Box<dyn MediaHandle>, DomainError>;
}

/// An opened media file, owned by exactly one pipeline.
///
/// Dropping the handle releases every decoder resource it holds.
pub trait MediaHandle {
    /// Demuxer short and long name
    fn container_format(&self) -> ContainerDescriptor;

    /// Video streams, best candidate first
    fn video_streams(&self) -> Vec<VideoStreamDescriptor>;

    /// Container-level duration in seconds, if declared
    fn container_duration(&self) -> Option<f64>;

    /// Consume the handle and decode the given stream. Iterating again
    /// requires opening the file again.
    fn into_frames(self: Box<Self>, stream_index: usize) -> Result<FrameSequence, DomainError>;
}
