// Probe LibAV adapter - Container access and frame decoding using libav

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use ffmpeg_next as ffmpeg;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Consecutive demux/decode errors tolerated before a stream is abandoned
const MAX_CONSECUTIVE_ERRORS: u32 = 64;

/// LibAV-based decoder adapter
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    /// Create new LibAV adapter, initializing the library once
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg::init().map_err(|e| {
            DomainError::InternalError(format!("Failed to initialize FFmpeg: {}", e))
        })?;
        ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Error);
        Ok(Self)
    }

    fn read_edges(path: &Path) -> std::io::Result<bool> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(false);
        }

        let mut byte = [0u8; 1];
        file.read_exact(&mut byte)?;
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut byte)?;
        Ok(true)
    }
}

impl DecoderPort for ProbeLibavAdapter {
    fn probe_liveness(&self, path: &Path) -> Liveness {
        let non_zero_bytes = std::fs::metadata(path)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        let readable = match Self::read_edges(path) {
            Ok(readable) => readable,
            Err(e) => {
                debug!("Liveness probe failed for {}: {}", path.display(), e);
                false
            }
        };
        Liveness {
            readable,
            non_zero_bytes,
        }
    }

    fn open(&self, path: &Path) -> Result<Box<dyn MediaHandle>, DomainError> {
        let input = ffmpeg::format::input(path).map_err(|e| {
            DomainError::DecodeFail(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Box::new(LibavHandle { input }))
    }
}

/// An opened libav input context
struct LibavHandle {
    input: ffmpeg::format::context::Input,
}

impl LibavHandle {
    fn describe_stream(stream: &ffmpeg::Stream) -> VideoStreamDescriptor {
        let (width, height, pixel_format) =
            match ffmpeg::codec::context::Context::from_parameters(stream.parameters())
                .and_then(|context| context.decoder().video())
            {
                Ok(decoder) => (
                    decoder.width(),
                    decoder.height(),
                    pixel_format_name(decoder.format()),
                ),
                Err(e) => {
                    debug!("No decoder for stream {}: {}", stream.index(), e);
                    (0, 0, None)
                }
            };

        VideoStreamDescriptor {
            index: stream.index(),
            width,
            height,
            pixel_format,
            declared_duration: ticks_to_seconds(stream.duration(), stream.time_base())
                .filter(|seconds| *seconds > 0.0),
        }
    }
}

impl MediaHandle for LibavHandle {
    fn container_format(&self) -> ContainerDescriptor {
        let format = self.input.format();
        ContainerDescriptor::new(format.name(), format.description())
    }

    fn video_streams(&self) -> Vec<VideoStreamDescriptor> {
        let best = self
            .input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .map(|stream| stream.index());

        let mut streams: Vec<VideoStreamDescriptor> = self
            .input
            .streams()
            .filter(|stream| stream.parameters().medium() == ffmpeg::media::Type::Video)
            .map(|stream| Self::describe_stream(&stream))
            .collect();
        streams.sort_by_key(|descriptor| Some(descriptor.index) != best);
        streams
    }

    fn container_duration(&self) -> Option<f64> {
        let duration = self.input.duration();
        if duration <= 0 || duration == ffmpeg::ffi::AV_NOPTS_VALUE {
            return None;
        }
        Some(duration as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE))
    }

    fn into_frames(self: Box<Self>, stream_index: usize) -> Result<FrameSequence, DomainError> {
        let LibavHandle { input } = *self;
        let (time_base, parameters) = {
            let stream = input.stream(stream_index).ok_or_else(|| {
                DomainError::DecodeFail(format!("Stream {} not found", stream_index))
            })?;
            (stream.time_base(), stream.parameters())
        };

        let decoder = ffmpeg::codec::context::Context::from_parameters(parameters)
            .map_err(|e| {
                DomainError::DecodeFail(format!("Failed to create decoder context: {}", e))
            })?
            .decoder()
            .video()
            .map_err(|e| DomainError::DecodeFail(format!("Failed to open video decoder: {}", e)))?;

        Ok(Box::new(LibavFrames {
            input,
            decoder,
            stream_index,
            time_base,
            frame: ffmpeg::frame::Video::empty(),
            state: DecodeState::Reading,
            consecutive_errors: 0,
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Feeding packets to the decoder
    Reading,
    /// End of input signalled, collecting buffered frames
    Draining,
    Done,
}

/// Frame sequence over one video stream. Owns the input context and the
/// decoder; both are released when the sequence is dropped.
struct LibavFrames {
    input: ffmpeg::format::context::Input,
    decoder: ffmpeg::decoder::Video,
    stream_index: usize,
    time_base: ffmpeg::Rational,
    frame: ffmpeg::frame::Video,
    state: DecodeState,
    consecutive_errors: u32,
}

impl LibavFrames {
    fn decoded_frame(&self) -> DecodedFrame {
        let pts = self.frame.timestamp().or_else(|| self.frame.pts());
        DecodedFrame {
            pts_seconds: pts.and_then(|pts| ticks_to_seconds(pts, self.time_base)),
            pixel_format: pixel_format_name(self.frame.format()),
            width: self.frame.width(),
            height: self.frame.height(),
        }
    }

    /// Record an error; gives up on the stream once too many arrive in a row
    fn corrupt(&mut self, reason: String) -> FrameEvent {
        self.consecutive_errors += 1;
        if self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
            warn!(
                stream = self.stream_index,
                "Too many consecutive decode errors, stopping"
            );
            self.state = DecodeState::Done;
        }
        FrameEvent::Corrupt { reason }
    }

    fn start_draining(&mut self) {
        if let Err(e) = self.decoder.send_eof() {
            debug!("Decoder rejected end of stream: {}", e);
        }
        self.state = DecodeState::Draining;
    }
}

impl Iterator for LibavFrames {
    type Item = FrameEvent;

    fn next(&mut self) -> Option<FrameEvent> {
        loop {
            if self.state == DecodeState::Done {
                return None;
            }

            match self.decoder.receive_frame(&mut self.frame) {
                Ok(()) => {
                    self.consecutive_errors = 0;
                    return Some(FrameEvent::Decoded(self.decoded_frame()));
                }
                Err(ffmpeg::Error::Eof) => {
                    self.state = DecodeState::Done;
                    return None;
                }
                Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::error::EAGAIN => {
                    if self.state == DecodeState::Draining {
                        self.state = DecodeState::Done;
                        return None;
                    }
                }
                Err(e) => return Some(self.corrupt(format!("Frame decode failed: {}", e))),
            }

            let mut packet = ffmpeg::Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() != self.stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        return Some(self.corrupt(format!("Packet rejected by decoder: {}", e)));
                    }
                }
                Err(ffmpeg::Error::Eof) => self.start_draining(),
                Err(e) => {
                    let event = self.corrupt(format!("Packet read failed: {}", e));
                    if self.state == DecodeState::Done {
                        self.start_draining();
                    }
                    return Some(event);
                }
            }
        }
    }
}

fn ticks_to_seconds(ticks: i64, time_base: ffmpeg::Rational) -> Option<f64> {
    if ticks == ffmpeg::ffi::AV_NOPTS_VALUE || time_base.denominator() == 0 {
        return None;
    }
    let seconds = ticks as f64 * f64::from(time_base);
    seconds.is_finite().then_some(seconds)
}

fn pixel_format_name(format: ffmpeg::format::Pixel) -> Option<String> {
    if format == ffmpeg::format::Pixel::None {
        return None;
    }
    format.descriptor().map(|descriptor| descriptor.name().to_string())
}
