//! Media inspection: the measurement pipeline for one file

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{HashAlgorithm, MediaProfile};
use crate::domain::pixel_format::PixelFormatTable;
use crate::domain::timing::TimingClassifier;
use crate::domain::usecases::ProfileBuilder;
use crate::ports::DecoderPort;
use crate::probe::hasher::ContentHasher;
use crate::probe::sampler::{FrameSampler, SampleOutcome};
use crate::probe::sniffer::sniff_container;

/// Media inspector measuring files through a decoder port
pub struct MediaInspector {
    decoder: Arc<dyn DecoderPort>,
    hasher: ContentHasher,
    sampler: FrameSampler,
    pixel_formats: PixelFormatTable,
}

impl MediaInspector {
    /// Create an inspector with default hashing, sampling and pixel formats
    pub fn new(decoder: Arc<dyn DecoderPort>) -> Self {
        Self {
            decoder,
            hasher: ContentHasher::new(HashAlgorithm::default()),
            sampler: FrameSampler::default(),
            pixel_formats: PixelFormatTable::builtin(),
        }
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hasher = ContentHasher::new(algorithm);
        self
    }

    pub fn with_sample_frames(mut self, max_frames: usize) -> Self {
        self.sampler = FrameSampler::new(max_frames);
        self
    }

    pub fn with_pixel_formats(mut self, pixel_formats: PixelFormatTable) -> Self {
        self.pixel_formats = pixel_formats;
        self
    }

    /// Measure one file.
    ///
    /// Only a missing or unreadable file is an error. A file the decoder
    /// cannot open still yields a profile, marked unreadable.
    pub fn inspect(&self, path: &Path) -> Result<MediaProfile, DomainError> {
        info!("Inspecting media file: {}", path.display());

        let metadata = std::fs::metadata(path)
            .map_err(|e| DomainError::FileUnreadable(format!("{}: {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(DomainError::FileUnreadable(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let file_id = self.hasher.hash_file(path)?;
        let liveness = self.decoder.probe_liveness(path);
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let builder = ProfileBuilder::new(filename, path.display().to_string(), file_id);
        let unreadable = builder
            .clone()
            .with_liveness(false, liveness.non_zero_bytes);

        if !liveness.non_zero_bytes {
            warn!("File is empty, skipping decode: {}", path.display());
            return Ok(unreadable.build());
        }

        let sniffed = sniff_container(path);

        let handle = match self.decoder.open(path) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Container could not be opened: {}", e);
                return Ok(unreadable.build());
            }
        };

        let container = handle.container_format();
        let container_duration = handle.container_duration();
        let stream = match handle.video_streams().into_iter().next() {
            Some(stream) => stream,
            None => {
                warn!("No video stream in {}", path.display());
                return Ok(unreadable.build());
            }
        };
        debug!(
            stream = stream.index,
            demuxer = %container.short_name,
            "Selected video stream"
        );

        let frames = match handle.into_frames(stream.index) {
            Ok(frames) => frames,
            Err(e) => {
                warn!("Video stream could not be decoded: {}", e);
                return Ok(unreadable.build());
            }
        };
        let outcome = self.sampler.sample(frames);
        if !outcome.any_decoded() {
            warn!("No frame could be decoded from {}", path.display());
            return Ok(unreadable.build());
        }

        let timing = TimingClassifier::classify(&outcome.timing);
        let first_frame = outcome.first_frame.as_ref();

        let pixel_format = first_frame
            .and_then(|frame| frame.pixel_format.clone())
            .or_else(|| stream.pixel_format.clone());
        let color = pixel_format.as_deref().map(|name| self.pixel_formats.normalize(name));

        let dimensions = first_frame
            .map(|frame| (frame.width, frame.height))
            .filter(|&(x, y)| x > 0 && y > 0)
            .or(Some((stream.width, stream.height)));

        let duration = stream
            .declared_duration
            .or(container_duration)
            .or_else(|| outcome.observed_duration());

        let container_label = sniffed
            .map(str::to_string)
            .or_else(|| Some(container.primary_name().to_string()));

        Self::log_outcome(path, &outcome);
        info!(
            fps = ?timing.fps.as_option(),
            mode = ?timing.mode.as_option(),
            pixel_format = ?pixel_format,
            "Measured {}",
            path.display()
        );

        Ok(builder
            .with_liveness(liveness.readable, liveness.non_zero_bytes)
            .with_container_format(container_label)
            .with_dimensions(dimensions)
            .with_timing(timing)
            .with_color(color)
            .with_duration(duration)
            .build())
    }

    fn log_outcome(path: &Path, outcome: &SampleOutcome) {
        debug!(
            decoded = outcome.decoded_frames,
            corrupt = outcome.corrupt_frames,
            timestamps = outcome.timing.len(),
            missing_timestamps = outcome.missing_timestamps,
            exhausted = outcome.exhausted,
            "Sampled {}",
            path.display()
        );
    }
}
