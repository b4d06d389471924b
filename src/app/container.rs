use std::sync::Arc;

use crate::adapters::ProbeLibavAdapter;
use crate::app::check_interactor::CheckInteractor;
use crate::config_initialization::CheckSettings;
use crate::domain::pixel_format::PixelFormatTable;
use crate::error::{MediaCheckError, MediaCheckResult};
use crate::output::ReportWriter;
use crate::ports::DecoderPort;
use crate::probe::MediaInspector;

pub trait AppContainer: Send + Sync {
    fn check_interactor(&self) -> Arc<CheckInteractor>;
}

pub struct DefaultAppContainer {
    check_interactor: Arc<CheckInteractor>,
}

impl DefaultAppContainer {
    /// Wire the libav decoder into the check use case
    pub fn new(settings: &CheckSettings) -> MediaCheckResult<Self> {
        let decoder = ProbeLibavAdapter::new().map_err(|e| MediaCheckError::FFmpegInitError {
            message: e.to_string(),
        })?;
        Ok(Self::with_decoder(Arc::new(decoder), settings))
    }

    /// Wire an arbitrary decoder port
    pub fn with_decoder(decoder: Arc<dyn DecoderPort>, settings: &CheckSettings) -> Self {
        let pixel_formats = PixelFormatTable::with_overrides(settings.pixel_formats.clone());
        let inspector = MediaInspector::new(decoder)
            .with_hash_algorithm(settings.hash_algorithm)
            .with_sample_frames(settings.sample_frames)
            .with_pixel_formats(pixel_formats);
        let writer = ReportWriter::new(settings.output_format, settings.pretty);

        Self {
            check_interactor: Arc::new(CheckInteractor::new(inspector, writer)),
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn check_interactor(&self) -> Arc<CheckInteractor> {
        Arc::clone(&self.check_interactor)
    }
}
