// Domain use cases - Media profile assembly

use crate::domain::model::*;
use crate::domain::pixel_format::PixelFormatInfo;
use crate::domain::timing::TimingVerdict;

/// Decimal places kept for frame rate and duration
const MEASUREMENT_DECIMALS: i32 = 6;

fn round_measurement(value: f64) -> f64 {
    let scale = 10f64.powi(MEASUREMENT_DECIMALS);
    (value * scale).round() / scale
}

/// Assembles measured facts into one [`MediaProfile`].
///
/// Pure: no I/O. Anything not handed to the builder stays `Unknown`, and a
/// profile built for an unreadable file carries no measurements at all, even
/// if some were collected before decoding failed.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    filename: String,
    source: String,
    file_id: FileIdentity,
    readable: bool,
    non_zero_bytes: bool,
    container_format: Option<String>,
    dimensions: Option<(u32, u32)>,
    timing: TimingVerdict,
    color: Option<PixelFormatInfo>,
    duration_s: Option<f64>,
}

impl ProfileBuilder {
    pub fn new(
        filename: impl Into<String>,
        source: impl Into<String>,
        file_id: FileIdentity,
    ) -> Self {
        Self {
            filename: filename.into(),
            source: source.into(),
            file_id,
            readable: false,
            non_zero_bytes: false,
            container_format: None,
            dimensions: None,
            timing: TimingVerdict::unknown(),
            color: None,
            duration_s: None,
        }
    }

    pub fn with_liveness(mut self, readable: bool, non_zero_bytes: bool) -> Self {
        self.readable = readable;
        self.non_zero_bytes = non_zero_bytes;
        self
    }

    pub fn with_container_format(mut self, label: Option<String>) -> Self {
        self.container_format = label.filter(|label| !label.is_empty());
        self
    }

    /// Zero-sized dimensions count as not measured
    pub fn with_dimensions(mut self, dimensions: Option<(u32, u32)>) -> Self {
        self.dimensions = dimensions.filter(|&(x, y)| x > 0 && y > 0);
        self
    }

    pub fn with_timing(mut self, timing: TimingVerdict) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_color(mut self, color: Option<PixelFormatInfo>) -> Self {
        self.color = color;
        self
    }

    pub fn with_duration(mut self, duration_s: Option<f64>) -> Self {
        self.duration_s = duration_s.filter(|d| d.is_finite() && *d >= 0.0);
        self
    }

    pub fn build(self) -> MediaProfile {
        let mut profile = MediaProfile {
            filename: self.filename,
            file_id: self.file_id,
            source: self.source,
            readable: self.readable,
            non_zero_bytes: self.non_zero_bytes,
            container_format: Measurement::Unknown,
            resolution: Resolution::default(),
            frame_rate_fps: Measurement::Unknown,
            frame_rate_mode: Measurement::Unknown,
            color_space: Measurement::Unknown,
            bit_depth: Measurement::Unknown,
            duration_s: Measurement::Unknown,
        };

        if !self.readable {
            return profile;
        }

        profile.container_format = self.container_format.into();
        if let Some((x, y)) = self.dimensions {
            profile.resolution = Resolution::new(x, y);
        }
        profile.frame_rate_fps = self.timing.fps.map(round_measurement);
        profile.frame_rate_mode = self.timing.mode;
        if let Some(color) = self.color {
            profile.color_space = Measurement::Measured(color.color_space);
            profile.bit_depth = Measurement::Measured(color.bit_depth);
        }
        profile.duration_s = Measurement::from(self.duration_s.map(round_measurement));

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pixel_format::PixelFormatTable;

    fn identity() -> FileIdentity {
        FileIdentity {
            algorithm: HashAlgorithm::Md5,
            digest: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
        }
    }

    fn cfr_verdict(fps: f64) -> TimingVerdict {
        TimingVerdict {
            fps: Measurement::Measured(fps),
            mode: Measurement::Measured(FrameRateMode::Cfr),
            max_relative_deviation: Some(0.0),
        }
    }

    #[test]
    fn test_build_readable_profile() {
        let profile = ProfileBuilder::new("a.mp4", "/tmp/a.mp4", identity())
            .with_liveness(true, true)
            .with_container_format(Some("mp4/mov".to_string()))
            .with_dimensions(Some((1920, 1080)))
            .with_timing(cfr_verdict(30000.0 / 1001.0))
            .with_color(Some(PixelFormatTable::builtin().normalize("yuv420p")))
            .with_duration(Some(10.0100001))
            .build();

        assert_eq!(profile.container_format, Measurement::Measured("mp4/mov".to_string()));
        assert_eq!(profile.resolution, Resolution::new(1920, 1080));
        assert_eq!(profile.frame_rate_fps, Measurement::Measured(29.97003));
        assert_eq!(profile.color_space, Measurement::Measured("YUV".to_string()));
        assert_eq!(profile.bit_depth, Measurement::Measured(8));
        assert_eq!(profile.duration_s, Measurement::Measured(10.01));
    }

    #[test]
    fn test_unset_fields_stay_unknown() {
        let profile = ProfileBuilder::new("a.mp4", "/tmp/a.mp4", identity())
            .with_liveness(true, true)
            .with_dimensions(Some((0, 1080)))
            .build();

        assert!(profile.readable);
        assert_eq!(profile.resolution, Resolution::default());
        assert_eq!(profile.frame_rate_fps, Measurement::Unknown);
        assert_eq!(profile.bit_depth, Measurement::Unknown);
        assert_eq!(profile.container_format, Measurement::Unknown);
    }

    #[test]
    fn test_unreadable_profile_drops_partial_measurements() {
        let profile = ProfileBuilder::new("broken.mp4", "/tmp/broken.mp4", identity())
            .with_liveness(false, true)
            .with_container_format(Some("mp4/mov".to_string()))
            .with_dimensions(Some((640, 480)))
            .build();

        assert!(profile.is_unmeasurable());
        assert!(profile.non_zero_bytes);
        assert_eq!(profile.container_format, Measurement::Unknown);
        assert_eq!(profile.resolution.x, Measurement::Unknown);
        assert_eq!(profile.file_id, identity());
    }
}
