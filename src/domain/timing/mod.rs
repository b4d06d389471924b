// Timing classifier - Frame rate estimate and CFR/VFR verdict from real timestamps

use serde::{Deserialize, Serialize};

use crate::domain::model::{FrameRateMode, FrameTimingSample, Measurement};

/// Maximum deviation of any inter-frame delta from the mean delta, relative
/// to the mean, for a stream to count as constant frame rate. Inclusive: a
/// delta exactly 2% away from the mean is still CFR.
pub const CFR_TOLERANCE: f64 = 0.02;

/// Minimum number of inter-frame deltas needed for a verdict
pub const MIN_DELTAS: usize = 2;

/// Frame rate facts derived from a timing sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingVerdict {
    pub fps: Measurement<f64>,
    pub mode: Measurement<FrameRateMode>,
    /// Largest relative deviation observed, for diagnostics
    pub max_relative_deviation: Option<f64>,
}

impl TimingVerdict {
    pub fn unknown() -> Self {
        Self {
            fps: Measurement::Unknown,
            mode: Measurement::Unknown,
            max_relative_deviation: None,
        }
    }
}

/// Turns presentation timestamps into a frame rate and CFR/VFR verdict.
///
/// No smoothing or outlier rejection is applied: a single duplicated or
/// dropped frame flips the verdict to VFR.
pub struct TimingClassifier;

impl TimingClassifier {
    pub fn classify(sample: &FrameTimingSample) -> TimingVerdict {
        let deltas = sample.deltas();
        if deltas.len() < MIN_DELTAS {
            return TimingVerdict::unknown();
        }

        let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;
        if !(mean > 0.0) || !mean.is_finite() {
            // All timestamps identical: there is no rate to speak of.
            return TimingVerdict::unknown();
        }

        let max_relative_deviation = deltas
            .iter()
            .map(|delta| (delta - mean).abs() / mean)
            .fold(0.0_f64, f64::max);

        let mode = if max_relative_deviation <= CFR_TOLERANCE {
            FrameRateMode::Cfr
        } else {
            FrameRateMode::Vfr
        };

        TimingVerdict {
            fps: Measurement::Measured(1.0 / mean),
            mode: Measurement::Measured(mode),
            max_relative_deviation: Some(max_relative_deviation),
        }
    }
}

#[cfg(test)]
mod tests;
