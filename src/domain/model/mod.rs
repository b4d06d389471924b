// Domain models - Core types and data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// A measured value, or the explicit statement that it could not be measured.
///
/// Serialized as the bare value, or `null` when unknown. An unknown value is
/// never coerced to zero or false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement<T> {
    Measured(T),
    Unknown,
}

impl<T> Measurement<T> {
    /// Borrow the measured value, if any
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Measurement::Measured(value) => Some(value),
            Measurement::Unknown => None,
        }
    }

    /// Whether a value was measured
    pub fn is_measured(&self) -> bool {
        matches!(self, Measurement::Measured(_))
    }

    /// Transform the measured value, keeping `Unknown` as is
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Measurement<U> {
        match self {
            Measurement::Measured(value) => Measurement::Measured(f(value)),
            Measurement::Unknown => Measurement::Unknown,
        }
    }
}

impl<T> Default for Measurement<T> {
    fn default() -> Self {
        Measurement::Unknown
    }
}

impl<T> From<Option<T>> for Measurement<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Measurement::Measured(value),
            None => Measurement::Unknown,
        }
    }
}

/// Digest algorithm used for the content identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Lowercase algorithm name as written in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Length of the hex digest in characters
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha512 => 128,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(DomainError::BadArgs(format!(
                "Invalid hash algorithm: {}. Valid algorithms: md5, sha1, sha256, sha512",
                other
            ))),
        }
    }
}

/// Stable content identifier of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIdentity {
    pub algorithm: HashAlgorithm,
    pub digest: String,
}

/// CFR/VFR classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameRateMode {
    #[serde(rename = "CFR")]
    Cfr,
    #[serde(rename = "VFR")]
    Vfr,
}

impl FrameRateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameRateMode::Cfr => "CFR",
            FrameRateMode::Vfr => "VFR",
        }
    }
}

impl fmt::Display for FrameRateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame size in pixels
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub x: Measurement<u32>,
    pub y: Measurement<u32>,
}

impl Resolution {
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            x: Measurement::Measured(x),
            y: Measurement::Measured(y),
        }
    }
}

/// Demuxer self-description as reported by the decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDescriptor {
    /// Short demuxer name, e.g. `mov,mp4,m4a,3gp,3g2,mj2`
    pub short_name: String,
    /// Human-readable demuxer name, e.g. `QuickTime / MOV`
    pub long_name: String,
}

impl ContainerDescriptor {
    pub fn new(short_name: impl Into<String>, long_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: long_name.into(),
        }
    }

    /// First token of the short name (`mov,mp4,...` yields `mov`)
    pub fn primary_name(&self) -> &str {
        self.short_name
            .split(',')
            .next()
            .map(str::trim)
            .unwrap_or_default()
    }
}

/// Video stream facts exposed by the decoder before any frame is decoded
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStreamDescriptor {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    /// Decoder-native pixel format name, when the codec parameters carry one
    pub pixel_format: Option<String>,
    /// Stream-declared duration in seconds; may be absent or unreliable
    pub declared_duration: Option<f64>,
}

/// Ordered presentation timestamps (seconds) collected by the frame sampler
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameTimingSample {
    timestamps: Vec<f64>,
}

impl FrameTimingSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sample from timestamps, rejecting decreasing sequences
    pub fn from_timestamps(timestamps: Vec<f64>) -> Result<Self, DomainError> {
        let mut sample = Self::new();
        for ts in timestamps {
            if !sample.push(ts) {
                return Err(DomainError::BadArgs(format!(
                    "Timestamp {} is out of order or not finite",
                    ts
                )));
            }
        }
        Ok(sample)
    }

    /// Append a timestamp. Returns false (and leaves the sample untouched)
    /// when the timestamp would break non-decreasing order.
    pub fn push(&mut self, ts: f64) -> bool {
        if !ts.is_finite() {
            return false;
        }
        if let Some(&last) = self.timestamps.last() {
            if ts < last {
                return false;
            }
        }
        self.timestamps.push(ts);
        true
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Successive inter-frame deltas
    pub fn deltas(&self) -> Vec<f64> {
        self.timestamps.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

/// Canonical record of measured technical facts for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaProfile {
    pub filename: String,
    pub file_id: FileIdentity,
    pub source: String,
    pub readable: bool,
    pub non_zero_bytes: bool,
    pub container_format: Measurement<String>,
    pub resolution: Resolution,
    pub frame_rate_fps: Measurement<f64>,
    pub frame_rate_mode: Measurement<FrameRateMode>,
    pub color_space: Measurement<String>,
    pub bit_depth: Measurement<u32>,
    pub duration_s: Measurement<f64>,
}

impl MediaProfile {
    /// Whether nothing about the picture could be measured
    pub fn is_unmeasurable(&self) -> bool {
        !self.readable
    }
}

#[cfg(test)]
mod tests;
