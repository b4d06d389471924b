//! Pixel format normalization
//!
//! Maps decoder-native pixel format names (FFmpeg naming) to a semantic
//! color space family and per-channel bit depth. Unknown names degrade the
//! profile instead of failing it: the raw name becomes the color space and
//! the bit depth falls back to [`DEFAULT_BIT_DEPTH`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Bit depth reported for pixel formats nothing more is known about
pub const DEFAULT_BIT_DEPTH: u32 = 8;

/// Color space family and bits per channel for one pixel format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelFormatInfo {
    pub color_space: String,
    pub bit_depth: u32,
}

impl PixelFormatInfo {
    fn new(color_space: &str, bit_depth: u32) -> Self {
        Self {
            color_space: color_space.to_string(),
            bit_depth,
        }
    }
}

const YUV: &str = "YUV";
const RGB: &str = "RGB";
const GRAY: &str = "GRAY";

static BUILTIN_TABLE: Lazy<HashMap<&'static str, PixelFormatInfo>> = Lazy::new(|| {
    let entries: &[(&str, &str, u32)] = &[
        // 8-bit planar and semi-planar YUV
        ("yuv410p", YUV, 8),
        ("yuv411p", YUV, 8),
        ("yuv420p", YUV, 8),
        ("yuvj420p", YUV, 8),
        ("yuv422p", YUV, 8),
        ("yuvj422p", YUV, 8),
        ("yuv440p", YUV, 8),
        ("yuvj440p", YUV, 8),
        ("yuv444p", YUV, 8),
        ("yuvj444p", YUV, 8),
        ("yuva420p", YUV, 8),
        ("yuva422p", YUV, 8),
        ("yuva444p", YUV, 8),
        ("nv12", YUV, 8),
        ("nv21", YUV, 8),
        ("nv16", YUV, 8),
        ("nv24", YUV, 8),
        ("uyvy422", YUV, 8),
        ("yuyv422", YUV, 8),
        ("yvyu422", YUV, 8),
        // High bit depth YUV
        ("yuv420p9le", YUV, 9),
        ("yuv420p10le", YUV, 10),
        ("yuv420p10be", YUV, 10),
        ("yuv422p10le", YUV, 10),
        ("yuv422p10be", YUV, 10),
        ("yuv444p10le", YUV, 10),
        ("yuv444p10be", YUV, 10),
        ("yuva420p10le", YUV, 10),
        ("yuva422p10le", YUV, 10),
        ("yuva444p10le", YUV, 10),
        ("p010le", YUV, 10),
        ("p010be", YUV, 10),
        ("p210le", YUV, 10),
        ("nv20le", YUV, 10),
        ("nv20be", YUV, 10),
        ("y210le", YUV, 10),
        ("yuv420p12le", YUV, 12),
        ("yuv420p12be", YUV, 12),
        ("yuv422p12le", YUV, 12),
        ("yuv422p12be", YUV, 12),
        ("yuv444p12le", YUV, 12),
        ("yuv444p12be", YUV, 12),
        ("p012le", YUV, 12),
        ("yuv420p14le", YUV, 14),
        ("yuv444p14le", YUV, 14),
        ("yuv420p16le", YUV, 16),
        ("yuv420p16be", YUV, 16),
        ("yuv422p16le", YUV, 16),
        ("yuv444p16le", YUV, 16),
        ("p016le", YUV, 16),
        ("p016be", YUV, 16),
        // Packed and planar RGB
        ("rgb24", RGB, 8),
        ("bgr24", RGB, 8),
        ("rgba", RGB, 8),
        ("bgra", RGB, 8),
        ("argb", RGB, 8),
        ("abgr", RGB, 8),
        ("rgb0", RGB, 8),
        ("bgr0", RGB, 8),
        ("0rgb", RGB, 8),
        ("0bgr", RGB, 8),
        ("gbrp", RGB, 8),
        ("gbrap", RGB, 8),
        ("pal8", RGB, 8),
        ("gbrp10le", RGB, 10),
        ("gbrp10be", RGB, 10),
        ("gbrap10le", RGB, 10),
        ("x2rgb10le", RGB, 10),
        ("gbrp12le", RGB, 12),
        ("gbrp12be", RGB, 12),
        ("gbrap12le", RGB, 12),
        ("gbrp16le", RGB, 16),
        ("gbrap16le", RGB, 16),
        ("rgb48le", RGB, 16),
        ("rgb48be", RGB, 16),
        ("bgr48le", RGB, 16),
        ("rgba64le", RGB, 16),
        ("rgba64be", RGB, 16),
        ("bgra64le", RGB, 16),
        // Grayscale
        ("gray", GRAY, 8),
        ("ya8", GRAY, 8),
        ("gray10le", GRAY, 10),
        ("gray12le", GRAY, 12),
        ("gray16le", GRAY, 16),
        ("gray16be", GRAY, 16),
        ("ya16le", GRAY, 16),
    ];

    entries
        .iter()
        .map(|(name, family, bits)| (*name, PixelFormatInfo::new(family, *bits)))
        .collect()
});

/// Family prefixes for names missing from the table
const FAMILY_PREFIXES: &[(&str, &str)] = &[
    ("rgb", RGB),
    ("bgr", RGB),
    ("gbr", RGB),
    ("gray", GRAY),
    ("ya", GRAY),
    ("yuv", YUV),
    ("nv", YUV),
    ("uyvy", YUV),
    ("yuyv", YUV),
    ("p0", YUV),
    ("p1", YUV),
    ("p2", YUV),
];

/// Pixel format lookup: built-in table plus optional user-supplied entries.
///
/// The built-in table is process-wide and read-only once initialized.
#[derive(Debug, Clone, Default)]
pub struct PixelFormatTable {
    overrides: HashMap<String, PixelFormatInfo>,
}

impl PixelFormatTable {
    /// Table with only the built-in entries
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Table whose entries take precedence over the built-in ones
    pub fn with_overrides(overrides: HashMap<String, PixelFormatInfo>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(name, info)| (name.trim().to_lowercase(), info))
            .collect();
        Self { overrides }
    }

    /// Exact table lookup, without any fallback
    pub fn lookup(&self, pix_fmt: &str) -> Option<PixelFormatInfo> {
        let key = pix_fmt.trim().to_lowercase();
        self.overrides
            .get(&key)
            .or_else(|| BUILTIN_TABLE.get(key.as_str()))
            .cloned()
    }

    /// Normalize a pixel format name. Never fails.
    pub fn normalize(&self, pix_fmt: &str) -> PixelFormatInfo {
        if let Some(info) = self.lookup(pix_fmt) {
            return info;
        }

        let key = pix_fmt.trim().to_lowercase();
        match family_from_prefix(&key) {
            Some(family) => PixelFormatInfo::new(
                family,
                bit_depth_from_name(&key).unwrap_or(DEFAULT_BIT_DEPTH),
            ),
            None => PixelFormatInfo {
                color_space: pix_fmt.to_string(),
                bit_depth: DEFAULT_BIT_DEPTH,
            },
        }
    }

    /// Number of built-in entries
    pub fn builtin_len() -> usize {
        BUILTIN_TABLE.len()
    }
}

fn family_from_prefix(name: &str) -> Option<&'static str> {
    FAMILY_PREFIXES
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix))
        .map(|(_, family)| *family)
}

/// Per-channel depth from the trailing number of a name such as
/// `yuv422p14le` or `gbrp9`. Endianness suffixes are ignored; numbers
/// outside 1..=16 are packed layouts, not per-channel depths.
fn bit_depth_from_name(name: &str) -> Option<u32> {
    let stem = name
        .strip_suffix("le")
        .or_else(|| name.strip_suffix("be"))
        .unwrap_or(name);
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let bits: u32 = digits.parse().ok()?;
    (1..=16).contains(&bits).then_some(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_formats() {
        let table = PixelFormatTable::builtin();
        assert_eq!(table.normalize("yuv420p"), PixelFormatInfo::new("YUV", 8));
        assert_eq!(table.normalize("yuv422p10le"), PixelFormatInfo::new("YUV", 10));
        assert_eq!(table.normalize("p010le"), PixelFormatInfo::new("YUV", 10));
        assert_eq!(table.normalize("nv20le"), PixelFormatInfo::new("YUV", 10));
        assert_eq!(table.normalize("nv20be"), PixelFormatInfo::new("YUV", 10));
        assert_eq!(table.normalize("rgb48le"), PixelFormatInfo::new("RGB", 16));
        assert_eq!(table.normalize("gbrp"), PixelFormatInfo::new("RGB", 8));
        assert_eq!(table.normalize("gray"), PixelFormatInfo::new("GRAY", 8));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = PixelFormatTable::builtin();
        assert_eq!(table.normalize("YUV420P"), PixelFormatInfo::new("YUV", 8));
    }

    #[test]
    fn test_unlisted_format_uses_family_prefix() {
        let table = PixelFormatTable::builtin();
        assert!(table.lookup("yuv422p14le").is_none());
        assert_eq!(table.normalize("yuv422p14le"), PixelFormatInfo::new("YUV", 14));
        assert_eq!(table.normalize("gbrp9le"), PixelFormatInfo::new("RGB", 9));
        assert_eq!(table.normalize("rgb565le"), PixelFormatInfo::new("RGB", 8));
    }

    #[test]
    fn test_unknown_format_falls_back_to_raw_name() {
        let table = PixelFormatTable::builtin();
        let info = table.normalize("xyz12");
        assert_eq!(info.color_space, "xyz12");
        assert_eq!(info.bit_depth, DEFAULT_BIT_DEPTH);

        let info = table.normalize("cuda");
        assert_eq!(info.color_space, "cuda");
        assert_eq!(info.bit_depth, DEFAULT_BIT_DEPTH);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut overrides = HashMap::new();
        overrides.insert("XYZ12LE".to_string(), PixelFormatInfo::new("XYZ", 12));
        overrides.insert("yuv420p".to_string(), PixelFormatInfo::new("YCbCr", 8));
        let table = PixelFormatTable::with_overrides(overrides);

        assert_eq!(table.normalize("xyz12le"), PixelFormatInfo::new("XYZ", 12));
        assert_eq!(table.normalize("yuv420p"), PixelFormatInfo::new("YCbCr", 8));
        assert_eq!(table.normalize("rgb24"), PixelFormatInfo::new("RGB", 8));
    }

    #[test]
    fn test_bit_depth_from_name() {
        assert_eq!(bit_depth_from_name("yuv420p10le"), Some(10));
        assert_eq!(bit_depth_from_name("gbrp12"), Some(12));
        assert_eq!(bit_depth_from_name("yuv420p"), None);
        assert_eq!(bit_depth_from_name("rgb565be"), None);
    }
}
