//! Console summaries

use std::fmt::Write;

use crate::domain::model::MediaProfile;
use crate::domain::rules::ValidationReport;

/// Width of the rule key column
const KEY_WIDTH: usize = 16;

/// Summary of a validation report, one line per evaluated rule
pub fn render_report_summary(report: &ValidationReport) -> String {
    let mut out = String::new();
    let details = &report.validation.details;

    let _ = writeln!(out, "File: {}", report.filename);
    let _ = writeln!(
        out,
        "Hash ({}): {}",
        report.file_id.algorithm, report.file_id.digest
    );
    if !report.media_profile.readable {
        let _ = writeln!(out, "Media could not be decoded");
    }
    let _ = writeln!(out);

    let verdict = if report.status().is_pass() {
        "PASSED"
    } else {
        "FAILED"
    };
    let _ = writeln!(
        out,
        "{} ({}/{} failed)",
        verdict,
        details.failed_count(),
        details.len()
    );

    for (key, outcome) in details.iter() {
        let mark = if outcome.ok { "✓" } else { "✗" };
        let _ = writeln!(
            out,
            "  {:<width$} {} {}",
            key.as_str(),
            mark,
            outcome.info,
            width = KEY_WIDTH
        );
    }

    out
}

/// Summary of a profile when no constraints were given
pub fn render_profile_summary(profile: &MediaProfile) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "File: {}", profile.filename);
    let _ = writeln!(
        out,
        "Hash ({}): {}",
        profile.file_id.algorithm, profile.file_id.digest
    );

    if !profile.readable {
        let _ = writeln!(out, "Media could not be decoded");
        return out;
    }

    let show = |value: Option<String>| value.unwrap_or_else(|| "unknown".to_string());
    let rows = [
        ("container_format", show(profile.container_format.as_option().cloned())),
        (
            "resolution",
            match (profile.resolution.x.as_option(), profile.resolution.y.as_option()) {
                (Some(x), Some(y)) => format!("{}x{}", x, y),
                _ => "unknown".to_string(),
            },
        ),
        (
            "frame_rate_fps",
            show(profile.frame_rate_fps.as_option().map(|fps| fps.to_string())),
        ),
        (
            "frame_rate_mode",
            show(profile.frame_rate_mode.as_option().map(|mode| mode.to_string())),
        ),
        ("color_space", show(profile.color_space.as_option().cloned())),
        (
            "bit_depth",
            show(profile.bit_depth.as_option().map(|bits| bits.to_string())),
        ),
        (
            "duration_s",
            show(profile.duration_s.as_option().map(|d| d.to_string())),
        ),
    ];
    for (key, value) in rows {
        let _ = writeln!(out, "  {:<width$} {}", key, value, width = KEY_WIDTH);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::*;
    use crate::domain::rules::{TargetConstraints, ValidationEngine};

    fn profile(fps: f64) -> MediaProfile {
        MediaProfile {
            filename: "clip.mp4".to_string(),
            file_id: FileIdentity {
                algorithm: HashAlgorithm::Sha1,
                digest: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string(),
            },
            source: "clip.mp4".to_string(),
            readable: true,
            non_zero_bytes: true,
            container_format: Measurement::Measured("mp4/mov".to_string()),
            resolution: Resolution::new(1280, 720),
            frame_rate_fps: Measurement::Measured(fps),
            frame_rate_mode: Measurement::Measured(FrameRateMode::Cfr),
            color_space: Measurement::Measured("YUV".to_string()),
            bit_depth: Measurement::Measured(8),
            duration_s: Measurement::Unknown,
        }
    }

    fn report(fps: f64) -> ValidationReport {
        let constraints: TargetConstraints = serde_json::from_str(
            r#"{"frame_rate_fps": {"min": 25, "max": 25}, "color_space": "YUV"}"#,
        )
        .unwrap();
        let profile = profile(fps);
        let section = ValidationEngine::validate(&profile, &constraints);
        ValidationReport::new(profile, section)
    }

    #[test]
    fn test_passing_summary() {
        let text = render_report_summary(&report(25.0));
        assert!(text.contains("Hash (sha1): da39a3ee"));
        assert!(text.contains("PASSED (0/2 failed)"));
        assert!(text.contains("✓ 'YUV' allowed"));
    }

    #[test]
    fn test_failing_summary_lists_rules_in_order() {
        let text = render_report_summary(&report(24.0));
        assert!(text.contains("FAILED (1/2 failed)"));
        let color_at = text.find("color_space").unwrap();
        let fps_at = text.find("frame_rate_fps").unwrap();
        assert!(color_at < fps_at);
        assert!(text.contains("✗ min=25, max=25, value=24"));
    }

    #[test]
    fn test_profile_summary_shows_unknowns() {
        let text = render_profile_summary(&profile(25.0));
        assert!(text.contains("1280x720"));
        assert!(text.lines().any(|line| line.contains("duration_s") && line.ends_with("unknown")));
    }
}
