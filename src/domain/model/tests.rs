// Unit tests for domain models

use super::*;

fn sample_profile() -> MediaProfile {
    MediaProfile {
        filename: "clip.mp4".to_string(),
        file_id: FileIdentity {
            algorithm: HashAlgorithm::Sha256,
            digest: "ab".repeat(32),
        },
        source: "/media/clip.mp4".to_string(),
        readable: true,
        non_zero_bytes: true,
        container_format: Measurement::Measured("mp4/mov".to_string()),
        resolution: Resolution::new(1920, 1080),
        frame_rate_fps: Measurement::Measured(29.97003),
        frame_rate_mode: Measurement::Measured(FrameRateMode::Cfr),
        color_space: Measurement::Measured("YUV".to_string()),
        bit_depth: Measurement::Measured(8),
        duration_s: Measurement::Unknown,
    }
}

#[test]
fn test_measurement_serializes_unknown_as_null() {
    let unknown: Measurement<f64> = Measurement::Unknown;
    assert_eq!(serde_json::to_string(&unknown).unwrap(), "null");

    let measured = Measurement::Measured(25.0);
    assert_eq!(serde_json::to_string(&measured).unwrap(), "25.0");
}

#[test]
fn test_measurement_deserializes_null_as_unknown() {
    let value: Measurement<u32> = serde_json::from_str("null").unwrap();
    assert_eq!(value, Measurement::Unknown);

    let value: Measurement<u32> = serde_json::from_str("10").unwrap();
    assert_eq!(value, Measurement::Measured(10));
}

#[test]
fn test_measurement_from_option() {
    assert_eq!(Measurement::from(Some(3)), Measurement::Measured(3));
    assert_eq!(Measurement::<i32>::from(None), Measurement::Unknown);
    assert!(!Measurement::<i32>::default().is_measured());
}

#[test]
fn test_hash_algorithm_parse() {
    assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
    assert_eq!("MD5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
    assert_eq!(" sha1 ".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha1);
    assert!("crc32".parse::<HashAlgorithm>().is_err());
    assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha256);
}

#[test]
fn test_frame_rate_mode_serialization() {
    assert_eq!(serde_json::to_string(&FrameRateMode::Cfr).unwrap(), "\"CFR\"");
    assert_eq!(serde_json::to_string(&FrameRateMode::Vfr).unwrap(), "\"VFR\"");
    assert_eq!(FrameRateMode::Vfr.to_string(), "VFR");
}

#[test]
fn test_container_descriptor_primary_name() {
    let descriptor = ContainerDescriptor::new("mov,mp4,m4a,3gp,3g2,mj2", "QuickTime / MOV");
    assert_eq!(descriptor.primary_name(), "mov");

    let descriptor = ContainerDescriptor::new("matroska,webm", "Matroska / WebM");
    assert_eq!(descriptor.primary_name(), "matroska");
}

#[test]
fn test_timing_sample_rejects_decreasing_timestamps() {
    let mut sample = FrameTimingSample::new();
    assert!(sample.push(0.0));
    assert!(sample.push(0.04));
    assert!(sample.push(0.04));
    assert!(!sample.push(0.02));
    assert!(!sample.push(f64::NAN));
    assert_eq!(sample.len(), 3);

    assert!(FrameTimingSample::from_timestamps(vec![1.0, 0.5]).is_err());
}

#[test]
fn test_timing_sample_deltas() {
    let sample = FrameTimingSample::from_timestamps(vec![0.0, 0.5, 1.5]).unwrap();
    assert_eq!(sample.deltas(), vec![0.5, 1.0]);
    assert!(FrameTimingSample::new().deltas().is_empty());
}

#[test]
fn test_media_profile_field_names() {
    let json = serde_json::to_value(sample_profile()).unwrap();
    let object = json.as_object().unwrap();

    assert_eq!(object["filename"], "clip.mp4");
    assert_eq!(object["file_id"]["algorithm"], "sha256");
    assert_eq!(object["container_format"], "mp4/mov");
    assert_eq!(object["resolution"]["x"], 1920);
    assert_eq!(object["resolution"]["y"], 1080);
    assert_eq!(object["frame_rate_mode"], "CFR");
    assert_eq!(object["bit_depth"], 8);
    assert!(object["duration_s"].is_null());
}

#[test]
fn test_media_profile_field_order_is_stable() {
    let text = serde_json::to_string(&sample_profile()).unwrap();
    let filename_at = text.find("\"filename\"").unwrap();
    let file_id_at = text.find("\"file_id\"").unwrap();
    let resolution_at = text.find("\"resolution\"").unwrap();
    let bit_depth_at = text.find("\"bit_depth\"").unwrap();
    assert!(filename_at < file_id_at);
    assert!(file_id_at < resolution_at);
    assert!(resolution_at < bit_depth_at);
}
