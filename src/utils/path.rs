//! Input path expansion

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions picked up when a directory is given as input
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "ts", "mxf", "avi", "webm"];

/// Whether a path carries one of [`VIDEO_EXTENSIONS`], ignoring case
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Expand command-line inputs into the list of files to check.
///
/// Directories are walked recursively and contribute their video files
/// sorted by path. Anything else is passed through unchanged, so a missing
/// file still reaches the pipeline and is reported there.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", input.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| has_video_extension(path))
            .collect();
        found.sort();

        debug!(dir = %input.display(), files = found.len(), "Expanded directory input");
        files.extend(found);
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension_match_ignores_case() {
        assert!(has_video_extension(Path::new("a/clip.MP4")));
        assert!(has_video_extension(Path::new("clip.webm")));
        assert!(!has_video_extension(Path::new("clip.mp3")));
        assert!(!has_video_extension(Path::new("README")));
    }

    #[test]
    fn test_directory_walk_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        for name in ["b.mov", "a.MKV", "notes.txt", "sub/c.ts"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = expand_inputs(&[dir.path().to_path_buf()]);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.MKV", "b.mov", "sub/c.ts"]);
    }

    #[test]
    fn test_plain_paths_pass_through() {
        let inputs = vec![PathBuf::from("missing.mp4"), PathBuf::from("other.bin")];
        assert_eq!(expand_inputs(&inputs), inputs);
    }
}
