//! Container identification from magic bytes

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes read from the start of the file
pub const SNIFF_LEN: usize = 4096;

const TS_PACKET_LEN: usize = 188;
const TS_SYNC_BYTE: u8 = 0x47;
const TS_SYNC_RUN: usize = 5;

/// Identify the container from the file header.
///
/// Returns `None` when the file cannot be read or no signature matches.
pub fn sniff_container(path: &Path) -> Option<&'static str> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)
        .and_then(|file| file.take(SNIFF_LEN as u64).read_to_end(&mut head))
        .ok()?;
    sniff_bytes(&head)
}

/// Identify the container from its first bytes
pub fn sniff_bytes(head: &[u8]) -> Option<&'static str> {
    if head.len() < 4 {
        return None;
    }

    let prefix = &head[..head.len().min(64)];
    if prefix.windows(4).any(|window| window == b"ftyp") {
        return Some("mp4/mov");
    }

    if head.starts_with(b"RIFF") && head.len() >= 12 {
        match &head[8..12] {
            b"AVI " => return Some("avi"),
            b"WAVE" => return Some("wav"),
            _ => {}
        }
    }

    if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("matroska/mkv/webm");
    }
    if head.starts_with(b"OggS") {
        return Some("ogg");
    }
    if looks_like_mpeg_ts(head) {
        return Some("mpeg-ts/ts");
    }

    None
}

/// A sync byte repeated at packet stride, starting anywhere in the first packet
fn looks_like_mpeg_ts(head: &[u8]) -> bool {
    if head.len() < TS_PACKET_LEN * TS_SYNC_RUN {
        return false;
    }
    (0..TS_PACKET_LEN).any(|offset| {
        (0..TS_SYNC_RUN).all(|i| {
            head.get(offset + TS_PACKET_LEN * i)
                .map_or(false, |&byte| byte == TS_SYNC_BYTE)
        })
    })
}
