// Stream selection: pick the tracks a request needs from the resolved set
//
// VideoWithAudio wants the best "mp4" video-only track (highest quality
// rank; ties broken by declared size) plus the provider-default audio
// track. AudioOnly wants just the audio track.

use super::errors::DownloadError;
use super::models::{StreamDescriptor, StreamKind};

/// Best video stream with the requested container extension
pub fn select_best_video<'a>(
    streams: &'a [StreamDescriptor],
    ext: &str,
) -> Result<&'a StreamDescriptor, DownloadError> {
    streams
        .iter()
        .filter(|s| s.kind == StreamKind::Video && s.ext == ext)
        .max_by(|a, b| {
            match a.quality_rank.cmp(&b.quality_rank) {
                std::cmp::Ordering::Equal => {
                    a.size_bytes.unwrap_or(0).cmp(&b.size_bytes.unwrap_or(0))
                }
                other => other,
            }
        })
        .ok_or_else(|| {
            DownloadError::Resolution(format!("no {} video stream available", ext))
        })
}

/// Default audio track: the highest-ranked audio-only stream
pub fn select_default_audio(
    streams: &[StreamDescriptor],
) -> Result<&StreamDescriptor, DownloadError> {
    streams
        .iter()
        .filter(|s| s.kind == StreamKind::Audio)
        .max_by_key(|s| s.quality_rank)
        .ok_or_else(|| DownloadError::Resolution("no audio stream available".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, ext: &str, rank: u32, size: u64) -> StreamDescriptor {
        StreamDescriptor {
            format_id: id.to_string(),
            kind: StreamKind::Video,
            ext: ext.to_string(),
            size_bytes: Some(size),
            quality_rank: rank,
            url: format!("https://cdn.example/{}", id),
        }
    }

    fn audio(id: &str, rank: u32) -> StreamDescriptor {
        StreamDescriptor {
            format_id: id.to_string(),
            kind: StreamKind::Audio,
            ext: "m4a".to_string(),
            size_bytes: Some(5_000_000),
            quality_rank: rank,
            url: format!("https://cdn.example/{}", id),
        }
    }

    #[test]
    fn picks_highest_resolution_mp4() {
        let streams = vec![
            video("137", "mp4", 1080, 50_000_000),
            video("136", "mp4", 720, 25_000_000),
            video("248", "webm", 2160, 90_000_000),
            audio("140", 128),
        ];

        let best = select_best_video(&streams, "mp4").unwrap();
        assert_eq!(best.format_id, "137");
    }

    #[test]
    fn size_breaks_rank_ties() {
        let streams = vec![
            video("a", "mp4", 1080, 40_000_000),
            video("b", "mp4", 1080, 60_000_000),
        ];

        assert_eq!(select_best_video(&streams, "mp4").unwrap().format_id, "b");
    }

    #[test]
    fn no_mp4_video_is_a_resolution_error() {
        let streams = vec![video("248", "webm", 1080, 1), audio("140", 128)];
        assert!(matches!(
            select_best_video(&streams, "mp4"),
            Err(DownloadError::Resolution(_))
        ));
    }

    #[test]
    fn default_audio_is_highest_ranked() {
        let streams = vec![audio("139", 48), audio("140", 128), audio("249", 50)];
        assert_eq!(select_default_audio(&streams).unwrap().format_id, "140");
    }

    #[test]
    fn missing_audio_is_a_resolution_error() {
        let streams = vec![video("137", "mp4", 1080, 1)];
        assert!(matches!(
            select_default_audio(&streams),
            Err(DownloadError::Resolution(_))
        ));
    }
}
