//! Stream catalog building: filtering and ranking of format candidates

use crate::core::stream::{FormatCandidate, RankedCandidate};
use crate::error::TubeError;
use crate::platform::cipher::decode_alternate;
use crate::utils::mime::is_mp4_compatible;
use tracing::{debug, info};

/// Default ceiling for stream height in pixels
pub const DEFAULT_MAX_HEIGHT: u32 = 1700;

/// Build the ranked fallback list of playable streams.
///
/// MP4-compatible candidates are scanned once in provider order. Every
/// candidate that beats the running maximum while staying below `max_height`
/// becomes the new best and is recorded, so the result holds the successive
/// record highs, best first. Withheld URLs are recovered through
/// [`decode_alternate`]; a failed decode aborts the build.
pub fn build_catalog(
    formats: &[FormatCandidate],
    max_height: u32,
) -> Result<Vec<RankedCandidate>, TubeError> {
    let (best, mut found) = formats
        .iter()
        .filter(|fmt| is_mp4_compatible(&fmt.mime_type))
        .try_fold((0u32, Vec::new()), |(best, mut found), fmt| {
            if !(best < fmt.height && fmt.height < max_height) {
                return Ok::<_, TubeError>((best, found));
            }

            let url = match fmt.direct_url() {
                Some(url) => url.to_string(),
                None => {
                    info!("Possibly protected video. Using alternate stream extraction method.");
                    decode_alternate(&fmt.raw)?
                }
            };

            if !url.is_empty() {
                found.push(RankedCandidate::new(fmt.height, url));
            }
            Ok((fmt.height, found))
        })?;

    found.sort_by(|a, b| b.height.cmp(&a.height));
    debug!(
        "Catalog holds {} candidate(s), best height {} px",
        found.len(),
        best
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn candidate(value: Value) -> FormatCandidate {
        FormatCandidate::from_record(&value).unwrap()
    }

    fn mp4(height: u32) -> FormatCandidate {
        candidate(json!({
            "height": height,
            "mimeType": "video/mp4; codecs=\"avc1.4d401e\"",
            "url": format!("https://x.test/{}", height)
        }))
    }

    fn heights(catalog: &[RankedCandidate]) -> Vec<u32> {
        catalog.iter().map(|c| c.height).collect()
    }

    #[test]
    fn test_ceiling_excludes_higher_formats() {
        let formats = vec![mp4(360), mp4(720), mp4(1080), mp4(2160)];
        let catalog = build_catalog(&formats, DEFAULT_MAX_HEIGHT).unwrap();
        assert_eq!(catalog[0], RankedCandidate::new(1080, "https://x.test/1080"));
        assert_eq!(heights(&catalog), vec![1080, 720, 360]);
        assert!(catalog.iter().all(|c| c.height != 2160));
    }

    #[test]
    fn test_only_record_highs_are_collected() {
        let formats = vec![mp4(720), mp4(360), mp4(1080), mp4(480)];
        let catalog = build_catalog(&formats, DEFAULT_MAX_HEIGHT).unwrap();
        assert_eq!(heights(&catalog), vec![1080, 720]);
    }

    #[test]
    fn test_ceiling_is_exclusive() {
        let formats = vec![mp4(720), mp4(1080)];
        let catalog = build_catalog(&formats, 1080).unwrap();
        assert_eq!(heights(&catalog), vec![720]);
    }

    #[test]
    fn test_non_mp4_formats_are_skipped() {
        let formats = vec![
            mp4(360),
            candidate(json!({
                "height": 1080,
                "mimeType": "video/webm; codecs=\"vp9\"",
                "url": "https://x.test/webm"
            })),
        ];
        let catalog = build_catalog(&formats, DEFAULT_MAX_HEIGHT).unwrap();
        assert_eq!(heights(&catalog), vec![360]);
    }

    #[test]
    fn test_audio_formats_never_qualify() {
        let formats = vec![candidate(json!({
            "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"",
            "url": "https://x.test/audio"
        }))];
        assert!(build_catalog(&formats, DEFAULT_MAX_HEIGHT).unwrap().is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_catalog() {
        assert!(build_catalog(&[], DEFAULT_MAX_HEIGHT).unwrap().is_empty());
    }

    #[test]
    fn test_withheld_url_is_decoded() {
        let formats = vec![
            mp4(360),
            candidate(json!({
                "height": 720,
                "mimeType": "video/mp4",
                "signatureCipher": "s=abc&url=https%3A%2F%2Fx.test%2Fciphered"
            })),
        ];
        let catalog = build_catalog(&formats, DEFAULT_MAX_HEIGHT).unwrap();
        assert_eq!(catalog[0], RankedCandidate::new(720, "https://x.test/ciphered"));
        assert_eq!(catalog[1], RankedCandidate::new(360, "https://x.test/360"));
    }

    #[test]
    fn test_undecodable_format_aborts_build() {
        let formats = vec![candidate(json!({"height": 720, "mimeType": "video/mp4"}))];
        assert!(matches!(
            build_catalog(&formats, DEFAULT_MAX_HEIGHT),
            Err(TubeError::DecodeFailed(_))
        ));
    }

    #[test]
    fn test_undecodable_format_above_ceiling_is_ignored() {
        let formats = vec![
            mp4(480),
            candidate(json!({"height": 2160, "mimeType": "video/mp4"})),
        ];
        let catalog = build_catalog(&formats, DEFAULT_MAX_HEIGHT).unwrap();
        assert_eq!(heights(&catalog), vec![480]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let formats = vec![mp4(360), mp4(720), mp4(1080)];
        assert_eq!(
            build_catalog(&formats, DEFAULT_MAX_HEIGHT).unwrap(),
            build_catalog(&formats, DEFAULT_MAX_HEIGHT).unwrap()
        );
    }
}
