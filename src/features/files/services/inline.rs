use base64::prelude::*;

/// Payloads at or above this size are never inlined
pub const MAX_INLINE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Inline representation decided for an uploaded payload
///
/// `Opaque` covers everything that stays behind a placeholder reference:
/// non-text/non-image media types and text payloads that fail UTF-8
/// decoding (a failed decode is not an upload error, the record simply
/// carries no preview).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineBody {
    Text { data_url: String, text: String },
    Image { data_url: String },
    Opaque,
}

/// Classify a payload by declared media type and build its self-contained
/// inline representation
pub fn encode_inline(media_type: &str, payload: &[u8]) -> InlineBody {
    if media_type.starts_with("text/") {
        match std::str::from_utf8(payload) {
            Ok(text) => InlineBody::Text {
                data_url: format!(
                    "data:{};charset=utf-8,{}",
                    media_type,
                    urlencoding::encode(text)
                ),
                text: text.to_string(),
            },
            Err(e) => {
                tracing::debug!("Could not decode text payload for preview: {}", e);
                InlineBody::Opaque
            }
        }
    } else if media_type.starts_with("image/") {
        InlineBody::Image {
            data_url: format!("data:{};base64,{}", media_type, BASE64_STANDARD.encode(payload)),
        }
    } else {
        InlineBody::Opaque
    }
}

/// Recover the raw bytes embedded in an inline `data:` URL
///
/// Returns `None` for placeholder references and anything else that is
/// not a well-formed data URL.
pub fn decode_inline(url: &str) -> Option<Vec<u8>> {
    let rest = url.strip_prefix("data:")?;
    let (params, body) = rest.split_once(',')?;
    if params.ends_with(";base64") {
        BASE64_STANDARD.decode(body).ok()
    } else {
        urlencoding::decode(body)
            .ok()
            .map(|text| text.into_owned().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_text_builds_escaped_data_url() {
        let body = encode_inline("text/plain", b"hello world");
        match body {
            InlineBody::Text { data_url, text } => {
                assert_eq!(text, "hello world");
                assert_eq!(data_url, "data:text/plain;charset=utf-8,hello%20world");
            }
            other => panic!("expected text body, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_text_invalid_utf8_is_opaque() {
        assert_eq!(encode_inline("text/plain", &[0xff, 0xfe, 0x00]), InlineBody::Opaque);
    }

    #[test]
    fn test_encode_image_builds_base64_data_url() {
        let payload = [0x89u8, 0x50, 0x4e, 0x47];
        match encode_inline("image/png", &payload) {
            InlineBody::Image { data_url } => {
                assert!(data_url.starts_with("data:image/png;base64,"));
                assert_eq!(decode_inline(&data_url).unwrap(), payload);
            }
            other => panic!("expected image body, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_other_media_types_are_opaque() {
        assert_eq!(encode_inline("application/pdf", b"%PDF-1.4"), InlineBody::Opaque);
        assert_eq!(encode_inline("video/mp4", b"\x00\x00"), InlineBody::Opaque);
    }

    #[test]
    fn test_decode_text_data_url_round_trips() {
        let body = encode_inline("text/csv", b"a,b\n1,2");
        let data_url = match body {
            InlineBody::Text { data_url, .. } => data_url,
            other => panic!("expected text body, got {:?}", other),
        };
        assert_eq!(decode_inline(&data_url).unwrap(), b"a,b\n1,2");
    }

    #[test]
    fn test_decode_rejects_placeholder_references() {
        assert_eq!(decode_inline("mock:///abc/file.bin"), None);
        assert_eq!(decode_inline("not a url at all"), None);
    }
}
