//! Body codecs: JSON and multipart/form-data encoding, JSON decoding.
//!
//! The multipart encoder is hand-assembled rather than delegated to
//! `reqwest::multipart` because the wire contract is pinned: part
//! ordering is explicit (text fields first in map order, then file parts
//! in input order), every part ends with CRLF, and the body terminates
//! with the closing boundary line. Tests inspect the raw bytes through
//! the mock transport.

use std::collections::BTreeMap;

use ring::rand::{SecureRandom, SystemRandom};
use tracing::trace;

use crate::descriptor::{BinaryPart, BodyEncoding, ParamValue};
use crate::error::{DeserializeError, SerializeError};

// ============================================================================
// Encoded Body
// ============================================================================

/// A serialized request body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    /// Value for the `Content-Type` header.
    pub content_type: String,
    /// Raw body bytes.
    pub bytes: Vec<u8>,
}

/// Encodes a parameter map using the selected encoding.
///
/// Multipart encoding draws a fresh random boundary per call.
pub fn encode_body(
    encoding: BodyEncoding,
    parameters: &BTreeMap<String, ParamValue>,
) -> Result<EncodedBody, SerializeError> {
    match encoding {
        BodyEncoding::Json => encode_json(parameters),
        BodyEncoding::Multipart => MultipartCodec::new().encode(parameters),
    }
}

// ============================================================================
// JSON Codec
// ============================================================================

/// Encodes the parameter map as a JSON object body.
///
/// Fails with [`SerializeError::NotRepresentable`] if any value is a
/// binary file part.
pub fn encode_json(
    parameters: &BTreeMap<String, ParamValue>,
) -> Result<EncodedBody, SerializeError> {
    let mut object = serde_json::Map::with_capacity(parameters.len());

    for (name, value) in parameters {
        let json = match value {
            ParamValue::Text(s) => serde_json::Value::String(s.clone()),
            ParamValue::Json(v) => v.clone(),
            ParamValue::File(_) | ParamValue::Files(_) => {
                return Err(SerializeError::NotRepresentable(name.clone()));
            }
        };
        object.insert(name.clone(), json);
    }

    let bytes = serde_json::to_vec(&serde_json::Value::Object(object))?;
    Ok(EncodedBody {
        content_type: "application/json".to_string(),
        bytes,
    })
}

/// Decodes raw response bytes into the statically expected shape.
pub fn decode_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, DeserializeError> {
    Ok(serde_json::from_slice(bytes)?)
}

// ============================================================================
// Multipart Codec
// ============================================================================

/// `multipart/form-data` encoder with a random per-instance boundary.
#[derive(Debug, Clone)]
pub struct MultipartCodec {
    boundary: String,
}

impl MultipartCodec {
    /// Creates a codec with a fresh random boundary.
    pub fn new() -> Self {
        Self {
            boundary: random_boundary(),
        }
    }

    /// Creates a codec with a fixed boundary.
    #[cfg(test)]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
        }
    }

    /// Returns the boundary string.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Encodes the parameter map as a multipart body.
    ///
    /// Part order is pinned: text fields first in map order, then file
    /// parts in input order. Every part is followed by CRLF and the body
    /// ends with `--<boundary>--\r\n`.
    pub fn encode(
        &self,
        parameters: &BTreeMap<String, ParamValue>,
    ) -> Result<EncodedBody, SerializeError> {
        let mut body: Vec<u8> = Vec::new();

        // Text fields first, in map order.
        for (name, value) in parameters {
            match value {
                ParamValue::File(_) | ParamValue::Files(_) => {}
                other => {
                    let text = other
                        .as_text()
                        .ok_or_else(|| SerializeError::NotRepresentable(name.clone()))?;
                    self.write_text_field(&mut body, name, &text);
                }
            }
        }

        // Then file parts, in input order.
        for (name, value) in parameters {
            match value {
                ParamValue::File(part) => self.write_file_part(&mut body, name, part),
                ParamValue::Files(parts) => {
                    for part in parts {
                        self.write_file_part(&mut body, name, part);
                    }
                }
                _ => {}
            }
        }

        // Closing boundary.
        body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        trace!(bytes = body.len(), boundary = %self.boundary, "Multipart body assembled");

        Ok(EncodedBody {
            content_type: format!("multipart/form-data; boundary={}", self.boundary),
            bytes: body,
        })
    }

    fn write_text_field(&self, body: &mut Vec<u8>, name: &str, value: &str) {
        body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    fn write_file_part(&self, body: &mut Vec<u8>, name: &str, part: &BinaryPart) {
        body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\n",
                part.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.mime_type).as_bytes());
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
}

impl Default for MultipartCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws a random multipart boundary.
///
/// Falls back to a clock-derived boundary if the system RNG is
/// unavailable; boundaries only need to be unlikely to collide with
/// body content, not unpredictable.
fn random_boundary() -> String {
    let mut buf = [0u8; 16];
    if SystemRandom::new().fill(&mut buf).is_err() {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        return format!("snapkeep-{nanos:032x}");
    }

    let mut hex = String::with_capacity(32);
    for byte in buf {
        hex.push_str(&format!("{byte:02x}"));
    }
    format!("snapkeep-{hex}")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BinaryPart;

    fn params(entries: Vec<(&str, ParamValue)>) -> BTreeMap<String, ParamValue> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn json_encodes_object_body() {
        let body = encode_json(&params(vec![
            ("name", ParamValue::from("travel")),
            ("count", ParamValue::Json(serde_json::json!(3))),
        ]))
        .unwrap();

        assert_eq!(body.content_type, "application/json");
        let value: serde_json::Value = serde_json::from_slice(&body.bytes).unwrap();
        assert_eq!(value["name"], "travel");
        assert_eq!(value["count"], 3);
    }

    #[test]
    fn json_rejects_file_parts() {
        let result = encode_json(&params(vec![(
            "files",
            ParamValue::File(BinaryPart::jpeg("a.jpg", vec![1, 2])),
        )]));

        assert!(matches!(result, Err(SerializeError::NotRepresentable(name)) if name == "files"));
    }

    #[test]
    fn boundaries_differ_per_codec_instance() {
        assert_ne!(MultipartCodec::new().boundary(), MultipartCodec::new().boundary());
    }

    #[test]
    fn multipart_emits_metadata_then_files_then_closing_boundary() {
        let codec = MultipartCodec::with_boundary("B");
        let body = codec
            .encode(&params(vec![
                (
                    "files",
                    ParamValue::Files(vec![
                        BinaryPart::jpeg("one.jpg", vec![0xFF, 0xD8]),
                        BinaryPart::jpeg("two.jpg", vec![0xFF, 0xD9]),
                    ]),
                ),
                ("uploadItems", ParamValue::Json(serde_json::json!([{"fileName": "one.jpg"}]))),
            ]))
            .unwrap();

        let text = String::from_utf8_lossy(&body.bytes);
        let upload_at = text.find("name=\"uploadItems\"").unwrap();
        let first_file_at = text.find("filename=\"one.jpg\"").unwrap();
        let second_file_at = text.find("filename=\"two.jpg\"").unwrap();

        // Text field before files, files in input order.
        assert!(upload_at < first_file_at);
        assert!(first_file_at < second_file_at);
        assert!(text.ends_with("--B--\r\n"));
        assert_eq!(body.content_type, "multipart/form-data; boundary=B");
    }

    #[test]
    fn multipart_part_count_matches_inputs() {
        let files: Vec<BinaryPart> = (0..3)
            .map(|i| BinaryPart::jpeg(format!("f{i}.jpg"), vec![i]))
            .collect();

        let codec = MultipartCodec::with_boundary("B");
        let body = codec
            .encode(&params(vec![
                ("files", ParamValue::Files(files)),
                ("uploadItems", ParamValue::Json(serde_json::json!([1, 2, 3]))),
            ]))
            .unwrap();

        let text = String::from_utf8_lossy(&body.bytes);
        assert_eq!(text.matches("name=\"files\"").count(), 3);
        assert_eq!(text.matches("name=\"uploadItems\"").count(), 1);
        // 4 opening boundaries plus 1 closing.
        assert_eq!(text.matches("--B\r\n").count(), 4);
        assert_eq!(text.matches("--B--\r\n").count(), 1);
    }

    #[test]
    fn multipart_coerces_plain_values_to_text() {
        let codec = MultipartCodec::with_boundary("B");
        let body = codec
            .encode(&params(vec![(
                "isBookmarked",
                ParamValue::Json(serde_json::json!(false)),
            )]))
            .unwrap();

        let text = String::from_utf8_lossy(&body.bytes);
        assert!(text.contains("name=\"isBookmarked\"\r\n\r\nfalse\r\n"));
    }

    #[test]
    fn decode_json_reports_shape_mismatch() {
        #[derive(serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            id: i64,
        }

        let err = decode_json::<Expected>(br#"{"id": "not-a-number"}"#);
        assert!(matches!(err, Err(DeserializeError::Shape(_))));
    }
}
