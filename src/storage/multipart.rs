//! Extraction of a single file field from a `multipart/form-data` body.

use std::convert::Infallible;

use bytes::Bytes;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use multer::{Constraints, Multipart, SizeLimit};

use super::models::FormFile;
use crate::errors::UtilError;

/// Reads the file uploaded under `field_name`.
///
/// Bodies longer than `limit` bytes are refused before parsing starts.
///
/// # Errors
///
/// Returns `PayloadTooLarge` for oversized bodies, `MultipartError` for a
/// missing boundary or malformed body, and `MissingField` when no file part
/// carries the requested name.
pub async fn read_file_field(
    headers: &HeaderMap,
    body: Bytes,
    field_name: &str,
    limit: u64,
) -> Result<FormFile, UtilError> {
    if (body.len() as u64) > limit {
        return Err(UtilError::PayloadTooLarge { limit });
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| UtilError::MultipartError("missing content type".to_string()))?;
    let boundary = multer::parse_boundary(content_type)?;

    let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let constraints = Constraints::new().size_limit(SizeLimit::new().whole_stream(limit));
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        // A plain form value under the right name is not a file.
        let Some(file_name) = field.file_name().map(ToString::to_string) else {
            break;
        };
        let content_type = field.content_type().map(ToString::to_string);
        let data = field.bytes().await?;
        return Ok(FormFile {
            file_name,
            content_type,
            data,
        });
    }

    Err(UtilError::MissingField(field_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    const BOUNDARY: &str = "X-BOUNDARY";

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=X-BOUNDARY"),
        );
        headers
    }

    fn body(parts: &[(&str, Option<&str>, &str)]) -> Bytes {
        let mut out = String::new();
        for (name, file_name, content) in parts {
            out.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(file_name) => out.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n"
                )),
                None => out.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            out.push_str(content);
            out.push_str("\r\n");
        }
        out.push_str(&format!("--{BOUNDARY}--\r\n"));
        Bytes::from(out)
    }

    #[tokio::test]
    async fn skips_other_fields() {
        let body = body(&[("note", None, "hello"), ("cv", Some("cv.txt"), "resume")]);
        let file = read_file_field(&headers(), body, "cv", 1024).await.unwrap();
        assert_eq!(file.file_name, "cv.txt");
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
        assert_eq!(&file.data[..], b"resume");
    }

    #[tokio::test]
    async fn value_field_is_not_a_file() {
        let body = body(&[("cv", None, "not a file")]);
        let err = read_file_field(&headers(), body, "cv", 1024).await.unwrap_err();
        assert!(matches!(err, UtilError::MissingField(ref f) if f == "cv"));
    }

    #[tokio::test]
    async fn requires_multipart_content_type() {
        let mut plain = HeaderMap::new();
        plain.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let err = read_file_field(&plain, Bytes::from_static(b"{}"), "cv", 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, UtilError::MultipartError(_)));
    }
}
