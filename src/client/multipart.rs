//! Multipart/form-data encoding for document uploads.
//!
//! The server expects a single file part named `file` with content type
//! `application/pdf`. The body is encoded once per upload call with a fresh
//! random boundary token; retries resend the identical bytes.

use uuid::Uuid;

/// Form field name the server reads the document from.
const FIELD_NAME: &str = "file";

/// Content type of the uploaded part. The server is authoritative about
/// whether the bytes actually are a PDF.
const PART_CONTENT_TYPE: &str = "application/pdf";

/// An encoded multipart body holding one document.
#[derive(Debug, Clone)]
pub struct MultipartDocument {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartDocument {
    /// Encode `content` under the caller-supplied filename with a fresh
    /// random boundary token.
    pub fn new(filename: &str, content: &[u8]) -> Self {
        Self::with_boundary(Uuid::new_v4().simple().to_string(), filename, content)
    }

    fn with_boundary(boundary: String, filename: &str, content: &[u8]) -> Self {
        let mut body = Vec::with_capacity(content.len() + 256);
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{FIELD_NAME}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {PART_CONTENT_TYPE}\r\n\r\n").as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Self { boundary, body }
    }

    /// Content-Type header value carrying the boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
