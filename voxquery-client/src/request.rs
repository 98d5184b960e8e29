use serde::Serialize;
use voxquery_core::types::UploadFile;

#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted_headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                let sensitive = k.eq_ignore_ascii_case("authorization")
                    || k.to_ascii_lowercase().contains("api-key");
                let v = if sensitive { "[REDACTED]".into() } else { v.clone() };
                (k.clone(), v)
            })
            .collect();

        let body_summary = match &self.body {
            Body::Empty => "Empty".to_string(),
            Body::Json(s) => format!("Json(len={})", s.len()),
            Body::Multipart { boundary, bytes } => {
                format!("Multipart(boundary={}, bytes_len={})", boundary, bytes.len())
            }
        };

        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &redacted_headers)
            .field("body", &body_summary)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Json(String),
    Multipart { boundary: String, bytes: Vec<u8> },
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn get(base_url: &str, path: &str) -> Self {
        Self {
            method: "GET".into(),
            url: join_url(base_url, path),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Body::Empty,
        }
    }

    pub fn post_json<T: Serialize>(base_url: &str, path: &str, payload: &T) -> anyhow::Result<Self> {
        let json = serde_json::to_string(payload)?;
        Ok(Self {
            method: "POST".into(),
            url: join_url(base_url, path),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Body::Json(json),
        })
    }

    /// Builds a single-file multipart upload under the form field `file`.
    pub fn post_multipart(base_url: &str, path: &str, file: &UploadFile) -> Self {
        let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

        let mut bytes: Vec<u8> = Vec::new();
        append_file(&mut bytes, &boundary, "file", &file.filename, &file.mime_type, &file.bytes);
        bytes.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        Self {
            method: "POST".into(),
            url: join_url(base_url, path),
            headers: vec![
                (
                    "Content-Type".into(),
                    format!("multipart/form-data; boundary={}", boundary),
                ),
                ("Accept".into(), "application/json".into()),
            ],
            body: Body::Multipart { boundary, bytes },
        }
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

fn append_file(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxquery_core::types::SearchQuery;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = ApiRequest::get("https://example.com", "/api/health");
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:3001/", "/api/query"),
            "http://localhost:3001/api/query"
        );
        assert_eq!(
            join_url("http://localhost:3001", "api/query"),
            "http://localhost:3001/api/query"
        );
    }

    #[test]
    fn builds_json_query_request() {
        let req =
            ApiRequest::post_json("http://localhost:3001", "/api/query", &SearchQuery::new("hi"))
                .unwrap();
        assert_eq!(req.method, "POST");
        assert!(req.url.ends_with("/api/query"));
        match req.body {
            Body::Json(s) => assert!(s.contains("\"query\":\"hi\"")),
            _ => panic!("expected json body"),
        }
    }

    #[test]
    fn builds_multipart_with_file_part() {
        let file = UploadFile {
            filename: "paper.pdf".into(),
            mime_type: "application/pdf".into(),
            bytes: vec![1, 2, 3],
        };
        let req = ApiRequest::post_multipart("http://localhost:3001", "/api/ingest/pdf", &file);

        assert!(
            req.header("content-type")
                .is_some_and(|v| v.starts_with("multipart/form-data; boundary="))
        );
        match req.body {
            Body::Multipart { bytes, boundary } => {
                let s = String::from_utf8_lossy(&bytes);
                assert!(s.contains("name=\"file\""));
                assert!(s.contains("filename=\"paper.pdf\""));
                assert!(s.contains("Content-Type: application/pdf"));
                assert!(s.ends_with(&format!("--{}--\r\n", boundary)));
            }
            _ => panic!("expected multipart body"),
        }
    }

    #[test]
    fn debug_redacts_authorization() {
        let mut req = ApiRequest::get("https://example.com", "/api/health");
        req.headers
            .push(("Authorization".into(), "Bearer tok-123".into()));

        let s = format!("{req:?}");
        assert!(!s.contains("tok-123"));
        assert!(!s.contains("Bearer"));
        assert!(s.contains("[REDACTED]"));
    }
}
