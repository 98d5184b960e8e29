use crate::parse;
use crate::request::{ApiRequest, Body};
use crate::session::{AuthRedirect, SessionStore};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Instant;
use voxquery_core::config::ClientConfig;
use voxquery_core::error::ApiError;
use voxquery_core::types::{HealthStatus, IngestReceipt, SearchQuery, SearchResponse, UploadFile};

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Mediates every call to the query/ingest backend.
///
/// Cross-cutting policy lives here so call sites stay plain: bearer-token
/// injection from the session store, latency logging, failure
/// classification, and the 401 session-invalidation side effect.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    redirect: Arc<dyn AuthRedirect>,
}

impl ApiClient {
    pub fn new(
        cfg: &ClientConfig,
        session: Arc<dyn SessionStore>,
        redirect: Arc<dyn AuthRedirect>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.request_timeout())
            .build()
            .context("build http client")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            session,
            redirect,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request with the full policy applied.
    ///
    /// Successful responses come back untouched. Failures are logged and
    /// re-raised; a 401 additionally clears the stored token and notifies
    /// the redirect observer before propagating.
    pub async fn send(&self, mut req: ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Some(token) = self.session_token() {
            req.headers
                .push(("Authorization".into(), format!("Bearer {token}")));
        }

        let method = req.method.clone();
        let url = req.url.clone();
        let started = Instant::now();

        let resp = match self.execute(&req).await {
            Ok(resp) => resp,
            Err(err) => {
                match &err {
                    ApiError::MalformedRequest { message } => {
                        log::error!("{method} {url} failed before send: {message}");
                    }
                    _ => {
                        log::error!("{method} {url} got no response: {err}");
                    }
                }
                return Err(err);
            }
        };

        let elapsed_ms = started.elapsed().as_millis();
        log::info!("{method} {url} completed in {elapsed_ms}ms");

        if (200..300).contains(&resp.status) {
            return Ok(resp);
        }

        let message = parse::extract_backend_message(&resp.body);
        let err = ApiError::from_status(resp.status, message);
        log::error!(
            "{method} {url} failed: {} (status {})",
            err.category(),
            resp.status
        );

        if matches!(err, ApiError::Unauthorized { .. }) {
            // The credential is dead either way; dropping it must not mask
            // the error we are about to return.
            if let Err(e) = self.session.clear() {
                log::warn!("clearing session token failed: {e:#}");
            }
            self.redirect.redirect_to_login();
        }

        Err(err)
    }

    pub async fn health(&self) -> anyhow::Result<HealthStatus> {
        let req = ApiRequest::get(&self.base_url, "/api/health");
        let resp = self.send(req).await?;
        parse::parse_health(&resp.body)
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<SearchResponse> {
        let req = ApiRequest::post_json(&self.base_url, "/api/query", &SearchQuery::new(query))?;
        let resp = self.send(req).await?;
        parse::parse_search(&resp.body)
    }

    pub async fn ingest(&self, file: &UploadFile) -> anyhow::Result<IngestReceipt> {
        let req = ApiRequest::post_multipart(&self.base_url, "/api/ingest/pdf", file);
        let resp = self.send(req).await?;
        parse::parse_ingest(&resp.body)
    }

    fn session_token(&self) -> Option<String> {
        match self.session.get() {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                // A broken token store must not take requests down with it.
                log::warn!("reading session token failed: {e:#}");
                None
            }
        }
    }

    async fn execute(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut headers = HeaderMap::new();
        for (k, v) in &req.headers {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                ApiError::MalformedRequest {
                    message: format!("invalid header name {k}: {e}"),
                }
            })?;
            let value = HeaderValue::from_str(v).map_err(|e| ApiError::MalformedRequest {
                message: format!("invalid header value for {k}: {e}"),
            })?;
            headers.insert(name, value);
        }

        let builder = match req.method.as_str() {
            "GET" => self.http.get(&req.url),
            "POST" => self.http.post(&req.url),
            "PUT" => self.http.put(&req.url),
            "DELETE" => self.http.delete(&req.url),
            other => {
                return Err(ApiError::MalformedRequest {
                    message: format!("unsupported method: {other}"),
                });
            }
        }
        .headers(headers);

        let builder = match &req.body {
            Body::Empty => builder,
            Body::Json(s) => builder.body(s.clone()),
            Body::Multipart { bytes, .. } => builder.body(bytes.clone()),
        };

        let resp = builder.send().await.map_err(classify_transport_error)?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(classify_transport_error)?
            .to_vec();

        Ok(ApiResponse { status, body })
    }
}

fn classify_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_builder() {
        ApiError::MalformedRequest {
            message: e.to_string(),
        }
    } else {
        // Connect failures, timeouts, and mid-body drops all mean the same
        // thing to the caller: the server never gave a usable reply.
        ApiError::NetworkUnreachable {
            message: e.to_string(),
        }
    }
}
