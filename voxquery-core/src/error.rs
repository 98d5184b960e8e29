use thiserror::Error;

pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Outcome of classifying a failed backend call.
///
/// The first six variants are `server-responded` failures (we got a status
/// code); `NetworkUnreachable` means the request went out but nothing came
/// back; `MalformedRequest` means we failed before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("unauthorized (401)")]
    Unauthorized { message: Option<String> },

    #[error("forbidden (403)")]
    Forbidden { message: Option<String> },

    #[error("not found (404)")]
    NotFound { message: Option<String> },

    #[error("rate limited (429)")]
    RateLimited { message: Option<String> },

    #[error("client error (status {status})")]
    Client { status: u16, message: Option<String> },

    #[error("server error (status {status})")]
    Server { status: u16, message: Option<String> },

    #[error("no response from server: {message}")]
    NetworkUnreachable { message: String },

    #[error("request could not be sent: {message}")]
    MalformedRequest { message: String },
}

impl ApiError {
    /// Classifies a non-success status code, carrying along whatever
    /// message the backend put in the error body.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            429 => ApiError::RateLimited { message },
            s if s >= 500 => ApiError::Server { status: s, message },
            s => ApiError::Client { status: s, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Client { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::NetworkUnreachable { .. } | ApiError::MalformedRequest { .. } => None,
        }
    }

    /// The message field the backend supplied in its error body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Forbidden { message }
            | ApiError::NotFound { message }
            | ApiError::RateLimited { message }
            | ApiError::Client { message, .. }
            | ApiError::Server { message, .. } => message.as_deref(),
            ApiError::NetworkUnreachable { .. } | ApiError::MalformedRequest { .. } => None,
        }
    }

    /// Short category label used in diagnostic logs.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::Forbidden { .. } => "forbidden",
            ApiError::NotFound { .. } => "not-found",
            ApiError::RateLimited { .. } => "rate-limited",
            ApiError::Client { .. } => "client-error",
            ApiError::Server { .. } => "server-error",
            ApiError::NetworkUnreachable { .. } => "no-response",
            ApiError::MalformedRequest { .. } => "request-malformed",
        }
    }
}

/// Extracts a human-readable message for display.
///
/// Priority: backend-supplied message field, then the transport error's own
/// message, then a fixed fallback.
pub fn format_error(err: &ApiError) -> String {
    if let Some(msg) = err.backend_message().filter(|m| !m.trim().is_empty()) {
        return msg.to_string();
    }

    match err {
        ApiError::NetworkUnreachable { message } | ApiError::MalformedRequest { message }
            if !message.trim().is_empty() =>
        {
            message.clone()
        }
        _ => FALLBACK_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification_covers_the_policy_table() {
        assert!(matches!(
            ApiError::from_status(401, None),
            ApiError::Unauthorized { .. }
        ));
        assert!(matches!(
            ApiError::from_status(403, None),
            ApiError::Forbidden { .. }
        ));
        assert!(matches!(
            ApiError::from_status(404, None),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            ApiError::from_status(429, None),
            ApiError::RateLimited { .. }
        ));
        assert!(matches!(
            ApiError::from_status(500, None),
            ApiError::Server { status: 500, .. }
        ));
        assert!(matches!(
            ApiError::from_status(503, None),
            ApiError::Server { status: 503, .. }
        ));
        assert!(matches!(
            ApiError::from_status(422, None),
            ApiError::Client { status: 422, .. }
        ));
    }

    #[test]
    fn format_error_prefers_backend_message() {
        let err = ApiError::from_status(500, Some("index rebuilding".into()));
        assert_eq!(format_error(&err), "index rebuilding");
    }

    #[test]
    fn format_error_falls_back_to_transport_message() {
        let err = ApiError::NetworkUnreachable {
            message: "connection refused".into(),
        };
        assert_eq!(format_error(&err), "connection refused");
    }

    #[test]
    fn format_error_uses_fallback_literal_when_nothing_else() {
        let err = ApiError::from_status(500, None);
        assert_eq!(format_error(&err), FALLBACK_ERROR_MESSAGE);

        let blank = ApiError::from_status(503, Some("   ".into()));
        assert_eq!(format_error(&blank), FALLBACK_ERROR_MESSAGE);
    }
}
