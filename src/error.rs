//! Error types and handling for the weather dashboard
//!
//! Two layers live here: [`UpstreamError`] describes what went wrong talking
//! to an external service, and [`DashboardError`] is what the HTTP layer
//! reports to clients. Upstream failures are logged with full detail and then
//! collapsed into the coarser public kinds.

use thiserror::Error;

/// Public error type for the weather dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Forward geocoding produced no usable result
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Missing or malformed request parameters
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The primary forecast service could not be reached or answered badly
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl DashboardError {
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the message shown to API clients
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::NotFound { message }
            | DashboardError::BadRequest { message }
            | DashboardError::UpstreamUnavailable { message } => message.clone(),
            DashboardError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}

/// Failure talking to one external service
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{service} request timed out")]
    Timeout { service: &'static str },

    #[error("{service} responded with HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned an unreadable payload: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    /// Classify a reqwest error raised while calling `service`
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { service }
        } else if err.is_decode() {
            Self::Decode {
                service,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                service,
                status: status.as_u16(),
            }
        } else {
            Self::Transport {
                service,
                message: err.to_string(),
            }
        }
    }

    #[must_use]
    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::Timeout { service }
            | UpstreamError::Status { service, .. }
            | UpstreamError::Transport { service, .. }
            | UpstreamError::Decode { service, .. } => service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let not_found = DashboardError::not_found("City not found");
        assert!(matches!(not_found, DashboardError::NotFound { .. }));

        let bad = DashboardError::bad_request("missing lat");
        assert!(matches!(bad, DashboardError::BadRequest { .. }));

        let upstream = DashboardError::upstream("Failed to fetch weather data");
        assert!(matches!(upstream, DashboardError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            DashboardError::not_found("City not found").user_message(),
            "City not found"
        );
        assert!(
            DashboardError::config("bad port")
                .user_message()
                .contains("Configuration error")
        );
    }

    #[test]
    fn test_upstream_error_display() {
        let err = UpstreamError::Status {
            service: "forecast",
            status: 503,
        };
        assert_eq!(err.to_string(), "forecast responded with HTTP 503");
        assert_eq!(err.service(), "forecast");

        let err = UpstreamError::Timeout { service: "nominatim" };
        assert_eq!(err.to_string(), "nominatim request timed out");
    }
}
