//! Request outcomes for mutate calls.
//!
//! Transport code reports every completed request as a [`RequestOutcome`]:
//! either the server answered with a payload, or the request failed before a
//! usable answer arrived. The coordinator feeds that single value into one
//! state-update path, so the success/failure branching lives in exactly one
//! place ([`RequestOutcome::resolve`]).

use serde::{Deserialize, Serialize};

/// The value of `status` that marks an accepted action.
pub const SUCCESS_STATUS: &str = "success";

/// JSON body returned by the sync and toggle endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: Some(SUCCESS_STATUS.to_string()),
            message: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Some("error".to_string()),
            message: Some(message.into()),
        }
    }

    /// Decodes a 2xx body. A body that is not JSON decodes to an empty
    /// response, which resolves as an application failure.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|err| {
            tracing::debug!(
                error = %err,
                body_len = body.len(),
                "response body is not an action payload"
            );
            Self::default()
        })
    }
}

/// Why a request produced no usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The connection failed or no response arrived.
    Network(String),
    /// The server answered with a non-2xx status.
    HttpStatus(u16),
}

/// Two-outcome result of a mutate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Success(ActionResponse),
    Failure(FailureReason),
}

/// What the coordinator should do with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    /// The server answered but refused; carries its message when it sent one.
    Rejected { message: Option<String> },
    /// Transport failure; only a generic message can be shown.
    Unreachable,
}

impl RequestOutcome {
    /// Classifies an HTTP answer: any 2xx carries a payload, anything else is
    /// a transport-level failure whatever the body says.
    #[must_use]
    pub fn from_http(status: u16, body: &str) -> Self {
        if (200..300).contains(&status) {
            Self::Success(ActionResponse::from_body(body))
        } else {
            Self::Failure(FailureReason::HttpStatus(status))
        }
    }

    #[must_use]
    pub fn resolve(&self) -> Resolution {
        match self {
            Self::Success(response) if response.status.as_deref() == Some(SUCCESS_STATUS) => {
                Resolution::Accepted
            }
            Self::Success(response) => Resolution::Rejected {
                message: response.message.clone().filter(|m| !m.is_empty()),
            },
            Self::Failure(_) => Resolution::Unreachable,
        }
    }
}
