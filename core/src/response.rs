//! Uniform caller-facing response envelope.
//!
//! Every operation in this subsystem reports expected failures (not-found,
//! expired, already-used, rate-limited) as ordinary results. The envelope
//! carries either `data` or a user-facing `error` message; infrastructure
//! failures are collapsed into a generic message so internal details never
//! leak to callers.

use serde::{Deserialize, Serialize};

/// Generic message shown to callers when an infrastructure error occurs.
///
/// Store or delivery failures are logged with full context at the call site;
/// the caller only ever sees this.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// An error that knows how to present itself to an end user.
///
/// Implemented by the per-crate error enums so [`ApiResponse::from_result`]
/// can distinguish expected, user-facing failures from infrastructure
/// faults.
pub trait UserFacingError {
    /// `true` when the failure is an expected, user-facing outcome
    /// (validation, policy, not-found) rather than an infrastructure fault.
    fn is_expected(&self) -> bool;

    /// Message safe to show to an end user.
    fn user_message(&self) -> String;
}

/// Uniform response envelope: `{success, data?, error?}`.
///
/// # Examples
///
/// ```
/// use gatekit_core::ApiResponse;
///
/// let ok = ApiResponse::ok(42);
/// assert!(ok.success);
/// assert_eq!(ok.data, Some(42));
///
/// let err = ApiResponse::<u32>::err("No active code found");
/// assert!(!err.success);
/// assert!(err.data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// User-facing error message, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response with a user-facing message.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Build an envelope from an operation result.
    ///
    /// Expected failures keep their user-facing message; infrastructure
    /// faults are replaced with [`GENERIC_FAILURE`].
    pub fn from_result<E: UserFacingError>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) if e.is_expected() => Self::err(e.user_message()),
            Err(_) => Self::err(GENERIC_FAILURE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Missing,
        StoreDown,
    }

    impl UserFacingError for TestError {
        fn is_expected(&self) -> bool {
            matches!(self, Self::Missing)
        }

        fn user_message(&self) -> String {
            match self {
                Self::Missing => "Not found".to_string(),
                Self::StoreDown => "connection refused to db-internal:5432".to_string(),
            }
        }
    }

    #[test]
    fn expected_error_keeps_its_message() {
        let resp = ApiResponse::<()>::from_result(Err(TestError::Missing));
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Not found"));
    }

    #[test]
    fn infrastructure_error_is_masked() {
        let resp = ApiResponse::<()>::from_result(Err(TestError::StoreDown));
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some(GENERIC_FAILURE));
    }

    #[test]
    fn success_carries_data() {
        let resp = ApiResponse::from_result(Ok::<_, TestError>("admitted"));
        assert!(resp.success);
        assert_eq!(resp.data, Some("admitted"));
        assert!(resp.error.is_none());
    }

    #[test]
    fn serializes_without_empty_fields() {
        let json = serde_json::to_string(&ApiResponse::ok(1)).unwrap();
        assert_eq!(json, r#"{"success":true,"data":1}"#);
    }
}
