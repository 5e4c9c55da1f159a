//! Access-verification constants.

/// Action names used as the third component of rate-limit keys.
///
/// Keys are composed as `{action}:{subject}:{origin}` so that independent
/// flows never share a counter.
pub mod actions {
    /// OTP issuance for staff-portal step-up verification.
    pub const OTP_REQUEST: &str = "otp_request";

    /// Checkout/order placement (the marketplace's purchase flow).
    pub const CHECKOUT: &str = "checkout";
}
