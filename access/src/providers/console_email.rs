//! Console email provider for development.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::providers::{EmailProvider, OtpPurpose};

/// Logs codes to the console instead of sending mail.
///
/// Useful in development where no SMTP relay is configured.
#[derive(Clone, Debug, Default)]
pub struct ConsoleEmailProvider;

impl ConsoleEmailProvider {
    /// Create a new console email provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EmailProvider for ConsoleEmailProvider {
    async fn send_access_code(
        &self,
        to: &str,
        purpose: OtpPurpose,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let expires_minutes = (expires_at - Utc::now()).num_minutes();

        tracing::info!(
            to = %to,
            purpose = %purpose,
            expires_in_minutes = expires_minutes,
            "access code email (development mode)"
        );
        println!("\n╔══════════════════════════════════════════════╗");
        println!("║              ACCESS CODE EMAIL               ║");
        println!("╠══════════════════════════════════════════════╣");
        println!("║ To: {to:<41}║");
        println!("║ Purpose: {:<36}║", purpose.as_str());
        println!("║ Code: {code:<39}║");
        println!("║ Expires in {expires_minutes} minutes{:<24}║", "");
        println!("╚══════════════════════════════════════════════╝\n");

        Ok(())
    }
}
