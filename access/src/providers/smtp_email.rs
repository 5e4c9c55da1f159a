//! SMTP email provider implementation using Lettre.

use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::{AccessError, Result};
use crate::providers::{EmailProvider, OtpPurpose};

/// SMTP email provider using Lettre.
///
/// Sends real mail, suitable for production.
///
/// # Examples
///
/// ```ignore
/// use gatekit_access::providers::SmtpEmailProvider;
///
/// let provider = SmtpEmailProvider::new(
///     "smtp.example.com".to_string(),
///     587,
///     "mailer".to_string(),
///     "app_password".to_string(),
///     "noreply@example.com".to_string(),
///     "Ticket Marketplace".to_string(),
/// );
/// ```
#[derive(Clone)]
pub struct SmtpEmailProvider {
    smtp_server: String,
    smtp_port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
}

impl SmtpEmailProvider {
    /// Create a new SMTP email provider.
    #[must_use]
    pub fn new(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_email: String,
        from_name: String,
    ) -> Self {
        Self {
            smtp_server,
            smtp_port,
            credentials: Credentials::new(smtp_username, smtp_password),
            from_email,
            from_name,
        }
    }

    /// Build an SMTP transport.
    ///
    /// A fresh transport per send avoids connection-pooling issues with
    /// relays that drop idle connections.
    fn build_transport(&self) -> Result<SmtpTransport> {
        Ok(SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| AccessError::DeliveryFailed(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn subject_line(purpose: OtpPurpose) -> &'static str {
        match purpose {
            OtpPurpose::Generic => "Your staff portal access code",
            OtpPurpose::PayoutRequest => "Confirm your payout request",
        }
    }
}

impl EmailProvider for SmtpEmailProvider {
    async fn send_access_code(
        &self,
        to: &str,
        purpose: OtpPurpose,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let expires_minutes = (expires_at - Utc::now()).num_minutes();

        let from = format!("{} <{}>", self.from_name, self.from_email)
            .parse()
            .map_err(|e| AccessError::DeliveryFailed(format!("Invalid from address: {e}")))?;
        let to_mailbox = to
            .parse()
            .map_err(|e| AccessError::DeliveryFailed(format!("Invalid recipient: {e}")))?;

        let body = format!(
            "Your verification code is: {code}\n\n\
             It expires in {expires_minutes} minutes. If you did not request \
             this code, you can ignore this email."
        );

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(Self::subject_line(purpose))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AccessError::DeliveryFailed(format!("Failed to build email: {e}")))?;

        let transport = self.build_transport()?;
        transport
            .send(&message)
            .map_err(|e| AccessError::DeliveryFailed(format!("SMTP send failed: {e}")))?;

        tracing::info!(
            to = %to,
            purpose = %purpose,
            "access code email sent"
        );

        Ok(())
    }
}
