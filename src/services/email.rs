//! Email service for registration confirmations

use std::str::FromStr;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::registration::Registration,
    services::registrations::{ConfirmationMailer, EmailReceipt},
};

/// Everything the confirmation email needs to show
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationDetails {
    pub registration_id: Uuid,
    pub parent_name: String,
    /// `(child name, days, price)`
    pub children: Vec<(String, u32, Decimal)>,
    pub total_amount: Decimal,
    pub currency: String,
    pub qr_token: Option<String>,
}

impl ConfirmationDetails {
    pub fn new(registration: &Registration, qr_token: Option<&str>) -> Self {
        Self {
            registration_id: registration.id,
            parent_name: registration.parent_name.clone(),
            children: registration
                .children
                .iter()
                .map(|c| (c.full_name.clone(), c.number_of_days, c.price))
                .collect(),
            total_amount: registration.total_amount,
            currency: registration.currency.clone(),
            qr_token: qr_token.map(str::to_string),
        }
    }

    fn body(&self, program: &str) -> String {
        let mut lines = String::new();
        for (name, days, price) in &self.children {
            lines.push_str(&format!(
                "  - {}: {} day(s), {} {}\n",
                name, days, self.currency, price
            ));
        }

        let check_in = match &self.qr_token {
            Some(token) => format!("\nYour check-in code: {}\n", token),
            None => String::new(),
        };

        format!(
            r#"
Hello {parent},

Thank you for registering for {program}.

Booking reference: {id}
{lines}
Total due: {currency} {total}
{check_in}
We will be in touch with payment details shortly.
"#,
            parent = self.parent_name,
            program = program,
            id = self.registration_id,
            lines = lines,
            currency = self.currency,
            total = self.total_amount,
            check_in = check_in,
        )
    }
}

/// Escape text for an HTML text node or quoted attribute
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML alternative of a plain-text body. `<pre>` keeps the line breaks.
fn html_body(text: &str) -> String {
    format!("<html><body><pre>{}</pre></body></html>", escape_html(text))
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the booking confirmation for a registration
    pub async fn send_confirmation(
        &self,
        to: &str,
        program: &str,
        details: &ConfirmationDetails,
    ) -> AppResult<()> {
        let subject = format!("Booking confirmed: {}", program);
        let body = details.body(program);
        self.send_email(to, &subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Basecamp");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::BadRequest(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body(body)),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        // SmtpTransport blocks on network I/O
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl ConfirmationMailer for EmailService {
    async fn send_confirmation_email(
        &self,
        email: &str,
        program: &str,
        details: &ConfirmationDetails,
    ) -> EmailReceipt {
        match self.send_confirmation(email, program, details).await {
            Ok(()) => EmailReceipt::sent(),
            Err(e) => EmailReceipt::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_lists_children_and_total() {
        let details = ConfirmationDetails {
            registration_id: Uuid::nil(),
            parent_name: "Wanjiru".to_string(),
            children: vec![
                ("Amani".to_string(), 2, Decimal::from(5500)),
                ("Zawadi".to_string(), 1, Decimal::from(3500)),
            ],
            total_amount: Decimal::from(9000),
            currency: "KES".to_string(),
            qr_token: Some("abc".to_string()),
        };

        let body = details.body("Holiday Camp");
        assert!(body.contains("Hello Wanjiru"));
        assert!(body.contains("Holiday Camp"));
        assert!(body.contains("Amani: 2 day(s), KES 5500"));
        assert!(body.contains("Total due: KES 9000"));
        assert!(body.contains("check-in code: abc"));
    }

    #[test]
    fn test_body_without_qr_token() {
        let details = ConfirmationDetails {
            registration_id: Uuid::nil(),
            parent_name: "Otieno".to_string(),
            children: vec![],
            total_amount: Decimal::ZERO,
            currency: "KES".to_string(),
            qr_token: None,
        };
        assert!(!details.body("Day Camp").contains("check-in code"));
    }

    #[test]
    fn test_html_body_escapes_submitted_names() {
        let details = ConfirmationDetails {
            registration_id: Uuid::nil(),
            parent_name: r#"<a href="https://pay.example">Pay here</a>"#.to_string(),
            children: vec![("Tom & <b>Jerry</b>".to_string(), 1, Decimal::from(3500))],
            total_amount: Decimal::from(3500),
            currency: "KES".to_string(),
            qr_token: None,
        };

        let html = html_body(&details.body("Day Camp"));
        assert!(!html.contains("<a href"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;a href=&quot;https://pay.example&quot;&gt;Pay here&lt;/a&gt;"));
        assert!(html.contains("Tom &amp; &lt;b&gt;Jerry&lt;/b&gt;"));
        assert!(!html.contains("<br>"));
        assert!(html.starts_with("<html><body><pre>"));
    }
}
