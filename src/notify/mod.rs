use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tera::Context;
use tracing::info;

use crate::error::IntakeError;
use crate::schema::{display_or, role_label, ContactSubmission, PartnerSubmission};
use crate::templates::{get_tera, CONTACT_EMAIL, PARTNER_EMAIL};

pub const HIGH_PRIORITY_FLAG: &str = "⚡ HIGH PRIORITY";

/// Derived per submission, never persisted.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub fn contact_message(
    recipient: &str,
    submission: &ContactSubmission,
    sheet: &str,
) -> Result<NotificationMessage, IntakeError> {
    let name = display_or(&submission.name, "Not provided");

    let mut ctx = Context::new();
    ctx.insert("name", &name);
    ctx.insert("email", &display_or(&submission.email, "Not provided"));
    ctx.insert("phone", &display_or(&submission.phone, "Not provided"));
    ctx.insert("age", &display_or(&submission.age, "Not provided"));
    ctx.insert(
        "mortgage_amount",
        &display_or(&submission.mortgage_amount, "Not provided"),
    );
    ctx.insert(
        "coverage_interest",
        &display_or(&submission.coverage_interest, "Not provided"),
    );
    ctx.insert("referrer", &display_or(&submission.referrer, "Direct"));
    ctx.insert(
        "notes",
        &display_or(&submission.notes, "No additional notes provided"),
    );
    ctx.insert("sheet", sheet);

    Ok(NotificationMessage {
        to: recipient.to_string(),
        subject: format!("🏠 New Client Inquiry - {}", name),
        body: get_tera().render(CONTACT_EMAIL, &ctx)?,
    })
}

pub fn partner_message(
    recipient: &str,
    submission: &PartnerSubmission,
    sheet: &str,
) -> Result<NotificationMessage, IntakeError> {
    let name = display_or(&submission.name, "Not provided");
    let high_priority = submission.is_high_priority();

    let mut ctx = Context::new();
    ctx.insert("name", &name);
    ctx.insert("company", &display_or(&submission.company, "Not provided"));
    ctx.insert("email", &display_or(&submission.email, "Not provided"));
    ctx.insert("phone", &display_or(&submission.phone, "Not provided"));
    ctx.insert("role", &role_label(submission.role.as_deref()));
    ctx.insert("high_priority", &high_priority);
    ctx.insert(
        "priority_flag",
        if high_priority { HIGH_PRIORITY_FLAG } else { "" },
    );
    ctx.insert(
        "notes",
        &display_or(&submission.notes, "No additional notes provided"),
    );
    ctx.insert("sheet", sheet);

    Ok(NotificationMessage {
        to: recipient.to_string(),
        subject: format!("🤝 New Partner Application - {}", name),
        body: get_tera().render(PARTNER_EMAIL, &ctx)?,
    })
}

/// Outbound mail channel. One message per accepted submission; dispatch
/// failures surface as pipeline errors and are never retried here.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<(), IntakeError>;
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Dispatches through an HTTP mail API (Resend-compatible shape).
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<(), IntakeError> {
        let body = MailRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| IntakeError::Mail(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IntakeError::Mail(format!(
                "Mail API returned {}: {}",
                status, text
            )));
        }

        info!(to = %message.to, subject = %message.subject, "notification dispatched");
        Ok(())
    }
}

/// Records messages instead of sending them; used by tests.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<NotificationMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<(), IntakeError> {
        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(message.clone());
        Ok(())
    }
}
