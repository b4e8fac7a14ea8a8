use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::error::IntakeError;
use crate::notify::{contact_message, partner_message, Mailer, NotificationMessage};
use crate::schema::{ContactSubmission, PartnerSubmission, CONTACT_HEADERS, PARTNER_HEADERS};
use crate::store::{generate_submission_id, SheetStore};

/// Matches the sheet's displayed number format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One form variant: its sheet layout, mail template and success copy.
/// Both deployed endpoints are instances of the same pipeline over one of
/// these.
pub trait FormVariant: Send + Sync + 'static {
    type Submission: Send + Sync;

    const NAME: &'static str;
    const SHEET_FILE: &'static str;
    const SUCCESS_MESSAGE: &'static str;

    fn headers() -> &'static [&'static str];
    fn row_cells(submission: &Self::Submission) -> Vec<String>;
    fn message(
        recipient: &str,
        submission: &Self::Submission,
        sheet: &str,
    ) -> Result<NotificationMessage, IntakeError>;
}

pub struct ContactForm;

impl FormVariant for ContactForm {
    type Submission = ContactSubmission;

    const NAME: &'static str = "contact";
    const SHEET_FILE: &'static str = "client-inquiries.csv";
    const SUCCESS_MESSAGE: &'static str = "Form submitted successfully!";

    fn headers() -> &'static [&'static str] {
        CONTACT_HEADERS
    }

    fn row_cells(submission: &Self::Submission) -> Vec<String> {
        submission.row_cells()
    }

    fn message(
        recipient: &str,
        submission: &Self::Submission,
        sheet: &str,
    ) -> Result<NotificationMessage, IntakeError> {
        contact_message(recipient, submission, sheet)
    }
}

pub struct PartnerForm;

impl FormVariant for PartnerForm {
    type Submission = PartnerSubmission;

    const NAME: &'static str = "partner";
    const SHEET_FILE: &'static str = "partner-applications.csv";
    const SUCCESS_MESSAGE: &'static str = "Application submitted successfully!";

    fn headers() -> &'static [&'static str] {
        PARTNER_HEADERS
    }

    fn row_cells(submission: &Self::Submission) -> Vec<String> {
        submission.row_cells()
    }

    fn message(
        recipient: &str,
        submission: &Self::Submission,
        sheet: &str,
    ) -> Result<NotificationMessage, IntakeError> {
        partner_message(recipient, submission, sheet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeResult {
    Success,
    Error,
}

/// The wire response; always returned with HTTP 200, mirroring a form sink
/// that cannot vary its status code.
#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub result: IntakeResult,
    pub message: String,
}

/// Receive one submission: ensure header, append a timestamped row, notify
/// the operator. No retries, no dedup, no rollback of completed steps.
pub struct IntakePipeline<V: FormVariant> {
    store: Arc<dyn SheetStore>,
    mailer: Arc<dyn Mailer>,
    recipient: String,
    _variant: PhantomData<V>,
}

impl<V: FormVariant> IntakePipeline<V> {
    pub fn new(
        store: Arc<dyn SheetStore>,
        mailer: Arc<dyn Mailer>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            recipient: recipient.into(),
            _variant: PhantomData,
        }
    }

    pub async fn receive(&self, submission: V::Submission) -> IntakeResponse {
        let submission_id = generate_submission_id();
        info!(form = V::NAME, %submission_id, "submission received");

        match self.process(&submission).await {
            Ok(()) => {
                info!(form = V::NAME, %submission_id, "row appended and operator notified");
                IntakeResponse {
                    result: IntakeResult::Success,
                    message: V::SUCCESS_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                error!(form = V::NAME, %submission_id, error = %e, "submission failed");
                IntakeResponse {
                    result: IntakeResult::Error,
                    message: e.to_string(),
                }
            }
        }
    }

    async fn process(&self, submission: &V::Submission) -> Result<(), IntakeError> {
        // First submission writes the header row. Check-then-act; the store's
        // own serialization of writes is the only guard.
        if self.store.is_empty()? {
            let headers: Vec<String> = V::headers().iter().map(|h| h.to_string()).collect();
            self.store.append_row(&headers)?;
        }

        let mut cells = Vec::with_capacity(V::headers().len());
        cells.push(Utc::now().format(TIMESTAMP_FORMAT).to_string());
        cells.extend(V::row_cells(submission));
        self.store.append_row(&cells)?;

        // An appended row stays stored even if dispatch fails below.
        let message = V::message(&self.recipient, submission, &self.store.location())?;
        self.mailer.send(&message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemoryMailer, HIGH_PRIORITY_FLAG};
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct FailingStore;

    impl SheetStore for FailingStore {
        fn is_empty(&self) -> Result<bool, IntakeError> {
            Ok(true)
        }

        fn append_row(&self, _cells: &[String]) -> Result<(), IntakeError> {
            Err(IntakeError::Store(std::io::Error::new(
                std::io::ErrorKind::Other,
                "sheet write refused",
            )))
        }

        fn location(&self) -> String {
            "(unwritable sheet)".to_string()
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: &NotificationMessage) -> Result<(), IntakeError> {
            Err(IntakeError::Mail("relay unreachable".to_string()))
        }
    }

    fn partner_pipeline(
        store: Arc<dyn SheetStore>,
        mailer: Arc<dyn Mailer>,
    ) -> IntakePipeline<PartnerForm> {
        IntakePipeline::new(store, mailer, "ops@example.com")
    }

    #[tokio::test]
    async fn partner_submission_on_empty_store() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(MemoryMailer::new());
        let pipeline = partner_pipeline(store.clone(), mailer.clone());

        let response = pipeline
            .receive(PartnerSubmission {
                name: Some("Jane Doe".into()),
                email: Some("jane@x.com".into()),
                role: Some("realtor".into()),
                ..Default::default()
            })
            .await;

        assert_eq!(response.result, IntakeResult::Success);
        assert_eq!(response.message, "Application submitted successfully!");

        let rows = store.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], PARTNER_HEADERS.to_vec());
        // Timestamp first, then schema-ordered cells.
        chrono::NaiveDateTime::parse_from_str(&rows[1][0], TIMESTAMP_FORMAT)
            .expect("first cell is a formatted timestamp");
        assert_eq!(
            rows[1][1..],
            ["Jane Doe", "", "jane@x.com", "", "Real Estate Agent", "", "New"]
                .map(String::from)
        );

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].body.contains(HIGH_PRIORITY_FLAG));
    }

    #[tokio::test]
    async fn header_row_is_written_exactly_once() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(MemoryMailer::new());
        let pipeline: IntakePipeline<ContactForm> =
            IntakePipeline::new(store.clone(), mailer.clone(), "ops@example.com");

        for i in 0..3 {
            let response = pipeline
                .receive(ContactSubmission {
                    name: Some(format!("User {i}")),
                    ..Default::default()
                })
                .await;
            assert_eq!(response.result, IntakeResult::Success);
            assert_eq!(response.message, "Form submitted successfully!");
        }

        let rows = store.rows();
        assert_eq!(rows.len(), 4);
        let header_count = rows.iter().filter(|r| r[0] == "Timestamp").count();
        assert_eq!(header_count, 1);
        assert_eq!(rows[0], CONTACT_HEADERS.to_vec());
        assert_eq!(mailer.sent().len(), 3);
    }

    #[tokio::test]
    async fn name_is_stored_unmodified_in_second_column() {
        let store = Arc::new(MemoryStore::new());
        let pipeline: IntakePipeline<ContactForm> =
            IntakePipeline::new(store.clone(), Arc::new(MemoryMailer::new()), "ops@example.com");

        pipeline
            .receive(ContactSubmission {
                name: Some("  Dr. Ana-María O'Neil  ".into()),
                ..Default::default()
            })
            .await;

        assert_eq!(store.rows()[1][1], "  Dr. Ana-María O'Neil  ");
    }

    #[tokio::test]
    async fn high_priority_marker_follows_role() {
        for (role, expected) in [("mortgage-broker", true), ("financial-planner", false)] {
            let mailer = Arc::new(MemoryMailer::new());
            let pipeline = partner_pipeline(Arc::new(MemoryStore::new()), mailer.clone());

            pipeline
                .receive(PartnerSubmission {
                    name: Some("Test Broker".into()),
                    role: Some(role.into()),
                    ..Default::default()
                })
                .await;

            let sent = mailer.sent();
            assert_eq!(sent[0].body.contains(HIGH_PRIORITY_FLAG), expected, "role {role}");
        }
    }

    #[tokio::test]
    async fn append_failure_returns_error_and_sends_no_mail() {
        let mailer = Arc::new(MemoryMailer::new());
        let pipeline = partner_pipeline(Arc::new(FailingStore), mailer.clone());

        let response = pipeline.receive(PartnerSubmission::default()).await;

        assert_eq!(response.result, IntakeResult::Error);
        assert!(response.message.contains("sheet write refused"));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn mail_failure_reports_error_but_keeps_the_row() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = partner_pipeline(store.clone(), Arc::new(FailingMailer));

        let response = pipeline
            .receive(PartnerSubmission {
                name: Some("Jane Doe".into()),
                ..Default::default()
            })
            .await;

        assert_eq!(response.result, IntakeResult::Error);
        assert!(response.message.contains("relay unreachable"));
        // No rollback: header plus the appended row remain.
        assert_eq!(store.rows().len(), 2);
    }

    #[test]
    fn response_serializes_to_the_wire_shape() {
        let response = IntakeResponse {
            result: IntakeResult::Success,
            message: "Form submitted successfully!".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "result": "success",
                "message": "Form submitted successfully!"
            })
        );

        let response = IntakeResponse {
            result: IntakeResult::Error,
            message: "store error: disk full".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap()["result"],
            "error"
        );
    }
}
