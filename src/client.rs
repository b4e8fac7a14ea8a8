use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::warn;

pub const SENDING_LABEL: &str = "Sending...";
pub const ACK_HEADING: &str = "Thank you!";
pub const ACK_DETAIL: &str =
    "We've received your submission and will be in touch within 24 hours.";
pub const ERROR_NOTICE: &str = "Something went wrong. Please try again.";

/// How long the degraded cross-origin mode pretends to wait before claiming
/// success.
pub const OPTIMISTIC_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Transport-level ok. Terminal: the form is replaced by the
    /// acknowledgment view and cannot be submitted again.
    Accepted,
    /// Network failure or a non-ok response. The form stays resubmittable.
    Failed { error: String },
}

/// Posts a filled form to one configured intake endpoint. Only "ok vs not"
/// is inspected on the response; no automatic retry.
pub struct SubmissionClient {
    client: Client,
    endpoint: String,
}

impl SubmissionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        // No request timeout: a hung network call leaves the caller in the
        // sending state until the transport itself gives up.
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn submit(&self, fields: &[(String, String)]) -> SubmitOutcome {
        let result = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .form(fields)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => SubmitOutcome::Accepted,
            Ok(response) => SubmitOutcome::Failed {
                error: format!("Server responded with {}", response.status()),
            },
            Err(e) => SubmitOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    /// Degraded mode for endpoints whose responses the submitter cannot
    /// read: fire the request, wait a fixed delay, claim success. There is
    /// no error path here.
    pub async fn submit_optimistic(&self, fields: &[(String, String)]) -> SubmitOutcome {
        let request = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .form(fields);

        tokio::spawn(async move {
            if let Err(e) = request.send().await {
                warn!("optimistic submission was never confirmed: {}", e);
            }
        });

        tokio::time::sleep(OPTIMISTIC_DELAY).await;
        SubmitOutcome::Accepted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormUiState {
    Idle,
    Sending,
    Acknowledged,
}

/// The submit control and its surroundings, as the browser script manages
/// them: disable-and-relabel while sending, a terminal thank-you view on
/// success, restore-plus-notice on failure.
pub struct FormUi {
    state: FormUiState,
    original_label: String,
    submit_label: String,
    error_notice: Option<String>,
    fields: Vec<(String, String)>,
}

impl FormUi {
    pub fn new(submit_label: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        let original_label = submit_label.into();
        Self {
            state: FormUiState::Idle,
            submit_label: original_label.clone(),
            original_label,
            error_notice: None,
            fields,
        }
    }

    pub fn state(&self) -> FormUiState {
        self.state
    }

    pub fn submit_label(&self) -> &str {
        &self.submit_label
    }

    pub fn error_notice(&self) -> Option<&str> {
        self.error_notice.as_deref()
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Disable the control and show the in-progress label. The instant
    /// before this takes effect is the accepted double-submit window.
    pub fn begin_submit(&mut self) {
        if self.state == FormUiState::Acknowledged {
            return;
        }
        self.state = FormUiState::Sending;
        self.submit_label = SENDING_LABEL.to_string();
    }

    pub fn apply(&mut self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Accepted => {
                // Terminal: the form's content is replaced by the
                // acknowledgment view.
                self.state = FormUiState::Acknowledged;
            }
            SubmitOutcome::Failed { .. } => {
                self.state = FormUiState::Idle;
                self.submit_label = self.original_label.clone();
                // At most one notice, regardless of how many attempts fail.
                if self.error_notice.is_none() {
                    self.error_notice = Some(ERROR_NOTICE.to_string());
                }
            }
        }
    }
}
