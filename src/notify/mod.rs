//! Outbound email notifications
//!
//! Delivery goes through an external HTTP email relay. Notifications are
//! best effort: a failed or unconfigured send is logged and never fails the
//! operation that triggered it.

use std::time::Duration;

use anyhow::Context;
use serde_json::json;

use crate::cases::Case;
use crate::submissions::Submission;

/// Email notification sender
#[derive(Clone)]
pub struct NotificationService {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl NotificationService {
    pub fn new(
        endpoint: Option<String>,
        api_key: Option<String>,
        timeout_seconds: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint,
            api_key,
        }
    }

    /// Notify a case owner that their case was opened
    pub async fn case_created(&self, to: &str, case: &Case) {
        let subject = format!("Case {} opened", case.case_number);
        let message = format!(
            "Your recovery case {} ({}) has been opened and is pending review.",
            case.case_number, case.title
        );
        self.deliver(to, &subject, &message).await;
    }

    /// Notify a case owner that their case status changed
    pub async fn case_status_changed(&self, to: &str, case: &Case) {
        let subject = format!("Case {} updated", case.case_number);
        let message = format!(
            "Your recovery case {} is now {}.",
            case.case_number,
            case.status.as_str()
        );
        self.deliver(to, &subject, &message).await;
    }

    /// Notify a requester that their submission was triaged
    pub async fn submission_updated(&self, submission: &Submission) {
        let subject = "Your recovery request was updated".to_string();
        let message = format!(
            "Hello {}, the status of your recovery request is now {:?}.",
            submission.requester_name, submission.status
        );
        self.deliver(&submission.requester_email, &subject, &message)
            .await;
    }

    async fn deliver(&self, to: &str, subject: &str, message: &str) {
        match self.send(to, subject, message).await {
            Ok(()) => {
                tracing::debug!(to = %to, subject = %subject, "Notification sent");
            }
            Err(e) => {
                tracing::warn!(to = %to, subject = %subject, error = %e, "Notification failed");
            }
        }
    }

    async fn send(&self, to: &str, subject: &str, message: &str) -> anyhow::Result<()> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            tracing::debug!("Notification endpoint not configured, skipping send");
            return Ok(());
        };

        let mut request = self.client.post(endpoint).json(&json!({
            "to": to,
            "subject": subject,
            "message": message,
        }));

        if let Some(key) = self.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("notification relay unreachable")?;

        if !response.status().is_success() {
            anyhow::bail!("notification relay returned {}", response.status());
        }

        Ok(())
    }
}
