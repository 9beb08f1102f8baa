mod smtp;
mod zoom;

pub use smtp::SmtpMailTransport;
pub use zoom::ZoomScheduler;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{NotificationChannel, NotificationOutcome};
use super::email::generate_email;
use super::settings::{EmailCredentials, RecruiterSettings, ZoomCredentials};

const FALLBACK_COMPANY_NAME: &str = "Our Company";
pub const INTERVIEW_DURATION_MINUTES: u32 = 60;

/// Fully rendered message handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewRequest {
    pub candidate_email: String,
    pub role: String,
    pub company_name: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
}

impl InterviewRequest {
    pub fn topic(&self) -> String {
        format!("{} Interview - {}", self.role, self.company_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("message could not be built: {0}")]
    Message(String),
    #[error("mail relay rejected the message: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("scheduling request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("scheduling service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("scheduling service did not return a join link")]
    MissingJoinUrl,
}

/// Outbound mail hook (SMTP in production, recorders in tests).
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(
        &self,
        credentials: &EmailCredentials,
        email: &OutboundEmail,
    ) -> Result<(), MailError>;
}

/// Books a meeting and returns a URL the candidate can join.
#[async_trait]
pub trait InterviewScheduler: Send + Sync {
    async fn schedule(
        &self,
        credentials: &ZoomCredentials,
        request: &InterviewRequest,
    ) -> Result<String, SchedulingError>;
}

/// Formats and sends candidate notifications. Each channel is attempted once
/// and reports on its own; one failing never skips the other.
#[derive(Clone)]
pub struct NotificationDispatcher {
    mail: Arc<dyn MailTransport>,
    scheduler: Arc<dyn InterviewScheduler>,
}

impl NotificationDispatcher {
    pub fn new(mail: Arc<dyn MailTransport>, scheduler: Arc<dyn InterviewScheduler>) -> Self {
        Self { mail, scheduler }
    }

    /// Selected candidates get the selection email and an interview;
    /// rejected candidates get the rejection email only.
    pub async fn dispatch(
        &self,
        settings: &RecruiterSettings,
        candidate_email: &str,
        role: &str,
        is_selected: bool,
        now: DateTime<Utc>,
    ) -> NotificationOutcome {
        let company_name = match settings.company_name.trim() {
            "" => FALLBACK_COMPANY_NAME,
            name => name,
        };
        let mut outcome = NotificationOutcome::default();

        if settings.email.is_complete() {
            let content = generate_email(is_selected, candidate_email, company_name, role);
            let email = OutboundEmail {
                to: candidate_email.to_string(),
                subject: content.subject,
                body: content.body,
            };
            match self.mail.send(&settings.email, &email).await {
                Ok(()) => {
                    info!(%role, selected = is_selected, "candidate email sent");
                    outcome.email_sent = true;
                }
                Err(err) => {
                    warn!(%role, error = %err, "candidate email failed");
                    outcome.record_failure(NotificationChannel::Email, err.to_string());
                }
            }
        } else {
            outcome.record_failure(
                NotificationChannel::Email,
                "email settings are not configured",
            );
        }

        if !is_selected {
            return outcome;
        }

        if settings.zoom.is_complete() {
            let request = InterviewRequest {
                candidate_email: candidate_email.to_string(),
                role: role.to_string(),
                company_name: company_name.to_string(),
                start_time: next_interview_slot(now),
                duration_minutes: INTERVIEW_DURATION_MINUTES,
            };
            match self.scheduler.schedule(&settings.zoom, &request).await {
                Ok(link) => {
                    info!(%role, start = %request.start_time, "interview scheduled");
                    outcome.interview_link = Some(link);
                }
                Err(err) => {
                    warn!(%role, error = %err, "interview scheduling failed");
                    outcome.record_failure(NotificationChannel::Interview, err.to_string());
                }
            }
        } else {
            outcome.record_failure(
                NotificationChannel::Interview,
                "scheduling settings are not configured",
            );
        }

        outcome
    }
}

/// 10:00 UTC on the day after `now`.
pub fn next_interview_slot(now: DateTime<Utc>) -> DateTime<Utc> {
    let slot_time = NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default();
    (now.date_naive() + Duration::days(1))
        .and_time(slot_time)
        .and_utc()
}
