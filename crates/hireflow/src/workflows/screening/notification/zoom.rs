use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{InterviewRequest, InterviewScheduler, SchedulingError};
use crate::workflows::screening::settings::ZoomCredentials;

const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Zoom meeting type for a one-off scheduled meeting.
const SCHEDULED_MEETING: u8 = 2;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct MeetingRequest<'a> {
    topic: String,
    #[serde(rename = "type")]
    meeting_type: u8,
    start_time: String,
    duration: u32,
    timezone: &'a str,
    agenda: String,
    settings: MeetingSettings,
}

#[derive(Debug, Serialize)]
struct MeetingSettings {
    join_before_host: bool,
    waiting_room: bool,
}

#[derive(Debug, Deserialize)]
struct MeetingResponse {
    join_url: Option<String>,
}

/// Server-to-server OAuth client for the Zoom meetings API.
#[derive(Debug, Clone)]
pub struct ZoomScheduler {
    client: Client,
    oauth_url: String,
    api_base: String,
}

impl ZoomScheduler {
    pub fn new(
        oauth_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, SchedulingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            oauth_url: oauth_url.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    async fn access_token(&self, credentials: &ZoomCredentials) -> Result<String, SchedulingError> {
        let response = self
            .client
            .post(&self.oauth_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", credentials.account_id.as_str()),
            ])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl InterviewScheduler for ZoomScheduler {
    async fn schedule(
        &self,
        credentials: &ZoomCredentials,
        request: &InterviewRequest,
    ) -> Result<String, SchedulingError> {
        let token = self.access_token(credentials).await?;
        debug!(role = %request.role, "zoom access token acquired");

        let body = MeetingRequest {
            topic: request.topic(),
            meeting_type: SCHEDULED_MEETING,
            start_time: request.start_time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            duration: request.duration_minutes,
            timezone: "UTC",
            agenda: format!(
                "Interview with {} for the {} position at {}",
                request.candidate_email, request.role, request.company_name
            ),
            settings: MeetingSettings {
                join_before_host: false,
                waiting_room: true,
            },
        };

        let response = self
            .client
            .post(format!("{}/users/me/meetings", self.api_base))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let meeting: MeetingResponse = response.json().await?;
        meeting
            .join_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(SchedulingError::MissingJoinUrl)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SchedulingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(SchedulingError::Api {
        status: status.as_u16(),
        message,
    })
}
