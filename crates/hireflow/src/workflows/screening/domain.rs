use serde::{Deserialize, Serialize};

/// Identifier wrapper for candidate sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Stored description of an open role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub role: String,
    pub description: String,
    pub instructions: Option<String>,
}

/// The resume currently attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeSubmission {
    pub file_name: String,
    pub raw_bytes: Vec<u8>,
    pub extracted_text: String,
}

impl ResumeSubmission {
    pub fn size_bytes(&self) -> usize {
        self.raw_bytes.len()
    }
}

/// Result of scoring a resume against a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Role the resume was scored against.
    pub role: String,
    pub score: i32,
    pub is_selected: bool,
    pub feedback: String,
    pub breakdown: Vec<ScoreContribution>,
}

/// One rule that added points to an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub rule: ScoreRule,
    pub label: String,
    pub points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRule {
    Keyword,
    Length,
    Section,
    Adjustment,
}

/// Outbound channels used after a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Email,
    Interview,
}

impl NotificationChannel {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Interview => "interview",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFailure {
    pub channel: NotificationChannel,
    pub message: String,
}

/// What happened on each channel after "proceed". Channels fail independently.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ChannelFailure>,
}

impl NotificationOutcome {
    pub fn record_failure(&mut self, channel: NotificationChannel, message: impl Into<String>) {
        self.failures.push(ChannelFailure {
            channel,
            message: message.into(),
        });
    }

    pub fn failure_for(&self, channel: NotificationChannel) -> Option<&ChannelFailure> {
        self.failures.iter().find(|failure| failure.channel == channel)
    }
}

/// Position of a session in the screening flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum SessionStage {
    NoUpload,
    ResumeExtracted,
    Analyzed { selected: bool },
    Notified { selected: bool },
}

impl SessionStage {
    pub const fn label(self) -> &'static str {
        match self {
            SessionStage::NoUpload => "no_upload",
            SessionStage::ResumeExtracted => "resume_extracted",
            SessionStage::Analyzed { selected: true } => "selected",
            SessionStage::Analyzed { selected: false } => "rejected",
            SessionStage::Notified { .. } => "notified",
        }
    }
}
