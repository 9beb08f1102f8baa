use serde::{Deserialize, Serialize};

use super::domain::{
    AnalysisResult, NotificationOutcome, ResumeSubmission, SessionId, SessionStage,
};
use super::settings::{RecruiterSettings, SettingsView};

/// Everything one candidate application carries between requests. Handlers
/// receive it explicitly; nothing about a session lives anywhere else.
#[derive(Debug, Clone)]
pub struct ApplicationSession {
    pub id: SessionId,
    pub settings: RecruiterSettings,
    pub role: Option<String>,
    pub candidate_email: String,
    pub resume: Option<ResumeSubmission>,
    pub analysis: Option<AnalysisResult>,
    pub notification: Option<NotificationOutcome>,
}

/// How much a reset discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetScope {
    /// "New Application": candidate data only.
    #[default]
    Application,
    /// "Reset Application": candidate data, selected role and credentials.
    Full,
}

impl ApplicationSession {
    pub fn new(id: SessionId, settings: RecruiterSettings) -> Self {
        Self {
            id,
            settings,
            role: None,
            candidate_email: String::new(),
            resume: None,
            analysis: None,
            notification: None,
        }
    }

    pub fn stage(&self) -> SessionStage {
        match (&self.resume, &self.analysis, &self.notification) {
            (None, _, _) => SessionStage::NoUpload,
            (Some(_), None, _) => SessionStage::ResumeExtracted,
            (Some(_), Some(analysis), None) => SessionStage::Analyzed {
                selected: analysis.is_selected,
            },
            (Some(_), Some(analysis), Some(_)) => SessionStage::Notified {
                selected: analysis.is_selected,
            },
        }
    }

    /// Drops the current upload and everything derived from it.
    pub fn clear_upload(&mut self) {
        self.resume = None;
        self.analysis = None;
        self.notification = None;
    }

    pub fn reset(&mut self, scope: ResetScope) {
        self.clear_upload();
        self.candidate_email.clear();
        if scope == ResetScope::Full {
            self.role = None;
            self.settings.clear_credentials();
        }
    }

    pub fn view(&self) -> SessionView {
        let stage = self.stage();
        SessionView {
            session_id: self.id.clone(),
            stage,
            stage_label: stage.label(),
            role: self.role.clone(),
            candidate_email: self.candidate_email.clone(),
            resume: self.resume.as_ref().map(|resume| ResumeSummary {
                file_name: resume.file_name.clone(),
                size_bytes: resume.size_bytes(),
                extracted_chars: resume.extracted_text.chars().count(),
            }),
            analysis: self.analysis.clone(),
            notification: self.notification.clone(),
            settings: self.settings.view(),
        }
    }
}

/// Storage abstraction for sessions so the service can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: ApplicationSession) -> Result<ApplicationSession, SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<ApplicationSession>, SessionStoreError>;
    fn save(&self, session: ApplicationSession) -> Result<(), SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeSummary {
    pub file_name: String,
    pub size_bytes: usize,
    pub extracted_chars: usize,
}

/// Session state as returned to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub stage: SessionStage,
    pub stage_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub candidate_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationOutcome>,
    pub settings: SettingsView,
}
