use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::catalog::{CatalogError, CatalogRepository, JobCatalog};
use super::domain::{
    AnalysisResult, NotificationOutcome, ResumeSubmission, SessionId, SessionStage,
};
use super::evaluation::ScoringEngine;
use super::extraction::{
    extract_resume_text, preview_document, DocumentExtractor, DocumentPreview, ExtractionError,
};
use super::notification::NotificationDispatcher;
use super::session::{
    ApplicationSession, ResetScope, SessionRepository, SessionStoreError, SessionView,
};
use super::settings::{RecruiterSettings, SettingsPatch};
use crate::config::SessionDefaults;

/// Candidate details entered next to the upload form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Service sequencing extraction, scoring and notification for each session.
pub struct ScreeningService<C, S> {
    catalog: JobCatalog<C>,
    sessions: Arc<S>,
    extractor: Arc<dyn DocumentExtractor>,
    engine: ScoringEngine,
    dispatcher: NotificationDispatcher,
    defaults: SessionDefaults,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("sess-{id:06}"))
}

impl<C, S> ScreeningService<C, S>
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    pub fn new(
        catalog: Arc<C>,
        sessions: Arc<S>,
        extractor: Arc<dyn DocumentExtractor>,
        engine: ScoringEngine,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            catalog: JobCatalog::new(catalog),
            sessions,
            extractor,
            engine,
            dispatcher,
            defaults: SessionDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: SessionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn catalog(&self) -> &JobCatalog<C> {
        &self.catalog
    }

    pub fn create_session(&self) -> Result<SessionView, ScreeningError> {
        let settings = RecruiterSettings::with_company_name(self.defaults.company_name.clone());
        let session = ApplicationSession::new(next_session_id(), settings);
        let stored = self.sessions.insert(session)?;
        info!(session = %stored.id.0, "session opened");
        Ok(stored.view())
    }

    pub fn session(&self, id: &SessionId) -> Result<ApplicationSession, ScreeningError> {
        self.sessions
            .fetch(id)?
            .ok_or_else(|| ScreeningError::SessionNotFound(id.0.clone()))
    }

    pub fn view(&self, id: &SessionId) -> Result<SessionView, ScreeningError> {
        Ok(self.session(id)?.view())
    }

    pub fn update_settings(
        &self,
        id: &SessionId,
        patch: SettingsPatch,
    ) -> Result<SessionView, ScreeningError> {
        let mut session = self.session(id)?;
        session.settings.apply(patch);
        self.sessions.save(session.clone())?;
        Ok(session.view())
    }

    /// Records the candidate email and the role applied for. The role must be
    /// in the catalog. An existing analysis is kept as is.
    pub fn set_candidate(
        &self,
        id: &SessionId,
        update: CandidateUpdate,
    ) -> Result<SessionView, ScreeningError> {
        let mut session = self.session(id)?;

        if let Some(role) = update.role {
            let requirement = self.catalog.get_requirement(role.trim())?;
            session.role = Some(requirement.role);
        }
        if let Some(email) = update.email {
            session.candidate_email = email.trim().to_string();
        }

        self.sessions.save(session.clone())?;
        Ok(session.view())
    }

    /// Replaces the session's resume. Downstream results are cleared first, so
    /// a failed extraction leaves the session with no upload at all.
    pub fn upload_resume(
        &self,
        id: &SessionId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<SessionView, ScreeningError> {
        let mut session = self.session(id)?;
        ensure_configured(&session.settings)?;

        session.clear_upload();
        match extract_resume_text(self.extractor.as_ref(), file_name, &bytes) {
            Ok(extracted_text) => {
                info!(
                    session = %session.id.0,
                    file = %file_name,
                    chars = extracted_text.chars().count(),
                    "resume processed"
                );
                session.resume = Some(ResumeSubmission {
                    file_name: file_name.to_string(),
                    raw_bytes: bytes,
                    extracted_text,
                });
                self.sessions.save(session.clone())?;
                Ok(session.view())
            }
            Err(err) => {
                warn!(session = %session.id.0, file = %file_name, error = %err, "resume extraction failed");
                self.sessions.save(session)?;
                Err(err.into())
            }
        }
    }

    pub fn resume_document(&self, id: &SessionId) -> Result<ResumeSubmission, ScreeningError> {
        let session = self.session(id)?;
        let stage = session.stage();
        session
            .resume
            .ok_or(ScreeningError::InvalidTransition {
                action: "download the resume",
                stage: stage.label(),
            })
    }

    pub fn preview_resume(&self, id: &SessionId) -> Result<DocumentPreview, ScreeningError> {
        let resume = self.resume_document(id)?;
        let preview = preview_document(
            self.extractor.as_ref(),
            &resume.file_name,
            &resume.raw_bytes,
        )?;
        Ok(preview)
    }

    /// Scores the extracted resume for the selected role.
    pub fn analyze(&self, id: &SessionId) -> Result<SessionView, ScreeningError> {
        let mut session = self.session(id)?;
        ensure_configured(&session.settings)?;

        let stage = session.stage();
        if stage != SessionStage::ResumeExtracted {
            return Err(ScreeningError::InvalidTransition {
                action: "analyze the resume",
                stage: stage.label(),
            });
        }
        if session.candidate_email.is_empty() {
            return Err(ScreeningError::Validation(
                "candidate email address is required".to_string(),
            ));
        }
        let role = session.role.clone().ok_or_else(|| {
            ScreeningError::Validation("select the role being applied for".to_string())
        })?;
        let requirement = self.catalog.get_requirement(&role)?;
        let resume_text = session
            .resume
            .as_ref()
            .map(|resume| resume.extracted_text.as_str())
            .unwrap_or_default();

        let result = self.engine.analyze(resume_text, &requirement, &role);
        info!(
            session = %session.id.0,
            %role,
            score = result.score,
            selected = result.is_selected,
            "resume analyzed"
        );

        session.analysis = Some(result);
        self.sessions.save(session.clone())?;
        Ok(session.view())
    }

    /// Sends the selection email and books the interview. Only reachable for
    /// a selected candidate; calling it again after notification retries both
    /// channels.
    pub async fn proceed_to_interview(
        &self,
        id: &SessionId,
    ) -> Result<NotificationOutcome, ScreeningError> {
        self.notify(id, true, "proceed to interview").await
    }

    /// Sends the rejection email to a rejected candidate.
    pub async fn send_rejection_notice(
        &self,
        id: &SessionId,
    ) -> Result<NotificationOutcome, ScreeningError> {
        self.notify(id, false, "send a rejection notice").await
    }

    pub fn reset(&self, id: &SessionId, scope: ResetScope) -> Result<SessionView, ScreeningError> {
        let mut session = self.session(id)?;
        session.reset(scope);
        self.sessions.save(session.clone())?;
        info!(session = %session.id.0, ?scope, "session reset");
        Ok(session.view())
    }

    /// Scores arbitrary text for a catalog role, outside any session.
    pub fn analyze_text(
        &self,
        resume_text: &str,
        role: &str,
    ) -> Result<AnalysisResult, ScreeningError> {
        let requirement = self.catalog.get_requirement(role.trim())?;
        Ok(self.engine.analyze(resume_text, &requirement, &requirement.role))
    }

    async fn notify(
        &self,
        id: &SessionId,
        selected: bool,
        action: &'static str,
    ) -> Result<NotificationOutcome, ScreeningError> {
        let session = self.session(id)?;
        ensure_configured(&session.settings)?;

        let stage = session.stage();
        let analysis = match session.analysis {
            Some(analysis) if stage_allows_notice(stage, selected) => analysis,
            _ => {
                return Err(ScreeningError::InvalidTransition {
                    action,
                    stage: stage.label(),
                })
            }
        };

        debug!(session = %id.0, role = %analysis.role, selected, "dispatching notifications");
        let outcome = self
            .dispatcher
            .dispatch(
                &session.settings,
                &session.candidate_email,
                &analysis.role,
                selected,
                Utc::now(),
            )
            .await;

        // The session may have been reset or re-scored while the channels
        // were awaited; only the analysis that was dispatched takes the outcome.
        let mut current = self.session(id)?;
        if current.analysis.as_ref() != Some(&analysis) {
            warn!(session = %id.0, "session changed during notification, outcome not recorded");
            return Ok(outcome);
        }
        current.notification = Some(outcome.clone());
        self.sessions.save(current)?;
        Ok(outcome)
    }
}

fn stage_allows_notice(stage: SessionStage, selected: bool) -> bool {
    matches!(
        stage,
        SessionStage::Analyzed { selected: s } | SessionStage::Notified { selected: s } if s == selected
    )
}

fn ensure_configured(settings: &RecruiterSettings) -> Result<(), ScreeningError> {
    let missing = settings.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ScreeningError::ConfigurationIncomplete { missing })
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error("please configure the following settings: {}", .missing.join(", "))]
    ConfigurationIncomplete { missing: Vec<&'static str> },
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("{0}")]
    Validation(String),
    #[error("cannot {action} while the application is '{stage}'")]
    InvalidTransition {
        action: &'static str,
        stage: &'static str,
    },
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Sessions(#[from] SessionStoreError),
}
