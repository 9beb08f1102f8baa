//! Resume screening: job catalog, PDF intake, keyword scoring and candidate
//! notification, sequenced per application session.

pub mod catalog;
pub mod domain;
pub mod email;
pub(crate) mod evaluation;
pub mod extraction;
pub mod notification;
pub mod router;
pub mod service;
pub mod session;
pub mod settings;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, CatalogRepository, JobCatalog, JsonFileCatalog};
pub use domain::{
    AnalysisResult, ChannelFailure, JobRequirement, NotificationChannel, NotificationOutcome,
    ResumeSubmission, ScoreContribution, ScoreRule, SessionId, SessionStage,
};
pub use email::{generate_email, EmailContent};
pub use evaluation::{
    resume_seed, score_bounds, AdjustmentSource, ScoringEngine, SeededAdjustment,
    ADJUSTMENT_MAX, ADJUSTMENT_MIN, NOMINAL_MAX_SCORE, SELECTION_THRESHOLD,
};
pub use extraction::{DocumentExtractor, DocumentPreview, ExtractionError, PdfTextExtractor};
pub use notification::{
    InterviewRequest, InterviewScheduler, MailError, MailTransport, NotificationDispatcher,
    OutboundEmail, SchedulingError, SmtpMailTransport, ZoomScheduler,
};
pub use router::screening_router;
pub use service::{CandidateUpdate, ScreeningError, ScreeningService};
pub use session::{
    ApplicationSession, ResetScope, SessionRepository, SessionStoreError, SessionView,
};
pub use settings::{
    EmailCredentials, ModelProvider, RecruiterSettings, SettingsPatch, ZoomCredentials,
};
