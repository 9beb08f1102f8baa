use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::screening::catalog::{CatalogError, CatalogRepository};
use crate::workflows::screening::domain::{JobRequirement, SessionId};
use crate::workflows::screening::evaluation::{AdjustmentSource, ScoringEngine};
use crate::workflows::screening::extraction::{
    DocumentExtractor, ExtractionError, PdfTextExtractor,
};
use crate::workflows::screening::notification::{
    InterviewRequest, InterviewScheduler, MailError, MailTransport, NotificationDispatcher,
    OutboundEmail, SchedulingError,
};
use crate::workflows::screening::service::{CandidateUpdate, ScreeningService};
use crate::workflows::screening::session::{
    ApplicationSession, SessionRepository, SessionStoreError,
};
use crate::workflows::screening::settings::{
    EmailCredentials, SettingsPatch, ZoomCredentials,
};

pub(super) const ROLE: &str = "Data Scientist";
pub(super) const CANDIDATE: &str = "ada@example.com";
pub(super) const MEETING_LINK: &str = "https://zoom.us/j/123456789";

pub(super) const STRONG_RESUME: &str = "Senior Python engineer. Experience: machine learning \
and data pipelines on AWS with Docker and Kubernetes. Education: Master of Science. \
Skills: SQL, GitHub portfolio.";
pub(super) const WEAK_RESUME: &str = "Hello there.";

const PDF_HEADER: &[u8] = b"%PDF-1.4\n";

pub(super) fn pdf_bytes(text: &str) -> Vec<u8> {
    let mut bytes = PDF_HEADER.to_vec();
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// Well-formed single-page PDF drawing `text` in Helvetica. `media_box` is
/// spliced into the page dictionary; pass "" for a page without one.
pub(crate) fn single_page_pdf(media_box: &str, text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 712 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R {media_box} \
/Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
        ),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", index + 1).as_bytes());
    }

    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

pub(crate) const PAGE_MEDIA_BOX: &str = "/MediaBox [0 0 612 792]";

pub(super) fn complete_settings() -> SettingsPatch {
    SettingsPatch {
        model_provider: None,
        api_key: Some("sk-test".to_string()),
        zoom_account_id: Some("acct-1".to_string()),
        zoom_client_id: Some("client-1".to_string()),
        zoom_client_secret: Some("zoom-secret".to_string()),
        email_sender: Some("hr@acme.test".to_string()),
        email_app_password: Some("app-pass".to_string()),
        company_name: Some("Acme".to_string()),
    }
}

pub(super) fn candidate() -> CandidateUpdate {
    CandidateUpdate {
        email: Some(CANDIDATE.to_string()),
        role: Some(ROLE.to_string()),
    }
}

/// Everything the service was built from, kept so tests can inspect it.
pub(super) struct Harness {
    pub(super) service: ScreeningService<MemoryCatalog, MemorySessions>,
    pub(super) sessions: Arc<MemorySessions>,
    pub(super) mail: Arc<RecordingMail>,
    pub(super) scheduler: Arc<StaticScheduler>,
}

pub(super) fn build_service() -> Harness {
    build_service_with(RecordingMail::default(), StaticScheduler::default())
}

pub(super) fn build_service_with(mail: RecordingMail, scheduler: StaticScheduler) -> Harness {
    assemble(mail, scheduler, Arc::new(StubExtractor))
}

/// Same wiring as [`build_service`] but reading uploads with `pdf-extract`.
pub(super) fn build_pdf_service() -> Harness {
    assemble(
        RecordingMail::default(),
        StaticScheduler::default(),
        Arc::new(PdfTextExtractor),
    )
}

fn assemble(
    mail: RecordingMail,
    scheduler: StaticScheduler,
    extractor: Arc<dyn DocumentExtractor>,
) -> Harness {
    let catalog = Arc::new(MemoryCatalog::with_role(
        ROLE,
        "Build forecasting models in Python",
    ));
    let sessions = Arc::new(MemorySessions::default());
    let mail = Arc::new(mail);
    let scheduler = Arc::new(scheduler);
    let service = ScreeningService::new(
        catalog,
        sessions.clone(),
        extractor,
        ScoringEngine::new(Arc::new(FixedAdjustment(0))),
        NotificationDispatcher::new(mail.clone(), scheduler.clone()),
    );
    Harness {
        service,
        sessions,
        mail,
        scheduler,
    }
}

/// Opens a session with complete settings and a candidate for `ROLE`.
pub(super) fn ready_session(harness: &Harness) -> SessionId {
    let view = harness.service.create_session().expect("session opens");
    let id = view.session_id;
    harness
        .service
        .update_settings(&id, complete_settings())
        .expect("settings saved");
    harness
        .service
        .set_candidate(&id, candidate())
        .expect("candidate saved");
    id
}

pub(super) fn analyzed_session(harness: &Harness, resume: &str) -> SessionId {
    let id = ready_session(harness);
    harness
        .service
        .upload_resume(&id, "resume.pdf", pdf_bytes(resume))
        .expect("upload succeeds");
    harness.service.analyze(&id).expect("analysis succeeds");
    id
}

pub(super) fn engine_with(adjustment: i32) -> ScoringEngine {
    ScoringEngine::new(Arc::new(FixedAdjustment(adjustment)))
}

pub(super) fn requirement() -> JobRequirement {
    JobRequirement {
        role: ROLE.to_string(),
        description: "Build forecasting models in Python".to_string(),
        instructions: None,
    }
}

pub(super) struct FixedAdjustment(pub(super) i32);

impl AdjustmentSource for FixedAdjustment {
    fn adjustment(&self, _seed: u64) -> i32 {
        self.0
    }
}

/// Reads everything after the PDF header as text.
pub(super) struct StubExtractor;

impl DocumentExtractor for StubExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let body = bytes.strip_prefix(PDF_HEADER).unwrap_or(bytes);
        Ok(String::from_utf8_lossy(body).into_owned())
    }

    fn extract_file(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|err| ExtractionError::Backend(err.to_string()))?;
        self.extract(&bytes)
    }
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    entries: Mutex<BTreeMap<String, JobRequirement>>,
}

impl MemoryCatalog {
    pub(super) fn with_role(role: &str, description: &str) -> Self {
        let catalog = Self::default();
        catalog
            .upsert(JobRequirement {
                role: role.to_string(),
                description: description.to_string(),
                instructions: None,
            })
            .expect("seed role");
        catalog
    }
}

impl CatalogRepository for MemoryCatalog {
    fn upsert(&self, requirement: JobRequirement) -> Result<(), CatalogError> {
        self.entries
            .lock()
            .expect("catalog mutex poisoned")
            .insert(requirement.role.clone(), requirement);
        Ok(())
    }

    fn fetch(&self, role: &str) -> Result<Option<JobRequirement>, CatalogError> {
        let guard = self.entries.lock().expect("catalog mutex poisoned");
        Ok(guard.get(role).cloned())
    }

    fn roles(&self) -> Result<Vec<String>, CatalogError> {
        let guard = self.entries.lock().expect("catalog mutex poisoned");
        Ok(guard.keys().cloned().collect())
    }
}

pub(super) struct UnavailableCatalog;

impl CatalogRepository for UnavailableCatalog {
    fn upsert(&self, _requirement: JobRequirement) -> Result<(), CatalogError> {
        Err(CatalogError::Unavailable("disk full".to_string()))
    }

    fn fetch(&self, _role: &str) -> Result<Option<JobRequirement>, CatalogError> {
        Err(CatalogError::Unavailable("disk full".to_string()))
    }

    fn roles(&self) -> Result<Vec<String>, CatalogError> {
        Err(CatalogError::Unavailable("disk full".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    pub(super) records: Arc<Mutex<HashMap<SessionId, ApplicationSession>>>,
}

impl MemorySessions {
    pub(super) fn get(&self, id: &SessionId) -> ApplicationSession {
        self.records
            .lock()
            .expect("session mutex poisoned")
            .get(id)
            .cloned()
            .expect("session stored")
    }
}

impl SessionRepository for MemorySessions {
    fn insert(&self, session: ApplicationSession) -> Result<ApplicationSession, SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ApplicationSession>, SessionStoreError> {
        let guard = self.records.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save(&self, session: ApplicationSession) -> Result<(), SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        guard.insert(session.id.clone(), session);
        Ok(())
    }
}

pub(super) struct UnavailableSessions;

impl SessionRepository for UnavailableSessions {
    fn insert(
        &self,
        _session: ApplicationSession,
    ) -> Result<ApplicationSession, SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<ApplicationSession>, SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }

    fn save(&self, _session: ApplicationSession) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingMail {
    sent: Mutex<Vec<OutboundEmail>>,
    failure: Option<String>,
}

impl RecordingMail {
    pub(super) fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::default(),
            failure: Some(message.to_string()),
        }
    }

    pub(super) fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mail mutex poisoned").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMail {
    async fn send(
        &self,
        _credentials: &EmailCredentials,
        email: &OutboundEmail,
    ) -> Result<(), MailError> {
        if let Some(message) = &self.failure {
            return Err(MailError::Transport(message.clone()));
        }
        self.sent
            .lock()
            .expect("mail mutex poisoned")
            .push(email.clone());
        Ok(())
    }
}

/// Lets a test act while a booking is in flight.
#[derive(Default)]
pub(super) struct SchedulerGate {
    pub(super) reached: Notify,
    pub(super) release: Notify,
}

#[derive(Default)]
pub(super) struct StaticScheduler {
    requests: Mutex<Vec<InterviewRequest>>,
    fail: bool,
    gate: Option<Arc<SchedulerGate>>,
}

impl StaticScheduler {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Signals `reached` once a booking starts, then waits for `release`.
    pub(super) fn gated() -> (Self, Arc<SchedulerGate>) {
        let gate = Arc::new(SchedulerGate::default());
        let scheduler = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (scheduler, gate)
    }

    pub(super) fn requests(&self) -> Vec<InterviewRequest> {
        self.requests
            .lock()
            .expect("scheduler mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl InterviewScheduler for StaticScheduler {
    async fn schedule(
        &self,
        _credentials: &ZoomCredentials,
        request: &InterviewRequest,
    ) -> Result<String, SchedulingError> {
        self.requests
            .lock()
            .expect("scheduler mutex poisoned")
            .push(request.clone());
        if let Some(gate) = &self.gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
        if self.fail {
            return Err(SchedulingError::Api {
                status: 401,
                message: "invalid client".to_string(),
            });
        }
        Ok(MEETING_LINK.to_string())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
