use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::workflows::screening::{
    ApplicationSession, JobCatalog, JsonFileCatalog, NotificationDispatcher, PdfTextExtractor,
    ScoringEngine, ScreeningService, SessionId, SessionRepository, SessionStoreError,
    SmtpMailTransport, ZoomScheduler,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) type Service = ScreeningService<JsonFileCatalog, InMemorySessionRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Sessions live for the lifetime of the process only.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, ApplicationSession>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: ApplicationSession) -> Result<ApplicationSession, SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ApplicationSession>, SessionStoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save(&self, session: ApplicationSession) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.id) {
            guard.insert(session.id.clone(), session);
            Ok(())
        } else {
            Err(SessionStoreError::NotFound)
        }
    }
}

pub(crate) fn open_catalog(
    config: &AppConfig,
    override_path: Option<PathBuf>,
) -> Result<Arc<JsonFileCatalog>, AppError> {
    let path = override_path.unwrap_or_else(|| config.catalog.path.clone());
    Ok(Arc::new(JsonFileCatalog::open(path)?))
}

pub(crate) fn catalog_facade(
    config: &AppConfig,
    override_path: Option<PathBuf>,
) -> Result<JobCatalog<JsonFileCatalog>, AppError> {
    Ok(JobCatalog::new(open_catalog(config, override_path)?))
}

pub(crate) fn build_screening_service(config: &AppConfig) -> Result<Service, AppError> {
    let catalog = open_catalog(config, None)?;
    let mail = SmtpMailTransport::new(
        config.notification.smtp_host.clone(),
        config.notification.smtp_port,
    );
    let scheduler = ZoomScheduler::new(
        config.notification.zoom_oauth_url.clone(),
        config.notification.zoom_api_base.clone(),
    )?;

    let service = ScreeningService::new(
        catalog,
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(PdfTextExtractor),
        ScoringEngine::default(),
        NotificationDispatcher::new(Arc::new(mail), Arc::new(scheduler)),
    )
    .with_defaults(config.session_defaults.clone());
    Ok(service)
}
