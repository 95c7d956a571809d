use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use placement_cell::analysis::AnalysisService;
use placement_cell::applications::{ApplicationsService, InMemoryApplicationsRepository};
use placement_cell::community::{CommunityService, InMemoryCommunityRepository};
use placement_cell::config::AuthConfig;
use placement_cell::directory::{
    DirectoryService, InMemoryDirectoryRepository, MailError, MailGateway, OutboundMail,
};
use placement_cell::notify::{InMemoryNotifyRepository, NotifyService};
use placement_cell::records::{InMemoryRecordsRepository, RecordsService};
use placement_cell::recruiting::{InMemoryRecruitingRepository, RecruitingService};
use placement_cell::schedule::RestrictionScheduler;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Console transport: registration credentials are logged, not mailed.
pub(crate) struct LoggingMailGateway;

impl MailGateway for LoggingMailGateway {
    fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "outbound mail");
        Ok(())
    }
}

pub(crate) type ApiDirectoryService =
    DirectoryService<InMemoryDirectoryRepository, LoggingMailGateway>;
pub(crate) type ApiRecordsService = RecordsService<InMemoryRecordsRepository>;
pub(crate) type ApiNotifyService = NotifyService<InMemoryNotifyRepository>;
pub(crate) type ApiRecruitingService = RecruitingService<InMemoryRecruitingRepository>;
pub(crate) type ApiApplicationsService = ApplicationsService<InMemoryApplicationsRepository>;
pub(crate) type ApiCommunityService = CommunityService<InMemoryCommunityRepository>;

/// Every module service wired over the shared in-memory stores, plus the
/// scheduler that lifts community restrictions.
pub(crate) struct PlacementServices {
    pub(crate) directory: Arc<ApiDirectoryService>,
    pub(crate) records: Arc<ApiRecordsService>,
    pub(crate) notices: Arc<ApiNotifyService>,
    pub(crate) recruiting: Arc<ApiRecruitingService>,
    pub(crate) applications: Arc<ApiApplicationsService>,
    pub(crate) community: Arc<ApiCommunityService>,
    pub(crate) analysis: Arc<AnalysisService>,
    pub(crate) scheduler: Arc<RestrictionScheduler>,
}

pub(crate) fn build_services(auth: &AuthConfig) -> PlacementServices {
    let directory_store = Arc::new(InMemoryDirectoryRepository::default());
    let records_store = Arc::new(InMemoryRecordsRepository::default());
    let notify_store = Arc::new(InMemoryNotifyRepository::default());
    let recruiting_store = Arc::new(InMemoryRecruitingRepository::default());

    let scheduler = Arc::new(RestrictionScheduler::new(directory_store.clone()));
    let directory = Arc::new(DirectoryService::new(
        directory_store.clone(),
        Arc::new(LoggingMailGateway),
        scheduler.clone(),
        auth,
    ));
    let records = Arc::new(RecordsService::new(records_store.clone()));
    let notices = Arc::new(NotifyService::new(notify_store.clone()));
    let recruiting = Arc::new(RecruitingService::new(
        recruiting_store.clone(),
        directory_store.clone(),
        records_store.clone(),
        notify_store,
    ));
    let applications = Arc::new(ApplicationsService::new(
        Arc::new(InMemoryApplicationsRepository::default()),
        recruiting.clone(),
        directory_store.clone(),
        records_store,
    ));
    let community = Arc::new(CommunityService::new(
        Arc::new(InMemoryCommunityRepository::default()),
        directory_store.clone(),
    ));
    let analysis = Arc::new(AnalysisService::new(recruiting_store, directory_store));

    PlacementServices {
        directory,
        records,
        notices,
        recruiting,
        applications,
        community,
        analysis,
        scheduler,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
