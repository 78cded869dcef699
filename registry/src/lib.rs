use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::mail::{gmail::GmailNotifier, log::TracingNotifier};
use adapter::repository::{
    email_log::EmailLogRepositoryImpl,
    health::HealthCheckRepositoryImpl,
    memory::{InMemoryEmailLogRepository, InMemoryHealthCheck, InMemoryReservationRepository},
    reservation::ReservationRepositoryImpl,
};
use kernel::notification::ReservationNotifier;
use kernel::repository::{
    email_log::EmailLogRepository, health::HealthCheckRepository,
    reservation::ReservationRepository,
};
use kernel::service::{
    conflict::{AllowOverlaps, ConflictCheck, RejectOverlaps},
    lifecycle::ReservationLifecycle,
    search::ReservationSearch,
};
use shared::config::{AppConfig, LifecycleConfig, MailConfig, MailTransport};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    reservation_lifecycle: Arc<ReservationLifecycle>,
    reservation_search: Arc<ReservationSearch>,
}

impl AppRegistry {
    /// PostgreSQL-backed registry.
    pub fn new(pool: ConnectionPool, app_config: &AppConfig) -> Self {
        Self::from_parts(
            Arc::new(HealthCheckRepositoryImpl::new(pool.clone())),
            Arc::new(ReservationRepositoryImpl::new(pool.clone())),
            Arc::new(EmailLogRepositoryImpl::new(pool)),
            build_notifier(&app_config.mail),
            app_config.lifecycle,
        )
    }

    /// Registry whose records live only as long as the process.
    pub fn in_memory(app_config: &AppConfig) -> Self {
        Self::from_parts(
            Arc::new(InMemoryHealthCheck),
            Arc::new(InMemoryReservationRepository::new()),
            Arc::new(InMemoryEmailLogRepository::new()),
            build_notifier(&app_config.mail),
            app_config.lifecycle,
        )
    }

    pub fn from_parts(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
        email_log_repository: Arc<dyn EmailLogRepository>,
        notifier: Arc<dyn ReservationNotifier>,
        lifecycle: LifecycleConfig,
    ) -> Self {
        let conflict_check: Arc<dyn ConflictCheck> = if lifecycle.reject_overlaps {
            Arc::new(RejectOverlaps::new(reservation_repository.clone()))
        } else {
            Arc::new(AllowOverlaps)
        };
        let reservation_lifecycle = Arc::new(ReservationLifecycle::new(
            reservation_repository.clone(),
            notifier,
            email_log_repository,
            conflict_check,
            lifecycle,
        ));
        let reservation_search =
            Arc::new(ReservationSearch::new(reservation_repository, lifecycle));
        Self {
            health_check_repository,
            reservation_lifecycle,
            reservation_search,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_lifecycle(&self) -> Arc<ReservationLifecycle> {
        self.reservation_lifecycle.clone()
    }

    pub fn reservation_search(&self) -> Arc<ReservationSearch> {
        self.reservation_search.clone()
    }
}

fn build_notifier(mail: &MailConfig) -> Arc<dyn ReservationNotifier> {
    match &mail.transport {
        MailTransport::Log => Arc::new(TracingNotifier),
        MailTransport::Gmail { access_token } => {
            Arc::new(GmailNotifier::new(access_token.clone(), mail.sender.clone()))
        }
    }
}
