#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use adapter::repository::memory::{
    InMemoryEmailLogRepository, InMemoryHealthCheck, InMemoryReservationRepository,
};
use async_trait::async_trait;
use kernel::{
    model::{
        id::ReservationId,
        reservation::{
            criteria::{ReservationFilter, ReservationOrder},
            event::{CreateReservation, UpdateReservationStatus},
            request::SubmitReservation,
            Reservation,
        },
    },
    notification::{NotificationKind, NotificationPayload, ReservationNotifier},
    repository::reservation::ReservationRepository,
    service::{lifecycle::ReservationLifecycle, search::ReservationSearch},
};
use registry::AppRegistry;
use shared::{
    config::LifecycleConfig,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone)]
pub struct SentMail {
    pub kind: NotificationKind,
    pub recipient: String,
    pub payload: NotificationPayload,
}

/// Delivers nothing; remembers every call and can be told to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMail>>,
    calls: AtomicUsize,
    failures_left: AtomicUsize,
    delay: Option<Duration>,
}

impl RecordingNotifier {
    pub fn failing(times: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(times),
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReservationNotifier for RecordingNotifier {
    async fn notify(
        &self,
        kind: NotificationKind,
        recipient: &str,
        payload: &NotificationPayload,
    ) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AppError::ExternalServiceError("mail relay refused".into()));
        }
        self.sent.lock().unwrap().push(SentMail {
            kind,
            recipient: recipient.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

/// Wraps the in-memory store and makes its writes fail or stall.
pub struct FaultyRepository {
    inner: Arc<InMemoryReservationRepository>,
    fault: Fault,
}

#[derive(Clone, Copy)]
pub enum Fault {
    Unavailable,
    Stall(Duration),
}

impl FaultyRepository {
    pub fn new(inner: Arc<InMemoryReservationRepository>, fault: Fault) -> Self {
        Self { inner, fault }
    }

    async fn fail(&self) -> AppResult<()> {
        match self.fault {
            Fault::Unavailable => Err(AppError::StoreUnavailable(sqlx::Error::PoolTimedOut)),
            Fault::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ReservationRepository for FaultyRepository {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        self.fail().await?;
        self.inner.create(event).await
    }

    async fn create_exclusive(&self, event: CreateReservation) -> AppResult<ReservationId> {
        self.fail().await?;
        self.inner.create_exclusive(event).await
    }

    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<()> {
        self.fail().await?;
        self.inner.update_status(event).await
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        self.inner.find_by_id(reservation_id).await
    }

    async fn find(
        &self,
        filter: ReservationFilter,
        order: ReservationOrder,
    ) -> AppResult<Vec<Reservation>> {
        self.inner.find(filter, order).await
    }
}

pub struct Harness {
    pub store: Arc<InMemoryReservationRepository>,
    pub email_log: Arc<InMemoryEmailLogRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub lifecycle: Arc<ReservationLifecycle>,
    pub search: Arc<ReservationSearch>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(RecordingNotifier::default(), LifecycleConfig::default(), None)
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self::build(notifier, LifecycleConfig::default(), None)
    }

    pub fn with_config(config: LifecycleConfig) -> Self {
        Self::build(RecordingNotifier::default(), config, None)
    }

    pub fn with_fault(fault: Fault, config: LifecycleConfig) -> Self {
        Self::build(RecordingNotifier::default(), config, Some(fault))
    }

    /// Fails the first notification and never retries it.
    pub fn build_without_retries() -> Self {
        let config = LifecycleConfig {
            notify_retries: 0,
            ..Default::default()
        };
        Self::build(RecordingNotifier::failing(1), config, None)
    }

    /// A second engine over the same records, with its own notifier.
    pub fn sharing_store_with(other: &Harness, notifier: RecordingNotifier) -> Self {
        Self::assemble(
            other.store.clone(),
            other.email_log.clone(),
            notifier,
            LifecycleConfig::default(),
            None,
        )
    }

    /// A second engine over the same records whose store writes fail or stall.
    pub fn faulty_view_of(other: &Harness, fault: Fault, config: LifecycleConfig) -> Self {
        Self::assemble(
            other.store.clone(),
            other.email_log.clone(),
            RecordingNotifier::default(),
            config,
            Some(fault),
        )
    }

    fn build(notifier: RecordingNotifier, config: LifecycleConfig, fault: Option<Fault>) -> Self {
        Self::assemble(
            Arc::new(InMemoryReservationRepository::new()),
            Arc::new(InMemoryEmailLogRepository::new()),
            notifier,
            config,
            fault,
        )
    }

    fn assemble(
        store: Arc<InMemoryReservationRepository>,
        email_log: Arc<InMemoryEmailLogRepository>,
        notifier: RecordingNotifier,
        config: LifecycleConfig,
        fault: Option<Fault>,
    ) -> Self {
        let notifier = Arc::new(notifier);

        let repository: Arc<dyn ReservationRepository> = match fault {
            None => store.clone(),
            Some(fault) => Arc::new(FaultyRepository::new(store.clone(), fault)),
        };
        let registry = AppRegistry::from_parts(
            Arc::new(InMemoryHealthCheck),
            repository,
            email_log.clone(),
            notifier.clone(),
            config,
        );

        Self {
            store,
            email_log,
            notifier,
            lifecycle: registry.reservation_lifecycle(),
            search: registry.reservation_search(),
        }
    }
}

pub fn request(name: &str, area: &str, start: &str, end: &str) -> SubmitReservation {
    SubmitReservation {
        requester_name: Some(name.into()),
        requester_email: Some(format!(
            "{}@example.com",
            name.split_whitespace().next().unwrap_or("someone").to_lowercase()
        )),
        area: Some(area.into()),
        date: Some("2099-06-15".into()),
        start_time: Some(start.into()),
        end_time: Some(end.into()),
    }
}
