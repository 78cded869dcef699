use crate::{
    model::reservation::{criteria::SearchCriteria, Reservation},
    repository::reservation::ReservationRepository,
    service::bounded,
};
use derive_new::new;
use shared::{config::LifecycleConfig, error::AppResult};
use std::sync::Arc;

#[derive(new)]
pub struct ReservationSearch {
    repository: Arc<dyn ReservationRepository>,
    config: LifecycleConfig,
}

impl ReservationSearch {
    /// Exact-match criteria go to the store; the name is matched afterwards,
    /// case-insensitively, on what the store returned. Newest first.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, criteria: &SearchCriteria) -> AppResult<Vec<Reservation>> {
        let plan = criteria.plan()?;

        let rows = bounded(
            "store query",
            self.config.store_timeout,
            self.repository.find(plan.filter, plan.order),
        )
        .await?;

        let items: Vec<Reservation> = match plan.residual {
            None => rows,
            Some(name) => rows.into_iter().filter(|r| name.matches(r)).collect(),
        };
        tracing::debug!(hits = items.len(), "reservation search");
        Ok(items)
    }
}
