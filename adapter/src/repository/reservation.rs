use crate::database::{model::reservation::ReservationRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::ReservationId,
    reservation::{
        criteria::{ReservationFilter, ReservationOrder, SortDirection, SortKey},
        event::{CreateReservation, UpdateReservationStatus},
        Reservation, ReservationStatus,
    },
};
use kernel::repository::reservation::ReservationRepository;
use kernel::service::conflict::overlap_conflict;
use shared::error::{AppError, AppResult};

const SELECT_RESERVATIONS: &str = r#"
    SELECT
    reservation_id,
    requester_name,
    requester_email,
    area,
    reservation_date,
    start_time,
    end_time,
    status,
    created_at,
    confirmed_at,
    rejected_at
    FROM reservations
"#;

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    #[tracing::instrument(skip_all)]
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let reservation_id = ReservationId::new();
        let rows = insert_reservation(self.db.inner_ref(), reservation_id, &event)
            .await
            .map_err(AppError::StoreUnavailable)?;

        if rows < 1 {
            return Err(AppError::StoreUnavailable(sqlx::Error::RowNotFound));
        }

        Ok(reservation_id)
    }

    #[tracing::instrument(skip_all)]
    async fn create_exclusive(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut tx = self.db.begin().await?;

        // The overlap read and the insert run on one serializable snapshot, so
        // two concurrent submissions for the same window cannot both commit.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(AppError::StoreUnavailable)?;

        let sql = format!(
            r#"{SELECT_RESERVATIONS}
                WHERE area = $1
                  AND reservation_date = $2
                  AND status <> 'rejected'
                  AND start_time < $4
                  AND $3 < end_time
                LIMIT 1
            "#
        );
        let clash = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(event.area.name())
            .bind(event.date)
            .bind(event.start_time.to_string())
            .bind(event.end_time.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(serialization_conflict)?;
        if let Some(row) = clash {
            return Err(overlap_conflict(&Reservation::try_from(row)?));
        }

        let reservation_id = ReservationId::new();
        let rows = insert_reservation(&mut *tx, reservation_id, &event)
            .await
            .map_err(serialization_conflict)?;
        if rows < 1 {
            return Err(AppError::StoreUnavailable(sqlx::Error::RowNotFound));
        }

        tx.commit().await.map_err(serialization_conflict)?;

        Ok(reservation_id)
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<()> {
        if !event.status.is_terminal() {
            return Err(AppError::InvalidTransition {
                reservation_id: event.reservation_id.to_string(),
                current: ReservationStatus::Pending.to_string(),
                target: event.status.to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        // The status guard makes concurrent decisions on the same record
        // serialize on the row lock: only the first one still sees 'pending'.
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET
                    status = $2,
                    confirmed_at = CASE WHEN $2 = 'confirmed' THEN $3 ELSE confirmed_at END,
                    rejected_at = CASE WHEN $2 = 'rejected' THEN $3 ELSE rejected_at END
                WHERE reservation_id = $1 AND status = 'pending'
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.status.as_str())
        .bind(event.decided_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::StoreUnavailable)?;

        if res.rows_affected() < 1 {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM reservations WHERE reservation_id = $1")
                    .bind(event.reservation_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::StoreUnavailable)?;

            return Err(match current {
                None => AppError::EntityNotFound(format!("reservation {}", event.reservation_id)),
                Some(current) => AppError::InvalidTransition {
                    reservation_id: event.reservation_id.to_string(),
                    current,
                    target: event.status.to_string(),
                },
            });
        }

        tx.commit().await.map_err(AppError::StoreUnavailable)?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let sql = format!("{SELECT_RESERVATIONS} WHERE reservation_id = $1");
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(reservation_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::StoreUnavailable)?
            .map(Reservation::try_from)
            .transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn find(
        &self,
        filter: ReservationFilter,
        order: ReservationOrder,
    ) -> AppResult<Vec<Reservation>> {
        // A NULL parameter switches its predicate off.
        let sql = format!(
            r#"{SELECT_RESERVATIONS}
                WHERE ($1::text IS NULL OR area = $1)
                  AND ($2::date IS NULL OR reservation_date = $2)
                  AND ($3::text IS NULL OR start_time = $3)
                ORDER BY {}
            "#,
            order_by(order)
        );

        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(filter.area.map(|a| a.name()))
            .bind(filter.date)
            .bind(filter.start_time.map(|t| t.to_string()))
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::StoreUnavailable)?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }
}

async fn insert_reservation<'e, E>(
    executor: E,
    reservation_id: ReservationId,
    event: &CreateReservation,
) -> Result<u64, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let res = sqlx::query(
        r#"
            INSERT INTO reservations
            (reservation_id, requester_name, requester_email, area,
            reservation_date, start_time, end_time, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
            ;
        "#,
    )
    .bind(reservation_id)
    .bind(&event.requester_name)
    .bind(&event.requester_email)
    .bind(event.area.name())
    .bind(event.date)
    .bind(event.start_time.to_string())
    .bind(event.end_time.to_string())
    .bind(event.created_at)
    .execute(executor)
    .await?;

    Ok(res.rows_affected())
}

// SQLSTATE 40001: a concurrent transaction claimed the same window first.
fn serialization_conflict(e: sqlx::Error) -> AppError {
    let lost_race = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "40001");
    if lost_race {
        AppError::ReservationConflict(
            "another reservation for this window was stored at the same time".into(),
        )
    } else {
        AppError::StoreUnavailable(e)
    }
}

fn order_by(order: ReservationOrder) -> &'static str {
    match (order.key, order.direction) {
        (SortKey::CreatedAt, SortDirection::Descending) => {
            "created_at DESC, reservation_id DESC"
        }
        (SortKey::CreatedAt, SortDirection::Ascending) => "created_at ASC, reservation_id ASC",
    }
}
