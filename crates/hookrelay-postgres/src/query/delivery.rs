//! Delivery repository for the delivery log and its state machine.
//!
//! All status transitions are guarded updates (`WHERE status = <expected>`)
//! returning `Option`: a `None` result means another component already moved
//! the delivery, and the caller must treat the transition as lost.

use std::future::Future;

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Double, Nullable};
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{Delivery, NewDelivery};
use crate::types::DeliveryStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Aggregated delivery statistics for a webhook over a time window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeliveryStatistics {
    /// Deliveries waiting for a worker.
    pub pending: i64,
    /// Deliveries acknowledged with a 2xx response.
    pub successes: i64,
    /// Deliveries whose last attempt failed, awaiting a retry decision.
    pub failed: i64,
    /// Deliveries with a scheduled retry.
    pub retrying: i64,
    /// Deliveries that exhausted their retry budget or were cancelled.
    pub dead: i64,
    /// Average latency of successful attempts in milliseconds.
    pub average_response_ms: Option<f64>,
}

impl DeliveryStatistics {
    /// Total number of deliveries in the window.
    pub fn total(&self) -> i64 {
        self.pending + self.successes + self.failed + self.retrying + self.dead
    }

    /// Success rate over finished deliveries: `successes / (successes + dead)`.
    ///
    /// Returns 0.0 when no delivery has finished yet.
    pub fn success_rate(&self) -> f64 {
        let finished = self.successes + self.dead;
        if finished == 0 {
            return 0.0;
        }
        self.successes as f64 / finished as f64
    }

    /// Folds a `(status, count)` aggregation row into the statistics.
    fn record(&mut self, status: DeliveryStatus, count: i64) {
        match status {
            DeliveryStatus::Pending => self.pending = count,
            DeliveryStatus::Success => self.successes = count,
            DeliveryStatus::Failed => self.failed = count,
            DeliveryStatus::Retrying => self.retrying = count,
            DeliveryStatus::Dead => self.dead = count,
        }
    }
}

/// Repository for delivery log database operations.
pub trait DeliveryRepository {
    /// Creates a new pending delivery.
    fn create_delivery(
        &mut self,
        new_delivery: NewDelivery,
    ) -> impl Future<Output = PgResult<Delivery>> + Send;

    /// Finds a delivery by ID.
    fn find_delivery_by_id(
        &mut self,
        delivery_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Delivery>>> + Send;

    /// Finds a delivery by ID, scoped to a webhook.
    fn find_webhook_delivery(
        &mut self,
        webhook_id: Uuid,
        delivery_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Delivery>>> + Send;

    /// Lists deliveries of a webhook, newest first.
    fn list_deliveries(
        &mut self,
        webhook_id: Uuid,
        status: Option<DeliveryStatus>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Delivery>>> + Send;

    /// Records a successful attempt: `pending → success`.
    fn record_attempt_success(
        &mut self,
        delivery_id: Uuid,
        response_code: i32,
        response_body: Option<String>,
        response_time_ms: i32,
    ) -> impl Future<Output = PgResult<Option<Delivery>>> + Send;

    /// Records a failed attempt: `pending → failed`.
    fn record_attempt_failure(
        &mut self,
        delivery_id: Uuid,
        response_code: Option<i32>,
        response_body: Option<String>,
        error_message: Option<String>,
        response_time_ms: Option<i32>,
    ) -> impl Future<Output = PgResult<Option<Delivery>>> + Send;

    /// Schedules a retry: `failed → retrying`.
    fn schedule_retry(
        &mut self,
        delivery_id: Uuid,
        next_attempt_at: Timestamp,
    ) -> impl Future<Output = PgResult<Option<Delivery>>> + Send;

    /// Terminates a delivery: `pending | failed | retrying → dead`.
    ///
    /// The `pending` source covers cancellation: a queued delivery whose
    /// webhook was paused or deleted is terminated without an attempt.
    fn mark_dead(
        &mut self,
        delivery_id: Uuid,
        reason: impl Into<String> + Send,
    ) -> impl Future<Output = PgResult<Option<Delivery>>> + Send;

    /// Requeues a due retry: `retrying → pending`.
    fn requeue_retry(
        &mut self,
        delivery_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Delivery>>> + Send;

    /// Lists deliveries whose scheduled retry is due.
    fn list_due_retries(
        &mut self,
        now: Timestamp,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<Delivery>>> + Send;

    /// Aggregates delivery statistics for a webhook since the given time.
    fn delivery_statistics(
        &mut self,
        webhook_id: Uuid,
        since: Timestamp,
    ) -> impl Future<Output = PgResult<DeliveryStatistics>> + Send;
}

impl DeliveryRepository for PgConnection {
    async fn create_delivery(&mut self, new_delivery: NewDelivery) -> PgResult<Delivery> {
        use schema::deliveries;

        let delivery = diesel::insert_into(deliveries::table)
            .values(&new_delivery)
            .returning(Delivery::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(delivery)
    }

    async fn find_delivery_by_id(&mut self, delivery_id: Uuid) -> PgResult<Option<Delivery>> {
        use schema::deliveries::dsl::*;

        let delivery = deliveries
            .filter(id.eq(delivery_id))
            .select(Delivery::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(delivery)
    }

    async fn find_webhook_delivery(
        &mut self,
        hook_id: Uuid,
        delivery_id: Uuid,
    ) -> PgResult<Option<Delivery>> {
        use schema::deliveries::dsl::*;

        let delivery = deliveries
            .filter(id.eq(delivery_id))
            .filter(webhook_id.eq(hook_id))
            .select(Delivery::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(delivery)
    }

    async fn list_deliveries(
        &mut self,
        hook_id: Uuid,
        wanted_status: Option<DeliveryStatus>,
        pagination: Pagination,
    ) -> PgResult<Vec<Delivery>> {
        use schema::deliveries::dsl::*;

        let mut query = deliveries.filter(webhook_id.eq(hook_id)).into_boxed();

        if let Some(wanted) = wanted_status {
            query = query.filter(status.eq(wanted));
        }

        let results = query
            .select(Delivery::as_select())
            .order(created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(results)
    }

    async fn record_attempt_success(
        &mut self,
        delivery_id: Uuid,
        code: i32,
        body: Option<String>,
        latency_ms: i32,
    ) -> PgResult<Option<Delivery>> {
        use schema::deliveries::dsl::*;

        let now = jiff_diesel::Timestamp::from(Timestamp::now());
        let delivery = diesel::update(deliveries)
            .filter(id.eq(delivery_id))
            .filter(status.eq(DeliveryStatus::Pending))
            .set((
                status.eq(DeliveryStatus::Success),
                response_code.eq(Some(code)),
                response_body.eq(body),
                error_message.eq(None::<String>),
                attempt_count.eq(attempt_count + 1),
                response_time_ms.eq(Some(latency_ms)),
                next_attempt_at.eq(None::<jiff_diesel::Timestamp>),
                completed_at.eq(Some(now)),
            ))
            .returning(Delivery::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(delivery)
    }

    async fn record_attempt_failure(
        &mut self,
        delivery_id: Uuid,
        code: Option<i32>,
        body: Option<String>,
        error: Option<String>,
        latency_ms: Option<i32>,
    ) -> PgResult<Option<Delivery>> {
        use schema::deliveries::dsl::*;

        let delivery = diesel::update(deliveries)
            .filter(id.eq(delivery_id))
            .filter(status.eq(DeliveryStatus::Pending))
            .set((
                status.eq(DeliveryStatus::Failed),
                response_code.eq(code),
                response_body.eq(body),
                error_message.eq(error),
                attempt_count.eq(attempt_count + 1),
                response_time_ms.eq(latency_ms),
            ))
            .returning(Delivery::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(delivery)
    }

    async fn schedule_retry(
        &mut self,
        delivery_id: Uuid,
        due_at: Timestamp,
    ) -> PgResult<Option<Delivery>> {
        use schema::deliveries::dsl::*;

        let delivery = diesel::update(deliveries)
            .filter(id.eq(delivery_id))
            .filter(status.eq(DeliveryStatus::Failed))
            .set((
                status.eq(DeliveryStatus::Retrying),
                next_attempt_at.eq(Some(jiff_diesel::Timestamp::from(due_at))),
            ))
            .returning(Delivery::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(delivery)
    }

    async fn mark_dead(
        &mut self,
        delivery_id: Uuid,
        reason: impl Into<String> + Send,
    ) -> PgResult<Option<Delivery>> {
        use schema::deliveries::dsl::*;

        let now = jiff_diesel::Timestamp::from(Timestamp::now());
        let delivery = diesel::update(deliveries)
            .filter(id.eq(delivery_id))
            .filter(status.eq_any([
                DeliveryStatus::Pending,
                DeliveryStatus::Failed,
                DeliveryStatus::Retrying,
            ]))
            .set((
                status.eq(DeliveryStatus::Dead),
                error_message.eq(Some(reason.into())),
                next_attempt_at.eq(None::<jiff_diesel::Timestamp>),
                completed_at.eq(Some(now)),
            ))
            .returning(Delivery::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(delivery)
    }

    async fn requeue_retry(&mut self, delivery_id: Uuid) -> PgResult<Option<Delivery>> {
        use schema::deliveries::dsl::*;

        let delivery = diesel::update(deliveries)
            .filter(id.eq(delivery_id))
            .filter(status.eq(DeliveryStatus::Retrying))
            .set((
                status.eq(DeliveryStatus::Pending),
                next_attempt_at.eq(None::<jiff_diesel::Timestamp>),
            ))
            .returning(Delivery::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(delivery)
    }

    async fn list_due_retries(&mut self, now: Timestamp, max: i64) -> PgResult<Vec<Delivery>> {
        use schema::deliveries::dsl::*;

        let due = deliveries
            .filter(status.eq(DeliveryStatus::Retrying))
            .filter(next_attempt_at.le(Some(jiff_diesel::Timestamp::from(now))))
            .select(Delivery::as_select())
            .order(next_attempt_at.asc())
            .limit(max)
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(due)
    }

    async fn delivery_statistics(
        &mut self,
        hook_id: Uuid,
        since: Timestamp,
    ) -> PgResult<DeliveryStatistics> {
        use schema::deliveries::dsl::*;

        let since = jiff_diesel::Timestamp::from(since);

        let counts: Vec<(DeliveryStatus, i64)> = deliveries
            .filter(webhook_id.eq(hook_id))
            .filter(created_at.ge(since))
            .group_by(status)
            .select((status, diesel::dsl::count_star()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let mut statistics = DeliveryStatistics::default();
        for (delivery_status, count) in counts {
            statistics.record(delivery_status, count);
        }

        statistics.average_response_ms = deliveries
            .filter(webhook_id.eq(hook_id))
            .filter(created_at.ge(since))
            .filter(status.eq(DeliveryStatus::Success))
            .select(sql::<Nullable<Double>>("avg(response_time_ms)::float8"))
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let statistics = DeliveryStatistics {
            successes: 7,
            dead: 3,
            ..Default::default()
        };

        assert!((statistics.success_rate() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_with_no_finished_deliveries() {
        let statistics = DeliveryStatistics {
            pending: 4,
            retrying: 2,
            ..Default::default()
        };

        assert_eq!(statistics.success_rate(), 0.0);
    }

    #[test]
    fn test_total_counts_every_status() {
        let statistics = DeliveryStatistics {
            pending: 1,
            successes: 2,
            failed: 3,
            retrying: 4,
            dead: 5,
            ..Default::default()
        };

        assert_eq!(statistics.total(), 15);
    }

    #[test]
    fn test_record_maps_statuses() {
        let mut statistics = DeliveryStatistics::default();
        statistics.record(DeliveryStatus::Success, 7);
        statistics.record(DeliveryStatus::Dead, 3);
        statistics.record(DeliveryStatus::Pending, 1);

        assert_eq!(statistics.successes, 7);
        assert_eq!(statistics.dead, 3);
        assert_eq!(statistics.pending, 1);
    }
}
