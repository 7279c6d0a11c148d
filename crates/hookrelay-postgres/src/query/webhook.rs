//! Webhook repository for managing registry operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewWebhook, UpdateWebhook, Webhook};
use crate::types::{WebhookEvent, WebhookStatus};
use crate::{PgConnection, PgError, PgResult, schema};

/// Optional filters for webhook listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookListFilter {
    /// Restrict to webhooks with this status.
    pub status: Option<WebhookStatus>,
    /// Restrict to webhooks subscribed to this event.
    pub event: Option<WebhookEvent>,
}

/// Repository for webhook registry database operations.
///
/// Handles webhook management including CRUD operations and status management.
/// Deletion is always a soft delete so that delivery history is retained.
pub trait WebhookRepository {
    /// Creates a new webhook.
    fn create_webhook(
        &mut self,
        new_webhook: NewWebhook,
    ) -> impl Future<Output = PgResult<Webhook>> + Send;

    /// Finds a webhook by ID.
    fn find_webhook_by_id(
        &mut self,
        webhook_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Webhook>>> + Send;

    /// Lists webhooks for a tenant, optionally filtered by status and event.
    fn list_webhooks(
        &mut self,
        tenant_id: Uuid,
        filter: WebhookListFilter,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Webhook>>> + Send;

    /// Finds active webhooks of a tenant subscribed to a specific event.
    fn find_webhooks_for_event(
        &mut self,
        tenant_id: Uuid,
        event: WebhookEvent,
    ) -> impl Future<Output = PgResult<Vec<Webhook>>> + Send;

    /// Updates a webhook.
    fn update_webhook(
        &mut self,
        webhook_id: Uuid,
        changes: UpdateWebhook,
    ) -> impl Future<Output = PgResult<Webhook>> + Send;

    /// Soft deletes a webhook.
    fn delete_webhook(&mut self, webhook_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;

    /// Pauses a webhook.
    fn pause_webhook(
        &mut self,
        webhook_id: Uuid,
    ) -> impl Future<Output = PgResult<Webhook>> + Send;

    /// Resumes a paused webhook.
    fn resume_webhook(
        &mut self,
        webhook_id: Uuid,
    ) -> impl Future<Output = PgResult<Webhook>> + Send;

    /// Disables a webhook.
    fn disable_webhook(
        &mut self,
        webhook_id: Uuid,
    ) -> impl Future<Output = PgResult<Webhook>> + Send;

    /// Records that a webhook was triggered.
    fn record_webhook_triggered(
        &mut self,
        webhook_id: Uuid,
    ) -> impl Future<Output = PgResult<Webhook>> + Send;
}

impl WebhookRepository for PgConnection {
    async fn create_webhook(&mut self, new_webhook: NewWebhook) -> PgResult<Webhook> {
        use schema::webhooks;

        let webhook = diesel::insert_into(webhooks::table)
            .values(&new_webhook)
            .returning(Webhook::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn find_webhook_by_id(&mut self, hook_id: Uuid) -> PgResult<Option<Webhook>> {
        use schema::webhooks::dsl::*;

        let webhook = webhooks
            .filter(id.eq(hook_id))
            .filter(deleted_at.is_null())
            .select(Webhook::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn list_webhooks(
        &mut self,
        owner_id: Uuid,
        filter: WebhookListFilter,
        pagination: Pagination,
    ) -> PgResult<Vec<Webhook>> {
        use schema::webhooks::dsl::*;

        let mut query = webhooks
            .filter(tenant_id.eq(owner_id))
            .filter(deleted_at.is_null())
            .into_boxed();

        if let Some(wanted_status) = filter.status {
            query = query.filter(status.eq(wanted_status));
        }

        if let Some(wanted_event) = filter.event {
            query = query.filter(events.contains(vec![Some(wanted_event)]));
        }

        let results = query
            .select(Webhook::as_select())
            .order(created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(results)
    }

    async fn find_webhooks_for_event(
        &mut self,
        owner_id: Uuid,
        event: WebhookEvent,
    ) -> PgResult<Vec<Webhook>> {
        use schema::webhooks::dsl::*;

        let results = webhooks
            .filter(tenant_id.eq(owner_id))
            .filter(status.eq(WebhookStatus::Active))
            .filter(events.contains(vec![Some(event)]))
            .filter(deleted_at.is_null())
            .select(Webhook::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(results)
    }

    async fn update_webhook(&mut self, hook_id: Uuid, changes: UpdateWebhook) -> PgResult<Webhook> {
        use schema::webhooks::dsl::*;

        let webhook = diesel::update(webhooks)
            .filter(id.eq(hook_id))
            .set(&changes)
            .returning(Webhook::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn delete_webhook(&mut self, hook_id: Uuid) -> PgResult<()> {
        use schema::webhooks::dsl::*;

        diesel::update(webhooks)
            .filter(id.eq(hook_id))
            .set(deleted_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }

    async fn pause_webhook(&mut self, hook_id: Uuid) -> PgResult<Webhook> {
        use schema::webhooks::dsl::*;

        let webhook = diesel::update(webhooks)
            .filter(id.eq(hook_id))
            .set(status.eq(WebhookStatus::Paused))
            .returning(Webhook::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn resume_webhook(&mut self, hook_id: Uuid) -> PgResult<Webhook> {
        use schema::webhooks::dsl::*;

        let webhook = diesel::update(webhooks)
            .filter(id.eq(hook_id))
            .set(status.eq(WebhookStatus::Active))
            .returning(Webhook::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn disable_webhook(&mut self, hook_id: Uuid) -> PgResult<Webhook> {
        use schema::webhooks::dsl::*;

        let webhook = diesel::update(webhooks)
            .filter(id.eq(hook_id))
            .set(status.eq(WebhookStatus::Disabled))
            .returning(Webhook::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn record_webhook_triggered(&mut self, hook_id: Uuid) -> PgResult<Webhook> {
        use schema::webhooks::dsl::*;

        let now = jiff_diesel::Timestamp::from(Timestamp::now());
        let webhook = diesel::update(webhooks)
            .filter(id.eq(hook_id))
            .set(last_triggered_at.eq(Some(now)))
            .returning(Webhook::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(webhook)
    }
}
