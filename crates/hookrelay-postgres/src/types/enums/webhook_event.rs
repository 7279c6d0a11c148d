//! Webhook event type enumeration for webhook event subscriptions.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines the types of platform events that can trigger webhook delivery.
///
/// This enumeration corresponds to the `WEBHOOK_EVENT` PostgreSQL enum and is used
/// to configure which events a webhook should receive notifications for. Because
/// subscriptions are typed, unknown event names are rejected at deserialization.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::WebhookEvent"]
pub enum WebhookEvent {
    // Member events
    /// A member joined the platform
    #[db_rename = "member.joined"]
    #[serde(rename = "member.joined")]
    #[strum(serialize = "member.joined")]
    MemberJoined,

    /// A member's profile was updated
    #[db_rename = "member.updated"]
    #[serde(rename = "member.updated")]
    #[strum(serialize = "member.updated")]
    MemberUpdated,

    /// A member left the platform
    #[db_rename = "member.left"]
    #[serde(rename = "member.left")]
    #[strum(serialize = "member.left")]
    MemberLeft,

    // Post events
    /// A new post was created
    #[db_rename = "post.created"]
    #[serde(rename = "post.created")]
    #[strum(serialize = "post.created")]
    PostCreated,

    /// A post was updated
    #[db_rename = "post.updated"]
    #[serde(rename = "post.updated")]
    #[strum(serialize = "post.updated")]
    PostUpdated,

    /// A post was deleted
    #[db_rename = "post.deleted"]
    #[serde(rename = "post.deleted")]
    #[strum(serialize = "post.deleted")]
    PostDeleted,

    // Job board events
    /// A job opening was posted
    #[db_rename = "job.posted"]
    #[serde(rename = "job.posted")]
    #[strum(serialize = "job.posted")]
    JobPosted,

    /// A job opening was updated
    #[db_rename = "job.updated"]
    #[serde(rename = "job.updated")]
    #[strum(serialize = "job.updated")]
    JobUpdated,

    /// A job opening was closed
    #[db_rename = "job.closed"]
    #[serde(rename = "job.closed")]
    #[strum(serialize = "job.closed")]
    JobClosed,

    // Form events
    /// A form was submitted
    #[db_rename = "form.submitted"]
    #[serde(rename = "form.submitted")]
    #[strum(serialize = "form.submitted")]
    FormSubmitted,

    // Reunion events
    /// A reunion was scheduled
    #[db_rename = "reunion.scheduled"]
    #[serde(rename = "reunion.scheduled")]
    #[strum(serialize = "reunion.scheduled")]
    ReunionScheduled,

    /// A reunion was updated
    #[db_rename = "reunion.updated"]
    #[serde(rename = "reunion.updated")]
    #[strum(serialize = "reunion.updated")]
    ReunionUpdated,

    /// A reunion was cancelled
    #[db_rename = "reunion.cancelled"]
    #[serde(rename = "reunion.cancelled")]
    #[strum(serialize = "reunion.cancelled")]
    ReunionCancelled,

    // Synthetic events
    /// Test delivery triggered through the API
    #[db_rename = "webhook.test"]
    #[serde(rename = "webhook.test")]
    #[strum(serialize = "webhook.test")]
    WebhookTest,
}

impl WebhookEvent {
    /// Returns the event category as a string.
    pub fn category(&self) -> &'static str {
        match self {
            WebhookEvent::MemberJoined
            | WebhookEvent::MemberUpdated
            | WebhookEvent::MemberLeft => "member",
            WebhookEvent::PostCreated | WebhookEvent::PostUpdated | WebhookEvent::PostDeleted => {
                "post"
            }
            WebhookEvent::JobPosted | WebhookEvent::JobUpdated | WebhookEvent::JobClosed => "job",
            WebhookEvent::FormSubmitted => "form",
            WebhookEvent::ReunionScheduled
            | WebhookEvent::ReunionUpdated
            | WebhookEvent::ReunionCancelled => "reunion",
            WebhookEvent::WebhookTest => "webhook",
        }
    }

    /// Returns whether this is the synthetic test event.
    #[inline]
    pub fn is_test_event(self) -> bool {
        matches!(self, WebhookEvent::WebhookTest)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(WebhookEvent::PostCreated.to_string(), "post.created");
        assert_eq!(WebhookEvent::FormSubmitted.to_string(), "form.submitted");
        assert_eq!(
            WebhookEvent::from_str("reunion.cancelled").unwrap(),
            WebhookEvent::ReunionCancelled
        );
        assert!(WebhookEvent::from_str("post.liked").is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let encoded = serde_json::to_string(&WebhookEvent::MemberJoined).unwrap();
        assert_eq!(encoded, "\"member.joined\"");

        let decoded: WebhookEvent = serde_json::from_str("\"job.closed\"").unwrap();
        assert_eq!(decoded, WebhookEvent::JobClosed);

        assert!(serde_json::from_str::<WebhookEvent>("\"nope.nope\"").is_err());
    }

    #[test]
    fn test_categories_cover_all_events() {
        for event in WebhookEvent::iter() {
            assert!(!event.category().is_empty());
            assert!(event.to_string().starts_with(event.category()));
        }
    }

    #[test]
    fn test_test_event_detection() {
        assert!(WebhookEvent::WebhookTest.is_test_event());
        assert!(!WebhookEvent::PostCreated.is_test_event());
    }
}
