//! Work-queue message for asynchronous delivery execution.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Queue message instructing a delivery worker to execute one delivery.
///
/// The message intentionally carries ids only; workers reload the delivery
/// and webhook rows so that redelivered messages observe current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryJob {
    /// The delivery row to execute.
    pub delivery_id: Uuid,
    /// The webhook the delivery belongs to.
    pub webhook_id: Uuid,
    /// The tenant owning the webhook, used as the queue routing subject.
    pub tenant_id: Uuid,
}

impl DeliveryJob {
    /// Creates a new delivery job.
    pub fn new(delivery_id: Uuid, webhook_id: Uuid, tenant_id: Uuid) -> Self {
        Self {
            delivery_id,
            webhook_id,
            tenant_id,
        }
    }

    /// Returns the queue sub-subject for this job.
    pub fn subject(&self) -> String {
        format!("{}.{}", self.tenant_id, self.webhook_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_roundtrip() {
        let job = DeliveryJob::new(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        let encoded = serde_json::to_string(&job).unwrap();
        let decoded: DeliveryJob = serde_json::from_str(&encoded).unwrap();
        assert_eq!(job, decoded);
    }

    #[test]
    fn test_job_subject() {
        let tenant_id = Uuid::now_v7();
        let webhook_id = Uuid::now_v7();
        let job = DeliveryJob::new(Uuid::now_v7(), webhook_id, tenant_id);
        assert_eq!(job.subject(), format!("{tenant_id}.{webhook_id}"));
    }
}
