//! Delivery history request types.

use hookrelay_postgres::query::Pagination;
use hookrelay_postgres::types::DeliveryStatus;
use schemars::JsonSchema;
use serde::Deserialize;

/// Query parameters for listing deliveries of a webhook.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryListParams {
    /// Restrict to deliveries with this status.
    pub status: Option<DeliveryStatus>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size (1-1000).
    pub per_page: Option<i64>,
}

impl DeliveryListParams {
    /// Converts the page parameters into repository pagination.
    pub fn pagination(&self) -> Pagination {
        Pagination::from_page(self.page.unwrap_or(1), self.per_page.unwrap_or(50))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let pagination = DeliveryListParams::default().pagination();
        assert_eq!(pagination.limit, 50);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn test_pagination_explicit_page() {
        let params = DeliveryListParams {
            page: Some(4),
            per_page: Some(10),
            ..Default::default()
        };
        let pagination = params.pagination();
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 30);
    }
}
