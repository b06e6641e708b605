//! Deal listing: the representative authenticated resource.

use remora_core::{Deal, DealPage};

use crate::client::ApiClient;
use crate::endpoints;
use crate::error::ApiError;
use crate::request::ApiResponse;

impl ApiClient {
    /// Lists all deals.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn deals_all(&self) -> Result<Vec<Deal>, ApiError> {
        let response = self.get(endpoints::deals::ALL).await?;
        parse_deals(&response)
    }

    /// Lists the current account's deals.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn deals_my(&self) -> Result<Vec<Deal>, ApiError> {
        let response = self.get(endpoints::deals::MY).await?;
        parse_deals(&response)
    }

    /// Fetches a single deal.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn deal(&self, deal_id: &str) -> Result<Deal, ApiError> {
        let response = self.get(&endpoints::deals::by_id(deal_id)).await?;
        response
            .json()
            .map_err(|e| ApiError::invalid_payload(response.status, e.to_string()))
    }
}

/// The listing endpoints return either a bare array or a `{deals, total}`
/// page object depending on the route.
fn parse_deals(response: &ApiResponse) -> Result<Vec<Deal>, ApiError> {
    if let Ok(deals) = response.json::<Vec<Deal>>() {
        return Ok(deals);
    }

    let page: DealPage = response
        .json()
        .map_err(|e| ApiError::invalid_payload(response.status, e.to_string()))?;
    Ok(page.deals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Payload;
    use serde_json::json;

    #[test]
    fn test_parse_bare_array() {
        let response = ApiResponse {
            status: 200,
            payload: Payload::Json(json!([{"id": "d-1", "deal_name": "One"}])),
        };
        let deals = parse_deals(&response).unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].deal_name, "One");
    }

    #[test]
    fn test_parse_page_object() {
        let response = ApiResponse {
            status: 200,
            payload: Payload::Json(json!({
                "deals": [{"id": "d-1", "deal_name": "One"}],
                "total": 10
            })),
        };
        let deals = parse_deals(&response).unwrap();
        assert_eq!(deals.len(), 1);
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let response = ApiResponse {
            status: 200,
            payload: Payload::Json(json!({"unexpected": true})),
        };
        // A page object with neither `deals` nor array shape still parses
        // as an empty page via serde defaults
        let deals = parse_deals(&response).unwrap();
        assert!(deals.is_empty());

        let response = ApiResponse {
            status: 200,
            payload: Payload::Text("nope".to_string()),
        };
        assert!(parse_deals(&response).is_err());
    }
}
