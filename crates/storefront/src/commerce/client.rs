//! GraphQL shop API client.
//!
//! Operations are `graphql_client` codegen types from [`super::queries`];
//! `reqwest` does the HTTP. The backend runs in bearer-token session mode:
//! the stored token is sent as `Authorization: Bearer`, and a newly created
//! session comes back in the `vendure-auth-token` response header.

use std::sync::Arc;

use async_trait::async_trait;
use graphql_client::{GraphQLQuery, Response};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::conversions::{
    convert_active_order, convert_adjust_order_line, convert_countries, convert_customer,
    convert_payment_methods, convert_remove_order_line, convert_set_shipping_address,
    convert_set_shipping_method, convert_shipping_methods,
};
use super::queries::{
    AdjustOrderLine, GetActiveCustomer, GetActiveOrder, GetAvailableCountries,
    GetEligiblePaymentMethods, GetEligibleShippingMethods, RemoveOrderLine,
    SetOrderShippingAddress, SetOrderShippingMethod, adjust_order_line, get_active_customer,
    get_active_order, get_available_countries, get_eligible_payment_methods,
    get_eligible_shipping_methods, remove_order_line, set_order_shipping_address,
    set_order_shipping_method,
};
use super::types::{
    ActiveCustomer, AddressInput, Country, Order, OrderLineId, OrderUpdate, PaymentMethodQuote,
    ShippingMethodId, ShippingMethodQuote,
};
use super::{CommerceError, CommerceProvider, Result, ShopContext};
use crate::config::CommerceConfig;
use crate::middleware::request_id::REQUEST_ID_HEADER;

/// Response header carrying a newly issued backend session token.
pub const AUTH_TOKEN_HEADER: &str = "vendure-auth-token";

/// Request header selecting the backend channel.
pub const CHANNEL_TOKEN_HEADER: &str = "vendure-token";

/// Longest body excerpt kept in errors and logs.
const BODY_EXCERPT_CHARS: usize = 500;

/// Client for the commerce backend's shop API.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    endpoint: Url,
    channel_token: Option<String>,
}

impl CommerceClient {
    /// Create a new shop API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &CommerceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent("BoltStorefront/1.0")
            .build()
            .map_err(|e| CommerceError::Unavailable(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                endpoint: config.shop_api_url.clone(),
                channel_token: config.channel_token.clone(),
            }),
        })
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        ctx: &ShopContext,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData>
    where
        Q::Variables: serde::Serialize,
    {
        let body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&body);

        if let Some(token) = ctx.auth_token() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(channel) = &self.inner.channel_token {
            request = request.header(CHANNEL_TOKEN_HEADER, channel);
        }
        if let Some(request_id) = ctx.request_id() {
            request = request.header(REQUEST_ID_HEADER, request_id);
        }

        let response = request.send().await?;

        if let Some(token) = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            ctx.record_issued_token(token);
        }

        let status = response.status();
        let response_text = response.text().await?;
        decode_body(status, &response_text)
    }
}

/// Turn an HTTP status and body into the operation's data.
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    let excerpt = || body.chars().take(BODY_EXCERPT_CHARS).collect::<String>();

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %excerpt(),
            "Commerce backend returned non-success status"
        );
        return Err(CommerceError::Status {
            status: status.as_u16(),
            body: excerpt(),
        });
    }

    let response: Response<T> = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, body = %excerpt(), "Failed to parse shop API response");
        CommerceError::Parse(e)
    })?;

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        debug!(errors = ?errors, "GraphQL errors in response");
        return Err(CommerceError::GraphQL(
            errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    response
        .data
        .ok_or_else(|| CommerceError::GraphQL(vec!["No data in response".to_string()]))
}

#[async_trait]
impl CommerceProvider for CommerceClient {
    #[instrument(skip_all)]
    async fn available_countries(&self, ctx: &ShopContext) -> Result<Vec<Country>> {
        let data = self
            .execute::<GetAvailableCountries>(ctx, get_available_countries::Variables)
            .await?;
        Ok(convert_countries(data))
    }

    #[instrument(skip_all)]
    async fn eligible_shipping_methods(
        &self,
        ctx: &ShopContext,
    ) -> Result<Vec<ShippingMethodQuote>> {
        let data = self
            .execute::<GetEligibleShippingMethods>(ctx, get_eligible_shipping_methods::Variables)
            .await?;
        Ok(convert_shipping_methods(data))
    }

    #[instrument(skip_all)]
    async fn eligible_payment_methods(
        &self,
        ctx: &ShopContext,
    ) -> Result<Vec<PaymentMethodQuote>> {
        let data = self
            .execute::<GetEligiblePaymentMethods>(ctx, get_eligible_payment_methods::Variables)
            .await?;
        Ok(convert_payment_methods(data))
    }

    #[instrument(skip_all)]
    async fn active_customer(&self, ctx: &ShopContext) -> Result<Option<ActiveCustomer>> {
        let data = self
            .execute::<GetActiveCustomer>(ctx, get_active_customer::Variables)
            .await?;
        Ok(convert_customer(data))
    }

    #[instrument(skip_all)]
    async fn active_order(&self, ctx: &ShopContext) -> Result<Option<Order>> {
        let data = self
            .execute::<GetActiveOrder>(ctx, get_active_order::Variables)
            .await?;
        Ok(convert_active_order(data))
    }

    #[instrument(skip(self, ctx), fields(line_id = %line_id))]
    async fn adjust_order_line(
        &self,
        ctx: &ShopContext,
        line_id: &OrderLineId,
        quantity: u32,
    ) -> Result<OrderUpdate> {
        let variables = adjust_order_line::Variables {
            order_line_id: line_id.to_string(),
            quantity: i64::from(quantity),
        };
        let data = self.execute::<AdjustOrderLine>(ctx, variables).await?;
        Ok(convert_adjust_order_line(data))
    }

    #[instrument(skip(self, ctx), fields(line_id = %line_id))]
    async fn remove_order_line(
        &self,
        ctx: &ShopContext,
        line_id: &OrderLineId,
    ) -> Result<OrderUpdate> {
        let variables = remove_order_line::Variables {
            order_line_id: line_id.to_string(),
        };
        let data = self.execute::<RemoveOrderLine>(ctx, variables).await?;
        Ok(convert_remove_order_line(data))
    }

    #[instrument(skip_all)]
    async fn set_order_shipping_address(
        &self,
        ctx: &ShopContext,
        address: &AddressInput,
    ) -> Result<OrderUpdate> {
        let address = address.clone();
        let variables = set_order_shipping_address::Variables {
            input: set_order_shipping_address::CreateAddressInput {
                full_name: address.full_name,
                company: address.company,
                street_line1: address.street_line1,
                street_line2: address.street_line2,
                city: address.city,
                province: address.province,
                postal_code: address.postal_code,
                country_code: address.country_code,
                phone_number: address.phone_number,
                default_shipping_address: None,
                default_billing_address: None,
            },
        };
        let data = self.execute::<SetOrderShippingAddress>(ctx, variables).await?;
        Ok(convert_set_shipping_address(data))
    }

    #[instrument(skip(self, ctx), fields(method_id = %method_id))]
    async fn set_order_shipping_method(
        &self,
        ctx: &ShopContext,
        method_id: &ShippingMethodId,
    ) -> Result<OrderUpdate> {
        let variables = set_order_shipping_method::Variables {
            shipping_method_id: vec![method_id.to_string()],
        };
        let data = self.execute::<SetOrderShippingMethod>(ctx, variables).await?;
        Ok(convert_set_shipping_method(data))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commerce::CommerceErrorKind;

    type CountriesData = get_available_countries::ResponseData;

    #[test]
    fn test_decode_body_success() {
        let body = r#"{"data":{"availableCountries":[
            {"id":"1","code":"HU","name":"Magyarország"}
        ]}}"#;
        let data: CountriesData = decode_body(StatusCode::OK, body).unwrap();
        let countries = convert_countries(data);
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].code, "HU");
    }

    #[test]
    fn test_decode_body_non_success_status_is_backend_error() {
        let err =
            decode_body::<CountriesData>(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(matches!(err, CommerceError::Status { status: 502, .. }));
        assert_eq!(err.kind(), CommerceErrorKind::BackendError);
    }

    #[test]
    fn test_decode_body_graphql_errors() {
        let body = r#"{"data":null,"errors":[{"message":"You are not currently authorized"}]}"#;
        let err = decode_body::<CountriesData>(StatusCode::OK, body).unwrap_err();
        match err {
            CommerceError::GraphQL(messages) => {
                assert_eq!(messages, vec!["You are not currently authorized".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_body_garbage_is_parse_error() {
        let err = decode_body::<CountriesData>(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, CommerceError::Parse(_)));
    }

    #[test]
    fn test_decode_body_mutation_rejection() {
        let body = r#"{"data":{"adjustOrderLine":{
            "__typename":"InsufficientStockError",
            "errorCode":"INSUFFICIENT_STOCK_ERROR",
            "message":"Only 1 item may be added to the order due to insufficient stock"
        }}}"#;
        let data: adjust_order_line::ResponseData = decode_body(StatusCode::OK, body).unwrap();

        match convert_adjust_order_line(data) {
            OrderUpdate::Rejected(error) => {
                assert_eq!(error.error_code, "INSUFFICIENT_STOCK_ERROR");
            }
            OrderUpdate::Updated(_) => panic!("expected a rejection"),
        }
    }
}
