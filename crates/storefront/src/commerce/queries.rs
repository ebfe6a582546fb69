//! GraphQL operations for the commerce backend's shop API.

use graphql_client::GraphQLQuery;

// Custom scalars of the shop API schema
// Must be defined in the same module where GraphQLQuery derive is used
type Money = bolt_core::MinorUnits;

// Checkout reference data
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetAvailableCountries;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetEligibleShippingMethods;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetEligiblePaymentMethods;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetActiveCustomer;

// Active order and its mutations
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/order.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetActiveOrder;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/order.graphql",
    response_derives = "Debug, Clone"
)]
pub struct AdjustOrderLine;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/order.graphql",
    response_derives = "Debug, Clone"
)]
pub struct RemoveOrderLine;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/order.graphql",
    response_derives = "Debug, Clone"
)]
pub struct SetOrderShippingAddress;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/queries/order.graphql",
    response_derives = "Debug, Clone"
)]
pub struct SetOrderShippingMethod;
