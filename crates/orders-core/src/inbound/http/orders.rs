//! `/api/order` handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use super::validation::{respond_validation_errors, ValidationErrors};
use crate::application::data_service::DataService;
use crate::errors::AppError;
use orders_types::domain::order::{NewOrder, Order, Product, ProductsBlob};
use orders_types::domain::user::User;
use orders_types::ports::Repository;

/// Controller actions that carry a validation rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Please provide a valid method name")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Body of `POST /api/order`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(required(message = "Please provide a list of products"))]
    pub products: Option<Value>,
}

impl CreateOrderRequest {
    fn into_products(self) -> Result<Vec<Product>, validator::ValidationErrors> {
        serde_json::from_value(self.products.unwrap_or_default()).map_err(|_| {
            let mut error = ValidationError::new("list_of_objects");
            error.message = Some("Products must be a list of objects".into());
            let mut errors = validator::ValidationErrors::new();
            errors.add("products", error);
            errors
        })
    }
}

/// A request body that passed the rules of its action.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Create(Vec<Product>),
}

pub fn validate(action: Action, body: Value) -> Result<Validated, ValidationErrors> {
    match action {
        Action::Create => {
            // Bodies that are not objects validate like `{}`.
            let req: CreateOrderRequest = serde_json::from_value(body).unwrap_or_default();
            req.validate().map_err(|e| ValidationErrors::from(&e))?;
            let products = req
                .into_products()
                .map_err(|e| ValidationErrors::from(&e))?;
            Ok(Validated::Create(products))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
}

pub async fn index<R>(
    State(service): State<Arc<DataService<R>>>,
    Extension(user): Extension<User>,
) -> Result<(StatusCode, Json<OrdersResponse>), AppError>
where
    R: Repository,
{
    let orders = service.list_orders(user.id).await?;
    Ok((StatusCode::OK, Json(OrdersResponse { orders })))
}

pub async fn create<R>(
    State(service): State<Arc<DataService<R>>>,
    Extension(user): Extension<User>,
    body: Bytes,
) -> Result<Response, AppError>
where
    R: Repository,
{
    let body = parse_body(&body)?;

    let Validated::Create(products) = match validate(Action::Create, body) {
        Ok(validated) => validated,
        Err(errors) => return Ok(respond_validation_errors(&errors)),
    };

    let products = ProductsBlob::encode(&products).map_err(|e| {
        tracing::debug!(error = %e, "encoding products failed");
        AppError::new("Failed to save order")
    })?;
    let order = service
        .save_order(Some(NewOrder {
            userid: user.id,
            products,
        }))
        .await?;
    Ok((StatusCode::OK, Json(OrderResponse { order })).into_response())
}

// A missing body validates like an empty object.
fn parse_body(raw: &[u8]) -> Result<Value, AppError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(raw)
        .map_err(|_| AppError::with_status("Request body must be valid JSON", StatusCode::BAD_REQUEST))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages(errors: &ValidationErrors) -> Vec<(&str, &str)> {
        errors
            .array()
            .iter()
            .map(|e| (e.param.as_str(), e.msg.as_str()))
            .collect()
    }

    #[test]
    fn create_requires_products() {
        for body in [json!({}), json!({"products": null}), json!([1, 2]), json!("x")] {
            let errors = validate(Action::Create, body).unwrap_err();
            assert_eq!(
                messages(&errors),
                [("products", "Please provide a list of products")]
            );
        }
    }

    #[test]
    fn create_requires_a_list_of_objects() {
        for products in [json!("anything"), json!([1]), json!({"name": "x"})] {
            let errors = validate(Action::Create, json!({ "products": products })).unwrap_err();
            assert_eq!(
                messages(&errors),
                [("products", "Products must be a list of objects")]
            );
        }
    }

    #[test]
    fn create_accepts_product_lists() {
        let validated = validate(
            Action::Create,
            json!({"products": [{"name": "x"}], "extra": true}),
        )
        .unwrap();
        assert_eq!(validated, Validated::Create(vec![Product::named("x")]));

        let empty = validate(Action::Create, json!({"products": []})).unwrap();
        assert_eq!(empty, Validated::Create(vec![]));
    }

    #[test]
    fn action_names_parse_strictly() {
        assert_eq!("create".parse::<Action>(), Ok(Action::Create));
        let err = "unknown method name".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "Please provide a valid method name");
    }

    #[test]
    fn empty_body_is_an_empty_object() {
        assert_eq!(parse_body(b"").unwrap(), json!({}));
        assert_eq!(parse_body(b"  \n").unwrap(), json!({}));
        assert_eq!(
            parse_body(br#"{"products":[]}"#).unwrap(),
            json!({"products": []})
        );
        let err = parse_body(b"{nope").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
