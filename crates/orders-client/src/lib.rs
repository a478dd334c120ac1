use std::time::Duration;

use anyhow::Context;
use orders_types::domain::order::{Order, Product};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Header the server resolves the calling user from.
pub const EMAIL_HEADER: &str = "email";

#[derive(Clone)]
pub struct OrdersClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct OrdersClient {
    base: Url,
    client: reqwest::Client,
}

impl OrdersClient {
    /// A client acting as the user identified by `email`.
    pub fn new(base_url: &str, email: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.with_email(email)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<OrdersClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(OrdersClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        let res = self
            .client
            .get(self.url("api/order")?)
            .send()
            .await?
            .error_for_status()?;
        let body: ListOrdersResponse = res.json().await?;
        tracing::debug!(count = body.orders.len(), "listed orders");
        Ok(body.orders)
    }

    pub async fn create_order(&self, products: Vec<Product>) -> anyhow::Result<Order> {
        let res = self
            .client
            .post(self.url("api/order")?)
            .json(&CreateOrderRequest { products })
            .send()
            .await?
            .error_for_status()?;
        let body: CreateOrderResponse = res.json().await?;
        tracing::debug!(order_id = body.order.id, "created order");
        Ok(body.order)
    }
}

impl OrdersClientBuilder {
    pub fn with_email(self, email: impl AsRef<str>) -> anyhow::Result<Self> {
        self.with_header(EMAIL_HEADER, email)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Uses a preconfigured client as is; headers and timeout set on this
    /// builder are ignored.
    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<OrdersClient> {
        if let Some(client) = self.client {
            return Ok(OrdersClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(OrdersClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateOrderRequest {
    pub products: Vec<Product>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateOrderResponse {
    pub order: Order,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListOrdersResponse {
    pub orders: Vec<Order>,
}
