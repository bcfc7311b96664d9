//! Typed facade over the CRM REST API
//!
//! One method per endpoint. Failures are logged and propagated; nothing is
//! retried and lists are always fetched whole.

use serde::de::IgnoredAny;
use shared::Audience;
use shared::client::{
    CreateCampaignRequest, PreviewAudienceRequest, PreviewAudienceResponse, TextToRulesRequest,
    TextToRulesResponse,
};
use shared::models::{
    Campaign, Customer, CustomerCreate, CustomerUpdate, Order, OrderCreate, OrderUpdate,
};

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientError, ClientResult};

const CUSTOMERS: &str = "/api/customers";
const ORDERS: &str = "/api/orders";
const CAMPAIGNS: &str = "/api/campaigns";
const CAMPAIGN_PREVIEW: &str = "/api/campaigns/preview";
const TEXT_TO_RULES: &str = "/api/ai/text-to-rules";

/// CRM API client
#[derive(Debug, Clone)]
pub struct CrmApi<H = NetworkHttpClient> {
    http: H,
}

impl<H: HttpClient> CrmApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    // ========== Session ==========

    /// Probe the session by listing customers; a 401 or redirect means signed out
    pub async fn check_auth(&self) -> ClientResult<bool> {
        match self.http.get::<IgnoredAny>(CUSTOMERS).await {
            Ok(_) => Ok(true),
            Err(ClientError::AuthRequired { status }) => {
                tracing::info!(status, "Session check: not authenticated");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("Session check failed: {e}");
                Err(e)
            }
        }
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.http
            .get::<IgnoredAny>("/logout")
            .await
            .map(|_| ())
            .inspect_err(|e| tracing::error!("Logout failed: {e}"))
    }

    pub fn login_url(&self) -> String {
        format!("{}/login", self.http.base_url())
    }

    pub fn google_auth_url(&self) -> String {
        format!("{}/auth/google", self.http.base_url())
    }

    // ========== Customers ==========

    pub async fn list_customers(&self) -> ClientResult<Vec<Customer>> {
        self.http
            .get::<Option<Vec<Customer>>>(CUSTOMERS)
            .await
            .map(Option::unwrap_or_default)
            .inspect_err(|e| tracing::error!("Failed to fetch customers: {e}"))
    }

    pub async fn get_customer(&self, id: &str) -> ClientResult<Customer> {
        self.http
            .get(&format!("{CUSTOMERS}/{id}"))
            .await
            .inspect_err(|e| tracing::error!(id, "Failed to fetch customer: {e}"))
    }

    pub async fn create_customer(&self, data: &CustomerCreate) -> ClientResult<Customer> {
        self.http
            .post(CUSTOMERS, data)
            .await
            .inspect_err(|e| tracing::error!("Failed to create customer: {e}"))
    }

    pub async fn update_customer(&self, id: &str, data: &CustomerUpdate) -> ClientResult<Customer> {
        self.http
            .put(&format!("{CUSTOMERS}/{id}"), data)
            .await
            .inspect_err(|e| tracing::error!(id, "Failed to update customer: {e}"))
    }

    pub async fn delete_customer(&self, id: &str) -> ClientResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("{CUSTOMERS}/{id}"))
            .await
            .map(|_| ())
            .inspect_err(|e| tracing::error!(id, "Failed to delete customer: {e}"))
    }

    // ========== Orders ==========

    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.http
            .get::<Option<Vec<Order>>>(ORDERS)
            .await
            .map(Option::unwrap_or_default)
            .inspect_err(|e| tracing::error!("Failed to fetch orders: {e}"))
    }

    pub async fn get_order(&self, id: &str) -> ClientResult<Order> {
        self.http
            .get(&format!("{ORDERS}/{id}"))
            .await
            .inspect_err(|e| tracing::error!(id, "Failed to fetch order: {e}"))
    }

    pub async fn create_order(&self, data: &OrderCreate) -> ClientResult<Order> {
        self.http
            .post(ORDERS, data)
            .await
            .inspect_err(|e| tracing::error!("Failed to create order: {e}"))
    }

    pub async fn update_order(&self, id: &str, data: &OrderUpdate) -> ClientResult<Order> {
        self.http
            .put(&format!("{ORDERS}/{id}"), data)
            .await
            .inspect_err(|e| tracing::error!(id, "Failed to update order: {e}"))
    }

    pub async fn delete_order(&self, id: &str) -> ClientResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("{ORDERS}/{id}"))
            .await
            .map(|_| ())
            .inspect_err(|e| tracing::error!(id, "Failed to delete order: {e}"))
    }

    // ========== AI ==========

    /// Translate a natural-language description into a rule set
    pub async fn text_to_rules(&self, text: &str) -> ClientResult<TextToRulesResponse> {
        let req = TextToRulesRequest {
            text: text.to_string(),
        };
        self.http
            .post(TEXT_TO_RULES, &req)
            .await
            .inspect_err(|e| tracing::error!("Failed to get AI rules: {e}"))
    }

    // ========== Campaigns ==========

    pub async fn list_campaigns(&self) -> ClientResult<Vec<Campaign>> {
        self.http
            .get::<Option<Vec<Campaign>>>(CAMPAIGNS)
            .await
            .map(Option::unwrap_or_default)
            .inspect_err(|e| tracing::error!("Failed to fetch campaigns: {e}"))
    }

    /// Ask the remote matcher how many customers the audience selects
    ///
    /// An empty body counts as zero matches.
    pub async fn preview_audience(&self, audience: &Audience) -> ClientResult<u64> {
        let req = PreviewAudienceRequest::from(audience);
        self.http
            .post::<Option<PreviewAudienceResponse>, _>(CAMPAIGN_PREVIEW, &req)
            .await
            .map(|resp| resp.map(|r| r.audience_size).unwrap_or(0))
            .inspect_err(|e| {
                if e.is_network() {
                    tracing::warn!("Audience preview unreachable: {e}");
                } else {
                    tracing::error!("Failed to preview audience: {e}");
                }
            })
    }

    pub async fn create_campaign(&self, req: &CreateCampaignRequest) -> ClientResult<Campaign> {
        self.http
            .post(CAMPAIGNS, req)
            .await
            .inspect_err(|e| tracing::error!("Failed to create campaign: {e}"))
    }
}
