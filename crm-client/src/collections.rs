//! Read-mostly collection views
//!
//! Each view fetches its whole collection and reloads it after every
//! mutation instead of patching locally. There is no pagination and no cache
//! beyond the current list.

use chrono::{DateTime, Utc};
use shared::models::{
    Campaign, CampaignStatus, Customer, CustomerCreate, CustomerUpdate, Order, OrderCreate,
    OrderUpdate,
};

use crate::api::CrmApi;
use crate::http::HttpClient;
use crate::ClientResult;

// =============================================================================
// Formatting
// =============================================================================

/// `1234567` -> `"1,234,567"`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// USD with grouping and two decimals, e.g. `"$1,250.50"`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", format_count(cents / 100), cents % 100)
}

fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%b %d, %Y %H:%M").to_string()
}

// =============================================================================
// Customers
// =============================================================================

/// One rendered customer entry
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerCard {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub total_spend: String,
    pub visits: u32,
    pub last_purchase: String,
}

impl From<&Customer> for CustomerCard {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            total_spend: format_currency(c.total_spend),
            visits: c.visits,
            last_purchase: c
                .last_purchase_date
                .as_ref()
                .map(format_date)
                .unwrap_or_else(|| "Never".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerListView {
    Empty { title: &'static str, hint: &'static str },
    Cards(Vec<CustomerCard>),
}

#[derive(Debug, Default)]
pub struct CustomerDirectory {
    customers: Vec<Customer>,
    search: String,
}

impl CustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with a fresh copy from the server
    ///
    /// A failed load leaves an empty list behind.
    pub async fn reload<H: HttpClient>(&mut self, api: &CrmApi<H>) -> ClientResult<usize> {
        match api.list_customers().await {
            Ok(customers) => {
                tracing::debug!(count = customers.len(), "Customers loaded");
                self.customers = customers;
                Ok(self.customers.len())
            }
            Err(e) => {
                self.customers.clear();
                Err(e)
            }
        }
    }

    /// Reload after an accepted mutation; a failure keeps the current list
    async fn refresh<H: HttpClient>(&mut self, api: &CrmApi<H>) {
        match api.list_customers().await {
            Ok(customers) => self.customers = customers,
            Err(e) => tracing::warn!("Customer saved but list refresh failed: {e}"),
        }
    }

    pub async fn create<H: HttpClient>(
        &mut self,
        api: &CrmApi<H>,
        data: &CustomerCreate,
    ) -> ClientResult<Customer> {
        let created = api.create_customer(data).await?;
        self.refresh(api).await;
        Ok(created)
    }

    pub async fn update<H: HttpClient>(
        &mut self,
        api: &CrmApi<H>,
        id: &str,
        data: &CustomerUpdate,
    ) -> ClientResult<Customer> {
        let updated = api.update_customer(id, data).await?;
        self.refresh(api).await;
        Ok(updated)
    }

    pub async fn delete<H: HttpClient>(&mut self, api: &CrmApi<H>, id: &str) -> ClientResult<()> {
        api.delete_customer(id).await?;
        self.refresh(api).await;
        Ok(())
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Customers matching the current search term
    pub fn visible(&self) -> Vec<&Customer> {
        self.customers
            .iter()
            .filter(|c| c.matches_search(self.search.trim()))
            .collect()
    }

    pub fn view(&self) -> CustomerListView {
        let visible = self.visible();
        if visible.is_empty() {
            return if self.search.trim().is_empty() {
                CustomerListView::Empty {
                    title: "No customers yet",
                    hint: "Get started by adding your first customer.",
                }
            } else {
                CustomerListView::Empty {
                    title: "No customers found",
                    hint: "Try adjusting your search terms.",
                }
            };
        }
        CustomerListView::Cards(visible.into_iter().map(CustomerCard::from).collect())
    }
}

// =============================================================================
// Campaigns
// =============================================================================

/// One rendered campaign entry
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignCard {
    pub id: String,
    pub name: String,
    pub status: CampaignStatus,
    pub message_template: String,
    pub audience_size: String,
    pub sent: u64,
    pub failed: u64,
    pub created: String,
    pub updated: Option<String>,
    pub rules: Vec<String>,
}

impl From<&Campaign> for CampaignCard {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            status: c.status,
            message_template: c.message_template.clone(),
            audience_size: format_count(c.audience_size),
            sent: c.delivery_stats.sent,
            failed: c.delivery_stats.failed,
            created: format_timestamp(&c.created_at),
            updated: c.was_updated().then(|| format_timestamp(&c.updated_at)),
            rules: c.audience.summary_lines(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CampaignListView {
    Empty { title: &'static str, hint: &'static str },
    Cards(Vec<CampaignCard>),
}

#[derive(Debug, Default)]
pub struct CampaignBoard {
    campaigns: Vec<Campaign>,
}

impl CampaignBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reload<H: HttpClient>(&mut self, api: &CrmApi<H>) -> ClientResult<usize> {
        match api.list_campaigns().await {
            Ok(campaigns) => {
                tracing::debug!(count = campaigns.len(), "Campaigns loaded");
                self.campaigns = campaigns;
                Ok(self.campaigns.len())
            }
            Err(e) => {
                self.campaigns.clear();
                Err(e)
            }
        }
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn find(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    pub fn view(&self) -> CampaignListView {
        if self.campaigns.is_empty() {
            return CampaignListView::Empty {
                title: "No campaigns yet",
                hint: "Create your first campaign to start reaching your customers.",
            };
        }
        CampaignListView::Cards(self.campaigns.iter().map(CampaignCard::from).collect())
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reload<H: HttpClient>(&mut self, api: &CrmApi<H>) -> ClientResult<usize> {
        match api.list_orders().await {
            Ok(orders) => {
                self.orders = orders;
                Ok(self.orders.len())
            }
            Err(e) => {
                self.orders.clear();
                Err(e)
            }
        }
    }

    async fn refresh<H: HttpClient>(&mut self, api: &CrmApi<H>) {
        match api.list_orders().await {
            Ok(orders) => self.orders = orders,
            Err(e) => tracing::warn!("Order saved but list refresh failed: {e}"),
        }
    }

    pub async fn create<H: HttpClient>(
        &mut self,
        api: &CrmApi<H>,
        data: &OrderCreate,
    ) -> ClientResult<Order> {
        let created = api.create_order(data).await?;
        self.refresh(api).await;
        Ok(created)
    }

    pub async fn update<H: HttpClient>(
        &mut self,
        api: &CrmApi<H>,
        id: &str,
        data: &OrderUpdate,
    ) -> ClientResult<Order> {
        let updated = api.update_order(id, data).await?;
        self.refresh(api).await;
        Ok(updated)
    }

    pub async fn delete<H: HttpClient>(&mut self, api: &CrmApi<H>, id: &str) -> ClientResult<()> {
        api.delete_order(id).await?;
        self.refresh(api).await;
        Ok(())
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn for_customer(&self, customer_id: &str) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(42), "42");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1250.5), "$1,250.50");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }

    #[test]
    fn test_empty_directory_view() {
        let mut directory = CustomerDirectory::new();
        assert!(matches!(
            directory.view(),
            CustomerListView::Empty { title: "No customers yet", .. }
        ));
        directory.set_search("   ");
        assert!(matches!(
            directory.view(),
            CustomerListView::Empty { title: "No customers yet", .. }
        ));
        directory.set_search("zed");
        assert!(matches!(
            directory.view(),
            CustomerListView::Empty { title: "No customers found", .. }
        ));
    }

    #[test]
    fn test_empty_board_view() {
        assert!(matches!(
            CampaignBoard::new().view(),
            CampaignListView::Empty { title: "No campaigns yet", .. }
        ));
    }
}
