//! Order commands

use crm_client::{ClientConfig, OrderBook, format_currency};
use shared::models::{Order, OrderCreate, OrderUpdate};

use super::{connect, fail};
use crate::OrderCommands;
use crate::output::{OutputFormat, print_empty, print_table};

pub async fn handle(
    action: OrderCommands,
    config: &ClientConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let api = connect(config)?;
    let mut book = OrderBook::new();

    match action {
        OrderCommands::List { customer } => {
            book.reload(&api).await.map_err(|e| fail("load orders", e))?;
            let orders: Vec<&Order> = match &customer {
                Some(id) => book.for_customer(id),
                None => book.orders().iter().collect(),
            };

            if format.is_json() {
                return format.print_json(&orders);
            }
            if orders.is_empty() {
                print_empty("No orders yet", "Orders appear here once customers purchase.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = orders
                .iter()
                .map(|o| {
                    vec![
                        o.id.clone(),
                        o.order_number.clone(),
                        o.customer_id.clone(),
                        format_currency(o.total_amount),
                        o.items.len().to_string(),
                        o.created_at.format("%Y-%m-%d").to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "NUMBER", "CUSTOMER", "TOTAL", "ITEMS", "CREATED"], &rows);
        }
        OrderCommands::Show { id } => {
            let order = api.get_order(&id).await.map_err(|e| fail("load order", e))?;
            format.print_json(&order)?;
        }
        OrderCommands::Create {
            customer,
            number,
            amount,
            items,
        } => {
            let data = OrderCreate {
                customer_id: customer,
                order_number: number,
                total_amount: amount,
                items,
            };
            let order = book
                .create(&api, &data)
                .await
                .map_err(|e| fail("create order", e))?;
            println!("Created order: {}", order.id);
        }
        OrderCommands::Update { id, number, amount } => {
            let data = OrderUpdate {
                order_number: number,
                total_amount: amount,
                ..Default::default()
            };
            let order = book
                .update(&api, &id, &data)
                .await
                .map_err(|e| fail("update order", e))?;
            println!("Updated order: {}", order.id);
        }
        OrderCommands::Delete { id } => {
            book.delete(&api, &id).await.map_err(|e| fail("delete order", e))?;
            println!("Deleted order: {id}");
        }
    }
    Ok(())
}
