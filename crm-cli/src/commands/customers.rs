//! Customer commands

use anyhow::bail;
use crm_client::{ClientConfig, CustomerDirectory, CustomerListView};
use shared::models::{CustomerCreate, CustomerUpdate};

use super::{connect, fail};
use crate::CustomerCommands;
use crate::output::{OutputFormat, print_empty, print_table};

pub async fn handle(
    action: CustomerCommands,
    config: &ClientConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let api = connect(config)?;
    let mut directory = CustomerDirectory::new();

    match action {
        CustomerCommands::List { search } => {
            directory
                .reload(&api)
                .await
                .map_err(|e| fail("load customers", e))?;
            directory.set_search(search.unwrap_or_default());

            if format.is_json() {
                return format.print_json(&directory.visible());
            }
            match directory.view() {
                CustomerListView::Empty { title, hint } => print_empty(title, hint),
                CustomerListView::Cards(cards) => {
                    let rows: Vec<Vec<String>> = cards
                        .into_iter()
                        .map(|c| {
                            vec![
                                c.id,
                                c.name,
                                c.email,
                                c.phone,
                                c.total_spend,
                                c.visits.to_string(),
                                c.last_purchase,
                            ]
                        })
                        .collect();
                    print_table(
                        &["ID", "NAME", "EMAIL", "PHONE", "TOTAL SPEND", "VISITS", "LAST PURCHASE"],
                        &rows,
                    );
                }
            }
        }
        CustomerCommands::Show { id } => {
            let customer = api
                .get_customer(&id)
                .await
                .map_err(|e| fail("load customer", e))?;
            format.print_json(&customer)?;
        }
        CustomerCommands::Create { name, email, phone } => {
            let data = CustomerCreate { name, email, phone };
            let customer = directory
                .create(&api, &data)
                .await
                .map_err(|e| fail("create customer", e))?;
            tracing::info!(id = %customer.id, "Customer created");
            println!("Created customer: {}", customer.id);
        }
        CustomerCommands::Update {
            id,
            name,
            email,
            phone,
        } => {
            let data = CustomerUpdate { name, email, phone };
            if data.is_empty() {
                bail!("Nothing to update; pass --name, --email or --phone");
            }
            let customer = directory
                .update(&api, &id, &data)
                .await
                .map_err(|e| fail("update customer", e))?;
            println!("Updated customer: {}", customer.id);
        }
        CustomerCommands::Delete { id } => {
            directory
                .delete(&api, &id)
                .await
                .map_err(|e| fail("delete customer", e))?;
            println!("Deleted customer: {id}");
        }
    }
    Ok(())
}
