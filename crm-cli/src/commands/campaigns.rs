//! Campaign commands

use crm_client::{CampaignBoard, CampaignComposer, CampaignListView, ClientConfig};

use super::{connect, editor_from_args, fail, print_rules};
use crate::CampaignCommands;
use crate::output::{OutputFormat, print_empty, print_table};

pub async fn handle(
    action: CampaignCommands,
    config: &ClientConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let api = connect(config)?;
    let mut board = CampaignBoard::new();

    match action {
        CampaignCommands::List => {
            board.reload(&api).await.map_err(|e| fail("load campaigns", e))?;
            if format.is_json() {
                return format.print_json(&board.campaigns());
            }
            match board.view() {
                CampaignListView::Empty { title, hint } => print_empty(title, hint),
                CampaignListView::Cards(cards) => {
                    let rows: Vec<Vec<String>> = cards
                        .into_iter()
                        .map(|c| {
                            vec![
                                c.id,
                                c.name,
                                c.status.to_string(),
                                c.audience_size,
                                c.sent.to_string(),
                                c.failed.to_string(),
                                c.created,
                                c.rules.join(" "),
                            ]
                        })
                        .collect();
                    print_table(
                        &["ID", "NAME", "STATUS", "AUDIENCE", "SENT", "FAILED", "CREATED", "RULES"],
                        &rows,
                    );
                }
            }
        }
        CampaignCommands::Create {
            name,
            message,
            audience,
        } => {
            let editor = editor_from_args(&audience)?;
            let mut composer = CampaignComposer::new();
            composer.open();
            let form = composer.form_mut();
            form.name = name;
            form.message_template = message;

            let campaign = composer
                .submit(&api, editor.audience(), &mut board)
                .await
                .map_err(|e| fail("create campaign", e))?;

            if format.is_json() {
                return format.print_json(&campaign);
            }
            println!("Created campaign {} ({})", campaign.name, campaign.id);
            print_rules(&campaign.audience);
        }
    }
    Ok(())
}
