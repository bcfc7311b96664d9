//! Audience commands

use std::sync::Arc;

use anyhow::bail;
use crm_client::{
    AudiencePreviewer, ClientConfig, CrmApi, NetworkHttpClient, Notice, RuleEditor, Severity,
};
use serde_json::json;

use super::{connect, editor_from_args, fail, print_rules};
use crate::AudienceCommands;
use crate::output::OutputFormat;

pub async fn handle(
    action: AudienceCommands,
    config: &ClientConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let api = Arc::new(connect(config)?);

    match action {
        AudienceCommands::Preview { audience } => {
            let editor = editor_from_args(&audience)?;
            preview(&api, config, &editor, format).await
        }
        AudienceCommands::FromText { text, preview: also_preview } => {
            let mut editor = RuleEditor::new();
            let generated = editor
                .generate_from_text(&*api, &text)
                .await
                .map_err(|e| fail("generate rules", e))?;
            if !generated {
                bail!("Describe the audience you want to reach");
            }

            if format.is_json() && !also_preview {
                return format.print_json(editor.audience());
            }
            if !format.is_json() {
                println!("Generated rules ({}):", editor.combinator());
                print_rules(editor.audience());
            }
            if also_preview {
                preview(&api, config, &editor, format).await?;
            }
            Ok(())
        }
    }
}

async fn preview(
    api: &Arc<CrmApi<NetworkHttpClient>>,
    config: &ClientConfig,
    editor: &RuleEditor,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let previewer = AudiencePreviewer::from_config(Arc::clone(api), config);
    let result = previewer.preview_now(editor.audience()).await;
    let state = previewer.state();

    if let Err(e) = result {
        let notice = Notice::for_preview(&e);
        match notice.severity {
            Severity::Blocking => return Err(anyhow::Error::new(e).context(notice.message)),
            Severity::Silent => tracing::warn!("{}", notice.message),
        }
    }

    if format.is_json() {
        return format.print_json(&json!({
            "audience": editor.audience(),
            "audienceSize": state.audience_size,
        }));
    }
    println!("{}", state.describe(!editor.is_empty()));
    Ok(())
}
