//! Campaign composition
//!
//! [`CampaignComposer`] holds the creation form and turns it, together with
//! the current audience, into a create-campaign call.

use shared::Audience;
use shared::client::CreateCampaignRequest;
use shared::models::Campaign;

use crate::api::CrmApi;
use crate::collections::CampaignBoard;
use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

pub const MISSING_RULES: &str = "Please add at least one rule before creating a campaign.";
pub const MISSING_DETAILS: &str = "Please fill in all campaign details.";

/// Campaign creation form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignForm {
    pub name: String,
    pub message_template: String,
}

impl CampaignForm {
    pub fn new(name: impl Into<String>, message_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message_template: message_template.into(),
        }
    }

    /// Pre-flight check, rules first
    pub fn validate(&self, audience: &Audience) -> ClientResult<()> {
        if audience.is_empty() {
            return Err(ClientError::validation(MISSING_RULES));
        }
        if self.name.trim().is_empty() || self.message_template.trim().is_empty() {
            return Err(ClientError::validation(MISSING_DETAILS));
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.message_template.clear();
    }
}

#[derive(Debug, Default)]
pub struct CampaignComposer {
    form: CampaignForm,
    open: bool,
}

impl CampaignComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close without submitting; typed values are kept
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn form(&self) -> &CampaignForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CampaignForm {
        &mut self.form
    }

    /// Create a campaign targeting a snapshot of `audience`
    ///
    /// Nothing is sent when validation fails. After a successful create the
    /// board is reloaded, the form cleared and the composer closed; a failed
    /// reload does not fail the submission. On any error the form is kept.
    pub async fn submit<H: HttpClient>(
        &mut self,
        api: &CrmApi<H>,
        audience: &Audience,
        board: &mut CampaignBoard,
    ) -> ClientResult<Campaign> {
        self.form.validate(audience)?;

        let req = CreateCampaignRequest {
            name: self.form.name.clone(),
            audience: audience.snapshot(),
            message_template: self.form.message_template.clone(),
        };
        let campaign = api
            .create_campaign(&req)
            .await
            .map_err(ClientError::for_session_flow)?;

        tracing::info!(
            campaign_id = %campaign.id,
            name = %campaign.name,
            rules = req.audience.len(),
            "Campaign created"
        );

        if let Err(e) = board.reload(api).await {
            tracing::warn!("Campaign created but list refresh failed: {e}");
        }

        self.form.reset();
        self.dismiss();
        Ok(campaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Combinator, Rule, RuleField, RuleOperator};

    fn audience() -> Audience {
        Audience::with_rules(
            vec![Rule::new(RuleField::Visits, RuleOperator::GreaterThan, 3)],
            Combinator::And,
        )
    }

    #[test]
    fn test_rules_are_checked_first() {
        let form = CampaignForm::default();
        let err = form.validate(&Audience::new()).unwrap_err();
        assert_eq!(err.to_string(), format!("Validation error: {MISSING_RULES}"));
    }

    #[test]
    fn test_blank_fields_rejected() {
        let form = CampaignForm::new("  ", "Hi {{name}}");
        assert!(matches!(
            form.validate(&audience()),
            Err(ClientError::Validation(m)) if m == MISSING_DETAILS
        ));

        let form = CampaignForm::new("Spring sale", "");
        assert!(form.validate(&audience()).is_err());

        let form = CampaignForm::new("Spring sale", "Hi {{name}}");
        assert!(form.validate(&audience()).is_ok());
    }

    #[test]
    fn test_dismiss_keeps_form() {
        let mut composer = CampaignComposer::new();
        composer.open();
        composer.form_mut().name = "Draft".into();
        composer.dismiss();
        assert!(!composer.is_open());
        assert_eq!(composer.form().name, "Draft");
    }
}
