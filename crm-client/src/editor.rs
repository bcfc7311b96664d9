//! Rule editor state holder
//!
//! Owns the working [`Audience`] and publishes a copy after every successful
//! mutation, so the previewer (or anything else) can follow along through a
//! `watch` receiver.

use shared::client::TextToRulesResponse;
use shared::{Audience, Combinator, Rule, RuleResult};
use tokio::sync::watch;

use crate::api::CrmApi;
use crate::http::HttpClient;
use crate::ClientResult;

#[derive(Debug)]
pub struct RuleEditor {
    audience: Audience,
    tx: watch::Sender<Audience>,
}

impl RuleEditor {
    pub fn new() -> Self {
        Self::with_audience(Audience::new())
    }

    pub fn with_audience(audience: Audience) -> Self {
        let (tx, _) = watch::channel(audience.clone());
        Self { audience, tx }
    }

    /// Receiver that observes every published audience
    pub fn subscribe(&self) -> watch::Receiver<Audience> {
        self.tx.subscribe()
    }

    pub fn audience(&self) -> &Audience {
        &self.audience
    }

    pub fn rules(&self) -> &[Rule] {
        self.audience.rules()
    }

    pub fn combinator(&self) -> Combinator {
        self.audience.combinator()
    }

    pub fn is_empty(&self) -> bool {
        self.audience.is_empty()
    }

    pub fn add_rule(&mut self) -> usize {
        let index = self.audience.add_rule();
        self.publish();
        index
    }

    pub fn update_rule(&mut self, index: usize, rule: Rule) -> RuleResult<()> {
        self.audience.update_rule(index, rule)?;
        self.publish();
        Ok(())
    }

    pub fn delete_rule(&mut self, index: usize) -> RuleResult<Rule> {
        let removed = self.audience.delete_rule(index)?;
        self.publish();
        Ok(removed)
    }

    pub fn move_rule(&mut self, from: usize, to: usize) -> RuleResult<()> {
        self.audience.move_rule(from, to)?;
        self.publish();
        Ok(())
    }

    /// Switching to the current combinator publishes nothing
    pub fn set_combinator(&mut self, combinator: Combinator) {
        if self.audience.combinator() != combinator {
            self.audience.set_combinator(combinator);
            self.publish();
        }
    }

    pub fn replace(&mut self, rules: Vec<Rule>, combinator: Combinator) {
        self.audience.replace(rules, combinator);
        self.publish();
    }

    pub fn clear(&mut self) {
        if !self.audience.is_empty() {
            self.audience.clear();
            self.publish();
        }
    }

    /// Adopt a rule set produced by text-to-rules
    pub fn apply_generated(&mut self, generated: TextToRulesResponse) {
        self.replace(generated.rules, generated.combinator);
    }

    /// Translate `text` remotely and adopt the result
    ///
    /// Blank text is ignored and reports `false`. On failure the current
    /// rules are left untouched.
    pub async fn generate_from_text<H: HttpClient>(
        &mut self,
        api: &CrmApi<H>,
        text: &str,
    ) -> ClientResult<bool> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        let generated = api.text_to_rules(text).await?;
        tracing::info!(
            rules = generated.rules.len(),
            combinator = %generated.combinator,
            "Generated audience rules from text"
        );
        self.apply_generated(generated);
        Ok(true)
    }

    fn publish(&self) {
        self.tx.send_replace(self.audience.clone());
    }
}

impl Default for RuleEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{RuleField, RuleOperator};

    #[test]
    fn test_mutations_are_published() {
        let mut editor = RuleEditor::new();
        let mut rx = editor.subscribe();
        assert!(!rx.has_changed().unwrap());

        editor.add_rule();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        let rule = Rule::new(RuleField::Visits, RuleOperator::GreaterOrEqual, 5);
        editor.update_rule(0, rule.clone()).unwrap();
        assert_eq!(rx.borrow_and_update().rules()[0], rule);
    }

    #[test]
    fn test_failed_mutation_publishes_nothing() {
        let mut editor = RuleEditor::new();
        let mut rx = editor.subscribe();
        assert!(editor.delete_rule(0).is_err());
        assert!(editor.move_rule(0, 1).is_err());
        assert!(!rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_same_combinator_is_not_a_change() {
        let mut editor = RuleEditor::new();
        let mut rx = editor.subscribe();
        editor.set_combinator(Combinator::And);
        assert!(!rx.has_changed().unwrap());
        editor.set_combinator(Combinator::Or);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().combinator(), Combinator::Or);
    }

    #[test]
    fn test_apply_generated_replaces_rules() {
        let mut editor = RuleEditor::new();
        editor.add_rule();
        editor.apply_generated(TextToRulesResponse {
            rules: vec![Rule::new(RuleField::LastPurchaseDate, RuleOperator::LessThan, "2024-01-01")],
            combinator: Combinator::Or,
        });
        assert_eq!(editor.rules().len(), 1);
        assert_eq!(editor.rules()[0].field, RuleField::LastPurchaseDate);
        assert_eq!(editor.combinator(), Combinator::Or);
    }
}
