//! Command handlers

pub mod audience;
pub mod campaigns;
pub mod customers;
pub mod orders;
pub mod session;

use anyhow::{Context, bail};
use crm_client::{
    Audience, ClientConfig, ClientError, CrmApi, NetworkHttpClient, Notice, Rule, RuleEditor,
    RuleField, RuleOperator, RuleValue,
};

use crate::AudienceArgs;

pub fn connect(config: &ClientConfig) -> anyhow::Result<CrmApi<NetworkHttpClient>> {
    config.build_api().context("Failed to build HTTP client")
}

/// Attach the user-facing notice for `action` to a client error
pub fn fail(action: &str, err: ClientError) -> anyhow::Error {
    let notice = Notice::for_action(action, &err);
    anyhow::Error::new(err).context(notice.message)
}

/// Parse `"totalSpend > 1000"` into a rule
pub fn parse_rule(input: &str) -> anyhow::Result<Rule> {
    let mut parts = input.split_whitespace();
    let (Some(field), Some(operator)) = (parts.next(), parts.next()) else {
        bail!("Rule must look like \"field operator value\", got {input:?}");
    };
    let value = parts.collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        bail!("Rule {input:?} has no value");
    }

    let field: RuleField = field.parse()?;
    let operator: RuleOperator = operator.parse()?;
    let rule = Rule::new(field, operator, RuleValue::parse(&value));
    if rule.value_kind_mismatch() {
        tracing::warn!(rule = %rule, "Value does not look like a {}", field.label());
    }
    Ok(rule)
}

/// Build an editor holding the rules given on the command line
pub fn editor_from_args(args: &AudienceArgs) -> anyhow::Result<RuleEditor> {
    let rules = args
        .rules
        .iter()
        .map(|r| parse_rule(r))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(RuleEditor::with_audience(Audience::with_rules(
        rules,
        args.combinator.into(),
    )))
}

pub fn print_rules(audience: &Audience) {
    if audience.is_empty() {
        println!("(no rules)");
        return;
    }
    for line in audience.summary_lines() {
        println!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule() {
        let rule = parse_rule("totalSpend > 1000").unwrap();
        assert_eq!(rule, Rule::new(RuleField::TotalSpend, RuleOperator::GreaterThan, 1000));

        let rule = parse_rule("lastPurchaseDate <= 2024-01-31").unwrap();
        assert_eq!(rule.value, RuleValue::text("2024-01-31"));

        assert!(parse_rule("totalSpend >").is_err());
        assert!(parse_rule("age > 3").is_err());
        assert!(parse_rule("visits ~ 3").is_err());
    }
}
