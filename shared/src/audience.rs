//! Audience rule model
//!
//! An [`Audience`] is an ordered sequence of [`Rule`] comparisons joined by a
//! single global [`Combinator`]. Order only matters for display; the
//! combinator applies uniformly to the whole sequence and there is no
//! per-pair precedence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RuleError, RuleResult};

/// Customer attribute a rule compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum RuleField {
    #[default]
    TotalSpend,
    Visits,
    LastPurchaseDate,
}

/// How a rule value is interpreted for a given field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Date,
}

impl RuleField {
    pub const ALL: [RuleField; 3] = [Self::TotalSpend, Self::Visits, Self::LastPurchaseDate];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalSpend => "totalSpend",
            Self::Visits => "visits",
            Self::LastPurchaseDate => "lastPurchaseDate",
        }
    }

    /// Human label used by pickers
    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalSpend => "Total Spend",
            Self::Visits => "Visits",
            Self::LastPurchaseDate => "Last Purchase Date",
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::TotalSpend | Self::Visits => ValueKind::Number,
            Self::LastPurchaseDate => ValueKind::Date,
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RuleOperator {
    #[default]
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl RuleOperator {
    pub const ALL: [RuleOperator; 6] = [
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterOrEqual,
        Self::LessOrEqual,
        Self::Equal,
        Self::NotEqual,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GreaterThan => "Greater than",
            Self::LessThan => "Less than",
            Self::GreaterOrEqual => "Greater than or equal",
            Self::LessOrEqual => "Less than or equal",
            Self::Equal => "Equal to",
            Self::NotEqual => "Not equal to",
        }
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for RuleOperator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| RuleError::UnknownOperator(s.to_string()))
    }
}

impl std::str::FromStr for RuleField {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| RuleError::UnknownField(s.to_string()))
    }
}

/// Rule operand: a JSON number or a string (dates travel as `YYYY-MM-DD`)
///
/// Numbers are held as [`serde_json::Number`] so integers round-trip without
/// picking up a fractional part on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Number(serde_json::Number),
    Text(String),
}

impl RuleValue {
    pub fn int(value: i64) -> Self {
        Self::Number(value.into())
    }

    /// Non-finite floats have no JSON form and fall back to zero.
    pub fn float(value: f64) -> Self {
        Self::Number(serde_json::Number::from_f64(value).unwrap_or_else(|| 0.into()))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Parse user input: numeric text becomes a number, anything else stays text
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::int(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Self::float(f),
            _ => Self::Text(input.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            Self::Number(_) => None,
        }
    }

    /// Whether the value can be read as the given kind
    pub fn fits(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::Number => self.as_f64().is_some(),
            ValueKind::Date => self.as_date().is_some(),
        }
    }
}

impl Default for RuleValue {
    fn default() -> Self {
        Self::int(0)
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        Self::int(value)
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        Self::int(value.into())
    }
}

impl From<u64> for RuleValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

/// A single field/operator/value comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Rule {
    pub field: RuleField,
    pub operator: RuleOperator,
    pub value: RuleValue,
}

impl Rule {
    pub fn new(field: RuleField, operator: RuleOperator, value: impl Into<RuleValue>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }

    /// Copy of this rule with a different field; operator and value are kept as-is
    pub fn with_field(&self, field: RuleField) -> Self {
        Self {
            field,
            ..self.clone()
        }
    }

    pub fn with_operator(&self, operator: RuleOperator) -> Self {
        Self {
            operator,
            ..self.clone()
        }
    }

    pub fn with_value(&self, value: impl Into<RuleValue>) -> Self {
        Self {
            value: value.into(),
            ..self.clone()
        }
    }

    /// True when the value no longer reads as the field's kind,
    /// e.g. a numeric value left behind after switching to `lastPurchaseDate`.
    pub fn value_kind_mismatch(&self) -> bool {
        !self.value.fits(self.field.value_kind())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Global boolean operator joining every rule of an audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Combinator {
    #[default]
    #[serde(rename = "$and")]
    And,
    #[serde(rename = "$or")]
    Or,
}

impl Combinator {
    pub fn label(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A complete, serializable audience query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Audience {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub combinator: Combinator,
}

impl Audience {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Rule>, combinator: Combinator) -> Self {
        Self { rules, combinator }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append the default rule (`totalSpend > 0`) and return its index
    pub fn add_rule(&mut self) -> usize {
        self.rules.push(Rule::default());
        self.rules.len() - 1
    }

    /// Replace the rule at `index` wholesale
    pub fn update_rule(&mut self, index: usize, rule: Rule) -> RuleResult<()> {
        let len = self.rules.len();
        let slot = self
            .rules
            .get_mut(index)
            .ok_or(RuleError::InvalidIndex { index, len })?;
        *slot = rule;
        Ok(())
    }

    /// Remove the rule at `index`; later rules shift down by one
    pub fn delete_rule(&mut self, index: usize) -> RuleResult<Rule> {
        self.check_index(index)?;
        Ok(self.rules.remove(index))
    }

    /// Remove the rule at `from` and reinsert it at `to`
    ///
    /// `to` is the final position of the moved rule, so both indices must be
    /// below the current length.
    pub fn move_rule(&mut self, from: usize, to: usize) -> RuleResult<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let rule = self.rules.remove(from);
        self.rules.insert(to, rule);
        Ok(())
    }

    pub fn set_combinator(&mut self, combinator: Combinator) {
        self.combinator = combinator;
    }

    /// Swap in a whole rule set, e.g. one produced by text-to-rules
    pub fn replace(&mut self, rules: Vec<Rule>, combinator: Combinator) {
        self.rules = rules;
        self.combinator = combinator;
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Detached copy; later edits to `self` never reach the snapshot
    pub fn snapshot(&self) -> Audience {
        self.clone()
    }

    /// One line per rule, with the combinator label trailing every line but the last
    pub fn summary_lines(&self) -> Vec<String> {
        let last = self.rules.len().saturating_sub(1);
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                if i < last {
                    format!("{rule} {}", self.combinator)
                } else {
                    rule.to_string()
                }
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> RuleResult<()> {
        if index < self.rules.len() {
            Ok(())
        } else {
            Err(RuleError::InvalidIndex {
                index,
                len: self.rules.len(),
            })
        }
    }
}
