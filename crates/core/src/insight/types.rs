//! Insight request types.
//!
//! Clients post whatever row objects they rendered. These types accept that
//! loosely once at the boundary so everything downstream is typed.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder for absent text fields.
pub const UNKNOWN: &str = "Unknown";

/// A budget row as supplied to the insight endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InsightRow {
    /// Department (category).
    #[serde(default, deserialize_with = "lenient_text")]
    pub account: Option<String>,
    /// General-ledger code.
    #[serde(default, deserialize_with = "lenient_text")]
    pub glcode: Option<String>,
    /// Display label.
    #[serde(default, deserialize_with = "lenient_text")]
    pub account_budget_a: Option<String>,
    /// Allocated amount.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub budget_a: Decimal,
    /// Amount spent.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub used_amt: Decimal,
    /// Amount left.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub remaining_amt: Decimal,
}

impl InsightRow {
    /// Department, or `"Unknown"`.
    #[must_use]
    pub fn account(&self) -> &str {
        self.account.as_deref().unwrap_or(UNKNOWN)
    }

    /// GL code, or `"Unknown"`.
    #[must_use]
    pub fn glcode(&self) -> &str {
        self.glcode.as_deref().unwrap_or(UNKNOWN)
    }

    /// Display label, or `"Unknown"`.
    #[must_use]
    pub fn description(&self) -> &str {
        self.account_budget_a.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Prompt instruction set.
///
/// Each variant is a complete task list for the same data template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instructions {
    /// Short plain-language summary with top accounts and one suggestion.
    #[default]
    PlainSummary,
    /// Formal analyst briefing focused on utilisation and variance.
    AnalystBrief,
    /// Two or three sentences for residents.
    CitizenDigest,
}

/// Body of an insight request: `{budgetData, department, style?}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    /// Rows to summarise. Anything but an array reads as absent.
    #[serde(default, deserialize_with = "lenient_rows")]
    pub budget_data: Option<Vec<InsightRow>>,
    /// Department name used in the prompt.
    #[serde(default)]
    pub department: Option<String>,
    /// Instruction set; defaults to [`Instructions::PlainSummary`].
    #[serde(default)]
    pub style: Option<Instructions>,
}

fn lenient_rows<'de, D>(deserializer: D) -> Result<Option<Vec<InsightRow>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
                _ => InsightRow::default(),
            })
            .collect(),
    ))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(amount_from_value(&Value::deserialize(deserializer)?))
}

/// Numbers and numeric strings convert; anything else is zero.
fn amount_from_value(value: &Value) -> Decimal {
    let parse = |raw: &str| {
        let raw = raw.trim();
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .unwrap_or(Decimal::ZERO)
    };
    match value {
        Value::Number(n) => parse(&n.to_string()),
        Value::String(s) => parse(s),
        Value::Bool(true) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}
