//! Prompt template for budget insights.

use civicspend_shared::{fixed, format_magnitude};
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{InsightRow, Instructions};

/// Totals across every supplied row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptTotals {
    /// Sum of allocations.
    pub allocated: Decimal,
    /// Sum of spending.
    pub used: Decimal,
    /// Sum of remaining amounts.
    pub remaining: Decimal,
}

impl PromptTotals {
    /// Sums saturate at the `Decimal` bounds.
    fn of(rows: &[InsightRow]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            allocated: acc.allocated.saturating_add(row.budget_a),
            used: acc.used.saturating_add(row.used_amt),
            remaining: acc.remaining.saturating_add(row.remaining_amt),
        })
    }
}

/// A rendered prompt plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Full prompt text.
    pub text: String,
    /// Totals embedded in the summary section.
    pub totals: PromptTotals,
    /// Rows listed in the detailed section.
    pub rows_included: usize,
    /// Rows left out of the detailed section.
    pub rows_omitted: usize,
}

#[derive(Serialize)]
struct PromptLine<'a> {
    account: &'a str,
    glcode: &'a str,
    account_description: &'a str,
    allocated: String,
    used: String,
    remaining: String,
    used_percent: String,
}

impl<'a> PromptLine<'a> {
    fn new(row: &'a InsightRow) -> Self {
        Self {
            account: row.account(),
            glcode: row.glcode(),
            account_description: row.description(),
            allocated: format_magnitude(row.budget_a),
            used: format_magnitude(row.used_amt),
            remaining: format_magnitude(row.remaining_amt),
            used_percent: used_percent(row.used_amt, row.budget_a),
        }
    }
}

/// Spending as a share of the row's own allocation, one decimal place.
///
/// `"0"` when nothing was allocated.
#[must_use]
pub fn used_percent(used: Decimal, allocated: Decimal) -> String {
    if allocated <= Decimal::ZERO {
        return "0".to_string();
    }
    used.checked_div(allocated)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or_else(|| "0".to_string(), |pct| fixed(pct, 1))
}

impl Instructions {
    fn persona(self) -> &'static str {
        match self {
            Self::PlainSummary => "You are a financial analyst AI.",
            Self::AnalystBrief => "You are a senior municipal finance analyst.",
            Self::CitizenDigest => "You explain city budgets to residents in everyday words.",
        }
    }

    fn tasks(self) -> &'static [&'static str] {
        match self {
            Self::PlainSummary => &[
                "Provide a concise, easy-to-read summary of the department's spending.",
                "Highlight the most significant spending areas (the top 3 accounts by amount spent).",
                "Point out any surprising things in the data, like a lot of money not spent or money being overspent.",
                "Offer one simple, actionable idea for how the department could handle its money better.",
            ],
            Self::AnalystBrief => &[
                "Summarise overall utilisation of the department's allocation.",
                "Identify the top 3 accounts by amount spent and their share of total spending.",
                "Flag accounts above 90% utilisation or already overspent, and accounts below 25% utilisation.",
                "Note any line where the remaining amount does not match allocation minus spending.",
                "Recommend up to two concrete budget-control actions.",
            ],
            Self::CitizenDigest => &[
                "Say in one sentence what most of this department's money was spent on.",
                "Mention anything a resident would find surprising, such as unspent or overspent money.",
            ],
        }
    }

    fn closing(self) -> &'static str {
        match self {
            Self::PlainSummary => {
                "Your response should be short (around 5-8 sentences), clear, and should not use complex financial terms."
            }
            Self::AnalystBrief => {
                "Respond in short bullet points grouped under Utilisation, Risks and Actions."
            }
            Self::CitizenDigest => {
                "Keep the whole answer to 2-3 sentences with no jargon and no bullet points."
            }
        }
    }
}

/// Builds the insight prompt for `department`.
///
/// Totals cover every row. When there are more than `max_rows` rows, only
/// the `max_rows` with the highest spending are listed in detail and the
/// prompt says how many were left out.
#[must_use]
pub fn build_prompt(
    department: &str,
    rows: &[InsightRow],
    instructions: Instructions,
    max_rows: usize,
) -> Prompt {
    let totals = PromptTotals::of(rows);

    let mut listed: Vec<&InsightRow> = rows.iter().collect();
    if listed.len() > max_rows {
        listed.sort_by(|a, b| b.used_amt.cmp(&a.used_amt));
        listed.truncate(max_rows);
    }
    let rows_omitted = rows.len() - listed.len();

    let lines: Vec<PromptLine<'_>> = listed.iter().map(|row| PromptLine::new(row)).collect();
    let detail = serde_json::to_string_pretty(&lines).unwrap_or_else(|_| "[]".to_string());

    let mut text = String::new();
    text.push_str(instructions.persona());
    text.push('\n');
    text.push_str(&format!(
        "Your job is to summarize the budget data for the department: \"{department}\".\n\n"
    ));
    text.push_str("SUMMARY OF TOTALS:\n");
    text.push_str(&format!(
        "- Total Allocated: {}\n",
        format_magnitude(totals.allocated)
    ));
    text.push_str(&format!("- Total Used: {}\n", format_magnitude(totals.used)));
    text.push_str(&format!(
        "- Total Remaining: {}\n\n",
        format_magnitude(totals.remaining)
    ));
    text.push_str("DETAILED DATA:\n");
    text.push_str(&detail);
    text.push('\n');
    if rows_omitted > 0 {
        text.push_str(&format!(
            "({rows_omitted} smaller line items omitted; they are included in the totals above.)\n"
        ));
    }
    text.push_str("\nTASK:\n");
    for (idx, task) in instructions.tasks().iter().enumerate() {
        text.push_str(&format!("{}. {task}\n", idx + 1));
    }
    text.push('\n');
    text.push_str(instructions.closing());
    text.push('\n');

    Prompt {
        text,
        totals,
        rows_included: listed.len(),
        rows_omitted,
    }
}
