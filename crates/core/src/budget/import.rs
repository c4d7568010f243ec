//! CSV normalization for budget uploads.
//!
//! Each non-blank physical line is one record and the first is the header.
//! Header names are trimmed and lower-cased, column order is free, and extra
//! columns are ignored. Data records are lenient: lines with the wrong field
//! count are skipped, and amounts that do not parse count as zero. Both
//! leniencies are tallied so callers can surface them.

use std::collections::HashMap;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::ImportError;
use super::types::NewBudgetRow;

/// Columns every upload must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "account",
    "glcode",
    "budget_a",
    "used_amt",
    "remaining_amt",
];

/// Result of normalizing one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImport {
    /// Accepted rows, in file order.
    pub rows: Vec<NewBudgetRow>,
    /// Data lines dropped for a field-count mismatch or a blank account/GL code.
    pub skipped_rows: usize,
    /// Amount cells that were empty or unparseable and became zero.
    pub defaulted_amounts: usize,
}

/// Header positions of the required columns.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    account: usize,
    glcode: usize,
    budget_a: usize,
    used_amt: usize,
    remaining_amt: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, ImportError> {
        // Last occurrence wins for duplicated names.
        let positions: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !positions.contains_key(*col))
            .map(|col| (*col).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        Ok(Self {
            account: positions["account"],
            glcode: positions["glcode"],
            budget_a: positions["budget_a"],
            used_amt: positions["used_amt"],
            remaining_amt: positions["remaining_amt"],
        })
    }
}

/// Parses an amount cell, ignoring `$` and thousands separators.
///
/// Returns `None` for empty or unparseable input.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

/// Normalizes the text of an uploaded CSV into budget rows.
///
/// # Errors
///
/// - [`ImportError::Empty`] when there is no header line
/// - [`ImportError::MissingColumns`] listing every absent required column
/// - [`ImportError::NoValidRows`] when no data line survives
pub fn normalize_csv(content: &str) -> Result<CsvImport, ImportError> {
    let content = content.trim_start_matches('\u{feff}').trim();
    if content.is_empty() {
        return Err(ImportError::Empty);
    }

    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(Trim::All);

    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let header = match lines.next().map(|line| read_line(&builder, line)) {
        Some(Ok(Some(record))) => record,
        Some(Err(e)) => return Err(ImportError::MalformedHeader(e.to_string())),
        Some(Ok(None)) | None => return Err(ImportError::Empty),
    };
    let headers: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    debug!(?headers, "CSV headers");

    let columns = ColumnIndex::resolve(&headers)?;

    let mut import = CsvImport {
        rows: Vec::new(),
        skipped_rows: 0,
        defaulted_amounts: 0,
    };

    for line in lines {
        let record = match read_line(&builder, line) {
            Ok(Some(record)) if record.len() == headers.len() => record,
            Ok(_) => {
                import.skipped_rows += 1;
                continue;
            }
            Err(e) => {
                debug!(error = %e, "Unreadable CSV line skipped");
                import.skipped_rows += 1;
                continue;
            }
        };

        match normalize_record(&record, columns, &mut import.defaulted_amounts) {
            Some(row) => import.rows.push(row),
            None => import.skipped_rows += 1,
        }
    }

    debug!(
        parsed = import.rows.len(),
        skipped = import.skipped_rows,
        defaulted = import.defaulted_amounts,
        "CSV normalized"
    );

    if import.rows.is_empty() {
        return Err(ImportError::NoValidRows);
    }
    Ok(import)
}

/// Reads one physical line as a record. Quotes never continue past the line.
fn read_line(builder: &ReaderBuilder, line: &str) -> Result<Option<StringRecord>, csv::Error> {
    builder.from_reader(line.as_bytes()).records().next().transpose()
}

fn normalize_record(
    record: &StringRecord,
    columns: ColumnIndex,
    defaulted: &mut usize,
) -> Option<NewBudgetRow> {
    let field = |idx: usize| record.get(idx).unwrap_or_default().trim();

    let account = field(columns.account);
    let glcode = field(columns.glcode);
    if account.is_empty() || glcode.is_empty() {
        return None;
    }

    let mut amount = |idx: usize| {
        parse_amount(field(idx)).unwrap_or_else(|| {
            *defaulted += 1;
            Decimal::ZERO
        })
    };

    Some(NewBudgetRow {
        account: account.to_string(),
        glcode: glcode.to_string(),
        account_budget_a: amount(columns.budget_a),
        used_amt: amount(columns.used_amt),
        remaining_amt: amount(columns.remaining_amt),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    const HEADER: &str = "account,glcode,budget_a,used_amt,remaining_amt";

    #[test]
    fn test_parks_row_normalizes() {
        let csv = format!("{HEADER}\nParks,100,\"$1,000\",500,500");
        let import = normalize_csv(&csv).unwrap();

        assert_eq!(
            import.rows,
            vec![NewBudgetRow {
                account: "Parks".into(),
                glcode: "100".into(),
                account_budget_a: dec!(1000),
                used_amt: dec!(500),
                remaining_amt: dec!(500),
            }]
        );
        assert_eq!(import.skipped_rows, 0);
        assert_eq!(import.defaulted_amounts, 0);
    }

    #[test]
    fn test_unquoted_thousands_separator_skips_line() {
        let csv = format!("{HEADER}\nParks,100,$1,000,500,500\nRoads,200,10,5,5");
        let import = normalize_csv(&csv).unwrap();
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.rows[0].account, "Roads");
        assert_eq!(import.skipped_rows, 1);
    }

    #[test]
    fn test_headers_are_case_insensitive_and_unordered() {
        let csv = " Used_Amt , ACCOUNT,Remaining_Amt,GLCode,Budget_A,notes\n\
                   40,Water,60,300,100,ignored";
        let import = normalize_csv(csv).unwrap();
        let row = &import.rows[0];
        assert_eq!(row.account, "Water");
        assert_eq!(row.glcode, "300");
        assert_eq!(row.account_budget_a, dec!(100));
        assert_eq!(row.used_amt, dec!(40));
        assert_eq!(row.remaining_amt, dec!(60));
    }

    #[test]
    fn test_missing_glcode_lists_exactly_glcode() {
        let csv = "account,budget_a,used_amt,remaining_amt\nParks,1,1,1";
        let err = normalize_csv(csv).unwrap_err();
        assert_eq!(err, ImportError::MissingColumns(vec!["glcode".into()]));
    }

    #[test]
    fn test_missing_columns_keep_required_order() {
        let err = normalize_csv("remaining_amt,account\nx,y").unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingColumns(vec![
                "glcode".into(),
                "budget_a".into(),
                "used_amt".into()
            ])
        );
    }

    #[test]
    fn test_rows_without_account_or_glcode_are_dropped() {
        let csv = format!("{HEADER}\n,100,1,1,1\nParks,,1,1,1\nParks,100,1,1,1");
        let import = normalize_csv(&csv).unwrap();
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.skipped_rows, 2);
    }

    #[test]
    fn test_unparseable_amounts_default_to_zero() {
        let csv = format!("{HEADER}\nParks,100,n/a,,12.5");
        let import = normalize_csv(&csv).unwrap();
        let row = &import.rows[0];
        assert_eq!(row.account_budget_a, Decimal::ZERO);
        assert_eq!(row.used_amt, Decimal::ZERO);
        assert_eq!(row.remaining_amt, dec!(12.5));
        assert_eq!(import.defaulted_amounts, 2);
    }

    #[test]
    fn test_no_valid_rows() {
        let csv = format!("{HEADER}\nonly,three,fields");
        assert_eq!(normalize_csv(&csv).unwrap_err(), ImportError::NoValidRows);
        assert_eq!(normalize_csv(HEADER).unwrap_err(), ImportError::NoValidRows);
    }

    #[test]
    fn test_empty_upload() {
        assert_eq!(normalize_csv("").unwrap_err(), ImportError::Empty);
        assert_eq!(normalize_csv(" \n\n ").unwrap_err(), ImportError::Empty);
    }

    #[test]
    fn test_byte_order_mark_and_crlf() {
        let csv = format!("\u{feff}{HEADER}\r\nParks,100,10,5,5\r\n");
        let import = normalize_csv(&csv).unwrap();
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.rows[0].remaining_amt, dec!(5));
    }

    #[test]
    fn test_stray_quote_stays_on_its_line() {
        let csv = format!("{HEADER}\n\"Parks,100,1,1,1\nRoads,200,2,2,2\nWater,300,3,3,3");
        let import = normalize_csv(&csv).unwrap();
        let accounts: Vec<&str> = import.rows.iter().map(|r| r.account.as_str()).collect();
        assert_eq!(accounts, vec!["Roads", "Water"]);
        assert_eq!(import.skipped_rows, 1);
    }

    #[test]
    fn test_stray_quote_mid_file_keeps_following_lines() {
        let csv = format!(
            "{HEADER}\nRoads,200,2,2,2\nParks,\"100,1,1,1\nWater,300,3,3,3\nSewer,400,4,4,4"
        );
        let import = normalize_csv(&csv).unwrap();
        let accounts: Vec<&str> = import.rows.iter().map(|r| r.account.as_str()).collect();
        assert_eq!(accounts, vec!["Roads", "Water", "Sewer"]);
        assert_eq!(import.skipped_rows, 1);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let csv = format!("{HEADER}\n\nParks,100,1,1,1\n   \nRoads,200,2,2,2");
        let import = normalize_csv(&csv).unwrap();
        assert_eq!(import.rows.len(), 2);
        assert_eq!(import.skipped_rows, 0);
    }

    #[rstest]
    #[case("1000", Some(dec!(1000)))]
    #[case("$1,000", Some(dec!(1000)))]
    #[case(" $12,345.67 ", Some(dec!(12345.67)))]
    #[case("-250", Some(dec!(-250)))]
    #[case("1e3", Some(dec!(1000)))]
    #[case("", None)]
    #[case("$", None)]
    #[case("twelve", None)]
    fn test_parse_amount(#[case] raw: &str, #[case] expected: Option<Decimal>) {
        assert_eq!(parse_amount(raw), expected);
    }
}
