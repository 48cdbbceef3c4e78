use crate::ir::{CompRow, CompanyInfo};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

static WORD_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_\s]+").unwrap());

const COL_TICKER: &str = "Ticker";
const COL_ROLE: &str = "Role Name";
const COL_RANK_NAME: &str = "Role Rank Name";
const COL_RANK: &str = "Role Rank";
const COL_TOTAL: &str = "Total Pay";
const COL_BASE: &str = "Base Pay";
const COL_STOCK: &str = "Stock";
const COL_BONUS: &str = "Bonus";
const COL_NAME: &str = "Name";
const COL_INDUSTRY: &str = "Industry";

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("input has no header row")]
    MissingHeader,
    #[error("header is missing required column \"{0}\"")]
    MissingColumn(String),
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },
    #[error("line {line}: expected {expected} fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// A parsed CSV record together with the 1-based line it started on.
#[derive(Debug, Clone, PartialEq)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Splits CSV text into records. Handles quoted fields, doubled quotes,
/// embedded newlines inside quotes, CRLF and blank lines.
fn read_records(input: &str) -> Result<Vec<Record>, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut record_line = 1usize;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(ch),
        }
    }
    if in_quotes {
        return Err(ParseError::UnterminatedQuote { line: record_line });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let blank = fields.iter().all(|field| field.trim().is_empty());
    if !blank {
        records.push(Record { line, fields });
    }
}

struct Header {
    columns: HashMap<String, usize>,
    width: usize,
}

impl Header {
    fn new(record: &Record) -> Self {
        let columns = record
            .fields
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect();
        Self {
            columns,
            width: record.fields.len(),
        }
    }

    fn require(&self, name: &str) -> Result<usize, ParseError> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
    }
}

fn field<'a>(record: &'a Record, idx: usize, width: usize) -> Result<&'a str, ParseError> {
    record
        .fields
        .get(idx)
        .map(|value| value.trim())
        .ok_or(ParseError::ShortRow {
            line: record.line,
            expected: width,
            found: record.fields.len(),
        })
}

/// Lenient numeric coercion. A blank cell counts as 0, so it drags
/// averages down; malformed cells become NaN and are skipped by the
/// aggregation.
fn parse_number(raw: &str) -> f32 {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f32>().unwrap_or(f32::NAN)
}

fn parse_rank(raw: &str) -> i32 {
    let value = parse_number(raw);
    if value.is_finite() { value as i32 } else { 0 }
}

/// Parses the compensation table. Columns are located by header name, so
/// their order does not matter and extra columns are ignored.
pub fn parse_comp_csv(input: &str) -> Result<Vec<CompRow>, ParseError> {
    let records = read_records(input)?;
    let mut iter = records.iter();
    let header = Header::new(iter.next().ok_or(ParseError::MissingHeader)?);
    let ticker = header.require(COL_TICKER)?;
    let role = header.require(COL_ROLE)?;
    let rank_name = header.require(COL_RANK_NAME)?;
    let rank = header.require(COL_RANK)?;
    let total = header.require(COL_TOTAL)?;
    let base = header.require(COL_BASE)?;
    let stock = header.require(COL_STOCK)?;
    let bonus = header.require(COL_BONUS)?;

    let mut rows = Vec::new();
    for record in iter {
        rows.push(CompRow {
            ticker: field(record, ticker, header.width)?.to_string(),
            role: field(record, role, header.width)?.to_string(),
            rank_name: field(record, rank_name, header.width)?.to_string(),
            rank: parse_rank(field(record, rank, header.width)?),
            total_pay: parse_number(field(record, total, header.width)?),
            base_pay: parse_number(field(record, base, header.width)?),
            stock: parse_number(field(record, stock, header.width)?),
            bonus: parse_number(field(record, bonus, header.width)?),
        });
    }
    log::debug!("parsed {} compensation rows", rows.len());
    Ok(rows)
}

/// Parses company metadata (`Ticker`, `Name`, optional `Industry`).
/// Rows without a ticker or name are skipped.
pub fn parse_company_info_csv(input: &str) -> Result<Vec<CompanyInfo>, ParseError> {
    let records = read_records(input)?;
    let mut iter = records.iter();
    let header = Header::new(iter.next().ok_or(ParseError::MissingHeader)?);
    let ticker = header.require(COL_TICKER)?;
    let name = header.require(COL_NAME)?;
    let industry = header.columns.get(COL_INDUSTRY).copied();

    let mut companies = Vec::new();
    for record in iter {
        let ticker = field(record, ticker, header.width)?;
        let name = field(record, name, header.width)?;
        if ticker.is_empty() || name.is_empty() {
            continue;
        }
        let industry = industry
            .and_then(|idx| record.fields.get(idx))
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        companies.push(CompanyInfo {
            ticker: ticker.to_string(),
            name: name.to_string(),
            industry,
        });
    }
    Ok(companies)
}

/// `software-engineer` -> `Software Engineer`.
pub fn format_role_name(role: &str) -> String {
    WORD_SEPARATOR_RE
        .split(role.trim())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Ticker,Role Name,Role Rank Name,Role Rank,Total Pay,Base Pay,Stock,Bonus\n\
AAPL,software-engineer,ICT2,1,150000,120000,20000,10000\n\
AAPL,software-engineer,\"ICT3, Senior\",2,210000,160000,35000,15000\n";

    #[test]
    fn parses_rows_with_quoted_fields() {
        let rows = parse_comp_csv(SAMPLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].rank_name, "ICT3, Senior");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].total_pay, 210000.0);
    }

    #[test]
    fn columns_are_found_by_name() {
        let input = "Bonus,Stock,Base Pay,Total Pay,Role Rank,Role Rank Name,Role Name,Ticker,Extra\n\
1,2,3,6,4,L4,pm,MSFT,x\n";
        let rows = parse_comp_csv(input).unwrap();
        assert_eq!(rows[0].ticker, "MSFT");
        assert_eq!(rows[0].role, "pm");
        assert_eq!(rows[0].total_pay, 6.0);
        assert_eq!(rows[0].bonus, 1.0);
    }

    #[test]
    fn blank_numbers_are_zero_and_malformed_are_nan() {
        let input = "Ticker,Role Name,Role Rank Name,Role Rank,Total Pay,Base Pay,Stock,Bonus\r\n\
GOOG,data-scientist,L3,,,\"$1,000\",n/a,0\r\n\r\n";
        let rows = parse_comp_csv(input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_pay, 0.0);
        assert_eq!(rows[0].base_pay, 1000.0);
        assert!(rows[0].stock.is_nan());
        assert_eq!(rows[0].rank, 0);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = parse_comp_csv("Ticker,Role Name\nA,b\n").unwrap_err();
        assert_eq!(err, ParseError::MissingColumn("Role Rank Name".to_string()));
    }

    #[test]
    fn short_rows_report_their_line() {
        let input = "Ticker,Role Name,Role Rank Name,Role Rank,Total Pay,Base Pay,Stock,Bonus\n\
A,b,c,1,2,3,4,5\n\
A,b\n";
        let err = parse_comp_csv(input).unwrap_err();
        assert_eq!(
            err,
            ParseError::ShortRow {
                line: 3,
                expected: 8,
                found: 2
            }
        );
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = read_records("a,b\n\"open,c\n").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedQuote { line: 2 });
    }

    #[test]
    fn empty_input_has_no_header() {
        assert_eq!(parse_comp_csv("").unwrap_err(), ParseError::MissingHeader);
    }

    #[test]
    fn company_info_skips_incomplete_rows() {
        let input = "Ticker,Name,Industry\nAAPL,Apple Inc.,Technology\n,Nameless,\nNVDA,NVIDIA,\n";
        let info = parse_company_info_csv(input).unwrap();
        assert_eq!(info.len(), 2);
        assert_eq!(info[0].industry, "Technology");
        assert_eq!(info[1].industry, "");
    }

    #[test]
    fn formats_kebab_case_roles() {
        assert_eq!(format_role_name("software-engineer"), "Software Engineer");
        assert_eq!(format_role_name("PRODUCT-manager"), "Product Manager");
        assert_eq!(format_role_name("data_scientist"), "Data Scientist");
        assert_eq!(format_role_name(""), "");
    }
}
