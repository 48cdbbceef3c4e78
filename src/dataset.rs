// Aggregation of raw compensation rows into the two slope chart views.

use crate::ir::{CompRow, CompanyInfo, LeftItem, RankItem, SlopeView, ViewMode};
use crate::parser::format_role_name;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Role view shows at most this many companies.
pub const ROLE_VIEW_TOP_COMPANIES: usize = 10;

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("no {kind} named \"{name}\" in the dataset")]
    UnknownItem { kind: &'static str, name: String },
    #[error("{0} has no rows with a positive total pay")]
    EmptyView(String),
    #[error("dataset is empty")]
    EmptyDataset,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<CompRow>,
    names: HashMap<String, String>,
    industries: HashMap<String, String>,
}

impl Dataset {
    pub fn new(rows: Vec<CompRow>, companies: Vec<CompanyInfo>) -> Self {
        let mut names = HashMap::new();
        let mut industries = HashMap::new();
        for info in companies {
            industries.insert(info.ticker.clone(), info.industry);
            names.insert(info.ticker, info.name);
        }
        Self {
            rows,
            names,
            industries,
        }
    }

    pub fn company_display_name(&self, ticker: &str) -> String {
        self.names
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| ticker.to_string())
    }

    pub fn industry_of(&self, ticker: &str) -> &str {
        self.industries.get(ticker).map(String::as_str).unwrap_or("")
    }

    pub fn tickers(&self) -> Vec<String> {
        distinct(self.rows.iter().map(|row| row.ticker.as_str()))
    }

    pub fn roles(&self) -> Vec<String> {
        distinct(self.rows.iter().map(|row| row.role.as_str()))
    }

    pub fn industries(&self) -> Vec<String> {
        distinct(
            self.industries
                .values()
                .map(String::as_str)
                .filter(|industry| !industry.is_empty()),
        )
    }

    /// Tickers in `industry`; falls back to every ticker when the filter
    /// matches nothing.
    pub fn tickers_in_industry(&self, industry: Option<&str>) -> Vec<String> {
        let all = self.tickers();
        let Some(industry) = industry.filter(|value| !is_all(value)) else {
            return all;
        };
        let filtered: Vec<String> = all
            .iter()
            .filter(|ticker| self.industry_of(ticker) == industry)
            .cloned()
            .collect();
        if filtered.is_empty() { all } else { filtered }
    }

    /// Roles that occur at companies in `industry` (every role without a
    /// filter).
    pub fn roles_in_industry(&self, industry: Option<&str>) -> Vec<String> {
        let Some(industry) = industry.filter(|value| !is_all(value)) else {
            return self.roles();
        };
        distinct(
            self.rows
                .iter()
                .filter(|row| self.industry_of(&row.ticker) == industry)
                .map(|row| row.role.as_str()),
        )
    }

    /// First item offered for `mode`, used when the caller names none.
    pub fn default_item(&self, mode: ViewMode, industry: Option<&str>) -> Result<String, DataError> {
        let items = match mode {
            ViewMode::Company => self.tickers_in_industry(industry),
            ViewMode::Role => self.roles_in_industry(industry),
        };
        items.into_iter().next().ok_or(DataError::EmptyDataset)
    }

    /// Left items are the company's roles, right items all of its ranks.
    pub fn company_view(&self, ticker: &str) -> Result<SlopeView, DataError> {
        let rows: Vec<&CompRow> = self.rows.iter().filter(|row| row.ticker == ticker).collect();
        if rows.is_empty() {
            return Err(DataError::UnknownItem {
                kind: "company",
                name: ticker.to_string(),
            });
        }
        let display = self.company_display_name(ticker);
        let mut left: Vec<LeftItem> = group_by(&rows, |row| row.role.as_str())
            .into_iter()
            .filter_map(|(role, rows)| {
                let ranks = rows.iter().map(|row| self.rank_item(row)).collect();
                aggregate(role.to_string(), format_role_name(role), &rows, ranks)
            })
            .collect();
        sort_by_pay_desc(&mut left);
        let view = finish_view(ViewMode::Company, display, left, self.roles())?;
        log::debug!(
            "company view {ticker}: {} roles, {} ranks",
            view.left.len(),
            view.right.len()
        );
        Ok(view)
    }

    /// Left items are the top companies for `role` (optionally within one
    /// industry), right items their ranks.
    pub fn role_view(&self, role: &str, industry: Option<&str>) -> Result<SlopeView, DataError> {
        let industry = industry.filter(|value| !is_all(value));
        let rows: Vec<&CompRow> = self
            .rows
            .iter()
            .filter(|row| row.role == role)
            .filter(|row| industry.is_none_or(|wanted| self.industry_of(&row.ticker) == wanted))
            .collect();
        if rows.is_empty() {
            if !self.rows.iter().any(|row| row.role == role) {
                return Err(DataError::UnknownItem {
                    kind: "role",
                    name: role.to_string(),
                });
            }
            let scope = industry
                .map_or_else(|| role.to_string(), |wanted| format!("{role} in {wanted}"));
            return Err(DataError::EmptyView(scope));
        }
        let mut left: Vec<LeftItem> = group_by(&rows, |row| row.ticker.as_str())
            .into_iter()
            .filter_map(|(ticker, rows)| {
                let ranks = rows.iter().map(|row| self.rank_item(row)).collect();
                aggregate(
                    ticker.to_string(),
                    self.company_display_name(ticker),
                    &rows,
                    ranks,
                )
            })
            .collect();
        sort_by_pay_desc(&mut left);
        left.truncate(ROLE_VIEW_TOP_COMPANIES);
        let view = finish_view(ViewMode::Role, format_role_name(role), left, self.tickers())?;
        log::debug!(
            "role view {role}: {} companies, {} ranks",
            view.left.len(),
            view.right.len()
        );
        Ok(view)
    }

    pub fn view(
        &self,
        mode: ViewMode,
        item: &str,
        industry: Option<&str>,
    ) -> Result<SlopeView, DataError> {
        match mode {
            ViewMode::Company => self.company_view(item),
            ViewMode::Role => self.role_view(item, industry),
        }
    }

    fn rank_item(&self, row: &CompRow) -> RankItem {
        RankItem {
            company: row.ticker.clone(),
            company_display_name: self.company_display_name(&row.ticker),
            role: row.role.clone(),
            rank_name: row.rank_name.clone(),
            rank: row.rank,
            total_pay: row.total_pay,
            base_pay: row.base_pay,
            stock: row.stock,
            bonus: row.bonus,
        }
    }
}

fn is_all(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn group_by<'a, F>(rows: &[&'a CompRow], key: F) -> BTreeMap<&'a str, Vec<&'a CompRow>>
where
    F: Fn(&'a CompRow) -> &'a str,
{
    let mut groups: BTreeMap<&str, Vec<&CompRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(*row)).or_default().push(*row);
    }
    groups
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values
        .filter(|value| value.is_finite())
        .fold((0.0f64, 0usize), |(sum, count), value| (sum + value as f64, count + 1));
    if count == 0 {
        f32::NAN
    } else {
        (sum / count as f64) as f32
    }
}

fn valid_pay(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Averages are taken over rows with a positive total pay only; items
/// whose average is not positive are dropped.
fn aggregate(
    name: String,
    display_name: String,
    rows: &[&CompRow],
    mut ranks: Vec<RankItem>,
) -> Option<LeftItem> {
    let valid: Vec<&CompRow> = rows
        .iter()
        .copied()
        .filter(|row| valid_pay(row.total_pay))
        .collect();
    let avg_pay = mean(valid.iter().map(|row| row.total_pay));
    if !valid_pay(avg_pay) {
        return None;
    }
    ranks.sort_by_key(|rank| rank.rank);
    Some(LeftItem {
        name,
        display_name,
        avg_pay,
        avg_base: mean(valid.iter().map(|row| row.base_pay)),
        avg_stock: mean(valid.iter().map(|row| row.stock)),
        avg_bonus: mean(valid.iter().map(|row| row.bonus)),
        ranks,
    })
}

fn sort_by_pay_desc(items: &mut [LeftItem]) {
    items.sort_by(|a, b| b.avg_pay.total_cmp(&a.avg_pay));
}

fn finish_view(
    mode: ViewMode,
    title: String,
    left: Vec<LeftItem>,
    color_domain: Vec<String>,
) -> Result<SlopeView, DataError> {
    let mut right: Vec<RankItem> = left
        .iter()
        .flat_map(|item| item.ranks.iter())
        .filter(|rank| rank.has_valid_pay())
        .cloned()
        .collect();
    right.sort_by(|a, b| b.total_pay.total_cmp(&a.total_pay));
    if left.is_empty() || right.is_empty() {
        return Err(DataError::EmptyView(title));
    }
    Ok(SlopeView {
        mode,
        title,
        left,
        right,
        color_domain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ticker: &str, role: &str, rank: i32, total: f32) -> CompRow {
        CompRow {
            ticker: ticker.to_string(),
            role: role.to_string(),
            rank_name: format!("L{rank}"),
            rank,
            total_pay: total,
            base_pay: total * 0.7,
            stock: total * 0.2,
            bonus: total * 0.1,
        }
    }

    fn info(ticker: &str, name: &str, industry: &str) -> CompanyInfo {
        CompanyInfo {
            ticker: ticker.to_string(),
            name: name.to_string(),
            industry: industry.to_string(),
        }
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                row("AAPL", "software-engineer", 2, 200_000.0),
                row("AAPL", "software-engineer", 1, 100_000.0),
                row("AAPL", "product-manager", 1, 180_000.0),
                row("AAPL", "recruiter", 1, 0.0),
                row("MSFT", "software-engineer", 1, 160_000.0),
                row("MSFT", "product-manager", 1, f32::NAN),
                row("XOM", "software-engineer", 1, 120_000.0),
            ],
            vec![
                info("AAPL", "Apple", "Technology"),
                info("MSFT", "Microsoft", "Technology"),
                info("XOM", "Exxon", "Energy"),
            ],
        )
    }

    #[test]
    fn company_view_averages_and_sorts() {
        let view = sample().company_view("AAPL").unwrap();
        assert_eq!(view.title, "Apple");
        let names: Vec<&str> = view.left.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["product-manager", "software-engineer"]);
        assert_eq!(view.left[1].avg_pay, 150_000.0);
        assert_eq!(view.left[1].display_name, "Software Engineer");
        let ranks: Vec<i32> = view.left[1].ranks.iter().map(|rank| rank.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
        let pays: Vec<f32> = view.right.iter().map(|rank| rank.total_pay).collect();
        assert_eq!(pays, vec![200_000.0, 180_000.0, 100_000.0]);
    }

    #[test]
    fn role_view_groups_by_company() {
        let view = sample().role_view("software-engineer", None).unwrap();
        assert_eq!(view.title, "Software Engineer");
        let names: Vec<&str> = view.left.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["MSFT", "AAPL", "XOM"]);
        assert_eq!(view.left[0].display_name, "Microsoft");
        assert_eq!(view.right[0].group_key(ViewMode::Role), "AAPL");
    }

    #[test]
    fn role_view_respects_industry_filter() {
        let view = sample()
            .role_view("software-engineer", Some("Energy"))
            .unwrap();
        assert_eq!(view.left.len(), 1);
        assert_eq!(view.left[0].name, "XOM");
    }

    #[test]
    fn role_missing_from_industry_is_an_empty_view() {
        assert_eq!(
            sample()
                .role_view("product-manager", Some("Energy"))
                .unwrap_err(),
            DataError::EmptyView("product-manager in Energy".to_string())
        );
        assert_eq!(
            sample().role_view("astronaut", Some("Energy")).unwrap_err(),
            DataError::UnknownItem {
                kind: "role",
                name: "astronaut".to_string()
            }
        );
    }

    #[test]
    fn blank_components_count_toward_averages() {
        let input = "Ticker,Role Name,Role Rank Name,Role Rank,Total Pay,Base Pay,Stock,Bonus\n\
ACME,swe,L1,1,100000,100000,,\n\
ACME,swe,L2,2,200000,150000,40000,10000\n";
        let rows = crate::parser::parse_comp_csv(input).unwrap();
        let view = Dataset::new(rows, Vec::new()).company_view("ACME").unwrap();
        assert_eq!(view.left[0].avg_stock, 20_000.0);
        assert_eq!(view.left[0].avg_bonus, 5_000.0);
        assert_eq!(view.left[0].avg_base, 125_000.0);
    }

    #[test]
    fn role_view_keeps_top_ten() {
        let rows = (0..15)
            .map(|idx| row(&format!("T{idx:02}"), "swe", 1, 100_000.0 + idx as f32))
            .collect();
        let view = Dataset::new(rows, Vec::new()).role_view("swe", None).unwrap();
        assert_eq!(view.left.len(), ROLE_VIEW_TOP_COMPANIES);
        assert_eq!(view.left[0].name, "T14");
        assert_eq!(view.right.len(), ROLE_VIEW_TOP_COMPANIES);
    }

    #[test]
    fn invalid_pay_rows_are_excluded() {
        let view = sample().company_view("MSFT").unwrap();
        assert_eq!(view.left.len(), 1);
        assert_eq!(view.right.len(), 1);
    }

    #[test]
    fn unknown_items_are_errors() {
        assert_eq!(
            sample().company_view("NOPE").unwrap_err(),
            DataError::UnknownItem {
                kind: "company",
                name: "NOPE".to_string()
            }
        );
        let only_zero = Dataset::new(vec![row("Z", "r", 1, 0.0)], Vec::new());
        assert_eq!(
            only_zero.company_view("Z").unwrap_err(),
            DataError::EmptyView("Z".to_string())
        );
    }

    #[test]
    fn industry_filter_falls_back_to_all_tickers() {
        let data = sample();
        assert_eq!(data.tickers_in_industry(Some("Energy")), vec!["XOM"]);
        assert_eq!(data.tickers_in_industry(Some("Retail")).len(), 3);
        assert_eq!(data.tickers_in_industry(Some("All")).len(), 3);
        assert_eq!(data.industries(), vec!["Energy", "Technology"]);
        assert_eq!(
            data.roles_in_industry(Some("Energy")),
            vec!["software-engineer"]
        );
    }

    #[test]
    fn default_item_is_first_sorted() {
        let data = sample();
        assert_eq!(data.default_item(ViewMode::Company, None).unwrap(), "AAPL");
        assert_eq!(
            data.default_item(ViewMode::Role, None).unwrap(),
            "product-manager"
        );
        assert_eq!(
            Dataset::default().default_item(ViewMode::Company, None),
            Err(DataError::EmptyDataset)
        );
    }
}
