//! Smart-Lab HTML fallback provider.
//!
//! Bond pages at `https://smart-lab.ru/q/bonds/{ticker}/` render the fields
//! as label/value table rows plus a few prose sentences. The page text is
//! flattened to a single whitespace-collapsed line and the values are pulled
//! out with regular expressions. Numbers use a decimal comma.
//!
//! Only bonds are covered; stock lookups return no fields.

use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use regex::Regex;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use scraper::{Html, Selector};

use crate::errors::MarketDataError;
use crate::models::BondFields;
use crate::provider::{http, InstrumentSource};

const PROVIDER_ID: &str = "SMART_LAB";

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Имя облигации\s+(\S+)").expect("Invalid regex pattern"));

static MATURITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Дата погашения\s*(\d{2}-\d{2}-\d{4})").expect("Invalid regex pattern")
});

// The bond name between the fixed words may carry its own markup.
static PRICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Облигация\s+.*?стоит\s+сейчас\s*([\d,.]+)\s*руб").expect("Invalid regex pattern")
});

static YIELD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Доходность\*?\s+облигации\s+(?:.*?\s)?к\s+погашению\s+составляет\s*([\d,.]+)\s*%")
        .expect("Invalid regex pattern")
});

static COUPON_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Купон,\s*руб\s*(?:\(\?\))?\s*([\d,.]+)").expect("Invalid regex pattern")
});

static FREQUENCY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Частота купона,\s*раз в год\s*([\d,.]+)").expect("Invalid regex pattern")
});

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid selector"));

static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("Invalid selector"));

const NAME_LABEL: &str = "Имя облигации";

/// Connection settings for Smart-Lab.
#[derive(Debug, Clone)]
pub struct SmartLabConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SmartLabConfig {
    fn default() -> Self {
        Self {
            base_url: "https://smart-lab.ru/q/bonds".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

pub struct SmartLabProvider {
    client: Client,
    config: SmartLabConfig,
}

impl SmartLabProvider {
    pub fn new(config: SmartLabConfig) -> Self {
        let client = http::build_client(config.timeout, &config.user_agent);

        Self { client, config }
    }
}

#[async_trait]
impl InstrumentSource for SmartLabProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn bond_fields(&self, ticker: &str) -> Result<BondFields, MarketDataError> {
        let url = format!("{}/{}/", self.config.base_url.trim_end_matches('/'), ticker);
        let html = http::fetch_text(&self.client, PROVIDER_ID, &url).await?;
        let fields = parse_bond_page(&html);
        debug!("{}: parsed {} page: {:?}", PROVIDER_ID, ticker, fields);
        Ok(fields)
    }
}

/// Joins text nodes with single spaces, collapsing all whitespace runs.
fn collapse_text<'a>(nodes: impl Iterator<Item = &'a str>) -> String {
    nodes
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visible text of the page on one line.
fn page_text(document: &Html) -> String {
    collapse_text(document.root_element().text())
}

/// Value cell of the first table row whose label cell starts with `label`.
fn table_value(document: &Html, label: &str) -> Option<String> {
    document.select(&ROW_SELECTOR).find_map(|row| {
        let mut cells = row.select(&CELL_SELECTOR).map(|c| collapse_text(c.text()));
        let head = cells.next()?;
        if !head.starts_with(label) {
            return None;
        }
        cells.next().filter(|v| !v.is_empty())
    })
}

/// Parses a number written with a decimal comma, e.g. `"1 012,45"`.
fn parse_localized_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    Decimal::from_str(cleaned.trim_end_matches('.')).ok()
}

fn capture<'t>(regex: &Regex, text: &'t str) -> Option<&'t str> {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

pub(crate) fn parse_bond_page(html: &str) -> BondFields {
    let document = Html::parse_document(html);
    let text = page_text(&document);

    BondFields {
        name: table_value(&document, NAME_LABEL)
            .or_else(|| capture(&NAME_REGEX, &text).map(str::to_string)),
        price: capture(&PRICE_REGEX, &text).and_then(parse_localized_decimal),
        coupon_size: capture(&COUPON_REGEX, &text).and_then(parse_localized_decimal),
        coupon_frequency_per_year: capture(&FREQUENCY_REGEX, &text)
            .and_then(parse_localized_decimal)
            .and_then(|f| f.round().to_u32())
            .filter(|f| *f > 0),
        maturity_date: capture(&MATURITY_REGEX, &text)
            .and_then(|d| NaiveDate::parse_from_str(d, "%d-%m-%Y").ok()),
        yield_to_maturity_pct: capture(&YIELD_REGEX, &text).and_then(parse_localized_decimal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const BOND_PAGE: &str = r#"<html><body>
        <table class="simple-little-table">
            <tr><td>Имя облигации</td><td>ОФЗ 26238</td></tr>
            <tr><td>Дата погашения</td><td>15-05-2041</td></tr>
            <tr><td>Купон, руб <a href="/help">(?)</a></td><td>35,4</td></tr>
            <tr><td>Частота купона, раз в год</td><td>2</td></tr>
        </table>
        <p>Облигация ОФЗ 26238 стоит сейчас <b>580,5</b> руб.</p>
        <p>Доходность* облигации к погашению составляет <b>14,21</b>%</p>
    </body></html>"#;

    #[test]
    fn test_parse_bond_page() {
        let fields = parse_bond_page(BOND_PAGE);
        assert_eq!(fields.name.as_deref(), Some("ОФЗ 26238"));
        assert_eq!(fields.maturity_date, NaiveDate::from_ymd_opt(2041, 5, 15));
        assert_eq!(fields.coupon_size, Some(dec!(35.4)));
        assert_eq!(fields.coupon_frequency_per_year, Some(2));
        assert_eq!(fields.price, Some(dec!(580.5)));
        assert_eq!(fields.yield_to_maturity_pct, Some(dec!(14.21)));
    }

    #[test]
    fn test_sentences_with_inline_links() {
        let html = r#"<html><body>
            <p>Облигация <a href="/q/bonds/SU26238RMFS4/">ОФЗ 26238</a> стоит сейчас 580,5 руб.</p>
            <p>Доходность* облигации <a href="/q/bonds/SU26238RMFS4/">ОФЗ 26238</a>
               к погашению составляет 14,21%</p>
        </body></html>"#;

        let fields = parse_bond_page(html);
        assert_eq!(fields.price, Some(dec!(580.5)));
        assert_eq!(fields.yield_to_maturity_pct, Some(dec!(14.21)));
    }

    #[test]
    fn test_name_outside_table_takes_first_word() {
        let fields = parse_bond_page("<div>Имя облигации <span>ОФЗ-ПД</span> Дата погашения 01-02-2030</div>");
        assert_eq!(fields.name.as_deref(), Some("ОФЗ-ПД"));
        assert_eq!(fields.maturity_date, NaiveDate::from_ymd_opt(2030, 2, 1));
    }

    #[test]
    fn test_collapse_text() {
        let text = collapse_text(["  Облигация\n", "", " ОФЗ\t26238 "].into_iter());
        assert_eq!(text, "Облигация ОФЗ 26238");
    }

    #[test]
    fn test_page_without_fields() {
        let fields = parse_bond_page("<html><body><h1>Страница не найдена</h1></body></html>");
        assert_eq!(fields, BondFields::default());
    }

    #[test]
    fn test_parse_localized_decimal() {
        assert_eq!(parse_localized_decimal("1 012,45"), Some(dec!(1012.45)));
        assert_eq!(parse_localized_decimal("99.8."), Some(dec!(99.8)));
        assert_eq!(parse_localized_decimal("n/a"), None);
    }
}
