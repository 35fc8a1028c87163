//! ISS response shapes and parsers.
//!
//! Every ISS block is a `{ "columns": [...], "data": [[...], ...] }` table,
//! so values are looked up by column name rather than by position.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{BondFields, CouponPayment, CouponSchedule, DividendSummary, StockFields};

use super::PROVIDER_ID;

/// Price columns of the `marketdata` block, most reliable first.
const PRICE_COLUMNS: [&str; 4] = ["LAST", "CLOSEPRICE", "WAPRICE", "MARKETPRICE"];

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IssTable {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

impl IssTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = IssRow<'_>> {
        self.data.iter().map(move |values| IssRow {
            table: self,
            values,
        })
    }

    /// The row for `board`, or the first row when no row carries that board.
    pub(crate) fn row_for_board(&self, board: &str) -> Option<IssRow<'_>> {
        self.rows()
            .find(|row| row.string("BOARDID").as_deref() == Some(board))
            .or_else(|| self.rows().next())
    }
}

#[derive(Clone, Copy)]
pub(crate) struct IssRow<'a> {
    table: &'a IssTable,
    values: &'a [Value],
}

impl IssRow<'_> {
    fn value(&self, column: &str) -> Option<&Value> {
        let index = self.table.column(column)?;
        self.values.get(index).filter(|v| !v.is_null())
    }

    pub(crate) fn string(&self, column: &str) -> Option<String> {
        match self.value(column)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub(crate) fn decimal(&self, column: &str) -> Option<Decimal> {
        match self.value(column)? {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    pub(crate) fn date(&self, column: &str) -> Option<NaiveDate> {
        let raw = self.string(column)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()
    }

    fn first_decimal(&self, columns: &[&str]) -> Option<Decimal> {
        columns.iter().find_map(|c| self.decimal(c))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecurityResponse {
    #[serde(default)]
    securities: IssTable,
    #[serde(default)]
    marketdata: IssTable,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    securities: IssTable,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: IssTable,
}

#[derive(Debug, Deserialize)]
struct DividendsResponse {
    #[serde(default)]
    dividends: IssTable,
}

#[derive(Debug, Deserialize)]
struct BondizationResponse {
    #[serde(default)]
    coupons: IssTable,
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::ParseError {
        provider: PROVIDER_ID.to_string(),
        message: e.to_string(),
    })
}

fn security_rows<'a>(
    response: &'a SecurityResponse,
    ticker: &str,
    board: &str,
) -> Result<(IssRow<'a>, Option<IssRow<'a>>), MarketDataError> {
    let security = response
        .securities
        .row_for_board(board)
        .ok_or_else(|| MarketDataError::SymbolNotFound(ticker.to_string()))?;
    let market = response.marketdata.row_for_board(board);
    Ok((security, market))
}

/// Name, price and reported yield of a share.
pub(crate) fn parse_stock_security(
    body: &str,
    ticker: &str,
    board: &str,
) -> Result<StockFields, MarketDataError> {
    let response: SecurityResponse = parse_json(body)?;
    let (security, market) = security_rows(&response, ticker, board)?;

    let price = market
        .and_then(|row| row.first_decimal(&PRICE_COLUMNS))
        .or_else(|| security.decimal("PREVPRICE"));

    Ok(StockFields {
        name: security
            .string("SECNAME")
            .or_else(|| security.string("SHORTNAME")),
        price,
        annual_return_pct: security.decimal("YIELD"),
        ..StockFields::default()
    })
}

/// Name, maturity, coupon terms, price and yield of a bond.
///
/// Exchange bond prices are quoted in percent of par; with a known face
/// value the price is converted to currency units.
pub(crate) fn parse_bond_security(
    body: &str,
    ticker: &str,
    board: &str,
) -> Result<BondFields, MarketDataError> {
    let response: SecurityResponse = parse_json(body)?;
    let (security, market) = security_rows(&response, ticker, board)?;

    let quote = market.and_then(|row| row.first_decimal(&PRICE_COLUMNS));
    let price = match (quote, security.decimal("FACEVALUE")) {
        (Some(pct), Some(face)) if face > Decimal::ZERO => {
            Some((pct * face / Decimal::ONE_HUNDRED).round_dp(2))
        }
        (quote, _) => quote,
    };

    let frequency = security
        .decimal("COUPONPERIOD")
        .filter(|days| *days > Decimal::ZERO)
        .and_then(coupon_frequency);

    Ok(BondFields {
        name: security
            .string("SHORTNAME")
            .or_else(|| security.string("SECNAME")),
        price,
        coupon_size: security.decimal("COUPONVALUE"),
        coupon_frequency_per_year: frequency,
        maturity_date: security.date("MATDATE"),
        yield_to_maturity_pct: market.and_then(|row| row.decimal("YIELD")),
    })
}

/// Payments per year for a coupon period given in days.
pub(crate) fn coupon_frequency(period_days: Decimal) -> Option<u32> {
    use rust_decimal::prelude::ToPrimitive;
    (Decimal::from(365) / period_days)
        .round()
        .to_u32()
        .filter(|f| *f > 0)
}

/// Close price of the first traded day in a history page.
pub(crate) fn parse_history_close(body: &str, board: &str) -> Result<Option<Decimal>, MarketDataError> {
    let response: HistoryResponse = parse_json(body)?;
    let on_board = response
        .history
        .rows()
        .filter(|row| row.string("BOARDID").map_or(true, |b| b == board))
        .find_map(|row| row.decimal("CLOSE"));
    Ok(on_board.filter(|close| *close > Decimal::ZERO))
}

/// Percentage growth from `past` to `current`, rounded to two places.
pub(crate) fn price_growth_pct(current: Decimal, past: Decimal) -> Option<Decimal> {
    if past <= Decimal::ZERO {
        return None;
    }
    Some(((current / past - Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2))
}

pub(crate) fn parse_listing(body: &str) -> Result<Vec<String>, MarketDataError> {
    let response: ListingResponse = parse_json(body)?;
    let mut tickers: Vec<String> = Vec::new();
    for ticker in response.securities.rows().filter_map(|row| row.string("SECID")) {
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    Ok(tickers)
}

pub(crate) fn parse_dividends(body: &str) -> Result<DividendSummary, MarketDataError> {
    let response: DividendsResponse = parse_json(body)?;
    let values: Vec<Decimal> = response
        .dividends
        .rows()
        .filter_map(|row| row.decimal("value"))
        .collect();

    Ok(DividendSummary {
        total: values.iter().copied().sum(),
        count: values.len() as u32,
    })
}

pub(crate) fn parse_coupons(body: &str) -> Result<CouponSchedule, MarketDataError> {
    let response: BondizationResponse = parse_json(body)?;
    let payments = response
        .coupons
        .rows()
        .filter_map(|row| {
            Some(CouponPayment {
                date: row.date("coupondate")?,
                value: row.decimal("value"),
            })
        })
        .collect();
    Ok(CouponSchedule::new(payments))
}
