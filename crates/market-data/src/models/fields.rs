//! Partial records returned by individual sources.
//!
//! Each source fills what it can; the enricher merges them with
//! [`StockFields::fill_from`] / [`BondFields::fill_from`], which never
//! overwrite a value that is already set.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::instrument::{Bond, Stock};

/// Stock attributes as reported by a single source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockFields {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub annual_return_pct: Option<Decimal>,
    pub cagr_pct: Option<Decimal>,
    pub dividend_amount: Option<Decimal>,
    pub dividend_count: Option<u32>,
}

impl StockFields {
    /// Copies every field of `other` that is still empty here.
    pub fn fill_from(&mut self, other: StockFields) {
        self.name = self.name.take().or(other.name);
        self.price = self.price.or(other.price);
        self.annual_return_pct = self.annual_return_pct.or(other.annual_return_pct);
        self.cagr_pct = self.cagr_pct.or(other.cagr_pct);
        self.dividend_amount = self.dividend_amount.or(other.dividend_amount);
        self.dividend_count = self.dividend_count.or(other.dividend_count);
    }

    /// Name, price and annual return are all known.
    pub fn has_mandatory(&self) -> bool {
        self.name.is_some() && self.price.is_some() && self.annual_return_pct.is_some()
    }

    pub fn into_stock(self, ticker: &str) -> Stock {
        let count = self.dividend_count.unwrap_or(0);
        Stock {
            ticker: ticker.to_string(),
            name: self.name,
            price: self.price,
            has_dividends: count > 0,
            dividend_amount: self.dividend_amount.unwrap_or(Decimal::ZERO),
            dividend_frequency_per_year: count,
            annual_return_pct: self.annual_return_pct,
            cagr_pct: self.cagr_pct,
        }
    }
}

/// Bond attributes as reported by a single source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BondFields {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub coupon_size: Option<Decimal>,
    pub coupon_frequency_per_year: Option<u32>,
    pub maturity_date: Option<NaiveDate>,
    pub yield_to_maturity_pct: Option<Decimal>,
}

impl BondFields {
    /// Copies every field of `other` that is still empty here.
    pub fn fill_from(&mut self, other: BondFields) {
        self.name = self.name.take().or(other.name);
        self.price = self.price.or(other.price);
        self.coupon_size = self.coupon_size.or(other.coupon_size);
        self.coupon_frequency_per_year = self
            .coupon_frequency_per_year
            .or(other.coupon_frequency_per_year);
        self.maturity_date = self.maturity_date.or(other.maturity_date);
        self.yield_to_maturity_pct = self.yield_to_maturity_pct.or(other.yield_to_maturity_pct);
    }

    /// Every field except the yield, which can be solved for.
    pub fn has_mandatory(&self) -> bool {
        self.name.is_some()
            && self.price.is_some()
            && self.coupon_size.is_some()
            && self.coupon_frequency_per_year.is_some()
            && self.maturity_date.is_some()
    }

    pub fn into_bond(self, ticker: &str) -> Bond {
        Bond {
            ticker: ticker.to_string(),
            name: self.name,
            price: self.price,
            coupon_size: self.coupon_size,
            coupon_frequency_per_year: self.coupon_frequency_per_year,
            maturity_date: self.maturity_date,
            yield_to_maturity_pct: self.yield_to_maturity_pct,
        }
    }
}

/// Dividends paid by a stock, as listed by the payments endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividendSummary {
    pub total: Decimal,
    pub count: u32,
}

impl From<DividendSummary> for StockFields {
    fn from(summary: DividendSummary) -> Self {
        if summary.count == 0 {
            return StockFields::default();
        }
        StockFields {
            dividend_amount: Some(summary.total),
            dividend_count: Some(summary.count),
            ..StockFields::default()
        }
    }
}

/// One row of a bond's coupon calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponPayment {
    pub date: NaiveDate,
    pub value: Option<Decimal>,
}

/// A bond's coupon calendar, sorted by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponSchedule {
    pub payments: Vec<CouponPayment>,
}

impl CouponSchedule {
    pub fn new(mut payments: Vec<CouponPayment>) -> Self {
        payments.sort_by_key(|p| p.date);
        Self { payments }
    }

    /// Value of the next coupon on or after `as_of`, else the last known one.
    pub fn coupon_size(&self, as_of: NaiveDate) -> Option<Decimal> {
        self.payments
            .iter()
            .find(|p| p.date >= as_of && p.value.is_some())
            .or_else(|| self.payments.iter().rev().find(|p| p.value.is_some()))
            .and_then(|p| p.value)
    }

    /// Payments per year, from the mean spacing of consecutive coupon dates.
    pub fn frequency_per_year(&self) -> Option<u32> {
        let first = self.payments.first()?;
        let last = self.payments.last()?;
        let gaps = self.payments.len().checked_sub(1).filter(|g| *g > 0)?;

        let span_days = (last.date - first.date).num_days();
        if span_days <= 0 {
            return None;
        }
        let mean_gap = span_days as f64 / gaps as f64;
        (365.0 / mean_gap).round().to_u32().filter(|f| *f > 0)
    }

    /// Fields this calendar can supply.
    pub fn to_fields(&self, as_of: NaiveDate) -> BondFields {
        BondFields {
            coupon_size: self.coupon_size(as_of),
            coupon_frequency_per_year: self.frequency_per_year(),
            ..BondFields::default()
        }
    }
}

/// Converts an f64 to a Decimal rounded to `dp` places.
pub(crate) fn decimal_from_f64(value: f64, dp: u32) -> Option<Decimal> {
    use rust_decimal::prelude::FromPrimitive;
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).map(|d| d.round_dp(dp))
}
