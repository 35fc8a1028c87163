//! Yield-to-maturity estimation by bisection.
//!
//! Solves for the annual rate `r` at which
//!
//! ```text
//! price = sum_{i=1..n} coupon / (1 + r/f)^i + face / (1 + r/f)^n
//! ```
//!
//! with `f` coupons per year and `n = round(f * years)` remaining periods.
//! The search stops after a fixed number of iterations and returns the last
//! midpoint even when the residual is still above tolerance.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{decimal_from_f64, BondFields};

/// Nominal used for every bond.
pub const FACE_VALUE: f64 = 1000.0;

const LOWER_RATE: f64 = 0.0001;
const UPPER_RATE: f64 = 1.0;
const MAX_ITERATIONS: u32 = 100;
const TOLERANCE: f64 = 1e-4;
const MIN_YEARS: f64 = 0.1;
const DAYS_PER_YEAR: f64 = 365.25;

/// Inputs to the pricing equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerms {
    pub price: f64,
    /// Amount paid per coupon.
    pub coupon: f64,
    pub frequency_per_year: u32,
    pub maturity_date: NaiveDate,
}

impl BondTerms {
    /// Terms taken from a partial record, when every input is known.
    pub fn from_fields(fields: &BondFields) -> Option<Self> {
        Some(Self {
            price: fields.price?.to_f64()?,
            coupon: fields.coupon_size?.to_f64()?,
            frequency_per_year: fields.coupon_frequency_per_year.filter(|f| *f > 0)?,
            maturity_date: fields.maturity_date?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldSolution {
    /// Annual rate as a fraction, within the search bounds.
    pub rate: f64,
    /// `rate * 100` rounded to two places.
    pub yield_pct: Decimal,
    pub iterations: u32,
    /// False when the iteration cap was hit first.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct YieldSolver {
    face_value: f64,
}

impl Default for YieldSolver {
    fn default() -> Self {
        Self {
            face_value: FACE_VALUE,
        }
    }
}

impl YieldSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Years from `as_of` to `maturity`, never below 0.1.
    pub fn years_to_maturity(maturity: NaiveDate, as_of: NaiveDate) -> f64 {
        let days = (maturity - as_of).num_days() as f64;
        (days / DAYS_PER_YEAR).max(MIN_YEARS)
    }

    /// Remaining coupon periods, at least one.
    pub fn periods(frequency_per_year: u32, years: f64) -> u32 {
        let n = (frequency_per_year as f64 * years).round();
        if n < 1.0 {
            1
        } else {
            n as u32
        }
    }

    /// Present value of the remaining cash flows at annual rate `rate`.
    pub fn present_value(&self, rate: f64, coupon: f64, frequency_per_year: u32, periods: u32) -> f64 {
        let per_period = 1.0 + rate / frequency_per_year as f64;
        let coupons: f64 = (1..=periods)
            .map(|i| coupon / per_period.powi(i as i32))
            .sum();
        coupons + self.face_value / per_period.powi(periods as i32)
    }

    pub fn solve(&self, terms: &BondTerms, as_of: NaiveDate) -> YieldSolution {
        let frequency = terms.frequency_per_year.max(1);
        let years = Self::years_to_maturity(terms.maturity_date, as_of);
        let periods = Self::periods(frequency, years);
        let residual =
            |rate: f64| self.present_value(rate, terms.coupon, frequency, periods) - terms.price;

        let (mut lo, mut hi) = (LOWER_RATE, UPPER_RATE);
        let mut mid = (lo + hi) / 2.0;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < MAX_ITERATIONS {
            iterations += 1;
            mid = (lo + hi) / 2.0;
            let value = residual(mid);
            if value.abs() < TOLERANCE {
                converged = true;
                break;
            }
            // PV falls as the rate rises
            if value > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        YieldSolution {
            rate: mid,
            yield_pct: decimal_from_f64(mid * 100.0, 2).unwrap_or(Decimal::ZERO),
            iterations,
            converged,
        }
    }

    /// Yield in percent for a partial record.
    ///
    /// A zero coupon gives 0.0 without solving. Returns `None` when a
    /// pricing input is missing.
    pub fn solve_fields(&self, fields: &BondFields, as_of: NaiveDate) -> Option<Decimal> {
        if fields.coupon_size == Some(Decimal::ZERO) {
            return Some(Decimal::ZERO);
        }
        let terms = BondTerms::from_fields(fields)?;
        let solution = self.solve(&terms, as_of);
        if !solution.converged {
            log::debug!(
                "Yield solver stopped after {} iterations at {:.6}",
                solution.iterations,
                solution.rate
            );
        }
        Some(solution.yield_pct)
    }
}
