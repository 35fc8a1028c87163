#[cfg(test)]
mod tests {
    use crate::enrichment::{EnricherConfig, InstrumentEnricher};
    use crate::errors::MarketDataError;
    use crate::models::{
        BondFields, CouponPayment, CouponSchedule, DividendSummary, Instrument, InstrumentKind,
        StockFields,
    };
    use crate::provider::{InstrumentSource, PaymentHistorySource};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // --- Mock instrument source ---
    #[derive(Default)]
    struct MockSource {
        id: &'static str,
        stock: Option<StockFields>,
        bond: Option<BondFields>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                ..Default::default()
            }
        }

        fn with_stock(mut self, fields: StockFields) -> Self {
            self.stock = Some(fields);
            self
        }

        fn with_bond(mut self, fields: BondFields) -> Self {
            self.bond = Some(fields);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl InstrumentSource for MockSource {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn stock_fields(&self, ticker: &str) -> Result<StockFields, MarketDataError> {
            self.calls.lock().unwrap().push(ticker.to_string());
            self.stock.clone().ok_or(MarketDataError::HttpStatus {
                provider: self.id.to_string(),
                status: 503,
            })
        }

        async fn bond_fields(&self, ticker: &str) -> Result<BondFields, MarketDataError> {
            self.calls.lock().unwrap().push(ticker.to_string());
            self.bond.clone().ok_or(MarketDataError::Timeout {
                provider: self.id.to_string(),
            })
        }
    }

    // --- Mock payment history ---
    #[derive(Default)]
    struct MockPayments {
        dividends: Option<DividendSummary>,
        coupons: Option<CouponSchedule>,
    }

    #[async_trait]
    impl PaymentHistorySource for MockPayments {
        fn id(&self) -> &'static str {
            "MOCK_PAYMENTS"
        }

        async fn dividends(&self, _ticker: &str) -> Result<DividendSummary, MarketDataError> {
            self.dividends
                .clone()
                .ok_or(MarketDataError::SymbolNotFound("dividends".to_string()))
        }

        async fn coupons(&self, _ticker: &str) -> Result<CouponSchedule, MarketDataError> {
            self.coupons
                .clone()
                .ok_or(MarketDataError::SymbolNotFound("coupons".to_string()))
        }
    }

    // --- Mock source that records how many requests overlap ---
    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl InstrumentSource for SlowSource {
        fn id(&self) -> &'static str {
            "SLOW"
        }

        async fn stock_fields(&self, ticker: &str) -> Result<StockFields, MarketDataError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(StockFields {
                name: Some(ticker.to_lowercase()),
                price: Some(dec!(100)),
                annual_return_pct: Some(dec!(5)),
                ..StockFields::default()
            })
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn enricher(
        primary: Arc<MockSource>,
        payments: MockPayments,
        fallback: Arc<MockSource>,
    ) -> InstrumentEnricher {
        InstrumentEnricher::new(primary, Arc::new(payments), fallback, EnricherConfig::default())
    }

    fn complete_bond_page() -> BondFields {
        BondFields {
            name: Some("ОФЗ 26238".to_string()),
            price: Some(dec!(600.0)),
            coupon_size: Some(dec!(35.4)),
            coupon_frequency_per_year: Some(2),
            maturity_date: NaiveDate::from_ymd_opt(2041, 5, 15),
            yield_to_maturity_pct: Some(dec!(13.9)),
        }
    }

    #[tokio::test]
    async fn test_primary_value_is_never_overwritten_by_fallback() {
        let primary = Arc::new(MockSource::new("PRIMARY").with_bond(BondFields {
            name: Some("ОФЗ 26238".to_string()),
            price: Some(dec!(580.5)),
            ..BondFields::default()
        }));
        let fallback = Arc::new(MockSource::new("FALLBACK").with_bond(complete_bond_page()));

        let instrument = enricher(primary, MockPayments::default(), fallback.clone())
            .enrich_as_of("SU26238RMFS4", InstrumentKind::Bond, as_of())
            .await;

        let Instrument::Bond(bond) = instrument else {
            panic!("expected a bond");
        };
        assert_eq!(fallback.call_count(), 1);
        assert_eq!(bond.price, Some(dec!(580.5)));
        assert_eq!(bond.coupon_size, Some(dec!(35.4)));
        assert_eq!(bond.yield_to_maturity_pct, Some(dec!(13.9)));
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty_record() {
        let primary = Arc::new(MockSource::new("PRIMARY"));
        let fallback = Arc::new(MockSource::new("FALLBACK"));

        let instrument = enricher(primary, MockPayments::default(), fallback)
            .enrich_as_of("GAZP", InstrumentKind::Stock, as_of())
            .await;

        let Instrument::Stock(stock) = instrument else {
            panic!("expected a stock");
        };
        assert_eq!(stock.ticker, "GAZP");
        assert_eq!(stock.price, None);
        assert!(!stock.has_dividends);
        assert_eq!(stock.dividend_amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_complete_stock_skips_fallback() {
        let primary = Arc::new(MockSource::new("PRIMARY").with_stock(StockFields {
            name: Some("Сбербанк".to_string()),
            price: Some(dec!(310.2)),
            annual_return_pct: Some(dec!(12.8)),
            cagr_pct: Some(dec!(12.8)),
            ..StockFields::default()
        }));
        let fallback = Arc::new(MockSource::new("FALLBACK"));
        let payments = MockPayments {
            dividends: Some(DividendSummary {
                total: dec!(33.3),
                count: 1,
            }),
            ..MockPayments::default()
        };

        let instrument = enricher(primary, payments, fallback.clone())
            .enrich_as_of("SBER", InstrumentKind::Stock, as_of())
            .await;

        assert_eq!(fallback.call_count(), 0);
        let Instrument::Stock(stock) = instrument else {
            panic!("expected a stock");
        };
        assert!(stock.has_dividends);
        assert_eq!(stock.dividend_amount, dec!(33.3));
        assert_eq!(stock.dividend_frequency_per_year, 1);
        assert!(stock.is_valid());
    }

    #[tokio::test]
    async fn test_coupon_calendar_fills_missing_terms() {
        let primary = Arc::new(MockSource::new("PRIMARY").with_bond(BondFields {
            name: Some("РЖД 1Р-26R".to_string()),
            price: Some(dec!(1000)),
            maturity_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            yield_to_maturity_pct: Some(dec!(10.5)),
            ..BondFields::default()
        }));
        let payments = MockPayments {
            coupons: Some(CouponSchedule::new(vec![
                CouponPayment {
                    date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                    value: Some(dec!(50)),
                },
                CouponPayment {
                    date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    value: Some(dec!(52)),
                },
            ])),
            ..MockPayments::default()
        };
        let fallback = Arc::new(MockSource::new("FALLBACK"));

        let instrument = enricher(primary, payments, fallback.clone())
            .enrich_as_of("RU000A0JX0J2", InstrumentKind::Bond, as_of())
            .await;

        let Instrument::Bond(bond) = instrument else {
            panic!("expected a bond");
        };
        assert_eq!(bond.coupon_size, Some(dec!(52)));
        assert_eq!(bond.coupon_frequency_per_year, Some(2));
        assert_eq!(fallback.call_count(), 0);
        assert!(bond.is_valid());
    }

    #[tokio::test]
    async fn test_missing_yield_is_solved() {
        let primary = Arc::new(MockSource::new("PRIMARY").with_bond(BondFields {
            name: Some("ОФЗ 26240".to_string()),
            price: Some(dec!(1000)),
            coupon_size: Some(dec!(50)),
            coupon_frequency_per_year: Some(2),
            maturity_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            yield_to_maturity_pct: None,
        }));
        let fallback = Arc::new(MockSource::new("FALLBACK"));

        let instrument = enricher(primary, MockPayments::default(), fallback)
            .enrich_as_of("SU26240RMFS0", InstrumentKind::Bond, as_of())
            .await;

        assert_eq!(instrument.annual_return_pct(), Some(dec!(10.00)));
    }

    #[tokio::test]
    async fn test_zero_coupon_gets_zero_yield() {
        let primary = Arc::new(MockSource::new("PRIMARY").with_bond(BondFields {
            name: Some("Дисконтная".to_string()),
            price: Some(dec!(870)),
            coupon_size: Some(Decimal::ZERO),
            coupon_frequency_per_year: None,
            maturity_date: NaiveDate::from_ymd_opt(2027, 3, 1),
            yield_to_maturity_pct: None,
        }));
        let fallback = Arc::new(MockSource::new("FALLBACK"));

        let instrument = enricher(primary, MockPayments::default(), fallback)
            .enrich_as_of("RU000A1", InstrumentKind::Bond, as_of())
            .await;

        let Instrument::Bond(bond) = instrument else {
            panic!("expected a bond");
        };
        assert_eq!(bond.yield_to_maturity_pct, Some(Decimal::ZERO));
        assert!(!bond.is_valid());
    }

    #[tokio::test]
    async fn test_batch_is_bounded_and_keyed_by_ticker() {
        let slow = Arc::new(SlowSource {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let enricher = InstrumentEnricher::new(
            slow.clone(),
            Arc::new(MockPayments::default()),
            Arc::new(MockSource::new("FALLBACK")),
            EnricherConfig { max_concurrency: 2 },
        );
        let tickers: Vec<String> = ["SBER", "GAZP", "LKOH", "ROSN", "NVTK", "GMKN"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        let results = enricher.enrich_batch(&tickers, InstrumentKind::Stock).await;

        assert_eq!(results.len(), 6);
        assert!(slow.peak.load(Ordering::SeqCst) <= 2);
        let Some(Instrument::Stock(lkoh)) = results.get("LKOH") else {
            panic!("LKOH missing");
        };
        assert_eq!(lkoh.name.as_deref(), Some("lkoh"));
    }
}
