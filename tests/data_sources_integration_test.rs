//! Integration tests for rate sources
//!
//! A scripted source stands in for the HTTP provider, so the tests exercise
//! caching and assembly without network access.

#[cfg(feature = "async")]
mod tests {
    use chrono::NaiveDate;
    use fx_timeframe::currency::CurrencyCode;
    use fx_timeframe::data::fx::{assemble, FxQuery, RawPayload};
    use fx_timeframe::data::sources::{
        CachedSource, ExchangeRateHostSource, RateSource, ResponseCache,
    };
    use fx_timeframe::error::{FxError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedSource {
        body: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl RateSource for ScriptedSource {
        async fn fetch_timeframe(&self, query: &FxQuery) -> Result<RawPayload> {
            query.validate()?;
            self.calls.fetch_add(1, Ordering::SeqCst);
            RawPayload::from_slice(self.body.as_bytes())
        }

        fn endpoint(&self) -> &str {
            "/timeframe"
        }
    }

    fn query(targets: &[&str]) -> FxQuery {
        FxQuery::new(
            CurrencyCode::parse("GBP").unwrap(),
            CurrencyCode::parse_list(targets).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_assemble_through_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CachedSource::new(
            ScriptedSource {
                body: r#"{"success": true, "quotes": {
                    "2024-01-01": {"USDEUR": 0.90, "USDGBP": 0.78},
                    "2024-01-02": {"USDEUR": 0.91}
                }}"#,
                calls: calls.clone(),
            },
            ResponseCache::default(),
        );

        let q = query(&["EUR"]);
        let payload = source.fetch_timeframe(&q).await.unwrap();
        let assembly = assemble(&payload, q.base);
        assert_eq!(assembly.series.len(), 1);
        assert_eq!(assembly.report.days_missing_base, 1);

        let again = source.fetch_timeframe(&q).await.unwrap();
        assert_eq!(again, payload);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A different currency set is a different provider request
        source.fetch_timeframe(&query(&["EUR", "JPY"])).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_error_surfaces() {
        let source = ScriptedSource {
            body: r#"{"success": false, "error": {"info": "You have exceeded your monthly quota"}}"#,
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let err = source.fetch_timeframe(&query(&["EUR"])).await.unwrap_err();
        assert!(matches!(err, FxError::ProviderError(_)));
        assert!(err.is_retrieval_failure());
    }

    #[tokio::test]
    async fn test_http_source_construction() {
        let source = ExchangeRateHostSource::new("test_key".to_string()).unwrap();
        assert_eq!(source.url(), "https://api.exchangerate.host/timeframe");
        assert_eq!(source.endpoint(), "/timeframe");
    }
}
