//! Economic Analyst
//!
//! Resolves the indicator bundle for a country. Each indicator walks its own
//! fallback chain; the four chains run concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use super::{
    DataSourceConfig, FredSource, HistoryRange, Indicator, IndicatorBundle, IndicatorKind,
    IndicatorSource, MarketDataSource, MarketTrend, OecdSource, PolicyRateTable, Provenance,
    WorldBankSource, YahooFinance,
};
use crate::country::{Country, CountryRef};
use crate::error::Result;

type Chain = Vec<Arc<dyn IndicatorSource>>;

pub struct EconomicAnalyst {
    inflation: Chain,
    interest_rate: Chain,
    gdp_growth: Chain,
    market: Arc<dyn MarketDataSource>,
}

impl EconomicAnalyst {
    pub fn new(inflation: Chain, interest_rate: Chain, gdp_growth: Chain, market: Arc<dyn MarketDataSource>) -> Self {
        Self {
            inflation,
            interest_rate,
            gdp_growth,
            market,
        }
    }

    /// Live public APIs wired in their fallback order
    pub fn from_config(config: &DataSourceConfig) -> Result<Self> {
        let http = config.http_client()?;
        let world_bank: Arc<dyn IndicatorSource> =
            Arc::new(WorldBankSource::new(http.clone(), &config.world_bank_base_url));
        let fred: Arc<dyn IndicatorSource> = Arc::new(FredSource::new(
            http.clone(),
            &config.fred_base_url,
            config.fred_api_key.clone(),
        ));
        let oecd: Arc<dyn IndicatorSource> = Arc::new(OecdSource::new(http.clone(), &config.oecd_base_url));
        let policy: Arc<dyn IndicatorSource> = Arc::new(PolicyRateTable);
        let market: Arc<dyn MarketDataSource> = Arc::new(YahooFinance::new(http, &config.yahoo_base_url));

        if config.fred_api_key.is_none() {
            tracing::info!("FRED_API_KEY not set; FRED is skipped in every chain");
        }

        Ok(Self::new(
            vec![world_bank.clone(), fred.clone(), oecd.clone()],
            vec![fred.clone(), oecd, policy],
            vec![world_bank, fred],
            market,
        ))
    }

    /// Market data source shared with the market analyst
    pub fn market_source(&self) -> Arc<dyn MarketDataSource> {
        Arc::clone(&self.market)
    }

    const fn chain(&self, kind: IndicatorKind) -> &Chain {
        match kind {
            IndicatorKind::Inflation => &self.inflation,
            IndicatorKind::InterestRate => &self.interest_rate,
            IndicatorKind::GdpGrowth => &self.gdp_growth,
        }
    }

    /// First source in the chain that answers wins
    pub async fn resolve(&self, kind: IndicatorKind, country: Country) -> (Indicator, Option<Provenance>) {
        for source in self.chain(kind) {
            if !source.supports(kind, country) {
                continue;
            }
            match source.fetch(kind, country).await {
                Ok(obs) => {
                    let indicator = Indicator::rounded(obs.value);
                    if indicator.is_available() {
                        tracing::debug!(%kind, %country, source = %obs.source, "indicator resolved");
                        return (
                            indicator,
                            Some(Provenance {
                                source: obs.source,
                                period: obs.period,
                            }),
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(%kind, %country, source = source.name(), "indicator source failed: {e}");
                }
            }
        }
        tracing::warn!(%kind, %country, "indicator unavailable from every source");
        (Indicator::Unavailable, None)
    }

    /// Six-month change of the country's benchmark index
    pub async fn market_sentiment(&self, country: Country) -> (Indicator, Option<Provenance>) {
        let symbol = country.benchmark_index();
        match self.market.history(symbol, HistoryRange::SixMonths).await {
            Ok(history) => {
                let indicator = Indicator::from(history.change_percent());
                let provenance = indicator.is_available().then(|| Provenance {
                    source: format!("{} {symbol}", self.market.name()),
                    period: Some(HistoryRange::SixMonths.to_string()),
                });
                (indicator, provenance)
            }
            Err(e) => {
                tracing::warn!(%country, symbol, "benchmark history failed: {e}");
                (Indicator::Unavailable, None)
            }
        }
    }

    /// Full bundle; unknown countries get every indicator unavailable
    pub async fn analyze(&self, country: &CountryRef) -> IndicatorBundle {
        let Some(known) = country.known() else {
            tracing::info!(country = country.name(), "unknown country; indicators unavailable");
            return IndicatorBundle::unavailable(country.name());
        };

        let (inflation, interest, gdp, sentiment) = tokio::join!(
            self.resolve(IndicatorKind::Inflation, known),
            self.resolve(IndicatorKind::InterestRate, known),
            self.resolve(IndicatorKind::GdpGrowth, known),
            self.market_sentiment(known),
        );

        let mut provenance = BTreeMap::new();
        for (field, source) in [
            (IndicatorKind::Inflation.field(), inflation.1),
            (IndicatorKind::InterestRate.field(), interest.1),
            (IndicatorKind::GdpGrowth.field(), gdp.1),
            ("market_sentiment", sentiment.1),
        ] {
            if let Some(p) = source {
                provenance.insert(field.to_string(), p);
            }
        }

        let bundle = IndicatorBundle {
            country: known.name().to_string(),
            country_code: Some(known.iso2().to_string()),
            inflation_rate: inflation.0,
            interest_rate: interest.0,
            gdp_growth: gdp.0,
            market_sentiment: sentiment.0,
            market_trend: MarketTrend::from_sentiment(sentiment.0),
            provenance,
            fetched_at: Utc::now(),
        };

        tracing::info!(
            country = %known,
            available = bundle.available_count(),
            "economic indicators gathered"
        );
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{MockIndicatorSource, MockMarketData};

    fn analyst(primary: MockIndicatorSource, secondary: MockIndicatorSource) -> EconomicAnalyst {
        let primary: Arc<dyn IndicatorSource> = Arc::new(primary);
        let secondary: Arc<dyn IndicatorSource> = Arc::new(secondary);
        let market = MockMarketData::new().with_series("^NSEI", 100.0, 108.0);
        EconomicAnalyst::new(
            vec![primary.clone(), secondary.clone()],
            vec![primary.clone(), secondary.clone(), Arc::new(PolicyRateTable)],
            vec![primary, secondary],
            Arc::new(market),
        )
    }

    #[tokio::test]
    async fn falls_through_to_later_sources() {
        let primary = MockIndicatorSource::new("Primary")
            .with_value(IndicatorKind::Inflation, Country::India, 4.9532);
        let secondary = MockIndicatorSource::new("Secondary")
            .with_value(IndicatorKind::GdpGrowth, Country::India, 6.5);
        let analyst = analyst(primary, secondary);

        let bundle = analyst.analyze(&CountryRef::Known(Country::India)).await;

        assert_eq!(bundle.inflation_rate, Indicator::Value(4.95));
        assert_eq!(bundle.gdp_growth, Indicator::Value(6.5));
        // neither mock knows the rate, so the policy table answers
        assert_eq!(bundle.interest_rate, Indicator::Value(6.0));
        assert_eq!(bundle.provenance["interest_rate"].period.as_deref(), Some("April 2025"));
        assert_eq!(bundle.provenance["gdp_growth"].source, "Secondary");
        assert_eq!(bundle.market_sentiment, Indicator::Value(8.0));
        assert_eq!(bundle.market_trend, MarketTrend::Bullish);
        assert_eq!(bundle.country_code.as_deref(), Some("IN"));
    }

    #[tokio::test]
    async fn everything_failing_yields_sentinels() {
        let analyst = EconomicAnalyst::new(
            vec![Arc::new(MockIndicatorSource::new("Down"))],
            vec![],
            vec![],
            Arc::new(MockMarketData::new()),
        );
        let bundle = analyst.analyze(&CountryRef::Known(Country::Brazil)).await;
        assert!(!bundle.any_available());
        assert_eq!(bundle.market_trend, MarketTrend::Unknown);
        assert!(bundle.provenance.is_empty());
    }

    #[tokio::test]
    async fn unknown_country_skips_all_sources() {
        let source = Arc::new(MockIndicatorSource::new("Counting"));
        let analyst = EconomicAnalyst::new(
            vec![source.clone()],
            vec![source.clone()],
            vec![source.clone()],
            Arc::new(MockMarketData::new()),
        );
        let bundle = analyst.analyze(&CountryRef::Unknown("Atlantis".into())).await;
        assert_eq!(bundle.country, "Atlantis");
        assert!(source.calls().is_empty());
    }

    #[test]
    fn live_chains_build_from_default_config() {
        let analyst = EconomicAnalyst::from_config(&DataSourceConfig::default()).unwrap();
        let names: Vec<&str> = analyst.interest_rate.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["FRED", "OECD", "Central bank policy rate"]);
        let names: Vec<&str> = analyst.inflation.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["World Bank", "FRED", "OECD"]);
    }
}
