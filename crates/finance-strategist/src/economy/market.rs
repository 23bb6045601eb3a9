//! Market Overview
//!
//! Major US indices, the eleven SPDR sector ETFs and a country watch-list,
//! all fetched concurrently. A symbol that fails is left out; the overview
//! itself never fails.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::{HistoryRange, MarketDataSource, MarketTrend};
use crate::country::Country;

const INDICES: [(&str, &str); 5] = [
    ("S&P 500", "^GSPC"),
    ("NASDAQ", "^IXIC"),
    ("Dow Jones", "^DJI"),
    ("Russell 2000", "^RUT"),
    ("VIX", "^VIX"),
];

const SECTOR_ETFS: [(&str, &str); 11] = [
    ("Technology", "XLK"),
    ("Healthcare", "XLV"),
    ("Financials", "XLF"),
    ("Consumer Discretionary", "XLY"),
    ("Communication Services", "XLC"),
    ("Industrials", "XLI"),
    ("Consumer Staples", "XLP"),
    ("Energy", "XLE"),
    ("Utilities", "XLU"),
    ("Real Estate", "XLRE"),
    ("Materials", "XLB"),
];

/// One-month move that makes a sector bullish or bearish
const SECTOR_TREND_THRESHOLD: f64 = 3.0;
const MAX_BULLISH_SECTORS: usize = 5;
/// One-month gain a watch-list stock needs to count as bullish
const STOCK_MOMENTUM_THRESHOLD: f64 = 2.0;
const MAX_BULLISH_STOCKS: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    /// Day-over-day change, percent
    pub change_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorPerformance {
    pub sector: String,
    pub symbol: String,
    /// One-month change, percent
    pub performance: f64,
    pub trend: MarketTrend,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockMomentum {
    pub symbol: String,
    pub name: Option<String>,
    pub price: f64,
    /// One-month change, percent
    pub change_percent: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketOverview {
    pub country: Option<Country>,
    pub indices: Vec<IndexQuote>,
    /// Every sector that answered, best first
    pub sectors: Vec<SectorPerformance>,
    pub bullish_sectors: Vec<SectorPerformance>,
    pub bullish_stocks: Vec<StockMomentum>,
    pub fetched_at: DateTime<Utc>,
}

impl MarketOverview {
    pub fn has_bullish_data(&self) -> bool {
        !self.bullish_sectors.is_empty() || !self.bullish_stocks.is_empty()
    }

    /// Markdown section for prompts and the fallback document
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        if !self.indices.is_empty() {
            out.push_str("Major indices:\n");
            for q in &self.indices {
                out.push_str(&format!(
                    "- {} ({}): {:.2} ({:+.2}% today)\n",
                    q.name, q.symbol, q.price, q.change_percent
                ));
            }
        }

        if !self.bullish_sectors.is_empty() {
            out.push_str("\nBullish sectors (1-month performance):\n");
            for s in &self.bullish_sectors {
                out.push_str(&format!("- {} ({}): {:+.2}%\n", s.sector, s.symbol, s.performance));
            }
        }

        if !self.bullish_stocks.is_empty() {
            out.push_str("\nStocks with positive momentum (1-month):\n");
            for s in &self.bullish_stocks {
                let name = s.name.as_deref().unwrap_or(&s.symbol);
                out.push_str(&format!(
                    "- {name} ({}): {:.2}, {:+.2}%\n",
                    s.symbol, s.price, s.change_percent
                ));
            }
        }

        if out.is_empty() {
            out.push_str("Market data unavailable.\n");
        }
        out
    }
}

fn sector_trend(change: f64) -> MarketTrend {
    if change > SECTOR_TREND_THRESHOLD {
        MarketTrend::Bullish
    } else if change < -SECTOR_TREND_THRESHOLD {
        MarketTrend::Bearish
    } else {
        MarketTrend::Neutral
    }
}

pub struct MarketAnalyst {
    source: Arc<dyn MarketDataSource>,
}

impl MarketAnalyst {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    pub async fn indices(&self) -> Vec<IndexQuote> {
        let fetches = INDICES.iter().map(|&(name, symbol)| async move {
            let history = self
                .source
                .history(symbol, HistoryRange::FiveDays)
                .await
                .inspect_err(|e| tracing::warn!(symbol, "index quote failed: {e}"))
                .ok()?;
            Some(IndexQuote {
                name: name.to_string(),
                symbol: symbol.to_string(),
                price: history.latest()?,
                change_percent: history.last_change_percent().unwrap_or(0.0),
            })
        });
        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// All sectors that answered, sorted by one-month performance
    pub async fn sectors(&self) -> Vec<SectorPerformance> {
        let fetches = SECTOR_ETFS.iter().map(|&(sector, symbol)| async move {
            let history = self
                .source
                .history(symbol, HistoryRange::OneMonth)
                .await
                .inspect_err(|e| tracing::warn!(symbol, "sector history failed: {e}"))
                .ok()?;
            let performance = history.change_percent()?;
            Some(SectorPerformance {
                sector: sector.to_string(),
                symbol: symbol.to_string(),
                performance,
                trend: sector_trend(performance),
            })
        });
        let mut sectors: Vec<_> = join_all(fetches).await.into_iter().flatten().collect();
        sectors.sort_by(|a, b| b.performance.total_cmp(&a.performance));
        sectors
    }

    /// Watch-list names up more than 2% over the month, strongest first
    pub async fn bullish_stocks(&self, country: Country) -> Vec<StockMomentum> {
        let fetches = country.watch_list().iter().map(|&symbol| async move {
            let history = self
                .source
                .history(symbol, HistoryRange::OneMonth)
                .await
                .inspect_err(|e| tracing::debug!(symbol, "watch-list history failed: {e}"))
                .ok()?;
            let change_percent = history.change_percent()?;
            (change_percent > STOCK_MOMENTUM_THRESHOLD).then_some(StockMomentum {
                symbol: symbol.to_string(),
                price: history.latest()?,
                name: history.name,
                change_percent,
            })
        });
        let mut stocks: Vec<_> = join_all(fetches).await.into_iter().flatten().collect();
        stocks.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent));
        stocks.truncate(MAX_BULLISH_STOCKS);
        stocks
    }

    /// Indices, sectors and (for a known country) its watch-list
    pub async fn overview(&self, country: Option<Country>) -> MarketOverview {
        let stocks = async {
            match country {
                Some(c) => self.bullish_stocks(c).await,
                None => Vec::new(),
            }
        };
        let (indices, sectors, bullish_stocks) = tokio::join!(self.indices(), self.sectors(), stocks);

        let bullish_sectors: Vec<_> = sectors
            .iter()
            .filter(|s| s.trend == MarketTrend::Bullish)
            .take(MAX_BULLISH_SECTORS)
            .cloned()
            .collect();

        tracing::info!(
            indices = indices.len(),
            sectors = sectors.len(),
            bullish_sectors = bullish_sectors.len(),
            bullish_stocks = bullish_stocks.len(),
            "market overview gathered"
        );

        MarketOverview {
            country,
            indices,
            sectors,
            bullish_sectors,
            bullish_stocks,
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::MockMarketData;

    fn market() -> MockMarketData {
        MockMarketData::new()
            .with_series("^GSPC", 5000.0, 5100.0)
            .with_series("XLK", 100.0, 108.0)
            .with_series("XLE", 100.0, 90.0)
            .with_series("XLU", 100.0, 101.0)
            .with_series("XLV", 100.0, 104.0)
            .with_series("AAPL", 200.0, 210.0)
            .with_name("AAPL", "Apple Inc.")
            .with_series("MSFT", 400.0, 404.0)
    }

    #[tokio::test]
    async fn overview_skips_missing_symbols() {
        let analyst = MarketAnalyst::new(Arc::new(market()));
        let overview = analyst.overview(Some(Country::UnitedStates)).await;

        assert_eq!(overview.indices.len(), 1);
        assert_eq!(overview.indices[0].name, "S&P 500");
        // last step of a linear 5000 -> 5100 series over five steps
        assert!((overview.indices[0].change_percent - 20.0 / 5080.0 * 100.0).abs() < 1e-9);

        assert_eq!(overview.sectors.len(), 4);
        assert_eq!(overview.sectors[0].symbol, "XLK");
        assert_eq!(overview.sectors[3].trend, MarketTrend::Bearish);

        let bullish: Vec<&str> = overview.bullish_sectors.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(bullish, ["XLK", "XLV"]);

        // MSFT gained 1%, under the momentum bar
        assert_eq!(overview.bullish_stocks.len(), 1);
        assert_eq!(overview.bullish_stocks[0].name.as_deref(), Some("Apple Inc."));
        assert!(overview.has_bullish_data());
    }

    #[tokio::test]
    async fn empty_market_still_renders() {
        let analyst = MarketAnalyst::new(Arc::new(MockMarketData::new()));
        let overview = analyst.overview(None).await;
        assert!(!overview.has_bullish_data());
        assert_eq!(overview.to_markdown(), "Market data unavailable.\n");
    }

    #[tokio::test]
    async fn markdown_lists_opportunities() {
        let analyst = MarketAnalyst::new(Arc::new(market()));
        let md = analyst.overview(Some(Country::UnitedStates)).await.to_markdown();
        assert!(md.contains("- Technology (XLK): +8.00%"));
        assert!(md.contains("Apple Inc. (AAPL)"));
        assert!(!md.contains("XLE"));
    }

    #[test]
    fn sector_trend_thresholds() {
        assert_eq!(sector_trend(3.5), MarketTrend::Bullish);
        assert_eq!(sector_trend(3.0), MarketTrend::Neutral);
        assert_eq!(sector_trend(-3.1), MarketTrend::Bearish);
    }
}
