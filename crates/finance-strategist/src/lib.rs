//! # finance-strategist
//!
//! Personal investment strategy pipeline: a questionnaire profile goes in,
//! a markdown strategy grounded in live economic data comes out.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌─────────────────────────────┐
//! │ free text    │──▶│ Input      │──▶│                             │
//! │ (optional)   │   │ Analyzer + │   │  UserProfile                │
//! └──────────────┘   │ Literacy   │   │   ├─ validate  (hard/soft)  │
//!                    └────────────┘   │   ├─ Profiler  (snapshot)   │
//! ┌──────────────┐                    │   ├─ EconomicAnalyst        │
//! │ questionnaire│───────────────────▶│   ├─ MarketAnalyst          │
//! └──────────────┘                    │   └─ TaxContext             │
//!                                     └──────────────┬──────────────┘
//!                                                    ▼
//!                          Strategy Advisor (LLM) ──or── rule-based plan
//!                                                    ▼
//!                                     footer + disclaimers + HTML
//! ```
//!
//! ## Data sources
//!
//! Each indicator walks its own fallback chain (World Bank, FRED, OECD, a
//! static policy-rate table); a source that fails is logged and skipped.
//! Anything nobody can answer is reported as `"Unavailable"` rather than
//! failing the request.

pub mod country;
pub mod economy;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod strategy;
pub mod tax;

pub use country::{Country, CountryRef};
pub use economy::{DataSourceConfig, EconomicAnalyst, Indicator, IndicatorBundle, MarketAnalyst, MarketOverview};
pub use error::{Result, StrategistError};
pub use model::{StrategyReport, StrategyStatus, UserProfile};
pub use pipeline::StrategyPipeline;
pub use tax::{TaxEstimate, estimate_tax};
