//! Countries
//!
//! Static reference data per country: ISO codes, currency, benchmark index
//! and a watch-list of large caps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategistError};

const US_WATCH_LIST: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "JPM"];
const DEFAULT_WATCH_LIST: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Country {
    UnitedStates,
    Canada,
    UnitedKingdom,
    France,
    Germany,
    Italy,
    Japan,
    India,
    China,
    Brazil,
    Australia,
    SouthKorea,
    Mexico,
    Netherlands,
    Spain,
    Switzerland,
}

impl Country {
    pub const ALL: [Self; 16] = [
        Self::UnitedStates,
        Self::Canada,
        Self::UnitedKingdom,
        Self::France,
        Self::Germany,
        Self::Italy,
        Self::Japan,
        Self::India,
        Self::China,
        Self::Brazil,
        Self::Australia,
        Self::SouthKorea,
        Self::Mexico,
        Self::Netherlands,
        Self::Spain,
        Self::Switzerland,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::UnitedStates => "United States",
            Self::Canada => "Canada",
            Self::UnitedKingdom => "United Kingdom",
            Self::France => "France",
            Self::Germany => "Germany",
            Self::Italy => "Italy",
            Self::Japan => "Japan",
            Self::India => "India",
            Self::China => "China",
            Self::Brazil => "Brazil",
            Self::Australia => "Australia",
            Self::SouthKorea => "South Korea",
            Self::Mexico => "Mexico",
            Self::Netherlands => "Netherlands",
            Self::Spain => "Spain",
            Self::Switzerland => "Switzerland",
        }
    }

    pub const fn iso2(self) -> &'static str {
        match self {
            Self::UnitedStates => "US",
            Self::Canada => "CA",
            Self::UnitedKingdom => "GB",
            Self::France => "FR",
            Self::Germany => "DE",
            Self::Italy => "IT",
            Self::Japan => "JP",
            Self::India => "IN",
            Self::China => "CN",
            Self::Brazil => "BR",
            Self::Australia => "AU",
            Self::SouthKorea => "KR",
            Self::Mexico => "MX",
            Self::Netherlands => "NL",
            Self::Spain => "ES",
            Self::Switzerland => "CH",
        }
    }

    pub const fn iso3(self) -> &'static str {
        match self {
            Self::UnitedStates => "USA",
            Self::Canada => "CAN",
            Self::UnitedKingdom => "GBR",
            Self::France => "FRA",
            Self::Germany => "DEU",
            Self::Italy => "ITA",
            Self::Japan => "JPN",
            Self::India => "IND",
            Self::China => "CHN",
            Self::Brazil => "BRA",
            Self::Australia => "AUS",
            Self::SouthKorea => "KOR",
            Self::Mexico => "MEX",
            Self::Netherlands => "NLD",
            Self::Spain => "ESP",
            Self::Switzerland => "CHE",
        }
    }

    pub const fn currency(self) -> &'static str {
        match self {
            Self::UnitedStates => "USD",
            Self::Canada => "CAD",
            Self::UnitedKingdom => "GBP",
            Self::France | Self::Germany | Self::Italy | Self::Netherlands | Self::Spain => "EUR",
            Self::Japan => "JPY",
            Self::India => "INR",
            Self::China => "CNY",
            Self::Brazil => "BRL",
            Self::Australia => "AUD",
            Self::SouthKorea => "KRW",
            Self::Mexico => "MXN",
            Self::Switzerland => "CHF",
        }
    }

    pub const fn currency_symbol(self) -> &'static str {
        match self {
            Self::UnitedStates => "$",
            Self::Canada => "C$",
            Self::UnitedKingdom => "£",
            Self::France | Self::Germany | Self::Italy | Self::Netherlands | Self::Spain => "€",
            Self::Japan | Self::China => "¥",
            Self::India => "₹",
            Self::Brazil => "R$",
            Self::Australia => "A$",
            Self::SouthKorea => "₩",
            Self::Mexico => "MX$",
            Self::Switzerland => "CHF ",
        }
    }

    /// Yahoo Finance symbol of the headline equity index
    pub const fn benchmark_index(self) -> &'static str {
        match self {
            Self::UnitedStates => "^GSPC",
            Self::Canada => "^GSPTSE",
            Self::UnitedKingdom => "^FTSE",
            Self::France => "^FCHI",
            Self::Germany => "^GDAXI",
            Self::Italy => "FTSEMIB.MI",
            Self::Japan => "^N225",
            Self::India => "^NSEI",
            Self::China => "000001.SS",
            Self::Brazil => "^BVSP",
            Self::Australia => "^AXJO",
            Self::SouthKorea => "^KS11",
            Self::Mexico => "^MXX",
            Self::Netherlands => "^AEX",
            Self::Spain => "^IBEX",
            Self::Switzerland => "^SSMI",
        }
    }

    /// Large caps screened for bullish momentum
    pub const fn watch_list(self) -> &'static [&'static str] {
        match self {
            Self::UnitedStates => US_WATCH_LIST,
            Self::India => &["RELIANCE.NS", "TCS.NS", "INFY.NS", "HDFCBANK.NS", "ICICIBANK.NS", "ITC.NS"],
            Self::UnitedKingdom => &["SHEL.L", "AZN.L", "ULVR.L", "LSEG.L", "HSBA.L", "BP.L"],
            Self::Canada => &["SHOP.TO", "RY.TO", "TD.TO", "CNR.TO", "BNS.TO", "BMO.TO"],
            Self::France => &["MC.PA", "OR.PA", "SAN.PA", "TTE.PA", "BNP.PA", "AIR.PA"],
            Self::Germany => &["SAP.DE", "SIE.DE", "ALV.DE", "DTE.DE", "MUV2.DE", "ADS.DE"],
            Self::Italy => &["ISP.MI", "UCG.MI", "ENI.MI", "TIT.MI", "RACE.MI", "STM.MI"],
            Self::Japan => &["7203.T", "6758.T", "9984.T", "8306.T", "6861.T", "9432.T"],
            _ => DEFAULT_WATCH_LIST,
        }
    }

    /// Whether the tax database covers this country
    pub const fn has_tax_rules(self) -> bool {
        matches!(
            self,
            Self::UnitedStates
                | Self::Canada
                | Self::UnitedKingdom
                | Self::France
                | Self::Germany
                | Self::Italy
                | Self::Japan
                | Self::India
        )
    }

    /// Look up by name, alias or ISO code, case-insensitively
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase();
        let key = key.trim_start_matches("the ");

        let alias = match key {
            "usa" | "u.s." | "u.s.a." | "america" | "united states of america" => {
                Some(Self::UnitedStates)
            }
            "uk" | "u.k." | "britain" | "great britain" | "england" => Some(Self::UnitedKingdom),
            "korea" | "republic of korea" => Some(Self::SouthKorea),
            "holland" => Some(Self::Netherlands),
            "deutschland" => Some(Self::Germany),
            "bharat" => Some(Self::India),
            _ => None,
        };

        alias.or_else(|| {
            Self::ALL.into_iter().find(|c| {
                c.name().eq_ignore_ascii_case(key)
                    || c.iso2().eq_ignore_ascii_case(key)
                    || c.iso3().eq_ignore_ascii_case(key)
            })
        })
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = StrategistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| StrategistError::UnsupportedCountry(s.trim().to_string()))
    }
}

impl TryFrom<String> for Country {
    type Error = StrategistError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Country> for &'static str {
    fn from(country: Country) -> Self {
        country.name()
    }
}

/// A country as the user typed it, resolved when possible
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryRef {
    Known(Country),
    Unknown(String),
}

impl CountryRef {
    /// Resolve user input; an absent or blank country means the United States
    pub fn resolve(input: Option<&str>) -> Self {
        match input.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::Known(Country::UnitedStates),
            Some(text) => Country::parse(text).map_or_else(|| Self::Unknown(text.to_string()), Self::Known),
        }
    }

    pub const fn known(&self) -> Option<Country> {
        match self {
            Self::Known(country) => Some(*country),
            Self::Unknown(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Known(country) => country.name(),
            Self::Unknown(name) => name,
        }
    }

    pub fn currency_symbol(&self) -> &'static str {
        self.known().map_or("$", Country::currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_aliases_and_codes() {
        assert_eq!(Country::parse("India"), Some(Country::India));
        assert_eq!(Country::parse("  united kingdom "), Some(Country::UnitedKingdom));
        assert_eq!(Country::parse("UK"), Some(Country::UnitedKingdom));
        assert_eq!(Country::parse("usa"), Some(Country::UnitedStates));
        assert_eq!(Country::parse("DEU"), Some(Country::Germany));
        assert_eq!(Country::parse("jp"), Some(Country::Japan));
        assert_eq!(Country::parse("Atlantis"), None);
    }

    #[test]
    fn absent_country_defaults_to_us() {
        assert_eq!(CountryRef::resolve(None), CountryRef::Known(Country::UnitedStates));
        assert_eq!(CountryRef::resolve(Some("  ")), CountryRef::Known(Country::UnitedStates));
        assert_eq!(
            CountryRef::resolve(Some("Atlantis")),
            CountryRef::Unknown("Atlantis".into())
        );
    }

    #[test]
    fn every_country_has_reference_data() {
        for country in Country::ALL {
            assert_eq!(country.iso2().len(), 2);
            assert_eq!(country.iso3().len(), 3);
            assert!(!country.watch_list().is_empty());
            assert!(!country.benchmark_index().is_empty());
            assert_eq!(Country::parse(country.name()), Some(country));
        }
    }

    #[test]
    fn tax_coverage_is_the_core_eight() {
        let covered = Country::ALL.iter().filter(|c| c.has_tax_rules()).count();
        assert_eq!(covered, 8);
    }

    #[test]
    fn serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Country::SouthKorea).unwrap(), r#""South Korea""#);
        let parsed: Country = serde_json::from_str(r#""CAN""#).unwrap();
        assert_eq!(parsed, Country::Canada);
    }
}
