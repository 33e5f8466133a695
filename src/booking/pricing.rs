//! Per-child price calculation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::PricingSettings;

/// Attendance unit for a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Half,
    #[default]
    Full,
}

/// Rates for half and full day sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RateTable {
    pub half: Decimal,
    pub full: Decimal,
}

impl RateTable {
    pub fn new(half: Decimal, full: Decimal) -> Self {
        Self { half, full }
    }

    pub fn rate(&self, session: SessionKind) -> Decimal {
        match session {
            SessionKind::Half => self.half,
            SessionKind::Full => self.full,
        }
    }
}

/// How a program turns a child's days into a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum PriceBasis {
    /// Each day is priced by its session kind
    PerSession { rates: RateTable },
    /// Every day costs `daily_rate` regardless of session
    FlatDaily { daily_rate: Decimal },
}

impl PriceBasis {
    /// Whether the basis reads the per-day session list
    pub fn uses_sessions(&self) -> bool {
        matches!(self, PriceBasis::PerSession { .. })
    }

    /// Price for one child's selection
    pub fn price(&self, day_count: u32, sessions: &[SessionKind]) -> Decimal {
        match self {
            PriceBasis::PerSession { rates } => session_price(sessions, rates),
            PriceBasis::FlatDaily { daily_rate } => flat_price(day_count, *daily_rate),
        }
    }
}

impl From<&PricingSettings> for PriceBasis {
    fn from(settings: &PricingSettings) -> Self {
        match settings {
            PricingSettings::Sessions { half_rate, full_rate } => PriceBasis::PerSession {
                rates: RateTable::new(*half_rate, *full_rate),
            },
            PricingSettings::FlatDaily { daily_rate } => PriceBasis::FlatDaily {
                daily_rate: *daily_rate,
            },
        }
    }
}

/// Sum of per-day rates
pub fn session_price(sessions: &[SessionKind], rates: &RateTable) -> Decimal {
    sessions.iter().map(|s| rates.rate(*s)).sum()
}

pub fn flat_price(day_count: u32, daily_rate: Decimal) -> Decimal {
    daily_rate * Decimal::from(day_count)
}

/// Sum of already-computed child prices
pub fn total<I>(prices: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    prices.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionKind::{Full, Half};

    fn rates() -> RateTable {
        RateTable::new(Decimal::from(2000), Decimal::from(3500))
    }

    #[test]
    fn test_session_price_matches_counts() {
        let sessions = [Half, Full, Full, Half, Full];
        let expected = Decimal::from(2 * 2000 + 3 * 3500);
        assert_eq!(session_price(&sessions, &rates()), expected);
        assert_eq!(session_price(&[], &rates()), Decimal::ZERO);
    }

    #[test]
    fn test_changing_one_day_only_moves_that_day() {
        let before = [Full, Full, Full];
        let after = [Full, Half, Full];
        let delta = session_price(&before, &rates()) - session_price(&after, &rates());
        assert_eq!(delta, Decimal::from(1500));
    }

    #[test]
    fn test_two_children_total() {
        let a = session_price(&[Half, Full], &rates());
        let b = session_price(&[Full], &rates());
        assert_eq!(total([a, b]), Decimal::from(9000));
    }

    #[test]
    fn test_flat_daily_ignores_sessions() {
        let basis = PriceBasis::FlatDaily {
            daily_rate: Decimal::from(2500),
        };
        assert_eq!(basis.price(4, &[Half]), Decimal::from(10000));
        assert!(!basis.uses_sessions());
    }

    #[test]
    fn test_new_days_default_to_full() {
        assert_eq!(SessionKind::default(), Full);
    }
}
