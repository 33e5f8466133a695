//! Keeps the derived parts of a registration form consistent with what the
//! parent typed: age bracket, per-day session list, child price and total.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    age::{self, AgeBracket},
    pricing::{self, PriceBasis, SessionKind},
};
use crate::models::registration::{Child, ChildInput};

/// Grow with `Full` days or truncate so that `sessions.len() == days`.
/// Existing entries keep their values.
pub fn resize_sessions(sessions: &mut Vec<SessionKind>, days: usize) {
    sessions.resize(days, SessionKind::default());
}

/// Day count, session list and the price derived from them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySelection {
    pub number_of_days: u32,
    pub sessions: Vec<SessionKind>,
    pub price: Decimal,
}

impl DaySelection {
    /// Build and reconcile a selection. A missing or zero day count falls
    /// back to the number of sessions supplied, with a minimum of one day.
    pub fn new(number_of_days: Option<u32>, sessions: Vec<SessionKind>, basis: &PriceBasis) -> Self {
        let number_of_days = match number_of_days {
            Some(n) if n > 0 => n,
            _ => (sessions.len() as u32).max(1),
        };
        let mut selection = Self {
            number_of_days,
            sessions,
            price: Decimal::ZERO,
        };
        selection.reconcile(basis);
        selection
    }

    /// The single update step: resize first, then price.
    pub fn reconcile(&mut self, basis: &PriceBasis) {
        if basis.uses_sessions() {
            resize_sessions(&mut self.sessions, self.number_of_days as usize);
        } else {
            self.sessions.clear();
        }
        self.price = basis.price(self.number_of_days, &self.sessions);
    }

    pub fn set_day_count(&mut self, days: u32, basis: &PriceBasis) {
        self.number_of_days = days;
        self.reconcile(basis);
    }

    /// Change one day's session. Returns `false` if `day` is out of range.
    pub fn set_session(&mut self, day: usize, kind: SessionKind, basis: &PriceBasis) -> bool {
        match self.sessions.get_mut(day) {
            Some(slot) => {
                *slot = kind;
                self.reconcile(basis);
                true
            }
            None => false,
        }
    }
}

/// Derived view of a whole form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormQuote {
    pub children: Vec<Child>,
    pub total: Decimal,
}

/// Reconcile a single child. An age bracket computed from the birth date
/// wins over one typed by hand; with no birth date the typed one is kept.
pub fn reconcile_child(input: &ChildInput, basis: &PriceBasis, today: NaiveDate) -> Child {
    let selection = DaySelection::new(input.number_of_days, input.sessions.clone(), basis);
    let age_bracket: Option<AgeBracket> =
        age::bracket_for(input.date_of_birth, today).or(input.age_bracket);

    Child {
        full_name: input.full_name.trim().to_string(),
        date_of_birth: input.date_of_birth,
        age_bracket,
        number_of_days: selection.number_of_days,
        sessions: selection.sessions,
        price: selection.price,
    }
}

/// Reconcile every child and sum the prices
pub fn quote(children: &[ChildInput], basis: &PriceBasis, today: NaiveDate) -> FormQuote {
    let children: Vec<Child> = children
        .iter()
        .map(|c| reconcile_child(c, basis, today))
        .collect();
    let total = pricing::total(children.iter().map(|c| c.price));
    FormQuote { children, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::pricing::RateTable;
    use chrono::Months;
    use SessionKind::{Full, Half};

    fn per_session() -> PriceBasis {
        PriceBasis::PerSession {
            rates: RateTable::new(Decimal::from(2000), Decimal::from(3500)),
        }
    }

    fn child(dob: Option<NaiveDate>, days: Option<u32>, sessions: Vec<SessionKind>) -> ChildInput {
        ChildInput {
            full_name: " Wanjiru ".to_string(),
            date_of_birth: dob,
            age_bracket: None,
            number_of_days: days,
            sessions,
        }
    }

    #[test]
    fn test_resize_grows_with_full_and_truncates_in_place() {
        let mut sessions = vec![Half, Full];
        resize_sessions(&mut sessions, 5);
        assert_eq!(sessions, vec![Half, Full, Full, Full, Full]);

        resize_sessions(&mut sessions, 1);
        assert_eq!(sessions, vec![Half]);
    }

    #[test]
    fn test_day_count_change_keeps_untouched_days() {
        let basis = per_session();
        let mut selection = DaySelection::new(Some(2), vec![Half, Half], &basis);
        assert_eq!(selection.price, Decimal::from(4000));

        selection.set_day_count(4, &basis);
        assert_eq!(selection.sessions, vec![Half, Half, Full, Full]);
        assert_eq!(selection.price, Decimal::from(11000));

        selection.set_day_count(1, &basis);
        assert_eq!(selection.sessions, vec![Half]);
        assert_eq!(selection.price, Decimal::from(2000));
    }

    #[test]
    fn test_set_session_reprices() {
        let basis = per_session();
        let mut selection = DaySelection::new(Some(3), vec![], &basis);
        assert!(selection.set_session(1, Half, &basis));
        assert_eq!(selection.price, Decimal::from(9000));
        assert!(!selection.set_session(7, Half, &basis));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let basis = per_session();
        let mut selection = DaySelection::new(Some(3), vec![Half], &basis);
        let snapshot = selection.clone();
        selection.reconcile(&basis);
        assert_eq!(selection, snapshot);
    }

    #[test]
    fn test_missing_day_count_uses_session_length() {
        let basis = per_session();
        assert_eq!(DaySelection::new(None, vec![Half, Half, Full], &basis).number_of_days, 3);
        assert_eq!(DaySelection::new(Some(0), vec![], &basis).number_of_days, 1);
    }

    #[test]
    fn test_eight_year_old_three_full_days() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let dob = today.checked_sub_months(Months::new(8 * 12)).unwrap();
        let quote = quote(&[child(Some(dob), Some(3), vec![])], &per_session(), today);

        let c = &quote.children[0];
        assert_eq!(c.full_name, "Wanjiru");
        assert_eq!(c.age_bracket, Some(AgeBracket::SevenToTen));
        assert_eq!(c.sessions, vec![Full, Full, Full]);
        assert_eq!(c.price, Decimal::from(10500));
        assert_eq!(quote.total, Decimal::from(10500));
    }

    #[test]
    fn test_two_children_total() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let quote = quote(
            &[
                child(None, Some(2), vec![Half, Full]),
                child(None, Some(1), vec![Full]),
            ],
            &per_session(),
            today,
        );
        assert_eq!(quote.total, Decimal::from(9000));
        assert_eq!(
            quote.total,
            quote.children.iter().map(|c| c.price).sum::<Decimal>()
        );
    }

    #[test]
    fn test_typed_bracket_kept_without_birth_date() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let mut input = child(None, Some(1), vec![]);
        input.age_bracket = Some(AgeBracket::FourToSix);
        let c = reconcile_child(&input, &per_session(), today);
        assert_eq!(c.age_bracket, Some(AgeBracket::FourToSix));
    }

    #[test]
    fn test_flat_daily_clears_sessions() {
        let basis = PriceBasis::FlatDaily {
            daily_rate: Decimal::from(2500),
        };
        let selection = DaySelection::new(Some(3), vec![Half], &basis);
        assert!(selection.sessions.is_empty());
        assert_eq!(selection.price, Decimal::from(7500));
    }
}
