//! Age bracket derivation from a birth date

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Discrete age ranges used to group children in programs.
///
/// Variants are ordered youngest to oldest; upper bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum AgeBracket {
    #[serde(rename = "3-below")]
    ThreeAndBelow,
    #[serde(rename = "4-6")]
    FourToSix,
    #[serde(rename = "7-10")]
    SevenToTen,
    #[serde(rename = "11-13")]
    ElevenToThirteen,
    #[serde(rename = "14-17")]
    FourteenToSeventeen,
}

impl AgeBracket {
    pub fn label(&self) -> &'static str {
        match self {
            AgeBracket::ThreeAndBelow => "3-below",
            AgeBracket::FourToSix => "4-6",
            AgeBracket::SevenToTen => "7-10",
            AgeBracket::ElevenToThirteen => "11-13",
            AgeBracket::FourteenToSeventeen => "14-17",
        }
    }

    /// Bracket for a whole-year age. Negative ages land in the youngest
    /// bracket and anything past 17 clamps to the oldest.
    pub fn for_age(age: i32) -> Self {
        match age {
            i32::MIN..=3 => AgeBracket::ThreeAndBelow,
            4..=6 => AgeBracket::FourToSix,
            7..=10 => AgeBracket::SevenToTen,
            11..=13 => AgeBracket::ElevenToThirteen,
            _ => AgeBracket::FourteenToSeventeen,
        }
    }
}

impl std::fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whole years between `birth` and `as_of`, one less if the birthday has
/// not come around yet this year.
pub fn age_in_years(birth: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut age = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Bracket for a birth date, or `None` when no birth date was given
pub fn bracket_for(birth: Option<NaiveDate>, as_of: NaiveDate) -> Option<AgeBracket> {
    birth.map(|b| AgeBracket::for_age(age_in_years(b, as_of)))
}
