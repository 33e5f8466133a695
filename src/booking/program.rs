//! Program definitions built from configuration

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::pricing::PriceBasis;
use crate::{
    config::RegistrationConfig,
    error::{AppError, AppResult, FieldErrors},
    models::{enums::ProgramKind, registration::ChildInput},
};

/// Everything the registration pipeline needs to know about one program
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProgramDefinition {
    pub kind: ProgramKind,
    pub title: String,
    pub pricing: PriceBasis,
    pub max_days: u32,
    pub max_children: usize,
    pub requires_date_of_birth: bool,
    pub enabled: bool,
}

impl ProgramDefinition {
    /// Rules that depend on the program rather than on the payload shape
    pub fn check_children(&self, children: &[ChildInput], today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if children.is_empty() {
            errors.add("children", "At least one child is required");
        } else if children.len() > self.max_children {
            errors.add(
                "children",
                format!("At most {} children per registration", self.max_children),
            );
        }

        for (index, child) in children.iter().enumerate() {
            let field = |name: &str| format!("children[{}].{}", index, name);

            match child.date_of_birth {
                None if self.requires_date_of_birth => {
                    errors.add(field("date_of_birth"), "Date of birth is required");
                }
                Some(dob) if dob > today => {
                    errors.add(field("date_of_birth"), "Date of birth cannot be in the future");
                }
                _ => {}
            }

            if let Some(days) = child.number_of_days {
                if days == 0 || days > self.max_days {
                    errors.add(
                        field("number_of_days"),
                        format!("Number of days must be between 1 and {}", self.max_days),
                    );
                }
            }

            if child.sessions.len() > self.max_days as usize {
                errors.add(
                    field("sessions"),
                    format!("No more than {} sessions allowed", self.max_days),
                );
            }
        }

        errors
    }
}

/// Builder for [`ProgramDefinition`]
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    kind: ProgramKind,
    title: Option<String>,
    pricing: PriceBasis,
    max_days: u32,
    max_children: usize,
    requires_date_of_birth: bool,
    enabled: bool,
}

impl ProgramBuilder {
    pub fn new(kind: ProgramKind, pricing: PriceBasis) -> Self {
        Self {
            kind,
            title: None,
            pricing,
            max_days: 10,
            max_children: 6,
            requires_date_of_birth: false,
            enabled: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }

    pub fn max_children(mut self, max_children: usize) -> Self {
        self.max_children = max_children;
        self
    }

    pub fn requires_date_of_birth(mut self, required: bool) -> Self {
        self.requires_date_of_birth = required;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self) -> AppResult<ProgramDefinition> {
        if self.max_days == 0 {
            return Err(AppError::Validation(format!(
                "Program {} must allow at least one day",
                self.kind
            )));
        }
        if self.max_children == 0 {
            return Err(AppError::Validation(format!(
                "Program {} must allow at least one child",
                self.kind
            )));
        }
        let negative = match &self.pricing {
            PriceBasis::PerSession { rates } => rates.half < Decimal::ZERO || rates.full < Decimal::ZERO,
            PriceBasis::FlatDaily { daily_rate } => *daily_rate < Decimal::ZERO,
        };
        if negative {
            return Err(AppError::Validation(format!(
                "Program {} has a negative rate",
                self.kind
            )));
        }

        Ok(ProgramDefinition {
            title: self.title.unwrap_or_else(|| self.kind.to_string()),
            kind: self.kind,
            pricing: self.pricing,
            max_days: self.max_days,
            max_children: self.max_children,
            requires_date_of_birth: self.requires_date_of_birth,
            enabled: self.enabled,
        })
    }
}

/// All configured programs
#[derive(Debug, Clone, Default)]
pub struct ProgramCatalog {
    programs: BTreeMap<ProgramKind, ProgramDefinition>,
}

impl ProgramCatalog {
    pub fn from_config(config: &RegistrationConfig) -> AppResult<Self> {
        let mut catalog = Self::default();
        for (slug, settings) in &config.programs {
            let kind: ProgramKind = slug.parse().map_err(AppError::Validation)?;
            let program = ProgramBuilder::new(kind, PriceBasis::from(&settings.pricing))
                .title(settings.title.clone())
                .max_days(settings.max_days)
                .max_children(settings.max_children)
                .requires_date_of_birth(settings.requires_date_of_birth)
                .enabled(settings.enabled)
                .build()?;
            catalog.insert(program);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, program: ProgramDefinition) {
        self.programs.insert(program.kind, program);
    }

    /// Look up a program that is open for registration
    pub fn get(&self, kind: ProgramKind) -> AppResult<&ProgramDefinition> {
        match self.programs.get(&kind) {
            Some(program) if program.enabled => Ok(program),
            Some(_) => Err(AppError::ProgramUnavailable(format!(
                "Registrations for {} are closed",
                kind
            ))),
            None => Err(AppError::NotFound(format!("Program {} not found", kind))),
        }
    }

    /// Programs open for registration
    pub fn enabled(&self) -> Vec<&ProgramDefinition> {
        self.programs.values().filter(|p| p.enabled).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::pricing::{RateTable, SessionKind};
    use crate::config::{PricingSettings, ProgramSettings};

    fn sessions_basis() -> PriceBasis {
        PriceBasis::PerSession {
            rates: RateTable::new(Decimal::from(2000), Decimal::from(3500)),
        }
    }

    fn child(dob: Option<NaiveDate>, days: Option<u32>) -> ChildInput {
        ChildInput {
            full_name: "Baraka".to_string(),
            date_of_birth: dob,
            age_bracket: None,
            number_of_days: days,
            sessions: vec![SessionKind::Full],
        }
    }

    #[test]
    fn test_builder_defaults_title_to_slug() {
        let program = ProgramBuilder::new(ProgramKind::DayCamp, sessions_basis())
            .build()
            .unwrap();
        assert_eq!(program.title, "day_camp");
        assert!(program.enabled);
    }

    #[test]
    fn test_builder_rejects_bad_limits() {
        assert!(ProgramBuilder::new(ProgramKind::DayCamp, sessions_basis())
            .max_days(0)
            .build()
            .is_err());
        assert!(ProgramBuilder::new(
            ProgramKind::DayCamp,
            PriceBasis::FlatDaily {
                daily_rate: Decimal::from(-1)
            }
        )
        .build()
        .is_err());
    }

    #[test]
    fn test_check_children() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let program = ProgramBuilder::new(ProgramKind::Homeschooling, sessions_basis())
            .max_days(5)
            .max_children(2)
            .requires_date_of_birth(true)
            .build()
            .unwrap();

        let errors = program.check_children(&[], today);
        assert!(errors.contains("children"));

        let errors = program.check_children(
            &[
                child(None, Some(3)),
                child(NaiveDate::from_ymd_opt(2026, 1, 1), Some(9)),
            ],
            today,
        );
        assert!(errors.contains("children[0].date_of_birth"));
        assert!(errors.contains("children[1].date_of_birth"));
        assert!(errors.contains("children[1].number_of_days"));
        assert!(!errors.contains("children"));

        let ok = program.check_children(&[child(NaiveDate::from_ymd_opt(2018, 1, 1), Some(5))], today);
        assert!(ok.is_empty());
    }

    #[test]
    fn test_catalog_from_config() {
        let mut config = RegistrationConfig::default();
        config.programs.insert(
            "holiday_camp".to_string(),
            ProgramSettings {
                title: "Holiday Camp".to_string(),
                pricing: PricingSettings::Sessions {
                    half_rate: Decimal::from(2000),
                    full_rate: Decimal::from(3500),
                },
                max_days: 10,
                max_children: 4,
                requires_date_of_birth: false,
                enabled: true,
            },
        );
        config.programs.insert(
            "school_trip".to_string(),
            ProgramSettings {
                title: "School Trip".to_string(),
                pricing: PricingSettings::FlatDaily {
                    daily_rate: Decimal::from(1500),
                },
                max_days: 3,
                max_children: 1,
                requires_date_of_birth: false,
                enabled: false,
            },
        );

        let catalog = ProgramCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.get(ProgramKind::HolidayCamp).unwrap().title, "Holiday Camp");
        assert!(matches!(
            catalog.get(ProgramKind::SchoolTrip),
            Err(AppError::ProgramUnavailable(_))
        ));
        assert!(matches!(
            catalog.get(ProgramKind::TeamBuilding),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(catalog.enabled().len(), 1);
    }

    #[test]
    fn test_catalog_rejects_unknown_slug() {
        let mut config = RegistrationConfig::default();
        config.programs.insert(
            "moon_camp".to_string(),
            ProgramSettings {
                title: "Moon".to_string(),
                pricing: PricingSettings::FlatDaily {
                    daily_rate: Decimal::ONE,
                },
                max_days: 1,
                max_children: 1,
                requires_date_of_birth: false,
                enabled: true,
            },
        );
        assert!(ProgramCatalog::from_config(&config).is_err());
    }
}
