//! Swap fairness calculator.
//!
//! Values each side of a trade as `base rate × level multiplier × hours` and
//! compares them. Pure arithmetic over the fixed tables in `constants`.

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        ADJUSTMENT_HINT_DIFFERENCE, BALANCED_THRESHOLD_PERCENT, SKILL_BASE_RATES, base_rate_for,
        is_valid_swap_hours,
    },
    error::{AppError, AppResult},
    models::SkillLevel,
};

/// One side of a proposed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSide {
    pub skill: String,
    pub hours: i32,
    pub level: SkillLevel,
}

impl ServiceSide {
    pub fn value(&self) -> f64 {
        base_rate_for(&self.skill) * self.level.multiplier() * f64::from(self.hours)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FairnessRequest {
    pub yours: ServiceSide,
    pub theirs: ServiceSide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FairnessVerdict {
    Balanced,
    #[serde(rename = "Favors You")]
    FavorsYou,
    #[serde(rename = "Favors Them")]
    FavorsThem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessReport {
    pub your_value: f64,
    pub their_value: f64,
    pub difference: f64,
    /// Rounded and clamped to 0..=100 for display
    pub fairness_percentage: i64,
    pub verdict: FairnessVerdict,
    pub suggest_adjustment: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RateEntry {
    pub skill: &'static str,
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelEntry {
    pub level: SkillLevel,
    pub label: &'static str,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatesTable {
    pub skills: Vec<RateEntry>,
    pub levels: Vec<LevelEntry>,
}

pub fn evaluate(yours: &ServiceSide, theirs: &ServiceSide) -> AppResult<FairnessReport> {
    for (field, side) in [("yours.hours", yours), ("theirs.hours", theirs)] {
        if !is_valid_swap_hours(side.hours) {
            return Err(AppError::invalid(field, "Hours must be between 1 and 100"));
        }
    }

    let your_value = yours.value();
    let their_value = theirs.value();
    let difference = (your_value - their_value).abs();
    let average = (your_value + their_value) / 2.0;

    let raw_percentage = if average > 0.0 {
        (average - difference) / average * 100.0
    } else {
        100.0
    };

    let verdict = if raw_percentage >= BALANCED_THRESHOLD_PERCENT {
        FairnessVerdict::Balanced
    } else if your_value > their_value {
        FairnessVerdict::FavorsYou
    } else {
        FairnessVerdict::FavorsThem
    };

    let difference = difference.round();

    Ok(FairnessReport {
        your_value,
        their_value,
        difference,
        fairness_percentage: raw_percentage.round().clamp(0.0, 100.0) as i64,
        verdict,
        suggest_adjustment: difference > ADJUSTMENT_HINT_DIFFERENCE,
    })
}

pub fn rates_table() -> RatesTable {
    RatesTable {
        skills: SKILL_BASE_RATES
            .iter()
            .map(|&(skill, hourly_rate)| RateEntry { skill, hourly_rate })
            .collect(),
        levels: SkillLevel::ALL
            .iter()
            .map(|&level| LevelEntry {
                level,
                label: level.label(),
                multiplier: level.multiplier(),
            })
            .collect(),
    }
}
