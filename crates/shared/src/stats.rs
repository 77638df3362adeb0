//! Derived statistics over character rows: height totals and the metric to
//! imperial conversion shown in the table footer.

use std::fmt;

use crate::{domain::Character, error::UnitError};

const INCHES_PER_CM: f64 = 0.3937;
const INCHES_PER_FOOT: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeetInches {
    pub feet: u64,
    pub inches: u64,
}

impl FeetInches {
    pub fn from_cm(cm: f64) -> Result<Self, UnitError> {
        if !cm.is_finite() {
            return Err(UnitError::NotFinite(cm));
        }
        if cm < 0.0 {
            return Err(UnitError::Negative(cm));
        }

        let real_feet = cm * INCHES_PER_CM / INCHES_PER_FOOT;
        let mut feet = real_feet.floor() as u64;
        let mut inches = ((real_feet - feet as f64) * INCHES_PER_FOOT).round() as u64;
        // 11.5in and up rounds to a whole foot.
        if inches >= INCHES_PER_FOOT as u64 {
            feet = feet.saturating_add(1);
            inches = 0;
        }
        Ok(Self { feet, inches })
    }
}

impl fmt::Display for FeetInches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ft/{}in", self.feet, self.inches)
    }
}

pub fn cm_to_feet_inches(cm: f64) -> Result<String, UnitError> {
    FeetInches::from_cm(cm).map(|value| value.to_string())
}

/// Height summary of one page of character rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeightAggregate {
    pub total_height_cm: f64,
    pub unknown_count: usize,
}

impl HeightAggregate {
    pub fn total_feet_inches(&self) -> FeetInches {
        // The fold only ever adds finite, non-negative values and saturates.
        FeetInches::from_cm(self.total_height_cm).unwrap_or(FeetInches { feet: 0, inches: 0 })
    }

    pub fn footer_text(&self) -> String {
        format!(
            "Total Height: {}cm ({}) - {} unknown height",
            format_cm(self.total_height_cm),
            self.total_feet_inches(),
            self.unknown_count
        )
    }
}

/// Whole totals print without a fraction, others with one decimal.
fn format_cm(cm: f64) -> String {
    let text = format!("{cm:.1}");
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}

/// Recomputes the aggregate from scratch over `rows`.
///
/// Rows whose height is the `unknown` sentinel are counted, not summed. Any
/// other height that fails to parse is counted as unknown as well.
pub fn aggregate_heights<'a, I>(rows: I) -> HeightAggregate
where
    I: IntoIterator<Item = &'a Character>,
{
    rows.into_iter()
        .fold(HeightAggregate::default(), |mut acc, row| {
            match row.height_cm() {
                Some(cm) => acc.total_height_cm = (acc.total_height_cm + cm).min(f64::MAX),
                None => {
                    if !row.is_height_unknown() {
                        tracing::debug!(name = %row.name, height = %row.height, "unparseable height counted as unknown");
                    }
                    acc.unknown_count += 1;
                }
            }
            acc
        })
}
