//! Progress evaluation.
//!
//! Maps step counters to a completion percentage and a badge tier. Both
//! functions are pure: the same input always yields the same output.
//!
//! | Percentage | Tier   |
//! |------------|--------|
//! | >= 100     | Gold   |
//! | 75 ..< 100 | Silver |
//! | 50 ..< 75  | Bronze |
//! | < 50       | None   |

use serde::{Deserialize, Serialize};

use crate::error::ProgressError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    None,
    Bronze,
    Silver,
    Gold,
}

impl BadgeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTier::None => "none",
            BadgeTier::Bronze => "bronze",
            BadgeTier::Silver => "silver",
            BadgeTier::Gold => "gold",
        }
    }
}

impl std::fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub percentage: u8,
    pub tier: BadgeTier,
}

/// `round(100 * completed / total)`, clamped to `0..=100`.
///
/// `completed` outside `0..=total` is clamped rather than rejected; only a
/// non-positive `total` is an error. Halves round up.
pub fn percentage(completed: i64, total: i64) -> Result<u8, ProgressError> {
    if total <= 0 {
        return Err(ProgressError::InvalidInput { total });
    }
    let completed = completed.clamp(0, total) as i128;
    let total = total as i128;
    // (200c + t) / 2t == floor(100c/t + 1/2)
    let pct = (200 * completed + total) / (2 * total);
    Ok(pct as u8)
}

pub fn badge_tier(percentage: u8) -> BadgeTier {
    match percentage {
        100..=u8::MAX => BadgeTier::Gold,
        75..=99 => BadgeTier::Silver,
        50..=74 => BadgeTier::Bronze,
        _ => BadgeTier::None,
    }
}

pub fn evaluate(completed: i64, total: i64) -> Result<Progress, ProgressError> {
    let percentage = percentage(completed, total)?;
    Ok(Progress {
        percentage,
        tier: badge_tier(percentage),
    })
}
