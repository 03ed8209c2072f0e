use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// A commission category. `Service` pools draw on grooming/appointment
/// revenue only; `Total` pools draw on the whole day (services + retail).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PoolScope {
    Service,
    Total,
}

/// One revenue bracket of the commission table. Brackets for a scope are
/// authored non-overlapping and ordered; `max_amount = None` means
/// unbounded above.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommissionTier {
    #[schema(example = 3)]
    pub id: u64,
    pub scope: PoolScope,
    #[schema(example = "Tier B")]
    pub name: String,
    #[schema(example = 20001.0)]
    pub min_amount: f64,
    #[schema(example = 40000.0, nullable = true)]
    pub max_amount: Option<f64>,
    /// Fraction, 0.0 to 1.0.
    #[schema(example = 0.35)]
    pub percentage: f64,
}

impl CommissionTier {
    pub fn contains(&self, value: f64) -> bool {
        self.min_amount <= value && value <= self.max_amount.unwrap_or(f64::INFINITY)
    }
}

/// Outcome of matching a period total against the tier table. A revenue
/// total no bracket covers is not an error: the percentage stays 0 and
/// `name` stays empty so the caller can see the gap.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvedTier {
    pub scope: PoolScope,
    #[schema(example = "Tier B", nullable = true)]
    pub name: Option<String>,
    #[schema(example = 0.35)]
    pub percentage: f64,
}

impl ResolvedTier {
    pub fn unresolved(scope: PoolScope) -> Self {
        Self {
            scope,
            name: None,
            percentage: 0.0,
        }
    }
}
