use crate::model::tier::{CommissionTier, PoolScope, ResolvedTier};

/// Find the bracket covering `value` for one scope. Ordered linear scan,
/// first match wins; the table is small enough that anything smarter
/// would just obscure the tie-break rule. No match is not an error: the
/// result carries 0% and no name so the caller can surface the gap.
pub fn resolve(tiers: &[CommissionTier], scope: PoolScope, value: f64) -> ResolvedTier {
    tiers
        .iter()
        .filter(|t| t.scope == scope)
        .find(|t| t.contains(value))
        .map(|t| ResolvedTier {
            scope,
            name: Some(t.name.clone()),
            percentage: t.percentage,
        })
        .unwrap_or_else(|| ResolvedTier::unresolved(scope))
}
