use anyhow::Result;
use sqlx::MySqlPool;
use tracing::{info, warn};

#[derive(sqlx::FromRow)]
struct TierCheckRow {
    id: u64,
    scope: String,
    name: String,
    min_amount: f64,
    max_amount: Option<f64>,
}

/// Boot-time sanity pass over the commission tier table. Purely
/// diagnostic: an overlap or gap does not stop the server, but it means
/// some revenue total resolves to the wrong bracket (or to none), so it
/// is worth a warning before the first preview is ever computed.
pub async fn warmup_tier_check(pool: &MySqlPool) -> Result<()> {
    let rows = sqlx::query_as::<_, TierCheckRow>(
        r#"
        SELECT id, scope, name, min_amount, max_amount
        FROM commission_tiers
        ORDER BY scope, min_amount, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        warn!("Commission tier table is empty; every preview will resolve to 0%");
        return Ok(());
    }

    let mut checked = 0usize;
    for pair in rows.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.scope != next.scope {
            continue;
        }
        checked += 1;
        match prev.max_amount {
            None => {
                warn!(
                    scope = %prev.scope,
                    unreachable_tier = %next.name,
                    "Tier '{}' is unbounded, later tiers can never match", prev.name
                );
            }
            Some(prev_max) => {
                if next.min_amount <= prev_max {
                    warn!(
                        scope = %prev.scope,
                        first_id = prev.id,
                        second_id = next.id,
                        "Tiers '{}' and '{}' overlap; first in table order wins",
                        prev.name, next.name
                    );
                } else if next.min_amount - prev_max > 1.0 {
                    warn!(
                        scope = %prev.scope,
                        from = prev_max,
                        to = next.min_amount,
                        "Gap between tiers '{}' and '{}'; totals in it resolve to 0%",
                        prev.name, next.name
                    );
                }
            }
        }
    }

    info!(tiers = rows.len(), boundaries_checked = checked, "Tier table check complete");
    Ok(())
}
