// Derived per-player metrics: value for money and transfer momentum.

use crate::model::Player;

/// Points per million: `total_points / price`. Zero for a zero price.
pub fn calculate_ppm(player: &Player) -> f64 {
    let price = player.price();
    if price <= 0.0 {
        return 0.0;
    }
    f64::from(player.total_points) / price
}

/// Net transfers (in minus out), saturating at the `i64` bounds.
///
/// Season totals from `github_transfers` take precedence. Otherwise the
/// gameweek `transfers_in_event` / `transfers_out_event` pair is used when
/// either half is present. `None` means no transfer data at all.
pub fn transfer_momentum(player: &Player) -> Option<i64> {
    if let Some(t) = player.github_transfers {
        return Some(t.transfers_in.saturating_sub(t.transfers_out));
    }
    match (player.transfers_in_event, player.transfers_out_event) {
        (None, None) => None,
        (tin, tout) => Some(tin.unwrap_or(0).saturating_sub(tout.unwrap_or(0))),
    }
}

/// Momentum as a sort key; missing data ranks as zero.
pub fn momentum_or_zero(player: &Player) -> f64 {
    transfer_momentum(player).unwrap_or(0) as f64
}

/// Whether the player has strictly positive net transfers. No data is not positive.
pub fn has_positive_momentum(player: &Player) -> bool {
    transfer_momentum(player).is_some_and(|net| net > 0)
}
