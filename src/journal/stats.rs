//! Journal aggregation: counts and net R, rendered for `/week` and `/stats`

use super::trades::Trade;
use crate::messages::fmt_r;

/// Sum of realized R over closed trades (0 when nothing is closed)
pub fn net_r(trades: &[Trade]) -> f64 {
    // Float `Sum` starts from -0.0
    trades.iter().filter_map(|t| t.result).fold(0.0, |acc, r| acc + r)
}

/// Aggregates over one user's trade sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JournalSummary {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub net_r: f64,
}

impl JournalSummary {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let open = trades.iter().filter(|t| t.is_open()).count();
        Self {
            total: trades.len(),
            open,
            closed: trades.len() - open,
            net_r: net_r(trades),
        }
    }
}

/// `/week` reply. Premium users get the per-trade breakdown.
pub fn week_report(trades: &[Trade], premium: bool) -> String {
    if trades.is_empty() {
        return "No trades yet.".to_string();
    }

    let summary = JournalSummary::from_trades(trades);

    if !premium {
        return format!(
            "📊 Weekly Summary\nTrades: {}\nNet R: {}\n\n🔓 Upgrade to Pro ($2/month) for full breakdown",
            summary.total,
            fmt_r(summary.net_r)
        );
    }

    let mut msg = format!(
        "📊 Weekly Breakdown (Pro)\n\nTrades: {}\nNet R: {}\n\n",
        summary.total,
        fmt_r(summary.net_r)
    );
    for t in trades {
        let result = t.result.map_or_else(|| "open".to_string(), |r| format!("{}R", fmt_r(r)));
        msg.push_str(&format!(
            "{} | {} {} | {} | Result: {} | Fate: {}\n",
            t.id,
            t.pair,
            t.direction,
            t.session,
            result,
            t.fate.as_deref().unwrap_or("-")
        ));
    }
    msg
}

/// `/stats` reply, identical for every tier
pub fn stats_report(trades: &[Trade]) -> String {
    let summary = JournalSummary::from_trades(trades);
    format!(
        "📈 Stats\nOpen: {}\nTotal: {}\nNet R: {}",
        summary.open,
        summary.total,
        fmt_r(summary.net_r)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::trades::{Direction, Session};
    use chrono::Utc;

    fn trade(id: u64, result: Option<f64>, fate: Option<&str>) -> Trade {
        Trade {
            id,
            pair: "XAUUSD".to_string(),
            direction: Direction::Sell,
            session: Session::NY,
            risk: 1.0,
            target: 2.0,
            result,
            fate: fate.map(str::to_string),
            opened: Utc::now(),
        }
    }

    #[test]
    fn test_net_r() {
        assert_eq!(net_r(&[]), 0.0);
        assert_eq!(net_r(&[trade(1, None, None)]), 0.0);

        let trades = vec![
            trade(1, Some(2.0), Some("Target hit")),
            trade(2, None, None),
            trade(3, Some(-1.0), Some("Stop loss")),
            trade(4, Some(0.5), Some("Early close")),
        ];
        assert_eq!(net_r(&trades), 1.5);

        let summary = JournalSummary::from_trades(&trades);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.open, 1);
        assert_eq!(summary.closed, 3);
    }

    #[test]
    fn test_net_r_is_positive_zero_without_closed_trades() {
        assert!(net_r(&[]).is_sign_positive());
        assert!(net_r(&[trade(1, None, None)]).is_sign_positive());

        let week = week_report(&[trade(1, None, None)], false);
        assert!(week.contains("Net R: 0.0"), "{}", week);
        assert!(!week.contains("-0.0"));
    }

    #[test]
    fn test_week_empty() {
        assert_eq!(week_report(&[], true), "No trades yet.");
        assert_eq!(week_report(&[], false), "No trades yet.");
    }

    #[test]
    fn test_week_premium_gates_breakdown() {
        let trades = vec![trade(1, Some(2.0), Some("Target hit")), trade(2, None, None)];

        let free = week_report(&trades, false);
        assert!(free.contains("Trades: 2"));
        assert!(free.contains("Net R: 2.0"));
        assert!(free.contains("Upgrade to Pro"));
        assert!(!free.contains("XAUUSD"));

        let pro = week_report(&trades, true);
        assert!(pro.contains("Weekly Breakdown (Pro)"));
        assert!(pro.contains("1 | XAUUSD Sell | NY | Result: 2.0R | Fate: Target hit"));
        assert!(pro.contains("2 | XAUUSD Sell | NY | Result: open | Fate: -"));
        assert!(!pro.contains("Upgrade"));
    }

    #[test]
    fn test_stats() {
        assert_eq!(stats_report(&[]), "📈 Stats\nOpen: 0\nTotal: 0\nNet R: 0.0");

        let trades = vec![trade(1, Some(-1.0), Some("Stop loss")), trade(2, None, None)];
        assert_eq!(stats_report(&trades), "📈 Stats\nOpen: 1\nTotal: 2\nNet R: -1.0");
    }
}
