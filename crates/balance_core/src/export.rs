//! Shareable text for generated teams
//!
//! Chat-friendly layout: one bold header per team, one dash line per player,
//! a blank line between teams. The bib team gets a vest marker.

use crate::engine::{Metrics, SwapSuggestion};
use crate::models::{Allocation, Player};

pub const BIB_MARKER: &str = "🎽 ";

fn player_line(player: &Player) -> String {
    if player.is_gk {
        format!("- {} (GK)", player.name)
    } else {
        format!("- {}", player.name)
    }
}

/// Team sheet for sharing. `bib_team` marks the team wearing bibs, if any.
pub fn render_message(allocation: &Allocation, bib_team: Option<usize>) -> String {
    let mut lines = Vec::with_capacity(allocation.player_count() + 2 * allocation.team_count());
    for (i, team) in allocation.teams.iter().enumerate() {
        let prefix = if bib_team == Some(i) { BIB_MARKER } else { "" };
        lines.push(format!("{prefix}*Team {}*", i + 1));
        lines.extend(team.iter().map(player_line));
        lines.push(String::new());
    }
    lines.join("\n")
}

/// "Team 1: 6.00 / Team 2: 6.00"
pub fn render_strengths(metrics: &Metrics) -> String {
    metrics
        .strengths
        .iter()
        .enumerate()
        .map(|(i, s)| format!("Team {}: {:.2}", i + 1, s))
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn render_metrics(metrics: &Metrics) -> String {
    format!("{}\nVariance: {:.4}", render_strengths(metrics), metrics.variance)
}

pub fn describe_swap(suggestion: &SwapSuggestion) -> String {
    format!(
        "Swap {} (Team {}) with {} (Team {}) reduces variance from {:.4} → {:.4} (Δ {:.4})",
        suggestion.name_a,
        suggestion.team_a + 1,
        suggestion.name_b,
        suggestion.team_b + 1,
        suggestion.current_variance,
        suggestion.new_variance,
        suggestion.delta
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::find_best_swap;
    use crate::models::Position;

    fn sample() -> Allocation {
        Allocation::from_rosters(vec![
            vec![
                Player::new(1, "Stokes", 6.0, Position::Goalkeeper),
                Player::new(2, "Ky", 10.0, Position::Midfielder),
            ],
            vec![Player::new(3, "Bell", 9.0, Position::Midfielder), Player::new(4, "Kie", 7.0, Position::Defender)],
        ])
    }

    #[test]
    fn test_message_layout() {
        let message = render_message(&sample(), Some(1));
        assert_eq!(
            message,
            "*Team 1*\n- Stokes (GK)\n- Ky\n\n🎽 *Team 2*\n- Bell\n- Kie\n"
        );
    }

    #[test]
    fn test_message_without_bib() {
        let message = render_message(&sample(), None);
        assert!(!message.contains(BIB_MARKER));
        assert!(message.starts_with("*Team 1*"));
    }

    #[test]
    fn test_metrics_text() {
        let metrics = Metrics::of(&sample()).unwrap();
        assert_eq!(render_strengths(&metrics), "Team 1: 8.00 / Team 2: 8.00");
        assert!(render_metrics(&metrics).ends_with("Variance: 0.0000"));
    }

    #[test]
    fn test_swap_description() {
        let skewed = Allocation::from_rosters(vec![
            vec![Player::new(1, "A", 10.0, Position::Any), Player::new(2, "B", 8.0, Position::Any)],
            vec![Player::new(3, "C", 2.0, Position::Any), Player::new(4, "D", 4.0, Position::Any)],
        ]);
        let suggestion = find_best_swap(&skewed).unwrap().unwrap();
        assert_eq!(
            describe_swap(&suggestion),
            "Swap A (Team 1) with D (Team 2) reduces variance from 9.0000 → 0.0000 (Δ 9.0000)"
        );
    }
}
