use crate::models::{Participant, TOTAL_SKILL_BADGES};

/// Orders the leaderboard: swag-eligible participants first, then by badges
/// completed, then by arcade games completed, all descending.
///
/// The sort is stable and the three keys are compared level by level rather
/// than folded into one score, so participants tied on every key keep their
/// position from the source export across reruns.
pub fn sort_participants(participants: &mut [Participant]) {
    participants.sort_by(|a, b| {
        b.eligible_for_swag
            .cmp(&a.eligible_for_swag)
            .then(b.skill_badges_completed.cmp(&a.skill_badges_completed))
            .then(b.arcade_games_completed.cmp(&a.arcade_games_completed))
    });
}

/// Progress through the program as a percentage, weighting the badge track
/// and the arcade track equally. Always within 0..=100, even for exports
/// reporting more badges than the program offers.
pub fn completion_percent(skill_badges_completed: u32, arcade_games_completed: u32) -> f64 {
    let badge_share = f64::from(skill_badges_completed) / f64::from(TOTAL_SKILL_BADGES);
    let arcade_share = if arcade_games_completed > 0 { 1.0 } else { 0.0 };
    ((badge_share + arcade_share) / 2.0 * 100.0).clamp(0.0, 100.0)
}
