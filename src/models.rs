use serde::{Deserialize, Serialize};

/// Every skill badge the program offers; completing all of them is one half
/// of the swag-eligibility requirement.
pub const TOTAL_SKILL_BADGES: u32 = 19;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_url: String,
    pub profile_status: String,
    pub skill_badges_completed: u32,
    pub skill_badge_names: Vec<String>,
    pub arcade_games_completed: u32,
    pub arcade_game_names: Vec<String>,
    pub credits_redeemed: bool,
    /// Pass-through of the export's own completion claim. Informational only;
    /// `eligible_for_swag` is always recomputed from the counts.
    pub all_completed: bool,
    pub eligible_for_swag: bool,
    pub completion_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_participants: usize,
    pub completed_all_badges: usize,
    pub completed_arcade_game: usize,
    pub eligible_for_swag: usize,
    pub credits_redeemed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardDocument {
    pub university: String,
    pub last_updated: String,
    pub analytics: Analytics,
    pub participants: Vec<Participant>,
}
