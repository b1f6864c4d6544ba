use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::models::{Participant, TOTAL_SKILL_BADGES};
use crate::rank;

/// One row of the spreadsheet export, keyed by the exact header text the
/// export uses. Every column is optional so a trimmed-down export still loads.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "User Name")]
    pub user_name: Option<String>,
    #[serde(rename = "User Email")]
    pub user_email: Option<String>,
    #[serde(rename = "Google Cloud Skills Boost Profile URL")]
    pub profile_url: Option<String>,
    #[serde(rename = "Profile URL Status")]
    pub profile_status: Option<String>,
    #[serde(rename = "Access Code Redemption Status")]
    pub redemption_status: Option<String>,
    #[serde(rename = "All Skill Badges & Games Completed")]
    pub all_completed: Option<String>,
    #[serde(rename = "# of Skill Badges Completed")]
    pub skill_badges_completed: Option<String>,
    #[serde(rename = "Names of Completed Skill Badges")]
    pub skill_badge_names: Option<String>,
    #[serde(rename = "# of Arcade Games Completed")]
    pub arcade_games_completed: Option<String>,
    #[serde(rename = "Names of Completed Arcade Games")]
    pub arcade_game_names: Option<String>,
}

/// Reads the participant export at `path`.
///
/// A missing file and an unparseable header are fatal; a bad data row is not.
/// Rows the CSV layer cannot decode are replaced by an empty row so the
/// defaulting rules in [`parse_participant`] still apply to them.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(PipelineError::SourceNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| malformed(path, err))?;

    let headers = reader.headers().map_err(|err| malformed(path, err))?;
    if headers.iter().all(|header| header.is_empty()) {
        return Err(PipelineError::MalformedInput {
            path: path.to_path_buf(),
            message: "missing header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<RawRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(err) => {
                warn!(row = index, error = %err, "undecodable row, keeping it with all fields blank");
                rows.push(RawRow::default());
            }
        }
    }

    Ok(rows)
}

/// Builds one participant from a raw row. Total over arbitrary row content:
/// every anomaly is recovered by the field's documented default, never by
/// dropping the row or aborting the run.
pub fn parse_participant(index: usize, row: &RawRow) -> Participant {
    let skill_badges_completed = parse_count(
        index,
        "# of Skill Badges Completed",
        row.skill_badges_completed.as_deref(),
    );
    let arcade_games_completed = parse_count(
        index,
        "# of Arcade Games Completed",
        row.arcade_games_completed.as_deref(),
    );

    // The export's own "all completed" cell is unreliable across variants, so
    // eligibility is derived from the counts and the cell is kept as-is.
    let eligible_for_swag =
        skill_badges_completed == TOTAL_SKILL_BADGES && arcade_games_completed > 0;

    Participant {
        id: format!("participant-{}", index + 1),
        name: non_empty(row.user_name.as_deref())
            .unwrap_or_else(|| log_default(index, "User Name", "Unknown")),
        email: non_empty(row.user_email.as_deref()).unwrap_or_default(),
        profile_url: non_empty(row.profile_url.as_deref()).unwrap_or_default(),
        profile_status: non_empty(row.profile_status.as_deref())
            .unwrap_or_else(|| log_default(index, "Profile URL Status", "Unknown")),
        skill_badges_completed,
        skill_badge_names: split_names(row.skill_badge_names.as_deref()),
        arcade_games_completed,
        arcade_game_names: split_names(row.arcade_game_names.as_deref()),
        credits_redeemed: is_yes(row.redemption_status.as_deref()),
        all_completed: is_yes(row.all_completed.as_deref()),
        eligible_for_swag,
        completion_percent: rank::completion_percent(skill_badges_completed, arcade_games_completed),
    }
}

fn malformed(path: &Path, err: csv::Error) -> PipelineError {
    PipelineError::MalformedInput {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn parse_count(index: usize, column: &str, cell: Option<&str>) -> u32 {
    match cell.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            debug!(row = index, column, cell = value, "non-numeric count cell defaulted to 0");
            0
        }),
        None => {
            debug!(row = index, column, "empty count cell defaulted to 0");
            0
        }
    }
}

fn split_names(cell: Option<&str>) -> Vec<String> {
    match cell.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.split(',').map(|name| name.trim().to_string()).collect(),
        None => Vec::new(),
    }
}

fn is_yes(cell: Option<&str>) -> bool {
    cell.map(|value| value.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn log_default(index: usize, column: &str, fallback: &str) -> String {
    debug!(row = index, column, fallback, "empty cell defaulted");
    fallback.to_string()
}
