use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::models::{Analytics, LeaderboardDocument, Participant, TOTAL_SKILL_BADGES};

/// The deployment this leaderboard is generated for.
pub const UNIVERSITY: &str = "Veer Surendra Sai University of Technology - Burla, India";

/// Reduces the participant set to its aggregate counters. Order independent;
/// an empty set yields the all-zero summary.
pub fn summarize(participants: &[Participant]) -> Analytics {
    Analytics {
        total_participants: participants.len(),
        completed_all_badges: participants
            .iter()
            .filter(|p| p.skill_badges_completed == TOTAL_SKILL_BADGES)
            .count(),
        completed_arcade_game: participants
            .iter()
            .filter(|p| p.arcade_games_completed > 0)
            .count(),
        eligible_for_swag: participants.iter().filter(|p| p.eligible_for_swag).count(),
        credits_redeemed: participants.iter().filter(|p| p.credits_redeemed).count(),
    }
}

/// Combines the fixed deployment metadata, the generation timestamp, the
/// analytics counters, and the sorted participants into the document the
/// dashboard fetches. Pure construction.
pub fn assemble(
    generated_at: DateTime<Utc>,
    analytics: Analytics,
    participants: Vec<Participant>,
) -> LeaderboardDocument {
    LeaderboardDocument {
        university: UNIVERSITY.to_string(),
        last_updated: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        analytics,
        participants,
    }
}

/// Serializes the document to pretty JSON at `path`, replacing any previous
/// document. The JSON is staged in a temporary file beside the destination
/// and moved into place once fully written, so a failed run never leaves a
/// truncated document behind.
pub fn write_document(path: &Path, document: &LeaderboardDocument) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staging = NamedTempFile::new_in(directory).map_err(|err| io_failure(path, err))?;
    serde_json::to_writer_pretty(staging.as_file(), document)
        .map_err(|err| io_failure(path, std::io::Error::new(std::io::ErrorKind::Other, err)))?;
    staging
        .persist(path)
        .map_err(|err| io_failure(path, err.error))?;

    info!(path = %path.display(), participants = document.participants.len(), "leaderboard written");
    Ok(())
}

fn io_failure(path: &Path, source: std::io::Error) -> PipelineError {
    PipelineError::IoFailure {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    use crate::ingest::{parse_participant, RawRow};
    use crate::rank;

    fn participant(badges: u32, games: u32, redeemed: bool) -> Participant {
        let row = RawRow {
            user_name: Some("Avni Rao".to_string()),
            redemption_status: Some(if redeemed { "Yes" } else { "No" }.to_string()),
            skill_badges_completed: Some(badges.to_string()),
            arcade_games_completed: Some(games.to_string()),
            ..RawRow::default()
        };
        parse_participant(0, &row)
    }

    fn generation_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn summary_counts_each_predicate() {
        let participants = vec![
            participant(19, 2, true),
            participant(19, 0, false),
            participant(4, 1, true),
        ];

        let analytics = summarize(&participants);
        assert_eq!(analytics.total_participants, 3);
        assert_eq!(analytics.completed_all_badges, 2);
        assert_eq!(analytics.completed_arcade_game, 2);
        assert_eq!(analytics.eligible_for_swag, 1);
        assert_eq!(analytics.credits_redeemed, 2);
    }

    #[test]
    fn empty_set_summarizes_to_zero() {
        assert_eq!(summarize(&[]), Analytics::default());
    }

    #[test]
    fn total_always_matches_participant_count() {
        let participants: Vec<Participant> =
            (0..7).map(|n| participant(n, n % 2, false)).collect();
        let document = assemble(generation_instant(), summarize(&participants), participants);
        assert_eq!(
            document.analytics.total_participants,
            document.participants.len()
        );
    }

    #[test]
    fn assembled_document_carries_deployment_metadata() {
        let document = assemble(generation_instant(), Analytics::default(), Vec::new());
        assert_eq!(document.university, UNIVERSITY);
        assert_eq!(document.last_updated, "2026-08-06T12:00:00.000Z");
        assert!(document.participants.is_empty());
    }

    #[test]
    fn written_document_uses_the_consumer_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard-data.json");
        let participants = vec![participant(19, 2, true)];
        let document = assemble(generation_instant(), summarize(&participants), participants);

        write_document(&path, &document).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        for field in [
            "\"university\"",
            "\"lastUpdated\"",
            "\"analytics\"",
            "\"totalParticipants\"",
            "\"completedAllBadges\"",
            "\"completedArcadeGame\"",
            "\"participants\"",
            "\"profileUrl\"",
            "\"profileStatus\"",
            "\"skillBadgesCompleted\"",
            "\"skillBadgeNames\"",
            "\"arcadeGamesCompleted\"",
            "\"arcadeGameNames\"",
            "\"creditsRedeemed\"",
            "\"allCompleted\"",
            "\"eligibleForSwag\"",
            "\"completionPercent\"",
        ] {
            assert!(json.contains(field), "missing {field} in output");
        }
    }

    #[test]
    fn written_document_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard-data.json");
        let participants = vec![participant(7, 1, false), participant(19, 3, true)];
        let document = assemble(generation_instant(), summarize(&participants), participants);

        write_document(&path, &document).unwrap();

        let loaded: LeaderboardDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, document);
    }

    #[test]
    fn write_replaces_an_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard-data.json");
        fs::write(&path, "stale contents").unwrap();

        let document = assemble(generation_instant(), Analytics::default(), Vec::new());
        write_document(&path, &document).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(!json.contains("stale contents"));
        assert!(json.contains(UNIVERSITY));
    }

    #[test]
    fn write_into_a_missing_directory_fails_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("leaderboard-data.json");

        let document = assemble(generation_instant(), Analytics::default(), Vec::new());
        let err = write_document(&path, &document).unwrap_err();

        assert!(matches!(err, PipelineError::IoFailure { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn reruns_differ_only_in_the_timestamp() {
        let participants = vec![participant(19, 2, true), participant(3, 0, false)];

        let build = |instant: DateTime<Utc>| {
            let mut sorted = participants.clone();
            rank::sort_participants(&mut sorted);
            assemble(instant, summarize(&sorted), sorted)
        };

        let first = build(generation_instant());
        let second = build(Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap());

        assert_ne!(first.last_updated, second.last_updated);
        assert_eq!(first.university, second.university);
        assert_eq!(first.analytics, second.analytics);
        assert_eq!(first.participants, second.participants);
    }
}
