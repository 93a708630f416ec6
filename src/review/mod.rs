//! Mood trend and monthly review aggregation.
//!
//! Pure computations over slices fetched from the stores; the HTTP layer
//! decides the range and passes entries in.

use crate::journal_store::{JournalEntry, LyricRecord, SongReference};
use crate::mood_store::{MoodLevel, MoodObservation};
use serde::Serialize;
use std::collections::HashMap;

/// Mood trend over an arbitrary range of ledger entries.
#[derive(Debug, Serialize)]
pub struct MoodTrend {
    /// Arithmetic mean of the ordinal levels, 0 for an empty range.
    pub average_mood: f64,
    /// Count per level name. All five levels are present, empty buckets
    /// included.
    pub mood_distribution: HashMap<String, usize>,
    pub common_contexts: HashMap<String, usize>,
    pub common_activities: HashMap<String, usize>,
}

/// A theme (free-form journal tag) with its frequency for the period.
#[derive(Debug, Serialize)]
pub struct ThemeCount {
    pub theme: String,
    pub count: usize,
}

/// Monthly mood and music review. Derived view, never persisted.
#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub total_entries: usize,
    /// Count per level name over the journal entries in range; counts sum
    /// to `total_entries`.
    pub mood_distribution: HashMap<String, usize>,
    pub favorite_songs: Vec<SongReference>,
    pub memorable_lyrics: Vec<LyricRecord>,
    /// Sorted descending by count, first-seen order for equal counts.
    pub common_themes: Vec<ThemeCount>,
}

/// Anonymized projection of a journal entry for sharing. Excludes the
/// journal free text and the mood's context/activities; only music and tag
/// metadata is shareable.
#[derive(Debug, Serialize)]
pub struct SharedEntry {
    pub mood: MoodLevel,
    pub liked_songs: Vec<SongReference>,
    pub memorable_lyrics: Vec<LyricRecord>,
    pub tags: Vec<String>,
}

/// Compute the mood trend for a set of ledger entries.
pub fn mood_trend(entries: &[MoodObservation]) -> MoodTrend {
    let average_mood = if entries.is_empty() {
        0.0
    } else {
        let sum: u64 = entries.iter().map(|e| e.level.rank() as u64).sum();
        sum as f64 / entries.len() as f64
    };

    let mut mood_distribution: HashMap<String, usize> = MoodLevel::ALL
        .iter()
        .map(|level| (level.name().to_string(), 0))
        .collect();
    let mut common_contexts: HashMap<String, usize> = HashMap::new();
    let mut common_activities: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        *mood_distribution
            .get_mut(entry.level.name())
            .expect("all levels are pre-seeded") += 1;
        if let Some(context) = &entry.context {
            *common_contexts.entry(context.clone()).or_default() += 1;
        }
        for activity in &entry.activities {
            *common_activities.entry(activity.clone()).or_default() += 1;
        }
    }

    MoodTrend {
        average_mood,
        mood_distribution,
        common_contexts,
        common_activities,
    }
}

/// The `[start, end)` millisecond window for a calendar month, UTC.
/// December rolls over into January of the next year. None for an invalid
/// month.
pub fn month_window(year: i32, month: u32) -> Option<(i64, i64)> {
    let start = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let to_ms = |d: chrono::NaiveDate| d.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp_millis());
    Some((to_ms(start)?, to_ms(end)?))
}

/// Aggregate journal entries (already filtered to the month window) into a
/// monthly review.
pub fn monthly_summary(entries: &[JournalEntry], top_songs_limit: usize) -> MonthlySummary {
    let mut mood_distribution: HashMap<String, usize> = HashMap::new();
    let mut memorable_lyrics = Vec::new();

    // first-seen order, so ties in the stable sorts below keep it
    let mut song_index: HashMap<String, usize> = HashMap::new();
    let mut song_counts: Vec<(SongReference, usize)> = Vec::new();
    let mut theme_index: HashMap<String, usize> = HashMap::new();
    let mut theme_counts: Vec<ThemeCount> = Vec::new();

    for entry in entries {
        *mood_distribution
            .entry(entry.mood_level.name().to_string())
            .or_default() += 1;

        for song in &entry.liked_songs {
            match song_index.get(&song.id) {
                Some(&i) => song_counts[i].1 += 1,
                None => {
                    song_index.insert(song.id.clone(), song_counts.len());
                    song_counts.push((song.clone(), 1));
                }
            }
        }

        memorable_lyrics.extend(entry.memorable_lyrics.iter().cloned());

        for tag in &entry.tags {
            match theme_index.get(tag) {
                Some(&i) => theme_counts[i].count += 1,
                None => {
                    theme_index.insert(tag.clone(), theme_counts.len());
                    theme_counts.push(ThemeCount {
                        theme: tag.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    song_counts.sort_by(|a, b| b.1.cmp(&a.1));
    song_counts.truncate(top_songs_limit);
    let favorite_songs = song_counts.into_iter().map(|(song, _)| song).collect();

    theme_counts.sort_by(|a, b| b.count.cmp(&a.count));

    MonthlySummary {
        total_entries: entries.len(),
        mood_distribution,
        favorite_songs,
        memorable_lyrics,
        common_themes: theme_counts,
    }
}

/// Build the anonymized shareable view of a journal entry.
pub fn shared_view(entry: &JournalEntry) -> SharedEntry {
    SharedEntry {
        mood: entry.mood_level,
        liked_songs: entry.liked_songs.clone(),
        memorable_lyrics: entry.memorable_lyrics.clone(),
        tags: entry.tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(level: MoodLevel, context: Option<&str>, activities: &[&str]) -> MoodObservation {
        MoodObservation {
            id: 0,
            level,
            context: context.map(|s| s.to_string()),
            activities: activities.iter().map(|s| s.to_string()).collect(),
            tags: vec![],
            playlist_id: None,
        }
    }

    fn song(id: &str) -> SongReference {
        SongReference {
            id: id.to_string(),
            name: format!("Song {}", id),
            artist: "Artist".to_string(),
            url: format!("https://open.spotify.com/track/{}", id),
        }
    }

    fn journal_entry(level: MoodLevel, songs: Vec<SongReference>, tags: &[&str]) -> JournalEntry {
        JournalEntry {
            id: 0,
            mood_id: 0,
            mood_level: level,
            text: "private text".to_string(),
            liked_songs: songs,
            memorable_lyrics: vec![],
            tags: tags.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn trend_over_empty_range_is_all_zero() {
        let trend = mood_trend(&[]);
        assert_eq!(trend.average_mood, 0.0);
        assert_eq!(trend.mood_distribution.len(), 5);
        assert!(trend.mood_distribution.values().all(|&c| c == 0));
        assert!(trend.common_contexts.is_empty());
        assert!(trend.common_activities.is_empty());
    }

    #[test]
    fn trend_averages_and_counts() {
        // HAPPY, CALM, HAPPY => average (5+4+5)/3
        let entries = vec![
            observation(MoodLevel::Happy, Some("promotion"), &["working"]),
            observation(MoodLevel::Calm, None, &["reading", "working"]),
            observation(MoodLevel::Happy, Some("promotion"), &[]),
        ];
        let trend = mood_trend(&entries);
        assert!((trend.average_mood - 14.0 / 3.0).abs() < 1e-9);
        assert_eq!(trend.mood_distribution["HAPPY"], 2);
        assert_eq!(trend.mood_distribution["CALM"], 1);
        assert_eq!(trend.mood_distribution["NEUTRAL"], 0);
        assert_eq!(trend.mood_distribution["TENSE"], 0);
        assert_eq!(trend.mood_distribution["UPSET"], 0);
        assert_eq!(trend.common_contexts["promotion"], 2);
        assert_eq!(trend.common_activities["working"], 2);
        assert_eq!(trend.common_activities["reading"], 1);
    }

    #[test]
    fn month_window_rolls_over_december() {
        let (dec_start, dec_end) = month_window(2024, 12).unwrap();
        let (jan_start, _) = month_window(2025, 1).unwrap();
        assert_eq!(dec_end, jan_start);
        assert!(dec_start < dec_end);
    }

    #[test]
    fn month_window_rejects_invalid_month() {
        assert!(month_window(2024, 0).is_none());
        assert!(month_window(2024, 13).is_none());
    }

    #[test]
    fn distribution_counts_sum_to_total() {
        let entries = vec![
            journal_entry(MoodLevel::Happy, vec![], &[]),
            journal_entry(MoodLevel::Happy, vec![], &[]),
            journal_entry(MoodLevel::Upset, vec![], &[]),
        ];
        let summary = monthly_summary(&entries, 10);
        assert_eq!(summary.total_entries, 3);
        let sum: usize = summary.mood_distribution.values().sum();
        assert_eq!(sum, summary.total_entries);
        assert_eq!(summary.mood_distribution["HAPPY"], 2);
        assert_eq!(summary.mood_distribution["UPSET"], 1);
    }

    #[test]
    fn repeated_song_ranks_first() {
        let entries = vec![
            journal_entry(MoodLevel::Calm, vec![song("b"), song("a")], &[]),
            journal_entry(MoodLevel::Calm, vec![song("a")], &[]),
        ];
        let summary = monthly_summary(&entries, 10);
        let ids: Vec<&str> = summary.favorite_songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn top_songs_ties_break_by_first_seen_and_respect_limit() {
        let entries = vec![journal_entry(
            MoodLevel::Neutral,
            vec![song("x"), song("y"), song("z")],
            &[],
        )];
        let summary = monthly_summary(&entries, 2);
        let ids: Vec<&str> = summary.favorite_songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn themes_sorted_descending_stable() {
        let entries = vec![
            journal_entry(MoodLevel::Happy, vec![], &["work", "family"]),
            journal_entry(MoodLevel::Happy, vec![], &["family", "exercise"]),
        ];
        let summary = monthly_summary(&entries, 10);
        let themes: Vec<(&str, usize)> = summary
            .common_themes
            .iter()
            .map(|t| (t.theme.as_str(), t.count))
            .collect();
        // "family" has the highest count; "work" precedes "exercise" because
        // it was seen first
        assert_eq!(themes, vec![("family", 2), ("work", 1), ("exercise", 1)]);
    }

    #[test]
    fn shared_view_never_exposes_journal_text() {
        let entry = journal_entry(MoodLevel::Tense, vec![song("a")], &["late-night"]);
        let shared = shared_view(&entry);
        let json = serde_json::to_value(&shared).unwrap();
        assert!(json.get("text").is_none());
        assert_eq!(json["mood"], "TENSE");
        assert_eq!(json["tags"][0], "late-night");
        assert_eq!(json["liked_songs"][0]["id"], "a");
    }
}
