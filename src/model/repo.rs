//! Repository panel data
//!
//! Payload types for the three repository API calls, the fixed fallback
//! payloads, and the derived values the panel shows (language shares,
//! commit lines, time-ago labels, animated counters).

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub const FALLBACK_DESCRIPTION: &str = "A modern collection of responsive card UI components";
pub const FALLBACK_AVATAR: &str = "https://github.com/SyntaxSidekick.png";
const DEFAULT_LANGUAGE_COLOR: &str = "#8e8e93";

/// How long a counter takes to reach its target
pub const COUNTER_ANIMATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepoInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GithubUser {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub commit: CommitDetail,
    #[serde(default)]
    pub author: Option<GithubUser>,
}

/// Bytes of code per language
pub type Languages = BTreeMap<String, u64>;

/// Result of one full repository load
#[derive(Debug, Clone, PartialEq)]
pub struct RepoSnapshot {
    pub info: RepoInfo,
    pub commits: Vec<CommitEntry>,
    pub languages: Languages,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Fallback payloads
// ═══════════════════════════════════════════════════════════════════════════════

pub fn mock_info(now: DateTime<Utc>) -> RepoInfo {
    RepoInfo {
        description: Some(FALLBACK_DESCRIPTION.to_string()),
        stargazers_count: 42,
        forks_count: 8,
        open_issues_count: 3,
        updated_at: Some(now),
        language: Some("HTML".to_string()),
    }
}

pub fn mock_commits(now: DateTime<Utc>) -> Vec<CommitEntry> {
    let commit = |sha: &str, message: &str, hours_ago: i64| CommitEntry {
        sha: sha.to_string(),
        commit: CommitDetail {
            message: message.to_string(),
            author: CommitAuthor {
                name: "SyntaxSidekick".to_string(),
                date: now - chrono::Duration::hours(hours_ago),
            },
        },
        author: Some(GithubUser {
            login: "SyntaxSidekick".to_string(),
            avatar_url: Some(FALLBACK_AVATAR.to_string()),
        }),
    };
    vec![
        commit("abc1234", "Add GitHub integration demo functionality", 0),
        commit("def5678", "Implement live demo cards with advanced features", 1),
        commit("ghi9012", "Add comprehensive dark mode support", 2),
    ]
}

pub fn mock_languages() -> Languages {
    Languages::from([
        ("HTML".to_string(), 65000),
        ("CSS".to_string(), 45000),
        ("JavaScript".to_string(), 25000),
    ])
}

// ═══════════════════════════════════════════════════════════════════════════════
// Derived values
// ═══════════════════════════════════════════════════════════════════════════════

pub fn language_color(language: &str) -> &'static str {
    match language {
        "HTML" => "#e34c26",
        "CSS" => "#1572b6",
        "JavaScript" => "#f1e05a",
        "TypeScript" => "#2b7489",
        "Python" => "#3572a5",
        "Java" => "#b07219",
        "PHP" => "#4f5d95",
        "C++" => "#f34b7d",
        "C" => "#555555",
        "Shell" => "#89e051",
        "Vue" => "#2c3e50",
        "React" => "#61dafb",
        _ => DEFAULT_LANGUAGE_COLOR,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    pub bytes: u64,
    /// Share of all bytes, rounded to one decimal
    pub percentage: f64,
    pub color: &'static str,
}

impl LanguageShare {
    pub fn label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

/// Top five languages by size, largest first
pub fn language_breakdown(languages: &Languages) -> Vec<LanguageShare> {
    let total: u64 = languages.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut entries: Vec<(&String, &u64)> = languages.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries
        .into_iter()
        .take(5)
        .map(|(name, &bytes)| LanguageShare {
            name: name.clone(),
            bytes,
            percentage: (bytes as f64 / total as f64 * 1000.0).round() / 10.0,
            color: language_color(name),
        })
        .collect()
}

/// One line of the recent-commits list
#[derive(Debug, Clone, PartialEq)]
pub struct CommitSummary {
    pub message: String,
    pub author: String,
    pub avatar_url: String,
    pub time_ago: String,
    pub short_sha: String,
}

/// The three most recent commits, first message line only
pub fn commit_summaries(commits: &[CommitEntry], now: DateTime<Utc>) -> Vec<CommitSummary> {
    commits
        .iter()
        .take(3)
        .map(|c| CommitSummary {
            message: c.commit.message.lines().next().unwrap_or("").to_string(),
            author: c.commit.author.name.clone(),
            avatar_url: c
                .author
                .as_ref()
                .and_then(|a| a.avatar_url.clone())
                .unwrap_or_else(|| FALLBACK_AVATAR.to_string()),
            time_ago: time_ago(c.commit.author.date, now),
            short_sha: c.sha.chars().take(7).collect(),
        })
        .collect()
}

pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        then.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
    }
}

/// Integer with thousands separators
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// Counters
// ═══════════════════════════════════════════════════════════════════════════════

/// A number easing linearly from one value to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    pub from: u64,
    pub to: u64,
    pub started: Duration,
}

impl CounterAnimation {
    pub fn new(from: u64, to: u64, started: Duration) -> Self {
        Self { from, to, started }
    }

    pub fn value_at(&self, now: Duration) -> u64 {
        let elapsed = now.saturating_sub(self.started).as_secs_f64();
        let progress = (elapsed / COUNTER_ANIMATION.as_secs_f64()).min(1.0);
        let value = self.from as f64 + (self.to as f64 - self.from as f64) * progress;
        value.round().max(0.0) as u64
    }

    pub fn is_done(&self, now: Duration) -> bool {
        now.saturating_sub(self.started) >= COUNTER_ANIMATION
    }
}

/// Local-only state of the panel buttons and counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoPanelState {
    pub loaded: bool,
    pub loading: bool,
    pub starred: bool,
    pub watching: bool,
    pub stars: u64,
    pub forks: u64,
    pub issues: u64,
}

impl RepoPanelState {
    /// Flip the star; returns the new star count
    pub fn toggle_star(&mut self) -> u64 {
        self.starred = !self.starred;
        self.stars = if self.starred {
            self.stars + 1
        } else {
            self.stars.saturating_sub(1)
        };
        self.stars
    }

    pub fn toggle_watch(&mut self) -> bool {
        self.watching = !self.watching;
        self.watching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_language_breakdown_sorted_with_one_decimal() {
        let shares = language_breakdown(&mock_languages());
        let names: Vec<_> = shares.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["HTML", "CSS", "JavaScript"]);
        assert_eq!(shares[0].label(), "48.1%");
        assert_eq!(shares[1].label(), "33.3%");
        assert_eq!(shares[2].label(), "18.5%");
        assert_eq!(shares[2].color, "#f1e05a");
    }

    #[test]
    fn test_language_breakdown_keeps_top_five() {
        let languages = Languages::from([
            ("A".to_string(), 1),
            ("B".to_string(), 2),
            ("C".to_string(), 3),
            ("D".to_string(), 4),
            ("E".to_string(), 5),
            ("Rust".to_string(), 6),
        ]);
        let shares = language_breakdown(&languages);
        assert_eq!(shares.len(), 5);
        assert_eq!(shares[0].name, "Rust");
        assert_eq!(shares[0].color, DEFAULT_LANGUAGE_COLOR);
        assert!(shares.iter().all(|s| s.name != "A"));
    }

    #[test]
    fn test_language_breakdown_of_nothing_is_empty() {
        assert!(language_breakdown(&Languages::new()).is_empty());
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = now();
        assert_eq!(time_ago(now - chrono::Duration::seconds(30), now), "just now");
        assert_eq!(time_ago(now + chrono::Duration::minutes(5), now), "just now");
        assert_eq!(time_ago(now - chrono::Duration::minutes(59), now), "59m ago");
        assert_eq!(time_ago(now - chrono::Duration::hours(23), now), "23h ago");
        assert_eq!(time_ago(now - chrono::Duration::days(6), now), "6d ago");
        assert!(time_ago(now - chrono::Duration::days(30), now).contains('/'));
    }

    #[test]
    fn test_commit_summaries_first_three_short_sha() {
        let mut commits = mock_commits(now());
        commits[0].commit.message = "Subject line\n\nBody text".to_string();
        commits[0].sha = "0123456789abcdef".to_string();
        commits.push(commits[1].clone());

        let summaries = commit_summaries(&commits, now());
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].message, "Subject line");
        assert_eq!(summaries[0].short_sha, "0123456");
        assert_eq!(summaries[1].time_ago, "1h ago");
        assert_eq!(summaries[2].author, "SyntaxSidekick");
    }

    #[test]
    fn test_repo_info_deserializes_api_payload() {
        let json = r#"{
            "description": null,
            "stargazers_count": 1200,
            "forks_count": 30,
            "open_issues_count": 4,
            "updated_at": "2024-05-19T10:00:00Z",
            "language": "HTML",
            "extra": true
        }"#;
        let info: RepoInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.description, None);
        assert_eq!(info.stargazers_count, 1200);
        assert_eq!(format_count(info.stargazers_count), "1,200");
    }

    #[test]
    fn test_format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_counter_animation_progress() {
        let counter = CounterAnimation::new(0, 42, Duration::from_millis(100));
        assert_eq!(counter.value_at(Duration::from_millis(100)), 0);
        assert_eq!(counter.value_at(Duration::from_millis(600)), 21);
        assert_eq!(counter.value_at(Duration::from_millis(5000)), 42);
        assert!(counter.is_done(Duration::from_millis(1100)));

        let down = CounterAnimation::new(10, 9, Duration::ZERO);
        assert_eq!(down.value_at(COUNTER_ANIMATION), 9);
    }

    #[test]
    fn test_star_count_never_below_zero() {
        let mut state = RepoPanelState::default();
        assert_eq!(state.toggle_star(), 1);
        assert_eq!(state.toggle_star(), 0);
        state.starred = true;
        assert_eq!(state.toggle_star(), 0);
    }
}
