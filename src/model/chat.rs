//! Scripted assistant replies
//!
//! A message is answered by the first matching rule of an ordered table.
//! Reply text comes from `assets/chat_responses.yaml`; counts about the page
//! are filled in from a [`PageSummary`] taken when the reply is built.

use crate::model::page::Page;
use crate::model::timer::CardIndex;
use serde::Deserialize;

const BUNDLED_RESPONSES: &str = include_str!("../../assets/chat_responses.yaml");

/// Card types the assistant can open code for
const SHOW_CODE_TYPES: &[&str] = &["analytics", "login", "github", "form", "chart"];

/// Reply templates, one per rule
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponses {
    pub explain_code: String,
    pub debug_issue: String,
    pub optimize_performance: String,
    pub generate_tests: String,
    pub count: String,
    pub explore: String,
    pub explore_forms: String,
    pub explore_charts: String,
    pub explore_animated: String,
    pub dark_mode: String,
    pub responsive: String,
    pub github: String,
    pub code: String,
    pub help: String,
    pub recommend: String,
    pub animation: String,
    pub show_code_found: String,
    pub show_code_missing: String,
    pub highlight_toggle: String,
    pub toggle_missing: String,
    pub default: String,
    pub welcome: String,
    pub github_clause: String,
    pub voice_prompt: String,
}

impl ChatResponses {
    pub fn bundled() -> Result<Self, serde_yaml::Error> {
        Self::from_yaml(BUNDLED_RESPONSES)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

/// What the assistant knows about the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub total: usize,
    pub animated: usize,
    pub forms: usize,
    pub charts: usize,
    pub data: usize,
    /// Lower-cased `h3` text per card, with whether the card has a code trigger
    pub titles: Vec<(String, bool)>,
    pub has_repo_panel: bool,
    pub has_theme_toggle: bool,
}

impl PageSummary {
    pub fn analyze(page: &Page) -> Self {
        let mut summary = PageSummary {
            total: page.cards.len(),
            has_repo_panel: !page.cards_with_class("github-integration-demo").is_empty(),
            has_theme_toggle: page.by_id("darkModeToggle").is_some(),
            ..Default::default()
        };

        for idx in 0..page.cards.len() {
            let Some(card) = page.card(idx) else {
                continue;
            };
            let class = card.attr("class").unwrap_or("");
            if class.contains("flip") || class.contains("hover") {
                summary.animated += 1;
            }
            if card
                .find_first(|el| el.tag == "form" || el.has_class("form-group"))
                .is_some()
            {
                summary.forms += 1;
            }
            if card
                .find_first(|el| {
                    el.has_class("chart") || el.has_class("donut-chart") || el.has_class("bar-chart")
                })
                .is_some()
            {
                summary.charts += 1;
            }
            if card
                .find_first(|el| el.has_class("stats-grid") || el.has_class("data-table"))
                .is_some()
            {
                summary.data += 1;
            }
            summary.titles.push((
                page.cards[idx].title.to_lowercase(),
                card.find_by_class("code-view-btn").is_some(),
            ));
        }
        summary
    }
}

/// Side effect that comes with a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantEffect {
    /// Highlight the card, then open its code modal
    ShowCode(CardIndex),
    /// Pulse the theme toggle
    PulseThemeToggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub effect: Option<AssistantEffect>,
}

impl Reply {
    fn text(text: String) -> Self {
        Self { text, effect: None }
    }
}

struct Rule {
    matches: fn(&str) -> bool,
    reply: fn(&ChatResponses, &PageSummary, &str) -> Option<Reply>,
}

fn any_of(message: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| message.contains(n))
}

/// Checked top to bottom on the lower-cased message; the first rule that
/// matches and produces a reply wins
const RULES: &[Rule] = &[
    Rule {
        matches: |m| any_of(m, &["how many", "count"]),
        reply: |r, s, _| Some(Reply::text(fill(&r.count, s))),
    },
    Rule {
        matches: |m| any_of(m, &["show me", "find"]),
        reply: |r, s, _| {
            let mut lines = Vec::new();
            if s.forms > 0 {
                lines.push(r.explore_forms.as_str());
            }
            if s.charts > 0 {
                lines.push(r.explore_charts.as_str());
            }
            if s.animated > 0 {
                lines.push(r.explore_animated.as_str());
            }
            let text = r.explore.replace("{suggestions}", &lines.join("\n"));
            Some(Reply::text(fill(&text, s)))
        },
    },
    Rule {
        matches: |m| any_of(m, &["dark mode", "theme"]),
        reply: |r, s, _| Some(Reply::text(fill(&r.dark_mode, s))),
    },
    Rule {
        matches: |m| any_of(m, &["responsive", "mobile"]),
        reply: |r, s, _| Some(Reply::text(fill(&r.responsive, s))),
    },
    Rule {
        matches: |m| any_of(m, &["github", "repository"]),
        reply: |r, s, _| Some(Reply::text(fill(&r.github, s))),
    },
    Rule {
        matches: |m| any_of(m, &["copy", "code", "paste"]),
        reply: |r, s, _| Some(Reply::text(fill(&r.code, s))),
    },
    Rule {
        matches: |m| any_of(m, &["help", "how to", "tutorial"]),
        reply: |r, s, _| Some(Reply::text(fill(&r.help, s))),
    },
    Rule {
        matches: |m| any_of(m, &["which card", "recommend", "best"]),
        reply: |r, s, _| Some(Reply::text(fill(&r.recommend, s))),
    },
    Rule {
        matches: |m| any_of(m, &["animation", "micro-interaction"]),
        reply: |r, s, _| Some(Reply::text(fill(&r.animation, s))),
    },
    Rule {
        matches: |m| any_of(m, &["show me code", "open code"]),
        reply: show_code,
    },
    Rule {
        matches: |m| any_of(m, &["highlight", "show me the"]) && any_of(m, &["dark mode", "toggle"]),
        reply: |r, s, _| {
            if s.has_theme_toggle {
                Some(Reply {
                    text: r.highlight_toggle.clone(),
                    effect: Some(AssistantEffect::PulseThemeToggle),
                })
            } else {
                Some(Reply::text(r.toggle_missing.clone()))
            }
        },
    },
];

fn show_code(responses: &ChatResponses, summary: &PageSummary, message: &str) -> Option<Reply> {
    let card_type = SHOW_CODE_TYPES.iter().find(|t| message.contains(*t))?;
    // The last card whose title mentions the type
    let target = summary
        .titles
        .iter()
        .enumerate()
        .filter(|(_, (title, _))| title.contains(card_type))
        .last();

    let reply = match target {
        Some((idx, (_, true))) => Reply {
            text: responses.show_code_found.replace("{type}", card_type),
            effect: Some(AssistantEffect::ShowCode(idx)),
        },
        _ => Reply::text(responses.show_code_missing.replace("{type}", card_type)),
    };
    Some(reply)
}

fn fill(template: &str, summary: &PageSummary) -> String {
    template
        .replace("{card_count}", &summary.total.to_string())
        .replace("{animated}", &summary.animated.to_string())
        .replace("{forms}", &summary.forms.to_string())
        .replace("{charts}", &summary.charts.to_string())
        .replace("{data}", &summary.data.to_string())
}

/// Answer `message`
pub fn respond(responses: &ChatResponses, summary: &PageSummary, message: &str) -> Reply {
    let quick = match message {
        "Explain Code" => Some(&responses.explain_code),
        "Debug Issue" => Some(&responses.debug_issue),
        "Optimize Performance" => Some(&responses.optimize_performance),
        "Generate Tests" => Some(&responses.generate_tests),
        _ => None,
    };
    if let Some(template) = quick {
        return Reply::text(fill(template, summary));
    }

    let lower = message.to_lowercase();
    RULES
        .iter()
        .filter(|rule| (rule.matches)(&lower))
        .find_map(|rule| (rule.reply)(responses, summary, &lower))
        .unwrap_or_else(|| Reply::text(fill(&responses.default, summary)))
}

pub fn welcome(responses: &ChatResponses, summary: &PageSummary) -> String {
    let clause = if summary.has_repo_panel {
        responses.github_clause.as_str()
    } else {
        ""
    };
    fill(&responses.welcome.replace("{github_clause}", clause), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn responses() -> ChatResponses {
        ChatResponses::bundled().unwrap()
    }

    fn summary() -> PageSummary {
        PageSummary {
            total: 21,
            animated: 3,
            forms: 2,
            charts: 0,
            data: 1,
            titles: vec![
                ("analytics overview".into(), true),
                ("sign in".into(), true),
                ("analytics dashboard".into(), true),
                ("github demo".into(), false),
            ],
            has_repo_panel: true,
            has_theme_toggle: true,
        }
    }

    #[test]
    fn test_quick_labels_match_exactly() {
        let r = responses();
        let s = summary();
        assert!(respond(&r, &s, "Explain Code").text.contains("21 responsive UI components"));
        assert_eq!(respond(&r, &s, "Debug Issue").text, r.debug_issue);
        assert_eq!(respond(&r, &s, "Generate Tests").text, r.generate_tests);
        // Lower-case is not a quick label; "code" routes to the code rule
        assert_eq!(respond(&r, &s, "explain code").text, r.code);
    }

    #[test]
    fn test_count_fills_analysis() {
        let text = respond(&responses(), &summary(), "How many cards are there?").text;
        assert!(text.contains("**21 total cards**"));
        assert!(text.contains("**3 animated cards**"));
        assert!(text.contains("**0 chart cards**"));
    }

    #[test]
    fn test_explore_lists_only_present_kinds() {
        let text = respond(&responses(), &summary(), "find something").text;
        assert!(text.contains("📝 Form components for user input"));
        assert!(!text.contains("Data visualization charts"));
        assert!(text.contains("🎭 Animated card interactions"));
    }

    #[test]
    fn test_rule_priority() {
        let r = responses();
        let s = summary();
        // "theme" (rule 3) before "code" (rule 6)
        assert_eq!(respond(&r, &s, "theme code").text, r.dark_mode);
        // "repository" (rule 5) before "help" (rule 7)
        assert_eq!(respond(&r, &s, "help with the repository").text, r.github);
        // "show me" (rule 2) shadows "show me code"
        assert!(respond(&r, &s, "show me code for login").text.starts_with("I can help you explore"));
        assert_eq!(respond(&r, &s, "which card is best?").text, r.recommend);
        assert_eq!(respond(&r, &s, "tell me about animation").text, r.animation);
    }

    #[test]
    fn test_code_rule_shadows_open_code() {
        let r = responses();
        assert_eq!(respond(&r, &summary(), "please open code analytics").text, r.code);
    }

    #[test]
    fn test_show_code_picks_last_matching_card() {
        let reply = show_code(&responses(), &summary(), "open code analytics").unwrap();
        assert_eq!(
            reply.text,
            "I've highlighted the analytics card and will open its code in a moment!"
        );
        assert_eq!(reply.effect, Some(AssistantEffect::ShowCode(2)));
    }

    #[test]
    fn test_show_code_needs_a_trigger() {
        let r = responses();
        let reply = show_code(&r, &summary(), "open code github").unwrap();
        assert_eq!(reply.effect, None);
        assert!(reply.text.starts_with("I couldn't find a github card"));

        let reply = show_code(&r, &summary(), "open code chart").unwrap();
        assert_eq!(
            reply.text,
            "I couldn't find a chart card to show you. Try asking about: Analytics, Login Form, or GitHub Demo."
        );
    }

    #[test]
    fn test_show_code_without_type_falls_through() {
        let r = responses();
        assert_eq!(show_code(&r, &summary(), "open code"), None);
        assert!(respond(&r, &summary(), "zzz").text.contains("**21 Components**"));
    }

    #[test]
    fn test_highlight_toggle() {
        let r = responses();
        let reply = respond(&r, &summary(), "highlight the toggle");
        assert_eq!(reply.effect, Some(AssistantEffect::PulseThemeToggle));
        assert_eq!(reply.text, r.highlight_toggle);

        let mut s = summary();
        s.has_theme_toggle = false;
        assert_eq!(respond(&r, &s, "highlight the toggle").text, "Dark mode toggle not found.");
    }

    #[test]
    fn test_welcome_mentions_repo_panel() {
        let r = responses();
        let text = welcome(&r, &summary());
        assert!(text.contains("Understanding the 21 card components including live GitHub integration"));
        let mut s = summary();
        s.has_repo_panel = false;
        assert!(welcome(&r, &s).contains("Understanding the 21 card components \n"));
    }
}
