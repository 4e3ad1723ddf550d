//! Repository panel: load, counters, language bars, star and watch

use super::Bindings;
use crate::dom::{Element, Node};
use crate::model::page::ControlKind;
use crate::model::repo::{
    commit_summaries, format_count, language_breakdown, mock_commits, mock_info, mock_languages,
    time_ago, CommitSummary, CounterAnimation, LanguageShare, RepoPanelState, RepoSnapshot,
    FALLBACK_DESCRIPTION,
};
use crate::model::timer::{CardIndex, TimerEvent};
use crate::model::tooltip::FRAME;
use crate::services::github::{LoadOutcome, RepoApi, RepoLoader};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

const BARS_DELAY: Duration = Duration::from_millis(100);
const SUCCESS_BANNER: Duration = Duration::from_millis(3000);
const ERROR_BANNER: Duration = Duration::from_millis(5000);
const LOAD_FAILED: &str = "Failed to load repository data. Please try again.";

pub(super) struct RepoState {
    card: CardIndex,
    api: Option<Arc<dyn RepoApi>>,
    pub(super) loader: Option<RepoLoader>,
    pub(super) panel: RepoPanelState,
    /// Element id and animation of each running counter
    counters: Vec<(&'static str, CounterAnimation)>,
    frame_pending: bool,
    bar_widths: Vec<String>,
    banner_token: u64,
}

fn commit_element(commit: &CommitSummary) -> Element {
    Element::new("div")
        .with_attr("class", "commit-item")
        .with_child(Node::Element(
            Element::new("div")
                .with_attr("class", "commit-avatar")
                .with_child(Node::Element(
                    Element::new("img")
                        .with_attr("src", &commit.avatar_url)
                        .with_attr("alt", &commit.author),
                )),
        ))
        .with_child(Node::Element(
            Element::new("div")
                .with_attr("class", "commit-content")
                .with_child(Node::Element(
                    Element::new("p")
                        .with_text(&format!("{} ", commit.message))
                        .with_child(Node::Element(
                            Element::new("span")
                                .with_attr("class", "commit-sha")
                                .with_text(&commit.short_sha),
                        )),
                ))
                .with_child(Node::Element(
                    Element::new("span")
                        .with_attr("class", "commit-time")
                        .with_text(&format!("{} by {}", commit.time_ago, commit.author)),
                )),
        ))
}

fn language_element(share: &LanguageShare) -> Element {
    let background = format!("background: {}", share.color);
    Element::new("div")
        .with_attr("class", "language-item")
        .with_child(Node::Element(
            Element::new("div")
                .with_attr("class", "language-color")
                .with_attr("style", &background),
        ))
        .with_child(Node::Element(
            Element::new("span")
                .with_attr("class", "language-name")
                .with_text(&share.name),
        ))
        .with_child(Node::Element(
            Element::new("span")
                .with_attr("class", "language-percentage")
                .with_text(&share.label()),
        ))
        .with_child(Node::Element(
            Element::new("div")
                .with_attr("class", "language-bar")
                .with_child(Node::Element(
                    Element::new("div")
                        .with_attr("class", "language-bar-fill")
                        .with_attr("style", &format!("{}; width: 0%", background)),
                )),
        ))
}

/// Parse a displayed count such as `1,200`
fn displayed_count(text: &str) -> u64 {
    text.chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

impl Bindings {
    pub(super) fn attach_repo(&mut self, api: Option<Arc<dyn RepoApi>>) {
        let Some(card) = self
            .page
            .find_card(|el| el.has_class("github-integration-demo"))
        else {
            return;
        };
        for kind in [ControlKind::RepoStar, ControlKind::RepoWatch] {
            for control in self.page.controls_of(card, kind) {
                if let Some(el) = self.page.control_mut(card, control) {
                    el.set_attr("disabled", "");
                }
            }
        }
        self.repo = Some(RepoState {
            card,
            api,
            loader: None,
            panel: RepoPanelState::default(),
            counters: Vec::new(),
            frame_pending: false,
            bar_widths: Vec::new(),
            banner_token: 0,
        });
        self.load_repo();
    }

    fn load_repo(&mut self) {
        let Some(repo) = self.repo.as_mut() else {
            return;
        };
        if repo.panel.loading {
            return;
        }
        repo.panel.loading = true;
        match repo.api.clone() {
            Some(api) => {
                tracing::info!("loading repository data");
                repo.loader = Some(RepoLoader::spawn(api));
            }
            None => {
                let now = Utc::now();
                let snapshot = RepoSnapshot {
                    info: mock_info(now),
                    commits: mock_commits(now),
                    languages: mock_languages(),
                };
                self.finish_load(LoadOutcome::Loaded(snapshot));
            }
        }
    }

    /// Pick up a finished background load
    pub(super) fn poll_repo(&mut self) {
        let outcome = self
            .repo
            .as_ref()
            .and_then(|repo| repo.loader.as_ref())
            .and_then(RepoLoader::poll);
        if let Some(outcome) = outcome {
            self.finish_load(outcome);
        }
    }

    fn finish_load(&mut self, outcome: LoadOutcome) {
        let Some(repo) = self.repo.as_mut() else {
            return;
        };
        repo.loader = None;
        repo.panel.loading = false;
        let card = repo.card;

        if let Some(refresh) = self.page.controls_of(card, ControlKind::RepoRefresh).first() {
            if let Some(el) = self.page.control_mut(card, *refresh) {
                el.remove_class("loading");
            }
        }

        match outcome {
            LoadOutcome::Loaded(snapshot) => {
                self.apply_snapshot(card, &snapshot);
                tracing::info!("repository data loaded");
            }
            LoadOutcome::Failed => {
                tracing::error!("error loading repository data");
                self.show_banner(card, "error-message", LOAD_FAILED, ERROR_BANNER);
            }
        }
    }

    fn apply_snapshot(&mut self, card: CardIndex, snapshot: &RepoSnapshot) {
        let now = Utc::now();
        let info = &snapshot.info;
        let description = info
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());
        if let Some(el) = self.page.in_card_by_id_mut(card, "repoDescription") {
            el.set_text(&description);
        }
        if let Some(el) = self.page.in_card_by_id_mut(card, "lastUpdated") {
            el.set_text(&time_ago(info.updated_at.unwrap_or(now), now));
        }
        self.animate_counter(card, "repoStars", info.stargazers_count);
        self.animate_counter(card, "repoForks", info.forks_count);
        self.animate_counter(card, "repoIssues", info.open_issues_count);

        if let Some(list) = self.page.in_card_by_id_mut(card, "commitsList") {
            list.children = commit_summaries(&snapshot.commits, now)
                .iter()
                .map(|commit| Node::Element(commit_element(commit)))
                .collect();
        }

        let shares = language_breakdown(&snapshot.languages);
        if let Some(chart) = self.page.in_card_by_id_mut(card, "languagesChart") {
            chart.children = shares
                .iter()
                .map(|share| Node::Element(language_element(share)))
                .collect();
        }

        for kind in [ControlKind::RepoStar, ControlKind::RepoWatch] {
            for control in self.page.controls_of(card, kind) {
                if let Some(el) = self.page.control_mut(card, control) {
                    el.remove_attr("disabled");
                }
            }
        }

        if let Some(repo) = self.repo.as_mut() {
            repo.bar_widths = shares.iter().map(|s| format!("{:.1}%", s.percentage)).collect();
            repo.panel.loaded = true;
            repo.panel.stars = info.stargazers_count;
            repo.panel.forks = info.forks_count;
            repo.panel.issues = info.open_issues_count;
        }
        self.scheduler.schedule(BARS_DELAY, TimerEvent::RepoBarsGrow);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Animation
    // ─────────────────────────────────────────────────────────────────────────

    fn animate_counter(&mut self, card: CardIndex, id: &'static str, target: u64) {
        let Some(from) = self
            .page
            .in_card_by_id_mut(card, id)
            .map(|el| displayed_count(&el.text_content()))
        else {
            return;
        };
        let started = self.scheduler.now();
        let Some(repo) = self.repo.as_mut() else {
            return;
        };
        repo.counters.retain(|(existing, _)| *existing != id);
        repo.counters
            .push((id, CounterAnimation::new(from, target, started)));
        if !repo.frame_pending {
            repo.frame_pending = true;
            self.scheduler.schedule(FRAME, TimerEvent::RepoCounterFrame);
        }
    }

    pub(super) fn repo_counter_frame(&mut self) {
        let now = self.scheduler.now();
        let Some(repo) = self.repo.as_mut() else {
            return;
        };
        repo.frame_pending = false;
        let card = repo.card;
        let frames: Vec<(&'static str, u64)> = repo
            .counters
            .iter()
            .map(|(id, counter)| (*id, counter.value_at(now)))
            .collect();
        repo.counters.retain(|(_, counter)| !counter.is_done(now));
        let more = !repo.counters.is_empty();
        if more {
            repo.frame_pending = true;
        }

        for (id, value) in frames {
            if let Some(el) = self.page.in_card_by_id_mut(card, id) {
                el.set_text(&format_count(value));
            }
        }
        if more {
            self.scheduler.schedule(FRAME, TimerEvent::RepoCounterFrame);
        }
    }

    pub(super) fn repo_bars_grow(&mut self) {
        let Some(repo) = self.repo.as_ref() else {
            return;
        };
        let (card, widths) = (repo.card, repo.bar_widths.clone());
        let Some(chart) = self.page.in_card_by_id_mut(card, "languagesChart") else {
            return;
        };
        for (path, width) in chart
            .find_all(|el| el.has_class("language-bar-fill"))
            .into_iter()
            .zip(widths)
        {
            if let Some(fill) = chart.get_mut(&path) {
                fill.set_style_property("width", &width);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Buttons
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn click_repo_control(&mut self, kind: ControlKind) {
        let Some(card) = self.repo.as_ref().map(|r| r.card) else {
            return;
        };
        match kind {
            ControlKind::RepoRefresh => {
                if self.repo.as_ref().is_some_and(|r| r.panel.loading) {
                    return;
                }
                if let Some(refresh) = self.page.controls_of(card, kind).first() {
                    if let Some(el) = self.page.control_mut(card, *refresh) {
                        el.add_class("loading");
                    }
                }
                self.load_repo();
            }
            ControlKind::RepoStar => self.toggle_star(card),
            ControlKind::RepoWatch => self.toggle_watch(card),
            _ => {}
        }
    }

    fn set_button(&mut self, card: CardIndex, kind: ControlKind, class: &str, on: bool, icon: &str, label: &str) {
        let Some(control) = self.page.controls_of(card, kind).first().copied() else {
            return;
        };
        let Some(button) = self.page.control_mut(card, control) else {
            return;
        };
        if on {
            button.add_class(class);
        } else {
            button.remove_class(class);
        }
        let spans = button.find_all(|el| el.tag == "span");
        if let Some(first) = spans.first() {
            if let Some(el) = button.get_mut(first) {
                el.set_text(icon);
            }
        }
        if spans.len() > 1 {
            if let Some(el) = spans.last().and_then(|p| button.get_mut(p)) {
                el.set_text(label);
            }
        }
    }

    fn toggle_star(&mut self, card: CardIndex) {
        let Some(repo) = self.repo.as_mut() else {
            return;
        };
        let stars = repo.panel.toggle_star();
        let starred = repo.panel.starred;
        if starred {
            self.set_button(card, ControlKind::RepoStar, "starred", true, "star", "Starred!");
            self.show_banner(card, "success-message", "Repository starred! ⭐", SUCCESS_BANNER);
        } else {
            self.set_button(card, ControlKind::RepoStar, "starred", false, "star_border", "Star Repository");
            self.show_banner(card, "success-message", "Repository unstarred!", SUCCESS_BANNER);
        }
        self.animate_counter(card, "repoStars", stars);
    }

    fn toggle_watch(&mut self, card: CardIndex) {
        let Some(repo) = self.repo.as_mut() else {
            return;
        };
        if repo.panel.toggle_watch() {
            self.set_button(card, ControlKind::RepoWatch, "watching", true, "visibility_off", "Watching");
            self.show_banner(card, "success-message", "Now watching repository! 👀", SUCCESS_BANNER);
        } else {
            self.set_button(card, ControlKind::RepoWatch, "watching", false, "visibility", "Watch Repository");
            self.show_banner(card, "success-message", "Repository unwatched", SUCCESS_BANNER);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Banner
    // ─────────────────────────────────────────────────────────────────────────

    fn show_banner(&mut self, card: CardIndex, class: &str, message: &str, duration: Duration) {
        let Some(repo) = self.repo.as_mut() else {
            return;
        };
        repo.banner_token += 1;
        let token = repo.banner_token;

        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        let Some(content) = el.find_by_class("card-content").and_then(|p| el.get_mut(&p)) else {
            return;
        };
        remove_banners(content);
        content.children.insert(
            0,
            Node::Element(
                Element::new("div")
                    .with_attr("class", class)
                    .with_text(message),
            ),
        );
        self.page.rescan(card);
        self.scheduler
            .schedule(duration, TimerEvent::RepoBannerExpire(token));
    }

    pub(super) fn repo_banner_expire(&mut self, token: u64) {
        let Some(repo) = self.repo.as_ref() else {
            return;
        };
        if repo.banner_token != token {
            return;
        }
        let card = repo.card;
        let Some(el) = self.page.card_mut(card) else {
            return;
        };
        if let Some(content) = el.find_by_class("card-content").and_then(|p| el.get_mut(&p)) {
            remove_banners(content);
        }
        self.page.rescan(card);
    }

    /// Text of the panel's banner, if one is showing
    pub fn repo_banner(&self) -> Option<(bool, String)> {
        let card = self.repo.as_ref()?.card;
        let el = self.page.card(card)?;
        let path = el.find_first(|e| e.has_class("success-message") || e.has_class("error-message"))?;
        let banner = el.get(&path)?;
        Some((banner.has_class("error-message"), banner.text_content()))
    }

    /// Block until an in-flight load completes
    #[cfg(test)]
    pub(super) fn finish_repo_load(&mut self) {
        let Some(loader) = self.repo.as_mut().and_then(|r| r.loader.take()) else {
            return;
        };
        let outcome = loader.wait();
        self.finish_load(outcome);
    }
}

fn remove_banners(content: &mut Element) {
    content.children.retain(|child| {
        !matches!(child, Node::Element(el)
            if el.has_class("success-message") || el.has_class("error-message"))
    });
}
