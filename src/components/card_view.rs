//! Terminal rendering of one card
//!
//! A card's element tree is flattened into styled lines. Controls are laid
//! out as bracketed labels and their positions are returned alongside the
//! lines so pointer events can be mapped back to them. Leaf elements and
//! groups of leaves become one (wrapped) line each; everything else is
//! walked recursively. A few widgets with no text of their own (charts,
//! bars, particles, the chat transcript) get dedicated renderings.

use crate::bindings::{chat_lines, field_value, ChatLine, Sender};
use crate::components::palette::{hex_color, Palette};
use crate::dom::{Element, Node, NodePath};
use crate::model::page::{Card, ControlKind};
use crate::model::timer::ControlIndex;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Chat messages shown in the assistant card
const CHAT_LINES: usize = 8;
const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Where a control landed inside the card body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlHit {
    pub control: ControlIndex,
    pub line: u16,
    pub column: u16,
    pub width: u16,
}

#[derive(Debug, Default)]
pub struct CardBody {
    pub lines: Vec<Line<'static>>,
    pub hits: Vec<ControlHit>,
}

/// Per-card state that changes the rendering
#[derive(Debug, Clone, Copy, Default)]
pub struct CardState {
    pub hovered: bool,
    pub focused: Option<ControlIndex>,
}

/// Material icon glyph names as terminal symbols
pub fn icon_symbol(glyph: &str) -> &str {
    match glyph {
        "code" => "</>",
        "bookmark_border" => "⚐",
        "bookmark" => "⚑",
        "favorite_border" => "♡",
        "favorite" => "♥",
        "share" => "↗",
        "shopping_cart" => "🛒",
        "more_vert" => "⋮",
        "chat_bubble_outline" => "💬",
        "close" => "✕",
        "send" => "➤",
        "mic" => "🎤",
        "smart_toy" => "🤖",
        "person" => "👤",
        "star" => "★",
        "star_border" => "☆",
        "visibility" => "◉",
        "visibility_off" => "◎",
        "refresh" => "⟳",
        "folder" => "▤",
        "call_split" => "⑂",
        "error_outline" | "error" => "⚠",
        "check_circle" => "✓",
        "flip" => "⇄",
        "view_in_ar" => "◈",
        "dark_mode" => "☾",
        "light_mode" => "☀",
        other => other,
    }
}

/// Percentage in a style value such as `45.2%`
fn percent(value: Option<String>) -> f64 {
    value
        .and_then(|v| v.trim().trim_end_matches('%').parse::<f64>().ok())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
}

/// Colour from a `background: #rrggbb` declaration
fn background_color(el: &Element) -> Option<Color> {
    el.style_property("background")
        .and_then(|v| hex_color(&v))
}

/// Word-wrap `text` to `width` columns
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn is_leaf(el: &Element) -> bool {
    el.child_elements().next().is_none()
}

/// One piece of a control row
enum Segment {
    Text(String, Style),
    Control(ControlIndex, String, Style),
}

struct Renderer<'a> {
    card: &'a Card,
    state: CardState,
    palette: &'a Palette,
    width: usize,
    revealed: bool,
    body: CardBody,
}

/// Render `el`, the element of `card`, into at most `width` columns
pub fn render_card(
    el: &Element,
    card: &Card,
    state: CardState,
    palette: &Palette,
    width: u16,
) -> CardBody {
    let mut r = Renderer {
        card,
        state,
        palette,
        width: width.max(8) as usize,
        revealed: el.has_class("revealed"),
        body: CardBody::default(),
    };

    if state.hovered && el.has_class("card-tilt") {
        if let Some(transform) = el
            .style_property("transform")
            .filter(|t| t.contains("rotate"))
        {
            let angles = transform.replace("perspective(1000px) ", "");
            r.push_text(&format!("⟲ {}", angles), palette.muted());
        }
    }
    let mut path = Vec::new();
    r.walk(el, &mut path);
    r.body
}

impl<'a> Renderer<'a> {
    fn control_at(&self, path: &[usize]) -> Option<ControlIndex> {
        self.card.controls.iter().position(|c| c.path == path)
    }

    fn contains_control(&self, path: &[usize]) -> bool {
        self.card
            .controls
            .iter()
            .any(|c| c.path.len() >= path.len() && c.path[..path.len()] == *path)
    }

    fn push_line(&mut self, line: Line<'static>) {
        self.body.lines.push(line);
    }

    fn push_text(&mut self, text: &str, style: Style) {
        for line in wrap(text, self.width) {
            self.push_line(Line::from(Span::styled(line, style)));
        }
    }

    /// Push spans on one line when they fit, wrapped plain text otherwise
    fn push_spans(&mut self, spans: Vec<(String, Style)>) {
        let spans: Vec<(String, Style)> = spans
            .into_iter()
            .filter(|(text, _)| !text.trim().is_empty())
            .collect();
        if spans.is_empty() {
            return;
        }
        let total: usize = spans.iter().map(|(t, _)| t.width()).sum::<usize>() + spans.len() - 1;
        if total <= self.width {
            let mut line = Vec::new();
            for (i, (text, style)) in spans.into_iter().enumerate() {
                if i > 0 {
                    line.push(Span::raw(" "));
                }
                line.push(Span::styled(text, style));
            }
            self.push_line(Line::from(line));
        } else {
            let style = spans[0].1;
            let text = spans
                .iter()
                .map(|(t, _)| t.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            self.push_text(&text, style);
        }
    }

    fn walk(&mut self, el: &Element, path: &mut NodePath) {
        for (idx, child) in el.children.iter().enumerate() {
            match child {
                Node::Element(inner) => {
                    path.push(idx);
                    self.visit(inner, path);
                    path.pop();
                }
                Node::Text(text) if !text.trim().is_empty() => {
                    let style = self.text_style(el, self.palette.base());
                    self.push_text(text, style);
                }
                _ => {}
            }
        }
    }

    fn visit(&mut self, el: &Element, path: &mut NodePath) {
        if let Some(control) = self.control_at(path) {
            let (label, style) = self.control_label(el, control);
            self.push_row(vec![Segment::Control(control, label, style)]);
            return;
        }
        if self.is_hidden(el) {
            return;
        }

        if el.has_class("particles") {
            self.push_particles(el);
        } else if el.has_class("bar-chart") {
            self.push_bars(el);
        } else if el.has_class("progress") {
            let fill = el
                .find_by_class("progress-fill")
                .and_then(|p| el.get(&p))
                .map(|f| percent(f.style_property("width")))
                .unwrap_or(0.0);
            let line = self.bar_line(fill, self.palette.accent);
            self.push_line(line);
        } else if el.has_class("language-item") {
            self.push_language(el);
        } else if el.has_class("chat-container") {
            self.push_chat(el);
        } else if el.tag == "svg" {
            self.push_sparkline(el);
        } else if el.tag == "img" {
            let alt = el.attr("alt").unwrap_or("image");
            self.push_text(&format!("▣ {}", alt), self.palette.muted());
        } else if self.contains_control(path) {
            match self.row_segments(el, path) {
                Some(segments) if self.is_row(el, &segments) => self.push_row(segments),
                _ => self.walk(el, path),
            }
        } else if el.child_elements().all(is_leaf) {
            let mut spans = Vec::new();
            let style = self.text_style(el, self.palette.base());
            self.collect_spans(el, style, &mut spans);
            self.push_spans(spans);
        } else {
            self.walk(el, path);
        }
    }

    fn is_hidden(&self, el: &Element) -> bool {
        matches!(el.tag.as_str(), "h3" | "script" | "style" | "template")
            || el.has_class("commit-avatar")
            || (el.has_class("reveal-content") && !self.revealed)
            || (el.has_class("card-front") && self.state.hovered)
            || (el.has_class("card-back") && !self.state.hovered)
    }

    fn is_row(&self, el: &Element, segments: &[Segment]) -> bool {
        let controls = segments
            .iter()
            .filter(|s| matches!(s, Segment::Control(..)))
            .count();
        controls >= 2 || el.has_class("setting-item")
    }

    /// Flatten `el` into row segments, or `None` when it holds block content
    fn row_segments(&self, el: &Element, path: &mut NodePath) -> Option<Vec<Segment>> {
        let mut segments = Vec::new();
        for (idx, child) in el.children.iter().enumerate() {
            match child {
                Node::Element(inner) => {
                    path.push(idx);
                    let piece = if let Some(control) = self.control_at(path) {
                        let (label, style) = self.control_label(inner, control);
                        Some(vec![Segment::Control(control, label, style)])
                    } else if self.is_hidden(inner) {
                        Some(Vec::new())
                    } else if is_leaf(inner) {
                        let mut spans = Vec::new();
                        self.collect_spans(inner, self.text_style(inner, self.palette.base()), &mut spans);
                        Some(
                            spans
                                .into_iter()
                                .filter(|(t, _)| !t.trim().is_empty())
                                .map(|(t, s)| Segment::Text(t, s))
                                .collect(),
                        )
                    } else if self.contains_control(path) {
                        self.row_segments(inner, path)
                    } else {
                        None
                    };
                    path.pop();
                    segments.extend(piece?);
                }
                Node::Text(text) if !text.trim().is_empty() => {
                    segments.push(Segment::Text(text.trim().to_string(), self.palette.base()));
                }
                _ => {}
            }
        }
        Some(segments)
    }

    /// Lay out segments left to right, breaking lines when they run out of room
    fn push_row(&mut self, segments: Vec<Segment>) {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut column = 0usize;
        for segment in segments {
            let (text, style, control) = match segment {
                Segment::Text(text, style) => (text, style, None),
                Segment::Control(control, label, style) => (label, style, Some(control)),
            };
            let width = text.width();
            if column > 0 && column + 1 + width > self.width {
                self.push_line(Line::from(std::mem::take(&mut spans)));
                column = 0;
            }
            if column > 0 {
                spans.push(Span::raw(" "));
                column += 1;
            }
            if let Some(control) = control {
                self.body.hits.push(ControlHit {
                    control,
                    line: self.body.lines.len() as u16,
                    column: column as u16,
                    width: width.min(self.width) as u16,
                });
            }
            spans.push(Span::styled(text, style));
            column += width;
        }
        if !spans.is_empty() {
            self.push_line(Line::from(spans));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text styling
    // ─────────────────────────────────────────────────────────────────────────

    fn text_style(&self, el: &Element, inherited: Style) -> Style {
        let p = self.palette;
        if el.has_class("form-error") || el.has_class("error-message") {
            Style::default().fg(p.error)
        } else if el.has_class("success-message") {
            Style::default().fg(p.success)
        } else if el.has_class("commit-sha") {
            Style::default().fg(p.accent)
        } else if el.has_class("commit-time")
            || el.has_class("message-time")
            || el.has_class("stat-label")
            || el.has_class("subtitle")
            || el.tag == "label"
        {
            p.muted()
        } else if el.has_class("stat-value") || el.tag == "h4" || el.tag == "th" {
            inherited.add_modifier(Modifier::BOLD)
        } else if el.has_class("article-tag") || el.has_class("image-badge") {
            Style::default().fg(p.selected).add_modifier(Modifier::BOLD)
        } else {
            inherited
        }
    }

    /// Text pieces of `el` and its descendants, icons mapped to symbols
    fn collect_spans(&self, el: &Element, style: Style, out: &mut Vec<(String, Style)>) {
        if el.has_class("status-dot") {
            let color = if el.has_class("active") {
                self.palette.warning
            } else {
                self.palette.success
            };
            out.push(("●".to_string(), Style::default().fg(color)));
            return;
        }
        if el.has_class("language-color") {
            let color = background_color(el).unwrap_or(self.palette.muted);
            out.push(("■".to_string(), Style::default().fg(color)));
            return;
        }
        if el.has_class("loading-spinner") {
            out.push(("◌".to_string(), style));
            return;
        }
        if el.has_class("material-icons") {
            out.push((icon_symbol(el.text_content().trim()).to_string(), style));
            return;
        }
        let separator = el.tag == "tr";
        for child in &el.children {
            match child {
                Node::Element(inner) => {
                    if separator && !out.is_empty() {
                        out.push(("│".to_string(), self.palette.muted()));
                    }
                    let style = self.text_style(inner, style);
                    self.collect_spans(inner, style, out);
                }
                Node::Text(text) => {
                    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                    if !text.is_empty() {
                        out.push((text, style));
                    }
                }
                Node::Comment(_) => {}
            }
        }
    }

    fn label_text(&self, el: &Element) -> String {
        let mut spans = Vec::new();
        self.collect_spans(el, Style::default(), &mut spans);
        spans
            .into_iter()
            .map(|(t, _)| t)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Controls
    // ─────────────────────────────────────────────────────────────────────────

    fn control_label(&self, el: &Element, control: ControlIndex) -> (String, Style) {
        let p = self.palette;
        let kind = self.card.controls[control].kind;
        let focused = self.state.focused == Some(control);
        let disabled = el.has_attr("disabled");
        let field_width = self.width.saturating_sub(4).clamp(6, 40);

        let (label, mut style) = match kind {
            ControlKind::Field | ControlKind::ChatInput => {
                let shown = self.field_text(el, focused);
                let style = if el.attr("aria-invalid") == Some("true") {
                    Style::default().fg(p.error)
                } else {
                    Style::default().fg(p.text)
                };
                (format!("[{}]", fit(&shown, field_width)), style.add_modifier(Modifier::UNDERLINED))
            }
            ControlKind::SettingToggle => {
                if el.has_attr("checked") {
                    ("[■ on ]".to_string(), Style::default().fg(p.success))
                } else {
                    ("[□ off]".to_string(), p.muted())
                }
            }
            ControlKind::CodeView => {
                let style = if self.state.hovered || focused {
                    p.accent()
                } else {
                    p.muted()
                };
                ("</>".to_string(), style)
            }
            ControlKind::Primary | ControlKind::Submit => {
                // A finished action turns the button green
                let bg = if el.style_property("background").as_deref() == Some("#27ae60") {
                    p.success
                } else {
                    p.accent
                };
                (
                    format!(" {} ", self.label_text(el)),
                    Style::default()
                        .fg(Color::White)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                )
            }
            ControlKind::Voice if el.has_class("active") => (
                format!("[{} listening]", icon_symbol("mic")),
                Style::default().fg(p.error).add_modifier(Modifier::BOLD),
            ),
            ControlKind::RepoStar | ControlKind::RepoWatch
                if el.has_class("starred") || el.has_class("watching") =>
            {
                (
                    format!("[{}]", self.label_text(el)),
                    Style::default().fg(p.success).add_modifier(Modifier::BOLD),
                )
            }
            ControlKind::RepoRefresh if el.has_class("loading") => {
                ("[⟳ …]".to_string(), Style::default().fg(p.warning))
            }
            ControlKind::Wishlist => {
                let color = el
                    .style_property("color")
                    .and_then(|c| hex_color(&c))
                    .unwrap_or(p.accent);
                (format!("[{}]", self.label_text(el)), Style::default().fg(color))
            }
            _ => (format!("[{}]", self.label_text(el)), Style::default().fg(p.accent)),
        };

        if el.has_class("touch-active") || el.style_property("transform").is_some() {
            style = style.add_modifier(Modifier::BOLD);
        }
        if disabled {
            style = style.fg(p.muted).add_modifier(Modifier::DIM);
        }
        if focused {
            style = style.add_modifier(Modifier::REVERSED);
        }
        (label, style)
    }

    fn field_text(&self, el: &Element, focused: bool) -> String {
        let value = if el.tag == "select" || el.has_class("form-select") {
            selected_option(el)
        } else {
            field_value(el)
        };
        let mut shown = if el.attr("type") == Some("password") {
            "•".repeat(value.chars().count())
        } else {
            value
        };
        if focused {
            shown.push('▏');
        } else if shown.is_empty() {
            shown = el.attr("placeholder").unwrap_or("").to_string();
        }
        if el.tag == "select" || el.has_class("form-select") {
            shown.push_str(" ▾");
        }
        shown
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Widgets without text
    // ─────────────────────────────────────────────────────────────────────────

    fn bar_line(&self, share: f64, color: Color) -> Line<'static> {
        let width = self.width.saturating_sub(7).max(4);
        let filled = ((share / 100.0) * width as f64).round() as usize;
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::styled("░".repeat(width - filled.min(width)), self.palette.muted()),
            Span::styled(format!(" {:>3.0}%", share), self.palette.muted()),
        ])
    }

    fn push_particles(&mut self, el: &Element) {
        let particles = el.find_all(|e| e.has_class("particle"));
        let active = particles
            .first()
            .and_then(|p| el.get(p))
            .and_then(|p| p.style_property("opacity"))
            .is_some_and(|o| o == "0.6");
        let dots: Vec<&str> = (0..particles.len())
            .map(|i| if i % 2 == 0 { "•" } else { "·" })
            .collect();
        let style = if active {
            Style::default().fg(self.palette.selected)
        } else {
            self.palette.muted()
        };
        self.push_line(Line::from(Span::styled(dots.join("  "), style)));
    }

    fn push_bars(&mut self, el: &Element) {
        let bars: String = el
            .child_elements()
            .filter(|b| b.has_class("bar"))
            .map(|b| {
                let level = (percent(b.style_property("height")) / 100.0 * 7.0).round() as usize;
                let ch = SPARK[level.min(7)];
                format!("{}{} ", ch, ch)
            })
            .collect();
        self.push_line(Line::from(Span::styled(
            bars.trim_end().to_string(),
            Style::default().fg(self.palette.accent),
        )));
    }

    fn push_sparkline(&mut self, el: &Element) {
        let Some(points) = el
            .find_first(|e| e.tag == "polyline")
            .and_then(|p| el.get(&p))
            .and_then(|p| p.attr("points"))
        else {
            return;
        };
        let ys: Vec<f64> = points
            .split_whitespace()
            .filter_map(|pair| pair.split(',').nth(1)?.parse::<f64>().ok())
            .collect();
        let (Some(min), Some(max)) = (
            ys.iter().copied().reduce(f64::min),
            ys.iter().copied().reduce(f64::max),
        ) else {
            return;
        };
        let span = (max - min).max(1.0);
        // SVG y grows downwards
        let line: String = ys
            .iter()
            .map(|y| SPARK[(((max - y) / span) * 7.0).round() as usize])
            .collect();
        self.push_line(Line::from(Span::styled(
            line,
            Style::default().fg(self.palette.accent),
        )));
    }

    fn push_language(&mut self, el: &Element) {
        let text = |class: &str| {
            el.find_by_class(class)
                .and_then(|p| el.get(&p))
                .map(|e| e.text_content())
                .unwrap_or_default()
        };
        let color = el
            .find_by_class("language-color")
            .and_then(|p| el.get(&p))
            .and_then(background_color)
            .unwrap_or(self.palette.muted);
        let fill = el
            .find_by_class("language-bar-fill")
            .and_then(|p| el.get(&p))
            .map(|f| percent(f.style_property("width")))
            .unwrap_or(0.0);

        self.push_line(Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::styled(text("language-name"), self.palette.base()),
            Span::raw(" "),
            Span::styled(text("language-percentage"), self.palette.muted()),
        ]));
        let line = self.bar_line(fill, color);
        self.push_line(line);
    }

    fn push_chat(&mut self, el: &Element) {
        let lines = chat_lines(el);
        let skip = lines.len().saturating_sub(CHAT_LINES);
        for line in lines.into_iter().skip(skip) {
            match line {
                None => self.push_line(Line::from(Span::styled(
                    format!("{} typing…", icon_symbol("smart_toy")),
                    self.palette.muted(),
                ))),
                Some(ChatLine { sender, text, time }) => {
                    let (prefix, style) = match sender {
                        Sender::User => ("you ›", Style::default().fg(self.palette.accent)),
                        Sender::Ai => ("ai  ›", self.palette.base()),
                    };
                    let wrapped = wrap(&text, self.width.saturating_sub(6));
                    for (i, part) in wrapped.into_iter().enumerate() {
                        let lead = if i == 0 { prefix } else { "     " };
                        self.push_line(Line::from(vec![
                            Span::styled(lead.to_string(), self.palette.muted()),
                            Span::raw(" "),
                            Span::styled(part, style),
                        ]));
                    }
                    if !time.is_empty() {
                        self.push_line(Line::from(Span::styled(
                            format!("      {}", time),
                            self.palette.muted(),
                        )));
                    }
                }
            }
        }
    }
}

/// Text of the selected option of a select element
fn selected_option(el: &Element) -> String {
    let value = field_value(el);
    let options: Vec<&Element> = el.child_elements().filter(|o| o.tag == "option").collect();
    options
        .iter()
        .find(|o| !value.is_empty() && o.attr("value") == Some(value.as_str()))
        .or_else(|| options.iter().find(|o| o.has_attr("selected")))
        .or_else(|| options.first())
        .map(|o| o.text_content().trim().to_string())
        .unwrap_or(value)
}

/// Pad or tail-truncate `text` to exactly `width` columns
fn fit(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    while out.width() > width {
        out.remove(0);
    }
    let pad = width - out.width();
    out.push_str(&" ".repeat(pad));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::page::Page;
    use crate::model::theme::Theme;
    use pretty_assertions::assert_eq;

    fn render(markup: &str, state: CardState, width: u16) -> (Page, CardBody) {
        let page = Page::parse(markup).unwrap();
        let el = page.card(0).unwrap().clone();
        let palette = Palette::for_theme(Theme::Light);
        let body = render_card(&el, &page.cards[0], state, &palette, width);
        (page, body)
    }

    fn text(body: &CardBody) -> Vec<String> {
        body.lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three four", 9), vec!["one two", "three", "four"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_fit_pads_and_keeps_tail() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "cdef");
    }

    #[test]
    fn test_buttons_share_a_row_and_report_positions() {
        let (page, body) = render(
            r#"<main><div class="card" data-card-type="basic">
                <h3>Basic</h3>
                <p>Short text</p>
                <div class="card-actions">
                  <button class="btn-primary">Continue</button>
                  <button class="btn-icon"><span class="material-icons">bookmark_border</span></button>
                </div>
              </div></main>"#,
            CardState::default(),
            30,
        );
        assert_eq!(text(&body), vec!["Short text", " Continue  [⚐]"]);
        assert_eq!(body.hits.len(), 2);
        assert_eq!(body.hits[0], ControlHit { control: 0, line: 1, column: 0, width: 10 });
        assert_eq!(body.hits[1].column, 11);
        assert_eq!(page.cards[0].controls.len(), 2);
    }

    #[test]
    fn test_form_group_renders_label_field_and_error() {
        let (_, body) = render(
            r#"<main><div class="card" data-card-type="login-form">
                <div class="form-group error">
                  <label for="email">Email</label>
                  <input class="form-input" type="email" id="email" value="bad" aria-invalid="true">
                  <div class="form-error"><span class="material-icons">error</span>Please enter a valid email address</div>
                </div>
              </div></main>"#,
            CardState::default(),
            50,
        );
        let lines = text(&body);
        assert_eq!(lines[0], "Email");
        assert!(lines[1].starts_with("[bad "));
        assert_eq!(lines[2], "⚠ Please enter a valid email address");
        assert_eq!(body.hits[0].line, 1);
    }

    #[test]
    fn test_password_is_masked_and_focus_shows_cursor() {
        let (_, body) = render(
            r#"<main><div class="card"><input class="form-input" type="password" value="secret"></div></main>"#,
            CardState { hovered: false, focused: Some(0) },
            20,
        );
        assert!(text(&body)[0].starts_with("[••••••▏"));
    }

    #[test]
    fn test_reveal_and_flip_content_follow_state() {
        let markup = r#"<main><div class="card card-flip">
            <div class="card-front"><p>Front</p></div>
            <div class="card-back"><p>Back</p></div>
          </div></main>"#;
        let (_, idle) = render(markup, CardState::default(), 30);
        assert_eq!(text(&idle), vec!["Front"]);
        let (_, hovered) = render(markup, CardState { hovered: true, focused: None }, 30);
        assert_eq!(text(&hovered), vec!["Back"]);

        let closed = r#"<main><div class="card card-reveal"><p>Face</p><div class="reveal-content"><p>Hidden</p></div></div></main>"#;
        let (_, body) = render(closed, CardState::default(), 30);
        assert_eq!(text(&body), vec!["Face"]);
        let open = closed.replace("card card-reveal", "card card-reveal revealed");
        let (_, body) = render(&open, CardState::default(), 30);
        assert_eq!(text(&body), vec!["Face", "Hidden"]);
    }

    #[test]
    fn test_table_rows_are_joined() {
        let (_, body) = render(
            r#"<main><div class="card"><table><tbody><tr><td>#1</td><td>Ada</td></tr></tbody></table></div></main>"#,
            CardState::default(),
            30,
        );
        assert_eq!(text(&body), vec!["#1 │ Ada"]);
    }

    #[test]
    fn test_language_item_draws_a_bar() {
        let (_, body) = render(
            r#"<main><div class="card"><div class="language-item">
                <div class="language-color" style="background: #f1e05a"></div>
                <span class="language-name">JavaScript</span>
                <span class="language-percentage">50.0%</span>
                <div class="language-bar"><div class="language-bar-fill" style="background: #f1e05a; width: 50%"></div></div>
              </div></div></main>"#,
            CardState::default(),
            27,
        );
        let lines = text(&body);
        assert_eq!(lines[0], "■ JavaScript 50.0%");
        assert_eq!(lines[1], format!("{}{}  50%", "█".repeat(10), "░".repeat(10)));
    }

    #[test]
    fn test_select_shows_selected_option() {
        let (_, body) = render(
            r#"<main><div class="card"><select class="form-select"><option value="a">Alpha</option><option value="b" selected>Beta</option></select></div></main>"#,
            CardState::default(),
            20,
        );
        assert!(text(&body)[0].starts_with("[Beta ▾"));
    }
}
