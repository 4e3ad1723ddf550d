//! Snippet catalog
//!
//! Canned CSS and JS text shown in the code modal for each card type. The
//! text lives under `snippets/` and is compiled into the binary.

use std::fmt;

const BASE_CSS: &str = include_str!("../snippets/css/base.css");
const BASE_JS: &str = include_str!("../snippets/js/base.js");

/// Category of a showcased card, as written in `data-card-type`/`data-card`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Basic,
    Image,
    Flip,
    Reveal,
    Tilt,
    Particles,
    LoginForm,
    ContactForm,
    SettingsForm,
    StatsCard,
    DataTable,
    MetricsCard,
    DonutChart,
    BarChart,
    LineChart,
    Product,
    Social,
    Profile,
    Article,
    AiAssistant,
    GithubDemo,
}

impl CardType {
    pub fn all() -> &'static [CardType] {
        &[
            CardType::Basic,
            CardType::Image,
            CardType::Flip,
            CardType::Reveal,
            CardType::Tilt,
            CardType::Particles,
            CardType::LoginForm,
            CardType::ContactForm,
            CardType::SettingsForm,
            CardType::StatsCard,
            CardType::DataTable,
            CardType::MetricsCard,
            CardType::DonutChart,
            CardType::BarChart,
            CardType::LineChart,
            CardType::Product,
            CardType::Social,
            CardType::Profile,
            CardType::Article,
            CardType::AiAssistant,
            CardType::GithubDemo,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            CardType::Basic => "basic",
            CardType::Image => "image",
            CardType::Flip => "flip",
            CardType::Reveal => "reveal",
            CardType::Tilt => "tilt",
            CardType::Particles => "particles",
            CardType::LoginForm => "login-form",
            CardType::ContactForm => "contact-form",
            CardType::SettingsForm => "settings-form",
            CardType::StatsCard => "stats-card",
            CardType::DataTable => "data-table",
            CardType::MetricsCard => "metrics-card",
            CardType::DonutChart => "donut-chart",
            CardType::BarChart => "bar-chart",
            CardType::LineChart => "line-chart",
            CardType::Product => "product",
            CardType::Social => "social",
            CardType::Profile => "profile",
            CardType::Article => "article",
            CardType::AiAssistant => "ai-assistant",
            CardType::GithubDemo => "github-demo",
        }
    }

    pub fn from_key(key: &str) -> Option<CardType> {
        CardType::all().iter().copied().find(|t| t.key() == key)
    }

    /// Type-specific CSS appended after the base block
    pub fn css_block(&self) -> &'static str {
        match self {
            CardType::Image => include_str!("../snippets/css/image.css"),
            CardType::Flip => include_str!("../snippets/css/flip.css"),
            CardType::LoginForm => include_str!("../snippets/css/login-form.css"),
            CardType::ContactForm => include_str!("../snippets/css/contact-form.css"),
            CardType::SettingsForm => include_str!("../snippets/css/settings-form.css"),
            CardType::StatsCard => include_str!("../snippets/css/stats-card.css"),
            CardType::DataTable => include_str!("../snippets/css/data-table.css"),
            CardType::MetricsCard => include_str!("../snippets/css/metrics-card.css"),
            CardType::DonutChart => include_str!("../snippets/css/donut-chart.css"),
            CardType::BarChart => include_str!("../snippets/css/bar-chart.css"),
            CardType::LineChart => include_str!("../snippets/css/line-chart.css"),
            CardType::Basic
            | CardType::Reveal
            | CardType::Tilt
            | CardType::Particles
            | CardType::Product
            | CardType::Social
            | CardType::Profile
            | CardType::Article
            | CardType::AiAssistant
            | CardType::GithubDemo => "",
        }
    }

    /// Type-specific JS, replacing the base block when present
    pub fn js_block(&self) -> Option<&'static str> {
        match self {
            CardType::Flip => Some(include_str!("../snippets/js/flip.js")),
            CardType::Reveal => Some(include_str!("../snippets/js/reveal.js")),
            CardType::LoginForm => Some(include_str!("../snippets/js/login-form.js")),
            CardType::ContactForm => Some(include_str!("../snippets/js/contact-form.js")),
            CardType::SettingsForm => Some(include_str!("../snippets/js/settings-form.js")),
            CardType::StatsCard => Some(include_str!("../snippets/js/stats-card.js")),
            CardType::DataTable => Some(include_str!("../snippets/js/data-table.js")),
            CardType::MetricsCard => Some(include_str!("../snippets/js/metrics-card.js")),
            CardType::DonutChart => Some(include_str!("../snippets/js/donut-chart.js")),
            CardType::BarChart => Some(include_str!("../snippets/js/bar-chart.js")),
            CardType::LineChart => Some(include_str!("../snippets/js/line-chart.js")),
            CardType::Basic
            | CardType::Image
            | CardType::Tilt
            | CardType::Particles
            | CardType::Product
            | CardType::Social
            | CardType::Profile
            | CardType::Article
            | CardType::AiAssistant
            | CardType::GithubDemo => None,
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Shared CSS block every card's stylesheet starts with
pub fn base_css() -> &'static str {
    BASE_CSS
}

/// Generic JS shown for types without their own block
pub fn base_js() -> &'static str {
    BASE_JS
}

/// Stylesheet for a card key: base block followed by the type block
pub fn css_for(key: &str) -> String {
    let block = CardType::from_key(key).map(|t| t.css_block()).unwrap_or("");
    format!("{}{}", BASE_CSS, block)
}

/// Script for a card key: the type block, or the base block when none exists
pub fn js_for(key: &str) -> String {
    CardType::from_key(key)
        .and_then(|t| t.js_block())
        .unwrap_or(BASE_JS)
        .to_string()
}
