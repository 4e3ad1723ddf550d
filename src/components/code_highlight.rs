use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// JavaScript keywords that should be highlighted
const JS_KEYWORDS: &[&str] = &[
    "const",
    "let",
    "var",
    "function",
    "return",
    "if",
    "else",
    "for",
    "while",
    "do",
    "switch",
    "case",
    "break",
    "continue",
    "new",
    "this",
    "class",
    "extends",
    "import",
    "export",
    "from",
    "async",
    "await",
    "try",
    "catch",
    "finally",
    "throw",
    "typeof",
    "instanceof",
    "of",
    "in",
    "true",
    "false",
    "null",
    "undefined",
];

/// Turns pane text into styled lines
///
/// The code modal renders panes as plain text when no highlighter is set.
pub trait Highlighter {
    fn highlight(&self, language: &str, code: &str) -> Vec<Line<'static>>;
}

/// Token highlighter for the three pane languages
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenHighlighter;

impl Highlighter for TokenHighlighter {
    fn highlight(&self, language: &str, code: &str) -> Vec<Line<'static>> {
        let tokens = match language {
            "html" => tokenize_html(code),
            "css" => tokenize_css(code),
            "javascript" | "js" => tokenize_js(code),
            _ => vec![Token::Text(code.to_string())],
        };
        to_lines(tokens)
    }
}

/// Pane text as unstyled lines
pub fn plain_lines(code: &str) -> Vec<Line<'static>> {
    to_lines(vec![Token::Text(code.to_string())])
}

/// Token types shared by the three languages
#[derive(Debug, PartialEq, Clone)]
enum Token {
    Keyword(String),
    String(String),
    Number(String),
    Comment(String),
    /// HTML tag name or CSS selector
    Tag(String),
    /// HTML attribute name or CSS property
    Attribute(String),
    Identifier(String),
    Punctuation(String),
    Text(String),
}

/// Cursor over the characters of a pane
struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(code: &str) -> Self {
        Self {
            chars: code.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    /// Take characters while `pred` holds
    fn take_while<F: Fn(char) -> bool>(&mut self, pred: F) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Take everything up to and including `end`, or to the end of input
    fn take_through(&mut self, end: &str) -> String {
        let start = self.pos;
        while self.pos < self.chars.len() && !self.starts_with(end) {
            self.pos += 1;
        }
        self.pos = (self.pos + end.chars().count()).min(self.chars.len());
        self.chars[start..self.pos].iter().collect()
    }

    /// A quoted string starting at the current quote character
    fn take_quoted(&mut self) -> String {
        let start = self.pos;
        let quote = self.chars[self.pos];
        self.pos += 1;
        while let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == '\\' {
                self.pos = (self.pos + 1).min(self.chars.len());
            } else if ch == quote {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn take_one(&mut self) -> String {
        let ch = self.chars[self.pos];
        self.pos += 1;
        ch.to_string()
    }

    fn done(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '$'
}

fn tokenize_html(code: &str) -> Vec<Token> {
    let mut s = Scanner::new(code);
    let mut tokens = Vec::new();

    while !s.done() {
        if s.starts_with("<!--") {
            tokens.push(Token::Comment(s.take_through("-->")));
        } else if s.peek() == Some('<') {
            let mut open = s.take_one();
            if s.peek() == Some('/') {
                open.push_str(&s.take_one());
            }
            tokens.push(Token::Punctuation(open));
            let name = s.take_while(is_word_char);
            if !name.is_empty() {
                tokens.push(Token::Tag(name));
            }
            // Attributes up to the closing bracket
            while let Some(ch) = s.peek() {
                match ch {
                    '>' => {
                        tokens.push(Token::Punctuation(s.take_one()));
                        break;
                    }
                    '"' | '\'' => tokens.push(Token::String(s.take_quoted())),
                    '=' | '/' => tokens.push(Token::Punctuation(s.take_one())),
                    c if c.is_whitespace() => {
                        tokens.push(Token::Text(s.take_while(char::is_whitespace)))
                    }
                    c if is_word_char(c) => tokens.push(Token::Attribute(s.take_while(is_word_char))),
                    _ => tokens.push(Token::Punctuation(s.take_one())),
                }
            }
        } else {
            tokens.push(Token::Text(s.take_while(|c| c != '<')));
        }
    }
    tokens
}

fn tokenize_css(code: &str) -> Vec<Token> {
    let mut s = Scanner::new(code);
    let mut tokens = Vec::new();
    let mut depth = 0usize;

    while let Some(ch) = s.peek() {
        match ch {
            '/' if s.peek_at(1) == Some('*') => tokens.push(Token::Comment(s.take_through("*/"))),
            '"' | '\'' => tokens.push(Token::String(s.take_quoted())),
            '{' => {
                depth += 1;
                tokens.push(Token::Punctuation(s.take_one()));
            }
            '}' => {
                depth = depth.saturating_sub(1);
                tokens.push(Token::Punctuation(s.take_one()));
            }
            '@' => {
                let at = s.take_one();
                tokens.push(Token::Keyword(at + &s.take_while(is_word_char)));
            }
            '#' if depth > 0 => {
                let hash = s.take_one();
                tokens.push(Token::Number(hash + &s.take_while(|c| c.is_ascii_hexdigit())));
            }
            c if c.is_whitespace() => tokens.push(Token::Text(s.take_while(char::is_whitespace))),
            c if c.is_ascii_digit() || (c == '.' && s.peek_at(1).is_some_and(|n| n.is_ascii_digit())) => {
                tokens.push(Token::Number(
                    s.take_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '%'),
                ));
            }
            c if is_word_char(c) => {
                let word = s.take_while(is_word_char);
                let is_property = depth > 0 && {
                    let mut offset = 0;
                    while s.peek_at(offset).is_some_and(|c| c == ' ') {
                        offset += 1;
                    }
                    s.peek_at(offset) == Some(':')
                };
                tokens.push(if depth == 0 {
                    Token::Tag(word)
                } else if is_property {
                    Token::Attribute(word)
                } else {
                    Token::Identifier(word)
                });
            }
            _ => {
                let punct = s.take_one();
                if depth == 0 && (punct == "." || punct == ":") {
                    // Selector pieces such as `.card` and `:hover`
                    tokens.push(Token::Tag(punct + &s.take_while(is_word_char)));
                } else {
                    tokens.push(Token::Punctuation(punct));
                }
            }
        }
    }
    tokens
}

fn tokenize_js(code: &str) -> Vec<Token> {
    let mut s = Scanner::new(code);
    let mut tokens = Vec::new();

    while let Some(ch) = s.peek() {
        match ch {
            '/' if s.peek_at(1) == Some('/') => tokens.push(Token::Comment(s.take_while(|c| c != '\n'))),
            '/' if s.peek_at(1) == Some('*') => tokens.push(Token::Comment(s.take_through("*/"))),
            '"' | '\'' | '`' => tokens.push(Token::String(s.take_quoted())),
            c if c.is_whitespace() => tokens.push(Token::Text(s.take_while(char::is_whitespace))),
            c if c.is_ascii_digit() => {
                tokens.push(Token::Number(s.take_while(|c| c.is_ascii_alphanumeric() || c == '.')))
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let word = s.take_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                tokens.push(if JS_KEYWORDS.contains(&word.as_str()) {
                    Token::Keyword(word)
                } else {
                    Token::Identifier(word)
                });
            }
            _ => tokens.push(Token::Punctuation(s.take_one())),
        }
    }
    tokens
}

fn style_of(token: &Token) -> Style {
    match token {
        Token::Keyword(_) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        Token::String(_) => Style::default().fg(Color::Green),
        Token::Number(_) => Style::default().fg(Color::Yellow),
        Token::Comment(_) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        Token::Tag(_) => Style::default().fg(Color::Cyan),
        Token::Attribute(_) => Style::default().fg(Color::LightBlue),
        Token::Identifier(_) => Style::default().fg(Color::White),
        Token::Punctuation(_) => Style::default().fg(Color::Gray),
        Token::Text(_) => Style::default(),
    }
}

fn text_of(token: Token) -> String {
    match token {
        Token::Keyword(s)
        | Token::String(s)
        | Token::Number(s)
        | Token::Comment(s)
        | Token::Tag(s)
        | Token::Attribute(s)
        | Token::Identifier(s)
        | Token::Punctuation(s)
        | Token::Text(s) => s,
    }
}

/// Split styled tokens into lines at newlines
fn to_lines(tokens: Vec<Token>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current_line_spans = Vec::new();

    for token in tokens {
        let style = style_of(&token);
        let text = text_of(token);

        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(std::mem::take(&mut current_line_spans)));
            }
            if !part.is_empty() {
                current_line_spans.push(Span::styled(part.to_string(), style));
            }
        }
    }

    if !current_line_spans.is_empty() {
        lines.push(Line::from(current_line_spans));
    }
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_html_tag_with_attributes() {
        let tokens = tokenize_html(r#"<div class="card">Hi</div>"#);
        assert_eq!(tokens[0], Token::Punctuation("<".to_string()));
        assert_eq!(tokens[1], Token::Tag("div".to_string()));
        assert!(tokens.contains(&Token::Attribute("class".to_string())));
        assert!(tokens.contains(&Token::String("\"card\"".to_string())));
        assert!(tokens.contains(&Token::Text("Hi".to_string())));
        assert!(tokens.contains(&Token::Punctuation("</".to_string())));
    }

    #[test]
    fn test_tokenize_html_comment() {
        let tokens = tokenize_html("<!-- note --><p>");
        assert_eq!(tokens[0], Token::Comment("<!-- note -->".to_string()));
    }

    #[test]
    fn test_tokenize_css_selector_property_value() {
        let tokens = tokenize_css(".card:hover {\n  color: #fff;\n  padding: 1.5rem;\n}");
        assert_eq!(tokens[0], Token::Tag(".card".to_string()));
        assert_eq!(tokens[1], Token::Tag(":hover".to_string()));
        assert!(tokens.contains(&Token::Attribute("color".to_string())));
        assert!(tokens.contains(&Token::Number("#fff".to_string())));
        assert!(tokens.contains(&Token::Number("1.5rem".to_string())));
    }

    #[test]
    fn test_tokenize_css_comment_and_at_rule() {
        let tokens = tokenize_css("/* base */\n@media (max-width: 768px) {}");
        assert_eq!(tokens[0], Token::Comment("/* base */".to_string()));
        assert!(tokens.contains(&Token::Keyword("@media".to_string())));
    }

    #[test]
    fn test_tokenize_js_keywords_strings_comments() {
        let tokens = tokenize_js("const x = 'hi'; // done");
        assert_eq!(tokens[0], Token::Keyword("const".to_string()));
        assert!(tokens.contains(&Token::Identifier("x".to_string())));
        assert!(tokens.contains(&Token::String("'hi'".to_string())));
        assert!(tokens.contains(&Token::Comment("// done".to_string())));
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let tokens = tokenize_js("let s = \"open");
        assert_eq!(tokens.last(), Some(&Token::String("\"open".to_string())));
    }

    #[test]
    fn test_highlight_keeps_line_count() {
        let code = "<div>\n  <p>Text</p>\n</div>";
        let lines = TokenHighlighter.highlight("html", code);
        assert_eq!(lines.len(), 3);
        assert_eq!(plain_lines(code).len(), 3);
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let lines = TokenHighlighter.highlight("rust", "fn main() {}");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].style, Style::default());
    }
}
