//! Title Sanitization
//!
//! Cleans generated text before it is stored: control characters and markup
//! tags are removed, then the result is cut to [`MAX_TITLE_LENGTH`].
//!
//! Length is counted in Unicode scalar values (`char`s), so truncation never
//! splits a multi-byte character.

/// Maximum length of a stored title, in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

const CONTROL_CHARS: [char; 5] = ['\t', '\n', '\r', '\0', '\x0B'];

/// Remove tab, newline, carriage-return, NUL and vertical-tab characters, then
/// strip markup tags while keeping the text around and between them.
pub fn strip_control_and_tags(value: &str) -> String {
    let without_control: String = value.chars().filter(|c| !CONTROL_CHARS.contains(c)).collect();
    strip_tags(&without_control)
}

/// Cut `value` to at most `max_chars` characters. Returns (value, was_truncated).
pub fn truncate_title(value: &str, max_chars: usize) -> (String, bool) {
    if value.chars().count() <= max_chars {
        return (value.to_string(), false);
    }
    (value.chars().take(max_chars).collect(), true)
}

/// Full pipeline applied to every candidate title. Returns (title, was_truncated).
pub fn sanitize_title(value: &str) -> (String, bool) {
    truncate_title(&strip_control_and_tags(value), MAX_TITLE_LENGTH)
}

#[derive(Clone, Copy)]
enum TagState {
    Text,
    Tag { quote: Option<char> },
    Comment,
}

/// Remove `<...>` tag sequences and `<!-- -->` comments.
///
/// A `<` opens a tag unless it is followed by whitespace, so `a < b` survives
/// while `1<2>3` becomes `13`. Quoted attribute values may contain `>`. An
/// unterminated tag, including a trailing `<`, swallows the rest of the input.
fn strip_tags(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut state = TagState::Text;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match state {
            TagState::Text => {
                if c == '<' && opens_tag(chars.get(i + 1).copied()) {
                    if chars[i + 1..].starts_with(&['!', '-', '-']) {
                        state = TagState::Comment;
                        i += 4;
                        continue;
                    }
                    state = TagState::Tag { quote: None };
                } else {
                    out.push(c);
                }
            }
            TagState::Tag { quote: Some(q) } => {
                if c == q {
                    state = TagState::Tag { quote: None };
                }
            }
            TagState::Tag { quote: None } => match c {
                '"' | '\'' => state = TagState::Tag { quote: Some(c) },
                '>' => state = TagState::Text,
                _ => {}
            },
            TagState::Comment => {
                if c == '-' && chars[i..].starts_with(&['-', '-', '>']) {
                    state = TagState::Text;
                    i += 3;
                    continue;
                }
            }
        }
        i += 1;
    }

    out
}

fn opens_tag(next: Option<char>) -> bool {
    !matches!(next, Some(c) if c.is_whitespace())
}
