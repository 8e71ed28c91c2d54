//! Token Resolution
//!
//! Patterns mix literal text with placeholders. Expanding them is delegated to a
//! [`TokenResolver`]; the engine only decides what goes into the context and
//! which options apply.
//!
//! [`FieldTokenResolver`] is a minimal resolver for hosts without a token system
//! of their own. It understands `[scope:name]` and, when the context holds a
//! single record, bare `[name]`.

use crate::error::TitleError;
use crate::record::TitleRecord;
use std::collections::BTreeMap;
use std::fmt;

/// Records available to a pattern, keyed by the name tokens use to reach them.
#[derive(Default)]
pub struct TokenContext<'a> {
    entries: BTreeMap<String, &'a dyn TitleRecord>,
}

impl<'a> TokenContext<'a> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Bind a record under `name`, replacing any earlier binding.
    pub fn with(mut self, name: impl Into<String>, record: &'a dyn TitleRecord) -> Self {
        self.entries.insert(name.into(), record);
        self
    }

    pub fn get(&self, name: &str) -> Option<&'a dyn TitleRecord> {
        self.entries.get(name).copied()
    }

    /// The bound record when exactly one is present.
    pub fn sole(&self) -> Option<&'a dyn TitleRecord> {
        if self.entries.len() == 1 {
            self.entries.values().next().copied()
        } else {
            None
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TokenContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenContext")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Options controlling a single expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// HTML-escape substituted values.
    pub sanitize: bool,
    /// Replace tokens that cannot be resolved with the empty string.
    pub clear_unresolved: bool,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self {
            sanitize: true,
            clear_unresolved: false,
        }
    }
}

/// Expands a pattern against a record context into plain text.
pub trait TokenResolver: Send + Sync {
    fn replace(
        &self,
        pattern: &str,
        context: &TokenContext<'_>,
        options: ReplaceOptions,
    ) -> Result<String, TitleError>;
}

/// Resolves tokens from record properties and fields.
///
/// Built-in names: `id`, `bundle`, `type` (the entity type) and `title`. Any
/// other name is looked up with [`TitleRecord::field`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldTokenResolver;

impl FieldTokenResolver {
    pub fn new() -> Self {
        FieldTokenResolver
    }

    fn resolve(&self, token: &Token<'_>, context: &TokenContext<'_>) -> Option<String> {
        let record = match token.scope {
            Some(scope) => context.get(scope)?,
            None => context.sole()?,
        };
        match token.name {
            "id" => record.id().map(|id| id.to_string()),
            "bundle" => Some(record.bundle().to_string()),
            "type" => Some(record.entity_type().to_string()),
            "title" => Some(record.title().to_string()),
            name => record.field(name),
        }
    }
}

impl TokenResolver for FieldTokenResolver {
    fn replace(
        &self,
        pattern: &str,
        context: &TokenContext<'_>,
        options: ReplaceOptions,
    ) -> Result<String, TitleError> {
        let mut out = String::with_capacity(pattern.len());
        let mut rest = pattern;

        while let Some(start) = rest.find('[') {
            out.push_str(&rest[..start]);
            let candidate = &rest[start..];
            match parse_token(candidate) {
                Some((token, consumed)) => {
                    match self.resolve(&token, context) {
                        Some(value) if options.sanitize => out.push_str(&escape_html(&value)),
                        Some(value) => out.push_str(&value),
                        None if options.clear_unresolved => {}
                        None => out.push_str(&candidate[..consumed]),
                    }
                    rest = &candidate[consumed..];
                }
                None => {
                    out.push('[');
                    rest = &candidate[1..];
                }
            }
        }
        out.push_str(rest);

        Ok(out)
    }
}

struct Token<'p> {
    scope: Option<&'p str>,
    name: &'p str,
}

/// Parse a token at the start of `input` (which begins with `[`).
/// Returns the token and the number of bytes it spans.
fn parse_token(input: &str) -> Option<(Token<'_>, usize)> {
    let end = input[1..].find(|c| c == ']' || c == '[')? + 1;
    if input.as_bytes()[end] != b']' {
        return None;
    }
    let body = &input[1..end];
    let (scope, name) = match body.split_once(':') {
        Some((scope, name)) => (Some(scope), name),
        None => (None, body),
    };
    let valid_scope = scope.map_or(true, |s| !s.is_empty() && !s.contains(char::is_whitespace));
    if !valid_scope || name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((Token { scope, name }, end + 1))
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
