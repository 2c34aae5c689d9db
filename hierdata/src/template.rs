//! `%{var}` path templates.
//!
//! Datadirs and hierarchy levels are parsed once, when the base
//! configuration is loaded, into a list of literal and variable segments.
//! Rendering substitutes variables from a [`Context`]; a template that names
//! a variable the context lacks does not render at all, which is how a
//! hierarchy level opts out of a lookup.

use std::fmt;

use crate::context::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Var(String),
}

/// A parsed path template.
///
/// # Examples
///
/// ```
/// use hierdata::{Context, Template};
///
/// let template = Template::parse("nodes/%{::hostname}");
/// let context = Context::new().with("hostname", "web01");
/// assert_eq!(template.render(&context).as_deref(), Some("nodes/web01"));
/// assert_eq!(template.render(&Context::new()), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, recognising `%{name}` and `%{::name}` placeholders.
    ///
    /// An unterminated `%{` is kept as literal text.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;
        while let Some(start) = rest.find("%{") {
            let (before, after_marker) = rest.split_at(start);
            text.push_str(before);
            let body = after_marker.get(2..).unwrap_or_default();
            let Some(end) = body.find('}') else {
                text.push_str(after_marker);
                rest = "";
                break;
            };
            let (name, tail) = body.split_at(end);
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            let trimmed = name.trim();
            segments.push(Segment::Var(
                trimmed.strip_prefix("::").unwrap_or(trimmed).to_owned(),
            ));
            rest = tail.get(1..).unwrap_or_default();
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Self {
            source: source.to_owned(),
            segments,
        }
    }

    /// The template as written in the base configuration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of every variable the template references, in order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Var(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Substitute every placeholder, or return `None` when a variable is
    /// missing from `context`.
    ///
    /// Strings substitute verbatim; other values use their JSON spelling.
    #[must_use]
    pub fn render(&self, context: &Context) -> Option<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Var(name) => match context.get(name)? {
                    serde_json::Value::String(text) => out.push_str(text),
                    other => out.push_str(&other.to_string()),
                },
            }
        }
        Some(out)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
