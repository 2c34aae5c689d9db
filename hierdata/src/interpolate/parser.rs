//! Scanner for interpolation markup inside string values.
//!
//! A string is split into literal text, function calls such as
//! `%{hiera('db.host')}` and bare variables such as `%{::environment}`. The
//! argument of a call may be quoted with either quote character and may carry
//! a leading `::`, which is ignored. Markup that does not parse is literal
//! text.

use std::fmt;

/// Functions recognised inside `%{...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    Scope,
    Hiera,
    Lookup,
    Literal,
    Alias,
}

impl Function {
    const ALL: [Self; 5] = [
        Self::Scope,
        Self::Hiera,
        Self::Lookup,
        Self::Literal,
        Self::Alias,
    ];

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Scope => "scope",
            Self::Hiera => "hiera",
            Self::Lookup => "lookup",
            Self::Literal => "literal",
            Self::Alias => "alias",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|function| function.name() == name)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One piece of a scanned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Literal(&'a str),
    Call { function: Function, arg: &'a str },
    Var(&'a str),
}

impl Segment<'_> {
    pub(crate) const fn is_markup(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

/// Split `source` into segments, left to right.
pub(crate) fn parse(source: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;
    while let Some(offset) = source.get(cursor..).and_then(|rest| rest.find("%{")) {
        let start = cursor + offset;
        let body_start = start + 2;
        let body = source.get(body_start..).unwrap_or_default();
        let Some((segment, consumed)) = parse_call(body).or_else(|| parse_var(body)) else {
            break;
        };
        if literal_start < start {
            segments.extend(source.get(literal_start..start).map(Segment::Literal));
        }
        segments.push(segment);
        cursor = body_start + consumed;
        literal_start = cursor;
    }
    if let Some(rest) = source.get(literal_start..).filter(|rest| !rest.is_empty()) {
        segments.push(Segment::Literal(rest));
    }
    segments
}

/// Whether `source` contains any markup at all.
pub(crate) fn has_markup(source: &str) -> bool {
    source.contains("%{") && parse(source).iter().any(Segment::is_markup)
}

fn parse_call(body: &str) -> Option<(Segment<'_>, usize)> {
    let open = body.find('(')?;
    let function = Function::from_name(body.get(..open)?)?;
    let quoted = body.get(open + 1..)?.strip_prefix(['\'', '"'])?;
    let close = quoted.find(['\'', '"'])?;
    let raw = quoted.get(..close)?;
    let tail = quoted.get(close + 1..)?;
    if !tail.starts_with(")}") {
        return None;
    }
    let arg = raw.strip_prefix("::").unwrap_or(raw);
    let consumed = body.len() - tail.len() + 2;
    Some((Segment::Call { function, arg }, consumed))
}

fn parse_var(body: &str) -> Option<(Segment<'_>, usize)> {
    let end = body.find('}')?;
    let raw = body.get(..end)?;
    let name = raw.strip_prefix("::").unwrap_or(raw);
    if name.contains('(') {
        tracing::warn!(markup = name, "unrecognised function call; treating it as a variable");
    }
    Some((Segment::Var(name), end + 1))
}
