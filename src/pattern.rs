use std::fmt;

use fancy_regex::Regex;

const FLAGS: &[char] = &['g', 'i', 'm', 's', 'u', 'x'];

/// A compiled rule pattern.
///
/// `/body/flags` strings compile to a regex, anything else is an exact literal.
/// Patterns that fail to compile are kept as `Invalid` and never match.
#[derive(Clone)]
pub enum Pattern {
    Literal(String),
    Regex {
        source: String,
        regex: Regex,
        global: bool,
    },
    Invalid {
        source: String,
        reason: String,
    },
}

impl Pattern {
    pub fn parse(source: &str) -> Self {
        let Some((body, flags)) = split_delimited(source) else {
            return Pattern::Literal(source.to_string());
        };

        let regex = Regex::new(&format!("{}{}", inline_flags(flags), unescape_slashes(body)));

        match regex {
            Ok(regex) => Pattern::Regex {
                source: source.to_string(),
                regex,
                global: flags.contains('g'),
            },
            Err(e) => Pattern::Invalid {
                source: source.to_string(),
                reason: e.to_string(),
            },
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Pattern::Literal(s) => s,
            Pattern::Regex { source, .. } | Pattern::Invalid { source, .. } => source,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Pattern::Invalid { .. })
    }

    pub fn is_match(&self, subject: &str) -> bool {
        match self {
            Pattern::Literal(s) => s == subject,
            // Match-all: true when at least one occurrence exists anywhere.
            // A backtracking failure at match time counts as no match.
            Pattern::Regex {
                regex,
                global: true,
                ..
            } => matches!(regex.find_iter(subject).next(), Some(Ok(_))),
            Pattern::Regex { regex, .. } => regex.is_match(subject).unwrap_or(false),
            Pattern::Invalid { .. } => false,
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(s) => write!(f, "Literal({s:?})"),
            Pattern::Regex { source, .. } => write!(f, "Regex({source})"),
            Pattern::Invalid { source, reason } => write!(f, "Invalid({source}: {reason})"),
        }
    }
}

/// Test an optional rule pattern against a subject. Absent and invalid
/// patterns are a plain non-match.
pub fn try_match(pattern: Option<&Pattern>, subject: &str) -> bool {
    pattern.is_some_and(|p| p.is_match(subject))
}

fn split_delimited(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    if body.is_empty() || !flags.chars().all(|c| FLAGS.contains(&c)) {
        return None;
    }
    Some((body, flags))
}

/// `i m s x` as an inline group; `g` and `u` have no regex-level meaning.
fn inline_flags(flags: &str) -> String {
    let set: String = flags.chars().filter(|c| "imsx".contains(*c)).collect();
    if set.is_empty() {
        set
    } else {
        format!("(?{set})")
    }
}

fn unescape_slashes(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('/') => out.push('/'),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}
