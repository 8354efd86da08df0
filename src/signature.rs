//! File-signature (magic number) matching.
//!
//! The signature index is populated from the database, but how a rule's
//! signature is compared with file contents is pluggable. The default
//! matcher never matches.

/// Decides whether a rule's signature describes `data`.
pub trait SignatureMatcher: Send + Sync {
    fn matches(&self, signature: &str, data: &[u8]) -> bool;
}

/// Signature matching disabled: every query is a miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignatures;

impl SignatureMatcher for NoSignatures {
    fn matches(&self, _signature: &str, _data: &[u8]) -> bool {
        false
    }
}

/// Treats a signature as a literal byte prefix.
///
/// Accepts `\xNN` escapes and an optional `/^.../` wrapper. Signatures that
/// use any other regex construct are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixSignatures;

impl SignatureMatcher for PrefixSignatures {
    fn matches(&self, signature: &str, data: &[u8]) -> bool {
        decode_prefix(signature).is_some_and(|prefix| !prefix.is_empty() && data.starts_with(&prefix))
    }
}

fn decode_prefix(signature: &str) -> Option<Vec<u8>> {
    let body = match signature.strip_prefix('/') {
        Some(rest) => {
            let close = rest.rfind('/')?;
            rest[..close].strip_prefix('^')?
        }
        None => signature,
    };

    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'x' => {
                    let hex: String = chars.by_ref().take(2).collect();
                    if hex.len() != 2 {
                        return None;
                    }
                    out.push(u8::from_str_radix(&hex, 16).ok()?);
                }
                'n' => out.push(b'\n'),
                'r' => out.push(b'\r'),
                't' => out.push(b'\t'),
                '0' => out.push(0),
                c if c.is_ascii_punctuation() => out.push(c as u8),
                _ => return None,
            },
            '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' => {
                return None;
            }
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    Some(out)
}

/// Cache key for binary data: lowercase hex, lossless and printable.
pub(crate) fn cache_key(data: &[u8]) -> String {
    use std::fmt::Write;
    data.iter().fold(String::with_capacity(data.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}
