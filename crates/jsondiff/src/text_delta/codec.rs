//! The compact delta grammar used by Simperium (diff-match-patch "delta").
//!
//! A delta is a tab-separated list of tokens:
//! - `=N` keeps the next `N` chars of the source
//! - `-N` drops the next `N` chars of the source
//! - `+text` inserts `text`, URI-encoded
//!
//! Counts are in Unicode scalar values.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::myers::{Edit, EditKind};
use crate::error::TextPatchError;

/// Bytes that stay unescaped in inserted text (the `encodeURI` set plus space).
const INSERT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'#')
    .remove(b' ');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaComponent {
    Retain(usize),
    Delete(usize),
    Insert(String),
}

/// Convert an edit script into delta components.
pub fn from_edits(script: &[Edit]) -> Vec<DeltaComponent> {
    script
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(kind, text)| match kind {
            EditKind::Equal => DeltaComponent::Retain(text.chars().count()),
            EditKind::Delete => DeltaComponent::Delete(text.chars().count()),
            EditKind::Insert => DeltaComponent::Insert(text.clone()),
        })
        .collect()
}

pub fn encode(components: &[DeltaComponent]) -> String {
    let tokens: Vec<String> = components
        .iter()
        .map(|c| match c {
            DeltaComponent::Retain(n) => format!("={n}"),
            DeltaComponent::Delete(n) => format!("-{n}"),
            DeltaComponent::Insert(text) => format!("+{}", utf8_percent_encode(text, INSERT_ESCAPE)),
        })
        .collect();
    tokens.join("\t")
}

pub fn decode(delta: &str) -> Result<Vec<DeltaComponent>, TextPatchError> {
    let mut components = Vec::new();
    for token in delta.split('\t') {
        let mut chars = token.chars();
        // Empty tokens (e.g. a trailing tab) carry nothing.
        let Some(op) = chars.next() else { continue };
        let rest = chars.as_str();
        match op {
            '+' => components.push(DeltaComponent::Insert(decode_text(rest)?)),
            '=' => components.push(DeltaComponent::Retain(decode_count(token, rest)?)),
            '-' => components.push(DeltaComponent::Delete(decode_count(token, rest)?)),
            _ => return Err(TextPatchError::InvalidToken(token.to_owned())),
        }
    }
    Ok(components)
}

fn decode_count(token: &str, digits: &str) -> Result<usize, TextPatchError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TextPatchError::InvalidCount(token.to_owned()));
    }
    digits
        .parse()
        .map_err(|_| TextPatchError::InvalidCount(token.to_owned()))
}

fn decode_text(encoded: &str) -> Result<String, TextPatchError> {
    let bytes = encoded.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !well_formed {
                return Err(TextPatchError::InvalidEncoding(encoded.to_owned()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|_| TextPatchError::InvalidEncoding(encoded.to_owned()))
}

/// Replay `components` against `src`. The delta must consume `src` exactly.
pub fn apply(src: &str, components: &[DeltaComponent]) -> Result<String, TextPatchError> {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut pos = 0usize;
    for component in components {
        match component {
            DeltaComponent::Insert(text) => out.push_str(text),
            DeltaComponent::Retain(n) | DeltaComponent::Delete(n) => {
                let end = pos
                    .checked_add(*n)
                    .filter(|end| *end <= chars.len())
                    .ok_or(TextPatchError::SourceOverrun {
                        needed: pos.saturating_add(*n),
                        available: chars.len(),
                    })?;
                if matches!(component, DeltaComponent::Retain(_)) {
                    out.extend(&chars[pos..end]);
                }
                pos = end;
            }
        }
    }
    if pos != chars.len() {
        return Err(TextPatchError::LengthMismatch {
            delta: pos,
            source_len: chars.len(),
        });
    }
    Ok(out)
}
