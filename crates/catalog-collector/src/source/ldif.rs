//! LDIF content parser, as produced by `ldapsearch -LLL`.
//!
//! Pipeline:
//!   raw &str
//!     └─ unfold_lines()  → Vec<(line number, logical line)>
//!          └─ parse_line() → (attribute, value)
//!               └─ blank line → flush one `Attributes` record

use base64::{Engine as _, engine::general_purpose::STANDARD};
use catalog_core::source::Attributes;
use tracing::warn;

use super::SourceError;

type Result<T> = std::result::Result<T, SourceError>;

/// Parse every record in `text`. The leading `dn:` line is kept as a `dn`
/// attribute.
///
/// A value that cannot be carried as text (undecodable or binary base64,
/// `:<` URL references) drops that one attribute value and keeps the record.
/// Only a line that is not `attribute: value` at all fails the parse.
pub(crate) fn parse(text: &str) -> Result<Vec<Attributes>> {
  let mut records = Vec::new();
  let mut current = Attributes::new();

  for (line_no, line) in unfold_lines(text) {
    if line.is_empty() {
      if !current.is_empty() {
        records.push(std::mem::take(&mut current));
      }
      continue;
    }
    if line.starts_with('#') {
      continue;
    }
    let (name, value) = match parse_line(line_no, &line)? {
      Value::Text(name, value) => (name, value),
      Value::Unsupported(name, reason) => {
        warn!(line = line_no, attribute = name, reason, "dropping attribute value");
        continue;
      }
    };
    if name.eq_ignore_ascii_case("version") && records.is_empty() && current.is_empty() {
      continue;
    }
    current.push(name, value);
  }

  if !current.is_empty() {
    records.push(current);
  }
  Ok(records)
}

/// Join continuation lines (RFC 2849: a line starting with one space
/// continues the previous line). Comments fold the same way. Blank lines are
/// kept as empty strings, since they separate records.
fn unfold_lines(text: &str) -> Vec<(usize, String)> {
  let mut lines: Vec<(usize, String)> = Vec::new();
  for (idx, raw) in text.split('\n').enumerate() {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    match (line.strip_prefix(' '), lines.last_mut()) {
      (Some(rest), Some((_, last))) if !last.is_empty() => last.push_str(rest),
      _ => lines.push((idx + 1, line.to_owned())),
    }
  }
  lines
}

/// One parsed attribute line.
#[derive(Debug, PartialEq, Eq)]
enum Value<'l> {
  Text(&'l str, String),
  /// Dropped: the value cannot be carried as text.
  Unsupported(&'l str, &'static str),
}

fn parse_line(line_no: usize, line: &str) -> Result<Value<'_>> {
  let err = |reason: &str| SourceError::Ldif {
    line:   line_no,
    reason: reason.to_owned(),
  };

  let (name, rest) = line
    .split_once(':')
    .ok_or_else(|| err("expected `attribute: value`"))?;
  // `cn;lang-en: …` → `cn`
  let name = name.split_once(';').map_or(name, |(bare, _)| bare).trim();
  if name.is_empty() {
    return Err(err("empty attribute name"));
  }

  if let Some(encoded) = rest.strip_prefix(':') {
    let Ok(bytes) = STANDARD.decode(encoded.trim()) else {
      return Ok(Value::Unsupported(name, "invalid base64"));
    };
    return Ok(match String::from_utf8(bytes) {
      Ok(text) => Value::Text(name, text),
      Err(_) => Value::Unsupported(name, "binary value"),
    });
  }
  if rest.starts_with('<') {
    return Ok(Value::Unsupported(name, "URL-referenced value"));
  }
  Ok(Value::Text(name, rest.trim_start().to_owned()))
}
