//! Bibliography cleaning.
//!
//! Strips noisy fields from a `.bib` database and folds non-ASCII characters
//! into ASCII or LaTeX-safe spellings, rewriting the file in place.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::{ExpandError, read_source};

static BIBLIOGRAPHY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\bibliography\{([^}]*)\}").unwrap());

/// `pages = {p45}` and `pages = "p45"` lose the stray `p`.
static PAGES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^(\s*pages\s*=\s*[{"])p(\d)"#).unwrap());

/// Fields removed from every entry.
const DROPPED_FIELDS: [&str; 10] = [
    "howpublished",
    "shorttitle",
    "isbn",
    "abstract",
    "doi",
    "issn",
    "number",
    "note",
    "language",
    "edition",
];

/// Fields removed from every entry except `@misc`.
const DROPPED_UNLESS_MISC: [&str; 2] = ["url", "urldate"];

/// Clean the bibliography belonging to `file_name`.
///
/// A `.tex` file is searched for its `\bibliography{name}` reference and the
/// database `name.bib` next to it is cleaned; any other file is taken to be
/// the database itself. Returns the cleaned text, which is also written back.
pub fn clean_bibliography(base_path: &Path, file_name: &Path) -> Result<String, ExpandError> {
    let path = base_path.join(file_name);
    let bib_path = if path.extension().is_some_and(|ext| ext == "tex") {
        find_bibliography(&path)?
    } else {
        path
    };

    tracing::info!(path = %bib_path.display(), "Cleaning bibliography");
    let text = read_source(&bib_path)?;
    let cleaned = normalize_entries(&text);
    std::fs::write(&bib_path, &cleaned)?;
    Ok(cleaned)
}

/// Locate the database named by the first `\bibliography{...}` in `tex_path`.
fn find_bibliography(tex_path: &Path) -> Result<PathBuf, ExpandError> {
    let text = read_source(tex_path)?;
    let name = BIBLIOGRAPHY_RE
        .captures(&text)
        .and_then(|caps| {
            caps[1]
                .split(',')
                .map(str::trim)
                .find(|name| !name.is_empty())
                .map(str::to_owned)
        })
        .ok_or_else(|| ExpandError::MissingBibliographyReference(tex_path.to_path_buf()))?;

    let file = if Path::new(&name).extension().is_some_and(|ext| ext == "bib") {
        name
    } else {
        format!("{name}.bib")
    };
    let dir = tex_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(file))
}

/// Drop unwanted fields and fold characters in bibliography text.
///
/// Works line by line: a field spanning several lines is only removed on the
/// line that carries its key.
#[must_use]
pub fn normalize_entries(text: &str) -> String {
    let mut in_misc = false;
    let mut output = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim_start();
        if let Some(entry) = trimmed.strip_prefix('@') {
            in_misc = entry.to_ascii_lowercase().starts_with("misc");
        }

        if let Some(key) = field_key(trimmed) {
            let dropped = DROPPED_FIELDS.contains(&key.as_str())
                || (!in_misc && DROPPED_UNLESS_MISC.contains(&key.as_str()));
            if dropped {
                continue;
            }
        }

        let folded = fold_characters(line);
        output.push(PAGES_RE.replace(&folded, "${1}${2}").into_owned());
    }

    output.join("\n")
}

/// Lowercase key of a `key = value` field line.
fn field_key(line: &str) -> Option<String> {
    let (key, _) = line.split_once('=')?;
    let key = key.trim();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| key.to_ascii_lowercase())
}

fn fold_characters(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(replacement) = fold_char(c) {
            out.push_str(replacement);
        } else {
            // accented letters: decompose and drop the combining marks
            out.extend(std::iter::once(c).nfd().filter(|&d| !is_combining_mark(d)));
        }
    }
    out
}

/// Letters without a canonical decomposition, dashes and curly quotes.
fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'ı' => "i",
        '\u{2013}' | '\u{2014}' => "--",
        '\u{201C}' => "``",
        '\u{201D}' => "''",
        '\u{2018}' => "`",
        '\u{2019}' => "'",
        _ => return None,
    };
    Some(folded)
}
