//! Frame marker argument parsing.
//!
//! Parses the text after a marker identifier: `key=value` tokens whose key the
//! builder recognises become keyword arguments, everything else is title text.

/// Parsed arguments of a frame marker.
///
/// # Example
///
/// ```
/// use framer_expand::BuilderArgs;
///
/// let args = BuilderArgs::parse(r#"Results for n=3 label="fig one""#, &["label"]);
/// assert_eq!(args.title, "Results for n=3");
/// assert_eq!(args.get("label"), Some("fig one"));
/// assert_eq!(args.get("n"), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuilderArgs {
    /// Positional words joined by single spaces.
    pub title: String,
    /// Keyword arguments in source order.
    pub keywords: Vec<(String, String)>,
}

impl BuilderArgs {
    /// Parse marker arguments, extracting only the keywords named in `keys`.
    #[must_use]
    pub fn parse(input: &str, keys: &[&str]) -> Self {
        let mut args = Self::default();
        let mut words = Vec::new();
        let mut remaining = input.trim();

        while !remaining.is_empty() {
            if let Some((key, value, rest)) =
                parse_key_value(remaining).filter(|(key, _, _)| keys.contains(key))
            {
                args.keywords.push((key.to_owned(), value.to_owned()));
                remaining = rest.trim_start();
            } else {
                let end = remaining.find(char::is_whitespace).unwrap_or(remaining.len());
                words.push(&remaining[..end]);
                remaining = remaining[end..].trim_start();
            }
        }

        args.title = words.join(" ");
        args
    }

    /// Get a keyword argument by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Keyword arguments other than `excluded`, in source order.
    pub fn keywords_except<'a>(
        &'a self,
        excluded: &'a [&str],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.keywords
            .iter()
            .filter(move |(k, _)| !excluded.iter().any(|e| e == k))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keyword arguments as a LaTeX option list: `k=v,k2=v2`.
    #[must_use]
    pub fn options(&self) -> String {
        join_options(self.keywords_except(&[]))
    }

    /// True when neither a title nor keywords were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.keywords.is_empty()
    }
}

/// Join `(key, value)` pairs as `k=v,k2=v2`.
pub(crate) fn join_options<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a leading `key=value` token.
///
/// Supports `key="value"`, `key='value'` and `key=value`. The key must be an
/// identifier directly followed by `=`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let key_end = s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))?;
    if key_end == 0 || !s[..1].chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let key = &s[..key_end];
    let after_eq = s[key_end..].strip_prefix('=')?;

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const KEYS: &[&str] = &["a", "b", "x", "y", "width", "column", "below", "fill"];

    #[test]
    fn test_empty() {
        let args = BuilderArgs::parse("   ", KEYS);
        assert!(args.is_empty());
    }

    #[test]
    fn test_title_only() {
        let args = BuilderArgs::parse("  Hello   world ", KEYS);
        assert_eq!(args.title, "Hello world");
        assert!(args.keywords.is_empty());
    }

    #[test]
    fn test_keywords_keep_order() {
        let args = BuilderArgs::parse("b=2 Title a=1", KEYS);
        assert_eq!(args.title, "Title");
        assert_eq!(
            args.keywords,
            vec![
                ("b".to_owned(), "2".to_owned()),
                ("a".to_owned(), "1".to_owned()),
            ]
        );
        assert_eq!(args.options(), "b=2,a=1");
    }

    #[test]
    fn test_quoted_values() {
        let args = BuilderArgs::parse(r#"x="two words" y='single q'"#, KEYS);
        assert_eq!(args.get("x"), Some("two words"));
        assert_eq!(args.get("y"), Some("single q"));
        assert_eq!(args.title, "");
    }

    #[test]
    fn test_unterminated_quote_is_a_word() {
        let args = BuilderArgs::parse(r#"x="open end"#, KEYS);
        assert_eq!(args.title, r#"x="open end"#);
        assert!(args.keywords.is_empty());
    }

    #[test]
    fn test_latex_in_title_is_not_a_keyword() {
        let args = BuilderArgs::parse(r"Speed \(v=c\) width=5cm", KEYS);
        assert_eq!(args.title, r"Speed \(v=c\)");
        assert_eq!(args.get("width"), Some("5cm"));
    }

    #[test]
    fn test_unknown_key_stays_in_title() {
        let args = BuilderArgs::parse("Energy E=mc2 for n=3 width=2cm", KEYS);
        assert_eq!(args.title, "Energy E=mc2 for n=3");
        assert_eq!(args.keywords, vec![("width".to_owned(), "2cm".to_owned())]);
    }

    #[test]
    fn test_unknown_quoted_key_keeps_spacing() {
        let args = BuilderArgs::parse(r#"Note q="two words""#, KEYS);
        assert_eq!(args.title, r#"Note q="two words""#);
        assert!(args.keywords.is_empty());
    }

    #[test]
    fn test_keywords_except() {
        let args = BuilderArgs::parse("column=1 below=x fill=red", KEYS);
        let rest: Vec<_> = args.keywords_except(&["column"]).collect();
        assert_eq!(rest, vec![("below", "x"), ("fill", "red")]);
    }
}
