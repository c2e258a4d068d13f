//! Frame marker lines.

use std::sync::LazyLock;

use regex::Regex;

/// `---`, then either `=` (title only) or an optional `|` filter flag and
/// attached identifier, then arguments.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---(?:(=)|(\|)?([A-Za-z_][A-Za-z0-9_]*)?)(?:[ \t]+(.*?))?[ \t]*$").unwrap()
});

/// A parsed marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Marker<'a> {
    /// `---= text`: default frame whose title is `text` verbatim.
    pub title_only: bool,
    pub filter: bool,
    pub name: &'a str,
    pub rest: &'a str,
}

impl<'a> Marker<'a> {
    pub(crate) fn parse(line: &'a str) -> Option<Self> {
        let caps = MARKER_RE.captures(line)?;
        Some(Self {
            title_only: caps.get(1).is_some(),
            filter: caps.get(2).is_some(),
            name: caps.get(3).map_or("", |m| m.as_str()),
            rest: caps.get(4).map_or("", |m| m.as_str()),
        })
    }

    /// A plain `---` that only closes.
    pub(crate) fn is_bare(&self) -> bool {
        !self.title_only && !self.filter && self.name.is_empty() && self.rest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare() {
        let marker = Marker::parse("---").unwrap();
        assert!(marker.is_bare());
        assert!(Marker::parse("---   ").unwrap().is_bare());
    }

    #[test]
    fn test_plain_title() {
        let marker = Marker::parse("--- Some title").unwrap();
        assert_eq!(marker, Marker { title_only: false, filter: false, name: "", rest: "Some title" });
    }

    #[test]
    fn test_attached_name() {
        let marker = Marker::parse("---image plot.pdf Result").unwrap();
        assert_eq!(marker.name, "image");
        assert_eq!(marker.rest, "plot.pdf Result");
    }

    #[test]
    fn test_filter_flag() {
        let marker = Marker::parse("---|dot -Tpdf").unwrap();
        assert_eq!(marker, Marker { title_only: false, filter: true, name: "dot", rest: "-Tpdf" });
        assert!(!Marker::parse("---|").unwrap().is_bare());
    }

    #[test]
    fn test_title_only() {
        let marker = Marker::parse("---= Energy E=mc2").unwrap();
        assert_eq!(marker, Marker { title_only: true, filter: false, name: "", rest: "Energy E=mc2" });
        assert!(!marker.is_bare());
        assert!(Marker::parse("---=image x").is_none());
    }

    #[test]
    fn test_not_markers() {
        assert!(Marker::parse("----").is_none());
        assert!(Marker::parse("---===[x] y").is_none());
        assert!(Marker::parse(" --- indented").is_none());
        assert!(Marker::parse("text --- text").is_none());
    }
}
