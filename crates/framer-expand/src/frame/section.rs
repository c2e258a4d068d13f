//! Section markers.
//!
//! `---===[Short] Long title` starts a new section and opens a frame titled
//! after it. The frame is opened with the title-only `---=` marker so the
//! title text is never read as builder keywords.

use std::sync::LazyLock;

use regex::Regex;

use super::marker::Marker;

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---===[ \t]*(?:\[([^\]]*)\])?[ \t]*(.*?)[ \t]*$").unwrap()
});

/// Rewrite section markers into a `\section` followed by a frame marker.
///
/// A frame that is open when the section starts is closed first.
#[must_use]
pub fn expand_sections(input: &str) -> String {
    let mut output = Vec::new();
    let mut frame_open = false;

    for line in input.split('\n') {
        let Some(caps) = SECTION_RE.captures(line) else {
            if let Some(marker) = Marker::parse(line) {
                frame_open = !marker.is_bare();
            }
            output.push(line.to_owned());
            continue;
        };

        let explicit = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        let text = &caps[2];
        let section = if explicit.is_empty() { text } else { explicit };
        let frame_title = if text.is_empty() { explicit } else { text };

        if frame_open {
            output.push("---".to_owned());
        }
        output.push(String::new());
        output.push(format!("\\section{{{section}}}"));
        output.push("\\stepcounter{subsection}".to_owned());
        output.push(String::new());
        if frame_title.is_empty() {
            output.push("---".to_owned());
        } else {
            output.push(format!("---= {frame_title}"));
        }
        frame_open = !frame_title.is_empty();
    }

    output.join("\n")
}
