//! Inline highlight spans.
//!
//! `~text~` becomes a coloured `\tcbox` around `text`; `~text~{top,bottom}`
//! sets the box spacing explicitly. `\~` is a literal tilde.

use std::sync::LazyLock;

use framer_config::HighlightConfig;
use regex::{Captures, Regex};

static EXPLICIT_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\\])~([^~]+)~\{([^{},]*),([^{}]*)\}").unwrap()
});

static BARE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\\])~([^~]+)~").unwrap());

/// Expands highlight spans line by line.
#[derive(Debug, Clone, Copy)]
pub struct StyleExpander<'a> {
    config: &'a HighlightConfig,
    poster: bool,
}

impl<'a> StyleExpander<'a> {
    /// Create an expander; `poster` selects the poster top spacing for bare
    /// spans.
    #[must_use]
    pub fn new(config: &'a HighlightConfig, poster: bool) -> Self {
        Self { config, poster }
    }

    /// Expand every highlight span in `input`.
    #[must_use]
    pub fn process(&self, input: &str) -> String {
        input
            .split('\n')
            .map(|line| self.expand_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace spans until none is left, explicit spacing first.
    fn expand_line(&self, line: &str) -> String {
        let mut line = line.to_owned();
        let mut bare_count = 0;

        // every substitution consumes two tildes of the source line
        for _ in 0..line.matches('~').count() / 2 {
            if let Some(caps) = EXPLICIT_SPAN_RE.captures(&line) {
                let boxed = self.tcbox(&caps[2], caps[3].trim(), caps[4].trim());
                line = splice(&line, &caps, &boxed);
            } else if let Some(caps) = BARE_SPAN_RE.captures(&line) {
                let top = if self.poster {
                    &self.config.poster_top
                } else {
                    &self.config.top
                };
                let bottom = if bare_count == 0 {
                    &self.config.bottom
                } else {
                    &self.config.repeat_bottom
                };
                bare_count += 1;
                let boxed = self.tcbox(&caps[2], top, bottom);
                line = splice(&line, &caps, &boxed);
            } else {
                break;
            }
        }

        line
    }

    fn tcbox(&self, text: &str, top: &str, bottom: &str) -> String {
        format!(
            "\\tcbox[on line,boxsep=0pt,left=1pt,right=1pt,top={top},bottom={bottom},colback={}]{{{text}}}",
            self.config.colour
        )
    }
}

/// Replace the whole match with the kept prefix character and `boxed`.
fn splice(line: &str, caps: &Captures<'_>, boxed: &str) -> String {
    let Some(whole) = caps.get(0) else {
        return line.to_owned();
    };
    format!(
        "{}{}{boxed}{}",
        &line[..whole.start()],
        &caps[1],
        &line[whole.end()..]
    )
}
