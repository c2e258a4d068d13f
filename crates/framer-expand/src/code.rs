//! Embedded script directives.
//!
//! A line `%$ script` runs the script and disappears from the output; a line
//! `%$= script` is replaced by the script's result.

use std::sync::LazyLock;

use framer_script::ScriptContext;
use regex::Regex;

use crate::ExpandError;

static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%\$(=)?[ \t](.*)$").unwrap());

/// Run every script directive in `input` against `script`.
///
/// Directives run top to bottom and share the registers of `script`, so a
/// counter set early in the document is visible further down.
pub fn expand_code(input: &str, script: &mut ScriptContext) -> Result<String, ExpandError> {
    let mut output = Vec::new();

    for (idx, line) in input.split('\n').enumerate() {
        let Some(caps) = DIRECTIVE_RE.captures(line) else {
            output.push(line.to_owned());
            continue;
        };

        let replace = caps.get(1).is_some();
        let result = script.run(&caps[2]).map_err(|source| ExpandError::Script {
            line: idx + 1,
            source,
        })?;

        if replace {
            output.push(result.map(|value| value.to_string()).unwrap_or_default());
        }
    }

    Ok(output.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counter_directives() {
        let mut script = ScriptContext::new();
        let input = "%$ x = 1\nvalue: \n%$= x + 1\nend";

        let output = expand_code(input, &mut script).unwrap();

        assert_eq!(output, "value: \n2\nend");
    }

    #[test]
    fn test_state_shared_across_directives() {
        let mut script = ScriptContext::new();
        let input = "%$ n = 0\n%$ n += 1\n%$ n += 1\n%$= 'slide ' + str(n)";

        let output = expand_code(input, &mut script).unwrap();

        assert_eq!(output, "slide 2");
    }

    #[test]
    fn test_plain_text_untouched() {
        let mut script = ScriptContext::new();
        let input = "% comment\n50%$ off\n%$nospace\n";

        let output = expand_code(input, &mut script).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn test_replace_with_empty_script() {
        let mut script = ScriptContext::new();
        assert_eq!(expand_code("a\n%$= \nb", &mut script).unwrap(), "a\n\nb");
    }

    #[test]
    fn test_script_error_reports_line() {
        let mut script = ScriptContext::new();
        let err = expand_code("a\nb\n%$= 1 / 0", &mut script).unwrap_err();
        assert!(matches!(err, ExpandError::Script { line: 3, .. }));
    }

    #[test]
    fn test_reads_seeded_register() {
        let mut script = ScriptContext::new();
        script.set("poster", true);
        let output = expand_code("%$= if(poster, '0.3em', '1em')", &mut script).unwrap();
        assert_eq!(output, "0.3em");
    }
}
