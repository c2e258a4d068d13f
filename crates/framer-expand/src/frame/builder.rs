//! Named block builders.
//!
//! A builder turns the arguments of a frame marker into the opening lines of
//! a block, and later into its closing lines.

use super::args::{BuilderArgs, join_options};
use super::columns::ColumnBoxStack;

/// Beamer frame options accepted as `key=value`.
const FRAME_KEYS: &[&str] = &[
    "allowdisplaybreaks",
    "allowframebreaks",
    "environment",
    "fragile",
    "label",
    "noframenumbering",
    "plain",
    "shrink",
    "squeeze",
];

const IMAGE_KEYS: &[&str] = &[
    "allowdisplaybreaks",
    "allowframebreaks",
    "environment",
    "fragile",
    "label",
    "noframenumbering",
    "plain",
    "shrink",
    "squeeze",
    "width",
];

/// Placement keys plus the box options forwarded to `posterboxenv`.
const DASHBOARD_KEYS: &[&str] = &[
    "above",
    "below",
    "between",
    "colback",
    "colframe",
    "coltitle",
    "column",
    "fill",
    "fonttitle",
    "fontupper",
    "height",
    "span",
];

/// The known block builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    /// Plain beamer frame; selected by a marker without a name.
    Default,
    /// Title page frame.
    Intro,
    /// Table of contents frame.
    Contents,
    /// Frame showing a single centred graphic.
    Image,
    /// Poster dashboard box.
    Dashboard,
}

impl BuilderKind {
    /// Resolve a marker identifier; the empty identifier is the default
    /// builder.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" | "default" => Some(Self::Default),
            "intro" => Some(Self::Intro),
            "contents" => Some(Self::Contents),
            "image" => Some(Self::Image),
            "h" => Some(Self::Dashboard),
            _ => None,
        }
    }

    /// Marker identifier of this builder.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Intro => "intro",
            Self::Contents => "contents",
            Self::Image => "image",
            Self::Dashboard => "h",
        }
    }

    /// Keys this builder takes as keyword arguments; other `key=value` words
    /// stay in the title.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Default | Self::Intro | Self::Contents => FRAME_KEYS,
            Self::Image => IMAGE_KEYS,
            Self::Dashboard => DASHBOARD_KEYS,
        }
    }

    /// Lines that open the block.
    pub fn start(self, args: &BuilderArgs, columns: &mut ColumnBoxStack) -> Vec<String> {
        match self {
            Self::Default => vec![frame_begin(&args.options(), &args.title)],
            Self::Intro => vec![
                "\\begin{frame}[plain]".to_owned(),
                "  \\titlepage".to_owned(),
            ],
            Self::Contents => {
                let title = if args.title.is_empty() {
                    "Outline"
                } else {
                    &args.title
                };
                vec![
                    frame_begin(&args.options(), title),
                    "  \\tableofcontents".to_owned(),
                ]
            }
            Self::Image => image_start(args),
            Self::Dashboard => vec![dashboard_start(args, columns)],
        }
    }

    /// Lines that close the block.
    #[must_use]
    pub fn end(self) -> Vec<String> {
        match self {
            Self::Dashboard => vec!["\\end{posterboxenv}".to_owned()],
            _ => vec!["\\end{frame}".to_owned()],
        }
    }
}

fn frame_begin(options: &str, title: &str) -> String {
    let mut line = "\\begin{frame}".to_owned();
    if !options.is_empty() {
        line.push_str(&format!("[{options}]"));
    }
    if !title.is_empty() {
        line.push_str(&format!("{{{title}}}"));
    }
    line
}

fn image_start(args: &BuilderArgs) -> Vec<String> {
    let (path, title) = args
        .title
        .split_once(' ')
        .unwrap_or((args.title.as_str(), ""));
    let width = args.get("width").unwrap_or("\\textwidth");
    let options = join_options(args.keywords_except(&["width"]));

    let mut lines = vec![frame_begin(&options, title), "  \\centering".to_owned()];
    if path.is_empty() {
        tracing::warn!("Image frame without a graphic path");
    } else {
        lines.push(format!("  \\includegraphics[width={width}]{{{path}}}"));
    }
    lines
}

fn dashboard_start(args: &BuilderArgs, columns: &mut ColumnBoxStack) -> String {
    let requested = args.get("column").and_then(|value| match value.parse::<usize>() {
        Ok(column) => Some(column),
        Err(_) => {
            tracing::warn!(column = value, "Ignoring non-numeric dashboard column");
            None
        }
    });

    let mut name = box_name(&args.title);
    if name.is_empty() {
        name = format!("box{}", columns.len() + 1);
    }
    let placement = columns.place(&name, requested);

    let mut header = vec![
        format!("name={name}"),
        format!("column={}", placement.column),
    ];
    if args.get("below").is_none() {
        header.push(format!("below={}", placement.below));
    }
    header.extend(
        args.keywords_except(&["column"])
            .map(|(k, v)| format!("{k}={v}")),
    );

    format!(
        "\\begin{{posterboxenv}}[title={{{}}}]{{{}}}",
        args.title,
        header.join(",")
    )
}

/// Box name derived from a title: lowercase, alphanumerics only.
fn box_name(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn start(kind: BuilderKind, args: &str) -> Vec<String> {
        kind.start(
            &BuilderArgs::parse(args, kind.keywords()),
            &mut ColumnBoxStack::default(),
        )
    }

    #[test]
    fn test_lookup() {
        assert_eq!(BuilderKind::from_name(""), Some(BuilderKind::Default));
        assert_eq!(BuilderKind::from_name("h"), Some(BuilderKind::Dashboard));
        assert_eq!(BuilderKind::from_name("nosuchbuilder"), None);
        assert_eq!(BuilderKind::Dashboard.name(), "h");
    }

    #[test]
    fn test_default_frame() {
        assert_eq!(start(BuilderKind::Default, ""), vec!["\\begin{frame}"]);
        assert_eq!(
            start(BuilderKind::Default, "My Title fragile=singleslide"),
            vec!["\\begin{frame}[fragile=singleslide]{My Title}"]
        );
        assert_eq!(BuilderKind::Default.end(), vec!["\\end{frame}"]);
    }

    #[test]
    fn test_equation_in_title_is_not_an_option() {
        assert_eq!(
            start(BuilderKind::Default, "Results for n=3 label=res"),
            vec!["\\begin{frame}[label=res]{Results for n=3}"]
        );
        assert_eq!(
            start(BuilderKind::Image, "plot.pdf Fit y=ax+b")[0],
            "\\begin{frame}{Fit y=ax+b}"
        );
    }

    #[test]
    fn test_intro_frame() {
        assert_eq!(
            start(BuilderKind::Intro, "ignored"),
            vec!["\\begin{frame}[plain]", "  \\titlepage"]
        );
    }

    #[test]
    fn test_contents_default_title() {
        assert_eq!(
            start(BuilderKind::Contents, ""),
            vec!["\\begin{frame}{Outline}", "  \\tableofcontents"]
        );
        assert_eq!(
            start(BuilderKind::Contents, "Plan")[0],
            "\\begin{frame}{Plan}"
        );
    }

    #[test]
    fn test_image_frame() {
        assert_eq!(
            start(BuilderKind::Image, "figs/plot.pdf Main result width=0.6\\textwidth"),
            vec![
                "\\begin{frame}{Main result}",
                "  \\centering",
                "  \\includegraphics[width=0.6\\textwidth]{figs/plot.pdf}",
            ]
        );
    }

    #[test]
    fn test_image_default_width() {
        let lines = start(BuilderKind::Image, "plot.png");
        assert_eq!(lines[0], "\\begin{frame}");
        assert_eq!(lines[2], "  \\includegraphics[width=\\textwidth]{plot.png}");
    }

    #[test]
    fn test_dashboard_boxes_chain_in_column() {
        let mut columns = ColumnBoxStack::default();
        let first = BuilderKind::Dashboard.start(
            &BuilderArgs::parse("Key Results! column=1 fill=red", DASHBOARD_KEYS),
            &mut columns,
        );
        let second = BuilderKind::Dashboard.start(
            &BuilderArgs::parse("Next steps", DASHBOARD_KEYS),
            &mut columns,
        );

        assert_eq!(
            first,
            vec!["\\begin{posterboxenv}[title={Key Results!}]{name=keyresults,column=1,below=top,fill=red}"]
        );
        assert_eq!(
            second,
            vec!["\\begin{posterboxenv}[title={Next steps}]{name=nextsteps,column=1,below=keyresults}"]
        );
        assert_eq!(BuilderKind::Dashboard.end(), vec!["\\end{posterboxenv}"]);
    }

    #[test]
    fn test_dashboard_explicit_below_wins() {
        let lines = start(BuilderKind::Dashboard, "Notes below=header");
        assert_eq!(
            lines,
            vec!["\\begin{posterboxenv}[title={Notes}]{name=notes,column=0,below=header}"]
        );
    }

    #[test]
    fn test_box_name() {
        assert_eq!(box_name("Data & Methods (2)"), "datamethods2");
    }
}
