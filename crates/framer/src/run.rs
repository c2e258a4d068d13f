//! Stage selection and execution.

use std::path::{Path, PathBuf};

use clap::Args;
use framer_config::{CliSettings, Config};
use framer_expand::{ExpandError, Pipeline};

use crate::error::CliError;
use crate::output::Output;

/// Arguments selecting the document and the stages to run.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// Document to process.
    file: PathBuf,

    /// Log the run and the selected options.
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Clean the bibliography referenced by the document.
    #[arg(short, long)]
    bibclean: bool,

    /// Resolve includes into `<file>.assembled`.
    #[arg(short, long)]
    assemble: bool,

    /// Assemble, then expand into `<file>.expanded.tex`.
    #[arg(short, long)]
    expand: bool,

    /// Use poster list and highlight spacing.
    #[arg(short, long)]
    poster_mode: bool,

    /// Path to configuration file (default: auto-discover framer.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Stages selected by the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stages {
    bibclean: bool,
    assemble: bool,
    expand: bool,
    /// No stage flag was given.
    all: bool,
}

impl Stages {
    fn from_flags(bibclean: bool, assemble: bool, expand: bool) -> Result<Self, CliError> {
        if assemble && expand {
            return Err(CliError::MutuallyExclusive);
        }
        if !(bibclean || assemble || expand) {
            return Ok(Self {
                bibclean: true,
                assemble: true,
                expand: true,
                all: true,
            });
        }
        Ok(Self {
            bibclean,
            assemble: assemble || expand,
            expand,
            all: false,
        })
    }
}

impl RunArgs {
    /// Run the selected stages.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let stages = Stages::from_flags(self.bibclean, self.assemble, self.expand)?;

        let cli_settings = CliSettings {
            poster_mode: self.poster_mode.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let (base_path, file_name) = split_document_path(&self.file)?;

        tracing::info!(
            file = %self.file.display(),
            bibclean = stages.bibclean,
            assemble = stages.assemble,
            expand = stages.expand,
            poster_mode = config.poster_mode,
            config = ?config.config_path,
            "Starting run"
        );

        let pipeline = Pipeline::new(&config);

        if stages.bibclean {
            output.highlight("Cleaning bibliography");
            match pipeline.clean_bibliography(base_path, file_name) {
                // a document without a bibliography is fine when every stage runs
                Err(ExpandError::MissingBibliographyReference(path)) if stages.all => {
                    tracing::warn!(path = %path.display(), "No bibliography referenced, skipping");
                }
                result => {
                    result?;
                }
            }
        }
        if stages.assemble {
            output.highlight("Assembling");
            let path = pipeline.assemble_file(base_path, file_name)?;
            output.info(&format!("Wrote {}", path.display()));
        }
        if stages.expand {
            output.highlight("Expanding");
            let path = pipeline.expand_file(base_path, file_name)?;
            output.success(&format!("Wrote {}", path.display()));
        }

        tracing::info!("Run finished");
        Ok(())
    }
}

/// Split the document path into its directory and file name.
fn split_document_path(file: &Path) -> Result<(&Path, &Path), CliError> {
    let name = file
        .file_name()
        .ok_or_else(|| CliError::Validation(format!("not a file: {}", file.display())))?;
    let base = file.parent().unwrap_or_else(|| Path::new(""));
    Ok((base, Path::new(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    fn stages(bibclean: bool, assemble: bool, expand: bool) -> Stages {
        Stages {
            bibclean,
            assemble,
            expand,
            all: false,
        }
    }

    fn write_talk(dir: &Path, text: &str) -> (PathBuf, PathBuf) {
        let file = dir.join("talk.tex");
        std::fs::write(&file, text).unwrap();
        let config = dir.join("framer.toml");
        std::fs::write(&config, "").unwrap();
        (file, config)
    }

    #[test]
    fn test_no_flags_runs_everything() {
        assert_eq!(
            Stages::from_flags(false, false, false).unwrap(),
            Stages {
                all: true,
                ..stages(true, true, true)
            }
        );
    }

    #[test]
    fn test_expand_implies_assemble() {
        assert_eq!(
            Stages::from_flags(false, false, true).unwrap(),
            stages(false, true, true)
        );
    }

    #[test]
    fn test_bibclean_alone() {
        assert_eq!(
            Stages::from_flags(true, false, false).unwrap(),
            stages(true, false, false)
        );
    }

    #[test]
    fn test_assemble_and_expand_conflict() {
        assert!(matches!(
            Stages::from_flags(false, true, true),
            Err(CliError::MutuallyExclusive)
        ));
    }

    #[test]
    fn test_short_flags() {
        let cli = TestCli::try_parse_from(["framer", "-V", "-e", "-p", "talk.tex"]).unwrap();
        assert!(cli.run.verbose);
        assert!(cli.run.expand);
        assert!(cli.run.poster_mode);
        assert_eq!(cli.run.file, PathBuf::from("talk.tex"));
    }

    #[test]
    fn test_split_document_path() {
        let file = PathBuf::from("talks/intro.tex");
        let (base, name) = split_document_path(&file).unwrap();
        assert_eq!(base, Path::new("talks"));
        assert_eq!(name, Path::new("intro.tex"));
    }

    #[test]
    fn test_expand_end_to_end() {
        let temp = tempfile::tempdir().unwrap();
        let (file, config) = write_talk(temp.path(), "--- Hi\n  * ~a~\n---\n");

        let cli = TestCli::try_parse_from([
            "framer",
            "-e",
            "-c",
            config.to_str().unwrap(),
            file.to_str().unwrap(),
        ])
        .unwrap();
        cli.run.execute(&Output::new()).unwrap();

        let expanded = std::fs::read_to_string(temp.path().join("talk.expanded.tex")).unwrap();
        assert!(expanded.starts_with("\\begin{frame}{Hi}"));
        assert!(!temp.path().join("talk.assembled").exists());
    }

    #[test]
    fn test_default_run_without_bibliography() {
        let temp = tempfile::tempdir().unwrap();
        let (file, config) = write_talk(temp.path(), "--- Hi\nplain\n---\n");

        let cli = TestCli::try_parse_from([
            "framer",
            "-c",
            config.to_str().unwrap(),
            file.to_str().unwrap(),
        ])
        .unwrap();
        cli.run.execute(&Output::new()).unwrap();

        assert!(temp.path().join("talk.expanded.tex").exists());
    }

    #[test]
    fn test_explicit_bibclean_requires_reference() {
        let temp = tempfile::tempdir().unwrap();
        let (file, config) = write_talk(temp.path(), "no references\n");

        let cli = TestCli::try_parse_from([
            "framer",
            "-b",
            "-c",
            config.to_str().unwrap(),
            file.to_str().unwrap(),
        ])
        .unwrap();

        assert!(matches!(
            cli.run.execute(&Output::new()),
            Err(CliError::Expand(ExpandError::MissingBibliographyReference(_)))
        ));
    }
}
