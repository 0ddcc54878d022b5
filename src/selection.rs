// Selection - the terminal stand-in for "the text selected in the editor"
//
// A selection is written as `path`, `path:LINE` or `path:START-END`
// (1-based, inclusive), or `-` for standard input.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Which part of a source the user picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSpec {
    Stdin,
    File {
        path: PathBuf,
        /// Inclusive 1-based line range; None means the whole file
        lines: Option<(usize, usize)>,
    },
}

impl SelectionSpec {
    /// Parse `path[:start[-end]]` or `-`
    ///
    /// A suffix that is not a line range is treated as part of the path, so
    /// Windows drive letters (`C:\x.py`) still work.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            bail!("empty selection");
        }
        if spec == "-" {
            return Ok(Self::Stdin);
        }

        if let Some((path, range)) = spec.rsplit_once(':') {
            if let Some(lines) = parse_range(range)? {
                if path.is_empty() {
                    bail!("selection '{}' has a line range but no file", spec);
                }
                return Ok(Self::File {
                    path: PathBuf::from(path),
                    lines: Some(lines),
                });
            }
        }

        Ok(Self::File {
            path: PathBuf::from(spec),
            lines: None,
        })
    }

    /// Read the selected text
    pub fn read(&self) -> Result<String> {
        match self {
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read selection from stdin")?;
                Ok(text)
            }
            Self::File { path, lines } => {
                let text = read_file(path)?;
                Ok(match lines {
                    Some((start, end)) => slice_lines(&text, *start, *end),
                    None => text,
                })
            }
        }
    }
}

/// `12` or `3-7`; Ok(None) when `range` does not look like a range at all
fn parse_range(range: &str) -> Result<Option<(usize, usize)>> {
    let looks_numeric = !range.is_empty()
        && range.chars().all(|c| c.is_ascii_digit() || c == '-')
        && range.starts_with(|c: char| c.is_ascii_digit());
    if !looks_numeric {
        return Ok(None);
    }

    let (start, end) = match range.split_once('-') {
        Some((s, e)) => (s, e),
        None => (range, range),
    };
    let start: usize = start.parse().with_context(|| format!("bad line '{}'", start))?;
    let end: usize = end.parse().with_context(|| format!("bad line '{}'", end))?;

    if start == 0 || end < start {
        bail!("invalid line range {}-{} (lines are 1-based)", start, end);
    }
    Ok(Some((start, end)))
}

/// Lines `start..=end` (1-based); ranges past the end are clipped
fn slice_lines(text: &str, start: usize, end: usize) -> String {
    text.lines()
        .skip(start - 1)
        .take(end - start + 1)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full text of a file, with the path in the error
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_whole_file() {
        assert_eq!(
            SelectionSpec::parse("src/main.py").unwrap(),
            SelectionSpec::File {
                path: PathBuf::from("src/main.py"),
                lines: None
            }
        );
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(
            SelectionSpec::parse("a.py:3-7").unwrap(),
            SelectionSpec::File {
                path: PathBuf::from("a.py"),
                lines: Some((3, 7))
            }
        );
        assert_eq!(
            SelectionSpec::parse("a.py:5").unwrap(),
            SelectionSpec::File {
                path: PathBuf::from("a.py"),
                lines: Some((5, 5))
            }
        );
    }

    #[test]
    fn test_parse_stdin_and_drive_letters() {
        assert_eq!(SelectionSpec::parse("-").unwrap(), SelectionSpec::Stdin);
        assert_eq!(
            SelectionSpec::parse(r"C:\work\a.py").unwrap(),
            SelectionSpec::File {
                path: PathBuf::from(r"C:\work\a.py"),
                lines: None
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_ranges() {
        assert!(SelectionSpec::parse("a.py:0-2").is_err());
        assert!(SelectionSpec::parse("a.py:9-2").is_err());
        assert!(SelectionSpec::parse(":3").is_err());
        assert!(SelectionSpec::parse("   ").is_err());
    }

    #[test]
    fn test_read_line_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "one\ntwo\nthree\nfour\n").unwrap();
        let path = file.path().to_path_buf();

        let spec = SelectionSpec::File {
            path: path.clone(),
            lines: Some((2, 3)),
        };
        assert_eq!(spec.read().unwrap(), "two\nthree");

        let clipped = SelectionSpec::File {
            path: path.clone(),
            lines: Some((4, 40)),
        };
        assert_eq!(clipped.read().unwrap(), "four");

        let whole = SelectionSpec::File { path, lines: None };
        assert_eq!(whole.read().unwrap(), "one\ntwo\nthree\nfour\n");
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let err = read_file(Path::new("/no/such/file.py")).unwrap_err();
        assert!(err.to_string().contains("/no/such/file.py"));
    }
}
