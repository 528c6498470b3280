//! Where a diff comes from: a file, stdin, or a revision range in a git
//! checkout.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Errors while obtaining diff text.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Neither a file nor a revision range was given.
    #[error("no {side} diff given; pass --{side} <FILE> or --{side}-base/--{side}-head")]
    Missing {
        /// `golden` or `candidate`.
        side: &'static str,
    },

    /// Both a file and a revision range were given.
    #[error("--{side} conflicts with --{side}-base/--{side}-head")]
    Conflicting {
        /// `golden` or `candidate`.
        side: &'static str,
    },

    /// Reading a diff file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The diff file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Reading stdin failed.
    #[error("failed to read diff from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    /// `git` could not be started.
    #[error("failed to run git: {0}")]
    GitSpawn(#[source] std::io::Error),

    /// `git` exited unsuccessfully.
    #[error("`git {args}` failed: {stderr}")]
    Git {
        /// Arguments passed to git.
        args: String,
        /// Trimmed stderr output.
        stderr: String,
    },
}

/// A diff to grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// Unified diff stored in a file.
    File(PathBuf),
    /// Unified diff piped on stdin.
    Stdin,
    /// `git diff <merge-base>..<head>` in a local checkout.
    Git {
        /// The checkout.
        repo: PathBuf,
        /// Base revision.
        base: String,
        /// Head revision.
        head: String,
    },
}

impl DiffSource {
    /// Picks the source from CLI arguments. `-` as the file means stdin.
    pub fn from_args(
        side: &'static str,
        file: Option<PathBuf>,
        base: Option<String>,
        head: Option<String>,
        repo: &Path,
    ) -> Result<Self, SourceError> {
        match (file, base, head) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(SourceError::Conflicting { side }),
            (Some(file), None, None) if file.as_os_str() == "-" => Ok(Self::Stdin),
            (Some(file), None, None) => Ok(Self::File(file)),
            (None, Some(base), Some(head)) => Ok(Self::Git {
                repo: repo.to_path_buf(),
                base,
                head,
            }),
            _ => Err(SourceError::Missing { side }),
        }
    }

    /// Returns the diff text.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected;
    /// diffs of legacy-encoded files are still graded.
    pub fn read(&self) -> Result<String, SourceError> {
        match self {
            Self::File(path) => std::fs::read(path)
                .map(|bytes| decode(&bytes))
                .map_err(|e| SourceError::Io {
                    path: path.clone(),
                    source: e,
                }),
            Self::Stdin => {
                let mut bytes = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut bytes)
                    .map_err(SourceError::Stdin)?;
                Ok(decode(&bytes))
            }
            Self::Git { repo, base, head } => {
                let merge_base = git(repo, &["merge-base", base, head])?;
                let range = format!("{}..{head}", merge_base.trim());
                git(repo, &["diff", "--no-color", "--no-ext-diff", &range])
            }
        }
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl std::fmt::Display for DiffSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
            Self::Git { repo, base, head } => write!(f, "{}@{base}...{head}", repo.display()),
        }
    }
}

fn git(repo: &Path, args: &[&str]) -> Result<String, SourceError> {
    tracing::debug!("Running git {} in {}", args.join(" "), repo.display());
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(SourceError::GitSpawn)?;

    if !output.status.success() {
        return Err(SourceError::Git {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(decode(&output.stdout))
}
