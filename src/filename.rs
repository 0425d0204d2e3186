//! Filesystem completion, the default [`Completer`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::complete::{common_extension, Completer, Completion};

/// Above this many bytes of matching names the listing collapses into a count.
pub const MAX_TOTAL_MATCHES: usize = 256 << 8;

/// Completes path names relative to the current directory.
///
/// The word is split at its last `/`: everything up to and including the slash is
/// the directory to search (`.` when there is none) and the rest is the prefix that
/// entry names must start with.
#[derive(Debug, Clone, Default)]
pub struct FilenameCompleter {
    base: Option<PathBuf>,
}

impl FilenameCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative words against `base` instead of the working directory.
    pub fn with_base<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn resolve(&self, dir: &str) -> PathBuf {
        match &self.base {
            Some(base) if !Path::new(dir).is_absolute() => base.join(dir),
            _ => PathBuf::from(dir),
        }
    }

    /// Sorted names in `dir` starting with `leaf`, skipping `.` and `..`.
    fn find_matches(&self, dir: &str, leaf: &str) -> Vec<String> {
        let path = self.resolve(dir);
        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!("cannot list {}: {err}", path.display());
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        let mut choices = 0usize;
        let mut total = 0usize;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == "." || name == ".." || !name.starts_with(leaf) {
                continue;
            }
            choices += 1;
            total += name.len();
            if total > MAX_TOTAL_MATCHES {
                names.clear();
                continue;
            }
            names.push(name);
        }

        if total > MAX_TOTAL_MATCHES {
            log::debug!("{choices} matches in {} is too many to list", path.display());
            return vec![format!("{choices:>7}"), "choices".to_owned()];
        }
        names.sort();
        names
    }
}

fn split_path(word: &str) -> (&str, &str) {
    match word.rfind('/') {
        Some(slash) => (&word[..=slash], &word[slash + 1..]),
        None => (".", word),
    }
}

impl Completer for FilenameCompleter {
    fn complete(&mut self, word: &str) -> Option<Completion> {
        let (dir, leaf) = split_path(word);
        let matches = self.find_matches(dir, leaf);

        match matches.as_slice() {
            [] => None,
            [only] => {
                let mut text = only[leaf.len()..].to_owned();
                let target = self.resolve(dir).join(only);
                if let Ok(meta) = fs::metadata(&target) {
                    text.push(if meta.is_dir() { '/' } else { ' ' });
                }
                Some(Completion::unique(text))
            }
            many if !leaf.is_empty() => common_extension(many, leaf.len()).map(Completion::partial),
            _ => None,
        }
    }

    fn possibilities(&mut self, word: &str) -> Vec<String> {
        let (dir, leaf) = split_path(word);
        self.find_matches(dir, leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::{create_dir, File};

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("main.rs")).unwrap();
        File::create(dir.path().join("makefile")).unwrap();
        File::create(dir.path().join("readme")).unwrap();
        create_dir(dir.path().join("src")).unwrap();
        File::create(dir.path().join("src").join("lib.rs")).unwrap();
        dir
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("foo"), (".", "foo"));
        assert_eq!(split_path("src/li"), ("src/", "li"));
        assert_eq!(split_path("/usr/"), ("/usr/", ""));
    }

    #[test]
    fn test_unique_file_gets_space() {
        let dir = fixture();
        let mut completer = FilenameCompleter::with_base(dir.path());
        assert_eq!(completer.complete("re"), Some(Completion::unique("adme ")));
    }

    #[test]
    fn test_unique_directory_gets_slash() {
        let dir = fixture();
        let mut completer = FilenameCompleter::with_base(dir.path());
        assert_eq!(completer.complete("s"), Some(Completion::unique("rc/")));
        assert_eq!(completer.complete("src/l"), Some(Completion::unique("ib.rs ")));
    }

    #[test]
    fn test_ambiguous_prefix_extends() {
        let dir = fixture();
        let mut completer = FilenameCompleter::with_base(dir.path());
        assert_eq!(completer.complete("m"), Some(Completion::partial("a")));
        assert_eq!(completer.complete("ma"), None);
        assert_eq!(completer.complete(""), None);
        assert_eq!(completer.complete("zz"), None);
    }

    #[test]
    fn test_possibilities_sorted() {
        let dir = fixture();
        let mut completer = FilenameCompleter::with_base(dir.path());
        assert_eq!(completer.possibilities("ma"), ["main.rs", "makefile"]);
        assert_eq!(
            completer.possibilities(""),
            ["main.rs", "makefile", "readme", "src"]
        );
        assert!(completer.possibilities("nope/x").is_empty());
    }
}
