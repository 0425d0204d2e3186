//! Command history with a navigation cursor and pattern search.

use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::Result;

/// Direction of a history step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards older entries.
    Older,
    /// Towards newer entries.
    Newer,
}

/// Command history with fixed capacity.
///
/// Entries are kept oldest first. When the store is full the oldest entry is evicted
/// before a new one is appended. A cursor (`pos`) marks the entry currently shown by
/// navigation; it always indexes an existing entry while the history is non-empty.
///
/// During a read the editor appends a transient *working* entry (the empty line being
/// edited) with [`begin_working`](Self::begin_working) and drops it again with
/// [`end_working`](Self::end_working). The working entry never causes an eviction.
///
/// # Examples
///
/// ```
/// use emacsline::History;
///
/// let mut hist = History::new(3);
/// for line in ["a", "b", "c", "d"] {
///     hist.push(line);
/// }
/// assert_eq!(hist.iter().collect::<Vec<_>>(), ["b", "c", "d"]);
/// ```
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
    pos: usize,
    working: bool,
    last_search: Option<String>,
}

impl History {
    /// Creates a history holding at most `capacity` lines (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            pos: 0,
            working: false,
            last_search: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries, including the working entry while a read is active.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the navigation cursor.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&str> {
        self.get(self.pos)
    }

    /// Newest entry.
    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    /// Appends a finished line, evicting the oldest entry when full.
    ///
    /// Moves the cursor to the new entry.
    pub fn push(&mut self, line: &str) {
        let stored = self.entries.len() - usize::from(self.working);
        if stored >= self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                log::debug!("history full, evicting {evicted:?}");
            }
        }
        if self.working {
            let at = self.entries.len() - 1;
            self.entries.insert(at, line.to_owned());
        } else {
            self.entries.push_back(line.to_owned());
        }
        self.pos = self.entries.len() - 1;
    }

    /// Appends `line` unless it is empty or equal to the newest entry.
    ///
    /// Returns `true` if the line was recorded.
    pub fn add(&mut self, line: &str) -> bool {
        if line.is_empty() || self.last() == Some(line) {
            return false;
        }
        self.push(line);
        true
    }

    /// Appends the transient working entry and points the cursor at it.
    pub fn begin_working(&mut self) {
        if !self.working {
            self.entries.push_back(String::new());
            self.working = true;
        }
        self.pos = self.entries.len() - 1;
    }

    /// Removes the working entry again.
    pub fn end_working(&mut self) {
        if self.working {
            self.entries.pop_back();
            self.working = false;
        }
        self.pos = self.entries.len().saturating_sub(1);
    }

    /// Moves the cursor one entry and returns the entry there.
    ///
    /// Returns `None` without moving when already at the boundary.
    pub fn step(&mut self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Older if self.pos > 0 => self.pos -= 1,
            Direction::Newer if self.pos + 1 < self.entries.len() => self.pos += 1,
            _ => return None,
        }
        self.current()
    }

    /// Moves the cursor `count` entries (at least one).
    ///
    /// If any step would leave the history, the cursor is left where it was and
    /// `None` is returned.
    pub fn navigate(&mut self, direction: Direction, count: usize) -> Option<&str> {
        let start = self.pos;
        for _ in 0..count.max(1) {
            if self.step(direction).is_none() {
                self.pos = start;
                return None;
            }
        }
        self.current()
    }

    /// Puts the cursor on the oldest entry.
    pub fn first(&mut self) -> Option<&str> {
        self.pos = 0;
        self.current()
    }

    /// Puts the cursor on the newest entry.
    pub fn last_entry(&mut self) -> Option<&str> {
        self.pos = self.entries.len().saturating_sub(1);
        self.current()
    }

    /// Searches from the cursor in `direction` for an entry matching `pattern`.
    ///
    /// A pattern starting with `^` matches entries that begin with the rest of it;
    /// any other pattern matches entries that contain it. An empty pattern reuses the
    /// last non-empty one. The search does not wrap. When nothing matches the cursor
    /// is restored and `None` is returned.
    pub fn search(&mut self, pattern: &str, direction: Direction) -> Option<&str> {
        let pattern = if pattern.is_empty() {
            match self.last_search.as_deref() {
                Some(last) if !last.is_empty() => last.to_owned(),
                _ => return None,
            }
        } else {
            self.last_search = Some(pattern.to_owned());
            pattern.to_owned()
        };

        let (anchored, needle) = match pattern.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, pattern.as_str()),
        };

        let start = self.pos;
        while self.step(direction).is_some() {
            let entry = &self.entries[self.pos];
            let hit = if anchored {
                entry.starts_with(needle)
            } else {
                entry.contains(needle)
            };
            if hit {
                log::debug!("history search {pattern:?} matched entry {}", self.pos);
                return self.current();
            }
        }
        self.pos = start;
        log::debug!("history search {pattern:?} found nothing");
        None
    }

    /// The most recent non-empty search pattern.
    pub fn last_search(&self) -> Option<&str> {
        self.last_search.as_deref()
    }

    /// Appends every line of `path`, oldest first.
    ///
    /// Lines that are not valid UTF-8 are skipped. Returns how many lines were added.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let reader = BufReader::new(fs::File::open(path.as_ref())?);
        let mut added = 0;
        for (number, line) in reader.split(b'\n').enumerate() {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            match String::from_utf8(line) {
                Ok(line) => {
                    self.push(&line);
                    added += 1;
                }
                Err(_) => log::warn!(
                    "skipping history line {} of {}: not UTF-8",
                    number + 1,
                    path.as_ref().display()
                ),
            }
        }
        Ok(added)
    }

    /// Writes all stored entries to `path`, one per line, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(fs::File::create(path)?);
        let stored = self.entries.len() - usize::from(self.working);
        for entry in self.entries.iter().take(stored) {
            writer.write_all(entry.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn history(lines: &[&str]) -> History {
        let mut hist = History::new(10);
        for line in lines {
            hist.push(line);
        }
        hist
    }

    fn entries(hist: &History) -> Vec<&str> {
        hist.iter().collect()
    }

    #[test]
    fn test_history_circular_buffer() {
        let mut hist = History::new(3);
        for line in ["a", "b", "c", "d"] {
            hist.push(line);
        }
        assert_eq!(entries(&hist), ["b", "c", "d"]);
        assert_eq!(hist.pos(), 2);
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let mut hist = History::new(5);
        for i in 0..6 {
            hist.push(&i.to_string());
            assert!(hist.len() <= 5);
        }
        assert_eq!(entries(&hist), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_zero_capacity_means_one() {
        let mut hist = History::new(0);
        hist.push("a");
        hist.push("b");
        assert_eq!(entries(&hist), ["b"]);
    }

    #[test]
    fn test_history_skip_empty_and_duplicates() {
        let mut hist = History::new(10);
        assert!(hist.add("test"));
        assert!(!hist.add("test"));
        assert!(!hist.add(""));
        assert!(hist.add("other"));
        assert!(hist.add("test"));
        assert_eq!(entries(&hist), ["test", "other", "test"]);
    }

    #[test]
    fn test_working_entry_does_not_evict() {
        let mut hist = History::new(2);
        hist.push("a");
        hist.push("b");
        hist.begin_working();
        assert_eq!(entries(&hist), ["a", "b", ""]);
        assert_eq!(hist.current(), Some(""));

        hist.push("c");
        assert_eq!(entries(&hist), ["b", "c", ""]);

        hist.end_working();
        assert_eq!(entries(&hist), ["b", "c"]);
        assert_eq!(hist.pos(), 1);
    }

    #[test]
    fn test_history_navigation() {
        let mut hist = history(&["first", "second", "third"]);
        assert_eq!(hist.step(Direction::Newer), None);
        assert_eq!(hist.step(Direction::Older), Some("second"));
        assert_eq!(hist.step(Direction::Older), Some("first"));
        assert_eq!(hist.step(Direction::Older), None);
        assert_eq!(hist.pos(), 0);
        assert_eq!(hist.step(Direction::Newer), Some("second"));
    }

    #[test]
    fn test_navigate_with_count_is_all_or_nothing() {
        let mut hist = history(&["a", "b", "c", "d"]);
        assert_eq!(hist.navigate(Direction::Older, 2), Some("b"));
        assert_eq!(hist.navigate(Direction::Older, 5), None);
        assert_eq!(hist.pos(), 1);
        assert_eq!(hist.navigate(Direction::Newer, 0), Some("c"));
    }

    #[test]
    fn test_first_and_last() {
        let mut hist = history(&["a", "b", "c"]);
        assert_eq!(hist.first(), Some("a"));
        assert_eq!(hist.last_entry(), Some("c"));
        assert_eq!(History::new(4).first(), None);
    }

    #[test]
    fn test_search_substring() {
        let mut hist = history(&["make foo", "ls", "cat foo.txt", "pwd"]);
        assert_eq!(hist.search("foo", Direction::Older), Some("cat foo.txt"));
        assert_eq!(hist.search("foo", Direction::Older), Some("make foo"));
        assert_eq!(hist.search("foo", Direction::Older), None);
        assert_eq!(hist.pos(), 0);
    }

    #[test]
    fn test_search_anchored() {
        let mut hist = history(&["foobar", "barfoo", "x"]);
        assert_eq!(hist.search("^foo", Direction::Older), Some("foobar"));

        let mut hist = history(&["barfoo", "x"]);
        assert_eq!(hist.search("^foo", Direction::Older), None);
        assert_eq!(hist.pos(), 1);
    }

    #[test]
    fn test_search_reuses_last_pattern() {
        let mut hist = history(&["git log", "git push", "ls"]);
        assert_eq!(hist.search("", Direction::Older), None);
        assert_eq!(hist.search("git", Direction::Older), Some("git push"));
        assert_eq!(hist.search("", Direction::Older), Some("git log"));
        assert_eq!(hist.last_search(), Some("git"));
    }

    #[test]
    fn test_search_forward_does_not_wrap() {
        let mut hist = history(&["abc", "x", "abd"]);
        hist.first();
        assert_eq!(hist.search("ab", Direction::Newer), Some("abd"));
        assert_eq!(hist.search("ab", Direction::Newer), None);
        assert_eq!(hist.pos(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut hist = history(&["one", "two words", "three"]);
        hist.begin_working();
        hist.save(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "one\ntwo words\nthree\n"
        );

        let mut loaded = History::new(2);
        assert_eq!(loaded.load(&path).unwrap(), 3);
        assert_eq!(entries(&loaded), ["two words", "three"]);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut hist = History::new(2);
        assert!(hist.load(dir.path().join("missing")).is_err());
    }
}
