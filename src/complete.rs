//! Completion protocol: the [`Completer`] trait, stock completers and word scanning.

use std::fmt;

/// Bytes that end a word when scanning back from the point.
pub const SEPS: &[u8] = b"\"#$&'()*:;<=>?[\\]^`{|}~\n\t ";

/// Text to insert for a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// What to add after the word. May be empty.
    pub text: String,
    /// `true` when the word now names exactly one candidate.
    pub unique: bool,
}

impl Completion {
    pub fn unique(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            unique: true,
        }
    }

    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            unique: false,
        }
    }
}

/// Source of completions for the word before the point.
///
/// Both methods receive the unescaped word. Returning `None` (or an empty completion)
/// from [`complete`](Self::complete) makes the editor fall back to listing
/// [`possibilities`](Self::possibilities).
pub trait Completer {
    /// Returns the text that extends `word`.
    fn complete(&mut self, word: &str) -> Option<Completion>;

    /// Returns every candidate for `word`, in display order.
    fn possibilities(&mut self, word: &str) -> Vec<String>;
}

type CompleteHook = Box<dyn FnMut(&str) -> Option<Completion>>;
type PossibilitiesHook = Box<dyn FnMut(&str) -> Vec<String>>;

/// A completer assembled from two closures, either of which may be swapped or removed.
///
/// # Examples
///
/// ```
/// use emacsline::{Completer, Completion, FnCompleter};
///
/// let mut completer = FnCompleter::new()
///     .with_complete_hook(|word: &str| (word == "he").then(|| Completion::unique("llo")));
/// assert_eq!(completer.complete("he"), Some(Completion::unique("llo")));
/// assert!(completer.possibilities("he").is_empty());
/// ```
#[derive(Default)]
pub struct FnCompleter {
    complete: Option<CompleteHook>,
    possibilities: Option<PossibilitiesHook>,
}

impl FnCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_complete_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str) -> Option<Completion> + 'static,
    {
        self.set_complete_hook(Some(Box::new(hook)));
        self
    }

    pub fn with_possibilities_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str) -> Vec<String> + 'static,
    {
        self.set_possibilities_hook(Some(Box::new(hook)));
        self
    }

    /// Replaces the single-completion hook; `None` disables it.
    pub fn set_complete_hook(&mut self, hook: Option<CompleteHook>) {
        self.complete = hook;
    }

    /// Replaces the list hook; `None` disables it.
    pub fn set_possibilities_hook(&mut self, hook: Option<PossibilitiesHook>) {
        self.possibilities = hook;
    }
}

impl fmt::Debug for FnCompleter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCompleter")
            .field("complete", &self.complete.is_some())
            .field("possibilities", &self.possibilities.is_some())
            .finish()
    }
}

impl Completer for FnCompleter {
    fn complete(&mut self, word: &str) -> Option<Completion> {
        self.complete.as_mut().and_then(|hook| hook(word))
    }

    fn possibilities(&mut self, word: &str) -> Vec<String> {
        self.possibilities
            .as_mut()
            .map(|hook| hook(word))
            .unwrap_or_default()
    }
}

/// Completes against a fixed list of words.
///
/// A single match completes to the rest of that word; several matches complete to
/// their common extension.
#[derive(Debug, Clone, Default)]
pub struct WordListCompleter {
    words: Vec<String>,
}

impl WordListCompleter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    fn matches<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.words.iter().filter(move |w| w.starts_with(word))
    }
}

impl Completer for WordListCompleter {
    fn complete(&mut self, word: &str) -> Option<Completion> {
        let matches: Vec<&str> = self.matches(word).map(String::as_str).collect();
        match matches.as_slice() {
            [] => None,
            [only] => Some(Completion::unique(&only[word.len()..])),
            many => common_extension(many, word.len()).map(Completion::partial),
        }
    }

    fn possibilities(&mut self, word: &str) -> Vec<String> {
        self.matches(word).cloned().collect()
    }
}

/// The longest run all `candidates` share after their first `len` bytes.
///
/// Returns `None` when they diverge immediately.
pub fn common_extension<S: AsRef<str>>(candidates: &[S], len: usize) -> Option<String> {
    let (first, rest) = candidates.split_first()?;
    let first = first.as_ref().as_bytes();
    let mut end = len;
    while end < first.len()
        && rest
            .iter()
            .all(|c| c.as_ref().as_bytes().get(end) == Some(&first[end]))
    {
        end += 1;
    }
    if end > len {
        Some(String::from_utf8_lossy(&first[len..end]).into_owned())
    } else {
        None
    }
}

/// Extracts the word ending at the end of `before_point`, with escapes removed.
///
/// Scans backwards until a byte in [`SEPS`]; a separator preceded by `\` does not end
/// the word.
pub fn find_word(before_point: &[u8]) -> Vec<u8> {
    let mut start = before_point.len();
    while start > 0 {
        start -= 1;
        if start > 0 && before_point[start - 1] == b'\\' {
            start -= 1;
        } else if SEPS.contains(&before_point[start]) {
            start += 1;
            break;
        }
    }

    let mut word = Vec::with_capacity(before_point.len() - start);
    let mut i = start;
    while i < before_point.len() {
        if before_point[i] == b'\\' {
            i += 1;
            if i == before_point.len() {
                break;
            }
        }
        word.push(before_point[i]);
        i += 1;
    }
    word
}

/// Escapes control bytes and separators in a completion before it is inserted.
///
/// The final byte of a unique completion is left alone, so a trailing space or `/`
/// added by the completer stays a real separator.
pub fn escape_completion(text: &[u8], unique: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for (i, &c) in text.iter().enumerate() {
        let last = i + 1 == text.len();
        if (c < b' ' || SEPS.contains(&c)) && (!unique || !last) {
            out.push(b'\\');
        }
        out.push(c);
    }
    out
}
