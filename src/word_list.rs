//! This module implements loading and interning of the vocabulary used to fill a grid. Words are
//! bucketed by length, so a slot of length `n` only ever considers the words in bucket `n`, and
//! their letters are interned as `GlyphId`s so that the solver can compare letters by index
//! instead of by `char`.

use smallvec::{smallvec, SmallVec};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fmt::Debug;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::{fmt, fs};
use unicode_normalization::UnicodeNormalization;

use crate::types::{GlobalWordId, GlyphId, WordId};
use crate::{MAX_GLYPH_COUNT, MAX_SLOT_LENGTH};

/// A struct representing a word in the word list.
#[derive(Debug, Clone)]
pub struct Word {
    /// The word as it would appear in a grid -- only lowercase letters or other valid glyphs.
    pub normalized_string: String,

    /// The word as it appears in the user's word list, with arbitrary formatting.
    pub canonical_string: String,

    /// The glyph ids making up `normalized_string`.
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

/// Given a canonical word string from a word list, turn it into the normalized form we'll use in
/// the actual solver.
#[must_use]
pub fn normalize_word(canonical: &str) -> String {
    canonical
        .to_lowercase()
        .nfc() // Normalize Unicode combining forms
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[derive(Debug, Clone)]
pub enum WordListError {
    InvalidPath(String),
    InvalidWord(String),
}

impl fmt::Display for WordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            WordListError::InvalidPath(path) => format!("Can’t read file: “{path}”"),
            WordListError::InvalidWord(word) => {
                format!("Word list contains invalid word: “{word}”")
            }
        };
        write!(f, "{string}")
    }
}

/// Configuration describing a source of word list entries.
pub enum WordListSourceConfig {
    Memory { words: Vec<String> },
    File { path: OsString },
    FileContents { contents: &'static str },
}

/// A single word list entry.
struct RawWordListEntry {
    pub length: usize,
    pub normalized: String,
    pub canonical: String,
}

fn parse_word_list_file_contents(
    file_contents: &str,
) -> Result<Vec<RawWordListEntry>, WordListError> {
    let mut entries = vec![];

    for line in file_contents.lines() {
        let canonical = line.trim();
        if canonical.is_empty() {
            continue;
        }

        let normalized = normalize_word(canonical);
        if normalized.is_empty() {
            return Err(WordListError::InvalidWord(canonical.into()));
        }

        entries.push(RawWordListEntry {
            length: normalized.chars().count(),
            normalized,
            canonical: canonical.to_string(),
        });
    }

    Ok(entries)
}

fn load_words_from_source(
    source: &WordListSourceConfig,
) -> Result<Vec<RawWordListEntry>, WordListError> {
    match source {
        WordListSourceConfig::Memory { words } => words
            .iter()
            .map(|canonical| {
                let normalized = normalize_word(canonical);
                if normalized.is_empty() {
                    return Err(WordListError::InvalidWord(canonical.clone()));
                }

                Ok(RawWordListEntry {
                    length: normalized.chars().count(),
                    normalized,
                    canonical: canonical.clone(),
                })
            })
            .collect(),

        WordListSourceConfig::File { path } => {
            let contents = fs::read_to_string(path)
                .map_err(|_| WordListError::InvalidPath(path.to_string_lossy().into()))?;
            parse_word_list_file_contents(&contents)
        }

        WordListSourceConfig::FileContents { contents } => {
            parse_word_list_file_contents(contents)
        }
    }
}

/// Load the entries of all of the given sources, in order. If the same normalized word occurs
/// more than once, the first occurrence wins.
fn load_words_from_sources(
    sources: &[WordListSourceConfig],
) -> Result<Vec<RawWordListEntry>, WordListError> {
    fn hash_str(str: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        str.hash(&mut hasher);
        hasher.finish()
    }

    let mut seen_words: HashSet<u64> = HashSet::new();
    let mut result = vec![];

    for source in sources {
        for word in load_words_from_source(source)? {
            let hash = hash_str(&word.normalized);
            if seen_words.contains(&hash) {
                continue;
            }
            result.push(word);
            seen_words.insert(hash);
        }
    }

    Ok(result)
}

/// A struct representing the loaded word list(s). This is static regardless of grid geometry or
/// our progress through a solve (although we do configure a `max_length` that depends on the size
/// of the grid, since it helps performance to avoid loading words that are too long to be usable).
pub struct WordList {
    /// A list of all characters that occur in any (normalized) word. `GlyphId`s used everywhere
    /// else are indices into this list.
    pub glyphs: SmallVec<[char; MAX_GLYPH_COUNT]>,

    /// The inverse of `glyphs`: a map from a character to the `GlyphId` representing it.
    pub glyph_id_by_char: HashMap<char, GlyphId>,

    /// A list of all loaded words, bucketed by length. An index into `words` is the length of the
    /// words in the bucket, so `words[0]` is always an empty vec.
    pub words: Vec<Vec<Word>>,

    /// A map from a normalized string to the id of the Word representing it.
    pub word_id_by_string: HashMap<String, WordId>,

    /// The maximum word length provided when configuring the `WordList`, if any.
    pub max_length: Option<usize>,
}

impl WordList {
    /// Construct a new `WordList` using the given sources, omitting any entries that are longer
    /// than `max_length`.
    pub fn new(
        sources: &[WordListSourceConfig],
        max_length: Option<usize>,
    ) -> Result<WordList, WordListError> {
        let mut instance = WordList {
            glyphs: smallvec![],
            glyph_id_by_char: HashMap::new(),
            words: vec![vec![]],
            word_id_by_string: HashMap::new(),
            max_length,
        };

        // Make sure every bucket up to `max_length` exists, even if it ends up empty.
        if let Some(max_length) = max_length {
            while instance.words.len() < max_length + 1 {
                instance.words.push(vec![]);
            }
        }

        for raw_entry in load_words_from_sources(sources)? {
            if max_length.map_or(false, |max_length| raw_entry.length > max_length) {
                continue;
            }
            instance.add_word(&raw_entry);
        }

        Ok(instance)
    }

    /// Borrow an existing word using its global id.
    #[must_use]
    pub fn get_word(&self, global_word_id: GlobalWordId) -> &Word {
        &self.words[global_word_id.0][global_word_id.1]
    }

    /// Add the given word to the list. The word must not be part of the list yet.
    fn add_word(&mut self, raw_entry: &RawWordListEntry) {
        let glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]> = raw_entry
            .normalized
            .chars()
            .map(|c| self.glyph_id_for_char(c))
            .collect();

        let word_length = glyphs.len();

        while self.words.len() < word_length + 1 {
            self.words.push(vec![]);
        }

        let word_id = self.words[word_length].len();

        self.words[word_length].push(Word {
            normalized_string: raw_entry.normalized.clone(),
            canonical_string: raw_entry.canonical.clone(),
            glyphs,
        });

        self.word_id_by_string
            .insert(raw_entry.normalized.clone(), word_id);
    }

    /// What's the unique glyph id for the given char? We do this lazily, instead of just mapping
    /// every letter up front, because word list entries may also contain numbers, non-English
    /// letters, or punctuation.
    pub fn glyph_id_for_char(&mut self, ch: char) -> GlyphId {
        self.glyph_id_by_char.get(&ch).copied().unwrap_or_else(|| {
            self.glyphs.push(ch);
            let id = self.glyphs.len() - 1;
            self.glyph_id_by_char.insert(ch, id);
            id
        })
    }
}

impl Debug for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordList")
            .field("glyphs", &self.glyphs)
            .field(
                "words",
                &self.words.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub mod tests {
    use crate::word_list::{normalize_word, WordList, WordListError, WordListSourceConfig};
    use std::path;
    use std::path::PathBuf;

    #[must_use]
    pub fn dictionary_path() -> PathBuf {
        let mut path = path::PathBuf::from(file!());
        path.pop();
        path.pop();
        path.push("resources");
        path.push("wordlist.txt");
        path
    }

    #[must_use]
    pub fn word_list_source_config() -> Vec<WordListSourceConfig> {
        vec![WordListSourceConfig::File {
            path: dictionary_path().into(),
        }]
    }

    #[test]
    fn test_loads_words_up_to_max_length() {
        let word_list = WordList::new(&word_list_source_config(), Some(3)).unwrap();

        assert_eq!(word_list.max_length, Some(3));
        assert_eq!(word_list.words.len(), 4);

        let &word_id = word_list
            .word_id_by_string
            .get("cat")
            .expect("word list should include 'cat'");

        let word = &word_list.words[3][word_id];
        assert_eq!(word.normalized_string, "cat");
        assert_eq!(word.canonical_string, "cat");
        assert_eq!(word.glyphs.len(), 3);

        assert!(word_list.word_id_by_string.get("acre").is_none());
    }

    #[test]
    fn test_loads_full_list_without_max_length() {
        let word_list = WordList::new(&word_list_source_config(), None).unwrap();

        assert!(word_list.word_id_by_string.get("acre").is_some());
        assert!(word_list.word_id_by_string.get("lantern").is_some());
        assert!(word_list.words.len() >= 8);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_word("CAT"), "cat");
        assert_eq!(normalize_word("a la carte"), "alacarte");
        assert_eq!(normalize_word("  stop  "), "stop");
    }

    #[test]
    fn test_unusual_characters() {
        let word_list = WordList::new(
            &[WordListSourceConfig::Memory {
                words: vec![
                    // Accented letter as a single precomposed `char`
                    "café".into(),
                    // Accented letter as a base char plus a combining mark, which NFC collapses
                    "nai\u{308}ve".into(),
                ],
            }],
            None,
        )
        .unwrap();

        assert_eq!(
            word_list.words.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![0, 0, 0, 0, 1, 1]
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let word_list = WordList::new(
            &[WordListSourceConfig::FileContents {
                contents: "cat\n\n   \ndog\n",
            }],
            None,
        )
        .unwrap();

        assert_eq!(word_list.words[3].len(), 2);
    }

    #[test]
    fn test_invalid_word_is_rejected() {
        let result = WordList::new(
            &[WordListSourceConfig::Memory {
                words: vec!["   ".into()],
            }],
            None,
        );

        assert!(matches!(result, Err(WordListError::InvalidWord(_))));
    }

    #[test]
    fn test_invalid_path_is_rejected() {
        let result = WordList::new(
            &[WordListSourceConfig::File {
                path: "nonexistent-wordlist.txt".into(),
            }],
            None,
        );

        assert!(matches!(result, Err(WordListError::InvalidPath(_))));
    }

    #[test]
    fn test_first_source_wins_for_duplicates() {
        let word_list = WordList::new(
            &[
                WordListSourceConfig::Memory {
                    words: vec!["CAT".into()],
                },
                WordListSourceConfig::Memory {
                    words: vec!["cat".into(), "dog".into()],
                },
            ],
            None,
        )
        .unwrap();

        assert_eq!(word_list.words[3].len(), 2);

        let &cat_id = word_list.word_id_by_string.get("cat").unwrap();
        assert_eq!(word_list.words[3][cat_id].canonical_string, "CAT");
        assert!(word_list.word_id_by_string.get("dog").is_some());
    }
}
