//! Syntax profiles and filename-based lookup.

use super::Highlight;
use bitflags::bitflags;
use std::collections::HashMap;
use std::sync::Arc;

bitflags! {
    /// Optional highlighting passes a profile enables.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SyntaxFlags: u8 {
        /// Highlight single and double quoted strings.
        const STRINGS = 0b01;
        /// Highlight numeric literals.
        const NUMBERS = 0b10;
    }
}

impl Default for SyntaxFlags {
    fn default() -> Self {
        Self::STRINGS | Self::NUMBERS
    }
}

/// A keyword and the class it highlights as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyword {
    text: Box<[u8]>,
    class: Highlight,
}

impl Keyword {
    /// Parse a table entry. A trailing `|` selects [`Highlight::Keyword2`].
    #[must_use]
    pub fn parse(entry: &str) -> Self {
        match entry.strip_suffix('|') {
            Some(text) => Self {
                text: text.as_bytes().into(),
                class: Highlight::Keyword2,
            },
            None => Self {
                text: entry.as_bytes().into(),
                class: Highlight::Keyword1,
            },
        }
    }

    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    #[must_use]
    pub fn class(&self) -> Highlight {
        self.class
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Highlighting rules for one language.
#[derive(Clone, Debug, Default)]
pub struct Syntax {
    name: String,
    filematch: Vec<String>,
    /// Longest first; equal lengths keep table order.
    keywords: Vec<Keyword>,
    singleline_comment_start: Vec<u8>,
    multiline_comment_start: Vec<u8>,
    multiline_comment_end: Vec<u8>,
    flags: SyntaxFlags,
}

impl Syntax {
    /// Empty profile: no keywords, no comment markers, default flags.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Built-in C / C++ profile.
    #[must_use]
    pub fn c() -> Self {
        Self::new("C")
            .with_filematch(C_EXTENSIONS)
            .with_keywords(C_KEYWORDS)
            .with_singleline_comment("//")
            .with_multiline_comment("/*", "*/")
            .with_flags(SyntaxFlags::STRINGS | SyntaxFlags::NUMBERS)
    }

    /// Filename patterns. A pattern starting with `.` must end the name;
    /// any other pattern may appear anywhere in it.
    #[must_use]
    pub fn with_filematch<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.filematch = patterns.iter().map(|p| p.as_ref().to_owned()).collect();
        self
    }

    /// Keyword table, see [`Keyword::parse`]. Empty entries are ignored.
    #[must_use]
    pub fn with_keywords<S: AsRef<str>>(mut self, entries: &[S]) -> Self {
        let mut keywords: Vec<Keyword> = entries
            .iter()
            .map(|entry| Keyword::parse(entry.as_ref()))
            .filter(|keyword| !keyword.is_empty())
            .collect();
        // Stable sort keeps table order among equal lengths.
        keywords.sort_by(|a, b| b.len().cmp(&a.len()));
        self.keywords = keywords;
        self
    }

    /// Marker that comments out the rest of a row. Empty disables it.
    #[must_use]
    pub fn with_singleline_comment(mut self, start: &str) -> Self {
        self.singleline_comment_start = start.as_bytes().to_vec();
        self
    }

    /// Block comment markers. Either one empty disables block comments.
    #[must_use]
    pub fn with_multiline_comment(mut self, start: &str, end: &str) -> Self {
        self.multiline_comment_start = start.as_bytes().to_vec();
        self.multiline_comment_end = end.as_bytes().to_vec();
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SyntaxFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn filematch(&self) -> &[String] {
        &self.filematch
    }

    #[must_use]
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    #[must_use]
    pub fn flags(&self) -> SyntaxFlags {
        self.flags
    }

    #[must_use]
    pub fn singleline_comment_start(&self) -> &[u8] {
        &self.singleline_comment_start
    }

    #[must_use]
    pub fn multiline_comment_start(&self) -> &[u8] {
        &self.multiline_comment_start
    }

    #[must_use]
    pub fn multiline_comment_end(&self) -> &[u8] {
        &self.multiline_comment_end
    }

    pub(crate) fn has_multiline_comments(&self) -> bool {
        !self.multiline_comment_start.is_empty() && !self.multiline_comment_end.is_empty()
    }

    /// Whether this profile claims `filename`.
    #[must_use]
    pub fn matches_filename(&self, filename: &str) -> bool {
        self.filematch.iter().any(|pattern| {
            if pattern.is_empty() {
                false
            } else if pattern.starts_with('.') {
                filename.ends_with(pattern.as_str())
            } else {
                filename.contains(pattern.as_str())
            }
        })
    }

    /// Keyword starting at the front of `text`, if one is followed by a
    /// separator or the end of `text`.
    #[must_use]
    pub fn keyword_at(&self, text: &[u8]) -> Option<&Keyword> {
        self.keywords.iter().find(|keyword| {
            text.starts_with(keyword.text())
                && text
                    .get(keyword.len())
                    .is_none_or(|&next| super::is_separator(next))
        })
    }
}

const C_EXTENSIONS: &[&str] = &[".c", ".h", ".cpp", ".hpp", ".cc"];

const C_KEYWORDS: &[&str] = &[
    // C
    "auto", "break", "case", "continue", "default", "do", "else", "enum", "extern", "for", "goto",
    "if", "register", "return", "sizeof", "static", "struct", "switch", "typedef", "union",
    "volatile", "while", "NULL",
    // C++
    "alignas", "alignof", "and", "and_eq", "asm", "bitand", "bitor", "class", "compl",
    "constexpr", "const_cast", "deltype", "delete", "dynamic_cast", "explicit", "export", "false",
    "friend", "inline", "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr",
    "operator", "or", "or_eq", "private", "protected", "public", "reinterpret_cast",
    "static_assert", "static_cast", "template", "this", "thread_local", "throw", "true", "try",
    "typeid", "typename", "virtual", "xor", "xor_eq",
    // types
    "int|", "long|", "double|", "float|", "char|", "unsigned|", "signed|", "void|", "short|",
    "auto|", "const|", "bool|",
];

/// Registry for syntax lookup by filename or name.
#[derive(Default)]
pub struct SyntaxRegistry {
    profiles: Vec<Arc<Syntax>>,
    by_name: HashMap<String, usize>,
}

impl SyntaxRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile. Filename lookup tries profiles in registration
    /// order; a later profile with the same name overrides name lookup.
    pub fn register(&mut self, syntax: Syntax) {
        let index = self.profiles.len();
        self.by_name.insert(syntax.name().to_ascii_lowercase(), index);
        self.profiles.push(Arc::new(syntax));
    }

    /// First profile whose patterns claim `filename`.
    #[must_use]
    pub fn for_filename(&self, filename: &str) -> Option<Arc<Syntax>> {
        self.profiles
            .iter()
            .find(|syntax| syntax.matches_filename(filename))
            .cloned()
    }

    /// Profile by name (case-insensitive).
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<Syntax>> {
        let index = self.by_name.get(&name.to_ascii_lowercase())?;
        self.profiles.get(*index).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Create registry with all built-in profiles.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Syntax::c());
        registry
    }
}
