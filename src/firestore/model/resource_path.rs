use std::fmt::{Display, Formatter};

/// Slash-delimited path below a database's `documents` root.
///
/// Empty segments are dropped on parse, so `"/users//u1/"` and `"users/u1"` are the same
/// path. Segments alternate collection id / document id, which makes a path with an even,
/// non-zero number of segments a document path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(path: &str) -> Self {
        Self::from_segments(path.split('/').filter(|segment| !segment.is_empty()))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_document(&self) -> bool {
        !self.segments.is_empty() && self.segments.len() % 2 == 0
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    pub fn without_last(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    pub fn canonical_string(&self) -> String {
        self.segments.join("/")
    }

    /// Splits into `(collection_path, leaf_id)`.
    ///
    /// The last segment is peeled off as the leaf only when it is the kind of id the
    /// caller asked for: a document id when `is_document_requested`, a collection id
    /// otherwise. In every other case the leaf is empty and the whole path is returned
    /// as the collection path.
    pub fn split(&self, is_document_requested: bool) -> (String, String) {
        let peel_leaf = if is_document_requested {
            self.is_document()
        } else {
            !self.is_empty() && !self.is_document()
        };
        if !peel_leaf {
            return (self.canonical_string(), String::new());
        }
        let parent = self.without_last().canonical_string();
        let leaf = self.last_segment().unwrap_or_default().to_string();
        (parent, leaf)
    }
}

impl Display for ResourcePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}

/// Splits `path` into `(collection_path, leaf_id)`; see [`ResourcePath::split`].
pub fn split_path(path: &str, is_document_requested: bool) -> (String, String) {
    ResourcePath::parse(path).split(is_document_requested)
}

/// `(parent_path, collection_id)` when `path` ends in a collection id.
pub fn collection_from_path(path: &str) -> (String, String) {
    split_path(path, false)
}

/// `(collection_path, document_id)` when `path` ends in a document id.
pub fn document_from_path(path: &str) -> (String, String) {
    split_path(path, true)
}
