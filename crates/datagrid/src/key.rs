//! Addressing rows and columns.

/// A row or column address: a positional key or a label.
///
/// Most grid methods take `impl Into<KeyRef>`, so both `3` and `"visits"`
/// work as arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyRef {
    /// 0-based position on the axis.
    Key(usize),
    /// Label attached to a position.
    Label(String),
}

impl From<usize> for KeyRef {
    fn from(key: usize) -> Self {
        KeyRef::Key(key)
    }
}

impl From<&str> for KeyRef {
    fn from(label: &str) -> Self {
        KeyRef::Label(label.to_string())
    }
}

impl From<String> for KeyRef {
    fn from(label: String) -> Self {
        KeyRef::Label(label)
    }
}

impl From<&String> for KeyRef {
    fn from(label: &String) -> Self {
        KeyRef::Label(label.clone())
    }
}

impl std::fmt::Display for KeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyRef::Key(key) => write!(f, "{key}"),
            KeyRef::Label(label) => write!(f, "'{label}'"),
        }
    }
}
