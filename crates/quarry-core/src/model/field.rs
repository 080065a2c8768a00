///
/// FieldModel
/// Per-member mapping metadata.
///

#[derive(Debug, Eq, PartialEq)]
pub struct FieldModel {
    /// Rust member name.
    pub name: &'static str,
    /// Declared column annotation, if any.
    pub column: Option<&'static str>,
    /// Member is never bound from a column.
    pub ignored: bool,
}

impl FieldModel {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            ignored: false,
        }
    }

    #[must_use]
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    #[must_use]
    pub const fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Column annotation with surrounding whitespace removed.
    #[must_use]
    pub fn annotation(&self) -> Option<&'static str> {
        self.column.map(str::trim)
    }

    /// True when the member carries any mapping annotation.
    #[must_use]
    pub const fn is_annotated(&self) -> bool {
        self.column.is_some() || self.ignored
    }
}
