//! Dotted field paths used to locate violations.

use std::fmt;

use serde::Serialize;

/// Location of a field inside a payload, e.g. `documents[2].history[0].user.email`.
///
/// The root path is empty; [`FieldPath::child`] and [`FieldPath::index`]
/// append segments.
///
/// # Examples
/// ```
/// use kb_schemas::FieldPath;
///
/// let path = FieldPath::root().child("documents").index(2).child("question");
/// assert_eq!(path.as_str(), "documents[2].question");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The empty path addressing the payload itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Path of a named member of the record at `self`.
    ///
    /// A member name that itself contains a dot is quoted in brackets, so
    /// `userPayload.studentId` renders as `["userPayload.studentId"]`.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        if name.contains('.') {
            Self(format!("{}[\"{name}\"]", self.0))
        } else if self.0.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    /// Path of the `index`-th item of the list at `self`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// `true` for the payload root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the rendered path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn child_of_root_has_no_leading_dot() {
        assert_eq!(FieldPath::root().child("name").as_str(), "name");
    }

    #[rstest]
    fn nested_segments_compose() {
        let path = FieldPath::root()
            .child("payload")
            .index(0)
            .child("channelUser")
            .child("fullName");
        assert_eq!(path.as_str(), "payload[0].channelUser.fullName");
    }

    #[rstest]
    #[case(FieldPath::root(), "[\"userPayload.studentId\"]")]
    #[case(FieldPath::root().child("filter").index(0), "filter[0][\"userPayload.studentId\"]")]
    fn dotted_member_names_are_quoted(#[case] parent: FieldPath, #[case] expected: &str) {
        assert_eq!(parent.child("userPayload.studentId").as_str(), expected);
    }

    #[rstest]
    fn root_displays_placeholder() {
        assert_eq!(FieldPath::root().to_string(), "<root>");
        assert!(FieldPath::root().is_root());
    }
}
