//! Update decisions.

use strum::{AsRefStr, Display};

/// When an object with a known extension gets its content-type rewritten.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum UpdatePolicy {
    /// Rewrite only when the stored value differs (ignoring ASCII case).
    #[default]
    CompareThenUpdate,
    /// Rewrite every object whose extension is mapped.
    Always,
}

/// What to do with one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No mapping for the extension.
    Unknown,
    /// Stored value already matches the resolved type.
    Unchanged(String),
    /// Rewrite with the resolved type.
    Update(String),
}

impl UpdatePolicy {
    /// Decides for an object currently storing `current` whose extension
    /// resolved to `resolved`.
    pub fn decide(self, current: Option<&str>, resolved: Option<String>) -> Decision {
        let Some(resolved) = resolved else {
            return Decision::Unknown;
        };

        match self {
            Self::CompareThenUpdate
                if current.is_some_and(|current| current.eq_ignore_ascii_case(&resolved)) =>
            {
                Decision::Unchanged(resolved)
            }
            _ => Decision::Update(resolved),
        }
    }
}
