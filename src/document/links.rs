use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Links

/// A `links` object, at the document, resource, or relationship level.
///
/// Carries the standard link set; absent members are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// `"self"`: the link that generated the enclosing object.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    /// A related-resource link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl Links {
    /// A links object with only `self` set.
    pub fn self_only(self_link: impl Into<String>) -> Self {
        Self {
            self_link: Some(self_link.into()),
            ..Self::default()
        }
    }
}
