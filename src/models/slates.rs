use serde::{Deserialize, Serialize};

/// Fallback media shown when no ad is available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slate {
    /// Output only. `projects/{project}/locations/{location}/slates/{id}`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// MP4 video with at least one audio track.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,

    /// Set when the slate is served from Google Ad Manager.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gam_slate: Option<GamSlate>,
}

impl Slate {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamSlate {
    #[serde(default)]
    pub network_code: String,

    /// Output only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gam_slate_id: String,
}
