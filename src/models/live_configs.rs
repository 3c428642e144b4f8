use serde::{Deserialize, Serialize};

/// Determines how ads are tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdTracking {
    #[default]
    #[serde(rename = "AD_TRACKING_UNSPECIFIED")]
    Unspecified,
    /// The player SDK fires the tracking beacons.
    Client,
    /// The stitcher fires the tracking beacons.
    Server,
    /// A value added to the service after this client was built.
    #[serde(other)]
    Unknown,
}

/// Configuration shared by the live sessions created from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveConfig {
    /// Output only. `projects/{project}/locations/{location}/liveConfigs/{id}`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Required. Source URI of the live stream manifest.
    #[serde(default)]
    pub source_uri: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ad_tag_uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gam_live_config: Option<GamLiveConfig>,

    /// Output only.
    #[serde(default)]
    pub state: LiveConfigState,

    /// Required.
    #[serde(default)]
    pub ad_tracking: AdTracking,

    /// Slate resource name shown when no ad is available.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_slate: String,

    #[serde(default)]
    pub stitching_policy: StitchingPolicy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetch_config: Option<PrefetchConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamLiveConfig {
    #[serde(default)]
    pub network_code: String,
    /// Output only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub asset_key: String,
    /// Output only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_asset_key: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiveConfigState {
    #[default]
    #[serde(rename = "STATE_UNSPECIFIED")]
    Unspecified,
    Creating,
    Ready,
    Deleting,
    #[serde(other)]
    Unknown,
}

/// What happens to ads that run past the break they were inserted into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StitchingPolicy {
    #[default]
    #[serde(rename = "STITCHING_POLICY_UNSPECIFIED")]
    Unspecified,
    CutCurrent,
    CompleteAd,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefetchConfig {
    /// Required.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_ad_request_duration: Option<String>,
}
