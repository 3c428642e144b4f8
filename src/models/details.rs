use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Ad requests made for a VOD session's ad tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VodAdTagDetail {
    /// `.../vodSessions/{vod_session}/vodAdTagDetails/{id}`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ad_requests: Vec<AdRequest>,
}

/// Ad requests made for a live session's ad tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAdTagDetail {
    /// `.../liveSessions/{live_session}/liveAdTagDetails/{id}`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ad_requests: Vec<AdRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRequest {
    /// The ad tag URI after macro substitution.
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_metadata: Option<RequestMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    /// HTTP headers of the ad request.
    #[serde(default)]
    pub headers: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Error message received when making the ad request, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default)]
    pub headers: serde_json::Value,
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub size_bytes: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub body: String,
}

/// How each ad of a VOD session was stitched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VodStitchDetail {
    /// `.../vodSessions/{vod_session}/vodStitchDetails/{id}`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ad_stitch_details: Vec<AdStitchDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdStitchDetail {
    #[serde(default)]
    pub ad_break_id: String,
    #[serde(default)]
    pub ad_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_time_offset: Option<String>,
    /// Why the ad was skipped, if it was.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub skip_reason: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub media: HashMap<String, serde_json::Value>,
}
