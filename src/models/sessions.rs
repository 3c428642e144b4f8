use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::AdTracking;

/// A VOD session. Sessions expire four hours after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VodSession {
    /// Output only. `projects/{project}/locations/{location}/vodSessions/{id}`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Output only. What was stitched into the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interstitials: Option<Interstitials>,

    /// Output only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub play_uri: String,

    /// Required. URI of the media to stitch.
    #[serde(default)]
    pub source_uri: String,

    /// Required.
    #[serde(default)]
    pub ad_tag_uri: String,

    /// Replacement values for `[macro]` placeholders in the ad tag URI.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub ad_tag_macro_map: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_options: Option<ManifestOptions>,

    /// Output only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub asset_id: String,

    /// Required. Must be `Client` when GAM settings are present.
    #[serde(default)]
    pub ad_tracking: AdTracking,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gam_settings: Option<VodGamSettings>,
}

/// Google Ad Manager settings for a VOD session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VodGamSettings {
    #[serde(default)]
    pub network_code: String,
    #[serde(default)]
    pub stream_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interstitials {
    /// Ordered by time.
    #[serde(default)]
    pub ad_breaks: Vec<VodSessionAdBreak>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_content: Option<VodSessionContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VodSessionAd {
    /// e.g. `"15s"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion_ads: Option<serde_json::Value>,
    #[serde(default)]
    pub activity_events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VodSessionContent {
    /// Total duration including stitched ads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VodSessionAdBreak {
    #[serde(default)]
    pub progress_events: Vec<ProgressEvent>,
    #[serde(default)]
    pub ads: Vec<VodSessionAd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_offset: Option<String>,
}

/// An IAB tracking event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// e.g. `"START"`, `"CLICK_THROUGH"`.
    #[serde(default, rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A live session. Expires five minutes after the player stops fetching playlists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSession {
    /// Output only. `projects/{project}/locations/{location}/liveSessions/{id}`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Output only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub play_uri: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub ad_tag_macros: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_options: Option<ManifestOptions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gam_settings: Option<LiveGamSettings>,

    /// Required. `projects/{project}/locations/{location}/liveConfigs/{id}`.
    #[serde(default)]
    pub live_config: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGamSettings {
    #[serde(default)]
    pub stream_id: String,
}

/// Options that affect the generated manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestOptions {
    /// Only renditions matching one of these filters are returned.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_renditions: Vec<RenditionFilter>,
    #[serde(default)]
    pub bitrate_order: OrderPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPolicy {
    #[default]
    #[serde(rename = "ORDER_POLICY_UNSPECIFIED")]
    Unspecified,
    Ascending,
    Descending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenditionFilter {
    /// Exact bitrate match, in bits per second.
    #[serde(default)]
    pub bitrate_bps: i32,
    /// Exact codecs match.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub codecs: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vod_session_request_body_shape() {
        let mut session = VodSession {
            source_uri: "https://storage.googleapis.com/bucket/hls-vod/manifest.m3u8".into(),
            ad_tag_uri: "https://ads.example.com/vast?geo_id=[geoId]".into(),
            ad_tracking: AdTracking::Server,
            ..Default::default()
        };
        session.ad_tag_macro_map.insert("geoId".into(), "123".into());

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["adTracking"], "SERVER");
        assert_eq!(value["adTagMacroMap"]["geoId"], "123");
        assert!(value.get("name").is_none());
        assert!(value.get("playUri").is_none());
    }

    #[test]
    fn interstitials_decode_in_order() {
        let session: VodSession = serde_json::from_value(json!({
            "name": "projects/p/locations/l/vodSessions/s",
            "playUri": "https://play.example.com/s.m3u8",
            "interstitials": {
                "adBreaks": [
                    { "startTimeOffset": "0s", "ads": [{ "duration": "15s" }] },
                    { "startTimeOffset": "60s", "ads": [] }
                ],
                "sessionContent": { "duration": "75s" }
            },
            "manifestOptions": { "bitrateOrder": "DESCENDING" }
        }))
        .unwrap();

        let breaks = &session.interstitials.as_ref().unwrap().ad_breaks;
        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[0].ads[0].duration.as_deref(), Some("15s"));
        assert_eq!(breaks[1].start_time_offset.as_deref(), Some("60s"));
        assert_eq!(
            session.manifest_options.unwrap().bitrate_order,
            OrderPolicy::Descending
        );
        assert_eq!(session.ad_tracking, AdTracking::Unspecified);
    }

    #[test]
    fn unrecognised_bitrate_order_decodes_as_unknown() {
        let options: ManifestOptions =
            serde_json::from_value(json!({ "bitrateOrder": "BY_RESOLUTION" })).unwrap();
        assert_eq!(options.bitrate_order, OrderPolicy::Unknown);
    }
}
