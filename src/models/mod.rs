//! Message records exchanged with the Video Stitcher service.
//!
//! Records follow the proto3 JSON mapping: lowerCamelCase field names,
//! enums as upper-case strings, `bytes` as base64 and durations as strings
//! such as `"15s"`.

mod cdn_keys;
mod details;
mod live_configs;
mod requests;
mod sessions;
mod slates;

pub use cdn_keys::{AkamaiCdnKey, CdnKey, CdnKeyConfig, GoogleCdnKey, MediaCdnKey};
pub use details::{
    AdRequest, AdStitchDetail, LiveAdTagDetail, RequestMetadata, ResponseMetadata,
    VodAdTagDetail, VodStitchDetail,
};
pub use live_configs::{
    AdTracking, GamLiveConfig, LiveConfig, LiveConfigState, PrefetchConfig, StitchingPolicy,
};
pub use requests::*;
pub use sessions::{
    Event, Interstitials, LiveGamSettings, LiveSession, ManifestOptions, OrderPolicy,
    ProgressEvent, RenditionFilter, VodGamSettings, VodSession, VodSessionAd, VodSessionAdBreak,
    VodSessionContent,
};
pub use slates::{GamSlate, Slate};

/// Serde adapter for `bytes` fields.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::{STANDARD, URL_SAFE};
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    /// Accepts both the standard and the URL-safe alphabet.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .or_else(|_| URL_SAFE.decode(encoded.as_bytes()))
            .map_err(serde::de::Error::custom)
    }
}
