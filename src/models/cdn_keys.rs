use serde::{Deserialize, Serialize};

use super::base64_bytes;

/// Configuration for a CDN key, used by the stitcher to sign URIs for
/// fetching manifests and media segments.
///
/// The CDN-specific configuration is a oneof: at most one of Google Cloud
/// CDN, Akamai or Media CDN can be set at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CdnKeyRepr", into = "CdnKeyRepr")]
pub struct CdnKey {
    /// `projects/{project}/locations/{location}/cdnKeys/{id}`. Ignored on create.
    pub name: String,
    /// The hostname this key applies to.
    pub hostname: String,
    pub config: Option<CdnKeyConfig>,
}

/// The `cdn_key_config` oneof.
#[derive(Debug, Clone, PartialEq)]
pub enum CdnKeyConfig {
    Google(GoogleCdnKey),
    Akamai(AkamaiCdnKey),
    Media(MediaCdnKey),
}

impl CdnKey {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    /// Replace the CDN configuration, clearing whichever member was set before.
    pub fn set_config(&mut self, config: CdnKeyConfig) -> &mut Self {
        self.config = Some(config);
        self
    }

    pub fn set_google_cdn_key(&mut self, key: GoogleCdnKey) -> &mut Self {
        self.set_config(CdnKeyConfig::Google(key))
    }

    pub fn set_akamai_cdn_key(&mut self, key: AkamaiCdnKey) -> &mut Self {
        self.set_config(CdnKeyConfig::Akamai(key))
    }

    pub fn set_media_cdn_key(&mut self, key: MediaCdnKey) -> &mut Self {
        self.set_config(CdnKeyConfig::Media(key))
    }

    pub fn google_cdn_key(&self) -> Option<&GoogleCdnKey> {
        match &self.config {
            Some(CdnKeyConfig::Google(key)) => Some(key),
            _ => None,
        }
    }

    pub fn akamai_cdn_key(&self) -> Option<&AkamaiCdnKey> {
        match &self.config {
            Some(CdnKeyConfig::Akamai(key)) => Some(key),
            _ => None,
        }
    }

    pub fn media_cdn_key(&self) -> Option<&MediaCdnKey> {
        match &self.config {
            Some(CdnKeyConfig::Media(key)) => Some(key),
            _ => None,
        }
    }
}

/// Google Cloud CDN key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCdnKey {
    /// Input only.
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub private_key: Vec<u8>,
    #[serde(default)]
    pub key_name: String,
}

/// Akamai CDN edge configuration key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AkamaiCdnKey {
    /// Input only.
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub token_key: Vec<u8>,
}

/// Media CDN key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCdnKey {
    /// Input only. 64-byte ed25519 private key.
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub private_key: Vec<u8>,
    /// The keyset name.
    #[serde(default)]
    pub key_name: String,
}

/// JSON shape of [`CdnKey`]: oneof members are sibling fields on the wire.
#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdnKeyRepr {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_cdn_key: Option<GoogleCdnKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    akamai_cdn_key: Option<AkamaiCdnKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_cdn_key: Option<MediaCdnKey>,
}

impl From<CdnKeyRepr> for CdnKey {
    fn from(repr: CdnKeyRepr) -> Self {
        let config = repr
            .google_cdn_key
            .map(CdnKeyConfig::Google)
            .or_else(|| repr.akamai_cdn_key.map(CdnKeyConfig::Akamai))
            .or_else(|| repr.media_cdn_key.map(CdnKeyConfig::Media));

        CdnKey {
            name: repr.name,
            hostname: repr.hostname,
            config,
        }
    }
}

impl From<CdnKey> for CdnKeyRepr {
    fn from(key: CdnKey) -> Self {
        let mut repr = CdnKeyRepr {
            name: key.name,
            hostname: key.hostname,
            ..Default::default()
        };
        match key.config {
            Some(CdnKeyConfig::Google(k)) => repr.google_cdn_key = Some(k),
            Some(CdnKeyConfig::Akamai(k)) => repr.akamai_cdn_key = Some(k),
            Some(CdnKeyConfig::Media(k)) => repr.media_cdn_key = Some(k),
            None => {}
        }
        repr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn google() -> GoogleCdnKey {
        GoogleCdnKey {
            private_key: b"cloud-secret".to_vec(),
            key_name: "cloud-key".into(),
        }
    }

    fn media() -> MediaCdnKey {
        MediaCdnKey {
            private_key: vec![7; 64],
            key_name: "media-keyset".into(),
        }
    }

    #[test]
    fn setting_a_member_clears_the_others() {
        let mut key = CdnKey::new("cdn.example.com");

        key.set_google_cdn_key(google());
        assert!(key.google_cdn_key().is_some());

        key.set_media_cdn_key(media());
        assert_eq!(key.media_cdn_key(), Some(&media()));
        assert!(key.google_cdn_key().is_none());
        assert!(key.akamai_cdn_key().is_none());

        key.set_akamai_cdn_key(AkamaiCdnKey {
            token_key: b"edge".to_vec(),
        });
        assert!(key.akamai_cdn_key().is_some());
        assert!(key.media_cdn_key().is_none());
        assert!(key.google_cdn_key().is_none());
    }

    #[test]
    fn only_the_set_member_is_serialized() {
        let mut key = CdnKey::new("cdn.example.com");
        key.set_google_cdn_key(google());
        key.set_media_cdn_key(media());

        let value = serde_json::to_value(&key).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("mediaCdnKey"));
        assert!(!object.contains_key("googleCdnKey"));
        assert!(!object.contains_key("akamaiCdnKey"));
        assert_eq!(value["hostname"], "cdn.example.com");
        assert_eq!(value["mediaCdnKey"]["keyName"], "media-keyset");
    }

    #[test]
    fn bytes_fields_use_base64() {
        let key: CdnKey = serde_json::from_value(json!({
            "name": "projects/p/locations/us-central1/cdnKeys/k",
            "hostname": "cdn.example.com",
            "googleCdnKey": { "keyName": "cloud-key", "privateKey": "c2VjcmV0" }
        }))
        .unwrap();

        let google = key.google_cdn_key().unwrap();
        assert_eq!(google.private_key, b"secret");
        assert_eq!(google.key_name, "cloud-key");
    }

    #[test]
    fn output_without_config_decodes_to_none() {
        let key: CdnKey = serde_json::from_value(json!({
            "name": "projects/p/locations/l/cdnKeys/k",
            "hostname": "cdn.example.com"
        }))
        .unwrap();
        assert!(key.config.is_none());
    }
}
