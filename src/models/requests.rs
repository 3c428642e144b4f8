use serde::{Deserialize, Serialize};

use super::{
    CdnKey, LiveAdTagDetail, LiveConfig, LiveSession, Slate, VodAdTagDetail, VodSession,
    VodStitchDetail,
};
use crate::pager::{PageRequest, PageResponse};

// ---------------------------------------------------------------------------
// CDN keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateCdnKeyRequest {
    /// `projects/{project}/locations/{location}`.
    pub parent: String,
    pub cdn_key: CdnKey,
    /// Becomes the final path segment of the key's name.
    pub cdn_key_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListCdnKeysRequest {
    pub parent: String,
    /// Server default when `0`.
    pub page_size: i32,
    pub page_token: String,
    pub filter: String,
    pub order_by: String,
}

impl ListCdnKeysRequest {
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCdnKeysResponse {
    #[serde(default)]
    pub cdn_keys: Vec<CdnKey>,
    #[serde(default)]
    pub next_page_token: String,
    /// Locations that could not be reached.
    #[serde(default)]
    pub unreachable: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetCdnKeyRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteCdnKeyRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCdnKeyRequest {
    /// The key to update; its `name` selects the resource.
    pub cdn_key: CdnKey,
    /// Field paths to overwrite, e.g. `["hostname"]`.
    pub update_mask: Vec<String>,
}

// ---------------------------------------------------------------------------
// VOD sessions and their details
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateVodSessionRequest {
    pub parent: String,
    pub vod_session: VodSession,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetVodSessionRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListVodStitchDetailsRequest {
    /// A VOD session name.
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
}

impl ListVodStitchDetailsRequest {
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVodStitchDetailsResponse {
    #[serde(default)]
    pub vod_stitch_details: Vec<VodStitchDetail>,
    #[serde(default)]
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetVodStitchDetailRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListVodAdTagDetailsRequest {
    /// A VOD session name.
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
}

impl ListVodAdTagDetailsRequest {
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVodAdTagDetailsResponse {
    #[serde(default)]
    pub vod_ad_tag_details: Vec<VodAdTagDetail>,
    #[serde(default)]
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetVodAdTagDetailRequest {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Live sessions and their details
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateLiveSessionRequest {
    pub parent: String,
    pub live_session: LiveSession,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetLiveSessionRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListLiveAdTagDetailsRequest {
    /// A live session name.
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
}

impl ListLiveAdTagDetailsRequest {
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLiveAdTagDetailsResponse {
    #[serde(default)]
    pub live_ad_tag_details: Vec<LiveAdTagDetail>,
    #[serde(default)]
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetLiveAdTagDetailRequest {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Slates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateSlateRequest {
    pub parent: String,
    pub slate_id: String,
    pub slate: Slate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListSlatesRequest {
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
    pub filter: String,
    pub order_by: String,
}

impl ListSlatesRequest {
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSlatesResponse {
    #[serde(default)]
    pub slates: Vec<Slate>,
    #[serde(default)]
    pub next_page_token: String,
    #[serde(default)]
    pub unreachable: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetSlateRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSlateRequest {
    /// The slate to update; its `name` selects the resource.
    pub slate: Slate,
    pub update_mask: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteSlateRequest {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Live configs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateLiveConfigRequest {
    pub parent: String,
    pub live_config_id: String,
    pub live_config: LiveConfig,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListLiveConfigsRequest {
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
    pub filter: String,
    pub order_by: String,
}

impl ListLiveConfigsRequest {
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLiveConfigsResponse {
    #[serde(default)]
    pub live_configs: Vec<LiveConfig>,
    #[serde(default)]
    pub next_page_token: String,
    #[serde(default)]
    pub unreachable: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetLiveConfigRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteLiveConfigRequest {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetOperationRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CancelOperationRequest {
    pub name: String,
}

// Requests that only carry a resource name.
macro_rules! named_request {
    ($($request:ident),+ $(,)?) => {
        $(
            impl $request {
                pub fn new(name: impl Into<String>) -> Self {
                    Self { name: name.into() }
                }
            }
        )+
    };
}

named_request!(
    GetCdnKeyRequest,
    DeleteCdnKeyRequest,
    GetVodSessionRequest,
    GetVodStitchDetailRequest,
    GetVodAdTagDetailRequest,
    GetLiveSessionRequest,
    GetLiveAdTagDetailRequest,
    GetSlateRequest,
    DeleteSlateRequest,
    GetLiveConfigRequest,
    DeleteLiveConfigRequest,
    GetOperationRequest,
    CancelOperationRequest,
);

// List request/response pairs and the collection each one pages over.
macro_rules! paged {
    ($($request:ident => $response:ident { $items:ident: $item:ty }),+ $(,)?) => {
        $(
            impl PageRequest for $request {
                fn set_page_token(&mut self, token: String) {
                    self.page_token = token;
                }
            }

            impl PageResponse for $response {
                type Item = $item;

                fn next_page_token(&self) -> &str {
                    &self.next_page_token
                }

                fn into_items(self) -> Vec<$item> {
                    self.$items
                }
            }
        )+
    };
}

paged!(
    ListCdnKeysRequest => ListCdnKeysResponse { cdn_keys: CdnKey },
    ListVodStitchDetailsRequest => ListVodStitchDetailsResponse { vod_stitch_details: VodStitchDetail },
    ListVodAdTagDetailsRequest => ListVodAdTagDetailsResponse { vod_ad_tag_details: VodAdTagDetail },
    ListLiveAdTagDetailsRequest => ListLiveAdTagDetailsResponse { live_ad_tag_details: LiveAdTagDetail },
    ListSlatesRequest => ListSlatesResponse { slates: Slate },
    ListLiveConfigsRequest => ListLiveConfigsResponse { live_configs: LiveConfig },
);
