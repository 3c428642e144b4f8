//! Transport abstraction.
//!
//! [`VideoStitcherTransport`] has one method per RPC. The client only ever
//! holds an `Arc<dyn VideoStitcherTransport>`, so swapping the wire protocol
//! (or a test double) does not change what callers see. Every RPC has a
//! default body answering `UNIMPLEMENTED`, which lets a transport serve a
//! subset of the surface.

mod rest;

use std::fmt;

use async_trait::async_trait;

use crate::errors::{Code, Result, Status};
use crate::models::*;
use crate::operation::{Empty, Operation};
use crate::options::CallContext;

pub use rest::RestTransport;

/// The remote methods of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    CreateCdnKey,
    ListCdnKeys,
    GetCdnKey,
    DeleteCdnKey,
    UpdateCdnKey,
    CreateVodSession,
    GetVodSession,
    ListVodStitchDetails,
    GetVodStitchDetail,
    ListVodAdTagDetails,
    GetVodAdTagDetail,
    ListLiveAdTagDetails,
    GetLiveAdTagDetail,
    CreateSlate,
    ListSlates,
    GetSlate,
    UpdateSlate,
    DeleteSlate,
    CreateLiveSession,
    GetLiveSession,
    CreateLiveConfig,
    ListLiveConfigs,
    GetLiveConfig,
    DeleteLiveConfig,
    GetOperation,
    CancelOperation,
}

impl Method {
    pub const ALL: [Method; 26] = [
        Method::CreateCdnKey,
        Method::ListCdnKeys,
        Method::GetCdnKey,
        Method::DeleteCdnKey,
        Method::UpdateCdnKey,
        Method::CreateVodSession,
        Method::GetVodSession,
        Method::ListVodStitchDetails,
        Method::GetVodStitchDetail,
        Method::ListVodAdTagDetails,
        Method::GetVodAdTagDetail,
        Method::ListLiveAdTagDetails,
        Method::GetLiveAdTagDetail,
        Method::CreateSlate,
        Method::ListSlates,
        Method::GetSlate,
        Method::UpdateSlate,
        Method::DeleteSlate,
        Method::CreateLiveSession,
        Method::GetLiveSession,
        Method::CreateLiveConfig,
        Method::ListLiveConfigs,
        Method::GetLiveConfig,
        Method::DeleteLiveConfig,
        Method::GetOperation,
        Method::CancelOperation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::CreateCdnKey => "CreateCdnKey",
            Method::ListCdnKeys => "ListCdnKeys",
            Method::GetCdnKey => "GetCdnKey",
            Method::DeleteCdnKey => "DeleteCdnKey",
            Method::UpdateCdnKey => "UpdateCdnKey",
            Method::CreateVodSession => "CreateVodSession",
            Method::GetVodSession => "GetVodSession",
            Method::ListVodStitchDetails => "ListVodStitchDetails",
            Method::GetVodStitchDetail => "GetVodStitchDetail",
            Method::ListVodAdTagDetails => "ListVodAdTagDetails",
            Method::GetVodAdTagDetail => "GetVodAdTagDetail",
            Method::ListLiveAdTagDetails => "ListLiveAdTagDetails",
            Method::GetLiveAdTagDetail => "GetLiveAdTagDetail",
            Method::CreateSlate => "CreateSlate",
            Method::ListSlates => "ListSlates",
            Method::GetSlate => "GetSlate",
            Method::UpdateSlate => "UpdateSlate",
            Method::DeleteSlate => "DeleteSlate",
            Method::CreateLiveSession => "CreateLiveSession",
            Method::GetLiveSession => "GetLiveSession",
            Method::CreateLiveConfig => "CreateLiveConfig",
            Method::ListLiveConfigs => "ListLiveConfigs",
            Method::GetLiveConfig => "GetLiveConfig",
            Method::DeleteLiveConfig => "DeleteLiveConfig",
            Method::GetOperation => "GetOperation",
            Method::CancelOperation => "CancelOperation",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn unimplemented<T>(method: Method) -> Result<T> {
    Err(Status::new(
        Code::Unimplemented,
        format!("{method} is not supported by this transport"),
    )
    .into())
}

/// One async method per RPC. Implementations must be safe to call
/// concurrently from many tasks.
#[async_trait]
pub trait VideoStitcherTransport: Send + Sync + fmt::Debug {
    /// Short name of the wire protocol, e.g. `"rest"`.
    fn kind(&self) -> &'static str;

    /// Release connections. Only call this when no other client shares the
    /// transport.
    async fn close(&self) {}

    async fn create_cdn_key(&self, _request: &CreateCdnKeyRequest, _ctx: CallContext) -> Result<Operation> {
        unimplemented(Method::CreateCdnKey)
    }

    async fn list_cdn_keys(&self, _request: &ListCdnKeysRequest, _ctx: CallContext) -> Result<ListCdnKeysResponse> {
        unimplemented(Method::ListCdnKeys)
    }

    async fn get_cdn_key(&self, _request: &GetCdnKeyRequest, _ctx: CallContext) -> Result<CdnKey> {
        unimplemented(Method::GetCdnKey)
    }

    async fn delete_cdn_key(&self, _request: &DeleteCdnKeyRequest, _ctx: CallContext) -> Result<Operation> {
        unimplemented(Method::DeleteCdnKey)
    }

    async fn update_cdn_key(&self, _request: &UpdateCdnKeyRequest, _ctx: CallContext) -> Result<Operation> {
        unimplemented(Method::UpdateCdnKey)
    }

    async fn create_vod_session(&self, _request: &CreateVodSessionRequest, _ctx: CallContext) -> Result<VodSession> {
        unimplemented(Method::CreateVodSession)
    }

    async fn get_vod_session(&self, _request: &GetVodSessionRequest, _ctx: CallContext) -> Result<VodSession> {
        unimplemented(Method::GetVodSession)
    }

    async fn list_vod_stitch_details(
        &self,
        _request: &ListVodStitchDetailsRequest,
        _ctx: CallContext,
    ) -> Result<ListVodStitchDetailsResponse> {
        unimplemented(Method::ListVodStitchDetails)
    }

    async fn get_vod_stitch_detail(
        &self,
        _request: &GetVodStitchDetailRequest,
        _ctx: CallContext,
    ) -> Result<VodStitchDetail> {
        unimplemented(Method::GetVodStitchDetail)
    }

    async fn list_vod_ad_tag_details(
        &self,
        _request: &ListVodAdTagDetailsRequest,
        _ctx: CallContext,
    ) -> Result<ListVodAdTagDetailsResponse> {
        unimplemented(Method::ListVodAdTagDetails)
    }

    async fn get_vod_ad_tag_detail(
        &self,
        _request: &GetVodAdTagDetailRequest,
        _ctx: CallContext,
    ) -> Result<VodAdTagDetail> {
        unimplemented(Method::GetVodAdTagDetail)
    }

    async fn list_live_ad_tag_details(
        &self,
        _request: &ListLiveAdTagDetailsRequest,
        _ctx: CallContext,
    ) -> Result<ListLiveAdTagDetailsResponse> {
        unimplemented(Method::ListLiveAdTagDetails)
    }

    async fn get_live_ad_tag_detail(
        &self,
        _request: &GetLiveAdTagDetailRequest,
        _ctx: CallContext,
    ) -> Result<LiveAdTagDetail> {
        unimplemented(Method::GetLiveAdTagDetail)
    }

    async fn create_slate(&self, _request: &CreateSlateRequest, _ctx: CallContext) -> Result<Operation> {
        unimplemented(Method::CreateSlate)
    }

    async fn list_slates(&self, _request: &ListSlatesRequest, _ctx: CallContext) -> Result<ListSlatesResponse> {
        unimplemented(Method::ListSlates)
    }

    async fn get_slate(&self, _request: &GetSlateRequest, _ctx: CallContext) -> Result<Slate> {
        unimplemented(Method::GetSlate)
    }

    async fn update_slate(&self, _request: &UpdateSlateRequest, _ctx: CallContext) -> Result<Operation> {
        unimplemented(Method::UpdateSlate)
    }

    async fn delete_slate(&self, _request: &DeleteSlateRequest, _ctx: CallContext) -> Result<Operation> {
        unimplemented(Method::DeleteSlate)
    }

    async fn create_live_session(
        &self,
        _request: &CreateLiveSessionRequest,
        _ctx: CallContext,
    ) -> Result<LiveSession> {
        unimplemented(Method::CreateLiveSession)
    }

    async fn get_live_session(&self, _request: &GetLiveSessionRequest, _ctx: CallContext) -> Result<LiveSession> {
        unimplemented(Method::GetLiveSession)
    }

    async fn create_live_config(
        &self,
        _request: &CreateLiveConfigRequest,
        _ctx: CallContext,
    ) -> Result<Operation> {
        unimplemented(Method::CreateLiveConfig)
    }

    async fn list_live_configs(
        &self,
        _request: &ListLiveConfigsRequest,
        _ctx: CallContext,
    ) -> Result<ListLiveConfigsResponse> {
        unimplemented(Method::ListLiveConfigs)
    }

    async fn get_live_config(&self, _request: &GetLiveConfigRequest, _ctx: CallContext) -> Result<LiveConfig> {
        unimplemented(Method::GetLiveConfig)
    }

    async fn delete_live_config(
        &self,
        _request: &DeleteLiveConfigRequest,
        _ctx: CallContext,
    ) -> Result<Operation> {
        unimplemented(Method::DeleteLiveConfig)
    }

    async fn get_operation(&self, _request: &GetOperationRequest, _ctx: CallContext) -> Result<Operation> {
        unimplemented(Method::GetOperation)
    }

    async fn cancel_operation(&self, _request: &CancelOperationRequest, _ctx: CallContext) -> Result<Empty> {
        unimplemented(Method::CancelOperation)
    }
}
