//! HTTP transport for bulk actions.

use crate::csrf::CsrfHeader;
use crate::dispatch::BulkTransport;
use crate::error::DispatchError;
use async_trait::async_trait;
use bulkdesk_api_models::{BulkActionRequest, BulkActionResponse};
use gloo_net::http::Request;

/// `fetch`-based transport; cookies ride along for same-origin endpoints.
pub(crate) struct GlooTransport;

#[async_trait(?Send)]
impl BulkTransport for GlooTransport {
    async fn post(
        &self,
        endpoint: &str,
        csrf: Option<&CsrfHeader>,
        request: &BulkActionRequest,
    ) -> Result<BulkActionResponse, DispatchError> {
        let mut req = Request::post(endpoint).header("Content-Type", "application/json");
        if let Some(csrf) = csrf {
            req = req.header(&csrf.name, &csrf.value);
        }
        let req = req
            .json(request)
            .map_err(|err| DispatchError::Encode(err.to_string()))?;
        let response = req
            .send()
            .await
            .map_err(|err| DispatchError::Transport(err.to_string()))?;
        // Error statuses still carry the `{success, message}` document.
        response
            .json::<BulkActionResponse>()
            .await
            .map_err(|err| DispatchError::Decode(err.to_string()))
    }
}
