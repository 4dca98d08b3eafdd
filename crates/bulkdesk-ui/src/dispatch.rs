//! Bulk action dispatch and result reporting.
//!
//! # Design
//! - One POST per activation; the DOM is reloaded only after the server
//!   accepts the action.
//! - Logical rejections and transport failures leave the selection intact so
//!   the user can retry.

use async_trait::async_trait;
use bulkdesk_api_models::{BulkActionRequest, BulkActionResponse};

use crate::csrf::CsrfHeader;
use crate::error::DispatchError;

/// Notice title for rejected actions.
pub const ERROR_TITLE: &str = "Error";
/// Message shown when the request never produced a usable response.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Request failed. Please try again.";

/// Sends bulk requests to the backend.
#[async_trait(?Send)]
pub trait BulkTransport {
    /// POST `request` as JSON to `endpoint` and decode the response body.
    async fn post(
        &self,
        endpoint: &str,
        csrf: Option<&CsrfHeader>,
        request: &BulkActionRequest,
    ) -> Result<BulkActionResponse, DispatchError>;
}

/// Surfaces results to the user.
#[async_trait(?Send)]
pub trait Notifier {
    /// Report success; resolves once the user has acknowledged it.
    async fn success(&self, title: &str, message: &str);
    /// Report a failure.
    async fn error(&self, title: &str, message: &str);
}

/// Control over the current page.
pub trait PageControl {
    /// Reload the view so server-rendered state reflects the mutation.
    fn reload(&self);
}

/// Result of a single dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The server accepted the action and the view was reloaded.
    Reloaded {
        /// Server message shown to the user.
        message: String,
    },
    /// The server rejected the action.
    Rejected {
        /// Server message shown to the user.
        message: String,
    },
    /// No usable response was received.
    Failed(DispatchError),
}

/// Send `request` and report the result.
pub async fn dispatch(
    transport: &dyn BulkTransport,
    notifier: &dyn Notifier,
    page: &dyn PageControl,
    endpoint: &str,
    csrf: Option<&CsrfHeader>,
    request: &BulkActionRequest,
    success_title: &str,
) -> DispatchOutcome {
    match transport.post(endpoint, csrf, request).await {
        Ok(response) if response.is_success() => {
            notifier.success(success_title, &response.message).await;
            page.reload();
            DispatchOutcome::Reloaded {
                message: response.message,
            }
        }
        Ok(response) => {
            notifier.error(ERROR_TITLE, &response.message).await;
            DispatchOutcome::Rejected {
                message: response.message,
            }
        }
        Err(err) => {
            notifier.error(ERROR_TITLE, TRANSPORT_FAILURE_MESSAGE).await;
            DispatchOutcome::Failed(err)
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::{BulkTransport, Notifier, PageControl};
    use crate::csrf::CsrfHeader;
    use crate::error::DispatchError;
    use async_trait::async_trait;
    use bulkdesk_api_models::{BulkActionRequest, BulkActionResponse};
    use std::cell::{Cell, RefCell};

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub(crate) struct SentRequest {
        pub(crate) endpoint: String,
        pub(crate) csrf: Option<CsrfHeader>,
        pub(crate) body: serde_json::Value,
    }

    pub(crate) struct ScriptedTransport {
        pub(crate) reply: Result<BulkActionResponse, DispatchError>,
        pub(crate) sent: RefCell<Vec<SentRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn replying(success: Option<bool>, message: &str) -> Self {
            Self {
                reply: Ok(BulkActionResponse {
                    success,
                    message: message.to_string(),
                }),
                sent: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn failing(err: DispatchError) -> Self {
            Self {
                reply: Err(err),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl BulkTransport for ScriptedTransport {
        async fn post(
            &self,
            endpoint: &str,
            csrf: Option<&CsrfHeader>,
            request: &BulkActionRequest,
        ) -> Result<BulkActionResponse, DispatchError> {
            let body = serde_json::to_value(request)
                .map_err(|err| DispatchError::Encode(err.to_string()))?;
            self.sent.borrow_mut().push(SentRequest {
                endpoint: endpoint.to_string(),
                csrf: csrf.cloned(),
                body,
            });
            self.reply.clone()
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub(crate) enum Notice {
        Success { title: String, message: String },
        Error { title: String, message: String },
    }

    impl Notice {
        pub(crate) fn is_error(&self) -> bool {
            matches!(self, Self::Error { .. })
        }

        pub(crate) fn title(&self) -> &str {
            match self {
                Self::Success { title, .. } | Self::Error { title, .. } => title,
            }
        }

        pub(crate) fn message(&self) -> &str {
            match self {
                Self::Success { message, .. } | Self::Error { message, .. } => message,
            }
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) notices: RefCell<Vec<Notice>>,
    }

    #[async_trait(?Send)]
    impl Notifier for RecordingNotifier {
        async fn success(&self, title: &str, message: &str) {
            self.notices.borrow_mut().push(Notice::Success {
                title: title.to_string(),
                message: message.to_string(),
            });
        }

        async fn error(&self, title: &str, message: &str) {
            self.notices.borrow_mut().push(Notice::Error {
                title: title.to_string(),
                message: message.to_string(),
            });
        }
    }

    #[derive(Default)]
    pub(crate) struct CountingPage {
        pub(crate) reloads: Cell<u32>,
    }

    impl PageControl for CountingPage {
        fn reload(&self) {
            self.reloads.set(self.reloads.get() + 1);
        }
    }
}
