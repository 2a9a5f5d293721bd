//! Shared HTTP client construction.

use std::panic::{catch_unwind, AssertUnwindSafe};

use reqwest::Client;

/// Build the client used for completion and CMS requests.
///
/// Proxy auto-detection can panic in some sandboxed environments; the
/// client is then rebuilt without proxy support. No request timeout is set
/// here; callers bound their own waits.
pub(crate) fn build_http_client() -> Client {
    match catch_unwind(AssertUnwindSafe(|| Client::builder().build())) {
        Ok(Ok(client)) => client,
        Ok(Err(_)) | Err(_) => Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to create HTTP client"),
    }
}
