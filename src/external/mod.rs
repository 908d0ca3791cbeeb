//! External collaborator abstractions
//!
//! Every service the broker talks to sits behind a trait in this module,
//! enabling testable integrations through dependency injection. The real
//! implementations are thin HTTP clients; the internal logic of each
//! collaborator (payment processing, email transport, mailing-list
//! registration) is explicitly out of scope here.

use thiserror::Error;

pub mod bidding;
pub mod invoicing;
pub mod mailing;
pub mod messaging;
pub mod mocks;
pub mod records;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{resource} not found upstream")]
    NotFound { resource: String },
    #[error("HTTP transport failure: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} from collaborator: {message}")]
    UnexpectedStatus { status: u16, message: String },
    #[error("invalid response from collaborator: {message}")]
    InvalidResponse { message: String },
}

/// Map a collaborator response onto the shared error taxonomy. A 404 is the
/// upstream saying the resource does not exist; it is never synthesized here.
pub(crate) async fn ensure_success(
    resource: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, CollaboratorError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CollaboratorError::NotFound {
            resource: resource.to_string(),
        });
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::UnexpectedStatus {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}
