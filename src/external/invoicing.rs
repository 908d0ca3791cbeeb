//! Invoicing collaborator
//!
//! Creates a recurring payment link for a confirmed bid and emails it to the
//! client. Payment processing and email transport are the collaborator's
//! concern; the broker only hands over amount, description, and recipient.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ensure_success, CollaboratorError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub email: String,
    /// Minor currency units, currency-agnostic at this layer
    pub amount: u64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceReceipt {
    pub payment_link: String,
}

/// Trait for the external invoicing service
#[async_trait]
pub trait InvoicingOps: Send + Sync {
    async fn send_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<InvoiceReceipt, CollaboratorError>;
}

/// Real implementation backed by the invoicing service's HTTP API
pub struct HttpInvoicing {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpInvoicing {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl InvoicingOps for HttpInvoicing {
    async fn send_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<InvoiceReceipt, CollaboratorError> {
        let url = format!("{}/invoices", self.base_url);
        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;
        let response = ensure_success("invoicing service", response).await?;
        let receipt: InvoiceReceipt =
            response
                .json()
                .await
                .map_err(|e| CollaboratorError::InvalidResponse {
                    message: format!("invoice receipt payload: {e}"),
                })?;
        Ok(receipt)
    }
}
