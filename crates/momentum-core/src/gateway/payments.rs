use reqwest::Method;

use super::{Gateway, Mutation};
use crate::error::ClientError;
use crate::model::{Acknowledgement, CheckoutSession};

impl Gateway {
    /// `POST /payments/subscribe`. Returns the hosted checkout page.
    ///
    /// Premium status changes once the payment provider confirms, so the
    /// profile is invalidated rather than patched.
    pub async fn subscribe_checkout(&self) -> Result<CheckoutSession, ClientError> {
        let checkout: CheckoutSession = self
            .send_empty(Method::POST, "/payments/subscribe")
            .await?;
        self.invalidate(Mutation::Subscribe);
        Ok(checkout)
    }

    /// `POST /payments/cancel`
    pub async fn cancel_subscription(&self) -> Result<Acknowledgement, ClientError> {
        let ack = self.send_ack(Method::POST, "/payments/cancel").await?;
        self.invalidate(Mutation::CancelSubscription);
        Ok(ack)
    }
}
