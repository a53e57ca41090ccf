use super::Gateway;
use crate::error::ClientError;
use crate::model::UserReward;

impl Gateway {
    /// `GET /rewards`. Read-only; the server maintains points and badges.
    pub async fn rewards(&self) -> Result<UserReward, ClientError> {
        self.get("/rewards").await
    }
}
