use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::point_transactions::PointTransactionEntity;

#[async_trait]
#[automock]
pub trait PointTransactionRepository {
    /// Newest first.
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<PointTransactionEntity>>;
}
