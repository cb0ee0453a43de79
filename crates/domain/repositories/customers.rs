use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::customers::{CustomerEntity, InsertCustomerEntity};

#[async_trait]
#[automock]
pub trait CustomerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerEntity>>;
    async fn find_by_phone(&self, phone: String) -> Result<Option<CustomerEntity>>;
    async fn find_by_qr_identifier(&self, qr_identifier: String)
    -> Result<Option<CustomerEntity>>;
    /// Inserts the customer or returns the existing row with the same phone.
    async fn find_or_create(&self, entity: InsertCustomerEntity) -> Result<CustomerEntity>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CustomerEntity>>;
}
