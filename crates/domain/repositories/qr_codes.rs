use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::qr_codes::{InsertQrCodeEntity, QrCodeEntity},
    value_objects::{
        enums::qr_kinds::QrKind,
        qr_codes::{QrCodeFilter, QrRedeemError, RedeemedQr},
    },
};

#[async_trait]
#[automock]
pub trait QrCodeRepository {
    async fn insert_many(&self, entities: Vec<InsertQrCodeEntity>) -> Result<Vec<QrCodeEntity>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<QrCodeEntity>>;
    async fn find_by_token(&self, token: String) -> Result<Option<QrCodeEntity>>;
    async fn list(
        &self,
        filter: QrCodeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QrCodeEntity>>;

    /// Marks the code used, moves the points and writes the ledger row in one
    /// transaction. Earn codes credit `customer_id`, spend codes debit it.
    async fn redeem(
        &self,
        qr_code_id: Uuid,
        customer_id: Uuid,
        kind: QrKind,
        now: DateTime<Utc>,
    ) -> std::result::Result<RedeemedQr, QrRedeemError>;

    /// Flags unused codes whose expiry has passed. Returns how many changed.
    async fn expire_due(&self, now: DateTime<Utc>) -> Result<usize>;
}
