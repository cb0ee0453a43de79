use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{customers, point_transactions, qr_codes},
    },
};
use domain::{
    entities::{
        customers::CustomerEntity,
        point_transactions::{InsertPointTransactionEntity, PointTransactionEntity},
        qr_codes::{InsertQrCodeEntity, QrCodeEntity},
    },
    repositories::qr_codes::QrCodeRepository,
    value_objects::{
        enums::{
            point_transaction_kinds::PointTransactionKind, qr_kinds::QrKind,
            qr_statuses::QrStatus,
        },
        qr_codes::{QrCodeFilter, QrRedeemError, RedeemedQr, ensure_redeemable},
    },
};

impl From<diesel::result::Error> for QrRedeemError {
    fn from(value: diesel::result::Error) -> Self {
        QrRedeemError::Internal(value.into())
    }
}

pub struct QrCodePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl QrCodePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl QrCodeRepository for QrCodePostgres {
    async fn insert_many(&self, entities: Vec<InsertQrCodeEntity>) -> Result<Vec<QrCodeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = insert_into(qr_codes::table)
            .values(&entities)
            .returning(QrCodeEntity::as_returning())
            .get_results::<QrCodeEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<QrCodeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = qr_codes::table
            .find(id)
            .select(QrCodeEntity::as_select())
            .first::<QrCodeEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_token(&self, token: String) -> Result<Option<QrCodeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = qr_codes::table
            .filter(qr_codes::token.eq(token))
            .select(QrCodeEntity::as_select())
            .first::<QrCodeEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(
        &self,
        filter: QrCodeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QrCodeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = qr_codes::table
            .select(QrCodeEntity::as_select())
            .order(qr_codes::created_at.desc())
            .limit(limit)
            .offset(offset)
            .into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(qr_codes::status.eq(status.to_string()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(qr_codes::kind.eq(kind.to_string()));
        }
        if let Some(batch_id) = filter.batch_id {
            query = query.filter(qr_codes::batch_id.eq(batch_id));
        }

        let results = query.load::<QrCodeEntity>(&mut conn)?;
        Ok(results)
    }

    async fn redeem(
        &self,
        qr_code_id: Uuid,
        customer_id: Uuid,
        kind: QrKind,
        now: DateTime<Utc>,
    ) -> std::result::Result<RedeemedQr, QrRedeemError> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .map_err(anyhow::Error::from)?;

        conn.transaction::<RedeemedQr, QrRedeemError, _>(|conn| {
            let qr_code = qr_codes::table
                .find(qr_code_id)
                .select(QrCodeEntity::as_select())
                .for_update()
                .first::<QrCodeEntity>(conn)
                .optional()?
                .ok_or(QrRedeemError::NotFound)?;
            ensure_redeemable(&qr_code, kind, now)?;

            let customer = customers::table
                .find(customer_id)
                .select(CustomerEntity::as_select())
                .for_update()
                .first::<CustomerEntity>(conn)
                .optional()?
                .ok_or_else(|| anyhow::anyhow!("customer {} not found", customer_id))?;

            let points = qr_code.points;
            let (customer, ledger_kind) = match kind {
                QrKind::Earn => {
                    let customer = update(customers::table.find(customer_id))
                        .set((
                            customers::points_earned.eq(customers::points_earned + points),
                            customers::updated_at.eq(now),
                        ))
                        .returning(CustomerEntity::as_returning())
                        .get_result::<CustomerEntity>(conn)?;
                    (customer, PointTransactionKind::Earn)
                }
                QrKind::Spend => {
                    let balance = customer.balance();
                    if balance < points {
                        return Err(QrRedeemError::InsufficientPoints {
                            balance,
                            required: points,
                        });
                    }
                    let customer = update(customers::table.find(customer_id))
                        .set((
                            customers::points_spent.eq(customers::points_spent + points),
                            customers::updated_at.eq(now),
                        ))
                        .returning(CustomerEntity::as_returning())
                        .get_result::<CustomerEntity>(conn)?;
                    (customer, PointTransactionKind::Spend)
                }
            };

            let qr_code = update(qr_codes::table.find(qr_code_id))
                .set((
                    qr_codes::status.eq(QrStatus::Used.to_string()),
                    qr_codes::used_at.eq(Some(now)),
                    qr_codes::redeemed_by.eq(Some(customer_id)),
                ))
                .returning(QrCodeEntity::as_returning())
                .get_result::<QrCodeEntity>(conn)?;

            let transaction = insert_into(point_transactions::table)
                .values(&InsertPointTransactionEntity {
                    customer_id,
                    qr_code_id,
                    kind: ledger_kind.to_string(),
                    points,
                    balance_after: customer.balance(),
                    created_at: now,
                })
                .returning(PointTransactionEntity::as_returning())
                .get_result::<PointTransactionEntity>(conn)?;

            Ok(RedeemedQr {
                qr_code,
                customer,
                transaction,
            })
        })
    }

    async fn expire_due(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let expired = update(
            qr_codes::table
                .filter(qr_codes::status.eq(QrStatus::Unused.to_string()))
                .filter(qr_codes::expires_at.le(now)),
        )
        .set(qr_codes::status.eq(QrStatus::Expired.to_string()))
        .execute(&mut conn)?;

        Ok(expired)
    }
}
