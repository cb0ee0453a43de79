use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use crates::domain::{
    entities::qr_codes::{InsertQrCodeEntity, QrCodeEntity},
    repositories::{
        categories::CategoryRepository, customers::CustomerRepository,
        qr_codes::QrCodeRepository,
    },
    value_objects::{
        customers::PageQuery,
        enums::{qr_kinds::QrKind, qr_origins::QrOrigin, qr_statuses::QrStatus},
        qr_codes::{
            AmountLine, IssueBulkQrModel, IssueEarnQrModel, IssueQrModel, IssueSpendQrModel,
            MAX_BULK_COUNT, MAX_QR_POINTS, QrBatchDto, QrCodeDto, QrCodeFilter, QrRedeemError,
            RedeemedQrDto, UseQrModel, generate_qr_token, points_for_breakdown,
        },
    },
};
use tracing::{info, warn};
use uuid::Uuid;

use super::UseCaseResult;
use crate::{axum_http::error_responses::AppError, config::config_model::QrPolicy};

pub struct QrCodeUseCase<Q, C, K>
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    qr_code_repository: Arc<Q>,
    customer_repository: Arc<C>,
    category_repository: Arc<K>,
    policy: QrPolicy,
}

struct NewCode {
    kind: QrKind,
    origin: QrOrigin,
    points: i64,
    breakdown: Option<Vec<AmountLine>>,
    batch_id: Option<Uuid>,
    owner_customer_id: Option<Uuid>,
    expires_at: DateTime<Utc>,
}

impl NewCode {
    fn into_entity(self, now: DateTime<Utc>) -> anyhow::Result<InsertQrCodeEntity> {
        let breakdown = self
            .breakdown
            .map(serde_json::to_value)
            .transpose()
            .context("serialize QR breakdown")?;

        Ok(InsertQrCodeEntity {
            token: generate_qr_token(),
            kind: self.kind.to_string(),
            origin: self.origin.to_string(),
            points: self.points,
            breakdown,
            status: QrStatus::Unused.to_string(),
            batch_id: self.batch_id,
            owner_customer_id: self.owner_customer_id,
            expires_at: self.expires_at,
            created_at: now,
        })
    }
}

fn ensure_positive_points(points: i64) -> UseCaseResult<()> {
    if points <= 0 {
        return Err(AppError::BadRequest("points must be greater than 0".to_string()));
    }
    if points > MAX_QR_POINTS {
        return Err(AppError::BadRequest(format!(
            "points must not exceed {}",
            MAX_QR_POINTS
        )));
    }
    Ok(())
}

fn ensure_future_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> UseCaseResult<()> {
    if expires_at <= now {
        return Err(AppError::BadRequest(
            "expires_at must be in the future".to_string(),
        ));
    }
    Ok(())
}

impl<Q, C, K> QrCodeUseCase<Q, C, K>
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    pub fn new(
        qr_code_repository: Arc<Q>,
        customer_repository: Arc<C>,
        category_repository: Arc<K>,
        policy: QrPolicy,
    ) -> Self {
        Self {
            qr_code_repository,
            customer_repository,
            category_repository,
            policy,
        }
    }

    async fn breakdown_points(&self, lines: &[AmountLine]) -> UseCaseResult<i64> {
        let mut ids: Vec<Uuid> = lines.iter().map(|line| line.category_id).collect();
        ids.sort();
        ids.dedup();

        let rates: HashMap<Uuid, f64> = self
            .category_repository
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|category| (category.id, category.points_rate))
            .collect();

        Ok(points_for_breakdown(lines, &rates)?)
    }

    async fn insert_one(&self, code: NewCode, now: DateTime<Utc>) -> UseCaseResult<QrCodeEntity> {
        let entity = code.into_entity(now)?;
        self.qr_code_repository
            .insert_many(vec![entity])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("QR code insert returned no row")))
    }

    /// Admin-issued code carrying either a fixed point value or a category breakdown.
    pub async fn issue_single(
        &self,
        model: IssueQrModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<QrCodeDto> {
        let (points, breakdown) = match (model.points, model.breakdown) {
            (Some(points), None) => {
                ensure_positive_points(points)?;
                (points, None)
            }
            (None, Some(lines)) => (self.breakdown_points(&lines).await?, Some(lines)),
            _ => {
                return Err(AppError::BadRequest(
                    "provide exactly one of points or breakdown".to_string(),
                ));
            }
        };

        let expires_at = model
            .expires_at
            .unwrap_or(now + Duration::days(self.policy.default_ttl_days));
        ensure_future_expiry(expires_at, now)?;

        let kind = model.kind.unwrap_or_default();
        let created = self
            .insert_one(
                NewCode {
                    kind,
                    origin: QrOrigin::Single,
                    points,
                    breakdown,
                    batch_id: None,
                    owner_customer_id: None,
                    expires_at,
                },
                now,
            )
            .await?;

        info!(qr_code_id = %created.id, %kind, points, "qr_codes: single issued");
        Ok(QrCodeDto::from(created))
    }

    pub async fn issue_bulk(
        &self,
        model: IssueBulkQrModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<QrBatchDto> {
        if model.count == 0 || model.count > MAX_BULK_COUNT {
            return Err(AppError::BadRequest(format!(
                "count must be between 1 and {}",
                MAX_BULK_COUNT
            )));
        }
        ensure_positive_points(model.points)?;

        let expires_at = model
            .expires_at
            .unwrap_or(now + Duration::days(self.policy.default_ttl_days));
        ensure_future_expiry(expires_at, now)?;

        let batch_id = Uuid::new_v4();
        let entities = (0..model.count)
            .map(|_| {
                NewCode {
                    kind: QrKind::Earn,
                    origin: QrOrigin::Bulk,
                    points: model.points,
                    breakdown: None,
                    batch_id: Some(batch_id),
                    owner_customer_id: None,
                    expires_at,
                }
                .into_entity(now)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let created = self.qr_code_repository.insert_many(entities).await?;

        info!(%batch_id, count = created.len(), "qr_codes: bulk issued");
        Ok(QrBatchDto {
            batch_id,
            codes: created.into_iter().map(QrCodeDto::from).collect(),
        })
    }

    /// Till-side code for a purchase. Points come from the category rates.
    pub async fn issue_earn(
        &self,
        model: IssueEarnQrModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<QrCodeDto> {
        let points = self.breakdown_points(&model.breakdown).await?;

        let created = self
            .insert_one(
                NewCode {
                    kind: QrKind::Earn,
                    origin: QrOrigin::Purchase,
                    points,
                    breakdown: Some(model.breakdown),
                    batch_id: None,
                    owner_customer_id: None,
                    expires_at: now + Duration::minutes(self.policy.earn_ttl_minutes),
                },
                now,
            )
            .await?;

        info!(qr_code_id = %created.id, points, "qr_codes: earn issued");
        Ok(QrCodeDto::from(created))
    }

    /// Customer-side code shown at the till to pay with points.
    pub async fn issue_spend(
        &self,
        customer_id: Uuid,
        model: IssueSpendQrModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<QrCodeDto> {
        ensure_positive_points(model.points)?;

        let customer = self
            .customer_repository
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("customer not found".to_string()))?;

        let balance = customer.balance();
        if balance < model.points {
            warn!(%customer_id, balance, required = model.points, "qr_codes: spend over balance");
            return Err(QrRedeemError::InsufficientPoints {
                balance,
                required: model.points,
            }
            .into());
        }

        let created = self
            .insert_one(
                NewCode {
                    kind: QrKind::Spend,
                    origin: QrOrigin::Customer,
                    points: model.points,
                    breakdown: None,
                    batch_id: None,
                    owner_customer_id: Some(customer_id),
                    expires_at: now + Duration::minutes(self.policy.spend_ttl_minutes),
                },
                now,
            )
            .await?;

        info!(qr_code_id = %created.id, %customer_id, points = model.points, "qr_codes: spend issued");
        Ok(QrCodeDto::from(created))
    }

    async fn find_by_token(&self, token: &str) -> UseCaseResult<QrCodeEntity> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::BadRequest("token must not be empty".to_string()));
        }

        self.qr_code_repository
            .find_by_token(token.to_string())
            .await?
            .ok_or_else(|| QrRedeemError::NotFound.into())
    }

    /// A customer scans a code. Earn codes credit the scanner. Unowned spend
    /// codes (rewards) debit the scanner.
    pub async fn use_as_customer(
        &self,
        customer_id: Uuid,
        model: UseQrModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<RedeemedQrDto> {
        let qr_code = self.find_by_token(&model.token).await?;

        let kind: QrKind = qr_code
            .kind
            .parse()
            .map_err(|err: String| AppError::Internal(anyhow::anyhow!(err)))?;
        if kind == QrKind::Spend && qr_code.owner_customer_id.is_some() {
            return Err(QrRedeemError::WrongKind(qr_code.kind).into());
        }

        let redeemed = self
            .qr_code_repository
            .redeem(qr_code.id, customer_id, kind, now)
            .await?;

        info!(
            qr_code_id = %qr_code.id,
            %customer_id,
            %kind,
            points = redeemed.transaction.points,
            "qr_codes: redeemed by customer"
        );
        Ok(RedeemedQrDto::from(redeemed))
    }

    /// Staff scan a customer's spend code and debit its owner.
    pub async fn use_spend(&self, model: UseQrModel, now: DateTime<Utc>) -> UseCaseResult<RedeemedQrDto> {
        let qr_code = self.find_by_token(&model.token).await?;

        if qr_code.kind != QrKind::Spend.to_string() {
            return Err(QrRedeemError::WrongKind(qr_code.kind).into());
        }
        let owner = qr_code
            .owner_customer_id
            .ok_or(QrRedeemError::MissingOwner)?;

        let redeemed = self
            .qr_code_repository
            .redeem(qr_code.id, owner, QrKind::Spend, now)
            .await?;

        info!(
            qr_code_id = %qr_code.id,
            customer_id = %owner,
            points = redeemed.transaction.points,
            "qr_codes: spend redeemed"
        );
        Ok(RedeemedQrDto::from(redeemed))
    }

    pub async fn list(
        &self,
        filter: QrCodeFilter,
        page: PageQuery,
    ) -> UseCaseResult<Vec<QrCodeDto>> {
        let (limit, offset) = page.bounds();
        let codes = self.qr_code_repository.list(filter, limit, offset).await?;
        Ok(codes.into_iter().map(QrCodeDto::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> UseCaseResult<QrCodeDto> {
        self.qr_code_repository
            .find_by_id(id)
            .await?
            .map(QrCodeDto::from)
            .ok_or_else(|| AppError::NotFound(format!("QR code {} not found", id)))
    }
}
