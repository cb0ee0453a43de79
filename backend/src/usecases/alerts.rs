use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::price_alerts::{InsertPriceAlertEntity, PriceAlertEntity, UpdatePriceAlertEntity},
    repositories::{custom_prices::CustomPriceRepository, price_alerts::PriceAlertRepository},
    value_objects::{
        alerts::{InsertPriceAlertModel, PriceAlertDto, UpdatePriceAlertModel, validate_target},
        custom_prices::normalize_price_code,
    },
};
use tracing::info;
use uuid::Uuid;

use super::UseCaseResult;
use crate::axum_http::error_responses::AppError;

pub struct PriceAlertUseCase<A, D>
where
    A: PriceAlertRepository + Send + Sync + 'static,
    D: CustomPriceRepository + Send + Sync + 'static,
{
    price_alert_repository: Arc<A>,
    custom_price_repository: Arc<D>,
}

impl<A, D> PriceAlertUseCase<A, D>
where
    A: PriceAlertRepository + Send + Sync + 'static,
    D: CustomPriceRepository + Send + Sync + 'static,
{
    pub fn new(price_alert_repository: Arc<A>, custom_price_repository: Arc<D>) -> Self {
        Self {
            price_alert_repository,
            custom_price_repository,
        }
    }

    pub async fn list(&self, customer_id: Uuid) -> UseCaseResult<Vec<PriceAlertDto>> {
        let alerts = self
            .price_alert_repository
            .list_by_customer(customer_id)
            .await?;
        Ok(alerts.into_iter().map(PriceAlertDto::from).collect())
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        model: InsertPriceAlertModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<PriceAlertDto> {
        let price_code = normalize_price_code(&model.price_code).map_err(AppError::BadRequest)?;
        validate_target(model.target).map_err(AppError::BadRequest)?;

        if self
            .custom_price_repository
            .find_by_code(price_code.clone())
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest(format!(
                "unknown price code {}",
                price_code
            )));
        }

        let created = self
            .price_alert_repository
            .insert(InsertPriceAlertEntity {
                customer_id,
                price_code,
                field: model.field.to_string(),
                condition: model.condition.to_string(),
                target: model.target,
                is_active: true,
                created_at: now,
            })
            .await?;

        info!(id = %created.id, %customer_id, "alerts: created");
        Ok(PriceAlertDto::from(created))
    }

    async fn owned(&self, customer_id: Uuid, id: Uuid) -> UseCaseResult<PriceAlertEntity> {
        self.price_alert_repository
            .find_by_id(id)
            .await?
            .filter(|alert| alert.customer_id == customer_id)
            .ok_or_else(|| AppError::NotFound(format!("alert {} not found", id)))
    }

    pub async fn update(
        &self,
        customer_id: Uuid,
        id: Uuid,
        model: UpdatePriceAlertModel,
    ) -> UseCaseResult<PriceAlertDto> {
        if let Some(target) = model.target {
            validate_target(target).map_err(AppError::BadRequest)?;
        }

        let current = self.owned(customer_id, id).await?;

        let is_active = model.is_active.unwrap_or(current.is_active);
        // Re-arming a fired alert forgets when it last fired.
        let triggered_at = if is_active && !current.is_active {
            None
        } else {
            current.triggered_at
        };

        let updated = self
            .price_alert_repository
            .update(
                id,
                UpdatePriceAlertEntity {
                    field: model
                        .field
                        .map(|field| field.to_string())
                        .unwrap_or(current.field),
                    condition: model
                        .condition
                        .map(|condition| condition.to_string())
                        .unwrap_or(current.condition),
                    target: model.target.unwrap_or(current.target),
                    is_active,
                    triggered_at,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("alert {} not found", id)))?;

        info!(%id, %customer_id, is_active, "alerts: updated");
        Ok(PriceAlertDto::from(updated))
    }

    pub async fn delete(&self, customer_id: Uuid, id: Uuid) -> UseCaseResult<()> {
        self.owned(customer_id, id).await?;

        if !self.price_alert_repository.delete(id).await? {
            return Err(AppError::NotFound(format!("alert {} not found", id)));
        }
        info!(%id, %customer_id, "alerts: deleted");
        Ok(())
    }
}
