use std::{collections::HashSet, sync::Arc};

use anyhow::Context;
use chrono::{DateTime, Utc};
use crates::domain::{
    entities::custom_prices::{InsertCustomPriceEntity, UpdateCustomPriceEntity},
    repositories::custom_prices::CustomPriceRepository,
    value_objects::custom_prices::{
        CustomPriceDto, InsertCustomPriceModel, MAX_DECIMALS, PriceLeg, ReorderItem,
        UpdateCustomPriceModel, normalize_price_code,
    },
};
use tracing::{info, warn};
use uuid::Uuid;

use super::UseCaseResult;
use crate::axum_http::error_responses::AppError;

const DEFAULT_DECIMALS: i32 = 2;

pub struct CustomPriceUseCase<R>
where
    R: CustomPriceRepository + Send + Sync + 'static,
{
    custom_price_repository: Arc<R>,
}

struct ValidatedDefinition {
    code: String,
    name: String,
    group_key: Option<String>,
    buy_rule: serde_json::Value,
    sell_rule: serde_json::Value,
}

fn validate_definition(
    code: &str,
    name: &str,
    group_key: Option<&str>,
    buy_rule: &PriceLeg,
    sell_rule: &PriceLeg,
    decimals: i32,
) -> UseCaseResult<ValidatedDefinition> {
    let code = normalize_price_code(code).map_err(AppError::BadRequest)?;

    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if !(0..=MAX_DECIMALS).contains(&decimals) {
        return Err(AppError::BadRequest(format!(
            "decimals must be between 0 and {}",
            MAX_DECIMALS
        )));
    }

    buy_rule
        .validate()
        .map_err(|err| AppError::BadRequest(format!("buy_rule: {}", err)))?;
    sell_rule
        .validate()
        .map_err(|err| AppError::BadRequest(format!("sell_rule: {}", err)))?;

    let group_key = group_key
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(str::to_string);

    Ok(ValidatedDefinition {
        code,
        name: name.to_string(),
        group_key,
        buy_rule: serde_json::to_value(buy_rule).context("serialize buy rule")?,
        sell_rule: serde_json::to_value(sell_rule).context("serialize sell rule")?,
    })
}

impl<R> CustomPriceUseCase<R>
where
    R: CustomPriceRepository + Send + Sync + 'static,
{
    pub fn new(custom_price_repository: Arc<R>) -> Self {
        Self {
            custom_price_repository,
        }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<CustomPriceDto>> {
        let definitions = self.custom_price_repository.list_all().await?;
        Ok(definitions.into_iter().map(CustomPriceDto::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> UseCaseResult<CustomPriceDto> {
        self.custom_price_repository
            .find_by_id(id)
            .await?
            .map(CustomPriceDto::from)
            .ok_or_else(|| AppError::NotFound(format!("custom price {} not found", id)))
    }

    pub async fn create(
        &self,
        model: InsertCustomPriceModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<CustomPriceDto> {
        let decimals = model.decimals.unwrap_or(DEFAULT_DECIMALS);
        let validated = validate_definition(
            &model.code,
            &model.name,
            model.group_key.as_deref(),
            &model.buy_rule,
            &model.sell_rule,
            decimals,
        )?;

        if self
            .custom_price_repository
            .find_by_code(validated.code.clone())
            .await?
            .is_some()
        {
            warn!(code = %validated.code, "custom_prices: duplicate code");
            return Err(AppError::Conflict(format!(
                "custom price {} already exists",
                validated.code
            )));
        }

        let sort_order = match model.sort_order {
            Some(sort_order) => sort_order,
            None => self
                .custom_price_repository
                .max_sort_order()
                .await?
                .map_or(0, |max| max.saturating_add(1)),
        };

        let created = self
            .custom_price_repository
            .insert(InsertCustomPriceEntity {
                code: validated.code,
                name: validated.name,
                group_key: validated.group_key,
                buy_rule: validated.buy_rule,
                sell_rule: validated.sell_rule,
                sort_order,
                decimals,
                is_visible: model.is_visible.unwrap_or(true),
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(id = %created.id, code = %created.code, "custom_prices: created");
        Ok(CustomPriceDto::from(created))
    }

    pub async fn update(
        &self,
        id: Uuid,
        model: UpdateCustomPriceModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<CustomPriceDto> {
        let validated = validate_definition(
            &model.code,
            &model.name,
            model.group_key.as_deref(),
            &model.buy_rule,
            &model.sell_rule,
            model.decimals,
        )?;

        let existing = self
            .custom_price_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("custom price {} not found", id)))?;

        if existing.code != validated.code {
            let clash = self
                .custom_price_repository
                .find_by_code(validated.code.clone())
                .await?;
            if clash.is_some_and(|other| other.id != id) {
                return Err(AppError::Conflict(format!(
                    "custom price {} already exists",
                    validated.code
                )));
            }
        }

        let updated = self
            .custom_price_repository
            .update(
                id,
                UpdateCustomPriceEntity {
                    code: validated.code,
                    name: validated.name,
                    group_key: validated.group_key,
                    buy_rule: validated.buy_rule,
                    sell_rule: validated.sell_rule,
                    decimals: model.decimals,
                    is_visible: model.is_visible,
                    updated_at: now,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("custom price {} not found", id)))?;

        info!(%id, code = %updated.code, "custom_prices: updated");
        Ok(CustomPriceDto::from(updated))
    }

    pub async fn delete(&self, id: Uuid) -> UseCaseResult<()> {
        if !self.custom_price_repository.delete(id).await? {
            return Err(AppError::NotFound(format!("custom price {} not found", id)));
        }

        info!(%id, "custom_prices: deleted");
        Ok(())
    }

    pub async fn reorder(&self, items: Vec<ReorderItem>) -> UseCaseResult<usize> {
        if items.is_empty() {
            return Err(AppError::BadRequest("reorder list must not be empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(items.len());
        if let Some(duplicate) = items.iter().find(|item| !seen.insert(item.id)) {
            return Err(AppError::BadRequest(format!(
                "custom price {} appears more than once",
                duplicate.id
            )));
        }

        let known: HashSet<Uuid> = self
            .custom_price_repository
            .list_all()
            .await?
            .into_iter()
            .map(|definition| definition.id)
            .collect();
        if let Some(unknown) = items.iter().find(|item| !known.contains(&item.id)) {
            return Err(AppError::NotFound(format!(
                "custom price {} not found",
                unknown.id
            )));
        }

        let updated = self.custom_price_repository.reorder(items).await?;
        info!(updated, "custom_prices: reordered");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crates::domain::{
        entities::custom_prices::CustomPriceEntity,
        repositories::custom_prices::MockCustomPriceRepository,
        value_objects::{custom_prices::SourceRef, enums::price_fields::PriceField},
    };
    use mockall::predicate::eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn leg(code: &str, multiplier: f64, addition: f64) -> PriceLeg {
        PriceLeg {
            primary: SourceRef {
                code: code.to_string(),
                field: PriceField::Sell,
                multiplier,
                addition,
            },
            fallback: Some(SourceRef {
                code: code.to_string(),
                field: PriceField::Sell,
                multiplier,
                addition,
            }),
        }
    }

    fn entity(id: Uuid, code: &str) -> CustomPriceEntity {
        CustomPriceEntity {
            id,
            code: code.to_string(),
            name: "Quarter coin".to_string(),
            group_key: None,
            buy_rule: leg("HAS", 1.6, 0.0),
            sell_rule: leg("HAS", 1.64, 25.0),
            sort_order: 3,
            decimals: 2,
            is_visible: true,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn insert_model(code: &str) -> InsertCustomPriceModel {
        InsertCustomPriceModel {
            code: code.to_string(),
            name: " Quarter coin ".to_string(),
            group_key: Some("coins".to_string()),
            buy_rule: leg("HAS", 1.6, 0.0),
            sell_rule: leg("HAS", 1.64, 25.0),
            sort_order: None,
            decimals: None,
            is_visible: None,
        }
    }

    #[tokio::test]
    async fn create_normalizes_code_and_appends_to_order() {
        let mut repository = MockCustomPriceRepository::new();
        repository
            .expect_find_by_code()
            .with(eq("QUARTER_COIN".to_string()))
            .returning(|_| Box::pin(async move { Ok(None) }));
        repository
            .expect_max_sort_order()
            .returning(|| Box::pin(async move { Ok(Some(4)) }));
        repository
            .expect_insert()
            .withf(|entity| {
                entity.code == "QUARTER_COIN"
                    && entity.name == "Quarter coin"
                    && entity.sort_order == 5
                    && entity.decimals == 2
                    && entity.is_visible
            })
            .returning(|entity| {
                let mut created = stored(Uuid::new_v4());
                created.code = entity.code;
                created.sort_order = entity.sort_order;
                Box::pin(async move { Ok(created) })
            });

        let usecase = CustomPriceUseCase::new(Arc::new(repository));
        let created = usecase
            .create(insert_model("quarter_coin"), now())
            .await
            .unwrap();

        assert_eq!(created.code, "QUARTER_COIN");
        assert_eq!(created.sort_order, 5);
    }

    #[tokio::test]
    async fn create_after_the_largest_sort_order_stays_in_range() {
        let mut repository = MockCustomPriceRepository::new();
        repository
            .expect_find_by_code()
            .returning(|_| Box::pin(async move { Ok(None) }));
        repository
            .expect_max_sort_order()
            .returning(|| Box::pin(async move { Ok(Some(i32::MAX)) }));
        repository
            .expect_insert()
            .withf(|entity| entity.sort_order == i32::MAX)
            .times(1)
            .returning(|entity| {
                let mut created = stored(Uuid::new_v4());
                created.sort_order = entity.sort_order;
                Box::pin(async move { Ok(created) })
            });

        let created = CustomPriceUseCase::new(Arc::new(repository))
            .create(insert_model("QUARTER"), now())
            .await
            .unwrap();

        assert_eq!(created.sort_order, i32::MAX);
    }

    fn stored(id: Uuid) -> CustomPriceEntity {
        entity(id, "STORED")
    }

    #[tokio::test]
    async fn create_rejects_duplicate_code() {
        let existing = entity(Uuid::new_v4(), "GRAM");
        let mut repository = MockCustomPriceRepository::new();
        repository.expect_find_by_code().returning(move |_| {
            let existing = existing.clone();
            Box::pin(async move { Ok(Some(existing)) })
        });
        repository.expect_insert().never();

        let usecase = CustomPriceUseCase::new(Arc::new(repository));
        let result = usecase.create(insert_model("gram"), now()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_rejects_invalid_rules_and_decimals() {
        let usecase = CustomPriceUseCase::new(Arc::new(MockCustomPriceRepository::new()));

        let mut zero_multiplier = insert_model("GRAM");
        zero_multiplier.buy_rule = leg("HAS", 0.0, 0.0);
        assert!(matches!(
            usecase.create(zero_multiplier, now()).await,
            Err(AppError::BadRequest(_))
        ));

        let mut too_precise = insert_model("GRAM");
        too_precise.decimals = Some(MAX_DECIMALS + 1);
        assert!(matches!(
            usecase.create(too_precise, now()).await,
            Err(AppError::BadRequest(_))
        ));

        assert!(matches!(
            usecase.create(insert_model("gram-coin"), now()).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn update_rejects_code_taken_by_another_definition() {
        let id = Uuid::new_v4();
        let current = entity(id, "GRAM");
        let other = entity(Uuid::new_v4(), "QUARTER");

        let mut repository = MockCustomPriceRepository::new();
        repository
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| {
                let current = current.clone();
                Box::pin(async move { Ok(Some(current)) })
            });
        repository.expect_find_by_code().returning(move |_| {
            let other = other.clone();
            Box::pin(async move { Ok(Some(other)) })
        });
        repository.expect_update().never();

        let usecase = CustomPriceUseCase::new(Arc::new(repository));
        let result = usecase
            .update(
                id,
                UpdateCustomPriceModel {
                    code: "quarter".to_string(),
                    name: "Gram".to_string(),
                    group_key: None,
                    buy_rule: leg("HAS", 1.0, 0.0),
                    sell_rule: leg("HAS", 1.0, 0.0),
                    decimals: 2,
                    is_visible: true,
                },
                now(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn delete_missing_definition_is_not_found() {
        let mut repository = MockCustomPriceRepository::new();
        repository
            .expect_delete()
            .returning(|_| Box::pin(async move { Ok(false) }));

        let usecase = CustomPriceUseCase::new(Arc::new(repository));
        assert!(matches!(
            usecase.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn reorder_rejects_duplicates_before_touching_storage() {
        let id = Uuid::new_v4();
        let mut repository = MockCustomPriceRepository::new();
        repository.expect_list_all().never();
        repository.expect_reorder().never();

        let usecase = CustomPriceUseCase::new(Arc::new(repository));
        let result = usecase
            .reorder(vec![
                ReorderItem { id, sort_order: 1 },
                ReorderItem { id, sort_order: 2 },
            ])
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn reorder_rejects_unknown_ids() {
        let known = entity(Uuid::new_v4(), "GRAM");
        let mut repository = MockCustomPriceRepository::new();
        repository.expect_list_all().returning(move || {
            let known = known.clone();
            Box::pin(async move { Ok(vec![known]) })
        });
        repository.expect_reorder().never();

        let usecase = CustomPriceUseCase::new(Arc::new(repository));
        let result = usecase
            .reorder(vec![ReorderItem {
                id: Uuid::new_v4(),
                sort_order: 1,
            }])
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn reorder_applies_known_ids() {
        let first = entity(Uuid::new_v4(), "GRAM");
        let second = entity(Uuid::new_v4(), "QUARTER");
        let items = vec![
            ReorderItem {
                id: second.id,
                sort_order: 0,
            },
            ReorderItem {
                id: first.id,
                sort_order: 1,
            },
        ];
        let definitions = vec![first, second];

        let mut repository = MockCustomPriceRepository::new();
        repository.expect_list_all().returning(move || {
            let definitions = definitions.clone();
            Box::pin(async move { Ok(definitions) })
        });
        repository
            .expect_reorder()
            .withf(|items| items.len() == 2)
            .returning(|items| {
                let count = items.len();
                Box::pin(async move { Ok(count) })
            });

        let usecase = CustomPriceUseCase::new(Arc::new(repository));
        assert_eq!(usecase.reorder(items).await.unwrap(), 2);
    }
}
