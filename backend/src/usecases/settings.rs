use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use crates::domain::{entities::settings::SettingEntity, repositories::settings::SettingRepository};
use serde_json::Value;
use tracing::info;

use super::UseCaseResult;
use crate::axum_http::error_responses::AppError;

const MAX_KEY_LENGTH: usize = 64;

fn validate_key(key: &str) -> UseCaseResult<()> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'));
    if !valid {
        return Err(AppError::BadRequest(format!(
            "setting key must be 1-{} characters of a-z, 0-9, _, . or -",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

pub struct SettingUseCase<R>
where
    R: SettingRepository + Send + Sync + 'static,
{
    setting_repository: Arc<R>,
}

impl<R> SettingUseCase<R>
where
    R: SettingRepository + Send + Sync + 'static,
{
    pub fn new(setting_repository: Arc<R>) -> Self {
        Self { setting_repository }
    }

    pub async fn all(&self) -> UseCaseResult<BTreeMap<String, Value>> {
        let settings = self.setting_repository.list_all().await?;
        Ok(settings
            .into_iter()
            .map(|setting| (setting.key, setting.value))
            .collect())
    }

    pub async fn put(
        &self,
        key: String,
        value: Value,
        now: DateTime<Utc>,
    ) -> UseCaseResult<SettingEntity> {
        validate_key(&key)?;

        let saved = self
            .setting_repository
            .upsert(SettingEntity {
                key,
                value,
                updated_at: now,
            })
            .await?;

        info!(key = %saved.key, "settings: saved");
        Ok(saved)
    }

    pub async fn delete(&self, key: String) -> UseCaseResult<()> {
        validate_key(&key)?;

        if !self.setting_repository.delete(key.clone()).await? {
            return Err(AppError::NotFound(format!("setting {} not found", key)));
        }
        info!(%key, "settings: deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crates::domain::repositories::settings::MockSettingRepository;
    use mockall::predicate::eq;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn all_returns_key_value_map() {
        let mut repository = MockSettingRepository::new();
        repository.expect_list_all().returning(|| {
            Box::pin(async move {
                Ok(vec![
                    SettingEntity {
                        key: "store.phone".to_string(),
                        value: json!("+902120000000"),
                        updated_at: now(),
                    },
                    SettingEntity {
                        key: "ticker.enabled".to_string(),
                        value: json!(true),
                        updated_at: now(),
                    },
                ])
            })
        });

        let settings = SettingUseCase::new(Arc::new(repository)).all().await.unwrap();

        assert_eq!(settings.get("ticker.enabled"), Some(&json!(true)));
        assert_eq!(settings.len(), 2);
    }

    #[tokio::test]
    async fn put_rejects_malformed_keys() {
        let mut repository = MockSettingRepository::new();
        repository.expect_upsert().never();
        let usecase = SettingUseCase::new(Arc::new(repository));

        for key in ["", "Has Space", &"x".repeat(MAX_KEY_LENGTH + 1)] {
            let result = usecase.put(key.to_string(), json!(1), now()).await;
            assert!(matches!(result, Err(AppError::BadRequest(_))));
        }
    }

    #[tokio::test]
    async fn delete_missing_key_is_not_found() {
        let mut repository = MockSettingRepository::new();
        repository
            .expect_delete()
            .with(eq("ticker.enabled".to_string()))
            .returning(|_| Box::pin(async move { Ok(false) }));

        let result = SettingUseCase::new(Arc::new(repository))
            .delete("ticker.enabled".to_string())
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
