use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crates::domain::repositories::qr_codes::QrCodeRepository;
use tracing::info;

pub struct ExpireQrCodesUseCase<Q>
where
    Q: QrCodeRepository + Send + Sync + 'static,
{
    qr_code_repository: Arc<Q>,
}

impl<Q> ExpireQrCodesUseCase<Q>
where
    Q: QrCodeRepository + Send + Sync + 'static,
{
    pub fn new(qr_code_repository: Arc<Q>) -> Self {
        Self { qr_code_repository }
    }

    /// Flags unused codes past their expiry. Returns how many were flagged.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<usize> {
        let expired = self
            .qr_code_repository
            .expire_due(now)
            .await
            .context("qr_expiry: failed to expire codes")?;

        if expired > 0 {
            info!(expired, "qr_expiry: codes expired");
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crates::domain::repositories::qr_codes::MockQrCodeRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn sweeps_with_the_given_clock() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let mut repo = MockQrCodeRepository::new();
        repo.expect_expire_due()
            .with(eq(now))
            .times(1)
            .returning(|_| Box::pin(async { Ok(3) }));

        let usecase = ExpireQrCodesUseCase::new(Arc::new(repo));

        assert_eq!(usecase.run_once(now).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn repository_errors_surface() {
        let mut repo = MockQrCodeRepository::new();
        repo.expect_expire_due()
            .times(1)
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("pool timed out")) }));

        let usecase = ExpireQrCodesUseCase::new(Arc::new(repo));

        assert!(usecase.run_once(Utc::now()).await.is_err());
    }
}
