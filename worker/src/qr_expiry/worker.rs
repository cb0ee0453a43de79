use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Utc;
use crates::domain::repositories::qr_codes::QrCodeRepository;
use tracing::{error, info};

use crate::usecases::expire_qr_codes::ExpireQrCodesUseCase;

pub async fn run<Q>(usecase: Arc<ExpireQrCodesUseCase<Q>>, interval: Duration) -> Result<()>
where
    Q: QrCodeRepository + Send + Sync + 'static,
{
    info!(
        interval_secs = interval.as_secs(),
        "qr_expiry: starting worker loop"
    );
    loop {
        if let Err(e) = usecase.run_once(Utc::now()).await {
            error!(error = ?e, "qr_expiry: sweep failed");
        }
        tokio::time::sleep(interval).await;
    }
}
