use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::customers::InsertCustomerEntity,
    repositories::{
        customers::CustomerRepository, point_transactions::PointTransactionRepository,
    },
    value_objects::customers::{
        AuthCustomerModel, CustomerAuthDto, CustomerDto, PageQuery, PointTransactionDto,
        generate_qr_identifier, normalize_phone,
    },
};
use tracing::{info, warn};
use uuid::Uuid;

use super::UseCaseResult;
use crate::{
    auth::{CUSTOMER_ROLE, issue_token},
    axum_http::error_responses::AppError,
    config::config_model::UserSecret,
};

pub struct CustomerUseCase<C, T>
where
    C: CustomerRepository + Send + Sync + 'static,
    T: PointTransactionRepository + Send + Sync + 'static,
{
    customer_repository: Arc<C>,
    point_transaction_repository: Arc<T>,
}

impl<C, T> CustomerUseCase<C, T>
where
    C: CustomerRepository + Send + Sync + 'static,
    T: PointTransactionRepository + Send + Sync + 'static,
{
    pub fn new(customer_repository: Arc<C>, point_transaction_repository: Arc<T>) -> Self {
        Self {
            customer_repository,
            point_transaction_repository,
        }
    }

    /// Phone-only sign-in: the first call for a number registers the customer.
    pub async fn authenticate(
        &self,
        model: AuthCustomerModel,
        user_secret: &UserSecret,
        now: DateTime<Utc>,
    ) -> UseCaseResult<CustomerAuthDto> {
        let phone = normalize_phone(&model.phone).map_err(|err| {
            warn!("customers: rejected phone number");
            AppError::BadRequest(err)
        })?;
        let name = model
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let customer = self
            .customer_repository
            .find_or_create(InsertCustomerEntity {
                phone,
                name,
                qr_identifier: generate_qr_identifier(),
                points_earned: 0,
                points_spent: 0,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let token = issue_token(
            &customer.id.to_string(),
            CUSTOMER_ROLE,
            &user_secret.secret,
            user_secret.ttl_hours,
        )?;

        info!(customer_id = %customer.id, "customers: authenticated");
        Ok(CustomerAuthDto {
            token,
            customer: CustomerDto::from(customer),
        })
    }

    pub async fn me(&self, customer_id: Uuid) -> UseCaseResult<CustomerDto> {
        self.customer_repository
            .find_by_id(customer_id)
            .await?
            .map(CustomerDto::from)
            .ok_or_else(|| AppError::NotFound("customer not found".to_string()))
    }

    pub async fn transactions(&self, customer_id: Uuid) -> UseCaseResult<Vec<PointTransactionDto>> {
        let transactions = self
            .point_transaction_repository
            .list_by_customer(customer_id)
            .await?;
        Ok(transactions
            .into_iter()
            .map(PointTransactionDto::from)
            .collect())
    }

    pub async fn list(&self, page: PageQuery) -> UseCaseResult<Vec<CustomerDto>> {
        let (limit, offset) = page.bounds();
        let customers = self.customer_repository.list(limit, offset).await?;
        Ok(customers.into_iter().map(CustomerDto::from).collect())
    }

    pub async fn find_by_qr_identifier(&self, qr_identifier: &str) -> UseCaseResult<CustomerDto> {
        let qr_identifier = qr_identifier.trim();
        if qr_identifier.is_empty() {
            return Err(AppError::BadRequest(
                "qr_identifier must not be empty".to_string(),
            ));
        }

        self.customer_repository
            .find_by_qr_identifier(qr_identifier.to_string())
            .await?
            .map(CustomerDto::from)
            .ok_or_else(|| AppError::NotFound("customer not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::validate_token;
    use chrono::TimeZone;
    use crates::domain::{
        entities::{customers::CustomerEntity, point_transactions::PointTransactionEntity},
        repositories::{
            customers::MockCustomerRepository,
            point_transactions::MockPointTransactionRepository,
        },
    };
    use mockall::predicate::eq;

    const SECRET: &str = "customer-usecase-secret";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn user_secret() -> UserSecret {
        UserSecret {
            secret: SECRET.to_string(),
            ttl_hours: 24,
        }
    }

    fn customer_from(entity: InsertCustomerEntity) -> CustomerEntity {
        CustomerEntity {
            id: Uuid::new_v4(),
            phone: entity.phone,
            name: entity.name,
            qr_identifier: entity.qr_identifier,
            points_earned: entity.points_earned,
            points_spent: entity.points_spent,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    fn usecase(
        customers: MockCustomerRepository,
        transactions: MockPointTransactionRepository,
    ) -> CustomerUseCase<MockCustomerRepository, MockPointTransactionRepository> {
        CustomerUseCase::new(Arc::new(customers), Arc::new(transactions))
    }

    #[tokio::test]
    async fn authenticate_normalizes_phone_and_issues_customer_token() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_find_or_create()
            .withf(|entity| {
                entity.phone == "+905321234567"
                    && entity.name.as_deref() == Some("Ayse")
                    && entity.qr_identifier.len() == 16
            })
            .returning(|entity| {
                let customer = customer_from(entity);
                Box::pin(async move { Ok(customer) })
            });

        let auth = usecase(customers, MockPointTransactionRepository::new())
            .authenticate(
                AuthCustomerModel {
                    phone: "0532 123 45 67".to_string(),
                    name: Some(" Ayse ".to_string()),
                },
                &user_secret(),
                now(),
            )
            .await
            .unwrap();

        let claims = validate_token(&auth.token, SECRET, CUSTOMER_ROLE).unwrap();
        assert_eq!(claims.sub, auth.customer.id.to_string());
        assert_eq!(auth.customer.balance, 0);
    }

    #[tokio::test]
    async fn authenticate_rejects_invalid_phone() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_or_create().never();

        let result = usecase(customers, MockPointTransactionRepository::new())
            .authenticate(
                AuthCustomerModel {
                    phone: "12".to_string(),
                    name: None,
                },
                &user_secret(),
                now(),
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn me_reports_missing_customer() {
        let customer_id = Uuid::new_v4();
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_find_by_id()
            .with(eq(customer_id))
            .returning(|_| Box::pin(async move { Ok(None) }));

        let result = usecase(customers, MockPointTransactionRepository::new())
            .me(customer_id)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn transactions_are_returned_in_repository_order() {
        let customer_id = Uuid::new_v4();
        let mut transactions = MockPointTransactionRepository::new();
        transactions
            .expect_list_by_customer()
            .with(eq(customer_id))
            .returning(move |customer_id| {
                let rows = vec![
                    PointTransactionEntity {
                        id: Uuid::new_v4(),
                        customer_id,
                        qr_code_id: Uuid::new_v4(),
                        kind: "spend".to_string(),
                        points: 40,
                        balance_after: 60,
                        created_at: now(),
                    },
                    PointTransactionEntity {
                        id: Uuid::new_v4(),
                        customer_id,
                        qr_code_id: Uuid::new_v4(),
                        kind: "earn".to_string(),
                        points: 100,
                        balance_after: 100,
                        created_at: now() - chrono::Duration::hours(1),
                    },
                ];
                Box::pin(async move { Ok(rows) })
            });

        let rows = usecase(MockCustomerRepository::new(), transactions)
            .transactions(customer_id)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, "spend");
        assert_eq!(rows[1].balance_after, 100);
    }

    #[tokio::test]
    async fn list_clamps_page_size() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_list()
            .with(eq(PageQuery::MAX_LIMIT), eq(0))
            .returning(|_, _| Box::pin(async move { Ok(vec![]) }));

        let rows = usecase(customers, MockPointTransactionRepository::new())
            .list(PageQuery {
                limit: Some(10_000),
                offset: None,
            })
            .await
            .unwrap();

        assert!(rows.is_empty());
    }
}
