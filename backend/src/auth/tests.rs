use super::*;
use axum::http::Request;
use std::env;

const USER_SECRET: &str = "customer-secret-for-unit-tests-0123456789";
const ADMIN_SECRET: &str = "admin-secret-for-unit-tests-9876543210";

fn set_env_vars() {
    unsafe {
        env::set_var("JWT_USER_SECRET", USER_SECRET);
        env::set_var("JWT_ADMIN_SECRET", ADMIN_SECRET);
    }
}

fn parts_with(header: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/api/v1/customers/me");
    if let Some(value) = header {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[test]
fn issued_customer_token_validates() {
    let customer_id = Uuid::new_v4().to_string();
    let token = issue_token(&customer_id, CUSTOMER_ROLE, USER_SECRET, 1).unwrap();

    let claims = validate_token(&token, USER_SECRET, CUSTOMER_ROLE).unwrap();
    assert_eq!(claims.sub, customer_id);
    assert_eq!(claims.role, CUSTOMER_ROLE);
}

#[test]
fn expired_token_is_rejected() {
    let token = issue_token("someone", CUSTOMER_ROLE, USER_SECRET, -2).unwrap();

    let result = validate_token(&token, USER_SECRET, CUSTOMER_ROLE);
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[test]
fn wrong_signature_is_rejected() {
    let token = issue_token("someone", CUSTOMER_ROLE, "another-secret", 1).unwrap();

    assert!(validate_token(&token, USER_SECRET, CUSTOMER_ROLE).is_err());
}

#[test]
fn customer_token_cannot_act_as_admin() {
    let token = issue_token("someone", CUSTOMER_ROLE, ADMIN_SECRET, 1).unwrap();

    let result = validate_token(&token, ADMIN_SECRET, ADMIN_ROLE);
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn extractor_reads_bearer_token() {
    set_env_vars();
    let customer_id = Uuid::new_v4();
    let token = issue_token(&customer_id.to_string(), CUSTOMER_ROLE, USER_SECRET, 1).unwrap();

    let mut parts = parts_with(Some(&format!("Bearer {}", token)));
    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.customer_id, customer_id);
}

#[tokio::test]
async fn extractor_rejects_missing_or_malformed_header() {
    set_env_vars();

    let mut missing = parts_with(None);
    assert!(matches!(
        AuthUser::from_request_parts(&mut missing, &()).await,
        Err(AppError::Unauthorized(_))
    ));

    let mut basic = parts_with(Some("Basic abc"));
    assert!(matches!(
        AdminUser::from_request_parts(&mut basic, &()).await,
        Err(AppError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn admin_extractor_accepts_admin_tokens() {
    set_env_vars();
    let token = issue_token("owner", ADMIN_ROLE, ADMIN_SECRET, 1).unwrap();

    let mut parts = parts_with(Some(&format!("Bearer {}", token)));
    let admin = AdminUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(admin.username, "owner");
}
