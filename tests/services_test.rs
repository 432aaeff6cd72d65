use lunance_client::models::auth::LoginRequest;
use lunance_client::models::transaction::{TransactionFilter, TransactionType};
use lunance_client::services::{AuthService, PredictionService, TransactionService};
use lunance_client::ApiClient;
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn test_login_installs_access_token() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/v1/auth/login")
        .match_body(Matcher::PartialJson(json!({"email": "budi@ui.ac.id"})))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "message": "Login berhasil",
                "data": {
                    "user": {"id": "u1", "email": "budi@ui.ac.id", "full_name": "Budi Santoso"},
                    "access_token": "access-1",
                    "refresh_token": "refresh-1",
                    "token_type": "bearer"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let me = server
        .mock("GET", "/api/v1/auth/me")
        .match_header("authorization", "Bearer access-1")
        .with_status(200)
        .with_body(json!({"data": {"id": "u1", "nama_lengkap": "Budi Santoso"}}).to_string())
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api/v1", server.url()));
    let auth = AuthService::new(api.clone());

    let response = auth
        .login(&LoginRequest {
            email: "budi@ui.ac.id".to_string(),
            password: "Rahasia123".to_string(),
        })
        .await;
    assert!(response.success);
    let login = response.data.unwrap();
    assert_eq!(login.user.full_name, "Budi Santoso");
    assert_eq!(login.tokens.refresh_token, "refresh-1");
    assert_eq!(api.token().await.as_deref(), Some("access-1"));

    let user = auth.me().await.into_result().unwrap();
    assert_eq!(user.full_name, "Budi Santoso");
    me.assert_async().await;
}

#[tokio::test]
async fn test_failed_login_leaves_client_anonymous() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/auth/login")
        .with_status(401)
        .with_body(json!({"detail": "Email atau password salah"}).to_string())
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api/v1", server.url()));
    let response = AuthService::new(api.clone())
        .login(&LoginRequest {
            email: "budi@ui.ac.id".to_string(),
            password: "salah".to_string(),
        })
        .await;

    assert!(response.is_unauthorized());
    assert_eq!(response.message, "Email atau password salah");
    assert!(!api.is_authenticated().await);
}

#[tokio::test]
async fn test_logout_clears_token_when_server_fails() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/auth/logout")
        .with_status(500)
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api/v1", server.url()));
    api.set_token(Some("stale".to_string())).await;

    let response = AuthService::new(api.clone()).logout().await;
    assert!(!response.success);
    assert!(!api.is_authenticated().await);
}

#[tokio::test]
async fn test_transaction_list_reads_pagination() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/transactions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("transaction_type".into(), "expense".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "items": [
                        {"id": "t3", "amount": "15000", "transaction_type": "expense"},
                        {"id": "t4", "amount": 42000.5, "transaction_type": "expense"}
                    ],
                    "total": 6,
                    "page": 2,
                    "per_page": 2
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api/v1", server.url()));
    let filter = TransactionFilter {
        transaction_type: Some(TransactionType::Expense),
        page: Some(2),
        per_page: Some(2),
        ..TransactionFilter::default()
    };
    let page = TransactionService::new(api)
        .list(&filter)
        .await
        .into_result()
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].amount, 15000.0);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next);
    assert!(page.has_prev);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_prediction_days_are_clamped() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/predictions/income")
        .match_query(Matcher::UrlEncoded("days".into(), "365".into()))
        .with_status(200)
        .with_body(json!({"data": {"predictions": []}}).to_string())
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api/v1", server.url()));
    let response = PredictionService::new(api).income(1000).await;

    assert!(response.success);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ids_are_encoded_into_a_single_segment() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/api/v1/transactions/a%2Fb%3Fx")
        .with_status(200)
        .with_body(json!({"success": true}).to_string())
        .create_async()
        .await;
    let other = server
        .mock("DELETE", Matcher::Regex(r"^/api/v1/transactions/a/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api/v1", server.url()));
    let response = TransactionService::new(api).delete("a/b?x").await;

    assert!(response.success);
    delete.assert_async().await;
    other.assert_async().await;
}
