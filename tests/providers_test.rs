use chrono::{NaiveDate, Utc};
use lunance_client::error::NETWORK_ERROR_MESSAGE;
use lunance_client::models::category::CategoryUpdate;
use lunance_client::models::transaction::{
    TransactionCreate, TransactionFilter, TransactionSortOrder, TransactionType,
};
use lunance_client::models::university::{FacultyCreate, MajorCreate};
use lunance_client::providers::{
    AuthProvider, CategoryProvider, ChatProvider, ConnectionStatus, DashboardProvider,
    PredictionProvider, TransactionProvider, UniversityProvider,
};
use lunance_client::validation::EmailPolicy;
use lunance_client::ApiClient;
use mockito::{Matcher, Server};
use serde_json::json;

fn client_for(server: &Server) -> ApiClient {
    ApiClient::new(format!("{}/api/v1", server.url()))
}

#[tokio::test]
async fn test_login_validation_runs_before_any_request() {
    let auth = AuthProvider::new(
        ApiClient::new("http://127.0.0.1:1/api/v1"),
        EmailPolicy::AcademicOnly,
    );

    let error = auth.login("bukan-email", "").await.unwrap_err();
    assert!(error.contains("Format email tidak valid"));
    assert_ne!(error, NETWORK_ERROR_MESSAGE);

    let state = auth.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some(error.as_str()));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_login_then_logout_updates_session() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/v1/auth/login")
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "user": {"id": "u1", "email": "sari@itb.ac.id", "full_name": "Sari"},
                    "tokens": {"access_token": "a1", "refresh_token": "r1"}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _logout = server
        .mock("POST", "/api/v1/auth/logout")
        .with_status(200)
        .with_body(json!({"success": true, "data": null}).to_string())
        .create_async()
        .await;

    let api = client_for(&server);
    let auth = AuthProvider::new(api.clone(), EmailPolicy::AcademicOnly);

    let user = auth.login(" Sari@ITB.ac.id ", "Rahasia123").await.unwrap();
    assert_eq!(user.id, "u1");
    assert!(auth.is_authenticated());
    assert_eq!(api.token().await.as_deref(), Some("a1"));

    auth.logout().await;
    assert!(!auth.is_authenticated());
    assert!(auth.current_user().is_none());
    assert!(!api.is_authenticated().await);
}

#[tokio::test]
async fn test_transaction_create_and_delete() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/api/v1/transactions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "items": [{"id": "t1", "amount": 20000, "transaction_type": "expense",
                               "transaction_date": "2024-03-01T10:00:00Z"}],
                    "total": 1, "page": 1, "per_page": 20
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/api/v1/transactions")
        .match_body(Matcher::PartialJson(json!({"transaction_date": "2024-03-05"})))
        .with_status(201)
        .with_body(
            json!({
                "data": {"id": "t2", "amount": 35000, "transaction_type": "expense",
                         "transaction_date": "2024-03-05T00:00:00Z"}
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _delete = server
        .mock("DELETE", "/api/v1/transactions/t1")
        .with_status(200)
        .with_body(json!({"success": true, "message": "Transaksi dihapus"}).to_string())
        .create_async()
        .await;

    let provider = TransactionProvider::new(client_for(&server));
    provider.load(TransactionFilter::default()).await.unwrap();
    assert_eq!(provider.state().data.items.len(), 1);

    let created = provider
        .create(TransactionCreate {
            category_id: "cat-food".to_string(),
            transaction_type: TransactionType::Expense,
            amount: 35000.0,
            description: "Makan siang".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, "t2");

    let state = provider.state().data;
    assert_eq!(state.total, 2);
    // Newest first by default.
    assert_eq!(state.items[0].id, "t2");

    provider.delete("t1").await.unwrap();
    let state = provider.state().data;
    assert_eq!(state.total, 1);
    assert_eq!(state.items.len(), 1);
}

#[tokio::test]
async fn test_invalid_transaction_is_rejected_locally() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/v1/transactions")
        .expect(0)
        .create_async()
        .await;

    let provider = TransactionProvider::new(client_for(&server));
    let error = provider
        .create(TransactionCreate {
            category_id: "cat-food".to_string(),
            transaction_type: TransactionType::Expense,
            amount: 0.0,
            description: "Gratis".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        })
        .await
        .unwrap_err();

    assert_eq!(error, "Jumlah harus lebih dari 0");
    create.assert_async().await;
}

#[tokio::test]
async fn test_global_category_is_admin_only() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/api/v1/categories")
        .with_status(200)
        .with_body(
            json!({
                "data": [
                    {"id": "g1", "name": "Makanan", "is_global": true},
                    {"id": "p1", "name": "Kos", "is_global": false, "user_id": "u1"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/api/v1/categories/g1")
        .expect(0)
        .create_async()
        .await;
    let _update_own = server
        .mock("PUT", "/api/v1/categories/p1")
        .with_status(200)
        .with_body(
            json!({"data": {"id": "p1", "name": "Kost", "is_global": false, "user_id": "u1"}})
                .to_string(),
        )
        .create_async()
        .await;

    let provider = CategoryProvider::new(client_for(&server));
    provider.load().await.unwrap();

    let (global, personal) = provider.by_scope();
    assert_eq!(global.len(), 1);
    assert_eq!(personal.len(), 1);

    let rename = CategoryUpdate {
        name: Some("Kost".to_string()),
        ..CategoryUpdate::default()
    };
    let error = provider
        .update("g1", rename.clone(), "u1", false)
        .await
        .unwrap_err();
    assert_eq!(error, "Kategori global hanya dapat diubah oleh admin");
    update.assert_async().await;

    let updated = provider.update("p1", rename, "u1", false).await.unwrap();
    assert_eq!(updated.name, "Kost");
    assert_eq!(provider.find("p1").map(|c| c.name), Some("Kost".to_string()));
}

#[tokio::test]
async fn test_chat_send_requires_connection() {
    let mut server = Server::new_async().await;
    let _health = server
        .mock("GET", "/api/v1/health")
        .with_status(200)
        .with_body(json!({"status": "healthy"}).to_string())
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/api/v1/chat/conversations")
        .with_status(201)
        .with_body(json!({"data": {"id": "c1", "title": "Anggaran"}}).to_string())
        .create_async()
        .await;
    let _send = server
        .mock("POST", "/api/v1/chat/conversations/c1/messages")
        .match_body(Matcher::Json(json!({"content": "Bagaimana cara menabung?"})))
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "user_message": {"id": "m1", "conversation_id": "c1", "sender": "user",
                                     "content": "Bagaimana cara menabung?",
                                     "created_at": "2024-03-01T10:00:00Z"},
                    "assistant_message": {"id": "m2", "conversation_id": "c1", "sender": "assistant",
                                          "content": "Sisihkan 20% dari uang saku.",
                                          "created_at": "2024-03-01T10:00:02Z"}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let chat = ChatProvider::new(client_for(&server));
    assert!(chat.send_message("Halo").await.is_err());

    chat.connect().await.unwrap();
    assert_eq!(chat.state().data.connection, ConnectionStatus::Connected);

    chat.start_conversation(Some("Anggaran".to_string()))
        .await
        .unwrap();
    chat.send_message("  Bagaimana cara menabung?  ").await.unwrap();

    let state = chat.state().data;
    assert_eq!(state.messages.len(), 2);
    assert!(state.messages[0].is_from_user());
    assert!(!state.is_sending);
    let conversation = state.active_conversation().unwrap();
    assert_eq!(conversation.message_count, 2);
    assert_eq!(
        conversation.last_message.as_deref(),
        Some("Sisihkan 20% dari uang saku.")
    );

    chat.disconnect();
    let error = chat.send_message("Lagi").await.unwrap_err();
    assert_eq!(error, "Koneksi chat terputus. Ketuk sambungkan ulang.");
}

#[tokio::test]
async fn test_chat_connect_fails_when_unreachable() {
    let chat = ChatProvider::new(ApiClient::new("http://127.0.0.1:1/api/v1"));
    let error = chat.connect().await.unwrap_err();

    assert_eq!(error, NETWORK_ERROR_MESSAGE);
    assert_eq!(chat.state().data.connection, ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_adding_major_updates_counts() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/api/v1/universities")
        .with_status(200)
        .with_body(
            json!({"data": [{"id": "u1", "name": "Universitas Indonesia",
                             "faculty_count": 1, "major_count": 1, "is_active": true}]})
            .to_string(),
        )
        .create_async()
        .await;
    let _get = server
        .mock("GET", "/api/v1/universities/u1")
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "id": "u1", "name": "Universitas Indonesia", "is_active": true,
                    "faculties": [{"id": "f1", "name": "Fakultas Teknik",
                                   "majors": [{"id": "m1", "name": "Teknik Sipil"}]}]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _add = server
        .mock("POST", "/api/v1/admin/faculties/f1/majors")
        .with_status(201)
        .with_body(json!({"data": {"id": "m2", "name": "Teknik Mesin"}}).to_string())
        .create_async()
        .await;

    let provider = UniversityProvider::new(client_for(&server));
    provider.load().await.unwrap();
    assert_eq!(provider.search("indonesia").len(), 1);
    assert!(provider.search("gadjah").is_empty());

    provider.select("u1").await.unwrap();
    provider
        .add_major(
            "f1",
            MajorCreate {
                name: "Teknik Mesin".to_string(),
            },
        )
        .await
        .unwrap();

    let state = provider.state().data;
    assert_eq!(state.items[0].major_count, 2);
    assert_eq!(state.selected.unwrap().major_count(), 2);
}

#[tokio::test]
async fn test_dashboard_refresh_keeps_partial_results() {
    let mut server = Server::new_async().await;
    let _summary = server
        .mock("GET", "/api/v1/dashboard/summary")
        .with_status(200)
        .with_body(
            json!({
                "data": {"current_balance": 1500000, "monthly_income": 2000000,
                         "monthly_expense": 500000, "transaction_count": 12}
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _budget = server
        .mock("GET", "/api/v1/dashboard/budget")
        .with_status(500)
        .create_async()
        .await;

    let provider = DashboardProvider::new(client_for(&server));
    let error = provider.refresh().await.unwrap_err();
    assert_eq!(error, "Terjadi kesalahan pada server. Coba lagi nanti.");

    let state = provider.state();
    assert_eq!(state.error.as_deref(), Some(error.as_str()));
    let summary = state.data.summary.unwrap();
    assert_eq!(summary.monthly_net(), 1500000.0);
    assert!(state.data.budget.is_none());
}

async fn logged_in(server: &mut Server, expires_in: i64) -> (ApiClient, AuthProvider) {
    let _login = server
        .mock("POST", "/api/v1/auth/login")
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "user": {"id": "u1", "email": "sari@itb.ac.id", "full_name": "Sari"},
                    "tokens": {"access_token": "a1", "refresh_token": "r1", "expires_in": expires_in}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = client_for(server);
    let auth = AuthProvider::new(api.clone(), EmailPolicy::AcademicOnly);
    auth.login("sari@itb.ac.id", "Rahasia123").await.unwrap();
    (api, auth)
}

#[tokio::test]
async fn test_refresh_skipped_while_token_is_fresh() {
    let mut server = Server::new_async().await;
    let refresh = server
        .mock("POST", "/api/v1/auth/refresh")
        .expect(0)
        .create_async()
        .await;

    let (api, auth) = logged_in(&mut server, 3600).await;
    assert_eq!(auth.refresh_if_needed(Utc::now()).await, Ok(false));
    assert_eq!(api.token().await.as_deref(), Some("a1"));
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_refresh_within_leeway_swaps_access_token() {
    let mut server = Server::new_async().await;
    let refresh = server
        .mock("POST", "/api/v1/auth/refresh")
        .match_body(Matcher::Json(json!({"refresh_token": "r1"})))
        .with_status(200)
        .with_body(json!({"data": {"access_token": "a2", "expires_in": 3600}}).to_string())
        .create_async()
        .await;

    // 30 seconds left is inside the 60 second leeway.
    let (api, auth) = logged_in(&mut server, 30).await;
    assert_eq!(auth.refresh_if_needed(Utc::now()).await, Ok(true));
    refresh.assert_async().await;

    assert_eq!(api.token().await.as_deref(), Some("a2"));
    let state = auth.state();
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
    let tokens = state.data.tokens.unwrap();
    assert_eq!(tokens.access_token, "a2");
    assert_eq!(tokens.refresh_token, "r1");
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn test_rejected_refresh_clears_session() {
    let mut server = Server::new_async().await;
    let _refresh = server
        .mock("POST", "/api/v1/auth/refresh")
        .with_status(401)
        .with_body(json!({"detail": "Refresh token tidak valid"}).to_string())
        .create_async()
        .await;

    let (api, auth) = logged_in(&mut server, 30).await;
    let error = auth.refresh_if_needed(Utc::now()).await.unwrap_err();
    assert_eq!(error, "Refresh token tidak valid");

    assert!(!auth.is_authenticated());
    assert!(auth.current_user().is_none());
    assert!(!api.is_authenticated().await);
    let state = auth.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Refresh token tidak valid"));
}

#[tokio::test]
async fn test_restore_loads_user_for_stored_token() {
    let mut server = Server::new_async().await;
    let me = server
        .mock("GET", "/api/v1/auth/me")
        .match_header("authorization", "Bearer stored-token")
        .with_status(200)
        .with_body(json!({"data": {"id": "u7", "email": "dina@ugm.ac.id", "full_name": "Dina"}}).to_string())
        .create_async()
        .await;

    let api = client_for(&server);
    let auth = AuthProvider::new(api.clone(), EmailPolicy::AcademicOnly);
    let user = auth.restore("stored-token").await.unwrap();
    me.assert_async().await;

    assert_eq!(user.id, "u7");
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_user().map(|u| u.full_name), Some("Dina".to_string()));
    assert_eq!(api.token().await.as_deref(), Some("stored-token"));
}

#[tokio::test]
async fn test_restore_with_expired_token_signs_out() {
    let mut server = Server::new_async().await;
    let _me = server
        .mock("GET", "/api/v1/auth/me")
        .with_status(401)
        .create_async()
        .await;

    let api = client_for(&server);
    let auth = AuthProvider::new(api.clone(), EmailPolicy::AcademicOnly);
    let error = auth.restore("expired-token").await.unwrap_err();

    assert_eq!(error, "Sesi Anda telah berakhir. Silakan masuk kembali.");
    assert!(!auth.is_authenticated());
    assert!(!api.is_authenticated().await);
    let state = auth.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some(error.as_str()));
}

fn transaction_page(page: u32, items: serde_json::Value) -> String {
    json!({"data": {"items": items, "total": 3, "page": page, "per_page": 2}}).to_string()
}

#[tokio::test]
async fn test_load_more_appends_until_last_page() {
    let mut server = Server::new_async().await;
    let _first = server
        .mock("GET", "/api/v1/transactions")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(transaction_page(
            1,
            json!([
                {"id": "t1", "amount": 50000, "transaction_date": "2024-03-02T08:00:00Z"},
                {"id": "t2", "amount": 12000, "transaction_date": "2024-03-01T08:00:00Z"}
            ]),
        ))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/v1/transactions")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(transaction_page(
            2,
            json!([{"id": "t3", "amount": 80000, "transaction_date": "2024-03-03T08:00:00Z"}]),
        ))
        .expect(1)
        .create_async()
        .await;

    let provider = TransactionProvider::new(client_for(&server));
    provider
        .load(TransactionFilter {
            page: Some(1),
            per_page: Some(2),
            ..TransactionFilter::default()
        })
        .await
        .unwrap();
    assert!(provider.state().data.has_next);

    provider.load_more().await.unwrap();
    let state = provider.state().data;
    let ids: Vec<_> = state.items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["t3", "t1", "t2"]);
    assert_eq!(state.page, 2);
    assert!(!state.has_next);

    // Last page reached: nothing is requested.
    provider.load_more().await.unwrap();
    second.assert_async().await;

    provider.set_sort_order(TransactionSortOrder::AmountLowest);
    let state = provider.state().data;
    let ids: Vec<_> = state.items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["t2", "t1", "t3"]);
    assert_eq!(state.sort_order, TransactionSortOrder::AmountLowest);
}

#[tokio::test]
async fn test_failed_load_more_keeps_loaded_items() {
    let mut server = Server::new_async().await;
    let _first = server
        .mock("GET", "/api/v1/transactions")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(transaction_page(1, json!([{"id": "t1"}, {"id": "t2"}])))
        .create_async()
        .await;
    let _second = server
        .mock("GET", "/api/v1/transactions")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(500)
        .create_async()
        .await;

    let provider = TransactionProvider::new(client_for(&server));
    provider
        .load(TransactionFilter {
            page: Some(1),
            per_page: Some(2),
            ..TransactionFilter::default()
        })
        .await
        .unwrap();

    let error = provider.load_more().await.unwrap_err();
    assert_eq!(error, "Terjadi kesalahan pada server. Coba lagi nanti.");
    let state = provider.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some(error.as_str()));
    assert_eq!(state.data.items.len(), 2);
    assert_eq!(state.data.page, 1);
    assert!(state.data.has_next);
}

#[tokio::test]
async fn test_load_more_stops_at_highest_page_number() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/v1/transactions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"data": {"items": [], "total": 1, "page": u32::MAX, "has_next": true}})
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let provider = TransactionProvider::new(client_for(&server));
    provider.load(TransactionFilter::default()).await.unwrap();
    assert_eq!(provider.state().data.page, u32::MAX);

    assert_eq!(provider.load_more().await, Ok(()));
    list.assert_async().await;
}

async fn prediction_mocks(server: &mut Server, income_status: usize) -> Vec<mockito::Mock> {
    let mut mocks = Vec::new();
    for (path, status) in [
        ("/api/v1/predictions/income", income_status),
        ("/api/v1/predictions/expense", 200),
        ("/api/v1/predictions/budget", 200),
        ("/api/v1/predictions/savings", 200),
    ] {
        mocks.push(
            server
                .mock("GET", path)
                .match_query(Matcher::UrlEncoded("days".into(), "30".into()))
                .with_status(status)
                .with_body(json!({"data": {"predictions": []}}).to_string())
                .create_async()
                .await,
        );
    }
    mocks.push(
        server
            .mock("GET", "/api/v1/analytics/budget-health")
            .with_status(200)
            .with_body(json!({"data": {"status": "healthy"}}).to_string())
            .create_async()
            .await,
    );
    mocks
}

#[tokio::test]
async fn test_load_all_fills_every_forecast() {
    let mut server = Server::new_async().await;
    let _mocks = prediction_mocks(&mut server, 200).await;

    let provider = PredictionProvider::new(client_for(&server));
    provider.load_all(30).await.unwrap();

    let state = provider.state();
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
    assert_eq!(state.data.days, 30);
    assert!(state.data.income.is_some());
    assert!(state.data.expense.is_some());
    assert!(state.data.budget.is_some());
    assert!(state.data.savings.is_some());
    assert!(state.data.budget_health.is_some());
}

#[tokio::test]
async fn test_load_all_reports_one_failed_forecast() {
    let mut server = Server::new_async().await;
    let _mocks = prediction_mocks(&mut server, 500).await;

    let provider = PredictionProvider::new(client_for(&server));
    let error = provider.load_all(30).await.unwrap_err();
    assert_eq!(error, "Terjadi kesalahan pada server. Coba lagi nanti.");

    let state = provider.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some(error.as_str()));
    assert!(state.data.income.is_none());
    assert!(state.data.expense.is_some());
    assert!(state.data.budget_health.is_some());
}

#[tokio::test]
async fn test_reconnect_reloads_conversations() {
    let mut server = Server::new_async().await;
    let _health = server
        .mock("GET", "/api/v1/health")
        .with_status(200)
        .with_body(json!({"status": "healthy"}).to_string())
        .create_async()
        .await;
    let conversations = server
        .mock("GET", "/api/v1/chat/conversations")
        .with_status(200)
        .with_body(
            json!({"data": [{"id": "c1", "title": "Anggaran"}, {"id": "c2", "title": "Tabungan"}]})
                .to_string(),
        )
        .create_async()
        .await;

    let chat = ChatProvider::new(client_for(&server));
    chat.reconnect().await.unwrap();
    conversations.assert_async().await;

    let state = chat.state();
    assert!(!state.is_loading);
    assert_eq!(state.data.connection, ConnectionStatus::Connected);
    assert_eq!(state.data.conversations.len(), 2);
}

#[tokio::test]
async fn test_reconnect_fails_when_unreachable() {
    let chat = ChatProvider::new(ApiClient::new("http://127.0.0.1:1/api/v1"));
    let error = chat.reconnect().await.unwrap_err();

    assert_eq!(error, NETWORK_ERROR_MESSAGE);
    let state = chat.state();
    assert!(!state.is_loading);
    assert_eq!(state.data.connection, ConnectionStatus::Disconnected);
    assert!(state.data.conversations.is_empty());
}

#[tokio::test]
async fn test_open_conversation_orders_messages() {
    let mut server = Server::new_async().await;
    let _messages = server
        .mock("GET", "/api/v1/chat/conversations/c1/messages")
        .with_status(200)
        .with_body(
            json!({
                "data": [
                    {"id": "m2", "conversation_id": "c1", "sender": "assistant",
                     "content": "Halo!", "created_at": "2024-03-01T10:00:02Z"},
                    {"id": "m1", "conversation_id": "c1", "sender": "user",
                     "content": "Hai", "created_at": "2024-03-01T10:00:00Z"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let chat = ChatProvider::new(client_for(&server));
    chat.open_conversation("c1").await.unwrap();

    let state = chat.state().data;
    assert_eq!(state.active_conversation_id.as_deref(), Some("c1"));
    let ids: Vec<_> = state.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["m1", "m2"]);
}

#[tokio::test]
async fn test_open_missing_conversation_keeps_selection() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/api/v1/chat/conversations/gone/messages")
        .with_status(404)
        .with_body(json!({"detail": "Percakapan tidak ditemukan"}).to_string())
        .create_async()
        .await;

    let chat = ChatProvider::new(client_for(&server));
    let error = chat.open_conversation("gone").await.unwrap_err();

    assert_eq!(error, "Percakapan tidak ditemukan");
    let state = chat.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some(error.as_str()));
    assert_eq!(state.data.active_conversation_id, None);
}

#[tokio::test]
async fn test_add_faculty_updates_counts() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/api/v1/universities")
        .with_status(200)
        .with_body(
            json!({"data": [{"id": "u1", "name": "Institut Teknologi Bandung",
                             "faculty_count": 0, "major_count": 0, "is_active": true}]})
            .to_string(),
        )
        .create_async()
        .await;
    let _get = server
        .mock("GET", "/api/v1/universities/u1")
        .with_status(200)
        .with_body(
            json!({"data": {"id": "u1", "name": "Institut Teknologi Bandung", "faculties": []}})
                .to_string(),
        )
        .create_async()
        .await;
    let _add = server
        .mock("POST", "/api/v1/admin/universities/u1/faculties")
        .match_body(Matcher::PartialJson(json!({"name": "Sekolah Bisnis"})))
        .with_status(201)
        .with_body(
            json!({"data": {"id": "f1", "name": "Sekolah Bisnis",
                            "majors": [{"id": "m1", "name": "Manajemen"}]}})
            .to_string(),
        )
        .create_async()
        .await;

    let provider = UniversityProvider::new(client_for(&server));
    provider.load().await.unwrap();
    provider.select("u1").await.unwrap();

    let faculty = provider
        .add_faculty(
            "u1",
            FacultyCreate {
                name: "Sekolah Bisnis".to_string(),
                majors: Vec::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(faculty.id, "f1");

    let state = provider.state().data;
    assert_eq!(state.items[0].faculty_count, 1);
    assert_eq!(state.items[0].major_count, 1);
    assert_eq!(state.selected.unwrap().faculties.len(), 1);
}

#[tokio::test]
async fn test_add_faculty_rejects_blank_name() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/api/v1/admin/universities/u1/faculties")
        .expect(0)
        .create_async()
        .await;

    let provider = UniversityProvider::new(client_for(&server));
    let error = provider
        .add_faculty(
            "u1",
            FacultyCreate {
                name: "   ".to_string(),
                majors: Vec::new(),
            },
        )
        .await
        .unwrap_err();

    assert!(error.contains("Nama fakultas wajib diisi"));
    assert_eq!(provider.state().error.as_deref(), Some(error.as_str()));
    add.assert_async().await;
}

#[tokio::test]
async fn test_add_faculty_surfaces_server_refusal() {
    let mut server = Server::new_async().await;
    let _add = server
        .mock("POST", "/api/v1/admin/universities/u1/faculties")
        .with_status(403)
        .with_body("{}")
        .create_async()
        .await;

    let provider = UniversityProvider::new(client_for(&server));
    let error = provider
        .add_faculty(
            "u1",
            FacultyCreate {
                name: "Fakultas Hukum".to_string(),
                majors: Vec::new(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(error, "Anda tidak memiliki akses untuk melakukan tindakan ini");
    assert!(!provider.state().is_loading);
}
