// crm-client/tests/workflows.rs
// Campaign submission, collection views and the session shell

mod support;

use std::sync::Arc;
use std::time::Duration;

use crm_client::{
    Access, Audience, CampaignBoard, CampaignComposer, CampaignListView, ClientConfig,
    Combinator, ConnectionMonitor, ConnectionStatus, CrmApi, CustomerDirectory, CustomerListView,
    MIN_CHECK_INTERVAL, Notice, Rule, RuleEditor, RuleField, RuleOperator, SessionGuard,
};
use serde_json::json;
use shared::models::CustomerCreate;
use support::{MockHttp, Reply, campaign_json, customer_json};
use tokio_util::sync::CancellationToken;

const CAMPAIGNS: &str = "/api/campaigns";
const CUSTOMERS: &str = "/api/customers";

fn audience() -> Audience {
    Audience::with_rules(
        vec![Rule::new(RuleField::TotalSpend, RuleOperator::GreaterThan, 1000)],
        Combinator::And,
    )
}

// ========== Campaigns ==========

#[tokio::test]
async fn test_validation_failures_make_no_calls() {
    let api = CrmApi::new(MockHttp::new());
    let mut board = CampaignBoard::new();
    let mut composer = CampaignComposer::new();
    composer.open();

    composer.form_mut().name = "Spring sale".into();
    composer.form_mut().message_template = "Hi {{name}}".into();
    let err = composer
        .submit(&api, &Audience::new(), &mut board)
        .await
        .unwrap_err();
    assert_eq!(
        Notice::for_action("create campaign", &err).message,
        "Please add at least one rule before creating a campaign."
    );

    composer.form_mut().message_template = "   ".into();
    let err = composer.submit(&api, &audience(), &mut board).await.unwrap_err();
    assert!(err.is_validation());

    assert!(api.http().calls().is_empty());
    assert!(composer.is_open());
}

#[tokio::test]
async fn test_submit_sends_snapshot_and_reloads_board() {
    let http = MockHttp::new()
        .on("POST", CAMPAIGNS, Reply::Json(campaign_json("k1", "Spring sale")))
        .on("GET", CAMPAIGNS, Reply::Json(json!([campaign_json("k1", "Spring sale")])));
    let api = CrmApi::new(http);
    let mut board = CampaignBoard::new();
    let mut composer = CampaignComposer::new();
    composer.open();
    composer.form_mut().name = "  Spring sale  ".into();
    composer.form_mut().message_template = "  Hi {{name}}  ".into();

    let mut editor = RuleEditor::with_audience(audience());
    let campaign = composer
        .submit(&api, editor.audience(), &mut board)
        .await
        .unwrap();
    assert_eq!(campaign.id, "k1");

    // Later edits never reach the submitted campaign
    editor.add_rule();

    let posted = api.http().calls_to("POST", CAMPAIGNS);
    assert_eq!(posted.len(), 1);
    assert_eq!(
        posted[0].body,
        Some(json!({
            "name": "  Spring sale  ",
            "audience": {
                "rules": [{"field": "totalSpend", "operator": ">", "value": 1000}],
                "combinator": "$and"
            },
            "messageTemplate": "  Hi {{name}}  "
        }))
    );
    assert_eq!(api.http().calls_to("GET", CAMPAIGNS).len(), 1);

    assert!(!composer.is_open());
    assert!(composer.form().name.is_empty());
    assert!(composer.form().message_template.is_empty());

    match board.view() {
        CampaignListView::Cards(cards) => {
            assert_eq!(cards.len(), 1);
            assert_eq!(cards[0].audience_size, "1,234");
            assert_eq!(cards[0].sent, 10);
            assert_eq!(cards[0].failed, 2);
            assert_eq!(cards[0].rules, vec!["totalSpend > 1000".to_string()]);
            assert!(cards[0].updated.is_none());
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_auth_failures_keep_form() {
    for status in [401, 404] {
        let http = MockHttp::new().on("POST", CAMPAIGNS, Reply::Status(status, "nope".into()));
        let api = CrmApi::new(http);
        let mut board = CampaignBoard::new();
        let mut composer = CampaignComposer::new();
        composer.open();
        composer.form_mut().name = "Spring sale".into();
        composer.form_mut().message_template = "Hi".into();

        let err = composer.submit(&api, &audience(), &mut board).await.unwrap_err();
        assert!(err.is_auth_required(), "status {status}");
        assert!(composer.is_open());
        assert_eq!(composer.form().name, "Spring sale");
        assert!(api.http().calls_to("GET", CAMPAIGNS).is_empty());
    }
}

#[tokio::test]
async fn test_submit_survives_reload_failure() {
    let http = MockHttp::new()
        .on("POST", CAMPAIGNS, Reply::Json(campaign_json("k1", "Spring sale")))
        .on("GET", CAMPAIGNS, Reply::Status(500, "boom".into()));
    let api = CrmApi::new(http);
    let mut board = CampaignBoard::new();
    let mut composer = CampaignComposer::new();
    composer.form_mut().name = "Spring sale".into();
    composer.form_mut().message_template = "Hi".into();

    assert!(composer.submit(&api, &audience(), &mut board).await.is_ok());
    assert!(board.campaigns().is_empty());
}

// ========== Customers ==========

#[tokio::test]
async fn test_directory_search_and_views() {
    let http = MockHttp::new().on(
        "GET",
        CUSTOMERS,
        Reply::Json(json!([
            customer_json("c1", "Asha Rao", "asha@example.com"),
            customer_json("c2", "Ben Ode", "ben@shop.io"),
        ])),
    );
    let api = CrmApi::new(http);
    let mut directory = CustomerDirectory::new();
    assert_eq!(directory.reload(&api).await.unwrap(), 2);

    directory.set_search("SHOP");
    match directory.view() {
        CustomerListView::Cards(cards) => {
            assert_eq!(cards.len(), 1);
            assert_eq!(cards[0].name, "Ben Ode");
            assert_eq!(cards[0].total_spend, "$1,250.50");
            assert_eq!(cards[0].last_purchase, "Never");
        }
        other => panic!("unexpected view {other:?}"),
    }

    directory.set_search("nobody");
    assert!(matches!(
        directory.view(),
        CustomerListView::Empty { title: "No customers found", .. }
    ));
}

#[tokio::test]
async fn test_delete_reloads_directory() {
    let http = MockHttp::new()
        .on("DELETE", "/api/customers/c1", Reply::Json(serde_json::Value::Null))
        .on("GET", CUSTOMERS, Reply::Json(json!([customer_json("c2", "Ben Ode", "ben@shop.io")])));
    let api = CrmApi::new(http);
    let mut directory = CustomerDirectory::new();

    directory.delete(&api, "c1").await.unwrap();
    assert_eq!(directory.customers().len(), 1);
    assert_eq!(directory.customers()[0].id, "c2");
}

#[tokio::test]
async fn test_load_failure_clears_list() {
    let http = MockHttp::new()
        .on("GET", CUSTOMERS, Reply::Json(json!([customer_json("c1", "Asha", "a@x.io")])))
        .on("GET", CUSTOMERS, Reply::Network);
    let api = CrmApi::new(http);
    let mut directory = CustomerDirectory::new();

    directory.reload(&api).await.unwrap();
    assert_eq!(directory.customers().len(), 1);
    assert!(directory.reload(&api).await.unwrap_err().is_network());
    assert!(directory.customers().is_empty());
}

#[tokio::test]
async fn test_create_survives_refresh_failure() {
    let http = MockHttp::new()
        .on("GET", CUSTOMERS, Reply::Json(json!([customer_json("c1", "Asha", "a@x.io")])))
        .on("GET", CUSTOMERS, Reply::Status(500, "Internal Server Error".into()))
        .on("POST", CUSTOMERS, Reply::Json(customer_json("c9", "Nia Vale", "nia@shop.io")));
    let api = CrmApi::new(http);
    let mut directory = CustomerDirectory::new();
    directory.reload(&api).await.unwrap();

    let data = CustomerCreate {
        name: "Nia Vale".into(),
        email: "nia@shop.io".into(),
        phone: String::new(),
    };
    let created = directory.create(&api, &data).await.unwrap();
    assert_eq!(created.id, "c9");
    assert_eq!(api.http().calls_to("POST", CUSTOMERS).len(), 1);

    // The list from before the failed refresh is kept
    assert_eq!(directory.customers().len(), 1);
    assert_eq!(directory.customers()[0].id, "c1");
}

// ========== Session ==========

#[tokio::test]
async fn test_guard_redirects_when_signed_out() {
    let config = ClientConfig::new("http://crm.test");
    let guard = SessionGuard::new(&config);

    let api = CrmApi::new(MockHttp::new().on("GET", CUSTOMERS, Reply::Status(302, String::new())));
    assert_eq!(
        guard.require(&api).await.unwrap(),
        Access::Redirect {
            login_url: "http://crm.test/login".into()
        }
    );

    let api = CrmApi::new(MockHttp::new().on("GET", CUSTOMERS, Reply::Json(json!([]))));
    assert_eq!(guard.require(&api).await.unwrap(), Access::Granted);

    let api = CrmApi::new(MockHttp::new().on("GET", CUSTOMERS, Reply::Network));
    assert!(guard.require(&api).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_connection_monitor_tracks_status() {
    let http = MockHttp::new()
        .on("GET", CUSTOMERS, Reply::Json(json!([])))
        .on("GET", CUSTOMERS, Reply::Status(401, String::new()));
    let api = Arc::new(CrmApi::new(http));
    let shutdown = CancellationToken::new();
    let monitor = ConnectionMonitor::spawn(Arc::clone(&api), Duration::from_secs(30), shutdown.clone());
    assert_eq!(monitor.status(), ConnectionStatus::Unknown);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(monitor.status(), ConnectionStatus::Connected);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(monitor.status(), ConnectionStatus::Unauthenticated);

    shutdown.cancel();
    monitor.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_is_raised_to_minimum() {
    let http = MockHttp::new()
        .on("GET", CUSTOMERS, Reply::Json(json!([])))
        .on("GET", CUSTOMERS, Reply::Network);
    let api = Arc::new(CrmApi::new(http));
    let shutdown = CancellationToken::new();
    let monitor = ConnectionMonitor::spawn(Arc::clone(&api), Duration::ZERO, shutdown.clone());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(monitor.status(), ConnectionStatus::Connected);
    assert_eq!(api.http().calls_to("GET", CUSTOMERS).len(), 1);

    tokio::time::sleep(MIN_CHECK_INTERVAL).await;
    assert_eq!(monitor.status(), ConnectionStatus::Disconnected);
    assert_eq!(api.http().calls_to("GET", CUSTOMERS).len(), 2);

    shutdown.cancel();
    monitor.join().await;
}

// ========== Text to rules ==========

#[tokio::test]
async fn test_generated_rules_replace_editor_contents() {
    let http = MockHttp::new().on(
        "POST",
        "/api/ai/text-to-rules",
        Reply::Json(json!({
            "rules": [
                {"field": "totalSpend", "operator": ">", "value": 1000},
                {"field": "visits", "operator": ">=", "value": 3}
            ],
            "combinator": "$or"
        })),
    );
    let api = CrmApi::new(http);
    let mut editor = RuleEditor::new();
    editor.add_rule();
    let mut changes = editor.subscribe();

    assert!(!editor.generate_from_text(&api, "   ").await.unwrap());
    assert!(api.http().calls().is_empty());

    assert!(editor.generate_from_text(&api, "big spenders or regulars").await.unwrap());
    assert_eq!(
        api.http().calls()[0].body,
        Some(json!({"text": "big spenders or regulars"}))
    );
    assert_eq!(editor.rules().len(), 2);
    assert_eq!(editor.combinator(), Combinator::Or);
    assert!(changes.has_changed().unwrap());
    assert_eq!(changes.borrow_and_update().len(), 2);
}

#[tokio::test]
async fn test_failed_generation_keeps_rules() {
    let http = MockHttp::new().on("POST", "/api/ai/text-to-rules", Reply::Status(500, "down".into()));
    let api = CrmApi::new(http);
    let mut editor = RuleEditor::new();
    editor.add_rule();

    let err = editor.generate_from_text(&api, "anyone").await.unwrap_err();
    assert_eq!(
        Notice::for_action("generate rules", &err).message,
        "Failed to generate rules. Please try again."
    );
    assert_eq!(editor.rules().len(), 1);
}
