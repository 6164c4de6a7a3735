use chrono::NaiveDate;
use lead_machine_leads::{
    LeadError, LeadStatus, LeadStore, LeadUpdate, NewLead, SupabaseConfig,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "anon-key";

fn store(server: &MockServer) -> LeadStore {
    LeadStore::new(SupabaseConfig::new(server.uri(), KEY))
}

fn row(id: i64, status: &str, timestamp: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Ana",
        "email": "ana@example.com",
        "phone": null,
        "business": "Café Ana",
        "service": "Web",
        "message": "",
        "status": status,
        "city": "Desconocida",
        "timestamp": timestamp
    })
}

#[tokio::test]
async fn test_save_lead() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/leads"))
        .and(header("apikey", KEY))
        .and(header("authorization", "Bearer anon-key"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!([{
            "name": "Ana",
            "email": "ana@example.com",
            "phone": null,
            "business": "Café Ana",
            "service": "Web",
            "message": "",
            "status": "Nuevo",
            "city": "Desconocida"
        }])))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([row(
                1,
                "Nuevo",
                "2024-05-02T10:00:00+00:00",
            )])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let lead = store(&server)
        .save_lead(NewLead {
            name: "Ana".to_owned(),
            email: "ana@example.com".to_owned(),
            business: Some("Café Ana".to_owned()),
            service: Some("Web".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(lead.id, 1);
    assert_eq!(lead.status, LeadStatus::Nuevo);
}

#[tokio::test]
async fn test_get_leads_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/leads"))
        .and(query_param("select", "*"))
        .and(query_param("order", "timestamp.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(2, "Contactado", "2024-05-02T10:00:00.123456+00:00"),
            row(1, "Nuevo", "2024-05-01T09:00:00+00:00"),
        ])))
        .mount(&server)
        .await;

    let leads = store(&server).get_leads().await.unwrap();
    let ids: Vec<_> = leads.iter().map(|l| l.id).collect();
    assert_eq!(ids, [2, 1]);

    let stats = store(&server)
        .get_stats(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.today, 1);
}

#[tokio::test]
async fn test_update_lead() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/leads"))
        .and(query_param("id", "eq.2"))
        .and(body_json(json!({ "status": "Cerrado" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([row(
                2,
                "Cerrado",
                "2024-05-02T10:00:00+00:00",
            )])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(query_param("id", "eq.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store(&server);
    let lead = store
        .update_lead(2, &LeadUpdate::status(LeadStatus::Cerrado))
        .await
        .unwrap();
    assert_eq!(lead.status, LeadStatus::Cerrado);

    let err = store
        .update_lead(99, &LeadUpdate::status(LeadStatus::Cerrado))
        .await
        .unwrap_err();
    assert!(matches!(err, LeadError::NotFound(99)));

    let err = store.update_lead(2, &LeadUpdate::default()).await.unwrap_err();
    assert!(matches!(err, LeadError::Invalid(_)));
}

#[tokio::test]
async fn test_delete_lead() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/leads"))
        .and(query_param("id", "eq.3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).delete_lead(3).await.unwrap();
}

#[tokio::test]
async fn test_database_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid API key",
            "hint": "Double check your Supabase `anon` key."
        })))
        .mount(&server)
        .await;

    let err = store(&server).get_leads().await.unwrap_err();
    match err {
        LeadError::Database { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_leads_tolerates_foreign_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(3, "Nuevo", "2024-05-02T10:00:00+00:00"),
            row(2, "Ganado", "2024-05-01T12:00:00+00:00"),
            row(1, "Cerrado", "2024-05-01T09:00:00.123456"),
        ])))
        .mount(&server)
        .await;

    let leads = store(&server).get_leads().await.unwrap();
    let statuses: Vec<_> = leads.iter().map(|l| l.status).collect();
    assert_eq!(
        statuses,
        [LeadStatus::Nuevo, LeadStatus::Otro, LeadStatus::Cerrado]
    );
    assert_eq!(
        leads[2].timestamp.to_rfc3339(),
        "2024-05-01T09:00:00.123456+00:00"
    );

    let stats = store(&server)
        .get_stats(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.today, 2);
    assert_eq!(stats.by_status[&LeadStatus::Nuevo], 1);
    assert_eq!(stats.by_status[&LeadStatus::Cerrado], 1);
    assert!(!stats.by_status.contains_key(&LeadStatus::Otro));
}

#[tokio::test]
async fn test_unreadable_rows_are_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Ana" }
        ])))
        .mount(&server)
        .await;

    let err = store(&server).get_leads().await.unwrap_err();
    assert!(matches!(err, LeadError::Decode(_)), "{err:?}");
    assert!(err.to_string().starts_with("unexpected database response"));
}
