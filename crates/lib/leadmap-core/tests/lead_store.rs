use leadmap_core::control::{LeadControlPlane, RecordEnrichmentRequest, SaveLeadRequest};
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn build_control_plane(db_name: &str) -> LeadControlPlane<Db> {
    let db = Surreal::new::<Mem>(())
        .await
        .expect("failed to create in-memory surrealdb instance");
    db.use_ns("leadmap")
        .use_db(db_name)
        .await
        .expect("failed to select surrealdb namespace/db");
    LeadControlPlane::new(db)
}

fn save_request(company: &str, domain: &str) -> SaveLeadRequest {
    SaveLeadRequest {
        lead_id: None,
        company: Some(company.to_string()),
        domain: Some(domain.to_string()),
        sector: Some("saas".to_string()),
        employee_count: Some(80),
        has_funding: Some(true),
        score: None,
        status: Some("new".to_string()),
        notes: None,
        signals: vec!["hiring SDRs".to_string()],
    }
}

#[tokio::test]
async fn lead_roundtrip_merges_on_upsert() {
    let control = build_control_plane("roundtrip").await;

    let saved = control
        .save_lead(save_request("Acme Rocketry", "acme.dev"))
        .await
        .expect("save should succeed");
    assert_eq!(saved.lead_id, "acme-dev");
    assert_eq!(saved.company.as_deref(), Some("Acme Rocketry"));
    assert!(saved.created_at.is_some());

    let update = SaveLeadRequest {
        lead_id: None,
        company: None,
        domain: Some("acme.dev".to_string()),
        sector: None,
        employee_count: None,
        has_funding: None,
        score: Some(72.5),
        status: Some("qualified".to_string()),
        notes: Some("intro call booked".to_string()),
        signals: vec!["HIRING sdrs".to_string(), "new CTO".to_string()],
    };
    let updated = control.save_lead(update).await.expect("update should succeed");

    assert_eq!(updated.lead_id, "acme-dev");
    assert_eq!(updated.company.as_deref(), Some("Acme Rocketry"));
    assert_eq!(updated.status.as_deref(), Some("qualified"));
    assert_eq!(updated.created_at, saved.created_at);
    assert_eq!(
        updated.signals,
        vec!["hiring SDRs".to_string(), "new CTO".to_string()]
    );

    let fetched = control
        .get_lead("acme-dev")
        .await
        .expect("get should succeed")
        .expect("lead should exist");
    assert_eq!(fetched.notes.as_deref(), Some("intro call booked"));
}

#[tokio::test]
async fn lead_search_matches_company_and_domain() {
    let control = build_control_plane("search").await;
    control
        .save_lead(save_request("Acme Rocketry", "acme.dev"))
        .await
        .expect("save acme");
    control
        .save_lead(save_request("Nimbus Cloud", "nimbus.io"))
        .await
        .expect("save nimbus");

    let all = control.list_leads(10).await.expect("list should succeed");
    assert_eq!(all.len(), 2);

    let hits = control
        .search_leads("acme*", 10)
        .await
        .expect("search should succeed");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].lead_id, "acme-dev");

    let by_sector = control
        .search_leads("saas", 10)
        .await
        .expect("sector search should succeed");
    assert_eq!(by_sector.len(), 2);

    let none = control
        .search_leads("zephyr*", 10)
        .await
        .expect("empty search should succeed");
    assert!(none.is_empty());
}

#[tokio::test]
async fn missing_lead_identity_is_rejected() {
    let control = build_control_plane("invalid").await;
    let request = SaveLeadRequest {
        lead_id: None,
        company: None,
        domain: None,
        sector: None,
        employee_count: None,
        has_funding: None,
        score: None,
        status: None,
        notes: None,
        signals: Vec::new(),
    };
    let err = control.save_lead(request).await.expect_err("save should fail");
    assert!(err.to_string().contains("lead_id, domain, or company"));
}

#[tokio::test]
async fn enrichments_are_recorded_per_lead() {
    let control = build_control_plane("enrich").await;
    control
        .save_lead(save_request("Acme Rocketry", "acme.dev"))
        .await
        .expect("save acme");

    let recorded = control
        .record_enrichment(RecordEnrichmentRequest {
            lead_id: "acme-dev".to_string(),
            source_url: "https://api.example.com/acme".to_string(),
            name: Some("Acme Rocketry".to_string()),
            summary: Some("Builds rockets.".to_string()),
            payload: Some(json!({"employees": 80})),
        })
        .await
        .expect("record should succeed");
    assert!(!recorded.enrichment_id.is_empty());
    assert!(recorded.fetched_at.is_some());

    let listed = control
        .list_enrichments("acme-dev", 10)
        .await
        .expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].summary.as_deref(), Some("Builds rockets."));

    let err = control
        .record_enrichment(RecordEnrichmentRequest {
            lead_id: "  ".to_string(),
            source_url: "https://api.example.com/x".to_string(),
            name: None,
            summary: None,
            payload: None,
        })
        .await
        .expect_err("blank lead_id should fail");
    assert!(err.to_string().contains("lead_id is required"));
}
