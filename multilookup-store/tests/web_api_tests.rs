use multilookup_store::{
    AssociateRequest, DisassociateRequest, QueryOptions, RemoteStoreClient, SearchEntity,
    SearchOptions, SearchQueryRequest, StoreError, StoreRequest, WebApiClient, WebApiConfig,
};
use multilookup_types::{EntityReference, WordMatch};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Config defaults ─────────────────────────────────────────────

#[test]
fn web_api_config_default() {
    let cfg = WebApiConfig::default();
    assert!(cfg.base_url.is_empty());
    assert_eq!(cfg.api_version, "9.2");
    assert_eq!(cfg.access_token, None);
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn web_api_client_requires_base_url() {
    let result = WebApiClient::new(WebApiConfig::default());
    assert!(matches!(result, Err(StoreError::Config(_))));
}

// ── Wiremock-based integration tests ────────────────────────────

fn mock_config(server: &MockServer) -> WebApiConfig {
    WebApiConfig {
        base_url: server.uri(),
        access_token: Some("test_token".to_string()),
        ..Default::default()
    }
}

fn definition(logical: &str, set: &str, singular: &str, plural: &str) -> serde_json::Value {
    json!({
        "LogicalName": logical,
        "PrimaryNameAttribute": if logical == "contact" { "fullname" } else { "name" },
        "EntitySetName": set,
        "DisplayName": {"UserLocalizedLabel": {"Label": singular}},
        "DisplayCollectionName": {"UserLocalizedLabel": {"Label": plural}}
    })
}

async fn mount_metadata(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"EntityDefinitions\(LogicalName='account'\)$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(definition("account", "accounts", "Account", "Accounts")),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"EntityDefinitions\(LogicalName='contact'\)$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(definition("contact", "contacts", "Contact", "Contacts")),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn metadata_is_resolved_and_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"EntityDefinitions\(LogicalName='account'\)$"))
        .and(query_param(
            "$select",
            "LogicalName,PrimaryNameAttribute,EntitySetName,DisplayName,DisplayCollectionName",
        ))
        .and(header("OData-Version", "4.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(definition("account", "accounts", "Account", "Accounts")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let first = client.get_entity_metadata("account").await.unwrap();
    let second = client.get_entity_metadata("account").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.primary_name_attribute, "name");
    assert_eq!(first.entity_set_name, "accounts");
    assert_eq!(first.display_name, "Account");
    assert_eq!(first.display_collection_name, "Accounts");
}

#[tokio::test]
async fn metadata_without_primary_name_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"EntityDefinitions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "LogicalName": "activitypointer",
            "EntitySetName": "activitypointers"
        })))
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let result = client.get_entity_metadata("activitypointer").await;
    assert!(matches!(result, Err(StoreError::Metadata(_))));
}

#[tokio::test]
async fn metadata_missing_entity_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"EntityDefinitions"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let err = client.get_entity_metadata("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn retrieve_multiple_applies_options_and_follows_next_link() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/data/v9.2/accounts"))
        .and(query_param("$select", "name,accountid"))
        .and(query_param("$filter", "statecode eq 0"))
        .and(bearer_token("test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"accountid": "1", "name": "Acme Corp"}],
            "@odata.nextLink": format!("{}/api/data/v9.2/accounts?$skiptoken=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/data/v9.2/accounts"))
        .and(query_param("$skiptoken", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"accountid": "42", "name": "Globex"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let options = QueryOptions::select(["name", "accountid"])
        .with_filter(Some("statecode eq 0".into()));
    let records = client.retrieve_multiple("account", &options).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], json!("Acme Corp"));
    assert_eq!(records[1]["accountid"], json!("42"));
}

#[tokio::test]
async fn retrieve_multiple_failure_status_is_error() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/data/v9.2/accounts"))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let err = client
        .retrieve_multiple("account", &QueryOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn retrieve_related_uses_navigation_path() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/data/v9.2/contacts(c1)/contact_accounts"))
        .and(query_param("$select", "name,accountid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"accountid": "7", "name": "Acme Corp"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let rows = client
        .retrieve_related(
            &EntityReference::new("contact", "c1"),
            "contact_accounts",
            &QueryOptions::select(["name", "accountid"]),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["accountid"], json!("7"));
}

#[tokio::test]
async fn associate_posts_reference_per_related_entity() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/data/v9.2/accounts(42)/contact_accounts/$ref"))
        .and(bearer_token("test_token"))
        .and(body_json(json!({
            "@odata.id": format!("{}/api/data/v9.2/contacts(c1)", server.uri())
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let request = AssociateRequest::new(
        EntityReference::new("account", "42"),
        vec![EntityReference::new("contact", "c1")],
        "contact_accounts",
    )
    .unwrap();

    let response = client.execute(&StoreRequest::from(request)).await.unwrap();
    assert!(response.is_success());
    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn disassociate_deletes_reference() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/api/data/v9.2/contacts(c1)/contact_accounts(7)/$ref"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let request =
        DisassociateRequest::new(EntityReference::new("contact", "c1"), "7", "contact_accounts");

    let response = client.execute(&request.into()).await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn search_query_posts_request_body() {
    let server = MockServer::start().await;

    let options = SearchOptions {
        best_effort_search_enabled: false,
        search_mode: WordMatch::All,
    };
    let request = SearchQueryRequest::new(
        "acme",
        &[SearchEntity {
            name: "account".into(),
            select_columns: vec!["name".into()],
            search_columns: None,
            filter: None,
        }],
        Some(&options),
        None,
        true,
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/data/v9.2/searchquery"))
        .and(body_json(json!({
            "search": "acme",
            "entities": "[{\"Name\":\"account\",\"SelectColumns\":[\"name\"]}]",
            "options": "{\"besteffortsearchenabled\":false,\"searchmode\":\"all\"}",
            "count": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "{\"Value\":[]}"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let response = client.execute(&request.into()).await.unwrap();
    assert!(response.is_success());
    assert!(response.body.contains("Value"));
}

#[tokio::test]
async fn execute_returns_non_success_status_as_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/data/v9.2/searchquery"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = WebApiClient::new(mock_config(&server)).unwrap();
    let request = SearchQueryRequest::new("x", &[], None, None, true).unwrap();
    let response = client.execute(&request.into()).await.unwrap();

    assert!(!response.is_success());
    assert_eq!(response.status, 500);
    assert_eq!(response.status_text, "Internal Server Error");
    assert_eq!(response.body, "boom");
}
