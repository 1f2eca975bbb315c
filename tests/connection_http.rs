use std::collections::BTreeMap;
use std::panic;

use firebase_rest_sdk::auth::ServiceAccountCredentials;
use firebase_rest_sdk::connection::{ConnectionError, ConnectionOptions, FirebaseConnection};
use firebase_rest_sdk::firestore::{FirestoreErrorCode, NativeValue};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use httpmock::MockServer;
use serde_json::json;

const PRIVATE_KEY: &str = include_str!("fixtures/rsa_private.pem");
const DOCUMENTS: &str = "/v1/projects/demo/databases/(default)/documents";

fn start_server(test: &str) -> Option<MockServer> {
    match panic::catch_unwind(MockServer::start) {
        Ok(server) => Some(server),
        Err(_) => {
            eprintln!("Skipping {test}: unable to bind httpmock server.");
            None
        }
    }
}

fn connect(server: &MockServer) -> FirebaseConnection {
    let credentials = ServiceAccountCredentials::from_json_str(
        &json!({
            "type": "service_account",
            "project_id": "demo",
            "client_email": "sa@demo.iam.gserviceaccount.com",
            "private_key": PRIVATE_KEY,
        })
        .to_string(),
    )
    .unwrap();
    let options = ConnectionOptions::default()
        .with_token_url(server.url("/token"))
        .with_firestore_host(server.base_url())
        .with_remote_config_host(server.base_url());
    FirebaseConnection::with_options(credentials, "demo", options).unwrap()
}

fn document(path: &str, fields: serde_json::Value) -> serde_json::Value {
    json!({
        "name": format!("projects/demo/databases/(default)/documents/{path}"),
        "fields": fields,
        "createTime": "2024-05-01T10:00:00Z",
        "updateTime": "2024-05-01T10:00:00Z"
    })
}

#[test]
fn firestore_crud_round_trip() {
    let Some(server) = start_server("firestore_crud_round_trip") else {
        return;
    };
    let token = server.mock(|when, then| {
        when.method(POST)
            .path("/token")
            .body_contains("assertion=");
        then.status(200)
            .json_body(json!({ "access_token": "datastore-token", "expires_in": 3599 }));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path(format!("{DOCUMENTS}/posts"))
            .query_param("documentId", "hello")
            .header("authorization", "Bearer datastore-token")
            .json_body(json!({ "fields": { "title": { "stringValue": "Hello" }, "votes": { "integerValue": "1" } } }));
        then.status(200).json_body(document(
            "posts/hello",
            json!({ "title": { "stringValue": "Hello" }, "votes": { "integerValue": "1" } }),
        ));
    });
    let update = server.mock(|when, then| {
        when.method(PATCH)
            .path(format!("{DOCUMENTS}/posts/hello"))
            .query_param("updateMask.fieldPaths", "votes");
        then.status(200).json_body(document(
            "posts/hello",
            json!({ "title": { "stringValue": "Hello" }, "votes": { "integerValue": "2" } }),
        ));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path(format!("{DOCUMENTS}/posts"));
        then.status(200).json_body(json!({
            "documents": [document("posts/hello", json!({ "votes": { "integerValue": "2" } }))]
        }));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path(format!("{DOCUMENTS}/posts/hello"));
        then.status(200).json_body(json!({}));
    });

    let connection = connect(&server);
    let store = connection.firestore().unwrap();

    let mut fields = BTreeMap::new();
    fields.insert("title".to_string(), NativeValue::from("Hello"));
    fields.insert("votes".to_string(), NativeValue::Double(1.0));
    let created = store.create_document("posts/hello", &fields).unwrap();
    assert_eq!(created.id(), "hello");

    let mut patch = BTreeMap::new();
    patch.insert("votes".to_string(), NativeValue::Integer(2));
    let updated = store.update_document("posts/hello", &patch, true).unwrap().unwrap();
    assert_eq!(updated.get("votes"), Some(&NativeValue::Integer(2)));

    let listed = store.list_documents("posts").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].relative_path(), Some("posts/hello"));

    store.delete_document("posts/hello").unwrap();

    token.assert_hits(1);
    create.assert();
    update.assert();
    list.assert();
    delete.assert();
}

#[test]
fn missing_document_reports_remote_error() {
    let Some(server) = start_server("missing_document_reports_remote_error") else {
        return;
    };
    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({ "access_token": "datastore-token" }));
    });
    server.mock(|when, then| {
        when.method(GET).path(format!("{DOCUMENTS}/posts/missing"));
        then.status(404).json_body(json!({
            "error": { "code": 404, "message": "Document \"posts/missing\" not found.", "status": "NOT_FOUND" }
        }));
    });

    let connection = connect(&server);
    let err = connection
        .firestore()
        .unwrap()
        .get_document("posts/missing")
        .unwrap_err();
    assert_eq!(err.code, FirestoreErrorCode::RemoteError);
    assert!(err.message().contains("not found"));
}

#[test]
fn remote_config_uses_its_own_token() {
    let Some(server) = start_server("remote_config_uses_its_own_token") else {
        return;
    };
    let token = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({ "access_token": "config-token" }));
    });
    let template = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/projects/demo/remoteConfig")
            .header("authorization", "Bearer config-token");
        then.status(200)
            .json_body(json!({ "parameters": { "banner": { "defaultValue": { "value": "on" } } } }));
    });

    let connection = connect(&server);
    let body = connection.remote_config().unwrap().get().unwrap();
    assert_eq!(body["parameters"]["banner"]["defaultValue"]["value"], "on");

    connection.remote_config().unwrap().get().unwrap();
    token.assert_hits(1);
    template.assert_hits(2);
}

#[test]
fn rejected_credentials_fail_store_creation() {
    let Some(server) = start_server("rejected_credentials_fail_store_creation") else {
        return;
    };
    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(400)
            .json_body(json!({ "error": "invalid_grant", "error_description": "Invalid JWT Signature." }));
    });

    let connection = connect(&server);
    let err = connection.firestore().unwrap_err();
    assert!(matches!(err, ConnectionError::Auth(_)));
    assert!(err.to_string().contains("Invalid JWT Signature."));
}
