//
//  bitbucket-server-client
//  tests/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::time::Duration;

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use bitbucket_server_client::api::server::{
    AddPermissionRequest, CreateProjectRequest, CreateRepositoryRequest, DeleteProjectRequest,
    DeleteRepositoryRequest, GetProjectRequest, GetRepositoryRequest, PermissionLevel,
    RevokePermissionRequest, UpdateProjectRequest, UpdateRepositoryRequest,
};
use bitbucket_server_client::api::{BitbucketClient, ErrorKind, RequestContext};
use bitbucket_server_client::config::{ClientConfig, Scheme};

const AUTH: &str = "Basic YWRtaW46YWRtaW4=";

fn api(path: &str) -> String {
    format!("/rest/api/1.0/{path}")
}

fn config(server: &ServerGuard) -> ClientConfig {
    ClientConfig::new(server.host_with_port(), "admin", "admin").with_scheme(Scheme::Http)
}

async fn mock_ping(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", api("projects").as_str())
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"size":0,"limit":25,"isLastPage":true,"values":[],"start":0}"#)
        .create_async()
        .await
}

async fn connect(server: &mut ServerGuard) -> BitbucketClient {
    mock_ping(server).await;
    BitbucketClient::connect(config(server)).await.unwrap()
}

fn project_body(description: Option<&str>) -> String {
    json!({
        "key": "TPO",
        "id": 1,
        "name": "TestProject",
        "description": description,
        "public": true,
        "type": "NORMAL"
    })
    .to_string()
}

#[tokio::test]
async fn test_connect_succeeds_when_ping_succeeds() {
    let mut server = Server::new_async().await;
    let ping = mock_ping(&mut server).await;

    let client = BitbucketClient::connect(config(&server)).await.unwrap();

    ping.assert_async().await;
    assert_eq!(
        client.base_url().as_str(),
        format!("http://{}/rest/api/1.0/", server.host_with_port())
    );
}

#[tokio::test]
async fn test_connect_fails_with_bad_credentials() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", api("projects").as_str())
        .with_status(401)
        .with_body("<html>Unauthorized</html>")
        .create_async()
        .await;

    let err = BitbucketClient::connect(config(&server)).await.err().unwrap();

    assert!(err.is(ErrorKind::Permission));
    assert_eq!(err.to_string(), "error creating bitbucket client");
}

#[tokio::test]
async fn test_connect_fails_when_server_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", api("projects").as_str())
        .with_status(500)
        .with_body(r#"{"errors":[{"message":"database unavailable"}]}"#)
        .create_async()
        .await;

    let err = BitbucketClient::connect(config(&server)).await.err().unwrap();
    assert!(err.is(ErrorKind::UnexpectedStatus));
}

#[tokio::test]
async fn test_connect_fails_when_server_unreachable() {
    let config = ClientConfig::new("127.0.0.1:1", "admin", "admin").with_scheme(Scheme::Http);

    let err = BitbucketClient::connect(config).await.err().unwrap();
    assert!(err.is(ErrorKind::Network));
}

#[tokio::test]
async fn test_get_project_not_found() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;
    server
        .mock("GET", api("projects/NOPE").as_str())
        .with_status(404)
        .with_body(r#"{"errors":[{"message":"Project NOPE does not exist."}]}"#)
        .create_async()
        .await;

    let err = client
        .projects()
        .get_project(&RequestContext::background(), &GetProjectRequest::new("NOPE"))
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_create_project_conflict() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;
    server
        .mock("POST", api("projects").as_str())
        .with_status(409)
        .with_body(r#"{"errors":[{"message":"Project key TPO is already in use."}]}"#)
        .create_async()
        .await;

    let request = CreateProjectRequest {
        key: "TPO".to_string(),
        name: "TestProject".to_string(),
        ..Default::default()
    };
    let err = client
        .projects()
        .create_project(&RequestContext::background(), &request)
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;
    server
        .mock("GET", api("projects/TPO").as_str())
        .with_status(200)
        .with_body("{\"key\": \"TPO\", ")
        .create_async()
        .await;

    let err = client
        .projects()
        .get_project(&RequestContext::background(), &GetProjectRequest::new("TPO"))
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::ResponseMalformed));
    assert!(!err.is(ErrorKind::Decode));
}

#[tokio::test]
async fn test_unauthorized_is_permission_even_with_json_body() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;
    server
        .mock("GET", api("projects/TPO/repos/repo").as_str())
        .with_status(401)
        .with_body(r#"{"slug":"repo","name":"repo"}"#)
        .create_async()
        .await;

    let err = client
        .repositories()
        .get_repository(
            &RequestContext::background(),
            &GetRepositoryRequest::new("TPO", "repo"),
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::Permission));
}

#[tokio::test]
async fn test_project_crud_scenario() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;
    let ctx = RequestContext::background();

    let create = server
        .mock("POST", api("projects").as_str())
        .match_header("authorization", AUTH)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(
            json!({"key": "TPO", "name": "TestProject", "public": true}),
        ))
        .with_status(201)
        .with_body(project_body(None))
        .create_async()
        .await;

    let project = client
        .projects()
        .create_project(
            &ctx,
            &CreateProjectRequest {
                key: "TPO".to_string(),
                name: "TestProject".to_string(),
                description: None,
                is_public: Some(true),
            },
        )
        .await
        .unwrap();
    create.assert_async().await;
    assert_eq!(project.key, "TPO");
    assert_eq!(project.name, "TestProject");
    assert!(project.is_public);

    let update = server
        .mock("PUT", api("projects/TPO").as_str())
        .match_body(Matcher::Json(json!({"key": "TPO", "description": "X"})))
        .with_status(200)
        .with_body(project_body(Some("X")))
        .create_async()
        .await;

    let updated = client
        .projects()
        .update_project(
            &ctx,
            &UpdateProjectRequest {
                key: "TPO".to_string(),
                description: Some("X".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    update.assert_async().await;
    assert_eq!(updated.description.as_deref(), Some("X"));

    let get = server
        .mock("GET", api("projects/TPO").as_str())
        .with_status(200)
        .with_body(project_body(Some("X")))
        .create_async()
        .await;

    let fetched = client
        .projects()
        .get_project(&ctx, &GetProjectRequest::new("TPO"))
        .await
        .unwrap();
    assert_eq!(fetched.description.as_deref(), Some("X"));
    assert_eq!(fetched, updated);

    let delete = server
        .mock("DELETE", api("projects/TPO").as_str())
        .with_status(204)
        .create_async()
        .await;

    client
        .projects()
        .delete_project(&ctx, &DeleteProjectRequest::new("TPO"))
        .await
        .unwrap();
    delete.assert_async().await;

    get.remove_async().await;
    server
        .mock("GET", api("projects/TPO").as_str())
        .with_status(404)
        .create_async()
        .await;

    let err = client
        .projects()
        .get_project(&ctx, &GetProjectRequest::new("TPO"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_delete_twice_reports_not_found() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;
    let ctx = RequestContext::background();
    let request = DeleteRepositoryRequest::new("TPO", "testrepo");

    let first = server
        .mock("DELETE", api("projects/TPO/repos/testrepo").as_str())
        .with_status(202)
        .with_body(r#"{"context":null,"message":"Repository scheduled for deletion.","exceptionName":null}"#)
        .expect(1)
        .create_async()
        .await;

    client.repositories().delete_repository(&ctx, &request).await.unwrap();
    first.assert_async().await;
    first.remove_async().await;

    server
        .mock("DELETE", api("projects/TPO/repos/testrepo").as_str())
        .with_status(404)
        .create_async()
        .await;

    let err = client
        .repositories()
        .delete_repository(&ctx, &request)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_repository_create_get_round_trip() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;
    let ctx = RequestContext::background();

    let body = json!({
        "slug": "testrepo",
        "id": 7,
        "name": "TestRepo",
        "hierarchyId": "a1b2c3",
        "scmId": "git",
        "state": "AVAILABLE",
        "statusMessage": "Available",
        "forkable": true,
        "project": {"key": "TPO", "id": 1, "name": "TestProject", "public": true, "type": "NORMAL"},
        "public": false
    })
    .to_string();

    let create = server
        .mock("POST", api("projects/TPO/repos").as_str())
        .match_body(Matcher::Json(json!({"name": "TestRepo"})))
        .with_status(201)
        .with_body(&body)
        .create_async()
        .await;
    server
        .mock("GET", api("projects/TPO/repos/testrepo").as_str())
        .with_status(200)
        .with_body(&body)
        .create_async()
        .await;

    let created = client
        .repositories()
        .create_repository(
            &ctx,
            &CreateRepositoryRequest {
                project_key: "TPO".to_string(),
                name: "TestRepo".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    create.assert_async().await;

    let fetched = client
        .repositories()
        .get_repository(&ctx, &GetRepositoryRequest::new("TPO", &created.slug))
        .await
        .unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.project.key, "TPO");
    assert_eq!(fetched.hierarchy_id, "a1b2c3");
}

#[tokio::test]
async fn test_update_repository_renames() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    server
        .mock("PUT", api("projects/TPO/repos/testrepo").as_str())
        .match_body(Matcher::Json(
            json!({"slug": "testrepo", "name": "UpdatedTestRepo"}),
        ))
        .with_status(201)
        .with_body(r#"{"slug":"updatedtestrepo","name":"UpdatedTestRepo","project":{"key":"TPO"}}"#)
        .create_async()
        .await;

    let repo = client
        .repositories()
        .update_repository(
            &RequestContext::background(),
            &UpdateRepositoryRequest {
                project_key: "TPO".to_string(),
                slug: "testrepo".to_string(),
                name: Some("UpdatedTestRepo".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(repo.name, "UpdatedTestRepo");
    assert_eq!(repo.slug, "updatedtestrepo");
}

#[tokio::test]
async fn test_no_content_response_never_decodes() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    server
        .mock("PUT", api("projects/TPO").as_str())
        .with_status(204)
        .with_body("this is not json")
        .create_async()
        .await;

    let project = client
        .projects()
        .update_project(
            &RequestContext::background(),
            &UpdateProjectRequest {
                key: "TPO".to_string(),
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(project.key, "");
}

#[tokio::test]
async fn test_create_repository_without_name_sends_nothing() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    let untouched = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = client
        .repositories()
        .create_repository(
            &RequestContext::background(),
            &CreateRepositoryRequest {
                project_key: "TPO".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::Parameters));
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_add_permission_uses_query_parameters() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    let grant = server
        .mock("PUT", api("projects/TPO/permissions/groups").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "dev team".into()),
            Matcher::UrlEncoded("permission".into(), "PROJECT_WRITE".into()),
        ]))
        .match_header("authorization", AUTH)
        .match_header("content-type", Matcher::Missing)
        .with_status(204)
        .create_async()
        .await;

    client
        .projects()
        .add_permission(
            &RequestContext::background(),
            &AddPermissionRequest {
                project_key: "TPO".to_string(),
                group: "dev team".to_string(),
                permission: PermissionLevel::ProjectWrite,
            },
        )
        .await
        .unwrap();

    grant.assert_async().await;
}

#[tokio::test]
async fn test_revoke_permission_deletes_group_grant() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    let revoke = server
        .mock("DELETE", api("projects/TPO/permissions/groups").as_str())
        .match_query(Matcher::UrlEncoded("name".into(), "developers".into()))
        .with_status(204)
        .create_async()
        .await;

    client
        .projects()
        .revoke_permission(
            &RequestContext::background(),
            &RevokePermissionRequest {
                project_key: "TPO".to_string(),
                group: "developers".to_string(),
            },
        )
        .await
        .unwrap();

    revoke.assert_async().await;
}

#[tokio::test]
async fn test_unexpected_status_carries_message() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    server
        .mock("POST", api("projects").as_str())
        .with_status(400)
        .with_body(r#"{"errors":[{"context":"key","message":"Project key must start with a letter.","exceptionName":null}]}"#)
        .create_async()
        .await;

    let err = client
        .projects()
        .create_project(
            &RequestContext::background(),
            &CreateProjectRequest {
                key: "1TPO".to_string(),
                name: "TestProject".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::UnexpectedStatus));
    assert!(err
        .root()
        .to_string()
        .contains("Project key must start with a letter."));
}

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    let untouched = server
        .mock("GET", api("projects/TPO").as_str())
        .expect(0)
        .create_async()
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let ctx = RequestContext::background().with_cancellation(token);

    let err = client
        .projects()
        .get_project(&ctx, &GetProjectRequest::new("TPO"))
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::Cancelled));
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_expired_deadline_times_out() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    server
        .mock("GET", api("projects/TPO").as_str())
        .with_status(200)
        .with_body(project_body(None))
        .create_async()
        .await;

    let ctx = RequestContext::background().with_timeout(Duration::ZERO);
    let err = client
        .projects()
        .get_project(&ctx, &GetProjectRequest::new("TPO"))
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::Timeout));
}

#[tokio::test]
async fn test_project_key_cannot_escape_its_path_segment() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    let repo_delete = server
        .mock("DELETE", api("projects/TPO/repos/victim").as_str())
        .expect(0)
        .create_async()
        .await;
    let admin_read = server
        .mock("GET", api("admin/users").as_str())
        .expect(0)
        .create_async()
        .await;

    let ctx = RequestContext::background();
    let err = client
        .projects()
        .delete_project(&ctx, &DeleteProjectRequest::new("TPO/repos/victim"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Parameters));

    let err = client
        .projects()
        .get_project(&ctx, &GetProjectRequest::new("../admin/users"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Parameters));

    repo_delete.assert_async().await;
    admin_read.assert_async().await;
}

#[tokio::test]
async fn test_repository_slug_cannot_escape_its_path_segment() {
    let mut server = Server::new_async().await;
    let client = connect(&mut server).await;

    let untouched = server
        .mock("GET", Matcher::Regex("^/rest/api/1.0/projects/TPO/.+".to_string()))
        .expect(0)
        .create_async()
        .await;

    let ctx = RequestContext::background();
    for slug in ["..", "repo?at=main", "repo#x", "a%2Fb", "nested/repo"] {
        let err = client
            .repositories()
            .get_repository(&ctx, &GetRepositoryRequest::new("TPO", slug))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Parameters), "{slug} should be rejected");
    }

    untouched.assert_async().await;
}
