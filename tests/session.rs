use std::io::Write;
use std::sync::Arc;

use action_registry::{ActionContent, ActionRequest, InvocationStatus};
use dom_query::memory::{ElementSpec, FixtureDom};
use overlay_pilot::{session, AppSession, Config};
use serde_json::json;

fn bi_dom() -> Arc<FixtureDom> {
    let dom = Arc::new(FixtureDom::new());
    let body = dom.append(dom.root(), ElementSpec::new("body"));
    let ace = dom.append(body, ElementSpec::new("div").class("ace_editor"));
    dom.append(
        ace,
        ElementSpec::new("div")
            .class("ace_content")
            .text("SELECT 1")
            .editable(),
    );
    dom
}

#[tokio::test]
async fn sessions_follow_the_dispatcher_section() {
    let mut config = Config::default();
    config.dispatcher.serialize = true;

    let session = AppSession::open("bi", bi_dom(), &config, &Default::default()).unwrap();
    assert!(session.is_serial());
    assert_eq!(session.app(), "bi");

    let record = session
        .execute(ActionRequest::new("updateSqlQuery", json!({ "sql": "SELECT 2" })))
        .await
        .unwrap();
    assert_eq!(record.status, InvocationStatus::Done);
    assert_eq!(
        record.content,
        ActionContent::text("Updated the query without running it.")
    );
}

#[tokio::test]
async fn unknown_apps_are_rejected() {
    let err = AppSession::open("crm", bi_dom(), &Config::default(), &Default::default())
        .err()
        .unwrap();
    assert!(format!("{:#}", err).contains("crm"), "{err:#}");
}

#[tokio::test]
async fn schema_file_feeds_the_schema_actions() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "- name: events\n  columns:\n    - name: kind\n      type: text"
    )
    .unwrap();

    let mut config = Config::default();
    config.collaborators.schema_file = Some(file.path().to_path_buf());
    let collaborators = session::collaborators(&config).await.unwrap();

    let session = AppSession::open("analytics", bi_dom(), &config, &collaborators).unwrap();
    assert!(!session.is_serial());
    let record = session
        .execute(ActionRequest::new(
            "getEventSchema",
            json!({ "tables": ["events"] }),
        ))
        .await
        .unwrap();
    assert_eq!(
        record.content,
        ActionContent::text("Table `events`:\n- kind (text)")
    );
}

#[tokio::test]
async fn missing_schema_file_is_an_error() {
    let mut config = Config::default();
    config.collaborators.schema_file = Some("does/not/exist.yaml".into());
    let err = session::collaborators(&config).await.err().unwrap();
    assert!(err.to_string().starts_with("failed to read does/not/exist.yaml"));
}

#[tokio::test]
async fn selector_overrides_come_from_the_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bi.yaml"),
        "selectors:\n  sql_editor:\n    type: CSS\n    selector: \"#editor\"\n",
    )
    .unwrap();

    let dom = Arc::new(FixtureDom::new());
    let body = dom.append(dom.root(), ElementSpec::new("body"));
    let editor = dom.append(body, ElementSpec::new("div").id("editor").editable());

    let mut config = Config::default();
    config.controllers.selectors_dir = Some(dir.path().to_path_buf());
    let session = AppSession::open("bi", dom.clone(), &config, &Default::default()).unwrap();
    session
        .dispatcher()
        .run_action("updateSqlQuery", json!({ "sql": "SELECT 3" }))
        .await
        .unwrap();
    assert_eq!(dom.text(editor), "SELECT 3");
}
