//! End-to-end tests for the line-delimited JSON transport.

#![cfg(unix)]

use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pretty_assertions::assert_eq;
use remotion_mcp::transport::line::LineTransport;
use remotion_mcp::Dispatcher;
use remotion_render::{Renderer, RendererConfig};
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;

/// Fake `npx`: `$5` is the composition id (-y remotion render <entry> <id> <out>).
fn fake_npx(dir: &Path) -> PathBuf {
    let path = dir.join("npx");
    let script = r#"#!/bin/sh
case "$5" in
  Slow) sleep 0.5; printf 'slow done' ;;
  Broken) printf 'boom' >&2; exit 1 ;;
  *) printf 'done' ;;
esac
"#;
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn transport(npx: PathBuf) -> LineTransport {
    LineTransport::new(Dispatcher::new(Renderer::with_config(
        RendererConfig::default()
            .program(npx)
            .default_entry_point("remotion-template/src/index.ts"),
    )))
}

async fn run(npx: PathBuf, input: &str) -> Vec<Value> {
    let mut out = Vec::new();
    transport(npx)
        .serve(input.as_bytes(), &mut out)
        .await
        .unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn results_by_id(messages: &[Value]) -> HashMap<String, Value> {
    messages
        .iter()
        .filter(|m| m["type"] == "call_tool_result")
        .map(|m| (m["id"].to_string(), m.clone()))
        .collect()
}

#[tokio::test]
async fn ready_then_list_tools() {
    let dir = tempfile::tempdir().unwrap();
    let messages = run(fake_npx(dir.path()), "{\"type\":\"list_tools\"}\n").await;

    assert_eq!(messages[0], json!({"type": "ready"}));
    assert_eq!(messages[1]["type"], "list_tools_result");
    let names: Vec<&str> = messages[1]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["render_remotion", "list_compositions"]);
    assert!(messages[1]["tools"][0]["inputSchema"]["properties"]["compositionId"].is_object());
}

#[tokio::test]
async fn render_success_and_failure_envelopes() {
    let dir = tempfile::tempdir().unwrap();
    let input = [
        r#"{"type":"call_tool","id":1,"name":"render_remotion","args":{"compositionId":"SimplePromo","outputPath":"/tmp/a.mp4"}}"#,
        r#"{"type":"call_tool","id":2,"name":"render_remotion","args":{"compositionId":"Broken","outputPath":"/tmp/b.mp4"}}"#,
        r#"{"type":"call_tool","id":3,"name":"nonexistent_tool","args":{}}"#,
        "",
    ]
    .join("\n");
    let messages = run(fake_npx(dir.path()), &input).await;
    assert_eq!(messages.len(), 4);
    let results = results_by_id(&messages);

    assert_eq!(
        results["1"],
        json!({
            "type": "call_tool_result",
            "id": 1,
            "ok": true,
            "result": {"ok": true, "outputPath": "/tmp/a.mp4", "stdout": "done"}
        })
    );

    let failed = &results["2"];
    assert_eq!(failed["ok"], false);
    let message = failed["error"]["message"].as_str().unwrap();
    assert!(message.contains("code 1"), "{message}");
    assert!(message.contains("boom"), "{message}");

    assert_eq!(
        results["3"]["error"]["message"],
        "Unknown tool: nonexistent_tool"
    );
}

#[tokio::test]
async fn malformed_lines_are_dropped_silently() {
    let dir = tempfile::tempdir().unwrap();
    let input = "this is not json\n\n   \n{\"type\":\"bogus\"}\n{\"type\":\"list_tools\"}\n";
    let messages = run(fake_npx(dir.path()), input).await;

    let types: Vec<&str> = messages.iter().map(|m| m["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["ready", "list_tools_result"]);
}

#[tokio::test]
async fn unterminated_last_line_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let messages = run(fake_npx(dir.path()), "{\"type\":\"list_tools\"}").await;
    assert_eq!(messages, vec![json!({"type": "ready"})]);
}

#[tokio::test]
async fn responses_are_correlated_by_id_not_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = [
        r#"{"type":"call_tool","id":"slow","name":"render_remotion","args":{"compositionId":"Slow","outputPath":"/tmp/s.mp4"}}"#,
        r#"{"type":"call_tool","id":"fast","name":"render_remotion","args":{"compositionId":"Fast","outputPath":"/tmp/f.mp4"}}"#,
        "",
    ]
    .join("\n");
    let messages = run(fake_npx(dir.path()), &input).await;

    let ids: Vec<&str> = messages[1..]
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["fast", "slow"]);
    assert_eq!(messages[2]["result"]["stdout"], "slow done");
}

#[tokio::test]
async fn input_split_across_writes_is_reassembled() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, server_in) = tokio::io::duplex(64);

    let writer = tokio::spawn(async move {
        client.write_all(b"{\"type\":\"li").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        client.write_all(b"st_tools\"}\n{\"ty").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        client.write_all(b"pe\":\"list_tools\"}\n").await.unwrap();
        // Dropping the client closes the input.
    });

    let mut out = Vec::new();
    transport(fake_npx(dir.path()))
        .serve(server_in, &mut out)
        .await
        .unwrap();
    writer.await.unwrap();

    let types: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["type"].clone())
        .collect();
    assert_eq!(
        types,
        vec![json!("ready"), json!("list_tools_result"), json!("list_tools_result")]
    );
}

#[tokio::test]
async fn non_string_tool_name_gets_unknown_tool_reply() {
    let dir = tempfile::tempdir().unwrap();
    let messages = run(
        fake_npx(dir.path()),
        "{\"type\":\"call_tool\",\"id\":7,\"name\":5,\"args\":{}}\n",
    )
    .await;

    assert_eq!(
        messages,
        vec![
            json!({"type": "ready"}),
            json!({
                "type": "call_tool_result",
                "id": 7,
                "ok": false,
                "error": {"message": "Unknown tool: 5"}
            }),
        ]
    );
}

#[tokio::test]
async fn null_id_is_echoed_back() {
    let dir = tempfile::tempdir().unwrap();
    let messages = run(
        fake_npx(dir.path()),
        "{\"type\":\"call_tool\",\"id\":null,\"name\":\"nonexistent_tool\",\"args\":{}}\n",
    )
    .await;

    let reply = messages[1].as_object().unwrap();
    assert_eq!(reply.get("id"), Some(&Value::Null));
    assert_eq!(reply["ok"], false);
}

#[tokio::test]
async fn closed_output_stops_serving() {
    let dir = tempfile::tempdir().unwrap();
    // Input stays open; only the output side is gone.
    let (_client, server_in) = tokio::io::duplex(64);
    let (server_out, consumer) = tokio::io::duplex(64);
    drop(consumer);

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        transport(fake_npx(dir.path())).serve(server_in, server_out),
    )
    .await
    .expect("serve should return once the output is closed");
    assert!(result.is_err());
}
