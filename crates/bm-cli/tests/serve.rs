//! Integration tests for `bmath serve` over stdio.
//! Verifies a tool round trip, clean exit on stdin EOF and prompt exit on SIGTERM.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

fn bmath_binary() -> std::path::PathBuf {
    assert_cmd::cargo::cargo_bin!("bmath").into()
}

fn spawn_serve() -> std::process::Child {
    Command::new(bmath_binary())
        .arg("serve")
        .env_remove("BMATH_RECIPES")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn bmath serve")
}

/// Send the MCP initialize handshake so the server enters its main loop.
fn mcp_handshake(child: &mut std::process::Child) {
    let stdin = child.stdin.as_mut().expect("stdin pipe");

    let init_req = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test", "version": "0.1.0" }
        }
    });
    send_jsonrpc(stdin, &init_req);
    std::thread::sleep(Duration::from_millis(300));

    let initialized = serde_json::json!({
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    });
    send_jsonrpc(stdin, &initialized);
    std::thread::sleep(Duration::from_millis(200));
}

/// Newline-delimited JSON, as rmcp's stdio transport expects.
fn send_jsonrpc(stdin: &mut impl Write, msg: &serde_json::Value) {
    let line = serde_json::to_string(msg).unwrap();
    writeln!(stdin, "{line}").unwrap();
    stdin.flush().unwrap();
}

#[test]
fn serve_exits_on_early_stdin_eof() {
    let mut child = spawn_serve();
    drop(child.stdin.take());

    let start = Instant::now();
    let output = child.wait_with_output().expect("wait");
    let elapsed = start.elapsed();

    assert!(
        output.status.success(),
        "early stdin EOF should exit 0, got {}",
        output.status
    );
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

#[test]
fn serve_answers_tool_call_then_exits_on_eof() {
    let mut child = spawn_serve();
    mcp_handshake(&mut child);

    let stdin = child.stdin.as_mut().expect("stdin pipe");
    let call = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": {
            "name": "bm_select",
            "arguments": { "recipe": "pie dough" }
        }
    });
    send_jsonrpc(stdin, &call);
    std::thread::sleep(Duration::from_millis(300));

    drop(child.stdin.take());
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success(), "got {}", output.status);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let response = stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|msg| msg["id"] == 2)
        .expect("tools/call response");
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let payload: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["summary"]["label"], "Pie Dough");
}

#[cfg(unix)]
#[test]
fn serve_exits_on_sigterm() {
    let mut child = spawn_serve();
    mcp_handshake(&mut child);

    let status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .expect("kill");
    assert!(status.success());

    let start = Instant::now();
    let _ = child.wait().expect("wait");
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}
