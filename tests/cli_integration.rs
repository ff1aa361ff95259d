//! Integration tests for the expertbot binary
//!
//! These run the built binary against a throwaway expertbot directory and
//! never reach the network: every request either fails before phase two or
//! stops at the missing API key.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Command for the expertbot binary isolated inside `dir`
fn expertbot(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_expertbot"));
    cmd.env("EXPERTBOT_DIR", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg-config"))
        .env("XDG_DATA_HOME", dir.join("xdg-data"))
        .env_remove("EXPERTBOT_CONFIG")
        .env_remove("GROQ_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn run_expertbot(dir: &Path, args: &[&str]) -> Output {
    expertbot(dir).args(args).output().expect("Failed to execute expertbot")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_store(dir: &Path, content: &str) {
    fs::write(dir.join("agents.json"), content).unwrap();
}

const TWO_EXPERTS: &str = r#"[
  {"agent": "Marine Biologist", "description": "Expert in ocean ecosystems."},
  {"agent": "Oceanographer", "description": "Explains tidal forces."}
]"#;

#[test]
fn test_experts_list_without_store_is_empty() {
    let temp = TempDir::new().unwrap();

    let output = run_expertbot(temp.path(), &["experts", "list", "-o", "json"]);

    assert!(output.status.success(), "list failed: {:?}", output);
    let experts: Vec<serde_json::Value> = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert!(experts.is_empty());
}

#[test]
fn test_experts_list_keeps_store_order() {
    let temp = TempDir::new().unwrap();
    write_store(temp.path(), TWO_EXPERTS);

    let output = run_expertbot(temp.path(), &["experts", "list", "-o", "json"]);

    assert!(output.status.success());
    let experts: Vec<serde_json::Value> = serde_json::from_str(&stdout_of(&output)).unwrap();
    let names: Vec<&str> = experts.iter().map(|e| e["agent"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Marine Biologist", "Oceanographer"]);
}

#[test]
fn test_corrupt_store_degrades_to_empty_list() {
    let temp = TempDir::new().unwrap();
    write_store(temp.path(), "[{\"agent\": ");

    let output = run_expertbot(temp.path(), &["experts", "list", "-o", "json"]);

    assert!(output.status.success(), "corrupt store must not be fatal");
    assert_eq!(stdout_of(&output).trim(), "[]");
    assert!(stderr_of(&output).contains("Failed to read the experts file"));
}

#[test]
fn test_experts_show() {
    let temp = TempDir::new().unwrap();
    write_store(temp.path(), TWO_EXPERTS);

    let output = run_expertbot(temp.path(), &["experts", "show", "Oceanographer", "-o", "json"]);
    assert!(output.status.success());
    let expert: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(expert["description"], "Explains tidal forces.");

    let missing = run_expertbot(temp.path(), &["experts", "show", "Astronaut"]);
    assert!(!missing.status.success());
}

#[test]
fn test_ask_auto_without_api_key() {
    let temp = TempDir::new().unwrap();

    let output = run_expertbot(temp.path(), &["ask", "Explain tides", "-o", "json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("GROQ_API_KEY"));

    let session: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(session["phase"], "idle");
    assert_eq!(session["expert"], "");
    assert_eq!(session["answer"], "");

    assert!(!temp.path().join("agents.json").exists(), "nothing may be saved on failure");
}

#[test]
fn test_ask_unknown_expert() {
    let temp = TempDir::new().unwrap();
    write_store(temp.path(), TWO_EXPERTS);

    let output = run_expertbot(temp.path(), &["ask", "Explain tides", "-e", "Astronaut", "-o", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Astronaut"));
    assert!(stderr.contains("not found"));
}

#[test]
fn test_ask_known_expert_stops_at_missing_key() {
    let temp = TempDir::new().unwrap();
    write_store(temp.path(), TWO_EXPERTS);

    let output = run_expertbot(
        temp.path(),
        &["ask", "Explain tides", "-e", "Oceanographer", "--refine", "-o", "json"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("GROQ_API_KEY"));
    assert_eq!(fs::read_to_string(temp.path().join("agents.json")).unwrap(), TWO_EXPERTS);
}

#[test]
fn test_ask_rejects_invalid_temperature() {
    let temp = TempDir::new().unwrap();

    let output = run_expertbot(temp.path(), &["ask", "Explain tides", "-t", "2"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("temperature"));
}

#[test]
fn test_models_json() {
    let temp = TempDir::new().unwrap();

    let output = run_expertbot(temp.path(), &["models", "-o", "json"]);

    assert!(output.status.success());
    let models: Vec<serde_json::Value> = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(models.len(), 3);
    assert_eq!(models[0]["name"], "mixtral-8x7b-32768");
    assert_eq!(models[0]["max_tokens"], 32768);
    assert_eq!(models[0]["default"], true);
    assert_eq!(models[2]["max_tokens"], 8192);
}

#[test]
fn test_config_from_expertbot_dir() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("expertbot.yaml"),
        "api:\n  key_env: MY_GROQ_KEY\ndefaults:\n  model: gemma-7b-it\n",
    )
    .unwrap();

    let key_env = run_expertbot(temp.path(), &["config", "get", "api.key_env"]);
    assert_eq!(stdout_of(&key_env).trim(), "MY_GROQ_KEY");

    let model = run_expertbot(temp.path(), &["config", "get", "defaults.model"]);
    assert_eq!(stdout_of(&model).trim(), "gemma-7b-it");

    let unknown = run_expertbot(temp.path(), &["config", "get", "nope"]);
    assert!(!unknown.status.success());
}

#[test]
fn test_chat_refine_before_fetch_warns() {
    let temp = TempDir::new().unwrap();

    let mut child = expertbot(temp.path())
        .arg("chat")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn expertbot chat");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"/refine\n/reset\n/quit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "chat failed: {:?}", output);
    assert!(stderr_of(&output).contains("Please fetch an answer before refining"));
    assert!(stdout_of(&output).contains("Session cleared"));
}
