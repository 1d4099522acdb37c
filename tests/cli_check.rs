//! CLI tests for `berth check`

mod common;

use std::net::TcpListener;

use common::*;

fn free_port() -> String {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
        .to_string()
}

#[test]
fn healthy_project_passes() {
    let env = service_project();
    let port = free_port();

    let result = env.run(&["check", "--port", &port]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("Berth Check: mcp-sse"), "{}", result.stdout);
    assert!(result.stdout.contains("package starlette - starlette==0.46.2 verified"));
    assert!(result.stdout.contains("entry module - src.server -> src/server.py"));
    assert!(result.stdout.contains("All checks passed"), "{}", result.stdout);
    assert!(!env.path("build").exists(), "check must not build");
}

#[test]
fn broken_project_fails_with_each_problem_listed() {
    let env = service_project();
    std::fs::remove_dir_all(env.path("wheelhouse/anyio")).unwrap();
    std::fs::remove_file(env.path("src/server.py")).unwrap();

    let result = env.run(&["check", "--port", &free_port()]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("anyio==4.9.0 not found in"), "{}", result.stdout);
    assert!(
        result.stdout.contains("module 'src.server' is not inside the copied sources"),
        "{}",
        result.stdout
    );
    assert!(result.stdout.contains("looked for src/server.py"), "{}", result.stdout);
    assert!(result.stdout.contains("Check FAILED"), "{}", result.stdout);
}

#[test]
fn missing_lock_is_reported_with_recommendation() {
    let env = service_project();
    std::fs::remove_file(env.path("berth.lock")).unwrap();

    let result = env.run(&["check", "--port", &free_port()]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("lock file not found"), "{}", result.stdout);
    assert!(result.stdout.contains("generate a lock file before building"));
    assert!(!result.stdout.contains("package starlette"));
}

#[test]
fn json_output_streams_each_item() {
    let env = service_project();

    let result = env.run(&["check", "--json", "--port", &free_port()]);

    assert!(result.success, "{}", result.combined_output());
    let events = result.events();
    assert_eq!(events[0]["event"], "start");
    assert_eq!(events[0]["project"], "mcp-sse");

    let checks: Vec<&serde_json::Value> =
        events.iter().filter(|e| e["event"] == "check").collect();
    let names: Vec<&str> = checks.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "config",
            "lock",
            "requirements",
            "package anyio",
            "package pip",
            "package starlette",
            "tooling",
            "source src",
            "entry module",
            "port",
        ]
    );
    assert!(checks.iter().all(|e| e["status"] == "pass"));

    let complete = events.last().unwrap();
    assert_eq!(complete["event"], "complete");
    assert_eq!(complete["errors"], 0);
    assert_eq!(complete["success"], true);
}

#[test]
fn busy_port_is_only_a_warning() {
    let env = service_project();
    let listener = TcpListener::bind("0.0.0.0:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let result = env.run(&["check", "--port", &port]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("already in use"), "{}", result.stdout);
    assert!(result.stdout.contains("Check passed with warnings"));
}

#[test]
fn strict_warnings_fail_on_unknown_key() {
    let env = service_project();
    let manifest = env.read_file("berth.toml");
    env.write_file("berth.toml", &format!("{}\n[runtime]\nprot = 9000\n", manifest));

    let lenient = env.run(&["check", "--port", &free_port()]);
    assert!(lenient.success, "{}", lenient.combined_output());
    assert!(lenient.stdout.contains("unknown key 'prot'"), "{}", lenient.stdout);
    assert!(lenient.stdout.contains("did you mean 'port'?"));

    let strict = env.run(&["check", "--strict-warnings", "--port", &free_port()]);
    assert_eq!(strict.exit_code, 1);
}
