//! Reusable project content

use super::env::TestEnv;

/// A tiny SSE-style server module
pub const SERVER_PY: &str = r#"import os

PORT = int(os.environ.get("PORT", "8000"))

if __name__ == "__main__":
    print(f"serving on {PORT}")
"#;

pub const MANIFEST: &str = r#"[project]
name = "mcp-sse"
dependencies = ["starlette>=0.46", "anyio"]
"#;

/// A project that builds: two runtime packages, one tooling package.
pub fn service_project() -> TestEnv {
    let env = TestEnv::new();
    let starlette = env.add_package(
        "starlette",
        "0.46.2",
        &[
            ("starlette/__init__.py", "__version__ = '0.46.2'\n"),
            ("starlette/routing.py", "class Route: ...\n"),
        ],
    );
    let anyio = env.add_package("anyio", "4.9.0", &[("anyio/__init__.py", "")]);
    let pip = env.add_package("pip", "25.0", &[("pip/__init__.py", "")]);
    env.write_lock(&[
        ("anyio", "4.9.0", &anyio),
        ("pip", "25.0", &pip),
        ("starlette", "0.46.2", &starlette),
    ]);
    env.write_file("berth.toml", MANIFEST);
    env.write_file("src/server.py", SERVER_PY);
    env.write_file("src/__pycache__/server.cpython-312.pyc", "bytecode");
    env
}
