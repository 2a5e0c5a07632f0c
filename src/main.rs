//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` locally so the backdrops can be viewed in a browser.

use std::process::{Command, ExitCode, Stdio};
use std::{env, io};

const DEFAULT_PORT: &str = "8000";

fn build_bundle() -> io::Result<bool> {
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(status) => Ok(status.success()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            eprintln!("wasm-pack not found in PATH. Serving whatever is already in static/pkg.");
            Ok(true)
        }
        Err(err) => Err(err),
    }
}

fn serve(port: &str) -> io::Result<()> {
    println!("Serving static/ at http://127.0.0.1:{port} …");
    let status = Command::new("python3")
        .args(["-m", "http.server", port, "--directory", "static"])
        .stdout(Stdio::null())
        .status()?;
    if !status.success() {
        eprintln!("http server exited with {status}");
    }
    Ok(())
}

fn main() -> ExitCode {
    match build_bundle() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("failed to run wasm-pack: {err}");
            return ExitCode::FAILURE;
        }
    }

    let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    match serve(&port) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            ExitCode::FAILURE
        }
    }
}
