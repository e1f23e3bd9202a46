//! Host-side helper: `cargo run` compiles the lens to wasm and serves the
//! demo page so the effect can be eyeballed against real page content.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;
    use std::process::{Command, Stdio};
    use std::{thread, time::Duration};

    // Compile the wasm bundle into static/pkg, next to the demo page.
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Serving whatever is already in static/pkg.");
        }
    }
    if !Path::new("static/pkg/lens_wasm.js").exists() {
        eprintln!("static/pkg is empty; the demo page will not find the lens module.");
    }

    // The demo needs a real origin (not file://) so the rasterizer can read
    // same-origin stylesheets.
    println!("Serving the demo at http://127.0.0.1:8000 …");
    let _server = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start http server");

    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
