//! Build script for spotwire.
//!
//! Copies the `.env.example` template next to the place where spotwire looks
//! for its `.env` file, so a fresh install has a ready-to-edit template in the
//! local data directory.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to `<data_local_dir>/spotwire/`.
///
/// - Linux: `~/.local/share/spotwire/.env.example`
/// - macOS: `~/Library/Application Support/spotwire/.env.example`
/// - Windows: `%LOCALAPPDATA%/spotwire/.env.example`
///
/// A missing template only produces a cargo warning. Failing to create the
/// target directory or write the file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotwire");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        fs::copy(&env_example_path, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
