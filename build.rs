//! Build script for spotdash.
//!
//! Copies `.env.example` into the local data directory next to where the
//! application looks for its `.env` file, so a fresh install comes with a
//! template to fill in.

use std::{env, fs, path::PathBuf};

/// Copies the `.env.example` template to `{data_local_dir}/spotdash/`.
///
/// A missing template only produces a cargo warning; directory and write
/// failures abort the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotdash");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
