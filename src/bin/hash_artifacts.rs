//! Writes `manifest.json` binding artifact files to their SHA-256 digests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hash_artifacts -- <artifact_dir> [file ...]
//! ```
//!
//! Without explicit files, `scaler.json` and `logistic_model.json` are hashed.
//! The loader then refuses any listed artifact whose bytes have changed.

use std::env;
use std::fs;
use std::path::PathBuf;

use pitchrisk::adapters::artifacts::{
    ArtifactManifest, DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE, MANIFEST_FILE,
};

fn usage() -> String {
    "Usage: hash_artifacts <artifact_dir> [file ...]".to_string()
}

fn parse_args() -> Result<(PathBuf, Vec<String>), String> {
    let mut args = env::args().skip(1);
    let dir = match args.next() {
        Some(a) if a == "-h" || a == "--help" => return Err(usage()),
        Some(a) => PathBuf::from(a),
        None => return Err(usage()),
    };

    let mut files: Vec<String> = args.collect();
    if files.is_empty() {
        files = vec![DEFAULT_SCALER_FILE.to_string(), DEFAULT_MODEL_FILE.to_string()];
    }
    if files.iter().any(|f| f == MANIFEST_FILE) {
        return Err(format!("{MANIFEST_FILE} cannot bind itself"));
    }
    Ok((dir, files))
}

fn main() -> Result<(), String> {
    let (dir, files) = parse_args()?;
    if !dir.is_dir() {
        return Err(format!("{dir:?} is not a directory"));
    }

    let names: Vec<&str> = files.iter().map(String::as_str).collect();
    let manifest = ArtifactManifest::for_files(&dir, &names).map_err(|e| e.to_string())?;

    let bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize {MANIFEST_FILE}: {e}"))?;
    let manifest_path = dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &bytes)
        .map_err(|e| format!("Failed to write {manifest_path:?}: {e}"))?;

    for (name, digest) in &manifest.files {
        println!("{digest}  {name}");
    }
    println!("Wrote manifest: {manifest_path:?}");
    Ok(())
}
