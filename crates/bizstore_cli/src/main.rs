//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bizstore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use bizstore_core::{
    core_version, default_log_level, init_logging, Country, EntityRepository,
    InMemoryEntityStore, LoggingConfig,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = init_logging(&LoggingConfig::stderr(default_log_level())) {
        eprintln!("bizstore logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    println!("bizstore_core version={}", core_version());

    match store_smoke_check() {
        Ok(id) => {
            println!("bizstore_core store_smoke_check=ok id={id}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("event=store_smoke_check module=cli status=error error={err}");
            println!("bizstore_core store_smoke_check=error");
            ExitCode::FAILURE
        }
    }
}

fn store_smoke_check() -> Result<u64, Box<dyn std::error::Error>> {
    let store = InMemoryEntityStore::<Country>::try_new()?;
    let saved = store.insert(Country::new("smoke"))?;
    let id = saved.id.ok_or("store returned an entity without id")?;
    store.delete(id)?;
    Ok(id)
}
