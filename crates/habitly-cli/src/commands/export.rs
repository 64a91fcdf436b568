use std::path::PathBuf;

use chrono::Utc;
use habitly_core::build_export;
use habitly_core::entitlement::{check_feature, PremiumFeature};

use crate::session::Session;

pub async fn run(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    check_feature(&session.entitlement, PremiumFeature::DataExport)?;

    let document = build_export(&session.tracker.snapshot(), Utc::now());
    let json = document.to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!("exported {} identities to {}", document.summary.identities, path.display());
        }
        None => println!("{json}"),
    }

    session.finish().await;
    Ok(())
}
