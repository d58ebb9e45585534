pub mod similarity;
pub mod validate;

use std::path::Path;

use temario_core::CurationConfig;

pub(crate) fn load_config(path: Option<&Path>) -> Result<CurationConfig, String> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|e| format!("read config {}: {}", p.display(), e))?;
            CurationConfig::from_toml(&text)
        }
        None => Ok(CurationConfig::default()),
    }
}

pub(crate) fn now_utc_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
