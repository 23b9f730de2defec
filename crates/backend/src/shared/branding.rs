use base64::Engine;
use contracts::dashboards::d400_sales_performance::Branding;
use std::path::Path;

/// Shown instead of the logo when the file cannot be read
pub const LOGO_NOT_FOUND: &str = "Logo not found";

/// Load the optional sidebar logo. A missing or unreadable file is not an
/// error, it degrades to `Branding::Missing`.
pub fn load_branding(path: &Path) -> Branding {
    match std::fs::read(path) {
        Ok(bytes) => {
            tracing::info!("Branding: loaded logo from {} ({} bytes)", path.display(), bytes.len());
            Branding::Logo {
                mime: mime_for(path).to_string(),
                data_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
            }
        }
        Err(e) => {
            tracing::warn!("Branding: logo not available at {}: {}", path.display(), e);
            Branding::Missing {
                notice: LOGO_NOT_FOUND.to_string(),
            }
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}
