//! Admin backend factory

use std::sync::Arc;

use crate::config::BackendConfig;

use super::error::ClientResult;
use super::http::HttpAdminBackend;
use super::memory::MemoryBackend;
use super::AdminBackend;

/// Create a backend based on configuration.
///
/// - `"memory"`: in-process backend seeded with demo data
/// - `"http"` (default): `HttpAdminBackend` against `base_url`
///
/// An unusable `base_url` is an error rather than a silent fallback.
pub fn create_backend(settings: &BackendConfig) -> ClientResult<Arc<dyn AdminBackend>> {
    match settings.kind.as_str() {
        "memory" => {
            tracing::info!(backend = "memory", "Creating in-memory admin backend with demo data");
            Ok(Arc::new(MemoryBackend::with_demo_data()))
        }
        other => {
            if other != "http" {
                tracing::warn!(kind = %other, "Unknown backend kind, using http");
            }
            let backend = HttpAdminBackend::new(settings)?;
            tracing::info!(
                backend = "http",
                base_url = %settings.base_url,
                tenant_id = ?settings.tenant_id,
                timeout_seconds = settings.timeout_seconds,
                "Creating HTTP admin backend"
            );
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: &str) -> BackendConfig {
        BackendConfig {
            kind: kind.to_string(),
            base_url: "http://localhost:8000/api".to_string(),
            token: None,
            tenant_id: None,
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_factory_picks_backend() {
        assert_eq!(create_backend(&config("memory")).unwrap().kind(), "memory");
        assert_eq!(create_backend(&config("http")).unwrap().kind(), "http");
        assert_eq!(create_backend(&config("grpc")).unwrap().kind(), "http");
    }

    #[test]
    fn test_factory_rejects_bad_url() {
        let mut bad = config("http");
        bad.base_url = "::nope::".to_string();
        assert!(create_backend(&bad).is_err());
    }
}
