// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP y decodifica
// ============================================================================

use geojson::GeoJson;
use gloo_net::http::Request;
use web_sys::AbortSignal;

use crate::models::{decode_point_records, parse_boundaries, PointRecord};

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone, Default)]
pub struct ApiClient;

impl ApiClient {
    pub fn new() -> Self {
        Self
    }

    /// GET que devuelve el cuerpo como texto. Respuestas no 2xx son error.
    async fn get_text(&self, url: &str, signal: Option<&AbortSignal>) -> Result<String, String> {
        let response = Request::get(url)
            .abort_signal(signal)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        response
            .text()
            .await
            .map_err(|e| format!("Read error: {}", e))
    }

    /// Registros de una capa de puntos (EWS, CCTV...)
    pub async fn fetch_point_records(
        &self,
        url: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<PointRecord>, String> {
        log::info!("📡 [API] GET {}", url);
        let body = self.get_text(url, signal).await?;
        let records = decode_point_records(&body)?;
        log::info!("✅ [API] {} registros recibidos", records.len());
        Ok(records)
    }

    /// Archivo GeoJSON local de límites administrativos
    pub async fn fetch_boundaries(&self, path: &str) -> Result<GeoJson, String> {
        log::info!("📡 [API] GET {}", path);
        let body = self.get_text(path, None).await?;
        parse_boundaries(&body)
    }
}
