// ============================================================================
// POINT RECORD - Registro crudo de las APIs de puntos (EWS / CCTV)
// ============================================================================
// Las APIs devuelven las coordenadas como texto ("7.65"), así que los campos
// se guardan como JSON crudo y se interpretan al preparar los marcadores.
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::layer::MarkerStatus;

/// Valor de `Kondisi` que marca un dispositivo como activo
pub const ACTIVE_STATUS: &str = "Hidup";

/// Texto mostrado cuando un campo no viene en el registro
const MISSING_FIELD: &str = "-";

/// Coordenadas geográficas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Registro de un punto tal como lo devuelve la API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    #[serde(rename = "Lintang", default, skip_serializing_if = "Option::is_none")]
    pub lintang: Option<Value>,
    #[serde(rename = "Bujur", default, skip_serializing_if = "Option::is_none")]
    pub bujur: Option<Value>,
    #[serde(rename = "Nama", default, skip_serializing_if = "Option::is_none")]
    pub nama: Option<Value>,
    #[serde(rename = "Kondisi", default, skip_serializing_if = "Option::is_none")]
    pub kondisi: Option<Value>,
}

impl PointRecord {
    /// Registro con los campos en texto, como los envían las APIs
    pub fn from_text(lintang: &str, bujur: &str, nama: &str, kondisi: &str) -> Self {
        Self {
            lintang: Some(Value::from(lintang)),
            bujur: Some(Value::from(bujur)),
            nama: Some(Value::from(nama)),
            kondisi: Some(Value::from(kondisi)),
        }
    }

    /// Coordenadas válidas del registro.
    /// `None` si latitud o longitud no son numéricas (el registro se descarta).
    pub fn coordinates(&self) -> Option<Coordinates> {
        let lat = self.lintang.as_ref().and_then(parse_coordinate)?;
        let lng = self.bujur.as_ref().and_then(parse_coordinate)?;

        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        Some(Coordinates::new(lat, lng))
    }

    /// Estado del marcador: solo "Hidup" exacto es activo
    pub fn status(&self) -> MarkerStatus {
        match self.kondisi.as_ref() {
            Some(Value::String(kondisi)) if kondisi == ACTIVE_STATUS => MarkerStatus::Active,
            _ => MarkerStatus::Inactive,
        }
    }

    pub fn display_name(&self) -> String {
        display_value(self.nama.as_ref())
    }

    pub fn display_status(&self) -> String {
        display_value(self.kondisi.as_ref())
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => MISSING_FIELD.to_string(),
    }
}

/// Interpretar un campo de coordenada.
/// Números JSON se usan tal cual; el texto se interpreta por prefijo numérico
/// ("7.65abc" -> 7.65, "abc" -> None), igual que el parseo de floats del navegador.
pub fn parse_coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

/// Parsear el prefijo numérico más largo de un texto
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponente solo si va seguido de al menos un dígito
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Decodificar la respuesta de una API de puntos.
/// El cuerpo debe ser un array JSON. Un elemento que no es objeto queda como
/// registro vacío: sin coordenadas, se cuenta como descartado al preparar marcadores.
pub fn decode_point_records(body: &str) -> Result<Vec<PointRecord>, String> {
    let items: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| format!("Parse error: {}", e))?;

    let records: Vec<PointRecord> = items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
            _ => PointRecord::default(),
        })
        .collect();

    log::debug!("📦 [API] {} registros recibidos", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_float_prefix_like_browser() {
        assert_eq!(parse_float_prefix("7.65"), Some(7.65));
        assert_eq!(parse_float_prefix("  -7.65"), Some(-7.65));
        assert_eq!(parse_float_prefix("110.39abc"), Some(110.39));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("2.5E-1x"), Some(0.25));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("7,65"), Some(7.0));
    }

    #[test]
    fn test_non_numeric_coordinates_are_rejected() {
        let cases = [
            ("", "110.39"),
            ("abc", "110.39"),
            ("7.65", ""),
            ("7.65", "n/a"),
            ("Infinity", "110.39"),
        ];
        for (lat, lng) in cases {
            let record = PointRecord::from_text(lat, lng, "Sensor", "Hidup");
            assert_eq!(record.coordinates(), None, "lat={:?} lng={:?}", lat, lng);
        }

        let missing = PointRecord {
            bujur: Some(json!("110.39")),
            ..Default::default()
        };
        assert_eq!(missing.coordinates(), None);

        let null_lat = PointRecord {
            lintang: Some(Value::Null),
            bujur: Some(json!("110.39")),
            ..Default::default()
        };
        assert_eq!(null_lat.coordinates(), None);
    }

    #[test]
    fn test_numeric_json_coordinates_are_accepted() {
        let record = PointRecord {
            lintang: Some(json!(7.65)),
            bujur: Some(json!(110)),
            ..Default::default()
        };
        assert_eq!(record.coordinates(), Some(Coordinates::new(7.65, 110.0)));
    }

    #[test]
    fn test_status_is_exact_match_on_hidup() {
        assert_eq!(PointRecord::from_text("1", "1", "A", "Hidup").status(), MarkerStatus::Active);
        for other in ["hidup", "Hidup ", "Mati", ""] {
            assert_eq!(
                PointRecord::from_text("1", "1", "A", other).status(),
                MarkerStatus::Inactive,
                "kondisi={:?}",
                other
            );
        }

        let absent = PointRecord::default();
        assert_eq!(absent.status(), MarkerStatus::Inactive);

        let null = PointRecord { kondisi: Some(Value::Null), ..Default::default() };
        assert_eq!(null.status(), MarkerStatus::Inactive);
    }

    #[test]
    fn test_display_values() {
        let record = PointRecord {
            nama: Some(json!(42)),
            kondisi: None,
            ..Default::default()
        };
        assert_eq!(record.display_name(), "42");
        assert_eq!(record.display_status(), "-");
    }

    #[test]
    fn test_decode_point_records_keeps_non_objects_as_empty_records() {
        let body = r#"[
            {"Lintang": "7.65", "Bujur": "110.39", "Nama": "Sensor A", "Kondisi": "Hidup"},
            "basura",
            42,
            {"Nama": "Sin coordenadas"}
        ]"#;
        let records = decode_point_records(body).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].display_name(), "Sensor A");
        assert_eq!(records[1], PointRecord::default());
        assert_eq!(records[2], PointRecord::default());
        assert_eq!(records[3].coordinates(), None);
    }

    #[test]
    fn test_decode_point_records_requires_array() {
        assert!(decode_point_records(r#"{"error": "quota"}"#).is_err());
        assert!(decode_point_records("<html>").is_err());
        assert_eq!(decode_point_records("[]").unwrap(), Vec::new());
    }
}
