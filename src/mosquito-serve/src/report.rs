use serde::Serialize;

use crate::species::Species;

const NOT_DETECTED: &str = "Gambar tidak terdeteksi";

const NOT_DETECTED_DESCRIPTION: &str = "Gambar yang Anda masukkan tidak dapat diidentifikasi \
     sebagai salah satu jenis nyamuk dalam database kami. Silakan coba lagi dengan gambar yang \
     lebih jelas.";

const NO_DESCRIPTION: &str = "Keterangan fisik tidak tersedia.";

/// Classification result as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Detected species, or the not-detected message
    #[serde(rename = "hasil")]
    pub result: String,

    /// Physical description of the species
    #[serde(rename = "keterangan")]
    pub description: String,

    /// Confidence as a percentage with two decimals
    #[serde(rename = "akurasi")]
    pub accuracy: String,
}

impl Report {
    pub fn new(species: Species, confidence: f32) -> Self {
        let (result, description) = match species {
            Species::Unknown => (NOT_DETECTED, NOT_DETECTED_DESCRIPTION),
            _ => (species.name(), species.description().unwrap_or(NO_DESCRIPTION)),
        };

        Report {
            result: result.to_owned(),
            description: description.to_owned(),
            accuracy: format_confidence(confidence),
        }
    }
}

/// `0.8745` becomes `"87.45%"`
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}%", f64::from(confidence) * 100f64)
}
