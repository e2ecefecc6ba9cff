//! Municipality name normalization and matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalizes a municipality name for comparison: lowercased, canonically
/// decomposed (NFD), combining marks stripped.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// True when the invoice's stated jurisdiction contains the home
/// municipality.
///
/// Containment rather than equality: extracted values frequently come
/// qualified, e.g. "Senador Canedo - GO" or "Município de Senador Canedo".
pub fn is_within(municipio_incidencia: &str, home: &str) -> bool {
    normalize(municipio_incidencia).contains(&normalize(home))
}
