//! Drug catalog models.

use serde::{Deserialize, Serialize};

/// A single drug entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    /// Unique identifier
    pub id: String,
    /// International nonproprietary name (DCI)
    pub dci: String,
    /// Commercial/brand names, in display order
    pub commercial_names: Vec<String>,
    /// Pharmaceutical form (e.g., "Tableta", "Jarabe")
    pub pharmaceutical_form: String,
    /// Concentration (e.g., "500mg", "120mg/5mL")
    pub concentration: String,
    /// Generic (true) or brand (false)
    pub is_generic: bool,
    /// Manufacturing laboratory
    #[serde(default)]
    pub laboratory: String,
    /// Active ingredient as printed on the package
    #[serde(default)]
    pub active_ingredient: String,
    /// Presentation (e.g., "Caja x 100 tabletas")
    #[serde(default)]
    pub presentation: String,
    /// Whether a prescription is required to buy it
    pub requires_prescription: bool,
    /// Whether the drug is visible to search and comparison
    pub is_active: bool,
    /// Display-only medical information
    #[serde(flatten)]
    pub medical_info: MedicalInfo,
}

/// Display-only medical information. Never read by the comparator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indications: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contraindications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub side_effects: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_info: Option<String>,
}

/// The fields that make two drugs substitutable for each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EquivalenceKey<'a> {
    pub dci: &'a str,
    pub pharmaceutical_form: &'a str,
    pub concentration: &'a str,
}

impl Drug {
    /// Create a new active drug with required fields.
    pub fn new(
        id: String,
        dci: String,
        commercial_name: String,
        pharmaceutical_form: String,
        concentration: String,
        is_generic: bool,
    ) -> Self {
        Self {
            id,
            dci,
            commercial_names: vec![commercial_name],
            pharmaceutical_form,
            concentration,
            is_generic,
            laboratory: String::new(),
            active_ingredient: String::new(),
            presentation: String::new(),
            requires_prescription: false,
            is_active: true,
            medical_info: MedicalInfo::default(),
        }
    }

    /// Primary display name (first commercial name, falling back to the DCI).
    pub fn display_name(&self) -> &str {
        self.commercial_names
            .first()
            .map(String::as_str)
            .unwrap_or(&self.dci)
    }

    /// Equivalence key: DCI, pharmaceutical form and concentration.
    pub fn equivalence_key(&self) -> EquivalenceKey<'_> {
        EquivalenceKey {
            dci: &self.dci,
            pharmaceutical_form: &self.pharmaceutical_form,
            concentration: &self.concentration,
        }
    }

    /// Check whether `other` belongs to the same equivalence class.
    ///
    /// Matching is exact-string; callers normalize before resolving ids.
    pub fn is_equivalent_to(&self, other: &Drug) -> bool {
        self.equivalence_key() == other.equivalence_key()
    }
}
