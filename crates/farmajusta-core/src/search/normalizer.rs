//! Search query normalizer.
//!
//! Handles:
//! - Case and whitespace folding
//! - Spanish accent folding (á→a, ñ→n)
//! - Alias expansion (acetaminofen→paracetamol, tylenol→paracetamol)

use std::collections::HashMap;

/// Normalizer for free-text drug queries.
pub struct QueryNormalizer {
    /// Alias map: folded spoken/regional name → folded canonical DCI
    aliases: HashMap<String, String>,
}

impl Default for QueryNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryNormalizer {
    /// Create a new normalizer with default mappings.
    pub fn new() -> Self {
        Self {
            aliases: Self::default_aliases(),
        }
    }

    /// Fold case, accents and inner whitespace.
    pub fn fold(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| word.chars().map(fold_char).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fold a query and expand it if it is a known alias.
    pub fn normalize(&self, query: &str) -> String {
        let folded = self.fold(query);
        self.aliases.get(&folded).cloned().unwrap_or(folded)
    }

    /// Canonical name for an alias, if the query is one.
    pub fn expand_alias(&self, query: &str) -> Option<&str> {
        self.aliases.get(&self.fold(query)).map(String::as_str)
    }

    /// Add a custom alias mapping.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        let alias = self.fold(alias);
        let canonical = self.fold(canonical);
        self.aliases.insert(alias, canonical);
    }

    /// Default alias mappings.
    fn default_aliases() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Analgesics / antipyretics
        map.insert("acetaminofen".into(), "paracetamol".into());
        map.insert("acetaminophen".into(), "paracetamol".into());
        map.insert("panadol".into(), "paracetamol".into());
        map.insert("tylenol".into(), "paracetamol".into());
        map.insert("tempra".into(), "paracetamol".into());

        // NSAIDs
        map.insert("ibuprofen".into(), "ibuprofeno".into());
        map.insert("advil".into(), "ibuprofeno".into());
        map.insert("motrin".into(), "ibuprofeno".into());
        map.insert("diclofenac".into(), "diclofenaco".into());
        map.insert("voltaren".into(), "diclofenaco".into());
        map.insert("naproxen".into(), "naproxeno".into());

        // Antibiotics
        map.insert("amoxicillin".into(), "amoxicilina".into());
        map.insert("amoxil".into(), "amoxicilina".into());
        map.insert("azithromycin".into(), "azitromicina".into());
        map.insert("zithromax".into(), "azitromicina".into());

        // Gastro
        map.insert("omeprazole".into(), "omeprazol".into());
        map.insert("prilosec".into(), "omeprazol".into());

        // Cardio
        map.insert("cozaar".into(), "losartan".into());

        map
    }
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
        'ñ' | 'Ñ' => 'n',
        other => other.to_lowercase().next().unwrap_or(other),
    }
}
