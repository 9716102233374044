use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::tag::BarcodeTag;
use crate::parsing::tables::{parse_barcode_file, ParseError};
use crate::utils::validation::is_valid_barcode_sequence;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Duplicate barcode name in catalog: '{0}'")]
    DuplicateName(String),

    #[error("Barcode '{0}' has an empty sequence")]
    EmptySequence(String),

    #[error("Barcode '{name}' has invalid sequence '{sequence}' (expected IUPAC nucleotide letters)")]
    InvalidSequence { name: String, sequence: String },

    #[error("Failed to load barcodes: {0}")]
    Load(#[from] ParseError),
}

/// Immutable set of named barcodes
#[derive(Debug, Default)]
pub struct BarcodeCatalog {
    /// All barcodes, in load order
    tags: Vec<BarcodeTag>,

    /// Index: barcode name -> index in tags vec
    name_to_index: HashMap<String, usize>,
}

impl BarcodeCatalog {
    /// Build a catalog from tags, rejecting duplicate names and bad sequences
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateName` if two tags share a name, or
    /// `CatalogError::EmptySequence` / `CatalogError::InvalidSequence` if a
    /// sequence is not a usable barcode.
    pub fn build(tags: impl IntoIterator<Item = BarcodeTag>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for tag in tags {
            if tag.is_empty() {
                return Err(CatalogError::EmptySequence(tag.name().to_string()));
            }
            if !is_valid_barcode_sequence(tag.sequence()) {
                return Err(CatalogError::InvalidSequence {
                    name: tag.name().to_string(),
                    sequence: tag.sequence().to_string(),
                });
            }
            if catalog.name_to_index.contains_key(tag.name()) {
                return Err(CatalogError::DuplicateName(tag.name().to_string()));
            }

            catalog
                .name_to_index
                .insert(tag.name().to_string(), catalog.tags.len());
            catalog.tags.push(tag);
        }

        Ok(catalog)
    }

    /// Load a catalog from a CSV/TSV barcode table (`name`, `sequence`)
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Load` if the table cannot be read, or any
    /// error from [`BarcodeCatalog::build`].
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let tags = parse_barcode_file(path)?;
        Self::build(tags)
    }

    /// Get a barcode by name
    pub fn lookup(&self, name: &str) -> Option<&BarcodeTag> {
        self.name_to_index.get(name).map(|&idx| &self.tags[idx])
    }

    /// All barcodes sorted by name
    pub fn sorted(&self) -> Vec<&BarcodeTag> {
        let mut tags: Vec<_> = self.tags.iter().collect();
        tags.sort_by(|a, b| a.name().cmp(b.name()));
        tags
    }

    pub fn iter(&self) -> impl Iterator<Item = &BarcodeTag> {
        self.tags.iter()
    }

    /// Number of barcodes in catalog
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
