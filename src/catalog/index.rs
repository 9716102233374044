use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::readset::ReadsetDefinition;
use crate::core::tag::BarcodeTag;
use crate::core::types::MoleculeEnd;

use super::store::BarcodeCatalog;

/// Problems with the run configuration, detected before any read is processed
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Readset '{readset}' uses a {end} barcode that was not supplied: '{barcode}'")]
    UnknownBarcode {
        readset: String,
        barcode: String,
        end: MoleculeEnd,
    },

    #[error("Improper readset for barcoding: '{0}' has neither a 5' nor a 3' barcode")]
    ReadsetWithoutBarcode(String),

    #[error("Got {inputs} input file(s) but {mates} mate file(s); mates must pair one-to-one")]
    MateCountMismatch { inputs: usize, mates: usize },

    #[error("No input files given")]
    NoInputs,
}

/// The barcodes to try at each end of every read
#[derive(Debug, Clone)]
pub struct ScanPlan<'a> {
    pub barcodes5: Vec<&'a BarcodeTag>,
    pub barcodes3: Vec<&'a BarcodeTag>,
}

impl<'a> ScanPlan<'a> {
    /// Resolve the barcodes named by `readsets` against the catalog.
    ///
    /// Each end only scans the barcodes some readset expects at that end,
    /// unless `scan_all` is set, in which case every catalog barcode is tried
    /// at both ends. Barcodes are kept in name order so runs are reproducible.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBarcode` if a readset names a barcode absent
    /// from the catalog, or `ConfigError::ReadsetWithoutBarcode` if a readset
    /// names no barcode at all.
    pub fn resolve(
        catalog: &'a BarcodeCatalog,
        readsets: &[ReadsetDefinition],
        scan_all: bool,
    ) -> Result<Self, ConfigError> {
        let mut barcodes5: BTreeMap<&str, &'a BarcodeTag> = BTreeMap::new();
        let mut barcodes3: BTreeMap<&str, &'a BarcodeTag> = BTreeMap::new();

        for readset in readsets {
            if !readset.has_barcode() {
                return Err(ConfigError::ReadsetWithoutBarcode(readset.name.clone()));
            }

            for (mid, end, target) in [
                (&readset.mid5, MoleculeEnd::FivePrime, &mut barcodes5),
                (&readset.mid3, MoleculeEnd::ThreePrime, &mut barcodes3),
            ] {
                let Some(name) = mid else { continue };
                let tag = catalog
                    .lookup(name)
                    .ok_or_else(|| ConfigError::UnknownBarcode {
                        readset: readset.name.clone(),
                        barcode: name.clone(),
                        end,
                    })?;
                target.insert(tag.name(), tag);
            }
        }

        if scan_all {
            for tag in catalog.iter() {
                barcodes5.insert(tag.name(), tag);
                barcodes3.insert(tag.name(), tag);
            }
        }

        Ok(Self {
            barcodes5: barcodes5.into_values().collect(),
            barcodes3: barcodes3.into_values().collect(),
        })
    }

    /// Number of distinct barcodes scanned at either end
    pub fn distinct_barcodes(&self) -> usize {
        let mut names: Vec<&str> = self
            .barcodes5
            .iter()
            .chain(&self.barcodes3)
            .map(|t| t.name())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BarcodeCatalog {
        BarcodeCatalog::build(vec![
            BarcodeTag::new("MID001", "ACGAGTGCGT"),
            BarcodeTag::new("MID002", "ACGCTCGACA"),
            BarcodeTag::new("MID003", "AGACGCACTC"),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_per_end() {
        let catalog = catalog();
        let readsets = vec![
            ReadsetDefinition::new("rs1").with_mid5("MID002").with_mid3("MID003"),
            ReadsetDefinition::new("rs2").with_mid5("MID001"),
        ];
        let plan = ScanPlan::resolve(&catalog, &readsets, false).unwrap();

        let five: Vec<_> = plan.barcodes5.iter().map(|t| t.name()).collect();
        let three: Vec<_> = plan.barcodes3.iter().map(|t| t.name()).collect();
        assert_eq!(five, vec!["MID001", "MID002"]);
        assert_eq!(three, vec!["MID003"]);
        assert_eq!(plan.distinct_barcodes(), 3);
    }

    #[test]
    fn test_resolve_scan_all() {
        let catalog = catalog();
        let readsets = vec![ReadsetDefinition::new("rs1").with_mid5("MID001")];
        let plan = ScanPlan::resolve(&catalog, &readsets, true).unwrap();
        assert_eq!(plan.barcodes5.len(), 3);
        assert_eq!(plan.barcodes3.len(), 3);
    }

    #[test]
    fn test_unknown_barcode_is_config_error() {
        let catalog = catalog();
        let readsets = vec![ReadsetDefinition::new("rs1").with_mid5("MID001").with_mid3("MID404")];
        let err = ScanPlan::resolve(&catalog, &readsets, false).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownBarcode {
                readset: "rs1".to_string(),
                barcode: "MID404".to_string(),
                end: MoleculeEnd::ThreePrime,
            }
        );
        assert!(err.to_string().contains("MID404"));
    }

    #[test]
    fn test_readset_without_barcode_is_config_error() {
        let catalog = catalog();
        let readsets = vec![ReadsetDefinition::new("orphan")];
        let err = ScanPlan::resolve(&catalog, &readsets, false).unwrap_err();
        assert_eq!(err, ConfigError::ReadsetWithoutBarcode("orphan".to_string()));
    }
}
