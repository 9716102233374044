use serde::{Deserialize, Serialize};

/// A sample defined by the barcode(s) its reads carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadsetDefinition {
    pub name: String,

    /// Name of the expected 5' barcode
    #[serde(default)]
    pub mid5: Option<String>,

    /// Name of the expected 3' barcode
    #[serde(default)]
    pub mid3: Option<String>,
}

impl ReadsetDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mid5: None,
            mid3: None,
        }
    }

    #[must_use]
    pub fn with_mid5(mut self, mid5: impl Into<String>) -> Self {
        self.mid5 = Some(mid5.into());
        self
    }

    #[must_use]
    pub fn with_mid3(mut self, mid3: impl Into<String>) -> Self {
        self.mid3 = Some(mid3.into());
        self
    }

    /// Blank MID names are treated as unset
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.mid5 = self.mid5.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.mid3 = self.mid3.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self
    }

    pub fn has_barcode(&self) -> bool {
        self.mid5.is_some() || self.mid3.is_some()
    }

    /// Suffix appended to an input basename to name this readset's output
    ///
    /// Returns `None` when neither MID is set.
    pub fn bucket_suffix(&self) -> Option<String> {
        match (&self.mid5, &self.mid3) {
            (Some(mid5), None) => Some(mid5.clone()),
            (Some(mid5), Some(mid3)) => Some(format!("{mid5}_{mid3}")),
            (None, Some(mid3)) => Some(mid3.clone()),
            (None, None) => None,
        }
    }
}

impl std::fmt::Display for ReadsetDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.mid5.as_deref().unwrap_or("-"))?;
        if let Some(mid3) = &self.mid3 {
            write!(f, ", {mid3}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_suffix() {
        let rs = ReadsetDefinition::new("rs1").with_mid5("MID001");
        assert_eq!(rs.bucket_suffix().as_deref(), Some("MID001"));

        let rs = rs.with_mid3("MID002");
        assert_eq!(rs.bucket_suffix().as_deref(), Some("MID001_MID002"));

        let rs = ReadsetDefinition::new("rs2").with_mid3("MID003");
        assert_eq!(rs.bucket_suffix().as_deref(), Some("MID003"));

        assert!(ReadsetDefinition::new("empty").bucket_suffix().is_none());
    }

    #[test]
    fn test_normalized_blank_mids() {
        let rs = ReadsetDefinition {
            name: " rs1 ".to_string(),
            mid5: Some("MID001 ".to_string()),
            mid3: Some("  ".to_string()),
        }
        .normalized();
        assert_eq!(rs.name, "rs1");
        assert_eq!(rs.mid5.as_deref(), Some("MID001"));
        assert!(rs.mid3.is_none());
    }
}
