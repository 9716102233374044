use thiserror::Error;

/// Barcodes called upstream and written into the read header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderBarcodes<'h> {
    pub five_prime: &'h str,
    pub three_prime: Option<&'h str>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MalformedHeader {
    #[error("Malformed read, expected barcodes after a colon: [{0}]")]
    MissingColon(String),

    #[error("Malformed read, no barcodes found after the last colon: [{0}]")]
    NoBarcodes(String),
}

/// Extract barcodes from the last colon-delimited header field.
///
/// `NS500556:30:H2LMCAFXX:1:11101:0:0 1:N:0:TCCGGAGA+AGGCTATA` yields
/// `TCCGGAGA` for the 5' end and `AGGCTATA` for the 3' end.
///
/// # Errors
///
/// Returns `MalformedHeader` if the header has no colon or nothing but `+`
/// separators follow the last colon.
pub fn extract_header_barcodes(header: &str) -> Result<HeaderBarcodes<'_>, MalformedHeader> {
    let Some((_, field)) = header.rsplit_once(':') else {
        return Err(MalformedHeader::MissingColon(header.to_string()));
    };

    let mut parts = field.trim().split('+');
    let five_prime = parts.next().unwrap_or_default();
    let three_prime = parts.next().filter(|s| !s.is_empty());

    if five_prime.is_empty() && three_prime.is_none() {
        return Err(MalformedHeader::NoBarcodes(header.to_string()));
    }

    Ok(HeaderBarcodes {
        five_prime,
        three_prime,
    })
}
