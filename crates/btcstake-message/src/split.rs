//! Decomposition of a compact signature into its fields.

use serde::Serialize;

use btcstake_primitives::ec::CompactSignature;

use crate::MessageError;

/// Fields of a 65-byte compact signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitSignature {
    /// Header byte, `27..=34`.
    pub v: u8,
    /// First 32 bytes after the header, 64 lowercase hex characters.
    pub r: String,
    /// Last 32 bytes, 64 lowercase hex characters.
    pub s: String,
    /// `(v - 27) mod 4`.
    #[serde(rename = "recoveryId")]
    pub recovery_id: u8,
}

impl From<&CompactSignature> for SplitSignature {
    fn from(signature: &CompactSignature) -> Self {
        let header = signature.header();
        SplitSignature {
            v: header.byte(),
            r: hex::encode(signature.r()),
            s: hex::encode(signature.s()),
            recovery_id: header.recovery_id(),
        }
    }
}

/// Split a 130-character hex signature into `(v, r, s, recoveryId)`.
///
/// `r` and `s` are returned as given; they are not range-checked here.
///
/// # Errors
/// `MalformedSignature` if the input is not 130 hex characters,
/// `UnknownRecoveryHeader` if the header is outside `27..=34`.
pub fn split_signature(signature_hex: &str) -> Result<SplitSignature, MessageError> {
    let signature = CompactSignature::from_hex(signature_hex)?;
    Ok(SplitSignature::from(&signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_header(header: &str) -> String {
        format!("{}{}{}", header, "ab".repeat(32), "cd".repeat(32))
    }

    #[test]
    fn test_split_fields() {
        let split = split_signature(&with_header("1f")).unwrap();
        assert_eq!(split.v, 31);
        assert_eq!(split.recovery_id, 0);
        assert_eq!(split.r, "ab".repeat(32));
        assert_eq!(split.s, "cd".repeat(32));
    }

    #[test]
    fn test_recovery_id_for_every_header() {
        for v in 27u8..=34 {
            let split = split_signature(&with_header(&format!("{:02x}", v))).unwrap();
            assert_eq!(split.v, v);
            assert_eq!(split.recovery_id, (v - 27) % 4);
        }
    }

    #[test]
    fn test_header_29_is_recovery_id_2() {
        let split = split_signature(&with_header("1d")).unwrap();
        assert_eq!(split.recovery_id, 2);
    }

    #[test]
    fn test_unknown_headers() {
        for v in [0u8, 26, 35, 255] {
            assert!(matches!(
                split_signature(&with_header(&format!("{:02x}", v))),
                Err(MessageError::UnknownRecoveryHeader(b)) if b == v
            ));
        }
    }

    #[test]
    fn test_malformed_input() {
        let short = with_header("1f")[..128].to_string();
        assert!(matches!(
            split_signature(&short),
            Err(MessageError::MalformedSignature(_))
        ));
        let mut not_hex = with_header("1f");
        not_hex.replace_range(10..12, "zz");
        assert!(matches!(
            split_signature(&not_hex),
            Err(MessageError::MalformedSignature(_))
        ));
        assert!(matches!(
            split_signature(""),
            Err(MessageError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_out_of_range_scalars_still_split() {
        let sig = format!("20{}{}", "ff".repeat(32), "00".repeat(32));
        let split = split_signature(&sig).unwrap();
        assert_eq!(split.recovery_id, 1);
        assert_eq!(split.s, "00".repeat(32));
    }

    #[test]
    fn test_json_field_names() {
        let split = split_signature(&with_header("20")).unwrap();
        let json = serde_json::to_value(&split).unwrap();
        assert_eq!(json["v"], 32);
        assert_eq!(json["recoveryId"], 1);
    }
}
