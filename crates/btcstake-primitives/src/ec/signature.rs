//! Compact (recoverable) ECDSA signatures.
//!
//! A compact signature is `header ‖ r ‖ s` (65 bytes). The header byte
//! encodes the recovery id and whether the signer's key is compressed:
//! `27 + recovery_id + (4 if compressed)`.

use base64::Engine;
use k256::elliptic_curve::bigint::{CheckedAdd, Encoding};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::DecompressPoint;
use k256::elliptic_curve::subtle::Choice;
use k256::elliptic_curve::Curve;
use k256::{AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint, Scalar, Secp256k1, U256};

use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// Length of a compact signature in bytes.
pub const COMPACT_SIGNATURE_LEN: usize = 65;

/// Length of a hex-encoded compact signature in characters.
pub const COMPACT_SIGNATURE_HEX_LEN: usize = COMPACT_SIGNATURE_LEN * 2;

/// Header byte → (recovery id, compressed), for every legal header.
const RECOVERY_HEADERS: [(u8, u8, bool); 8] = [
    (27, 0, false),
    (28, 1, false),
    (29, 2, false),
    (30, 3, false),
    (31, 0, true),
    (32, 1, true),
    (33, 2, true),
    (34, 3, true),
];

/// A validated compact signature header byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryHeader {
    byte: u8,
    recovery_id: u8,
    compressed: bool,
}

impl RecoveryHeader {
    /// Build the header for a recovery id and key encoding.
    ///
    /// # Returns
    /// `InvalidRecoveryId` if `recovery_id` is not in `0..=3`.
    pub fn new(recovery_id: u8, compressed: bool) -> Result<Self, PrimitivesError> {
        RECOVERY_HEADERS
            .iter()
            .find(|&&(_, id, c)| id == recovery_id && c == compressed)
            .map(|&(byte, recovery_id, compressed)| RecoveryHeader {
                byte,
                recovery_id,
                compressed,
            })
            .ok_or(PrimitivesError::InvalidRecoveryId(recovery_id))
    }

    /// Decode a header byte.
    ///
    /// # Returns
    /// `UnknownRecoveryHeader` if `byte` is outside `27..=34`.
    pub fn from_byte(byte: u8) -> Result<Self, PrimitivesError> {
        RECOVERY_HEADERS
            .iter()
            .find(|&&(b, _, _)| b == byte)
            .map(|&(byte, recovery_id, compressed)| RecoveryHeader {
                byte,
                recovery_id,
                compressed,
            })
            .ok_or(PrimitivesError::UnknownRecoveryHeader(byte))
    }

    /// The raw header byte.
    pub fn byte(&self) -> u8 {
        self.byte
    }

    /// The recovery id, `0..=3`.
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Whether the signer's public key is serialized compressed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Whether the ephemeral point R has an odd Y coordinate.
    pub fn is_y_odd(&self) -> bool {
        self.recovery_id & 1 == 1
    }

    /// Whether R's X coordinate was reduced modulo n to produce `r`
    /// (recovery ids 2 and 3).
    pub fn is_x_reduced(&self) -> bool {
        self.recovery_id & 2 == 2
    }
}

/// A 65-byte compact ECDSA signature: `header ‖ r ‖ s`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactSignature {
    header: RecoveryHeader,
    /// The R component (32 bytes, big-endian).
    r: [u8; 32],
    /// The S component (32 bytes, big-endian).
    s: [u8; 32],
}

impl CompactSignature {
    /// Create a compact signature from its parts.
    pub fn new(header: RecoveryHeader, r: [u8; 32], s: [u8; 32]) -> Self {
        CompactSignature { header, r, s }
    }

    /// Parse a 65-byte compact signature.
    ///
    /// Only the layout and the header byte are validated; `r` and `s` are
    /// range-checked when the signature is used for recovery.
    ///
    /// # Returns
    /// `MalformedSignature` on a wrong length, `UnknownRecoveryHeader` if
    /// the first byte is outside `27..=34`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != COMPACT_SIGNATURE_LEN {
            return Err(PrimitivesError::MalformedSignature(format!(
                "expected {} bytes, got {}",
                COMPACT_SIGNATURE_LEN,
                bytes.len()
            )));
        }
        let header = RecoveryHeader::from_byte(bytes[0])?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);
        Ok(CompactSignature { header, r, s })
    }

    /// Parse a 130-character hex compact signature (no `0x` prefix).
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != COMPACT_SIGNATURE_HEX_LEN {
            return Err(PrimitivesError::MalformedSignature(format!(
                "expected {} hex characters, got {}",
                COMPACT_SIGNATURE_HEX_LEN,
                hex_str.len()
            )));
        }
        let mut bytes = [0u8; COMPACT_SIGNATURE_LEN];
        hex::decode_to_slice(hex_str, &mut bytes)
            .map_err(|e| PrimitivesError::MalformedSignature(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parse the base64 form produced by Bitcoin Core's `signmessage`.
    pub fn from_base64(b64: &str) -> Result<Self, PrimitivesError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|e| PrimitivesError::MalformedSignature(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Serialize as `header ‖ r ‖ s`.
    pub fn to_bytes(&self) -> [u8; COMPACT_SIGNATURE_LEN] {
        let mut out = [0u8; COMPACT_SIGNATURE_LEN];
        out[0] = self.header.byte();
        out[1..33].copy_from_slice(&self.r);
        out[33..65].copy_from_slice(&self.s);
        out
    }

    /// Serialize as 130 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Serialize in the base64 form used by Bitcoin Core's `signmessage`.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.to_bytes())
    }

    /// The header byte.
    pub fn header(&self) -> RecoveryHeader {
        self.header
    }

    /// The R component.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The S component.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Recover the signer's public key from this signature and the signed digest.
    ///
    /// Rebuilds the ephemeral point R from `r` (plus n when the header marks
    /// X as reduced) and the Y parity bit, then computes `Q = r⁻¹(sR − zG)`.
    /// High-S signatures recover like their low-S twins; no ECDSA
    /// re-verification or S normalization is applied.
    ///
    /// # Returns
    /// `RecoveryFailed` if `r` or `s` is zero or not below n, if no curve
    /// point has the implied X coordinate, or if the result is the identity.
    pub fn recover_public_key(&self, hash: &[u8; 32]) -> Result<PublicKey, PrimitivesError> {
        let r = non_zero_scalar(&self.r, "r")?;
        let s = non_zero_scalar(&self.s, "s")?;

        let x = if self.header.is_x_reduced() {
            add_order(&self.r).ok_or_else(|| {
                PrimitivesError::RecoveryFailed("r + n overflows the field".to_string())
            })?
        } else {
            self.r
        };

        let big_r = Option::<AffinePoint>::from(AffinePoint::decompress(
            &FieldBytes::from(x),
            Choice::from(self.header.is_y_odd() as u8),
        ))
        .ok_or_else(|| {
            PrimitivesError::RecoveryFailed("no curve point for signature r".to_string())
        })?;

        let z = <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(hash));
        let r_inv = Option::<Scalar>::from(r.invert()).ok_or_else(|| {
            PrimitivesError::RecoveryFailed("r is not invertible".to_string())
        })?;
        let u1 = -(r_inv * z);
        let u2 = r_inv * s;

        let q = (ProjectivePoint::GENERATOR * u1) + (ProjectivePoint::from(big_r) * u2);
        let recovered = PublicKey::from_affine(q.to_affine())
            .map_err(|e| PrimitivesError::RecoveryFailed(e.to_string()))?;

        tracing::debug!(
            header = self.header.byte(),
            recovery_id = self.header.recovery_id(),
            public_key = %recovered,
            "recovered public key from compact signature"
        );
        Ok(recovered)
    }
}

/// Parse a 32-byte big-endian value as a scalar in `[1, n-1]`.
fn non_zero_scalar(bytes: &[u8; 32], name: &str) -> Result<Scalar, PrimitivesError> {
    Option::<NonZeroScalar>::from(NonZeroScalar::from_repr(FieldBytes::from(*bytes)))
        .map(|nz| *nz)
        .ok_or_else(|| {
            PrimitivesError::RecoveryFailed(format!(
                "signature {} must be non-zero and below the curve order",
                name
            ))
        })
}

/// Compute `val + n` over 256-bit big-endian integers.
///
/// # Returns
/// `None` if the sum does not fit in 32 bytes.
fn add_order(val: &[u8; 32]) -> Option<[u8; 32]> {
    Option::<U256>::from(U256::from_be_slice(val).checked_add(&Secp256k1::ORDER))
        .map(|sum| sum.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::PrivateKey;
    use crate::hash::sha256d;

    fn curve_order() -> [u8; 32] {
        Secp256k1::ORDER.to_be_bytes()
    }

    /// Digest of "staking claim with an unreachable nonce" under the
    /// Bitcoin Signed Message scheme.
    const ADVERSARIAL_HASH: &str =
        "b5d3470ebfda9ddb70642f06dc992fcf54ee84e837f6433e1823c6bc999b61fb";

    /// R.x = n + 2, so r = 2 and recovery needs the x-reduced branch.
    /// The keys are the unique signers for each parity of R.y.
    const RECID_2_SIG: &str = "2100000000000000000000000000000000000000000000000000000000000000021234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
    const RECID_2_KEY: &str = "03b973279c00b17a0943342544b6b09bb0fa93893186edd3b9f95d6c65726476da";
    const RECID_3_SIG: &str = "2200000000000000000000000000000000000000000000000000000000000000021234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
    const RECID_3_KEY: &str = "03d365a2b4ea52a5960927ee1ad92a7084ae6a2867d14a4b397fb6d4d69ed9399f";

    fn hash_from_hex(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out).unwrap();
        out
    }

    #[test]
    fn test_header_table_is_exhaustive() {
        let expected = [
            (27u8, 0u8, false),
            (28, 1, false),
            (29, 2, false),
            (30, 3, false),
            (31, 0, true),
            (32, 1, true),
            (33, 2, true),
            (34, 3, true),
        ];
        for (byte, id, compressed) in expected {
            let header = RecoveryHeader::from_byte(byte).unwrap();
            assert_eq!(header.recovery_id(), id, "header {}", byte);
            assert_eq!(header.is_compressed(), compressed, "header {}", byte);
            assert_eq!(RecoveryHeader::new(id, compressed).unwrap(), header);
        }
    }

    #[test]
    fn test_header_out_of_range() {
        for byte in [0u8, 26, 35, 39, 255] {
            assert!(matches!(
                RecoveryHeader::from_byte(byte),
                Err(PrimitivesError::UnknownRecoveryHeader(b)) if b == byte
            ));
        }
        assert!(matches!(
            RecoveryHeader::new(4, true),
            Err(PrimitivesError::InvalidRecoveryId(4))
        ));
    }

    #[test]
    fn test_header_bits() {
        let h = RecoveryHeader::from_byte(30).unwrap();
        assert!(h.is_y_odd());
        assert!(h.is_x_reduced());
        let h = RecoveryHeader::from_byte(32).unwrap();
        assert!(h.is_y_odd());
        assert!(!h.is_x_reduced());
    }

    #[test]
    fn test_from_hex_lengths() {
        let short = "1f".to_string() + &"00".repeat(63);
        assert!(matches!(
            CompactSignature::from_hex(&short),
            Err(PrimitivesError::MalformedSignature(_))
        ));
        let not_hex = "zz".repeat(65);
        assert!(matches!(
            CompactSignature::from_hex(&not_hex),
            Err(PrimitivesError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_hex_and_base64_forms_agree() {
        let sig = CompactSignature::from_hex(RECID_2_SIG).unwrap();
        assert_eq!(sig.to_hex(), RECID_2_SIG);
        let b64 = sig.to_base64();
        assert_eq!(CompactSignature::from_base64(&b64).unwrap(), sig);
        assert!(CompactSignature::from_base64("not base64!").is_err());
    }

    #[test]
    fn test_recover_x_reduced_recovery_ids() {
        let hash = hash_from_hex(ADVERSARIAL_HASH);

        let sig2 = CompactSignature::from_hex(RECID_2_SIG).unwrap();
        assert_eq!(sig2.header().recovery_id(), 2);
        let key2 = sig2.recover_public_key(&hash).unwrap();
        assert_eq!(key2.to_hex(), RECID_2_KEY);

        let sig3 = CompactSignature::from_hex(RECID_3_SIG).unwrap();
        assert_eq!(sig3.header().recovery_id(), 3);
        let key3 = sig3.recover_public_key(&hash).unwrap();
        assert_eq!(key3.to_hex(), RECID_3_KEY);
    }

    #[test]
    fn test_recovery_id_is_not_defaulted() {
        // The same (r, s) read with recovery id 0 lands on R.x = 2, a
        // different point, so it must not recover the id-2 signer.
        let hash = hash_from_hex(ADVERSARIAL_HASH);
        let sig2 = CompactSignature::from_hex(RECID_2_SIG).unwrap();
        let as_id0 = CompactSignature::new(
            RecoveryHeader::new(0, true).unwrap(),
            *sig2.r(),
            *sig2.s(),
        );
        if let Ok(key) = as_id0.recover_public_key(&hash) {
            assert_ne!(key.to_hex(), RECID_2_KEY);
        }
    }

    #[test]
    fn test_recover_rejects_zero_and_out_of_range() {
        let hash = sha256d(b"anything");
        let header = RecoveryHeader::new(0, true).unwrap();

        let zero_r = CompactSignature::new(header, [0u8; 32], [1u8; 32]);
        assert!(matches!(
            zero_r.recover_public_key(&hash),
            Err(PrimitivesError::RecoveryFailed(_))
        ));

        let big_s = CompactSignature::new(header, [1u8; 32], [0xffu8; 32]);
        assert!(matches!(
            big_s.recover_public_key(&hash),
            Err(PrimitivesError::RecoveryFailed(_))
        ));

        // r close to n: r + n does not fit in 256 bits.
        let mut r = curve_order();
        r[31] -= 1;
        let reduced = CompactSignature::new(RecoveryHeader::new(2, true).unwrap(), r, [1u8; 32]);
        assert!(matches!(
            reduced.recover_public_key(&hash),
            Err(PrimitivesError::RecoveryFailed(_))
        ));
    }

    #[test]
    fn test_add_order() {
        let mut two = [0u8; 32];
        two[31] = 2;
        assert_eq!(
            hex::encode(add_order(&two).unwrap()),
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364143"
        );
        assert!(add_order(&curve_order()).is_none());
    }

    #[test]
    fn test_add_order_carry_boundary() {
        // 2^256 - n - 1 is the largest value whose sum with n still fits.
        let largest =
            hash_from_hex("000000000000000000000000000000014551231950b75fc4402da1732fc9bebe");
        assert_eq!(add_order(&largest), Some([0xffu8; 32]));

        let mut one_more = largest;
        one_more[31] += 1;
        assert!(add_order(&one_more).is_none());
    }

    #[test]
    fn test_sign_then_recover_many_keys() {
        for last in 1..=20u8 {
            let mut bytes = [0u8; 32];
            bytes[0] = last;
            bytes[31] = last;
            let key = PrivateKey::from_bytes(&bytes).unwrap();
            let hash = sha256d(&[last; 3]);
            let sig = key.sign_compact(&hash, last % 2 == 0).unwrap();
            let parsed = CompactSignature::from_bytes(&sig.to_bytes()).unwrap();
            assert_eq!(parsed.recover_public_key(&hash).unwrap(), key.pub_key());
        }
    }

    #[test]
    fn test_high_s_recovers_same_key() {
        let key = PrivateKey::from_hex(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        )
        .unwrap();
        let hash = sha256d(b"high-s twin");
        let low = key.sign_compact(&hash, true).unwrap();

        // (r, n - s) pairs with the opposite R parity.
        let s = Option::<NonZeroScalar>::from(NonZeroScalar::from_repr(FieldBytes::from(*low.s())))
            .unwrap();
        let high_s: [u8; 32] = (-*s).to_bytes().into();
        let flipped = RecoveryHeader::new(low.header().recovery_id() ^ 1, true).unwrap();
        let high = CompactSignature::new(flipped, *low.r(), high_s);

        assert_ne!(high.s(), low.s());
        assert_eq!(high.recover_public_key(&hash).unwrap(), key.pub_key());
    }
}
