//! Structural recognition of encrypted-value envelopes.
//!
//! An envelope is binary data of the `Encrypted` subtype whose payload starts
//! with a fixed header:
//!
//! ```text
//! Offset  Size  Field
//! 0       1     Encryption scheme tag
//! 1       16    Key identifier (UUID bytes)
//! 17      1     Element type of the original plaintext
//! 18..    var   Scheme-specific ciphertext, never inspected here
//! ```
//!
//! Only the header shape is checked. Nothing is decrypted or authenticated.

use bson::spec::{BinarySubtype, ElementType};
use bson::{Binary, Bson, Uuid};

/// Size of the fixed envelope header in bytes.
pub const HEADER_LEN: usize = 18;

/// Scheme tags that can lead an encrypted binary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EncryptedBinDataType {
    Placeholder = 0,
    Deterministic = 1,
    Random = 2,
    Fle2Placeholder = 3,
    Fle2InsertUpdatePayload = 4,
    Fle2FindEqualityPayload = 5,
    Fle2UnindexedEncryptedValue = 6,
    Fle2EqualityIndexedValue = 7,
    Fle2RangeIndexedValue = 9,
    Fle2FindRangePayload = 10,
    Fle2InsertUpdatePayloadV2 = 11,
    Fle2FindEqualityPayloadV2 = 12,
    Fle2FindRangePayloadV2 = 13,
    Fle2EqualityIndexedValueV2 = 14,
    Fle2RangeIndexedValueV2 = 15,
    Fle2UnindexedEncryptedValueV2 = 16,
}

impl EncryptedBinDataType {
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::Placeholder,
            1 => Self::Deterministic,
            2 => Self::Random,
            3 => Self::Fle2Placeholder,
            4 => Self::Fle2InsertUpdatePayload,
            5 => Self::Fle2FindEqualityPayload,
            6 => Self::Fle2UnindexedEncryptedValue,
            7 => Self::Fle2EqualityIndexedValue,
            9 => Self::Fle2RangeIndexedValue,
            10 => Self::Fle2FindRangePayload,
            11 => Self::Fle2InsertUpdatePayloadV2,
            12 => Self::Fle2FindEqualityPayloadV2,
            13 => Self::Fle2FindRangePayloadV2,
            14 => Self::Fle2EqualityIndexedValueV2,
            15 => Self::Fle2RangeIndexedValueV2,
            16 => Self::Fle2UnindexedEncryptedValueV2,
            _ => return None,
        })
    }

    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Whether this tag marks a value that may be stored in a document
    /// (indexed-equality, indexed-range, or unindexed).
    ///
    /// Placeholders and query/insert payloads are client-to-server only, and
    /// `Deterministic`/`Random` belong to the legacy scheme.
    #[must_use]
    pub fn is_stored_value(self) -> bool {
        matches!(
            self,
            Self::Fle2UnindexedEncryptedValue
                | Self::Fle2EqualityIndexedValue
                | Self::Fle2RangeIndexedValue
                | Self::Fle2EqualityIndexedValueV2
                | Self::Fle2RangeIndexedValueV2
                | Self::Fle2UnindexedEncryptedValueV2
        )
    }

    /// Whether this tag belongs to the legacy deterministic/random scheme.
    #[must_use]
    pub fn is_legacy(self) -> bool {
        matches!(self, Self::Deterministic | Self::Random)
    }
}

/// The fixed-size prefix of an encrypted envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub scheme: u8,
    pub key_id: Uuid,
    pub original_type: u8,
}

impl EnvelopeHeader {
    #[must_use]
    pub fn new(scheme: EncryptedBinDataType, key_id: Uuid, original_type: ElementType) -> Self {
        Self {
            scheme: scheme.tag(),
            key_id,
            original_type: original_type as u8,
        }
    }

    /// Read the header from the front of `bytes`. `None` if too short.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (&scheme, rest) = bytes.split_first()?;
        let key_bytes: [u8; 16] = rest.get(..16)?.try_into().ok()?;
        let &original_type = rest.get(16)?;
        Some(Self {
            scheme,
            key_id: Uuid::from_bytes(key_bytes),
            original_type,
        })
    }

    #[must_use]
    pub fn scheme_type(&self) -> Option<EncryptedBinDataType> {
        EncryptedBinDataType::from_tag(self.scheme)
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0_u8; HEADER_LEN];
        out[0] = self.scheme;
        out[1..17].copy_from_slice(&self.key_id.bytes());
        out[17] = self.original_type;
        out
    }

    /// Wrap the header and `payload` into an `Encrypted` binary value.
    #[must_use]
    pub fn into_bson(self, payload: &[u8]) -> Bson {
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(&self.to_bytes());
        bytes.extend_from_slice(payload);
        Bson::Binary(Binary {
            subtype: BinarySubtype::Encrypted,
            bytes,
        })
    }
}

/// Whether `value` is a well-formed envelope for a plaintext of type `expected`.
///
/// Any other shape yields `false`; this never panics, whatever the input bytes.
#[must_use]
pub fn matches_envelope(value: &Bson, expected: ElementType) -> bool {
    let Bson::Binary(binary) = value else {
        tracing::trace!(found = ?value.element_type(), "envelope rejected: not binary");
        return false;
    };
    if binary.subtype != BinarySubtype::Encrypted {
        tracing::trace!(subtype = ?binary.subtype, "envelope rejected: wrong binary subtype");
        return false;
    }
    let Some(header) = EnvelopeHeader::parse(&binary.bytes) else {
        tracing::trace!(len = binary.bytes.len(), "envelope rejected: truncated header");
        return false;
    };
    match header.scheme_type() {
        Some(scheme) if scheme.is_stored_value() => {}
        Some(scheme) if scheme.is_legacy() => {
            tracing::trace!(scheme = header.scheme, "envelope rejected: legacy scheme");
            return false;
        }
        _ => {
            tracing::trace!(scheme = header.scheme, "envelope rejected: scheme tag");
            return false;
        }
    }
    if header.original_type != expected as u8 {
        tracing::trace!(
            found = header.original_type,
            expected = expected as u8,
            "envelope rejected: plaintext type"
        );
        return false;
    }
    true
}
