/// Execution payload assembly. The executor contract takes a bare packed
/// byte string rather than ABI-encoded calldata: fragments are concatenated
/// hex, addresses are 20 bytes, and amounts are truncated to their declared
/// bit width. The leading selector byte is derived from a keccak digest of
/// three snapshot words so the contract can cheaply pin the quote the
/// payload was built from.
use alloy::primitives::{keccak256, Address, I256};
use eyre::{bail, Result};

use super::sample::RoiVector;
use super::triangle::Triangle;

/// One fragment of a packed payload.
#[derive(Clone, Debug)]
pub enum PackedValue {
    /// A pre-rendered hex fragment, appended verbatim
    Hex(String),
    /// A 256-bit word truncated to its trailing `bits / 4` hex chars
    Word {
        /// The value to encode, big-endian two's complement
        value: I256,
        /// Declared width in bits; must be a multiple of 4 and at most 256
        bits: usize,
    },
    /// An address, rendered as 40 hex chars without the `0x` prefix
    Addr(Address),
}

/// Concatenates fragments into one hex payload string.
///
/// Each value's own width determines how many hex chars it contributes: a
/// word keeps the trailing `bits / 4` chars of its 64-char big-endian
/// rendering, an address always contributes 40.
///
/// # Errors
/// Returns an error if a word's declared width is zero, above 256 bits, or
/// not nibble-aligned.
pub fn encode_packed(values: &[PackedValue]) -> Result<String> {
    let mut encoded = String::new();
    for value in values {
        match value {
            PackedValue::Hex(fragment) => encoded.push_str(fragment),
            PackedValue::Word { value, bits } => {
                if *bits == 0 || *bits > 256 || bits % 4 != 0 {
                    bail!("unsupported packed word width: {bits} bits");
                }
                let full = hex::encode(value.to_be_bytes::<32>());
                encoded.push_str(&full[full.len() - bits / 4..]);
            }
            PackedValue::Addr(address) => {
                encoded.push_str(&hex::encode(address.as_slice()));
            }
        }
    }
    Ok(encoded)
}

/// A `u32` as its 8-char big-endian hex rendering.
#[must_use]
pub fn uint32_hex(value: u32) -> String {
    hex::encode(value.to_be_bytes())
}

/// The payload selector byte: first two hex chars of the keccak-256 digest
/// over three 32-byte snapshot words.
#[must_use]
pub fn selector_byte(words: [I256; 3]) -> String {
    let mut preimage = [0u8; 96];
    for (i, word) in words.iter().enumerate() {
        preimage[i * 32..(i + 1) * 32].copy_from_slice(&word.to_be_bytes::<32>());
    }
    hex::encode(keccak256(preimage))[..2].to_string()
}

/// Assembles the packed execution payload for a confirmed opportunity from
/// the exact-point reply and the triangle's own addresses.
///
/// # Errors
/// Returns an error if the reply is too short to supply every payload field.
pub fn build_payload(triangle: &Triangle, frame: &RoiVector) -> Result<String> {
    let Some(digest_words) = frame.digest_words() else {
        bail!("detail reply too short for payload assembly");
    };

    let addr_word = |i: usize| -> Result<PackedValue> {
        frame
            .address_at(i)
            .map(PackedValue::Addr)
            .ok_or_else(|| eyre::eyre!("detail reply missing address word {i}"))
    };
    let wei96 = |i: usize| -> Result<PackedValue> {
        frame
            .word_at(i)
            .map(|value| PackedValue::Word { value, bits: 96 })
            .ok_or_else(|| eyre::eyre!("detail reply missing amount word {i}"))
    };

    let [token0, token1, token2] = triangle.tokens();
    let [pair0, pair1, pair2] = triangle.pairs();

    let fragments = [
        PackedValue::Hex(uint32_hex(0)),
        PackedValue::Hex(selector_byte(digest_words)),
        addr_word(0)?,
        wei96(6)?,
        addr_word(1)?,
        wei96(7)?,
        addr_word(2)?,
        wei96(10)?,
        PackedValue::Addr(token0),
        wei96(11)?,
        PackedValue::Addr(pair0),
        wei96(12)?,
        PackedValue::Addr(token1),
        wei96(13)?,
        PackedValue::Addr(pair1),
        PackedValue::Addr(token2),
        PackedValue::Addr(pair2),
    ];

    encode_packed(&fragments)
}
