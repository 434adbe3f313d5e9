//! Conversion between 20-byte addresses and 32-byte topic words.
//!
//! Indexed `address` parameters occupy a full topic slot: twelve zero bytes
//! followed by the address. Hex rendering is always lowercase.
use alloy::primitives::Address;
use lifecycle_indexer_shared::types::TopicWord;

/// Left-pads an address into a topic word.
pub fn pad_address(address: Address) -> TopicWord {
    address.into_word()
}

/// Keeps the last 20 bytes of a topic word.
///
/// The twelve leading bytes are discarded without being checked, so
/// `pad_address(strip_address(w)) == w` only holds when they were zero.
pub fn strip_address(word: &TopicWord) -> Address {
    Address::from_word(*word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::hex;
    use alloy::primitives::{address, b256};

    #[test]
    fn test_pad_address_left_pads_with_zeros() {
        let worker = address!("00000000000000000000000000000000000000ab");
        let word = pad_address(worker);

        assert_eq!(
            word,
            b256!("0x00000000000000000000000000000000000000000000000000000000000000ab")
        );
        assert_eq!(&word[..12], &[0u8; 12]);
    }

    #[test]
    fn test_padded_address_renders_as_66_lowercase_chars() {
        let worker = address!("AbCdEf0123456789aBcDeF0123456789AbCdEf01");
        let rendered = hex::encode_prefixed(pad_address(worker));

        assert_eq!(rendered.len(), 66);
        assert_eq!(
            rendered,
            "0x000000000000000000000000abcdef0123456789abcdef0123456789abcdef01"
        );
    }

    #[test]
    fn test_strip_inverts_pad() {
        let worker = address!("1234567890abcdef1234567890abcdef12345678");
        assert_eq!(strip_address(&pad_address(worker)), worker);
    }

    #[test]
    fn test_strip_ignores_nonzero_prefix() {
        let word = b256!("0xffffffffffffffffffffffff1234567890abcdef1234567890abcdef12345678");
        let stripped = strip_address(&word);

        assert_eq!(stripped, address!("1234567890abcdef1234567890abcdef12345678"));
        assert_ne!(pad_address(stripped), word);
    }
}
