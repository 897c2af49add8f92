//! # Byte-Level Remapping Table
//!
//! The fixed bijection between raw byte values and printable codepoints
//! used by byte-level BPE models: whitespace and control bytes become
//! visible, ordinary symbols the encoder can merge.

use crate::types::TlHashMap;

/// Bijective ``byte <-> printable char`` remapping table.
///
/// Printable ASCII and the printable Latin-1 ranges map to themselves;
/// the remaining byte values map to `256 + k` in table order, which is
/// the convention byte-level reference vocabularies are keyed by.
#[derive(Debug, Clone)]
pub struct ByteLevel {
    byte_to_char: [char; 256],
    char_to_byte: TlHashMap<char, u8>,
}

impl Default for ByteLevel {
    fn default() -> Self {
        let mut byte_to_char = ['\0'; 256];
        let mut next = 0_u32;

        for b in 0..=255_u8 {
            let printable = (b'!'..=b'~').contains(&b)
                || (0xA1..=0xAC).contains(&b)
                || (0xAE..=0xFF).contains(&b);

            byte_to_char[b as usize] = if printable {
                b as char
            } else {
                let c = char::from_u32(256 + next).unwrap();
                next += 1;
                c
            };
        }

        let char_to_byte = byte_to_char
            .iter()
            .enumerate()
            .map(|(b, &c)| (c, b as u8))
            .collect();

        Self {
            byte_to_char,
            char_to_byte,
        }
    }
}

impl ByteLevel {
    /// Remap every UTF-8 byte of `text` to its printable char.
    pub fn encode_str(
        &self,
        text: &str,
    ) -> String {
        self.encode_bytes(text.as_bytes())
    }

    /// Remap raw bytes to their printable chars.
    pub fn encode_bytes(
        &self,
        bytes: &[u8],
    ) -> String {
        bytes.iter().map(|&b| self.byte_to_char[b as usize]).collect()
    }

    /// The printable char for one byte.
    pub fn encode_byte(
        &self,
        byte: u8,
    ) -> char {
        self.byte_to_char[byte as usize]
    }

    /// Invert the remapping back to raw bytes.
    ///
    /// Chars outside the table should not occur in well-formed
    /// byte-level token strings; they are carried through as their own
    /// UTF-8 bytes rather than dropped.
    pub fn decode_to_bytes(
        &self,
        text: &str,
    ) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len());
        for c in text.chars() {
            match self.char_to_byte.get(&c) {
                Some(&b) => bytes.push(b),
                None => {
                    let mut buf = [0_u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        bytes
    }

    /// Invert the remapping and decode as UTF-8, lossily.
    pub fn decode_lossy(
        &self,
        text: &str,
    ) -> String {
        String::from_utf8_lossy(&self.decode_to_bytes(text)).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bijection() {
        let table = ByteLevel::default();

        // Every byte maps to a distinct char and back.
        for b in 0..=255_u8 {
            let c = table.encode_byte(b);
            assert_eq!(table.char_to_byte[&c], b);
        }
        assert_eq!(table.char_to_byte.len(), 256);
    }

    #[test]
    fn test_known_mappings() {
        let table = ByteLevel::default();

        // Printable ASCII maps to itself.
        assert_eq!(table.encode_byte(b'a'), 'a');
        assert_eq!(table.encode_byte(b'!'), '!');
        // Space is the first shifted byte after the 0x00..=0x1F run.
        assert_eq!(table.encode_byte(b' '), '\u{0120}');
        assert_eq!(table.encode_str("hi there"), "hi\u{0120}there");
    }

    #[test]
    fn test_round_trip() {
        let table = ByteLevel::default();

        for sample in ["hello world", "naïve\tmix\n", "😀 emoji"] {
            let encoded = table.encode_str(sample);
            assert_eq!(table.decode_lossy(&encoded), sample);
        }
    }
}
