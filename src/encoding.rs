//! String fields as slot vectors
//!
//! A field of `len` characters occupies slots `0..len` with its character
//! codes; the remaining slots stay zero. `"Norway"` in eight slots is
//! `[78, 111, 114, 119, 97, 121, 0, 0]`.

use crate::error::{Result, SearchError};
use crate::params::SearchParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCodec {
    max_len: usize,
    modulus: u64,
}

impl FieldCodec {
    pub fn new(max_len: usize, modulus: u64) -> Self {
        Self { max_len, modulus }
    }

    /// Codec spanning every slot of a ciphertext
    pub fn from_params(params: &SearchParams) -> Self {
        Self::new(params.slot_count, params.plaintext_modulus)
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Character codes of `field`, without padding
    pub fn encode(&self, field: &str) -> Result<Vec<u64>> {
        let len = field.chars().count();
        if len > self.max_len {
            return Err(SearchError::FieldTooLong {
                field: field.to_owned(),
                len,
                max: self.max_len,
            });
        }

        field
            .chars()
            .map(|c| {
                let code = c as u64;
                if code >= self.modulus {
                    return Err(SearchError::Configuration(format!(
                        "character {c:?} in {field:?} has code {code}, not below the modulus {}",
                        self.modulus
                    )));
                }
                Ok(code)
            })
            .collect()
    }

    /// Inverse of [`FieldCodec::encode`]. Stops at the first zero slot or after
    /// `max_len` slots.
    pub fn decode(&self, slots: &[u64]) -> String {
        slots
            .iter()
            .take(self.max_len)
            .take_while(|&&v| v != 0)
            .map(|&v| {
                u32::try_from(v)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: u64 = 257;

    #[test]
    fn test_encode_norway() {
        let codec = FieldCodec::new(8, P);
        assert_eq!(
            codec.encode("Norway").unwrap(),
            vec![78, 111, 114, 119, 97, 121]
        );
    }

    #[test]
    fn test_decode_stops_at_zero() {
        let codec = FieldCodec::new(8, P);
        assert_eq!(codec.decode(&[79, 115, 108, 111, 0, 65, 65, 65]), "Oslo");
        assert_eq!(codec.decode(&[0; 8]), "");
    }

    #[test]
    fn test_decode_stops_at_max_len() {
        let codec = FieldCodec::new(3, P);
        assert_eq!(codec.decode(&[65, 66, 67, 68]), "ABC");
    }

    #[test]
    fn test_exact_length_boundary() {
        let codec = FieldCodec::new(8, P);
        assert_eq!(codec.encode("Portugal").unwrap().len(), 8);
        match codec.encode("Portugal!") {
            Err(SearchError::FieldTooLong { field, len, max }) => {
                assert_eq!(field, "Portugal!");
                assert_eq!(len, 9);
                assert_eq!(max, 8);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_code_above_modulus() {
        let codec = FieldCodec::new(8, 127);
        assert!(matches!(
            codec.encode("Zürich"),
            Err(SearchError::Configuration(_))
        ));
        assert!(FieldCodec::new(8, P).encode("Zürich").is_ok());
    }

    #[test]
    fn test_empty_field() {
        let codec = FieldCodec::new(8, P);
        assert!(codec.encode("").unwrap().is_empty());
    }
}
