use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::encoding::FieldCodec;
use crate::error::Result;
use crate::params::validate_runtime;
use crate::runtime::HeRuntime;

/// An encrypted (key, value) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedEntry<C> {
    key: C,
    value: C,
}

impl<C> EncryptedEntry<C> {
    pub fn key(&self) -> &C {
        &self.key
    }

    pub fn value(&self) -> &C {
        &self.value
    }
}

/// The encrypted key/value database, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedStore<C> {
    entries: Vec<EncryptedEntry<C>>,
}

impl<C> EncryptedStore<C> {
    pub fn entries(&self) -> &[EncryptedEntry<C>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Serialize + DeserializeOwned> EncryptedStore<C> {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Encrypt every pair of `pairs` into a store.
///
/// All fields are encoded before anything is encrypted, so an oversized field
/// fails the build without spending any encryption work. Encryption itself runs
/// on the rayon pool; entry order is preserved. The runtime is validated
/// first.
pub fn build<R, K, V>(rt: &R, pairs: &[(K, V)]) -> Result<EncryptedStore<R::Ciphertext>>
where
    R: HeRuntime,
    K: AsRef<str>,
    V: AsRef<str>,
{
    validate_runtime(rt)?;

    let start = Instant::now();
    let codec = FieldCodec::new(rt.slot_count(), rt.plaintext_modulus());

    let encoded = pairs
        .iter()
        .enumerate()
        .map(|(i, (k, v))| {
            let key = codec.encode(k.as_ref()).map_err(|e| e.at_entry(i))?;
            let value = codec.encode(v.as_ref()).map_err(|e| e.at_entry(i))?;
            Ok((key, value))
        })
        .collect::<Result<Vec<_>>>()?;

    let entries = encoded
        .par_iter()
        .enumerate()
        .map(|(i, (key, value))| {
            let key = rt.encode_encrypt(key).map_err(|e| e.at_entry(i))?;
            let value = rt.encode_encrypt(value).map_err(|e| e.at_entry(i))?;
            Ok(EncryptedEntry { key, value })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        entries = entries.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "encrypted store built"
    );

    Ok(EncryptedStore { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clear::{Approximate, ClearCiphertext, ClearRuntime};
    use crate::error::SearchError;
    use crate::params::SearchParams;

    fn runtime(n: usize) -> ClearRuntime {
        ClearRuntime::new(&SearchParams::ascii(n)).unwrap()
    }

    #[test]
    fn test_build_preserves_order() {
        let rt = runtime(16);
        let codec = FieldCodec::new(16, 257);
        let pairs = [("Norway", "Oslo"), ("Sweden", "Stockholm"), ("Denmark", "Copenhagen")];
        let store = build(&rt, &pairs).unwrap();

        assert_eq!(store.len(), 3);
        for (entry, (k, v)) in store.entries().iter().zip(pairs.iter()) {
            assert_eq!(codec.decode(&rt.decrypt_decode(entry.key()).unwrap()), *k);
            assert_eq!(codec.decode(&rt.decrypt_decode(entry.value()).unwrap()), *v);
        }
    }

    #[test]
    fn test_build_encrypts_each_field_once() {
        let rt = runtime(8);
        let pairs = vec![
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "2".to_string()),
        ];
        build(&rt, &pairs).unwrap();
        assert_eq!(rt.op_counts().encryptions, 4);
    }

    #[test]
    fn test_build_names_offending_entry() {
        let rt = runtime(8);
        let pairs = [("Norway", "Oslo"), ("Sweden", "Stockholm")];
        let err = build(&rt, &pairs).unwrap_err();

        let (index, source) = err.entry().unwrap();
        assert_eq!(index, 1);
        assert!(matches!(
            source,
            SearchError::FieldTooLong { len: 9, max: 8, .. }
        ));
        assert_eq!(rt.op_counts().encryptions, 0);
    }

    #[test]
    fn test_build_rejects_approximate_runtime() {
        let rt = Approximate(runtime(8));
        assert!(matches!(
            build(&rt, &[("Norway", "Oslo")]),
            Err(SearchError::Configuration(_))
        ));
        assert_eq!(rt.0.op_counts().encryptions, 0);
    }

    #[test]
    fn test_empty_store() {
        let rt = runtime(8);
        let pairs: [(&str, &str); 0] = [];
        let store = build(&rt, &pairs).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_bytes() {
        let rt = runtime(8);
        let store = build(&rt, &[("Norway", "Oslo")]).unwrap();
        let bytes = store.to_bytes().unwrap();
        let restored = EncryptedStore::<ClearCiphertext>::from_bytes(&bytes).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.entries()[0].key(), store.entries()[0].key());
        assert_eq!(restored.entries()[0].value(), store.entries()[0].value());
    }

    #[test]
    fn test_store_bytes_rejects_garbage() {
        assert!(matches!(
            EncryptedStore::<ClearCiphertext>::from_bytes(&[1, 2, 3]),
            Err(SearchError::Serialization { .. })
        ));
    }
}
