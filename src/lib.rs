//! Encrypted equality-match lookup over a homomorphically encrypted key/value store
//!
//! Keys and values are strings packed one character per slot into ciphertexts of
//! an HE scheme with exact arithmetic over Z_p. A query is answered without
//! decrypting anything: each stored key is compared to the encrypted query
//! through Fermat's little theorem and a rotate-and-multiply reduction, the
//! resulting 0/1 mask selects the stored value, and all masked values are summed.
//!
//! The scheme sits behind [`HeRuntime`]. [`ClearRuntime`] implements it in the
//! clear for tests and benchmarks.
//!
//! # Example
//!```rust
//! use he_search::{build, ClearRuntime, SearchParams, Searcher};
//!
//! let params = SearchParams::demo();
//! let rt = ClearRuntime::new(&params).unwrap();
//!
//! let db = [("Norway", "Oslo"), ("Sweden", "Stockholm")];
//! let store = build(&rt, &db).unwrap();
//!
//! let searcher = Searcher::new(&rt, &params).unwrap();
//! let query = searcher.encrypt_query("Norway").unwrap();
//! let result = searcher.search(&store, &query).unwrap();
//!
//! assert_eq!(searcher.decrypt_result(&result).unwrap().as_deref(), Some("Oslo"));
//! assert_eq!(searcher.lookup(&store, "Finland").unwrap(), None);
//!```

pub mod aggregate;
pub mod clear;
pub mod encoding;
pub mod error;
pub mod mask;
pub mod math;
pub mod params;
pub mod runtime;
pub mod search;
pub mod slots;
pub mod store;

pub use aggregate::accumulate;
pub use clear::{ClearCiphertext, ClearRuntime, OpCounts};
pub use encoding::FieldCodec;
pub use error::{Result, SearchError};
pub use mask::compute_mask;
pub use params::SearchParams;
pub use runtime::HeRuntime;
pub use search::{SearchMetrics, SearchReport, Searcher};
pub use store::{build, EncryptedEntry, EncryptedStore};
