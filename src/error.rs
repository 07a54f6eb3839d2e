use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("field {field:?} has {len} characters but only {max} slots are available")]
    FieldTooLong {
        field: String,
        len: usize,
        max: usize,
    },

    #[error("incompatible ciphertext: {0}")]
    IncompatibleCiphertext(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<SearchError>,
    },

    #[error("store serialization failed: {source}")]
    Serialization {
        #[from]
        source: bincode::Error,
    },
}

impl SearchError {
    /// Attaches the index of the offending store entry
    pub(crate) fn at_entry(self, index: usize) -> Self {
        SearchError::Entry {
            index,
            source: Box::new(self),
        }
    }

    /// Index and cause when the error belongs to a single store entry
    pub fn entry(&self) -> Option<(usize, &SearchError)> {
        match self {
            SearchError::Entry { index, source } => Some((*index, source.as_ref())),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
