//! Encrypted lookup
//!
//! Every store entry is compared against the query independently, so the
//! per-entry work (equality mask plus masking of the value) fans out over a
//! rayon pool. Masked values are collected in store order and summed
//! sequentially, which keeps the aggregate deterministic.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::aggregate::{masked_value, Accumulator};
use crate::encoding::FieldCodec;
use crate::error::{Result, SearchError};
use crate::mask::compute_mask;
use crate::params::{validate_runtime, SearchParams};
use crate::runtime::HeRuntime;
use crate::store::{EncryptedEntry, EncryptedStore};

/// Timing of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMetrics {
    /// Store entries compared against the query
    pub entries: usize,
    /// Equality masks and masked values, all entries
    pub mask_time: Duration,
    /// Summation of the masked values
    pub aggregate_time: Duration,
    pub total_time: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchReport<C> {
    pub result: C,
    pub metrics: SearchMetrics,
}

pub struct Searcher<'a, R: HeRuntime> {
    rt: &'a R,
    codec: FieldCodec,
    pool: Option<ThreadPool>,
}

impl<'a, R: HeRuntime> Searcher<'a, R> {
    /// Check `params` against the runtime and set up the worker pool
    pub fn new(rt: &'a R, params: &SearchParams) -> Result<Self> {
        params.validate()?;
        validate_runtime(rt)?;

        if rt.slot_count() != params.slot_count
            || rt.plaintext_modulus() != params.plaintext_modulus
        {
            return Err(SearchError::Configuration(format!(
                "runtime has {} slots mod {}, parameters ask for {} slots mod {}",
                rt.slot_count(),
                rt.plaintext_modulus(),
                params.slot_count,
                params.plaintext_modulus
            )));
        }

        let pool = params
            .threads
            .map(|threads| ThreadPoolBuilder::new().num_threads(threads).build())
            .transpose()
            .map_err(|e| SearchError::Configuration(e.to_string()))?;

        Ok(Self {
            rt,
            codec: FieldCodec::from_params(params),
            pool,
        })
    }

    pub fn encrypt_query(&self, key: &str) -> Result<R::Ciphertext> {
        let slots = self.codec.encode(key)?;
        self.rt.encode_encrypt(&slots)
    }

    /// Decrypt and decode a search result. `None` means no entry matched.
    pub fn decrypt_result(&self, ct: &R::Ciphertext) -> Result<Option<String>> {
        let slots = self.rt.decrypt_decode(ct)?;
        if slots.first().copied().unwrap_or(0) == 0 {
            return Ok(None);
        }
        Ok(Some(self.codec.decode(&slots)))
    }

    /// Encrypted value stored under the encrypted `query`, or an encryption
    /// of all zeros when no key matches
    pub fn search(
        &self,
        store: &EncryptedStore<R::Ciphertext>,
        query: &R::Ciphertext,
    ) -> Result<R::Ciphertext> {
        Ok(self.search_with_metrics(store, query)?.result)
    }

    pub fn search_with_metrics(
        &self,
        store: &EncryptedStore<R::Ciphertext>,
        query: &R::Ciphertext,
    ) -> Result<SearchReport<R::Ciphertext>> {
        let start = Instant::now();

        let run = || {
            store
                .entries()
                .par_iter()
                .enumerate()
                .map(|(i, entry)| self.mask_entry(i, entry, query))
                .collect::<Result<Vec<_>>>()
        };
        let masked = match &self.pool {
            Some(pool) => pool.install(run)?,
            None => run()?,
        };
        let mask_time = start.elapsed();

        let agg_start = Instant::now();
        let mut acc = Accumulator::new(self.rt);
        for ct in masked {
            acc.push(ct)?;
        }
        let entries = acc.count();
        let result = acc.finish()?;
        let aggregate_time = agg_start.elapsed();

        let metrics = SearchMetrics {
            entries,
            mask_time,
            aggregate_time,
            total_time: start.elapsed(),
        };
        info!(
            entries = metrics.entries,
            mask_ms = mask_time.as_millis() as u64,
            aggregate_ms = aggregate_time.as_millis() as u64,
            "encrypted search finished"
        );

        Ok(SearchReport { result, metrics })
    }

    /// Same result as [`Searcher::search`], one entry at a time on the calling
    /// thread
    pub fn search_sequential(
        &self,
        store: &EncryptedStore<R::Ciphertext>,
        query: &R::Ciphertext,
    ) -> Result<R::Ciphertext> {
        let mut acc = Accumulator::new(self.rt);
        for (i, entry) in store.entries().iter().enumerate() {
            acc.push(self.mask_entry(i, entry, query)?)?;
        }
        acc.finish()
    }

    /// Encrypt `key`, search, and decrypt the answer
    pub fn lookup(
        &self,
        store: &EncryptedStore<R::Ciphertext>,
        key: &str,
    ) -> Result<Option<String>> {
        let query = self.encrypt_query(key)?;
        let result = self.search(store, &query)?;
        self.decrypt_result(&result)
    }

    fn mask_entry(
        &self,
        index: usize,
        entry: &EncryptedEntry<R::Ciphertext>,
        query: &R::Ciphertext,
    ) -> Result<R::Ciphertext> {
        let masked = compute_mask(self.rt, entry.key(), query)
            .and_then(|mask| masked_value(self.rt, mask, entry.value()))
            .map_err(|e| e.at_entry(index))?;
        debug!(entry = index, "entry masked");
        Ok(masked)
    }
}
