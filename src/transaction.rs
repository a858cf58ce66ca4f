//! Transaction result assembly.
//!
//! A [`TransactionResult`] binds a transaction id to a [`ResultSource`] and
//! lazily pulls three things through it: metadata, partitions, and
//! problems. Each is fetched at most once and cached. Relations are built
//! on demand from the cached metadata and partitions.
//!
//! Lazy accessors take `&mut self`: one owner populates the caches. Once
//! built, relations are `Arc`-shared and read-only.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ProjectionConfig;
use crate::error::{Result, ResultError};
use crate::metadata::Metadata;
use crate::partition::Partition;
use crate::problems::Problem;
use crate::relation::{Relation, RelationCollection, Term};
use crate::stats::{DecodeStats, StatsSnapshot};

// ── Transport boundary ────────────────────────────────────────────

/// External collaborator that produces the raw pieces of a transaction
/// result. Failures are passed through to the caller unchanged.
pub trait ResultSource {
    fn fetch_metadata(&self, txn_id: &str) -> anyhow::Result<Metadata>;

    fn fetch_partitions(&self, txn_id: &str) -> anyhow::Result<HashMap<String, Partition>>;

    fn fetch_problems(&self, txn_id: &str) -> anyhow::Result<Vec<Problem>>;
}

/// Encoding of the metadata bytes held by a [`PrefetchedSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    Json,
    MsgPack,
}

/// In-memory source over bytes that were already downloaded. Decodes on
/// every fetch.
#[derive(Debug, Clone)]
pub struct PrefetchedSource {
    metadata: Vec<u8>,
    format: MetadataFormat,
    partitions: Vec<(String, Vec<u8>)>,
    problems: Option<Vec<u8>>,
}

impl PrefetchedSource {
    pub fn new(metadata: Vec<u8>, format: MetadataFormat) -> Self {
        Self {
            metadata,
            format,
            partitions: Vec::new(),
            problems: None,
        }
    }

    /// Add the Arrow IPC stream for one relation id.
    pub fn with_partition(mut self, id: impl Into<String>, ipc: Vec<u8>) -> Self {
        self.partitions.push((id.into(), ipc));
        self
    }

    /// Set the problems JSON array.
    pub fn with_problems(mut self, json: Vec<u8>) -> Self {
        self.problems = Some(json);
        self
    }
}

impl ResultSource for PrefetchedSource {
    fn fetch_metadata(&self, _txn_id: &str) -> anyhow::Result<Metadata> {
        let metadata = match self.format {
            MetadataFormat::Json => Metadata::from_json(&self.metadata)?,
            MetadataFormat::MsgPack => Metadata::from_msgpack(&self.metadata)?,
        };
        Ok(metadata)
    }

    fn fetch_partitions(&self, _txn_id: &str) -> anyhow::Result<HashMap<String, Partition>> {
        self.partitions
            .iter()
            .map(|(id, bytes)| -> anyhow::Result<(String, Partition)> {
                Ok((id.clone(), Partition::from_ipc(bytes)?))
            })
            .collect()
    }

    fn fetch_problems(&self, _txn_id: &str) -> anyhow::Result<Vec<Problem>> {
        match &self.problems {
            Some(json) => Ok(Problem::list_from_json(json)?),
            None => Ok(Vec::new()),
        }
    }
}

// ── TransactionResult ─────────────────────────────────────────────

/// Projection of one transaction's outcome.
pub struct TransactionResult<S: ResultSource> {
    txn_id: String,
    source: S,
    config: ProjectionConfig,
    stats: Arc<DecodeStats>,
    metadata: Option<Metadata>,
    partitions: Option<HashMap<String, Arc<Partition>>>,
    problems: Option<Vec<Problem>>,
    relations: HashMap<String, Arc<Relation>>,
    collection: Option<RelationCollection>,
}

impl<S: ResultSource> TransactionResult<S> {
    pub fn new(txn_id: impl Into<String>, source: S) -> Self {
        Self::with_config(txn_id, source, ProjectionConfig::default())
    }

    pub fn with_config(txn_id: impl Into<String>, source: S, config: ProjectionConfig) -> Self {
        Self {
            txn_id: txn_id.into(),
            source,
            config,
            stats: Arc::new(DecodeStats::new()),
            metadata: None,
            partitions: None,
            problems: None,
            relations: HashMap::new(),
            collection: None,
        }
    }

    pub fn txn_id(&self) -> &str {
        &self.txn_id
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Relation signatures, fetched on first call.
    pub fn metadata(&mut self) -> Result<&Metadata> {
        let metadata = match self.metadata.take() {
            Some(m) => m,
            None => {
                tracing::debug!(txn_id = self.txn_id.as_str(), "Fetching metadata");
                self.source.fetch_metadata(&self.txn_id)?
            }
        };
        Ok(&*self.metadata.insert(metadata))
    }

    /// Partitions by relation id, fetched on first call.
    pub fn partitions(&mut self) -> Result<&HashMap<String, Arc<Partition>>> {
        let partitions = match self.partitions.take() {
            Some(p) => p,
            None => {
                tracing::debug!(txn_id = self.txn_id.as_str(), "Fetching partitions");
                self.source
                    .fetch_partitions(&self.txn_id)?
                    .into_iter()
                    .map(|(id, p)| {
                        let p = p.with_stats(Arc::clone(&self.stats)).with_config(&self.config);
                        (id, Arc::new(p))
                    })
                    .collect()
            }
        };
        Ok(&*self.partitions.insert(partitions))
    }

    /// Diagnostics, fetched on first call.
    pub fn problems(&mut self) -> Result<&[Problem]> {
        let problems = match self.problems.take() {
            Some(p) => p,
            None => {
                tracing::debug!(txn_id = self.txn_id.as_str(), "Fetching problems");
                self.source.fetch_problems(&self.txn_id)?
            }
        };
        Ok(self.problems.insert(problems).as_slice())
    }

    /// Base relation bound to `id`.
    ///
    /// A fully-constant relation may have no partition; any other relation
    /// without one is reported as not found.
    pub fn relation(&mut self, id: &str) -> Result<Arc<Relation>> {
        if let Some(r) = self.relations.get(id) {
            return Ok(Arc::clone(r));
        }

        let signature = self
            .metadata()?
            .signature_of(id)
            .cloned()
            .ok_or_else(|| ResultError::RelationNotFound(id.to_string()))?;
        let partition = match self.partitions()?.get(id) {
            Some(p) => Arc::clone(p),
            None if signature.physical_count() == 0 => Arc::new(Partition::empty()),
            None => {
                return Err(ResultError::RelationNotFound(format!(
                    "{} (no partition)",
                    id
                )))
            }
        };

        let relation = Arc::new(Relation::from_partition(
            id,
            partition,
            signature,
            Arc::clone(&self.stats),
        ));
        self.relations.insert(id.to_string(), Arc::clone(&relation));
        Ok(relation)
    }

    /// Every relation in the result, in metadata order. Built on first call.
    pub fn collection(&mut self) -> Result<&RelationCollection> {
        let collection = match self.collection.take() {
            Some(c) => c,
            None => {
                let ids: Vec<String> = self.metadata()?.ids().map(str::to_string).collect();
                let mut relations = Vec::with_capacity(ids.len());
                for id in &ids {
                    relations.push(self.relation(id)?);
                }
                tracing::debug!(
                    txn_id = self.txn_id.as_str(),
                    relations = relations.len(),
                    "Built relation collection"
                );
                RelationCollection::new(relations)
            }
        };
        Ok(&*self.collection.insert(collection))
    }

    /// Relations whose signature starts with `prefix`.
    pub fn relations(&mut self, prefix: &[Term]) -> Result<RelationCollection> {
        Ok(self.collection()?.select(prefix))
    }

    /// Like [`relations`](Self::relations) with textual terms; the
    /// configured wildcard string matches anything.
    pub fn select(&mut self, prefix: &[&str]) -> Result<RelationCollection> {
        let terms: Vec<Term> = prefix
            .iter()
            .map(|s| Term::parse(s, &self.config.wildcard))
            .collect();
        self.relations(&terms)
    }
}
