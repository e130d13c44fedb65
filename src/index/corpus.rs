use crate::index::error::IngestError;
use crate::index::store::{MemoryStore, Store};
use crate::index::types::{ImageId, ImageRecord, TokenRecord};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

type ImageMap = BTreeMap<ImageId, Arc<ImageRecord>>;

/// In-memory corpus of image records, written through to a [`Store`].
///
/// Writers serialize on the lock; readers take cheap [`CorpusSnapshot`]s that
/// never observe a later write (the map is copied on write while a snapshot
/// is alive).
pub struct CorpusIndex {
    store: Box<dyn Store>,
    images: RwLock<Arc<ImageMap>>,
}

impl CorpusIndex {
    /// Open an index over `store`, loading and validating every persisted record
    pub fn open(store: Box<dyn Store>) -> Result<Self, IngestError> {
        let mut images = ImageMap::new();
        for mut record in store.load_all()? {
            record.renormalize();
            record.validate()?;
            images.insert(record.id, Arc::new(record));
        }
        tracing::debug!(images = images.len(), "corpus loaded");

        Ok(Self {
            store,
            images: RwLock::new(Arc::new(images)),
        })
    }

    /// An empty index backed by a [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            images: RwLock::new(Arc::new(ImageMap::new())),
        }
    }

    /// Index `tokens` under `id`, replacing any previous entry
    pub fn add_image(&self, id: ImageId, tokens: Vec<TokenRecord>) -> Result<(), IngestError> {
        self.add_record(ImageRecord::new(id, tokens))
    }

    /// Index a complete record, replacing any previous entry with the same id.
    ///
    /// Normalized text is re-derived from the raw text, then the record is
    /// validated and persisted before it becomes visible.
    pub fn add_record(&self, mut record: ImageRecord) -> Result<(), IngestError> {
        record.renormalize();
        record.validate()?;

        let mut images = self.images.write();
        self.store.put(&record)?;
        tracing::debug!(id = record.id, tokens = record.tokens.len(), "image indexed");
        Arc::make_mut(&mut *images).insert(record.id, Arc::new(record));
        Ok(())
    }

    /// Remove an image; returns whether it was present
    pub fn remove_image(&self, id: ImageId) -> Result<bool, IngestError> {
        let mut images = self.images.write();
        let persisted = self.store.delete(id)?;
        let removed = if images.contains_key(&id) {
            Arc::make_mut(&mut *images).remove(&id).is_some()
        } else {
            false
        };
        if removed || persisted {
            tracing::debug!(id, "image removed");
        }
        Ok(removed || persisted)
    }

    /// Consistent point-in-time view for one query
    pub fn snapshot(&self) -> CorpusSnapshot {
        CorpusSnapshot {
            images: Arc::clone(&*self.images.read()),
        }
    }

    /// Lazy pass over a snapshot taken now; each call starts a fresh pass
    pub fn all_images(&self) -> ImageIter {
        self.snapshot().into_iter()
    }

    pub fn get(&self, id: ImageId) -> Option<Arc<ImageRecord>> {
        self.images.read().get(&id).cloned()
    }

    /// Id of an image already holding content with this hash
    pub fn find_by_hash(&self, content_hash: &str) -> Option<ImageId> {
        if content_hash.is_empty() {
            return None;
        }
        self.images
            .read()
            .values()
            .find(|r| r.content_hash == content_hash)
            .map(|r| r.id)
    }

    /// Next unused id (one past the largest)
    pub fn next_id(&self) -> ImageId {
        self.images
            .read()
            .keys()
            .next_back()
            .map_or(1, |max| max + 1)
    }

    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }
}

/// Immutable view of the corpus at the moment it was taken
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    images: Arc<ImageMap>,
}

impl CorpusSnapshot {
    /// Build a detached snapshot directly from records (later duplicates win)
    pub fn from_records(records: impl IntoIterator<Item = ImageRecord>) -> Self {
        let images = records
            .into_iter()
            .map(|mut r| {
                r.renormalize();
                (r.id, Arc::new(r))
            })
            .collect();
        Self {
            images: Arc::new(images),
        }
    }

    /// Every image in ascending id order
    pub fn all_images(&self) -> impl Iterator<Item = &ImageRecord> {
        self.images.values().map(|r| r.as_ref())
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.images.get(&id).map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl IntoIterator for CorpusSnapshot {
    type Item = Arc<ImageRecord>;
    type IntoIter = ImageIter;

    fn into_iter(self) -> ImageIter {
        ImageIter {
            images: self.images,
            cursor: None,
        }
    }
}

/// Owning, lazy iterator over a snapshot in ascending id order
pub struct ImageIter {
    images: Arc<ImageMap>,
    cursor: Option<ImageId>,
}

impl Iterator for ImageIter {
    type Item = Arc<ImageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let lower = match self.cursor {
            Some(id) => Bound::Excluded(id),
            None => Bound::Unbounded,
        };
        let (id, record) = self.images.range((lower, Bound::Unbounded)).next()?;
        self.cursor = Some(*id);
        Some(Arc::clone(record))
    }
}
