//! Image slots and the object URLs that display them.
//!
//! Every selected image gets an object URL from a [`BlobStore`]. The URL is
//! owned by exactly one [`ObjectUrl`] value and revoked when that value is
//! dropped, so replacing, clearing or dropping a slot never leaks a URL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use facelens_models::UploadFile;
use facelens_overlay::overlay::SourceImage;
use tracing::debug;
use uuid::Uuid;

use crate::candidate::UploadCandidate;
use crate::error::{ClientError, ClientResult};

const URL_PREFIX: &str = "blob:facelens/";

#[derive(Debug)]
struct Blob {
    mime_type: String,
    bytes: Arc<[u8]>,
}

#[derive(Debug, Default)]
struct StoreInner {
    blobs: Mutex<HashMap<String, Blob>>,
    revoked: AtomicUsize,
}

/// Registry of live object URLs.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    inner: Arc<StoreInner>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> MutexGuard<'_, HashMap<String, Blob>> {
        self.inner
            .blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `candidate` and return the URL that owns it.
    pub fn create(&self, candidate: &UploadCandidate) -> ObjectUrl {
        let url = format!("{}{}", URL_PREFIX, Uuid::new_v4());
        self.blobs().insert(
            url.clone(),
            Blob {
                mime_type: candidate.mime_type().to_string(),
                bytes: Arc::clone(candidate.bytes()),
            },
        );
        debug!(url = %url, "Object URL created");

        ObjectUrl {
            url,
            store: self.clone(),
        }
    }

    fn revoke(&self, url: &str) {
        if self.blobs().remove(url).is_some() {
            self.inner.revoked.fetch_add(1, Ordering::Relaxed);
            debug!(url = %url, "Object URL revoked");
        }
    }

    /// MIME type and bytes behind a live URL.
    pub fn resolve(&self, url: &str) -> Option<(String, Arc<[u8]>)> {
        self.blobs()
            .get(url)
            .map(|blob| (blob.mime_type.clone(), Arc::clone(&blob.bytes)))
    }

    /// Self-contained `data:` URI for a live URL, for use outside this process.
    pub fn data_uri(&self, url: &str) -> Option<String> {
        self.resolve(url)
            .map(|(mime_type, bytes)| format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes)))
    }

    /// Number of URLs created and not yet revoked.
    pub fn active_count(&self) -> usize {
        self.blobs().len()
    }

    /// Number of URLs revoked so far.
    pub fn revoked_count(&self) -> usize {
        self.inner.revoked.load(Ordering::Relaxed)
    }
}

/// Sole owner of one object URL; revokes it on drop.
#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
    store: BlobStore,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
    }
}

/// A selected image with its display URL and natural size.
#[derive(Debug)]
pub struct ImageSlot {
    pub candidate: UploadCandidate,
    pub url: ObjectUrl,
    pub width: u32,
    pub height: u32,
}

/// Fixed number of image slots sharing one blob store.
#[derive(Debug)]
pub struct SlotSet {
    store: BlobStore,
    slots: Vec<Option<ImageSlot>>,
}

impl SlotSet {
    pub fn new(store: BlobStore, len: usize) -> Self {
        Self {
            store,
            slots: (0..len).map(|_| None).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn entry(&mut self, index: usize) -> ClientResult<&mut Option<ImageSlot>> {
        self.slots.get_mut(index).ok_or(ClientError::InvalidSlot(index))
    }

    /// Put `candidate` into slot `index`, revoking the URL it replaces.
    pub fn set(&mut self, index: usize, candidate: UploadCandidate) -> ClientResult<&ImageSlot> {
        if index >= self.slots.len() {
            return Err(ClientError::InvalidSlot(index));
        }
        let (width, height) = candidate.dimensions()?;
        let url = self.store.create(&candidate);
        let entry = self.entry(index)?;
        *entry = Some(ImageSlot {
            candidate,
            url,
            width,
            height,
        });
        entry.as_ref().ok_or(ClientError::InvalidSlot(index))
    }

    pub fn clear(&mut self, index: usize) -> ClientResult<()> {
        *self.entry(index)? = None;
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn get(&self, index: usize) -> Option<&ImageSlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Whether every slot holds an image.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Image for slot `index` as an embeddable report source.
    pub fn source_image(&self, index: usize) -> Option<SourceImage> {
        let slot = self.get(index)?;
        let src = self.store.data_uri(slot.url.as_str())?;
        Some(SourceImage::new(src, slot.width, slot.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_png;

    fn candidate(name: &str) -> UploadCandidate {
        UploadCandidate::new(name, "image/png", test_png(2, 2))
    }

    #[test]
    fn test_url_revoked_once_on_drop() {
        let store = BlobStore::new();
        let url = store.create(&candidate("a.png"));
        let raw = url.as_str().to_string();
        assert!(raw.starts_with(URL_PREFIX));
        assert!(store.resolve(&raw).is_some());

        drop(url);
        assert!(store.resolve(&raw).is_none());
        assert_eq!(store.active_count(), 0);
        assert_eq!(store.revoked_count(), 1);

        store.revoke(&raw);
        assert_eq!(store.revoked_count(), 1);
    }

    #[test]
    fn test_replacing_slot_revokes_previous_url() {
        let store = BlobStore::new();
        let mut slots = SlotSet::new(store.clone(), 1);

        let first = slots.set(0, candidate("a.png")).unwrap().url.as_str().to_string();
        let second = slots.set(0, candidate("b.png")).unwrap().url.as_str().to_string();

        assert_ne!(first, second);
        assert!(store.resolve(&first).is_none());
        assert!(store.resolve(&second).is_some());
        assert_eq!(store.active_count(), 1);
        assert_eq!(slots.get(0).unwrap().candidate.name(), "b.png");
    }

    #[test]
    fn test_clear_and_drop_release_urls() {
        let store = BlobStore::new();
        let mut slots = SlotSet::new(store.clone(), 2);
        slots.set(0, candidate("a.png")).unwrap();
        slots.set(1, candidate("b.png")).unwrap();
        assert!(slots.is_complete());
        assert_eq!(store.active_count(), 2);

        slots.clear(0).unwrap();
        assert!(!slots.is_complete());
        assert_eq!(store.active_count(), 1);

        drop(slots);
        assert_eq!(store.active_count(), 0);
        assert_eq!(store.revoked_count(), 2);
    }

    #[test]
    fn test_invalid_index() {
        let mut slots = SlotSet::new(BlobStore::new(), 1);
        assert!(matches!(
            slots.set(3, candidate("a.png")),
            Err(ClientError::InvalidSlot(3))
        ));
        assert!(matches!(slots.clear(3), Err(ClientError::InvalidSlot(3))));
    }

    #[test]
    fn test_undecodable_image_leaves_slot_untouched() {
        let store = BlobStore::new();
        let mut slots = SlotSet::new(store.clone(), 1);
        slots.set(0, candidate("a.png")).unwrap();

        let broken = UploadCandidate::new("b.png", "image/png", vec![0u8; 4]);
        assert!(slots.set(0, broken).is_err());
        assert_eq!(slots.get(0).unwrap().candidate.name(), "a.png");
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_source_image_embeds_data_uri() {
        let mut slots = SlotSet::new(BlobStore::new(), 1);
        slots.set(0, candidate("a.png")).unwrap();

        let image = slots.source_image(0).unwrap();
        assert!(image.src.starts_with("data:image/png;base64,"));
        assert_eq!((image.width, image.height), (2, 2));
        assert!(SlotSet::new(BlobStore::new(), 1).source_image(0).is_none());
    }
}
