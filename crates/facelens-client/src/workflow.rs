//! Detection and comparison sessions.
//!
//! A workflow holds the selected image(s), the last successful result and a
//! handle on the transfer client's upload gate. Selecting or removing images
//! is refused while an upload is running, and a failed upload leaves the
//! previous result in place.

use facelens_models::{validate, CompareFacesResult, FaceDetail, UploadPolicy, ValidationVerdict};
use facelens_overlay::report::{render_comparison_report, render_detection_report};
use tracing::{info, warn};

use crate::candidate::UploadCandidate;
use crate::error::{ClientError, ClientResult};
use crate::slots::{BlobStore, ImageSlot, SlotSet};
use crate::transfer::TransferClient;
use crate::upload_state::UploadGate;

pub const SOURCE_SLOT: usize = 0;
pub const TARGET_SLOT: usize = 1;

fn ensure_idle(gate: &UploadGate) -> ClientResult<()> {
    if gate.is_busy() {
        return Err(ClientError::Busy);
    }
    Ok(())
}

/// Validate a dropped batch and put the first accepted file into `slot`.
fn select_into(
    slots: &mut SlotSet,
    index: usize,
    policy: &UploadPolicy,
    files: Vec<UploadCandidate>,
) -> ClientResult<Vec<ValidationVerdict>> {
    let report = validate(policy, files);
    for verdict in report.rejections() {
        warn!(slot = index, verdict = %verdict, "File rejected");
    }

    if let Some(candidate) = report.accepted.into_iter().next() {
        let slot = slots.set(index, candidate)?;
        info!(
            slot = index,
            name = %slot.candidate.name(),
            width = slot.width,
            height = slot.height,
            "Image selected"
        );
    }
    Ok(report.verdicts)
}

/// Detect faces in a single image.
#[derive(Debug)]
pub struct DetectionWorkflow {
    gate: UploadGate,
    policy: UploadPolicy,
    slots: SlotSet,
    result: Option<Vec<FaceDetail>>,
}

impl DetectionWorkflow {
    pub fn new(client: &TransferClient, store: BlobStore) -> Self {
        Self {
            gate: client.gate().clone(),
            policy: client.policy().clone(),
            slots: SlotSet::new(store, 1),
            result: None,
        }
    }

    /// Validate `files`; the first accepted one replaces the current image.
    pub fn select(&mut self, files: Vec<UploadCandidate>) -> ClientResult<Vec<ValidationVerdict>> {
        ensure_idle(&self.gate)?;
        select_into(&mut self.slots, 0, &self.policy, files)
    }

    pub fn remove(&mut self) -> ClientResult<()> {
        ensure_idle(&self.gate)?;
        self.slots.clear(0)
    }

    pub fn image(&self) -> Option<&ImageSlot> {
        self.slots.get(0)
    }

    pub fn result(&self) -> Option<&[FaceDetail]> {
        self.result.as_deref()
    }

    /// Upload the selected image. The result is stored only on success.
    pub async fn submit(&mut self, client: &TransferClient) -> ClientResult<&[FaceDetail]> {
        let candidate = self
            .slots
            .get(0)
            .map(|slot| slot.candidate.clone())
            .ok_or(ClientError::MissingImage)?;

        let faces = client.detect(&candidate).await?;
        info!(name = %candidate.name(), faces = faces.len(), "Faces detected");
        let stored = self.result.insert(faces);
        Ok(stored.as_slice())
    }

    /// Drop the image and the result.
    pub fn reset(&mut self) {
        self.slots.clear_all();
        self.result = None;
    }

    /// Standalone HTML report, once a result is available.
    pub fn render_report(&self) -> Option<String> {
        let faces = self.result.as_deref()?;
        let slot = self.slots.get(0)?;
        let image = self.slots.source_image(0)?;
        Some(render_detection_report(slot.candidate.name(), &image, faces))
    }
}

/// Compare the face in a source image with the faces in a target image.
#[derive(Debug)]
pub struct ComparisonWorkflow {
    gate: UploadGate,
    policy: UploadPolicy,
    slots: SlotSet,
    result: Option<CompareFacesResult>,
}

impl ComparisonWorkflow {
    pub fn new(client: &TransferClient, store: BlobStore) -> Self {
        Self {
            gate: client.gate().clone(),
            policy: client.policy().clone(),
            slots: SlotSet::new(store, 2),
            result: None,
        }
    }

    /// Validate `files` for [`SOURCE_SLOT`] or [`TARGET_SLOT`].
    pub fn select(&mut self, slot: usize, files: Vec<UploadCandidate>) -> ClientResult<Vec<ValidationVerdict>> {
        ensure_idle(&self.gate)?;
        if slot >= self.slots.len() {
            return Err(ClientError::InvalidSlot(slot));
        }
        select_into(&mut self.slots, slot, &self.policy, files)
    }

    pub fn remove(&mut self, slot: usize) -> ClientResult<()> {
        ensure_idle(&self.gate)?;
        self.slots.clear(slot)
    }

    pub fn image(&self, slot: usize) -> Option<&ImageSlot> {
        self.slots.get(slot)
    }

    pub fn result(&self) -> Option<&CompareFacesResult> {
        self.result.as_ref()
    }

    /// Upload both images. The result is stored only on success.
    pub async fn submit(&mut self, client: &TransferClient) -> ClientResult<&CompareFacesResult> {
        let (source, target) = match (self.slots.get(SOURCE_SLOT), self.slots.get(TARGET_SLOT)) {
            (Some(source), Some(target)) => (source.candidate.clone(), target.candidate.clone()),
            _ => return Err(ClientError::MissingImage),
        };

        let result = client.compare(&source, &target).await?;
        info!(
            source = %source.name(),
            target = %target.name(),
            matched = result.face_matches.len(),
            unmatched = result.unmatched_faces.len(),
            "Faces compared"
        );
        Ok(&*self.result.insert(result))
    }

    pub fn reset(&mut self) {
        self.slots.clear_all();
        self.result = None;
    }

    pub fn render_report(&self) -> Option<String> {
        let result = self.result.as_ref()?;
        let source = self.slots.source_image(SOURCE_SLOT)?;
        let target = self.slots.source_image(TARGET_SLOT)?;
        Some(render_comparison_report(&source, &target, result))
    }
}
