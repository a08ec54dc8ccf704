//! Surgical editor: id-addressed edits against one loaded document.

use serde::Serialize;
use tracing::{debug, info, warn};

use clausegraft_core::EditOp;

use crate::DocxError;
use crate::document::{DocxDocument, ParaKey};
use crate::ids::{IdSource, UuidSource, fresh_id};
use crate::locator;
use crate::skeleton::IdentityMap;

/// Outcome of one edit batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub applied: usize,
    pub skipped: Vec<SkippedOp>,
    /// Ids of paragraphs created by splits, in creation order.
    pub created_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedOp {
    pub index: usize,
    pub id: String,
    pub reason: String,
}

/// One edit session: a loaded document, its identity map, and an id source.
///
/// Edits mutate the in-memory document only; bytes are produced by
/// [`Composer::save`] once the batch is done.
pub struct Composer<S: IdSource = UuidSource> {
    doc: DocxDocument,
    ids: IdentityMap,
    source: S,
}

impl Composer<UuidSource> {
    pub fn load(bytes: &[u8]) -> Result<Self, DocxError> {
        Self::with_id_source(bytes, UuidSource)
    }
}

impl<S: IdSource> Composer<S> {
    pub fn with_id_source(bytes: &[u8], source: S) -> Result<Self, DocxError> {
        let doc = DocxDocument::load(bytes)?;
        let ids = IdentityMap::build(&doc);
        debug!(ids = ids.len(), "composer ready");
        Ok(Self { doc, ids, source })
    }

    pub fn document(&self) -> &DocxDocument {
        &self.doc
    }

    pub fn identity_map(&self) -> &IdentityMap {
        &self.ids
    }

    fn target(&self, id: &str) -> Result<ParaKey, DocxError> {
        self.ids
            .lookup(id)
            .ok_or_else(|| DocxError::TargetNotFound(id.to_string()))
    }

    /// Replace a paragraph's full text, keeping its first run's formatting.
    pub fn update_text(&mut self, id: &str, text: &str) -> Result<(), DocxError> {
        let key = self.target(id)?;
        self.doc.paragraph_mut(key).set_text(text);
        debug!(%id, chars = text.chars().count(), "updated paragraph text");
        Ok(())
    }

    /// Split a paragraph into `parts.len()` contiguous paragraphs.
    ///
    /// The original keeps its id and takes `parts[0]`. Each further part is a
    /// copy of the paragraph produced just before it, taken before its own
    /// text is set, so paragraph properties carry over to every part. Returns
    /// the ids of the new paragraphs in order.
    pub fn split(&mut self, id: &str, parts: &[String]) -> Result<Vec<String>, DocxError> {
        let Some((first, rest)) = parts.split_first() else {
            return Err(DocxError::EmptySplit(id.to_string()));
        };
        let mut previous = self.target(id)?;
        self.doc.paragraph_mut(previous).set_text(first);

        let mut created = Vec::with_capacity(rest.len());
        for part in rest {
            let ids = &self.ids;
            let new_id = fresh_id(&mut self.source, |candidate| ids.contains(candidate));
            let copy = self.doc.paragraph(previous).clone_with_id(&new_id);
            let key = self.doc.insert_after(previous, copy);
            self.ids.register(new_id.clone(), key);
            self.doc.paragraph_mut(key).set_text(part);

            created.push(new_id);
            previous = key;
        }
        debug!(%id, parts = parts.len(), "split paragraph");
        Ok(created)
    }

    /// Apply a batch in order. Failing operations are skipped and reported;
    /// they never abort the rest of the batch.
    pub fn apply(&mut self, ops: &[EditOp]) -> BatchReport {
        let mut report = BatchReport::default();
        for (index, op) in ops.iter().enumerate() {
            let outcome = match op {
                EditOp::UpdateText { id, text } => self.update_text(id, text).map(|()| Vec::new()),
                EditOp::Split { id, parts } => self.split(id, parts),
            };
            match outcome {
                Ok(created) => {
                    report.applied += 1;
                    report.created_ids.extend(created);
                }
                Err(err) => {
                    warn!(index, id = op.id(), op = op.kind(), error = %err, "skipping edit");
                    report.skipped.push(SkippedOp {
                        index,
                        id: op.id().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        info!(
            applied = report.applied,
            skipped = report.skipped.len(),
            created = report.created_ids.len(),
            "applied edit batch"
        );
        report
    }

    /// Apply a batch and serialize the result once.
    pub fn apply_operations(&mut self, ops: &[EditOp]) -> Result<Vec<u8>, DocxError> {
        self.apply(ops);
        self.save()
    }

    /// Best-effort lookup by text. Ambiguous queries resolve to the first
    /// paragraph in document order; this is a guess, not an identity.
    pub fn locate_best_effort(&self, text: &str) -> Result<ParaKey, DocxError> {
        let candidates = self.doc.paragraphs().map(|(key, p)| (key, p.text()));
        locator::locate_best_effort(candidates, text)
            .ok_or_else(|| DocxError::NoMatch(text.to_string()))
    }

    /// Locate a paragraph by its text and replace that text.
    pub fn replace_clause(&mut self, clause_text: &str, new_text: &str) -> Result<ParaKey, DocxError> {
        let key = self.locate_best_effort(clause_text)?;
        self.doc.paragraph_mut(key).set_text(new_text);
        info!(
            id = self.doc.paragraph(key).stable_id().as_deref().unwrap_or("-"),
            "replaced clause located by text"
        );
        Ok(key)
    }

    pub fn save(&self) -> Result<Vec<u8>, DocxError> {
        self.doc.to_bytes()
    }
}
