//! Ingestion gatekeeper: every body paragraph leaves with a unique stable id.

use std::borrow::Cow;
use std::collections::HashSet;

use tracing::{debug, info};

use crate::DocxError;
use crate::document::DocxDocument;
use crate::ids::{IdSource, UuidSource, fresh_id};

/// Assign UUID ids to paragraphs that lack one. See [`normalize_with`].
pub fn normalize(bytes: &[u8]) -> Result<Cow<'_, [u8]>, DocxError> {
    normalize_with(bytes, &mut UuidSource)
}

/// Give every body paragraph a unique `w:paraId`.
///
/// Paragraphs without an id, and the second and later holders of a repeated
/// id, get a fresh one drawn from `source` and checked against every id
/// already in the document. When nothing needed an id the input is returned
/// borrowed and unchanged. Input that cannot be opened as a document is also
/// returned unchanged: it stays read-only content with no structure.
pub fn normalize_with<'a, S>(bytes: &'a [u8], source: &mut S) -> Result<Cow<'a, [u8]>, DocxError>
where
    S: IdSource + ?Sized,
{
    let mut doc = match DocxDocument::load(bytes) {
        Ok(doc) => doc,
        Err(err) if err.is_load_failure() => {
            debug!(error = %err, "not a document package, passing bytes through");
            return Ok(Cow::Borrowed(bytes));
        }
        Err(err) => return Err(err),
    };

    let mut taken: HashSet<String> = doc
        .paragraphs()
        .filter_map(|(_, p)| p.stable_id())
        .collect();

    let mut kept = HashSet::new();
    let mut assigned = 0usize;
    for key in doc.paragraph_keys() {
        let paragraph = doc.paragraph_mut(key);
        if let Some(id) = paragraph.stable_id()
            && kept.insert(id)
        {
            continue;
        }
        let id = fresh_id(&mut *source, |candidate| taken.contains(candidate));
        paragraph.set_stable_id(&id);
        taken.insert(id.clone());
        kept.insert(id);
        assigned += 1;
    }

    if assigned == 0 {
        debug!(paragraphs = doc.paragraph_count(), "all paragraphs already identified");
        return Ok(Cow::Borrowed(bytes));
    }
    info!(assigned, paragraphs = doc.paragraph_count(), "assigned stable paragraph ids");
    Ok(Cow::Owned(doc.to_bytes()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{PackageBuilder, ParagraphSpec, series_a_document};

    fn ids_of(bytes: &[u8]) -> Vec<Option<String>> {
        let doc = DocxDocument::load(bytes).unwrap();
        doc.paragraphs().map(|(_, p)| p.stable_id()).collect()
    }

    struct Scripted(Vec<&'static str>);

    impl IdSource for Scripted {
        fn next_id(&mut self) -> String {
            self.0.remove(0).to_string()
        }
    }

    #[test]
    fn fully_identified_documents_are_returned_as_is() {
        let bytes = PackageBuilder::new()
            .paragraph(ParagraphSpec::new("one").id("00000001"))
            .paragraph(ParagraphSpec::new("").id("00000002"))
            .build()
            .unwrap();
        let out = normalize(&bytes).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, bytes.as_slice());
    }

    #[test]
    fn unreadable_input_passes_through() {
        let junk = b"%PDF-1.4 not a word package";
        let out = normalize(junk).unwrap();
        assert_eq!(&*out, &junk[..]);
    }

    #[test]
    fn missing_ids_are_filled_without_touching_existing_ones() {
        let bytes = PackageBuilder::new()
            .paragraph(ParagraphSpec::new("kept").id("0000ABCD"))
            .paragraph(ParagraphSpec::new("needs one"))
            .build()
            .unwrap();
        let out = normalize(&bytes).unwrap();
        let doc = DocxDocument::load(&out).unwrap();
        let ids: Vec<Option<String>> = doc.paragraphs().map(|(_, p)| p.stable_id()).collect();

        assert_eq!(ids[0].as_deref(), Some("0000ABCD"));
        let generated = ids[1].as_deref().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }

    #[test]
    fn normalize_is_idempotent() {
        let bytes = series_a_document().unwrap();
        let once = normalize(&bytes).unwrap().into_owned();
        let twice = normalize(&once).unwrap();
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(&*twice, once.as_slice());
    }

    #[test]
    fn every_paragraph_gets_a_distinct_id() {
        let bytes = series_a_document().unwrap();
        let ids = ids_of(&normalize(&bytes).unwrap());
        let distinct: HashSet<String> = ids.iter().flatten().cloned().collect();
        assert!(ids.iter().all(Option::is_some));
        assert_eq!(distinct.len(), ids.len());
    }

    #[test]
    fn repeated_ids_are_reassigned_after_the_first_holder() {
        let bytes = PackageBuilder::new()
            .paragraph(ParagraphSpec::new("first").id("SAME"))
            .paragraph(ParagraphSpec::new("second").id("SAME"))
            .paragraph(ParagraphSpec::new("third"))
            .build()
            .unwrap();
        let mut source = Scripted(vec!["N1", "N2"]);
        let ids = ids_of(&normalize_with(&bytes, &mut source).unwrap());
        assert_eq!(
            ids,
            vec![Some("SAME".to_string()), Some("N1".to_string()), Some("N2".to_string())]
        );
    }

    #[test]
    fn generated_ids_skip_ids_already_in_the_document() {
        let bytes = PackageBuilder::new()
            .paragraph(ParagraphSpec::new("new"))
            .paragraph(ParagraphSpec::new("old").id("TAKEN"))
            .build()
            .unwrap();
        let mut source = Scripted(vec!["TAKEN", "FRESH"]);
        let ids = ids_of(&normalize_with(&bytes, &mut source).unwrap());
        assert_eq!(ids, vec![Some("FRESH".to_string()), Some("TAKEN".to_string())]);
    }

    #[test]
    fn unedited_round_trip_keeps_ids_and_text() {
        let normalized = normalize(&series_a_document().unwrap()).unwrap().into_owned();
        let doc = DocxDocument::load(&normalized).unwrap();
        let resaved = DocxDocument::load(&doc.to_bytes().unwrap()).unwrap();

        let snapshot = |d: &DocxDocument| -> Vec<(Option<String>, String)> {
            d.paragraphs().map(|(_, p)| (p.stable_id(), p.text())).collect()
        };
        assert_eq!(snapshot(&doc), snapshot(&resaved));
    }
}
