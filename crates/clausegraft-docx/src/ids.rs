//! Stable id generation.

use tracing::debug;

/// Source of candidate paragraph ids.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Draw ids from `source` until one is not `taken`.
pub fn fresh_id<S, T>(source: &mut S, taken: T) -> String
where
    S: IdSource + ?Sized,
    T: Fn(&str) -> bool,
{
    loop {
        let id = source.next_id();
        if !taken(&id) {
            return id;
        }
        debug!(%id, "generated id collides, retrying");
    }
}
