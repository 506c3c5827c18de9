use uuid::Uuid;

/// Source of fresh identifiers for categories and entries.
///
/// Mutators that create records take an `IdGen` instead of calling into
/// `uuid` directly, so tests can supply a deterministic sequence.
pub trait IdGen {
    fn next_id(&mut self) -> String;
}

/// Production id source backed by random v4 UUIDs.
pub struct UuidGen;

impl IdGen for UuidGen {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
