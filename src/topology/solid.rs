use super::shell::ShellId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// A volume bounded by shells. `shells[0]` is the outer boundary, any
/// further shell encloses a void and is referenced reversed.
#[derive(Debug, Clone)]
pub struct SolidData {
    pub shells: Vec<ShellId>,
}

impl SolidData {
    /// Creates a solid without voids.
    #[must_use]
    pub fn bounded_by(outer: ShellId) -> Self {
        Self { shells: vec![outer] }
    }
}
