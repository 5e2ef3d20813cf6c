use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a shell in the topology store.
    pub struct ShellId;
}

/// Faces bounding a solid. A shell carries no dimension and is only
/// passed through between a solid and its faces.
#[derive(Debug, Clone, Default)]
pub struct ShellData {
    pub faces: Vec<FaceId>,
}

impl ShellData {
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces }
    }
}
