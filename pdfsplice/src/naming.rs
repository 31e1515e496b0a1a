//! Output file names.
//!
//! Results are named `<prefix>_<id>.pdf`, where the prefix comes from the
//! operation (`split`, `merged`, `reordered`) and the id is a random v4 UUID
//! in 32-digit hex form. Two results never share a name.

use std::fmt;

use uuid::Uuid;

use crate::transform::Operation;

/// A generated, collision-free output file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputName {
    operation: Operation,
    id: Uuid,
}

impl OutputName {
    /// Generate a fresh name for an artifact of `operation`.
    pub fn new(operation: Operation) -> Self {
        Self::with_id(operation, Uuid::new_v4())
    }

    /// Build a name from a known id.
    pub fn with_id(operation: Operation, id: Uuid) -> Self {
        Self { operation, id }
    }

    /// The operation this name was generated for.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The unique part of the name.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The file name, e.g. `merged_67e5504410b1426f9247bb680e5fe0c8.pdf`.
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}.pdf",
            self.operation.artifact_prefix(),
            self.id.simple()
        )
    }
}
