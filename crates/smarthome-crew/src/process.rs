//! How a crew orders its tasks

use std::fmt;

/// Execution process of a crew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Process {
    /// Tasks run one after another in declaration order
    #[default]
    Sequential,
    /// A manager agent plans and delegates; not available
    Hierarchical,
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Hierarchical => f.write_str("hierarchical"),
        }
    }
}
