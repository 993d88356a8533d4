//! Construction options for a [`Forest`](crate::Forest).

/// Tunables for a [`Forest`](crate::Forest).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ForestConfig {
    /// Node slots reserved up front.
    pub node_capacity: usize,
    /// Tree slots reserved up front.
    pub tree_capacity: usize,
    /// Run the full invariant checker after every structural mutation and
    /// panic on the first violation. Expensive; meant for tests and fuzzing.
    pub check_invariants: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            node_capacity: 64,
            tree_capacity: 8,
            check_invariants: false,
        }
    }
}

impl ForestConfig {
    pub fn checked() -> Self {
        Self {
            check_invariants: true,
            ..Self::default()
        }
    }
}
