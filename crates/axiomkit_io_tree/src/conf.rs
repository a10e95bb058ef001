//! Constants shared by copy and verify traversals.

/// Leading character that marks a file or directory as hidden.
pub const C_HIDDEN_MARKER: char = '.';
