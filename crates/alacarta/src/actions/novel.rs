//! Novel catalog actions

use crate::state::Novel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NovelAction {
    Add(Novel),
    /// Replace the novel with the same id
    Update(Novel),
    Delete(u64),
}
