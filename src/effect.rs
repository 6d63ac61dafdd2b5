//! Effects - side effects declared by the reducer

use crate::session::{DetailRequest, SearchRequest};

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch one page of species
    SearchSpecies(SearchRequest),
    /// Fetch the abilities of one species
    LoadAbilities(DetailRequest),
}
