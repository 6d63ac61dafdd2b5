//! Raw API records to display items

use crate::color::SwatchColor;
use crate::query::{RawDetailResponse, RawSpecies};
use crate::state::SearchItem;

/// Build a result row, or `None` when capture rate or color is missing.
pub fn to_search_item(raw: &RawSpecies) -> Option<SearchItem> {
    let capture_rate = raw.capture_rate?;
    let color_id = raw.color_id?;

    let species_summary = raw.members.iter().fold(String::new(), |mut acc, member| {
        acc.push_str(&member.name);
        acc.push('\n');
        acc
    });

    Some(SearchItem {
        name: raw.name.clone(),
        capture_rate,
        species_summary,
        color: SwatchColor::from_category(color_id),
    })
}

/// Flatten species -> variants -> slots into ability names, in response order.
pub fn to_ability_names(raw: &RawDetailResponse) -> Vec<String> {
    raw.species
        .iter()
        .flat_map(|species| &species.variants)
        .flat_map(|variant| &variant.ability_slots)
        .filter_map(|slot| slot.ability.as_ref()?.name.clone())
        .collect()
}
