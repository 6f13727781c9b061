use crate::structs::{Coord, StopCandidate};

#[derive(Debug, Clone, PartialEq)]
pub struct StopMatch {
    pub id: String,
    pub name: String,
    pub coord: Option<Coord>,
}

/// Filters stop finder results lazily, in input order.
///
/// With a non-empty `modes`, a stop must be served by at least one of them.
/// With `suburb`, the last word of the stop name must be the queried suburb.
pub fn filter_stops<'a>(
    candidates: &'a [StopCandidate],
    modes: &'a [i64],
    query: &'a str,
    suburb: bool,
) -> impl Iterator<Item = StopMatch> + 'a {
    let suburb_query = capitalize(query.trim());

    candidates
        .iter()
        .filter(move |candidate| {
            let served = candidate.modes.as_deref().unwrap_or(&[]);
            if !modes.is_empty() && !modes.iter().any(|mode| served.contains(mode)) {
                return false;
            }
            if suburb {
                let last = candidate.name.split_whitespace().last().unwrap_or_default();
                if capitalize(last) != suburb_query {
                    return false;
                }
            }
            true
        })
        .map(|candidate| StopMatch {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            coord: candidate.coord,
        })
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
