//! Assigns an index and a type to every scanned marker.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use super::scanner::{Marker, Piece};
use crate::errors::Error;
use crate::placeholder::{Index, PlaceholderType};

/// Result of indexing one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Indexed {
    /// The index of every marker, in scan order.
    pub slots: Vec<Index>,
    /// Distinct indices with their resolved types, in first-seen order.
    pub declarations: Vec<(Index, PlaceholderType)>,
}

/// Indexes the markers of `pieces`.
///
/// Explicit numeric names claim their ordinal; anonymous markers then take the
/// lowest unclaimed ordinals in order of appearance. References take the type
/// of a typed occurrence of the same index.
///
/// # Errors
///
/// * `UnexpectedPlaceholderType` - If a marker code names no placeholder type.
/// * `TypeChangeDetected` - If one index is declared with two different types.
/// * `UnresolvedReference` - If a reference has no typed occurrence.
pub(crate) fn index(statement: &str, pieces: &[Piece<'_>]) -> Result<Indexed, Error> {
    let markers: Vec<&Marker> = pieces
        .iter()
        .filter_map(|piece| match piece {
            Piece::Marker(marker) => Some(marker),
            _ => None,
        })
        .collect();

    let claimed: HashSet<usize> = markers
        .iter()
        .filter(|marker| marker.is_typed())
        .filter_map(|marker| match marker.name {
            Some(Index::Ordinal(ordinal)) => Some(ordinal),
            _ => None,
        })
        .collect();

    let mut next = 0;
    let slots: Vec<Index> = markers
        .iter()
        .map(|marker| {
            marker.name.clone().unwrap_or_else(|| {
                while claimed.contains(&next) {
                    next += 1;
                }
                next += 1;
                Index::Ordinal(next - 1)
            })
        })
        .collect();

    let declarations = declare(statement, &markers, &slots)?;
    Ok(Indexed {
        slots,
        declarations,
    })
}

/// Resolves the type of every distinct index of `slots`, in first-seen order.
fn declare(
    statement: &str,
    markers: &[&Marker],
    slots: &[Index],
) -> Result<Vec<(Index, PlaceholderType)>, Error> {
    let mut types: HashMap<&Index, PlaceholderType> = HashMap::new();
    for (marker, index) in markers.iter().zip(slots) {
        let Some(code) = marker.code else {
            continue;
        };
        let code = code.as_string();
        let Some(kind) = PlaceholderType::from_code(&code) else {
            return Err(Error::UnexpectedPlaceholderType {
                code,
                index: index.clone(),
            });
        };
        match types.get(index) {
            Some(&from) if from != kind => {
                return Err(Error::TypeChangeDetected {
                    statement: statement.into(),
                    index: index.clone(),
                    from,
                    to: kind,
                });
            }
            Some(_) => {}
            None => {
                types.insert(index, kind);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut declarations = Vec::new();
    for index in slots {
        if !seen.insert(index) {
            continue;
        }
        let Some(&kind) = types.get(index) else {
            return Err(Error::UnresolvedReference {
                index: index.clone(),
            });
        };
        declarations.push((index.clone(), kind));
    }

    Ok(declarations)
}
