use std::cmp::Ordering;
use std::collections::HashSet;

use super::{OrderError, PriorityResolver, PropertySourceDescriptor};

/// Where reordered sources end up relative to the ones without a priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    /// Prioritized sources lead, the rest follow in natural order. See [`reorder`].
    #[default]
    Leading,
    /// Prioritized sources form a block where the first of them was. See [`reorder_anchored`].
    Anchored,
}

impl Placement {
    pub fn apply<R>(
        self,
        sources: Vec<PropertySourceDescriptor>,
        resolver: &R,
    ) -> Result<Vec<PropertySourceDescriptor>, OrderError>
    where
        R: PriorityResolver + ?Sized,
    {
        match self {
            Placement::Leading => reorder(sources, resolver),
            Placement::Anchored => reorder_anchored(sources, resolver),
        }
    }
}

/// Explicit priorities sort before the neutral rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Explicit(i32),
    Neutral,
}

/// Orders `sources` by resolved priority, then by original index.
///
/// Sources without a priority keep their natural order after every
/// prioritized one. The result is a permutation of the input; applying it
/// again to its own output changes nothing.
///
/// # Errors
///
/// Returns [`OrderError::DuplicateSourceName`] if two sources share a name.
///
/// ## Example
///
/// ```
/// use config_precedence::order::{describe, PropertySourceDescriptor};
/// use config_precedence::reorder;
///
/// let resolver = |d: &PropertySourceDescriptor| match d.name.as_str() {
///     "b" | "d" => Some(1),
///     _ => None,
/// };
/// let sorted = reorder(describe(["a", "b", "c", "d"]), &resolver)?;
/// let names: Vec<_> = sorted.iter().map(|d| d.name.as_str()).collect();
/// assert_eq!(names, ["b", "d", "a", "c"]);
/// # Ok::<(), config_precedence::OrderError>(())
/// ```
pub fn reorder<R>(
    sources: Vec<PropertySourceDescriptor>,
    resolver: &R,
) -> Result<Vec<PropertySourceDescriptor>, OrderError>
where
    R: PriorityResolver + ?Sized,
{
    ensure_unique(&sources)?;

    let mut ranked: Vec<(Rank, PropertySourceDescriptor)> = sources
        .into_iter()
        .map(|source| (rank(&source, resolver), source))
        .collect();
    ranked.sort_by(compare);

    Ok(ranked.into_iter().map(|(_, source)| source).collect())
}

/// Gathers prioritized sources into a block at the position of the first one.
///
/// The block is ordered like [`reorder`]. Sources without a priority keep
/// their relative order around it; if no source has a priority the input is
/// returned as is.
///
/// # Errors
///
/// Returns [`OrderError::DuplicateSourceName`] if two sources share a name.
pub fn reorder_anchored<R>(
    sources: Vec<PropertySourceDescriptor>,
    resolver: &R,
) -> Result<Vec<PropertySourceDescriptor>, OrderError>
where
    R: PriorityResolver + ?Sized,
{
    ensure_unique(&sources)?;

    let ranked: Vec<(Rank, PropertySourceDescriptor)> = sources
        .into_iter()
        .map(|source| (rank(&source, resolver), source))
        .collect();

    let Some(anchor) = ranked.iter().position(|(rank, _)| *rank != Rank::Neutral) else {
        return Ok(ranked.into_iter().map(|(_, source)| source).collect());
    };

    let total = ranked.len();
    let (mut block, rest): (Vec<_>, Vec<_>) = ranked
        .into_iter()
        .partition(|(rank, _)| *rank != Rank::Neutral);
    block.sort_by(compare);

    // Everything before the anchor is unprioritized, so it is a prefix of `rest`.
    let mut rest = rest.into_iter().map(|(_, source)| source);
    let mut result: Vec<PropertySourceDescriptor> = Vec::with_capacity(total);
    result.extend(rest.by_ref().take(anchor));

    for (_, source) in block {
        let after = result.last().map_or("<start>", |prev| prev.name.as_str());
        tracing::info!(source = %source.name, after = %after, "moving property source");
        result.push(source);
    }
    result.extend(rest);

    Ok(result)
}

fn rank<R>(source: &PropertySourceDescriptor, resolver: &R) -> Rank
where
    R: PriorityResolver + ?Sized,
{
    match resolver.resolve(source) {
        Some(priority) => Rank::Explicit(priority),
        None => {
            tracing::debug!(
                source = %source.name,
                index = source.original_index,
                "no explicit priority, keeping natural position"
            );
            Rank::Neutral
        }
    }
}

fn compare(
    (a_rank, a): &(Rank, PropertySourceDescriptor),
    (b_rank, b): &(Rank, PropertySourceDescriptor),
) -> Ordering {
    a_rank
        .cmp(b_rank)
        .then_with(|| a.original_index.cmp(&b.original_index))
}

fn ensure_unique(sources: &[PropertySourceDescriptor]) -> Result<(), OrderError> {
    let mut seen = HashSet::with_capacity(sources.len());
    for source in sources {
        if !seen.insert(source.name.as_str()) {
            return Err(OrderError::DuplicateSourceName(source.name.clone()));
        }
    }
    Ok(())
}
