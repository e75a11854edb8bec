use crate::card::resolve_weight;
use crate::card::Weighted;
use crate::error::Result;
use crate::rand::Random;
use tracing::trace;

/// Picks one card with probability proportional to its weight.
///
/// Returns `Ok(None)` when there are no cards. Fails if any card carries a
/// negative or non-finite weight, see [`resolve_weight`].
pub fn sample_card<'a, T, R>(rng: &mut R, cards: &'a [T]) -> Result<Option<&'a T>>
where
    T: Weighted,
    R: Random + ?Sized,
{
    if cards.is_empty() {
        return Ok(None);
    }

    let mut weights = cards
        .iter()
        .map(|card| resolve_weight(card.intrinsic_weight()))
        .collect::<Result<Vec<_>>>()?;

    let mut total: f64 = weights.iter().sum();
    if !total.is_finite() {
        // Finite weights whose sum overflows keep their ratios once scaled by the largest
        let max = weights.iter().copied().fold(0.0, f64::max);
        weights.iter_mut().for_each(|w| *w /= max);
        total = weights.iter().sum();
    }

    let draw = rng.f64() * total;

    let mut cumulative = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        cumulative += weight;

        if draw < cumulative {
            trace!(index = i, draw, total, "sampled card");
            return Ok(Some(&cards[i]));
        }
    }

    // Rounding can leave the draw at the very top of the range.
    trace!(index = cards.len() - 1, draw, total, "sampled last card");
    Ok(cards.last())
}
