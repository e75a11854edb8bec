use crate::error::Error;
use crate::error::Result;

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const MIN_WEIGHT: f64 = 0.5;
pub const MAX_WEIGHT: f64 = 2.0;
pub const MAX_CARDS_PER_TOPIC: usize = 25;

/// Anything that can be picked by [`crate::sample_card`].
pub trait Weighted {
    /// The stored importance of the item, if it has one.
    fn intrinsic_weight(&self) -> Option<f64>;
}

impl Weighted for f64 {
    fn intrinsic_weight(&self) -> Option<f64> {
        Some(*self)
    }
}

impl Weighted for Option<f64> {
    fn intrinsic_weight(&self) -> Option<f64> {
        *self
    }
}

impl<T: Weighted> Weighted for &T {
    fn intrinsic_weight(&self) -> Option<f64> {
        (*self).intrinsic_weight()
    }
}

/// Resolves a stored weight into the value used for sampling and scheduling.
///
/// A missing or zero weight falls back to [`DEFAULT_WEIGHT`]. Negative and
/// non-finite weights are rejected.
pub fn resolve_weight(weight: Option<f64>) -> Result<f64> {
    match weight {
        None => Ok(DEFAULT_WEIGHT),
        Some(w) if !w.is_finite() || w < 0.0 => Err(Error::InvalidWeight(w)),
        Some(w) if w == 0.0 => Ok(DEFAULT_WEIGHT),
        Some(w) => Ok(w),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardPayload {
    QaHint {
        question: String,
        answer: String,
        hint: String,
    },
    MultipleChoice {
        question: String,
        choices: Vec<String>,
        correct_index: usize,
        explanation: String,
    },
}

impl CardPayload {
    pub fn question(&self) -> &str {
        match self {
            CardPayload::QaHint { question, .. } => question,
            CardPayload::MultipleChoice { question, .. } => question,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub intrinsic_weight: Option<f64>,
    pub payload: CardPayload,
}

impl Card {
    /// Creates a card, checking the weight against the range cards are stored with.
    pub fn new(payload: CardPayload, intrinsic_weight: Option<f64>) -> Result<Self> {
        if let Some(w) = intrinsic_weight {
            if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&w) {
                return Err(Error::WeightOutOfRange(w));
            }
        }

        Ok(Self {
            intrinsic_weight,
            payload,
        })
    }

    /// The weight this card contributes to sampling and scheduling.
    pub fn weight(&self) -> Result<f64> {
        resolve_weight(self.intrinsic_weight)
    }
}

impl Weighted for Card {
    fn intrinsic_weight(&self) -> Option<f64> {
        self.intrinsic_weight
    }
}
