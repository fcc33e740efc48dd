//! Sentiment scoring
//!
//! Scoring is a pure function from text to a scalar. Aggregation only relies
//! on the [`SentimentScorer`] trait; [`LexiconScorer`] is the built-in
//! implementation.

pub mod lexicon;

pub use lexicon::{LexiconConfig, LexiconScorer};

use std::sync::Arc;

/// Maps raw text to a sentiment score
pub trait SentimentScorer {
    /// Score `text`; higher is more positive
    fn score(&self, text: &str) -> f64;
}

impl<S: SentimentScorer + ?Sized> SentimentScorer for &S {
    fn score(&self, text: &str) -> f64 {
        (**self).score(text)
    }
}

impl<S: SentimentScorer + ?Sized> SentimentScorer for Box<S> {
    fn score(&self, text: &str) -> f64 {
        (**self).score(text)
    }
}

impl<S: SentimentScorer + ?Sized> SentimentScorer for Arc<S> {
    fn score(&self, text: &str) -> f64 {
        (**self).score(text)
    }
}

/// Adapter turning a closure into a scorer
#[derive(Clone, Copy)]
pub struct FnScorer<F>(pub F);

impl<F: Fn(&str) -> f64> SentimentScorer for FnScorer<F> {
    fn score(&self, text: &str) -> f64 {
        (self.0)(text)
    }
}

impl<F> std::fmt::Debug for FnScorer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnScorer(<fn>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_scorer() {
        let scorer = FnScorer(|text: &str| text.len() as f64);
        assert_eq!(scorer.score("abc"), 3.0);
    }

    #[test]
    fn test_boxed_scorer() {
        let scorer: Box<dyn SentimentScorer> = Box::new(FnScorer(|_: &str| 0.5));
        assert_eq!(scorer.score("anything"), 0.5);
    }
}
