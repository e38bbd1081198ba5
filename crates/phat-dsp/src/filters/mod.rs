//! IIR filters: RBJ biquads and a Linkwitz-Riley band splitter.

mod biquad;
mod crossover;

pub use biquad::{Biquad, BiquadCoeffs, FilterType};
pub use crossover::{Crossover, LR4_Q, MAX_BANDS};
