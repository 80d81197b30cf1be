pub mod calculator;
pub mod card;
pub mod ennakkovero;
pub mod estimate;
pub mod form5;
pub mod yel;
