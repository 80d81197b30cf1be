pub mod hetu;
pub mod proof;
pub mod validation;
