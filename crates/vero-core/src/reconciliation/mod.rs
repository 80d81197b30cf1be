pub mod apply;
pub mod matcher;
