pub mod collect;
pub mod render;
pub mod status;
