pub mod finite;
pub mod id;
