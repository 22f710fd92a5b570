pub mod candidate;
pub mod competency;
