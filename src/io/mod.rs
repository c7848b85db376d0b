pub mod pvd;
pub mod report;
