pub mod health;
pub mod materials;
pub mod progress;
pub mod quiz;
pub mod students;
pub mod tracking;
