pub mod lesson_view;
pub mod material;
pub mod profile;
pub mod progress;
pub mod submission;
