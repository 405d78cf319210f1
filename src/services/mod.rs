pub mod material_service;
pub mod progress_service;
pub mod student_service;
pub mod tracking_service;
pub mod verification_service;
