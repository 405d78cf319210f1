pub mod material_dto;
pub mod quiz_dto;
pub mod student_dto;
pub mod tracking_dto;
