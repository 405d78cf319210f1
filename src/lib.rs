pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::{
    material_service::MaterialService, progress_service::ProgressService,
    student_service::StudentService, tracking_service::TrackingService,
    verification_service::VerificationService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub verification_service: VerificationService,
    pub tracking_service: TrackingService,
    pub progress_service: ProgressService,
    pub material_service: MaterialService,
    pub student_service: StudentService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let verification_service = VerificationService::new(pool.clone());
        let tracking_service = TrackingService::new(pool.clone());
        let progress_service = ProgressService::new(pool.clone());
        let material_service = MaterialService::new(pool.clone());
        let student_service = StudentService::new(pool.clone());

        Self {
            pool,
            verification_service,
            tracking_service,
            progress_service,
            material_service,
            student_service,
        }
    }
}
