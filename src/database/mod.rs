pub mod manager;
pub mod models;
pub mod mongo;
pub mod postgres;
pub mod repository;

pub use manager::{with_deadline, DatabaseError, DatabaseManager};
pub use repository::{
    AlumniRepository, FileRepository, HealthCheck, PekerjaanDocRepository, PekerjaanRepository,
    UserRepository,
};
