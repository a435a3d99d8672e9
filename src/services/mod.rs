pub mod alumni_service;
pub mod auth_service;
pub mod file_service;
pub mod pekerjaan_doc_service;
pub mod pekerjaan_service;

pub use alumni_service::AlumniService;
pub use auth_service::AuthService;
pub use file_service::FileService;
pub use pekerjaan_doc_service::PekerjaanDocService;
pub use pekerjaan_service::PekerjaanService;
