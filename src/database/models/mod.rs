pub mod alumni;
pub mod file;
pub mod pekerjaan;
pub mod pekerjaan_doc;
pub mod user;

pub use alumni::{Alumni, AlumniInput};
pub use file::{FileCategory, FileRecord, FileView, NewFile};
pub use pekerjaan::{NewPekerjaan, Pekerjaan, PekerjaanFields};
pub use pekerjaan_doc::{PekerjaanDoc, PekerjaanDocPatch, PekerjaanDocView};
pub use user::{NewUser, User};
