// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`; handlers read the caller
// from the `AuthUser` extension.
pub mod alumni;
pub mod auth;
pub mod files;
pub mod pekerjaan;
pub mod pekerjaan_mongo;
