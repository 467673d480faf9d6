//! Member module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and resolution of the authenticated member live here.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::LoginMember;
pub use service::AuthService;
