//! Service layer providing the diary's business operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod member;
pub mod runtime;
pub mod storage;
#[cfg(test)]
pub mod test_support;
pub mod post;
pub mod tag;
pub mod experience;
pub mod file;
