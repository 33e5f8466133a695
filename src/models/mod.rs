//! Data models for Basecamp

pub mod dashboard;
pub mod enums;
pub mod finance;
pub mod lead;
pub mod registration;
pub mod user;
pub mod vendor;

// Re-export commonly used types
pub use enums::{PaymentMethod, PaymentStatus, ProgramKind, Role};
pub use lead::Lead;
pub use registration::{Child, ChildInput, Registration};
pub use user::{Portal, Profile, UserClaims};
