//! Master-password authentication.
//!
//! This module provides:
//! - Hash record storage (`repository`)
//! - Creation and verification of the master hash (`service`)
//! - Rotation of the master password and recovery of an interrupted one
//!   (`rotation`)

pub mod repository;
pub mod rotation;
pub mod service;

pub use repository::{FileMasterHashRepository, MasterHashRepository, PendingHash};
pub use rotation::{
    recover_interrupted_rotation, rotate_master_password, verify_with_recovery, LoginCheck,
    RecoveryOutcome,
};
pub use service::AuthenticationService;
