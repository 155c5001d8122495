//! Value Object Module

pub mod role_name;
pub mod subject_id;
