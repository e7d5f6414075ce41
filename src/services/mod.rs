pub mod container;
pub mod s3_container;
pub mod upload_service;
