//! Command implementations, one module per command family.

pub mod crawl;
pub mod domains;
pub mod init;
pub mod logs;
pub mod pages;
pub mod records;
