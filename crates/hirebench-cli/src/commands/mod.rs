pub mod evaluate;
pub mod init;
pub mod questions;
pub mod serve;
pub mod validate;
