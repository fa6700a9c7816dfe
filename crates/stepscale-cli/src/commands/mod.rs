pub mod compile;
pub mod init;
