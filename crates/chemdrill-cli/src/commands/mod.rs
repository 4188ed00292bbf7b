pub mod grade;
pub mod init;
pub mod play;
pub mod simulate;
pub mod step;
