pub mod ask;
pub mod train;
