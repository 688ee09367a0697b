pub mod responses;
pub mod storage;
