pub mod jwt;
pub mod policy;
pub mod test_utils;
