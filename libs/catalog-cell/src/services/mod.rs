pub mod podcast;
pub mod specialist;
