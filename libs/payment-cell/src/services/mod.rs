pub mod omise;
pub mod payment;
