pub mod intent;
pub mod response;
