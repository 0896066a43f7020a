// Services module - adapters around external collaborators

pub mod google;
pub mod storage;

pub use google::GoogleService;
pub use storage::StorageService;
