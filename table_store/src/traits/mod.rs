pub mod core;
pub mod mapper;

pub use self::core::TableOperations;
pub use mapper::TableMapper;
