pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;
pub use traits::CacheStore;
