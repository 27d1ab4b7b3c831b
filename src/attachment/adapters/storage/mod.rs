//! Byte storage adapters for uploaded files.

mod cap_std;
mod memory;

pub use self::cap_std::CapStdFileStorage;
pub use self::memory::InMemoryFileStorage;
