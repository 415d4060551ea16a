mod bytes;
pub mod process;
mod reader;

// Mock memory source for unit and integration tests
#[doc(hidden)]
pub mod mock;

pub use bytes::ByteBuffer;
pub use process::{MemoryReader, ProcessHandle};
pub use reader::{FromBytes, MAX_CSTRING_LEN, ReadMemory};

#[doc(hidden)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
