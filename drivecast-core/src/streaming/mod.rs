//! Range-aware streaming: header parsing and the upstream byte relay.

mod range;
mod relay;

pub use range::{ByteRange, RangeError};
pub use relay::{ByteStream, StreamingRelay};
