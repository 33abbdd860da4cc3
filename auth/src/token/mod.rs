pub mod opaque;

pub use opaque::TokenGenerator;
pub use opaque::TOKEN_BYTES;
