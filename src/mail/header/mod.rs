pub use bag::*;
pub use transfer_encoding::*;

mod bag;
mod transfer_encoding;
