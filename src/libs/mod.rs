pub mod blast;
pub mod compare;
pub mod coverage;
pub mod error;
pub mod hit;
pub mod io;
pub mod length;
pub mod pipeline;
pub mod resolve;
pub mod store;
