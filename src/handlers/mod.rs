//! 핸들러 모듈

pub mod connection;
pub mod ice;
pub mod matching;
pub mod signaling;

pub use connection::*;
pub use ice::*;
pub use matching::*;
pub use signaling::*;
