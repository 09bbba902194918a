pub mod broadcaster;
pub mod peer;
#[allow(clippy::module_inception)]
pub mod room;

pub use peer::Peer;
pub use room::Room;
