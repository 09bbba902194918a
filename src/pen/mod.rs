pub mod brush;
pub mod channel;
pub mod message;
#[allow(clippy::module_inception)]
pub mod pen;

pub use brush::BrushState;
pub use channel::{MessageChannel, NetworkContext};
pub use message::{PenMessage, StampEvent};
pub use pen::{Pen, PenState, PenTips};
