//! J1939 transport layer: CAN frame representation, 29-bit identifier
//! management and the bus/timer abstraction traits.
//!
//! Every message exchanged with the module fits in a single eight-byte frame,
//! so there is no multi-frame transport here.

pub mod can_frame;
pub mod can_id;
pub mod traits;
