//! Room events - incremental changes delivered by the event stream

mod room_event;

pub use room_event::RoomEvent;
