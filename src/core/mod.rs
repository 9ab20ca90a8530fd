pub mod command;
pub mod controller;
pub mod dimensions;
pub mod display;
pub mod error;
pub mod frame_source;
pub mod input_adapter;
pub mod session;
pub mod stage;
pub mod surface;
pub mod timer;
pub mod transfer;

pub use command::*;
pub use controller::*;
pub use dimensions::*;
pub use display::*;
pub use error::{Error, Result};
pub use frame_source::*;
pub use input_adapter::*;
pub use session::*;
pub use stage::*;
pub use surface::*;
pub use timer::*;
pub use transfer::*;
