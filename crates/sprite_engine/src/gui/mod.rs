//! GUI layer: buttons drawn in screen space above the scene

mod button;
mod manager;

pub use button::{ButtonId, ButtonState, GuiButton, GuiEvent};
pub use manager::GuiManager;
