pub mod calendar_view;
pub mod confirm_view;
pub mod events;
pub mod renderer;
pub mod terminal;
pub mod theme;
pub mod timetable_view;

pub use calendar_view::*;
pub use confirm_view::*;
pub use events::*;
pub use renderer::*;
pub use terminal::*;
pub use theme::*;
pub use timetable_view::*;
