pub mod icons;
pub mod progress;
pub mod view;

pub use progress::TimerUI;
pub use view::{format_time, parse_duration, render_overview, render_sequence, render_single};
