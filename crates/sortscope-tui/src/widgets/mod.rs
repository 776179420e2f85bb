mod algorithms;
mod bars;
mod popup;
mod status_bar;

pub use algorithms::AlgorithmsWidget;
pub use bars::BarsWidget;
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;
