pub mod feedback;
pub mod menu;
pub mod theme;
