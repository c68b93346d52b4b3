pub mod analytics;
pub mod contact;
pub mod filter;
pub mod lifecycle;
pub mod navigation;
pub mod print;
pub mod reveal;
pub mod shortcuts;
pub mod theme;
pub mod typing;
