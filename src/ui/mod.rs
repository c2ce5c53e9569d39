//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw` - Frame layout and panels
//! - `theme.rs` - Color themes and presets
//! - `layout.rs` - Scrolling list layout
//! - `entry_row.rs` - Entry table row widget

mod draw;
pub mod entry_row;
pub mod layout;
pub mod theme;

pub use draw::draw;

pub use layout::ListLayout;
pub use theme::Theme;
