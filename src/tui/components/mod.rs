//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: variant, phase, partner, online count
//! - `Message`: a single chat bubble
//! - `InterestPanel`: interest picker and "searching" screen
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: capped single-line text input
//! - `MessageList`: scrollable timeline (state in `MessageListState`)
//!
//! Components never touch the session directly. `ui.rs` copies what they
//! need out of the `Session` each frame, and `tui/mod.rs` turns their events
//! into driver calls.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── interest_panel.rs
//! └── input_box/
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub use input_box::{INPUT_HEIGHT, InputBox, InputEvent};
pub mod interest_panel;
pub use interest_panel::InterestPanel;
pub mod message;
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
