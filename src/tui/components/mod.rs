//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive everything they draw as struct fields, built fresh each frame:
//! - `Message`: one chat bubble
//! - `Header`: narrow-layout top row
//! - `Sidebar`: navigation column / drawer (reads `SidebarState`)
//! - `Toast`: notification overlay
//!
//! ### Stateful Components (Event-Driven)
//!
//! Own persistent state in `TuiState` and emit high-level events:
//! - `InputBox`: auto-growing composer and search box
//! - `MessageListState` / `MessageList`: scrollable conversation
//! - `LandingState` / `Landing`: hero, search and quick prompts
//! - `SidebarState`: entry selection, drawer and account menu
//!
//! Props come in as struct fields rather than render parameters so every
//! component fits the same `Component::render(frame, area)` signature.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── header.rs        (narrow-layout top row)
//! ├── input_box/       (auto-growing text input)
//! ├── landing.rs       (landing view)
//! ├── message.rs       (single message bubble)
//! ├── message_list.rs  (scrollable message container)
//! ├── sidebar.rs       (navigation column and drawer)
//! └── toast.rs         (notifications)
//! ```

pub mod header;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod sidebar;
pub mod toast;

pub use header::Header;
pub use input_box::{InputBox, InputEvent};
pub use landing::{Landing, LandingEvent, LandingState};
pub use message::Message;
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
pub use toast::Toast;
