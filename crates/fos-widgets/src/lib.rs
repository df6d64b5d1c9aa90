//! fOS Widgets
//!
//! Accessible accordion and dialog widgets enhancing `fos_dom` documents
//! with ARIA roles, states and keyboard/focus management.
//!
//! # Example
//! ```rust,ignore
//! use fos_widgets::{Key, WidgetHost};
//!
//! let mut host = WidgetHost::from_html(html)?;
//! let dialog = host.enhance_dialog(host.element("settings").unwrap(), None)?;
//! host.open_dialog(dialog);
//! host.key_down(Key::Escape); // closes it, focus returns to the opener
//! ```

pub mod accordion;
pub mod aria;
pub mod config;
pub mod dialog;
mod error;
pub mod host;
pub mod ids;
pub mod input;
mod projection;
pub mod tasks;

pub use accordion::{Accordion, Navigation, Pair};
pub use aria::AriaRole;
pub use config::{AccordionConfig, DialogConfig, DialogMode, HostConfig, TrapStrategy};
pub use dialog::{Dialog, FocusTrap};
pub use error::{WidgetError, WidgetResult};
pub use host::{AccordionHandle, DialogHandle, WidgetHost};
pub use ids::{IdGenerator, SequentialIds, WidgetIds};
pub use input::{EventOutcome, Key, KeyEvent};
pub use projection::Notification;
pub use tasks::{Task, TaskQueue};
