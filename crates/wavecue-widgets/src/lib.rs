//! iced widgets for wavecue views
//!
//! - **Canvas program**: `WaveformCanvas` draws a `WaveformView` and turns
//!   pointer input into `WaveformMessage`s
//! - **View functions**: `waveform_view` wraps the canvas in an `Element`
//! - **Dispatch**: `apply_message` routes canvas messages to the `Viewer`
//! - **Subscriptions**: display ticks and background build results

pub mod canvas;
pub mod dispatch;
pub mod subscription;
pub mod theme;
pub mod view;

pub use canvas::{handle_pointer, Gesture, Pointer, WaveformCanvas, WaveformMessage};
pub use dispatch::apply_message;
pub use subscription::{build_results, frame_ticks, FRAME_INTERVAL};
pub use theme::{to_color, WaveformStyle, OVERVIEW_HEIGHT, ZOOMVIEW_HEIGHT};
pub use view::{styled_waveform_view, waveform_view};
