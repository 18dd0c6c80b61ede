//! Waveform view functions
//!
//! Plain functions taking a view reference and a message callback and
//! returning an `Element`.
//!
//! ```ignore
//! fn view(&self) -> Element<Message> {
//!     column![
//!         waveform_view(self.viewer.view(ViewKind::Zoomview), |m| {
//!             Message::Waveform(ViewKind::Zoomview, m)
//!         }),
//!         waveform_view(self.viewer.view(ViewKind::Overview), |m| {
//!             Message::Waveform(ViewKind::Overview, m)
//!         }),
//!     ]
//!     .into()
//! }
//! ```
//!
//! Canvas x positions map 1:1 to view pixels, so hosts should keep each
//! view's width in step with its canvas via `Viewer::resize_view`.

use iced::widget::Canvas;
use iced::{Element, Length};
use wavecue_core::view::WaveformView;

use crate::canvas::{WaveformCanvas, WaveformMessage};
use crate::theme::WaveformStyle;

/// Canvas element for `view` using the default style for its kind
pub fn waveform_view<'a, Message>(
    view: &'a WaveformView,
    on_message: impl Fn(WaveformMessage) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    styled_waveform_view(view, WaveformStyle::for_view(view.kind()), on_message)
}

/// Canvas element for `view` with an explicit style
pub fn styled_waveform_view<'a, Message>(
    view: &'a WaveformView,
    style: WaveformStyle,
    on_message: impl Fn(WaveformMessage) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let height = style.height;
    Canvas::new(WaveformCanvas {
        view,
        style,
        on_message: Box::new(on_message),
    })
    .width(Length::Fixed(view.width() as f32))
    .height(Length::Fixed(height))
    .into()
}
