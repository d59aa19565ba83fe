use slint::{ModelRc, SharedString, VecModel};
use crate::MainWindow;

/// Wrap a packed RGB buffer (as rendered by plotters) in a Slint image
pub fn rgb_buffer_to_slint_image(buffer: &[u8], width: u32, height: u32) -> slint::Image {
    let pixel_buffer = slint::SharedPixelBuffer::<slint::Rgb8Pixel>::clone_from_slice(buffer, width, height);
    slint::Image::from_rgb8(pixel_buffer)
}

pub fn string_model<I, S>(items: I) -> ModelRc<SharedString>
where
    I: IntoIterator<Item = S>,
    S: Into<SharedString>,
{
    let items: Vec<SharedString> = items.into_iter().map(Into::into).collect();
    ModelRc::new(VecModel::from(items))
}

/// Index for a ComboBox `current-index`, -1 when not found
pub fn combo_index<S: AsRef<str>>(items: &[S], selected: &str) -> i32 {
    items
        .iter()
        .position(|item| item.as_ref() == selected)
        .map_or(-1, |i| i as i32)
}

/// Clear the error line if it still shows a failure reported by `source`.
/// Errors from other sources, such as dataset loading, stay visible.
pub fn clear_error_from(main_window: &MainWindow, source: &str) {
    if is_error_from(&main_window.get_error_message(), source) {
        main_window.set_error_message("".into());
    }
}

fn is_error_from(message: &str, source: &str) -> bool {
    !message.is_empty() && message.starts_with(source)
}
