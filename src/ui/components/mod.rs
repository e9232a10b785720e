mod filter_picker;
mod input;
mod key_result;

pub use filter_picker::{FilterPicker, FilterPickerEvent, PickerContents};
pub use key_result::KeyResult;
