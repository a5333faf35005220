pub mod coordinator;
pub mod elements;
pub mod palette;

pub use coordinator::{ColorAssignment, ColorCoordinator, ColorSettings, PhraseGroup};
pub use elements::{colored_elements, ColoredElement, Side};
pub use palette::{Color, ColorScheme, ACCESSIBLE_UNALIGNED_COLOR, PALETTE_LEN, UNALIGNED_COLOR};
