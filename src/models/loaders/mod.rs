pub mod roster_loader;
pub mod template_loader;

pub use roster_loader::{load_roster, parse_roster};
pub use template_loader::load_template_text;
