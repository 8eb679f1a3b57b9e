pub mod loaders;
pub mod parameters;
pub mod student;
pub mod template;

pub use loaders::{load_roster, load_template_text, parse_roster};
pub use parameters::{ParameterSet, ParameterSpec, ParameterValue, DEFAULT_PARAMETER_SPECS};
pub use student::StudentRecord;
pub use template::{QuestionUnit, TemplateDocument};
