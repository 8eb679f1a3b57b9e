pub mod assembler;
pub mod compiler;
pub mod failure_writer;
pub mod merger;
pub mod randomizer;
pub mod template_splitter;

pub use assembler::{identity_escape, latex_escape, Assembler, Placeholders};
pub use compiler::{safe_file_stem, CompilerInvoker, CompilerOutput, DocumentCompiler, PdfLatex};
pub use failure_writer::FailureWriter;
pub use merger::{merge_directory, MergeSummary};
pub use randomizer::Randomizer;
pub use template_splitter::{split_template, TemplateDialect, TemplateSplitter};
