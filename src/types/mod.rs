pub mod error;
pub mod function;

pub use error::{ProflogError, Result};
pub use function::{AnalysisReport, FileRecord, FunctionDescriptor};
