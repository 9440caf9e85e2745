use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// One discovered function or method definition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Bare name for free functions, `Class.method` for methods
    pub name: String,
    /// 1-based line of the `def` keyword
    pub start_line: u32,
    /// 1-based last line of the body
    pub end_line: u32,
    pub is_method: bool,
    pub is_async: bool,
    /// Bare-identifier decorators only (`@name`)
    pub decorators: Vec<String>,
    /// Positional-or-keyword parameter names
    pub args: Vec<String>,
    /// Source text of the return annotation
    pub returns: Option<String>,
}

impl FunctionDescriptor {
    /// One-line rendering used by the text report, e.g.
    /// `async Greeter.greet(self, name) -> str @staticmethod [12-15]`
    pub fn signature(&self) -> String {
        let mut out = String::new();
        if self.is_async {
            out.push_str("async ");
        }
        out.push_str(&self.name);
        out.push('(');
        out.push_str(&self.args.join(", "));
        out.push(')');
        if let Some(returns) = &self.returns {
            out.push_str(" -> ");
            out.push_str(returns);
        }
        for decorator in &self.decorators {
            out.push_str(" @");
            out.push_str(decorator);
        }
        out.push_str(&format!(" [{}-{}]", self.start_line, self.end_line));
        out
    }
}

/// Functions discovered in a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub functions: Vec<FunctionDescriptor>,
}

/// Ordered mapping from file path to the functions found in it.
///
/// Files keep walk order. Files without functions are never inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    files: Vec<FileRecord>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the functions of a file. Empty sequences are dropped.
    ///
    /// Returns whether the file was recorded.
    pub fn insert(&mut self, path: impl Into<String>, functions: Vec<FunctionDescriptor>) -> bool {
        if functions.is_empty() {
            return false;
        }
        let path = path.into();
        match self.files.iter_mut().find(|record| record.path == path) {
            Some(record) => record.functions = functions,
            None => self.files.push(FileRecord { path, functions }),
        }
        true
    }

    pub fn get(&self, path: &str) -> Option<&[FunctionDescriptor]> {
        self.files
            .iter()
            .find(|record| record.path == path)
            .map(|record| record.functions.as_slice())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|record| record.path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter()
    }

    /// Number of files in the report
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total number of functions across all files
    pub fn function_count(&self) -> usize {
        self.files.iter().map(|record| record.functions.len()).sum()
    }

    pub fn method_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|record| &record.functions)
            .filter(|function| function.is_method)
            .count()
    }
}

impl IntoIterator for AnalysisReport {
    type Item = FileRecord;
    type IntoIter = std::vec::IntoIter<FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl Serialize for AnalysisReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for record in &self.files {
            map.serialize_entry(&record.path, &record.functions)?;
        }
        map.end()
    }
}
