use serde::Serialize;

/// What a build inspector reports for one buildable directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePackage {
    pub name: String,
    /// Package documentation synopsis
    pub doc: String,
    pub files: Vec<String>,
    pub test_files: Vec<String>,
    pub xtest_files: Vec<String>,
    pub imports: Vec<String>,
    pub test_imports: Vec<String>,
    pub xtest_imports: Vec<String>,
}

impl SourcePackage {
    pub fn is_command(&self) -> bool {
        self.name == "main"
    }
}

/// Per-directory package descriptor as recorded in the catalog.
///
/// A directory that fails to build still produces a descriptor carrying
/// its import path and the build error; every other field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub import_path: String,
    pub synopsis: String,
    pub is_command: bool,
    pub files: Vec<String>,
    pub test_files: Vec<String>,
    pub xtest_files: Vec<String>,
    pub imports: Vec<String>,
    pub test_imports: Vec<String>,
    pub xtest_imports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Package {
    pub fn from_source(import_path: String, source: SourcePackage) -> Self {
        let is_command = source.is_command();
        Self {
            name: source.name,
            import_path,
            synopsis: source.doc.trim_end().to_string(),
            is_command,
            files: source.files,
            test_files: source.test_files,
            xtest_files: source.xtest_files,
            imports: source.imports,
            test_imports: source.test_imports,
            xtest_imports: source.xtest_imports,
            errors: Vec::new(),
        }
    }

    pub fn failed(import_path: String, message: String) -> Self {
        Self {
            import_path,
            errors: vec![message],
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
