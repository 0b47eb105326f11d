use std::fmt;

/// The main error type for loading and reading SIGIL configurations.
#[derive(Debug, Clone, PartialEq)]
pub enum SigilError {
    /// Raised when a config file is missing or unreadable.
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when file content is not valid YAML.
    ParseError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a document index falls outside the loaded set.
    IndexError {
        index: usize,
        len: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a requested section or path is absent.
    KeyError {
        key: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    TypeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl fmt::Display for SigilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigilError::FileError { message, path, hint, code } =>
                write!(f, "[SIGIL] File Error '{}': {}{}{}",
                    path, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SigilError::ParseError { message, line, column, hint, code } =>
                write!(f, "[SIGIL] Parse Error at {}:{}: {}{}{}",
                    line, column, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SigilError::IndexError { index, len, hint, code } =>
                write!(f, "[SIGIL] Index {} out of range for {} document(s){}{}",
                    index, len,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SigilError::KeyError { key, hint, code } =>
                write!(f, "[SIGIL] Key '{}' not found{}{}",
                    key,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            SigilError::TypeError { message, hint, code } =>
                write!(f, "[SIGIL] Type Error: {}{}{}",
                    message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
        }
    }
}

impl std::error::Error for SigilError {}

impl SigilError {
    /// Helper for file-related errors when loading configs.
    ///
    /// Keeps a consistent error code and a friendly default hint.
    pub fn file_error(message: String, path: String) -> Self {
        SigilError::FileError {
            message,
            path,
            hint: Some("Check file path and permissions".into()),
            code: Some(300),
        }
    }
}
