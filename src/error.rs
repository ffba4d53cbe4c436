use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZipflowError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No directory with input archives: {path}")]
    NoInputDirectory { path: String },

    #[error("Archive is missing or not a valid ZIP container: {path}")]
    ArchiveUnreadable {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive member not found: {member} (in {archive})")]
    MemberMissing { archive: String, member: String },

    #[error("Malformed document in {member}: {message}")]
    MalformedDocument { member: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Record stream closed before end-of-stream: {stream}")]
    StreamClosed { stream: &'static str },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ZipflowError {
    fn user_message(&self) -> String {
        match self {
            ZipflowError::NoInputDirectory { path } => {
                format!("No directory with input archives: {}", path)
            }
            ZipflowError::ArchiveUnreadable { path, .. } => {
                format!("Could not read archive: {}", path)
            }
            ZipflowError::MemberMissing { archive, member } => {
                format!("Archive {} has no member named {}", archive, member)
            }
            ZipflowError::MalformedDocument { member, message } => {
                format!("Document {} could not be decoded: {}", member, message)
            }
            ZipflowError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ZipflowError::StreamClosed { stream } => {
                format!("The {} record stream closed before all records were written", stream)
            }
            ZipflowError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ZipflowError::NoInputDirectory { .. } => Some(
                "Run the generation mode first, or point --archives-dir at a directory containing .zip archives.".to_string()
            ),
            ZipflowError::ArchiveUnreadable { .. } => Some(
                "The file may be truncated or not a ZIP archive. Regenerate the population or remove the file.".to_string()
            ),
            ZipflowError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            ZipflowError::StreamClosed { .. } => Some(
                "Check that the output files are writable and the disk is not full.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ZipflowError {
    fn from(error: toml::de::Error) -> Self {
        ZipflowError::Config {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ZipflowError {
    fn from(error: csv::Error) -> Self {
        match error.into_kind() {
            csv::ErrorKind::Io(e) => ZipflowError::Io(e),
            other => ZipflowError::Config {
                message: format!("CSV write failed: {:?}", other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ZipflowError>;
