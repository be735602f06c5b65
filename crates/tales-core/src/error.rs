/// Alias for `Result<T, ScriptError>`.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors that can occur when assembling a script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// A scene with the same name is already part of the script.
    #[error("scene already defined: \"{0}\"")]
    DuplicateScene(String),
}
