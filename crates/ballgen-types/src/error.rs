use thiserror::Error;

/// Errors from writing content to the site tree.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("filesystem error: {0}")]
    FileSystem(String),

    #[error("front matter serialization failed: {0}")]
    Serialization(String),
}

/// Errors from the external build-and-publish step.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to run `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("deploy is disabled in configuration")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_error_display() {
        let err = DeployError::CommandFailed {
            command: "git push".to_string(),
            status: "exit status: 1".to_string(),
        };
        assert_eq!(err.to_string(), "`git push` exited with exit status: 1");
    }

    #[test]
    fn test_publish_error_display() {
        let err = PublishError::FileSystem("permission denied".to_string());
        assert_eq!(err.to_string(), "filesystem error: permission denied");
    }
}
