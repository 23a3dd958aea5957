use thiserror::Error;

/// Failures that abort an invocation instead of becoming speech.
///
/// These describe a misconfigured skill or a caller that is out of step with
/// the interaction model, so they are surfaced to the platform as-is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SkillError {
    #[error("invalid application id `{received}`")]
    InvalidApplicationId { received: String },
    #[error("unrecognized intent `{0}`")]
    UnrecognizedIntent(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("forbidden: {message}")]
    Forbidden { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request is not supported by this skill's interaction model."
            }
            Self::Forbidden { .. } => "The request was not issued for this skill.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Forbidden { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl SkillError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Forbidden { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<SkillError> for InterfaceError {
    fn from(value: SkillError) -> Self {
        match value {
            SkillError::InvalidApplicationId { .. } => Self::Forbidden {
                message: "application id does not match this skill".to_owned(),
                correlation_id: "unassigned".to_owned(),
            },
            SkillError::UnrecognizedIntent(name) => Self::BadRequest {
                message: format!("unrecognized intent `{name}`"),
                correlation_id: "unassigned".to_owned(),
            },
        }
    }
}
