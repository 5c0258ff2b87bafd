//! Examiner authorization for publishing quizzes.

use crate::error::{ExamError, Result};

pub const PASSWORD_ENV_VAR: &str = "EXAM_GEN_PASSWORD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// May generate and publish quizzes
    Examiner,
    /// May take the published quiz
    Student,
}

pub trait Authenticator {
    /// Check whether `credential` grants `role`
    fn authorize(&self, role: Role, credential: Option<&str>) -> Result<()>;
}

/// A single examiner password shared by everyone allowed to publish
#[derive(Debug, Clone, Default)]
pub struct SharedPassword {
    password: Option<String>,
}

impl SharedPassword {
    /// Blank passwords count as unset
    pub fn new(password: Option<String>) -> Self {
        Self {
            password: password.filter(|p| !p.trim().is_empty()),
        }
    }

    /// Prefer `EXAM_GEN_PASSWORD`, then the configured password
    pub fn from_env_or(configured: Option<&str>) -> Self {
        let from_env = std::env::var(PASSWORD_ENV_VAR)
            .ok()
            .filter(|p| !p.trim().is_empty());
        Self::new(from_env.or_else(|| configured.map(str::to_string)))
    }

    pub fn is_configured(&self) -> bool {
        self.password.is_some()
    }
}

impl Authenticator for SharedPassword {
    fn authorize(&self, role: Role, credential: Option<&str>) -> Result<()> {
        if role == Role::Student {
            return Ok(());
        }

        let Some(expected) = self.password.as_deref() else {
            log::warn!("No examiner password configured; refusing to publish");
            return Err(ExamError::Unauthorized);
        };

        match credential {
            Some(given) if given == expected => Ok(()),
            _ => Err(ExamError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_always_allowed() {
        let auth = SharedPassword::new(None);
        assert!(auth.authorize(Role::Student, None).is_ok());
    }

    #[test]
    fn test_examiner_with_correct_password() {
        let auth = SharedPassword::new(Some("hunter2".into()));
        assert!(auth.authorize(Role::Examiner, Some("hunter2")).is_ok());
    }

    #[test]
    fn test_examiner_with_wrong_or_missing_password() {
        let auth = SharedPassword::new(Some("hunter2".into()));
        assert!(matches!(
            auth.authorize(Role::Examiner, Some("Hunter2")),
            Err(ExamError::Unauthorized)
        ));
        assert!(matches!(
            auth.authorize(Role::Examiner, None),
            Err(ExamError::Unauthorized)
        ));
    }

    #[test]
    fn test_unconfigured_password_refuses_examiner() {
        let auth = SharedPassword::new(Some("   ".into()));
        assert!(!auth.is_configured());
        assert!(matches!(
            auth.authorize(Role::Examiner, Some("   ")),
            Err(ExamError::Unauthorized)
        ));
    }
}
