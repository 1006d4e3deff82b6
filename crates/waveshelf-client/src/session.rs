//! Session lifecycle.
//!
//! Process-wide session state with an explicit lifecycle:
//! `Uninitialized -> Loading -> Authenticated(user) | Anonymous`. The auth
//! provider is injected, never looked up ambiently, so anything owning a
//! `SessionManager` can be tested against a fake.

use std::sync::Arc;

use uuid::Uuid;

use waveshelf_core::{AppError, AuthProvider, Session, User};

/// Where the session currently stands.
///
/// `Loading` covers the window between startup and the first answer from
/// the auth collaborator; consumers should hold off on user-scoped work
/// until the state resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Authenticated(User),
    Anonymous,
}

/// Drives the auth collaborator and owns the current [`SessionState`].
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    state: SessionState,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Id of the signed-in user, or `Unauthorized` when there is none.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        match &self.state {
            SessionState::Authenticated(user) => Ok(user.id),
            _ => Err(AppError::Unauthorized("Sign in required".to_string())),
        }
    }

    /// Resolve the initial session: `Loading` until the provider answers,
    /// then `Authenticated` or `Anonymous`. A provider failure leaves the
    /// state `Anonymous` and surfaces the error.
    pub async fn initialize(&mut self) -> Result<&SessionState, AppError> {
        self.state = SessionState::Loading;
        match self.provider.current_user().await {
            Ok(Some(user)) => self.state = SessionState::Authenticated(user),
            Ok(None) => self.state = SessionState::Anonymous,
            Err(e) => {
                self.state = SessionState::Anonymous;
                return Err(e);
            }
        }
        Ok(&self.state)
    }

    /// Sign up a new account. The state does not change here: depending on
    /// backend settings the account may still need email confirmation.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, AppError> {
        self.provider.sign_up(email, password).await
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, AppError> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        self.state = SessionState::Authenticated(session.user.clone());
        Ok(session)
    }

    pub fn oauth_authorize_url(&self, provider: &str, redirect_to: &str) -> String {
        self.provider.oauth_authorize_url(provider, redirect_to)
    }

    pub async fn sign_out(&mut self) -> Result<(), AppError> {
        self.provider.sign_out().await?;
        self.state = SessionState::Anonymous;
        Ok(())
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        self.provider.request_password_reset(email).await
    }

    pub async fn update_password(&self, new_password: &str) -> Result<(), AppError> {
        self.provider.update_password(new_password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeAuthProvider {
        user: Mutex<Option<User>>,
    }

    impl FakeAuthProvider {
        fn signed_in(user: User) -> Self {
            Self {
                user: Mutex::new(Some(user)),
            }
        }

        fn signed_out() -> Self {
            Self {
                user: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl AuthProvider for FakeAuthProvider {
        async fn sign_up(&self, email: &str, _password: &str) -> Result<User, AppError> {
            Ok(User {
                id: Uuid::new_v4(),
                email: email.to_string(),
            })
        }

        async fn sign_in_with_password(
            &self,
            email: &str,
            _password: &str,
        ) -> Result<Session, AppError> {
            let user = User {
                id: Uuid::new_v4(),
                email: email.to_string(),
            };
            *self.user.lock().unwrap() = Some(user.clone());
            Ok(Session {
                access_token: "token".to_string(),
                user,
                expires_at: None,
            })
        }

        fn oauth_authorize_url(&self, provider: &str, redirect_to: &str) -> String {
            format!("fake://authorize/{}?redirect_to={}", provider, redirect_to)
        }

        async fn sign_out(&self) -> Result<(), AppError> {
            *self.user.lock().unwrap() = None;
            Ok(())
        }

        async fn request_password_reset(&self, _email: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn update_password(&self, _new_password: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn current_user(&self) -> Result<Option<User>, AppError> {
            Ok(self.user.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_initialize_resolves_to_authenticated() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.c".to_string(),
        };
        let mut manager = SessionManager::new(Arc::new(FakeAuthProvider::signed_in(user.clone())));
        assert_eq!(*manager.state(), SessionState::Uninitialized);

        manager.initialize().await.unwrap();
        assert_eq!(*manager.state(), SessionState::Authenticated(user.clone()));
        assert_eq!(manager.user_id().unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_initialize_resolves_to_anonymous() {
        let mut manager = SessionManager::new(Arc::new(FakeAuthProvider::signed_out()));
        manager.initialize().await.unwrap();
        assert_eq!(*manager.state(), SessionState::Anonymous);
        assert!(matches!(
            manager.user_id().unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let mut manager = SessionManager::new(Arc::new(FakeAuthProvider::signed_out()));
        let session = manager.sign_in("a@b.c", "pw").await.unwrap();
        assert_eq!(
            *manager.state(),
            SessionState::Authenticated(session.user.clone())
        );

        manager.sign_out().await.unwrap();
        assert_eq!(*manager.state(), SessionState::Anonymous);
    }
}
