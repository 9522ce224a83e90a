//! Login and logout against the TruePLM backend.
//!
//! A [`Session`] owns the token from login until [`Session::logout`]
//! consumes it, so a token cannot be released twice.

use plm_core::config::Credentials;
use plm_core::plm::{PlmBackend, SessionToken};
use plm_core::PlmError;
use secrecy::ExposeSecret;
use tracing::instrument;

pub struct Session<'a, B: PlmBackend + ?Sized> {
    backend: &'a B,
    token: SessionToken,
    closed: bool,
}

impl<'a, B: PlmBackend + ?Sized> Session<'a, B> {
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Release the session server-side.
    pub async fn logout(mut self) -> Result<(), PlmError> {
        self.closed = true;
        self.backend.deauthenticate(&self.token).await?;
        tracing::info!("Logged out");
        Ok(())
    }
}

impl<B: PlmBackend + ?Sized> Drop for Session<'_, B> {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!("Session dropped without logout; the server-side session stays open");
        }
    }
}

/// Open a session with the given credentials.
///
/// Any `error` in the login response is an authentication failure; its
/// payload is not inspected.
#[instrument(skip(backend, credentials), fields(user = %credentials.login_name))]
pub async fn login<'a, B: PlmBackend + ?Sized>(
    backend: &'a B,
    credentials: &Credentials,
    server: &str,
    port: u16,
) -> Result<Session<'a, B>, PlmError> {
    let res = backend
        .authenticate(
            &credentials.login_name,
            &credentials.group_name,
            credentials.password.expose_secret(),
            server,
            port,
        )
        .await?;

    if res.error.is_some() {
        tracing::error!("Backend rejected the login");
        return Err(PlmError::AuthError(format!(
            "login rejected for user '{}'",
            credentials.login_name
        )));
    }

    let token = res
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PlmError::AuthError("login response carried no token".to_string()))?;

    tracing::info!("Logged in");
    Ok(Session {
        backend,
        token: SessionToken::new(token),
        closed: false,
    })
}
