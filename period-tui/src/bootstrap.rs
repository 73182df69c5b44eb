use crate::api::ApiClient;
use crate::app::App;
use crate::runtime::apply_predictions_result;
use crate::types::AuthState;

pub async fn initialize_app_state(app: &mut App, client: &mut ApiClient) {
    app.is_loading = true;
    app.auth = if client.is_dev() || client.has_session_cookie() {
        AuthState::Authenticated
    } else {
        AuthState::Anonymous
    };

    if let Err(e) = client.prime_csrf().await {
        tracing::warn!(error = %e, "could not read CSRF token from index page");
    }

    let result = client.predictions().await;
    apply_predictions_result(app, result);
    tracing::info!(auth = ?app.auth, dev = client.is_dev(), "session initialized");

    app.is_loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DevBackend;
    use time::macros::date;

    #[tokio::test]
    async fn dev_session_is_authenticated_with_predictions() {
        let today = date!(2024 - 03 - 15);
        let mut client = ApiClient::dev(DevBackend::new(today)).unwrap();
        let mut app = App::new(today, AuthState::Anonymous, true);

        initialize_app_state(&mut app, &mut client).await;

        assert_eq!(app.auth, AuthState::Authenticated);
        assert_eq!(app.calendar.predictions.len(), 3);
        assert_eq!(app.cycle_length, Some(28));
        assert!(!app.is_loading);
    }
}
