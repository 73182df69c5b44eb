use crate::api::{ApiClient, ApiError};
use crate::app::App;
use crate::panel::{derive_panel, PanelAction};
use crate::types::{AuthState, PredictionInfo, ProfileForm, SelectedDate};
use anyhow::Result;

use super::action_queue::Action;

const START_MARKED: &str = "经期开始标记成功！";
const END_MARKED: &str = "经期结束日期已成功更新！";
const RECORD_ADJUSTED: &str = "经期记录已成功调整！";
const RECORD_DELETED: &str = "记录删除成功";
const PROFILE_SAVED: &str = "基础信息保存成功";
pub(super) const ACCOUNT_DELETED: &str = "✅ 账户删除成功！感谢您使用我们的服务。";

pub(super) async fn run_action(
    action: Action,
    app: &mut App,
    client: &mut ApiClient,
) -> Result<()> {
    match action {
        Action::LoadDateInfo { date } => load_date_info(date, app, client).await,
        Action::Submit(panel_action) => submit_panel_action(panel_action, app, client).await,
        Action::DeleteRecord { record_id } => {
            let result = client.delete_record(record_id).await;
            finish_mutation(app, client, result, RECORD_DELETED, "删除失败").await;
        }
        Action::DeleteAccount { password } => delete_account(&password, app, client).await,
        Action::SaveProfile(form) => save_profile(form, app, client).await,
        Action::Reload => reload(app, client).await,
    }
    Ok(())
}

/// Server session state as reported by the predictions endpoint, which sits
/// behind the login check.
pub fn apply_predictions_result(app: &mut App, result: Result<PredictionInfo, ApiError>) {
    match result {
        Ok(info) => {
            app.auth = AuthState::Authenticated;
            app.apply_predictions(info);
        }
        Err(ApiError::Rejected(message)) => {
            app.auth = AuthState::Authenticated;
            tracing::warn!(%message, "predictions unavailable");
        }
        Err(ApiError::Unauthorized) => {
            app.auth = AuthState::Anonymous;
            app.calendar.predictions.clear();
        }
        Err(e) => tracing::warn!(error = %e, "failed to load predictions"),
    }
}

async fn load_date_info(date: SelectedDate, app: &mut App, client: &mut ApiClient) {
    tracing::debug!(%date, "loading period info");
    let info = match client.period_info(date).await {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!(%date, error = %e, "period info unavailable, showing fallback panel");
            if matches!(e, ApiError::Unauthorized) {
                app.auth = AuthState::Anonymous;
            }
            None
        }
    };

    let panel = derive_panel(date, app.auth, info.as_ref());
    tracing::debug!(%date, actions = panel.action_count(), source = ?panel.source, "panel derived");
    app.show_date_panel(panel);
}

async fn submit_panel_action(action: PanelAction, app: &mut App, client: &mut ApiClient) {
    match &action {
        PanelAction::MarkStart { date } => {
            tracing::info!(%date, "marking period start");
            let result = client.mark_start(*date).await;
            finish_mutation(app, client, result, START_MARKED, "标记失败").await;
        }
        PanelAction::MarkEnd { date } => {
            tracing::info!(%date, "marking period end");
            let result = client.mark_end(*date).await;
            finish_mutation(app, client, result, END_MARKED, "标记失败").await;
        }
        PanelAction::SetStartDate { .. } | PanelAction::AdjustRange { .. } => {
            let Some(request) = action.adjust_request() else {
                return;
            };
            tracing::info!(
                record_id = request.record_id,
                kind = request.kind.as_str(),
                "adjusting period record"
            );
            let result = client.adjust_period(&request).await;
            finish_mutation(app, client, result, RECORD_ADJUSTED, "调整失败").await;
        }
        PanelAction::DeleteRecord { .. } | PanelAction::Close => {
            app.submitting = false;
            tracing::debug!(?action, "panel action is handled locally");
        }
    }
}

/// Report the outcome of a mutation. Success reloads; failure keeps the panel
/// open with its actions enabled again.
async fn finish_mutation(
    app: &mut App,
    client: &mut ApiClient,
    result: Result<(), ApiError>,
    success: &str,
    failure_prefix: &str,
) {
    app.submitting = false;
    match result {
        Ok(()) => {
            reload(app, client).await;
            app.set_status(success.to_string());
        }
        Err(e) => {
            tracing::error!(error = %e, failure = failure_prefix, "mutation failed");
            app.set_error(e.failure_text(failure_prefix));
        }
    }
}

async fn delete_account(password: &str, app: &mut App, client: &mut ApiClient) {
    match client.delete_account(password).await {
        Ok(()) => {
            tracing::info!("account deleted");
            app.account_deleted = true;
            app.close_account_dialog();
            app.set_status(ACCOUNT_DELETED.to_string());
            app.quit();
        }
        Err(e) => {
            tracing::error!(error = %e, "account deletion failed");
            let message = match &e {
                ApiError::Rejected(message) => message.clone(),
                other => other.failure_text("删除失败"),
            };
            app.account_dialog.submitting = false;
            app.account_dialog.error = Some(format!("❌ {}", message));
        }
    }
}

async fn save_profile(form: ProfileForm, app: &mut App, client: &mut ApiClient) {
    match client.save_profile(&form).await {
        Ok(()) => {
            tracing::info!(
                cycle_length = %form.cycle_length,
                period_length = %form.period_length,
                "profile saved"
            );
            app.close_profile_dialog();
            reload(app, client).await;
            app.set_status(PROFILE_SAVED.to_string());
        }
        Err(e) => {
            tracing::error!(error = %e, "profile save failed");
            app.profile_dialog.error = Some(e.failure_text("保存失败"));
        }
    }
}

/// Close the panel, clear the selection and refetch the month decorations.
async fn reload(app: &mut App, client: &mut ApiClient) {
    app.close_date_panel();
    app.clear_status();
    let result = client.predictions().await;
    apply_predictions_result(app, result);
}
