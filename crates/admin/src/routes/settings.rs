//! Settings page: SMTP, brand palette, social links and a test email form.
//!
//! SMTP and brand settings live in the hosted `content_blocks` table; social
//! links live in the storefront's `settings.ts`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use marom_core::{BrandSettings, SiteSettings, SmtpSettings};

use crate::db::content_blocks;
use crate::error::AppError;
use crate::filters;
use crate::routes::layout::{FlashQuery, Layout, redirect_error, redirect_success};
use crate::services::email::{SmtpTestRequest, send_test_email};
use crate::state::AppState;

const PATH: &str = "/settings";

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(PATH, get(settings_page))
        .route("/settings/smtp", post(save_smtp))
        .route("/settings/brand", post(save_brand))
        .route("/settings/socials", post(save_socials))
        .route("/settings/test-email", post(test_email))
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub layout: Layout,
    pub smtp: SmtpSettings,
    pub brand: BrandSettings,
    pub site: SiteSettings,
    pub hosted_error: Option<String>,
}

/// SMTP form; the port arrives as text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SmtpForm {
    pub host: String,
    pub port: String,
    pub user: String,
    pub pass: String,
    pub from_email: String,
}

impl SmtpForm {
    /// Convert to settings; a blank port means the default.
    ///
    /// # Errors
    ///
    /// `BadRequest` when the port is not a number.
    pub fn into_settings(self) -> Result<SmtpSettings, AppError> {
        let port = match self.port.trim() {
            "" => SmtpSettings::default().port,
            text => text
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid port: {text}")))?,
        };
        Ok(SmtpSettings {
            host: self.host.trim().to_string(),
            port,
            user: self.user.trim().to_string(),
            pass: self.pass,
            from_email: self.from_email.trim().to_string(),
        })
    }
}

/// Social links form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SocialsForm {
    pub facebook: String,
    pub instagram: String,
    pub tiktok: String,
    pub youtube: String,
    pub whatsapp: String,
    pub trustindex_widget_code: String,
}

/// Test email form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TestEmailForm {
    pub to_email: String,
}

/// GET /settings
#[instrument(skip(state))]
async fn settings_page(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> SettingsTemplate {
    let mut hosted_error = None;

    let smtp = content_blocks::smtp(state.store())
        .await
        .unwrap_or_else(|e| {
            hosted_error = Some(e.to_string());
            SmtpSettings::default()
        });
    let brand = content_blocks::brand(state.store())
        .await
        .unwrap_or_else(|e| {
            hosted_error.get_or_insert_with(|| e.to_string());
            BrandSettings::default()
        });

    SettingsTemplate {
        layout: Layout::new("Settings", PATH).with_flash(flash),
        smtp,
        brand,
        site: state.content().settings().read().await,
        hosted_error,
    }
}

fn finish(result: Result<(), AppError>, success: &str) -> Response {
    match result {
        Ok(()) => redirect_success(PATH, success).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to save settings");
            redirect_error(PATH, &e.message()).into_response()
        }
    }
}

/// POST /settings/smtp
#[instrument(skip(state, form))]
async fn save_smtp(State(state): State<AppState>, Form(form): Form<SmtpForm>) -> Response {
    let result = async {
        let settings = form.into_settings()?;
        content_blocks::put(state.store(), SmtpSettings::SECTION_KEY, &settings).await?;
        Ok::<(), AppError>(())
    }
    .await;
    finish(result, "SMTP settings saved")
}

/// POST /settings/brand
#[instrument(skip(state, form))]
async fn save_brand(State(state): State<AppState>, Form(form): Form<BrandSettings>) -> Response {
    let result = content_blocks::put(state.store(), BrandSettings::SECTION_KEY, &form)
        .await
        .map_err(AppError::from);
    finish(result, "Brand settings saved")
}

/// POST /settings/socials
#[instrument(skip(state, form))]
async fn save_socials(State(state): State<AppState>, Form(form): Form<SocialsForm>) -> Response {
    let result = state
        .content()
        .settings()
        .update(|site| -> Result<(), AppError> {
            site.social_links.facebook = form.facebook.trim().to_string();
            site.social_links.instagram = form.instagram.trim().to_string();
            site.social_links.tiktok = form.tiktok.trim().to_string();
            site.social_links.youtube = form.youtube.trim().to_string();
            site.social_links.whatsapp = form.whatsapp.trim().to_string();
            site.trustindex_widget_code = form.trustindex_widget_code;
            Ok(())
        })
        .await;
    finish(result, "Social links saved")
}

/// POST /settings/test-email
///
/// Sends with the saved SMTP settings.
#[instrument(skip(state, form))]
async fn test_email(State(state): State<AppState>, Form(form): Form<TestEmailForm>) -> Response {
    let result = async {
        let smtp = content_blocks::smtp(state.store()).await?;
        send_test_email(&SmtpTestRequest::from_settings(&smtp, &form.to_email)).await?;
        Ok::<(), AppError>(())
    }
    .await;

    match result {
        Ok(()) => redirect_success(PATH, crate::routes::api::smtp::SENT_MESSAGE).into_response(),
        Err(e) => redirect_error(PATH, &e.message()).into_response(),
    }
}
