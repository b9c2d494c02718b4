//! CRM page: newsletter subscribers and contact messages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::db::crm;
use crate::filters;
use crate::routes::layout::{FlashQuery, Layout};
use crate::state::AppState;

/// CRM tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrmTab {
    #[default]
    Newsletter,
    Contact,
}

/// Query parameters for `/crm`.
#[derive(Debug, Default, Deserialize)]
pub struct CrmQuery {
    #[serde(default)]
    pub tab: CrmTab,
    #[serde(flatten)]
    pub flash: FlashQuery,
}

/// Newsletter subscriber row.
#[derive(Debug, Clone)]
pub struct LeadRow {
    pub email: String,
    pub status: String,
    pub created_at: String,
}

/// Contact message row.
#[derive(Debug, Clone)]
pub struct MessageRow {
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: &'static str,
    pub created_at: String,
}

/// CRM template.
#[derive(Template, WebTemplate)]
#[template(path = "crm/index.html")]
pub struct CrmTemplate {
    pub layout: Layout,
    pub newsletter_tab: bool,
    pub retry_href: &'static str,
    pub leads: Vec<LeadRow>,
    pub messages: Vec<MessageRow>,
    pub load_error: Option<String>,
}

/// GET /crm
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<CrmQuery>) -> CrmTemplate {
    let mut leads = Vec::new();
    let mut messages = Vec::new();

    let load_error = match query.tab {
        CrmTab::Newsletter => match crm::newsletter_leads(state.store()).await {
            Ok(rows) => {
                leads = rows
                    .into_iter()
                    .map(|lead| LeadRow {
                        email: lead.email,
                        status: lead.status.unwrap_or_else(|| "subscribed".to_string()),
                        created_at: lead.created_at.format("%b %d, %Y").to_string(),
                    })
                    .collect();
                None
            }
            Err(e) => Some(e.to_string()),
        },
        CrmTab::Contact => match crm::contact_messages(state.store()).await {
            Ok(rows) => {
                messages = rows
                    .into_iter()
                    .map(|msg| MessageRow {
                        status: msg.status().as_str(),
                        name: msg.name,
                        email: msg.email,
                        message: msg.message,
                        created_at: msg.created_at.format("%b %d, %Y %H:%M").to_string(),
                    })
                    .collect();
                None
            }
            Err(e) => Some(e.to_string()),
        },
    };

    if let Some(error) = &load_error {
        tracing::warn!(error = %error, tab = ?query.tab, "CRM data unavailable");
    }

    CrmTemplate {
        layout: Layout::new("CRM", "/crm").with_flash(query.flash),
        newsletter_tab: query.tab == CrmTab::Newsletter,
        retry_href: match query.tab {
            CrmTab::Newsletter => "/crm?tab=newsletter",
            CrmTab::Contact => "/crm?tab=contact",
        },
        leads,
        messages,
        load_error,
    }
}
