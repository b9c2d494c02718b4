//! Legal document pages over `app/data/legal.ts`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use tracing::instrument;

use marom_core::{LegalDocument, LegalDocumentId};

use crate::editor::{EditMode, LegalDocumentForm, save_record, unique_key};
use crate::error::AppError;
use crate::filters;
use crate::routes::layout::{FlashQuery, Layout, redirect_error, redirect_success};
use crate::state::AppState;

const KIND: &str = "Legal document";

/// Build the legal pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/legal", get(index))
        .route("/legal/new", get(new_document).post(create))
        .route("/legal/{id}", get(edit).post(update))
}

/// Legal listing template.
#[derive(Template, WebTemplate)]
#[template(path = "legal/index.html")]
pub struct LegalIndexTemplate {
    pub layout: Layout,
    pub documents: Vec<LegalDocument>,
}

/// Legal editor template.
#[derive(Template, WebTemplate)]
#[template(path = "legal/edit.html")]
pub struct LegalEditTemplate {
    pub layout: Layout,
    pub is_new: bool,
    pub action: String,
    pub last_updated: Option<String>,
    pub form: LegalDocumentForm,
}

fn editor(mode: &EditMode, form: LegalDocumentForm, last_updated: Option<String>) -> LegalEditTemplate {
    let (title, action) = match mode {
        EditMode::New => ("New legal document", "/legal/new".to_string()),
        EditMode::Existing(id) => ("Edit legal document", format!("/legal/{id}")),
    };
    LegalEditTemplate {
        layout: Layout::new(title, action.clone()),
        is_new: mode.is_new(),
        action,
        last_updated,
        form,
    }
}

/// GET /legal
#[instrument(skip(state))]
async fn index(State(state): State<AppState>, Query(flash): Query<FlashQuery>) -> LegalIndexTemplate {
    LegalIndexTemplate {
        layout: Layout::new("Legal", "/legal").with_flash(flash),
        documents: state.content().legal().read().await,
    }
}

/// GET /legal/new
async fn new_document() -> LegalEditTemplate {
    editor(&EditMode::New, LegalDocumentForm::default(), None)
}

/// GET /legal/{id}
#[instrument(skip(state))]
async fn edit(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let documents = state.content().legal().read().await;
    match documents.iter().find(|d| d.id.as_str() == id) {
        Some(doc) => editor(
            &EditMode::Existing(id),
            LegalDocumentForm::from_document(doc),
            Some(doc.last_updated.clone()),
        )
        .into_response(),
        None => redirect_error("/legal", &format!("{KIND} not found: {id}")).into_response(),
    }
}

async fn save(state: &AppState, mode: EditMode, form: LegalDocumentForm) -> Response {
    let today = Local::now().date_naive();
    let submitted = form.clone();

    let result = state
        .content()
        .legal()
        .update(|documents| -> Result<LegalDocument, AppError> {
            let mut doc = form.into_document(&mode, today)?;
            if mode.is_new() {
                doc.id = LegalDocumentId::new(unique_key(documents, doc.id.as_str()));
            }
            save_record(documents, doc.clone(), &mode, KIND)?;
            Ok(doc)
        })
        .await;

    match result {
        Ok(doc) => {
            tracing::info!(document_id = %doc.id, "legal document saved");
            redirect_success("/legal", &format!("Saved \"{}\"", doc.title)).into_response()
        }
        Err(e) => {
            if !matches!(e, AppError::Edit(_)) {
                tracing::error!(error = %e, "Failed to save legal document");
            }
            let mut page = editor(&mode, submitted, None);
            page.layout = page.layout.with_error(e.message());
            page.into_response()
        }
    }
}

/// POST /legal/new
#[instrument(skip(state, form))]
async fn create(State(state): State<AppState>, Form(form): Form<LegalDocumentForm>) -> Response {
    save(&state, EditMode::New, form).await
}

/// POST /legal/{id}
#[instrument(skip(state, form))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<LegalDocumentForm>,
) -> Response {
    save(&state, EditMode::Existing(id), form).await
}
