//! Blog pages over `app/data/blog.ts`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use tracing::instrument;

use marom_core::BlogPost;

use crate::editor::{BlogPostForm, EditMode, remove_record, save_record};
use crate::error::AppError;
use crate::filters;
use crate::routes::layout::{FlashQuery, Layout, redirect_error, redirect_success};
use crate::state::AppState;

const KIND: &str = "Blog post";

/// Build the blog pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blog", get(index))
        .route("/blog/new", get(new_post).post(create))
        .route("/blog/{id}", get(edit).post(update))
        .route("/blog/{id}/delete", post(delete))
}

/// Blog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub layout: Layout,
    pub posts: Vec<BlogPost>,
}

/// Blog editor template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/edit.html")]
pub struct BlogEditTemplate {
    pub layout: Layout,
    pub is_new: bool,
    pub action: String,
    pub form: BlogPostForm,
}

fn editor(mode: &EditMode, form: BlogPostForm) -> BlogEditTemplate {
    let (title, action) = match mode {
        EditMode::New => ("New post", "/blog/new".to_string()),
        EditMode::Existing(id) => ("Edit post", format!("/blog/{id}")),
    };
    BlogEditTemplate {
        layout: Layout::new(title, action.clone()),
        is_new: mode.is_new(),
        action,
        form,
    }
}

/// GET /blog
#[instrument(skip(state))]
async fn index(State(state): State<AppState>, Query(flash): Query<FlashQuery>) -> BlogIndexTemplate {
    BlogIndexTemplate {
        layout: Layout::new("Blog", "/blog").with_flash(flash),
        posts: state.content().blog().read().await,
    }
}

/// GET /blog/new
async fn new_post() -> BlogEditTemplate {
    let form = BlogPostForm {
        date: Local::now().date_naive().to_string(),
        author: BlogPost::DEFAULT_AUTHOR.to_string(),
        ..BlogPostForm::default()
    };
    editor(&EditMode::New, form)
}

/// GET /blog/{id}
#[instrument(skip(state))]
async fn edit(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let posts = state.content().blog().read().await;
    match posts.iter().find(|p| p.id.as_str() == id) {
        Some(post) => {
            editor(&EditMode::Existing(id), BlogPostForm::from_post(post)).into_response()
        }
        None => redirect_error("/blog", &format!("{KIND} not found: {id}")).into_response(),
    }
}

async fn save(state: &AppState, mode: EditMode, form: BlogPostForm) -> Response {
    let today = Local::now().date_naive();
    let submitted = form.clone();

    let result = state
        .content()
        .blog()
        .update(|posts| -> Result<BlogPost, AppError> {
            let post = form.into_post(&mode, today)?;
            save_record(posts, post.clone(), &mode, KIND)?;
            Ok(post)
        })
        .await;

    match result {
        Ok(post) => {
            tracing::info!(post_id = %post.id, "blog post saved");
            redirect_success("/blog", &format!("Saved \"{}\"", post.title)).into_response()
        }
        Err(e) => {
            if !matches!(e, AppError::Edit(_)) {
                tracing::error!(error = %e, "Failed to save blog post");
            }
            let mut page = editor(&mode, submitted);
            page.layout = page.layout.with_error(e.message());
            page.into_response()
        }
    }
}

/// POST /blog/new
#[instrument(skip(state, form))]
async fn create(State(state): State<AppState>, Form(form): Form<BlogPostForm>) -> Response {
    save(&state, EditMode::New, form).await
}

/// POST /blog/{id}
#[instrument(skip(state, form))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BlogPostForm>,
) -> Response {
    save(&state, EditMode::Existing(id), form).await
}

/// POST /blog/{id}/delete
#[instrument(skip(state))]
async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state
        .content()
        .blog()
        .update(|posts| -> Result<BlogPost, AppError> { Ok(remove_record(posts, &id, KIND)?) })
        .await;

    match result {
        Ok(post) => {
            tracing::info!(post_id = %post.id, "blog post deleted");
            redirect_success("/blog", &format!("Deleted \"{}\"", post.title)).into_response()
        }
        Err(e) => redirect_error("/blog", &e.message()).into_response(),
    }
}
