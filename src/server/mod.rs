//! HTTP server: post listing, post lookup and post assets

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{ContentError, LoadedPost, Post};
use crate::Blog;

/// Error returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    Content(ContentError),
    Internal(String),
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        ApiError::Content(e)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Content(e @ ContentError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string()).into_response()
            }
            ApiError::Content(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

/// Build the application router
pub fn router(blog: Blog) -> Router {
    let assets = ServeDir::new(&blog.posts_dir);
    let prefix = blog.config.asset_prefix.trim_end_matches('/').to_string();
    let state = Arc::new(blog);

    let app = Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(show_post))
        .with_state(state);

    let app = if prefix.is_empty() {
        app.fallback_service(assets)
    } else {
        app.nest_service(&prefix, assets)
    };

    app.layer(TraceLayer::new_for_http())
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("{} running at http://{}:{}", blog.config.title, ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /api/posts
async fn list_posts(State(blog): State<Arc<Blog>>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = tokio::task::spawn_blocking(move || blog.list_published_posts()).await??;
    Ok(Json(posts))
}

/// GET /api/posts/:slug
async fn show_post(
    State(blog): State<Arc<Blog>>,
    Path(slug): Path<String>,
) -> Result<Json<LoadedPost>, ApiError> {
    let post = tokio::task::spawn_blocking(move || blog.load_post(&slug)).await??;
    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn write_post(root: &std::path::Path, slug: &str, date: &str, published: bool) {
        let dir = root.join("src/posts").join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("main.md"),
            format!(
                "---\ntitle: {slug}\ndescription: about {slug}\ndate: {date}\ncover: ./cover.png\ntags: [svelte]\npublished: {published}\n---\n\nHello from {slug}\n"
            ),
        )
        .unwrap();
        fs::write(dir.join("cover.png"), b"png").unwrap();
    }

    fn blog() -> (TempDir, Blog) {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "older", "2023-01-01", true);
        write_post(tmp.path(), "newer", "2023-06-01", true);
        write_post(tmp.path(), "draft", "2023-09-01", false);
        let blog = Blog::new(tmp.path()).unwrap();
        (tmp, blog)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_list_posts() {
        let (_tmp, blog) = blog();
        let (status, body) = get(router(blog), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let posts = json.as_array().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p["slug"].as_str().unwrap()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);
        assert_eq!(posts[0]["cover"], "/posts/newer/cover.png");
        assert_eq!(posts[0]["tags"], serde_json::json!(["svelte"]));
    }

    #[tokio::test]
    async fn test_list_posts_empty() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();
        let (status, body) = get(router(blog), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_show_draft_post() {
        let (_tmp, blog) = blog();
        let (status, body) = get(router(blog), "/api/posts/draft").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["slug"], "draft");
        assert_eq!(json["meta"]["published"], false);
        assert!(json["content"].as_str().unwrap().contains("Hello from draft"));
    }

    #[tokio::test]
    async fn test_show_missing_post() {
        let (_tmp, blog) = blog();
        let (status, body) = get(router(blog), "/api/posts/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(String::from_utf8(body).unwrap(), "Could not find does-not-exist");
    }

    #[tokio::test]
    async fn test_non_ascii_slug_round_trip() {
        let (tmp, _) = blog();
        write_post(tmp.path(), "héllo-wörld", "2024-01-01", true);
        let blog = Blog::new(tmp.path()).unwrap();

        let (_, body) = get(router(blog.clone()), "/api/posts").await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["slug"], "héllo-wörld");
        let cover = json[0]["cover"].as_str().unwrap().to_string();
        assert_eq!(cover, "/posts/h%C3%A9llo-w%C3%B6rld/cover.png");

        let (status, body) = get(router(blog.clone()), "/api/posts/h%C3%A9llo-w%C3%B6rld").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["slug"], "héllo-wörld");

        let (status, body) = get(router(blog), &cover).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"png");
    }

    #[tokio::test]
    async fn test_serves_cover_asset() {
        let (_tmp, blog) = blog();
        let (status, body) = get(router(blog), "/posts/newer/cover.png").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"png");
    }
}
