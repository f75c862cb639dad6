use axum::extract::Path;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::proxy::ProxyError;
use crate::server::state::AppState;

const SHELL_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Minbar</title>
<link rel="manifest" href="/manifest.json">
<link rel="stylesheet" href="/static/board.css">
</head>
<body>
<main id="board">
<h1>Minbar</h1>
<p>This board is rendered by <code>minbar display</code>. Data lives under <a href="/api/masjids">/api/masjids</a>.</p>
</main>
</body>
</html>
"#;

const MANIFEST: &str = r##"{
  "name": "Minbar",
  "short_name": "Minbar",
  "start_url": "/",
  "display": "fullscreen",
  "background_color": "#0f1117",
  "theme_color": "#d4a017"
}
"##;

const FAVICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"><circle cx="8" cy="8" r="7" fill="#d4a017"/></svg>"##;

const BOARD_CSS: &str = "body{background:#0f1117;color:#e6e6e6;font-family:sans-serif}\n#board{max-width:40rem;margin:4rem auto}\n";

fn asset(content_type: &'static str, body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn index() -> Response {
    asset("text/html; charset=utf-8", SHELL_HTML)
}

async fn manifest() -> Response {
    asset("application/manifest+json", MANIFEST)
}

async fn favicon() -> Response {
    asset("image/svg+xml", FAVICON_SVG)
}

async fn static_file(Path(file): Path<String>) -> Result<Response, ProxyError> {
    match file.as_str() {
        "board.css" => Ok(asset("text/css; charset=utf-8", BOARD_CSS)),
        other => Err(ProxyError::NotFound(format!("No static file '{}'", other))),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/manifest.json", get(manifest))
        .route("/favicon.ico", get(favicon))
        .route("/static/{file}", get(static_file))
}
