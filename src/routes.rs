use actix_web::{get, HttpResponse, Responder};

#[get("/")]
async fn index() -> impl Responder {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Commander API</title>
        <style>
            body {
                background-color: #101418;
                color: #d8dee9;
                font-family: monospace;
                max-width: 760px;
                margin: 40px auto;
            }
            h1 {
                color: #88c0d0;
            }
            li {
                margin-bottom: 8px;
            }
            code {
                background: #1c232b;
                padding: 1px 5px;
                color: #a3be8c;
            }
        </style>
    </head>
    <body>
        <h1>Commander API</h1>
        <p>Available endpoints. Those under <code>/api/commands</code> need an <code>Authorization: Bearer</code> header.</p>
        <ul>
            <li><code>GET /</code> – This help page</li>
            <li><code>GET /health</code> – Health check (returns OK)</li>
            <li><code>POST /api/login/authenticate</code> – Exchange <code>{"userName", "password"}</code> for a token</li>
            <li><code>GET /api/commands</code> – List all commands</li>
            <li><code>GET /api/commands/{id}</code> – Fetch one command</li>
            <li><code>POST /api/commands</code> – Create a command</li>
            <li><code>PUT /api/commands/{id}</code> – Replace a command</li>
            <li><code>DELETE /api/commands/{id}</code> – Delete a command</li>
        </ul>
        <p style="margin-top: 40px; font-size: 12px;">Commander - powered by Rust + Actix Web</p>
    </body>
    </html>
    "#;

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

/// Simple health check
#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(index).service(health);
}
