use crate::{
    auth::{
        middleware::validator, Clock, InMemoryCredentialStore, SigningKey, SystemClock,
        TokenAuthenticator,
    },
    command_handlers,
    configuration::Settings,
    db::{CommandRepo, InMemoryCommandRepo},
    login_handlers, routes,
};
use actix_web::{dev::Server, web, App, HttpServer};
use actix_web_httpauth::middleware::HttpAuthentication;
use anyhow::Context;
use std::{net::TcpListener, sync::Arc};
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Builds the application with the wall clock.
    pub async fn build(settings: Settings) -> Result<Self, anyhow::Error> {
        Self::build_with_clock(settings, Arc::new(SystemClock)).await
    }

    pub async fn build_with_clock(
        settings: Settings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, anyhow::Error> {
        let cost = settings.bcrypt_cost;
        let entries = settings.credentials.clone();
        let store = web::block(move || InMemoryCredentialStore::from_entries(entries, cost))
            .await
            .context("credential loading task failed")??;
        tracing::info!(users = store.len(), "credential store loaded");

        let key = SigningKey::from_secret(settings.signing_secret())?;
        let ttl = settings.token_ttl;
        let authenticator = web::block(move || {
            TokenAuthenticator::new(Arc::new(store), key, clock, ttl, cost)
        })
        .await
        .context("authenticator setup task failed")??;

        let repo: Arc<dyn CommandRepo> = if settings.seed_commands {
            Arc::new(InMemoryCommandRepo::with_fixture())
        } else {
            Arc::new(InMemoryCommandRepo::new())
        };

        let address = settings.address();
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
        let port = listener.local_addr()?.port();
        tracing::info!(%address, port, "listening");

        let server = run(listener, authenticator, repo)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(
    listener: TcpListener,
    authenticator: TokenAuthenticator,
    repo: Arc<dyn CommandRepo>,
) -> Result<Server, anyhow::Error> {
    let authenticator = web::Data::new(authenticator);
    let repo: web::Data<dyn CommandRepo> = web::Data::from(repo);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(authenticator.clone())
            .app_data(repo.clone())
            .configure(routes::configure)
            .service(web::scope("/api/login").service(login_handlers::authenticate))
            .service(
                web::scope("/api/commands")
                    .wrap(HttpAuthentication::bearer(validator))
                    .service(command_handlers::list_commands)
                    .service(command_handlers::get_command)
                    .service(command_handlers::create_command)
                    .service(command_handlers::update_command)
                    .service(command_handlers::delete_command),
            )
    })
    .listen(listener)?
    .run();
    Ok(server)
}
