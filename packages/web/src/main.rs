use dioxus::prelude::*;

use ui::AuthProvider;
use views::{ForgotPassword, Home, Login, NoteDetail, Notes, PostDetail, Posts, Register, ResetPassword};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/forgot-password")]
    ForgotPassword {},
    #[route("/reset-password?:code")]
    ResetPassword { code: String },
    #[route("/notes")]
    Notes {},
    #[route("/notes/:id")]
    NoteDetail { id: String },
    #[route("/posts")]
    Posts {},
    #[route("/posts/:id")]
    PostDetail { id: String },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .expect("Failed to start tokio runtime")
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use tower_sessions::MemoryStore;
    use tower_sessions_sqlx_store::PostgresStore;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Loads settings, connects the backend and runs its migrations
    let service = api::context::service()
        .await
        .expect("Failed to start backend");
    let settings = service.settings();

    // Build the Dioxus app with custom routes
    let router = axum::Router::new()
        .merge(api::routes::auth_routes(service))
        .serve_dioxus_application(ServeConfig::new(), App);

    // Sessions live next to the data when PostgreSQL is configured
    let router = match service.pool() {
        Some(pool) => {
            let session_store = PostgresStore::new(pool.clone());
            session_store
                .migrate()
                .await
                .expect("Failed to create session table");
            router.layer(session_layer(session_store, settings))
        }
        None => router.layer(session_layer(MemoryStore::default(), settings)),
    };

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .expect("Server error");
}

#[cfg(feature = "server")]
fn session_layer<S: tower_sessions::SessionStore + Clone>(
    store: S,
    settings: &backend::Settings,
) -> tower_sessions::SessionManagerLayer<S> {
    use std::time::Duration;
    use tower_sessions::cookie::SameSite;
    use tower_sessions::Expiry;

    let days = settings.session.days.max(1) as u64;
    tower_sessions::SessionManagerLayer::new(store)
        .with_secure(settings.session.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(
            Duration::from_secs(60 * 60 * 24 * days)
                .try_into()
                .expect("session lifetime out of range"),
        ))
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            Router::<Route> {}
        }
    }
}
