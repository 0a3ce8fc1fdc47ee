use crate::auth::{require_basic_auth, Credentials, Unauthorized, REALM};
use farewell_core::{FarewellError, FarewellStore, NewContact, NewMemory, QuoteDeck, UpcomingBirthday};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 16 * 1024;

// ============================================================================
// WEB CONTEXT: shared state for HTTP endpoints
// ============================================================================

pub struct WebContext {
    pub store: FarewellStore,
    /// Held across each read-modify-write so concurrent requests don't interleave
    write_lock: Mutex<()>,
    quotes: Mutex<QuoteDeck>,
    birthday_wishes: Mutex<QuoteDeck>,
    pub credentials: Arc<Credentials>,
}

impl WebContext {
    pub fn new(store: FarewellStore, credentials: Credentials) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            quotes: Mutex::new(QuoteDeck::friendship()),
            birthday_wishes: Mutex::new(QuoteDeck::birthday()),
            credentials: Arc::new(credentials),
        }
    }
}

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterNameRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BirthdayResponse {
    upcoming: Option<UpcomingBirthday>,
    wish: Option<&'static str>,
}

#[derive(Serialize)]
struct QuoteResponse {
    quote: Option<&'static str>,
}

// ============================================================================
// ROUTES
// ============================================================================

pub fn routes(
    ctx: Arc<WebContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let ctx_filter = warp::any().map({
        let ctx = ctx.clone();
        move || ctx.clone()
    });

    let list_names = warp::path!("api" / "names")
        .and(warp::get())
        .and(ctx_filter.clone())
        .map(handle_list_names)
        .boxed();

    let register_name = warp::path!("api" / "names")
        .and(warp::post())
        .and(ctx_filter.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .map(handle_register_name)
        .boxed();

    let list_memories = warp::path!("api" / "memories")
        .and(warp::get())
        .and(ctx_filter.clone())
        .and(warp::query::<SearchQuery>())
        .map(handle_list_memories)
        .boxed();

    let save_memory = warp::path!("api" / "memories")
        .and(warp::post())
        .and(ctx_filter.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .map(handle_save_memory)
        .boxed();

    let delete_memory = warp::path!("api" / "memories" / String)
        .and(warp::delete())
        .and(ctx_filter.clone())
        .map(|id: String, ctx: Arc<WebContext>| handle_delete_memory(ctx, id))
        .boxed();

    let list_contacts = warp::path!("api" / "contacts")
        .and(warp::get())
        .and(ctx_filter.clone())
        .and(warp::query::<SearchQuery>())
        .map(handle_list_contacts)
        .boxed();

    let save_contact = warp::path!("api" / "contacts")
        .and(warp::post())
        .and(ctx_filter.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .map(handle_save_contact)
        .boxed();

    let birthday = warp::path!("api" / "birthday")
        .and(warp::get())
        .and(ctx_filter.clone())
        .map(handle_birthday)
        .boxed();

    let quote = warp::path!("api" / "quote")
        .and(warp::get())
        .and(ctx_filter)
        .map(handle_quote)
        .boxed();

    let api = list_names
        .or(register_name)
        .unify()
        .or(list_memories)
        .unify()
        .or(save_memory)
        .unify()
        .or(delete_memory)
        .unify()
        .or(list_contacts)
        .unify()
        .or(save_contact)
        .unify()
        .or(birthday)
        .unify()
        .or(quote)
        .unify();

    require_basic_auth(ctx.credentials.clone())
        .and(api)
        .recover(handle_rejection)
}

pub async fn start(port: u16, ctx: Arc<WebContext>) {
    println!("Starting farewell API on 0.0.0.0:{}", port);
    tracing::info!(port, "http server listening");
    warp::serve(routes(ctx)).run(([0, 0, 0, 0], port)).await;
}

// ============================================================================
// API HANDLERS
// ============================================================================

fn json_response<T: Serialize>(value: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(value), status).into_response()
}

fn error_response(err: &FarewellError) -> Response {
    let status = match err {
        FarewellError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        FarewellError::Storage(_) | FarewellError::Serialization(_) => {
            tracing::error!(error = %err, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    json_response(
        &ErrorResponse {
            error: err.to_string(),
        },
        status,
    )
}

pub fn handle_list_names(ctx: Arc<WebContext>) -> Response {
    json_response(&ctx.store.list_registered_names(), StatusCode::OK)
}

pub fn handle_register_name(ctx: Arc<WebContext>, body: RegisterNameRequest) -> Response {
    if body.name.trim().is_empty() {
        return error_response(&FarewellError::InvalidInput("name is required".into()));
    }

    let _guard = ctx.write_lock.lock();
    match ctx.store.register_name(&body.name) {
        Ok(names) => json_response(&names, StatusCode::OK),
        Err(e) => error_response(&e),
    }
}

pub fn handle_list_memories(ctx: Arc<WebContext>, query: SearchQuery) -> Response {
    let memories = match query.q {
        Some(ref q) => ctx.store.search_memories(q),
        None => ctx.store.list_memories(),
    };
    json_response(&memories, StatusCode::OK)
}

pub fn handle_save_memory(ctx: Arc<WebContext>, body: NewMemory) -> Response {
    let memory = match body.validate() {
        Ok(memory) => memory,
        Err(e) => return error_response(&e),
    };

    let _guard = ctx.write_lock.lock();
    match ctx.store.save_memory(memory) {
        Ok(saved) => json_response(&saved, StatusCode::CREATED),
        Err(e) => error_response(&e),
    }
}

pub fn handle_delete_memory(ctx: Arc<WebContext>, id: String) -> Response {
    let _guard = ctx.write_lock.lock();
    match ctx.store.delete_memory(&id) {
        Ok(remaining) => json_response(&remaining, StatusCode::OK),
        Err(e) => error_response(&e),
    }
}

pub fn handle_list_contacts(ctx: Arc<WebContext>, query: SearchQuery) -> Response {
    let contacts = match query.q {
        Some(ref q) => ctx.store.search_contacts(q),
        None => ctx.store.list_contacts(),
    };
    json_response(&contacts, StatusCode::OK)
}

pub fn handle_save_contact(ctx: Arc<WebContext>, body: NewContact) -> Response {
    let contact = match body.validate() {
        Ok(contact) => contact,
        Err(e) => return error_response(&e),
    };

    let _guard = ctx.write_lock.lock();
    match ctx.store.save_contact(contact) {
        Ok(saved) => json_response(&saved, StatusCode::CREATED),
        Err(e) => error_response(&e),
    }
}

pub fn handle_birthday(ctx: Arc<WebContext>) -> Response {
    let upcoming = ctx.store.upcoming_birthday();
    let wish = match upcoming {
        Some(_) => ctx.birthday_wishes.lock().next_quote(),
        None => None,
    };
    json_response(&BirthdayResponse { upcoming, wish }, StatusCode::OK)
}

pub fn handle_quote(ctx: Arc<WebContext>) -> Response {
    let quote = ctx.quotes.lock().next_quote();
    json_response(&QuoteResponse { quote }, StatusCode::OK)
}

pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.find::<Unauthorized>().is_some() {
        let reply = warp::reply::with_status("Authentication required", StatusCode::UNAUTHORIZED);
        let reply = warp::reply::with_header(
            reply,
            "WWW-Authenticate",
            format!("Basic realm=\"{}\"", REALM),
        );
        return Ok(reply.into_response());
    }

    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "payload too large".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        tracing::warn!(?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };

    Ok(json_response(&ErrorResponse { error: message }, status))
}
