mod cache;
mod cli;
mod feed;

use std::{env, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, signal};

use wingman_calendar::{
    bucket_by_day, expand_month, filter_visible, venues_open_by_month, CalendarError, DayBuckets,
    DayView, Event, Feed, MonthGrid, MonthWindow,
};

use crate::cache::Cache;
use crate::feed::Source;

struct AppState {
    source: Source,
    cache: Arc<Cache<String, Feed>>,
}

type SharedState = Arc<AppState>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = cli::parse(env::args().collect());

    let state = Arc::new(AppState {
        source: args.source,
        cache: Cache::new(cache::Config {
            enabled: args.enable_cache,
            ttl: args.cache_ttl,
        }),
    });

    let listener = TcpListener::bind(args.address).await?;
    info!("Serving {} at http://{}", state.source, args.address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "wingman_proxy=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
    }
    info!("Shutting down");
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/calendar", get(handle_month))
        .route("/calendar/day", get(handle_day))
        .route("/calendar.ics", get(handle_ics))
        .fallback(|| async { Redirect::temporary("/calendar") })
        .with_state(state)
}

#[derive(Deserialize)]
struct MonthQuery {
    year: Option<i32>,
    month: Option<u32>,
    access: Option<String>,
}

#[derive(Deserialize)]
struct DayQuery {
    year: Option<i32>,
    month: Option<u32>,
    day: u32,
    access: Option<String>,
}

#[derive(Serialize)]
struct MonthView<'a> {
    grid: MonthGrid,
    days: &'a DayBuckets<'a>,
}

/// Missing parts default to the current month.
fn month_window(year: Option<i32>, month: Option<u32>) -> Result<MonthWindow, CalendarError> {
    let today = Utc::now().date_naive();
    MonthWindow::new(
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| today.month()),
    )
}

impl AppState {
    async fn feed(&self) -> anyhow::Result<Arc<Feed>> {
        let key = self.source.to_string();
        if let Some(feed) = self.cache.get(&key) {
            return Ok(feed);
        }

        let feed = feed::load(&self.source).await?;
        Ok(self.cache.insert(key, feed))
    }

    /// Loads the feed and expands the visible events of `window`.
    async fn occurrences(
        &self,
        window: MonthWindow,
        access: Option<&str>,
    ) -> Result<(Arc<Feed>, Vec<Event>), Response> {
        let feed = self.feed().await.map_err(|err| {
            error!("Failed to load feed from {}: {err:#}", self.source);
            (StatusCode::BAD_GATEWAY, "Failed to load event feed").into_response()
        })?;

        let visible = filter_visible(&feed.events, access);
        let occurrences = expand_month(&visible, window);

        Ok((feed, occurrences))
    }
}

fn bad_request(err: CalendarError) -> Response {
    (StatusCode::BAD_REQUEST, err.to_string()).into_response()
}

async fn handle_month(State(state): State<SharedState>, Query(query): Query<MonthQuery>) -> Response {
    let window = match month_window(query.year, query.month) {
        Ok(window) => window,
        Err(err) => return bad_request(err),
    };

    let (feed, occurrences) = match state.occurrences(window, query.access.as_deref()).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };

    let buckets = bucket_by_day(&occurrences, window.year(), window.month());
    let open_days = venues_open_by_month(&feed.venues, window.year(), window.month());
    let grid = MonthGrid::build(window, &buckets, &open_days);

    Json(MonthView {
        grid,
        days: &buckets,
    })
    .into_response()
}

async fn handle_day(State(state): State<SharedState>, Query(query): Query<DayQuery>) -> Response {
    let window = match month_window(query.year, query.month) {
        Ok(window) => window,
        Err(err) => return bad_request(err),
    };

    let (feed, occurrences) = match state.occurrences(window, query.access.as_deref()).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };

    let buckets = bucket_by_day(&occurrences, window.year(), window.month());
    match DayView::select(&buckets, &feed.venues, query.day) {
        Ok(view) => Json(view).into_response(),
        Err(err) => bad_request(err),
    }
}

async fn handle_ics(State(state): State<SharedState>, Query(query): Query<MonthQuery>) -> Response {
    let window = match month_window(query.year, query.month) {
        Ok(window) => window,
        Err(err) => return bad_request(err),
    };

    let (feed, occurrences) = match state.occurrences(window, query.access.as_deref()).await {
        Ok(loaded) => loaded,
        Err(response) => return response,
    };

    (
        [("content-type", "text/calendar")],
        feed.to_ics(&occurrences).to_string(),
    )
        .into_response()
}
