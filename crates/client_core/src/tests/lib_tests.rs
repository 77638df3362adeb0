use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
pub(crate) struct FixtureOptions {
    pub fail_films: bool,
    pub paginate: bool,
    pub film_delays: HashMap<u32, Duration>,
    pub person_delays: HashMap<u32, Duration>,
    pub failing_people: Vec<u32>,
    pub malformed_film: Option<u32>,
}

#[derive(Clone)]
struct FixtureState {
    base_url: String,
    options: Arc<FixtureOptions>,
    hits: Arc<Mutex<Vec<String>>>,
}

pub(crate) struct SwapiFixture {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl SwapiFixture {
    pub fn film_url(&self, id: u32) -> String {
        format!("{}films/{id}/", self.base_url)
    }

    pub fn person_url(&self, id: u32) -> String {
        format!("{}people/{id}/", self.base_url)
    }

    pub async fn hits(&self) -> Vec<String> {
        self.hits.lock().await.clone()
    }
}

fn film_json(base: &str, id: u32) -> Value {
    let (episode, title, release_date, people): (u32, &str, &str, &[u32]) = match id {
        1 => (4, "A New Hope", "1977-05-25", &[1, 2, 3]),
        2 => (5, "The Empire Strikes Back", "1980-05-17", &[1, 4]),
        _ => (6, "Return of the Jedi", "1983-05-25", &[1, 5, 6]),
    };
    json!({
        "title": title,
        "episode_id": episode,
        "opening_crawl": format!("{title} opening crawl"),
        "director": "George Lucas",
        "producer": "Gary Kurtz, Rick McCallum",
        "release_date": release_date,
        "characters": people
            .iter()
            .map(|person| format!("{base}people/{person}/"))
            .collect::<Vec<_>>(),
        "planets": [],
        "url": format!("{base}films/{id}/"),
    })
}

fn person_json(base: &str, id: u32) -> Option<Value> {
    let (name, gender, height) = match id {
        1 => ("Luke Skywalker", "male", "172"),
        2 => ("C-3PO", "n/a", "167"),
        3 => ("R2-D2", "n/a", "96"),
        4 => ("Yoda", "male", "66"),
        5 => ("Wicket Systri Warrick", "male", "88"),
        6 => ("Arvel Crynyd", "male", "unknown"),
        _ => return None,
    };
    Some(json!({
        "name": name,
        "gender": gender,
        "height": height,
        "mass": "unknown",
        "url": format!("{base}people/{id}/"),
    }))
}

async fn list_films(
    State(state): State<FixtureState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    state.hits.lock().await.push("films".to_string());
    if state.options.fail_films {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let base = &state.base_url;
    if !state.options.paginate {
        return Ok(Json(json!({
            "count": 3,
            "next": null,
            "previous": null,
            "results": [film_json(base, 3), film_json(base, 1), film_json(base, 2)],
        })));
    }
    if query.get("page").map(String::as_str) == Some("2") {
        return Ok(Json(json!({
            "count": 3,
            "next": null,
            "previous": format!("{base}films/?page=1"),
            "results": [film_json(base, 2)],
        })));
    }
    Ok(Json(json!({
        "count": 3,
        "next": format!("{base}films/?page=2"),
        "previous": null,
        "results": [film_json(base, 3), film_json(base, 1)],
    })))
}

async fn film_detail(
    State(state): State<FixtureState>,
    Path(id): Path<u32>,
) -> Result<Json<Value>, StatusCode> {
    state.hits.lock().await.push(format!("film/{id}"));
    if let Some(delay) = state.options.film_delays.get(&id) {
        tokio::time::sleep(*delay).await;
    }
    if !(1..=3).contains(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if state.options.malformed_film == Some(id) {
        return Ok(Json(json!({ "title": "missing everything else" })));
    }
    Ok(Json(film_json(&state.base_url, id)))
}

async fn person(
    State(state): State<FixtureState>,
    Path(id): Path<u32>,
) -> Result<Json<Value>, StatusCode> {
    state.hits.lock().await.push(format!("person/{id}"));
    if let Some(delay) = state.options.person_delays.get(&id) {
        tokio::time::sleep(*delay).await;
    }
    if state.options.failing_people.contains(&id) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    person_json(&state.base_url, id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub(crate) async fn spawn_swapi_server(options: FixtureOptions) -> SwapiFixture {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    let base_url = format!("http://{addr}/api/");
    let hits = Arc::new(Mutex::new(Vec::new()));
    let state = FixtureState {
        base_url: base_url.clone(),
        options: Arc::new(options),
        hits: Arc::clone(&hits),
    };
    let app = Router::new()
        .route("/api/films/", get(list_films))
        .route("/api/films/:id/", get(film_detail))
        .route("/api/people/:id/", get(person))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    SwapiFixture { base_url, hits }
}

#[test]
fn base_url_gets_trailing_slash() {
    let url = parse_base_url("https://swapi.dev/api").expect("parse");
    assert_eq!(url.as_str(), "https://swapi.dev/api/");
    let client = SwapiClient::new(" https://swapi.dev/api/ ").expect("client");
    assert_eq!(
        client.films_url().expect("films url").as_str(),
        "https://swapi.dev/api/films/"
    );
}

#[test]
fn base_url_must_be_http() {
    assert!(matches!(
        parse_base_url("ftp://swapi.dev/api/"),
        Err(FetchError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
    assert!(matches!(
        parse_base_url("not a url"),
        Err(FetchError::InvalidUrl(_))
    ));
}

#[test]
fn fetch_error_collapses_to_stage_failure() {
    let failure = FetchError::Status {
        url: "http://x/films/".to_string(),
        status: 503,
    }
    .into_failure(FailedStage::Films);
    assert_eq!(failure.stage, FailedStage::Films);
    assert!(failure.message.contains("503"));
}

#[tokio::test]
async fn lists_films_in_api_order() {
    let fixture = spawn_swapi_server(FixtureOptions::default()).await;
    let client = SwapiClient::new(&fixture.base_url).expect("client");

    let films = client.list_films().await.expect("list films");
    let episodes: Vec<u32> = films.iter().map(|f| f.episode_id.0).collect();
    assert_eq!(episodes, vec![6, 4, 5]);
    assert_eq!(films[1].url, fixture.film_url(1));
}

#[tokio::test]
async fn follows_next_links_when_listing_films() {
    let fixture = spawn_swapi_server(FixtureOptions {
        paginate: true,
        ..FixtureOptions::default()
    })
    .await;
    let client = SwapiClient::new(&fixture.base_url).expect("client");

    let films = client.list_films().await.expect("list films");
    assert_eq!(films.len(), 3);
    assert_eq!(fixture.hits().await, vec!["films", "films"]);
}

#[tokio::test]
async fn film_list_server_error_is_a_status_error() {
    let fixture = spawn_swapi_server(FixtureOptions {
        fail_films: true,
        ..FixtureOptions::default()
    })
    .await;
    let client = SwapiClient::new(&fixture.base_url).expect("client");

    let err = client.list_films().await.expect_err("should fail");
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn fetches_film_detail_by_url() {
    let fixture = spawn_swapi_server(FixtureOptions::default()).await;
    let client = SwapiClient::new(&fixture.base_url).expect("client");

    let film = client.fetch_film(&fixture.film_url(2)).await.expect("detail");
    assert_eq!(film.title, "The Empire Strikes Back");
    assert_eq!(film.characters, vec![fixture.person_url(1), fixture.person_url(4)]);
}

#[tokio::test]
async fn malformed_film_detail_is_a_decode_error() {
    let fixture = spawn_swapi_server(FixtureOptions {
        malformed_film: Some(1),
        ..FixtureOptions::default()
    })
    .await;
    let client = SwapiClient::new(&fixture.base_url).expect("client");

    let err = client
        .fetch_film(&fixture.film_url(1))
        .await
        .expect_err("should fail");
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let client = SwapiClient::new(&format!("http://{addr}/api/")).expect("client");
    let err = client.list_films().await.expect_err("should fail");
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn character_join_preserves_url_order() {
    let fixture = spawn_swapi_server(FixtureOptions {
        person_delays: HashMap::from([(1, Duration::from_millis(100))]),
        ..FixtureOptions::default()
    })
    .await;
    let client = SwapiClient::new(&fixture.base_url).expect("client");
    let urls = vec![fixture.person_url(1), fixture.person_url(2), fixture.person_url(6)];

    let characters = client.fetch_characters(&urls).await.expect("characters");
    let names: Vec<&str> = characters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Luke Skywalker", "C-3PO", "Arvel Crynyd"]);
    assert_eq!(characters[2].height, "unknown");
}

#[tokio::test]
async fn one_failing_character_fails_the_join() {
    let fixture = spawn_swapi_server(FixtureOptions {
        failing_people: vec![3],
        ..FixtureOptions::default()
    })
    .await;
    let client = SwapiClient::new(&fixture.base_url).expect("client");
    let urls = vec![fixture.person_url(1), fixture.person_url(3)];

    let err = client.fetch_characters(&urls).await.expect_err("join fails");
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn empty_character_list_joins_to_empty() {
    let client = SwapiClient::new("http://127.0.0.1:9/api/").expect("client");
    let characters = client.fetch_characters(&[]).await.expect("empty join");
    assert!(characters.is_empty());
}
