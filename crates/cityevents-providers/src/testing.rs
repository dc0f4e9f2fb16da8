//! In-memory sessions and JSON fixtures for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use cityevents_core::Query;
use serde_json::{Value, json};

use crate::error::{ProviderError, ProviderErrorCode, ProviderResult};
use crate::provider::BoxFuture;
use crate::transport::{HttpSession, JsonReply, JsonRequest, SessionFactory};

pub const TM_URL: &str = "https://tm.test/discovery/v2/events.json";
pub const PHQ_EVENTS_URL: &str = "https://phq.test/v1/events/";
pub const PHQ_PLACES_URL: &str = "https://phq.test/v1/places/";

/// What a scripted session answers to one request.
pub enum Reply {
    Json(Value),
    /// A JSON body sent with the given HTTP status.
    Status(u16, Value),
    Error(ProviderErrorCode),
    /// Never answers.
    Hang,
}

struct Inner {
    routes: Mutex<Vec<(String, VecDeque<Reply>)>>,
    requests: Mutex<Vec<JsonRequest>>,
    opened: AtomicUsize,
    live: AtomicUsize,
}

/// A [`SessionFactory`] replaying canned replies per URL prefix, in order.
#[derive(Clone)]
pub struct ScriptedSessions {
    inner: Arc<Inner>,
}

impl ScriptedSessions {
    pub fn new(routes: Vec<(&str, Vec<Reply>)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(prefix, replies)| (prefix.to_string(), replies.into_iter().collect()))
            .collect();
        Self {
            inner: Arc::new(Inner {
                routes: Mutex::new(routes),
                requests: Mutex::new(Vec::new()),
                opened: AtomicUsize::new(0),
                live: AtomicUsize::new(0),
            }),
        }
    }

    pub fn requests(&self) -> Vec<JsonRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<JsonRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url().starts_with(prefix))
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }

    /// Sessions opened so far.
    pub fn opened(&self) -> usize {
        self.inner.opened.load(Ordering::SeqCst)
    }

    /// Sessions opened and not yet dropped.
    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }
}

impl SessionFactory for ScriptedSessions {
    fn open_session(&self) -> ProviderResult<Box<dyn HttpSession>> {
        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        self.inner.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct ScriptedSession {
    inner: Arc<Inner>,
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.inner.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl HttpSession for ScriptedSession {
    fn get_reply(&self, request: JsonRequest) -> BoxFuture<'_, ProviderResult<JsonReply>> {
        let url = request.url().to_string();
        self.inner.requests.lock().unwrap().push(request);

        let reply = self
            .inner
            .routes
            .lock()
            .unwrap()
            .iter_mut()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .and_then(|(_, replies)| replies.pop_front());

        Box::pin(async move {
            match reply {
                Some(Reply::Json(value)) => Ok(JsonReply::ok(value)),
                Some(Reply::Status(status, value)) => Ok(JsonReply::with_status(status, value)),
                Some(Reply::Error(code)) => Err(ProviderError::new(code, "scripted failure")),
                Some(Reply::Hang) => std::future::pending().await,
                None => Err(ProviderError::internal(format!(
                    "no scripted reply for {}",
                    url
                ))),
            }
        })
    }
}

pub fn sample_query() -> Query {
    Query::new(
        "rome",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        "Italy",
        "IT",
    )
    .unwrap()
}

/// A complete Ticketmaster event item.
pub fn tm_event(name: &str, date: &str) -> Value {
    json!({
        "name": name,
        "dates": {
            "start": { "localDate": date },
            "timezone": "Europe/Rome"
        },
        "_embedded": {
            "venues": [{
                "name": "Auditorium",
                "address": { "line1": "Viale Pietro de Coubertin 30" },
                "location": { "latitude": "41.9288", "longitude": "12.4745" },
                "city": { "name": "Rome" },
                "country": { "name": "Italy" },
                "timezone": "Europe/Rome"
            }]
        }
    })
}

/// A Ticketmaster search page.
pub fn tm_page(total_pages: u64, events: Vec<Value>) -> Value {
    if events.is_empty() {
        return json!({ "page": { "size": 200, "totalPages": total_pages, "number": 0 } });
    }
    json!({
        "_embedded": { "events": events },
        "page": { "size": 200, "totalPages": total_pages, "number": 0 }
    })
}

/// A complete PredictHQ event item.
pub fn phq_event(title: &str, start: &str) -> Value {
    json!({
        "title": title,
        "start": start,
        "end": start,
        "timezone": "Europe/Rome",
        "entities": [{
            "name": "Stadio Olimpico",
            "formatted_address": "Viale dei Gladiatori\n00135 Roma RM\nItaly"
        }],
        "location": [12.4547, 41.9341]
    })
}

/// A PredictHQ events page.
pub fn phq_page(count: u64, next: Option<&str>, results: Vec<Value>) -> Value {
    json!({ "count": count, "next": next, "results": results })
}

/// A PredictHQ places lookup response.
pub fn phq_places(ids: &[&str]) -> Value {
    let results: Vec<Value> = ids.iter().map(|id| json!({ "id": id, "name": "Rome" })).collect();
    json!({ "count": results.len(), "results": results })
}
