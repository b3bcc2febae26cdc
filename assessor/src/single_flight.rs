use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

/// How a caller obtained its value from [`SingleFlight::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flight {
    /// This caller ran the work.
    Led,
    /// This caller received the result of a flight already in progress.
    Joined,
}

/// Collapses concurrent work for the same key into one execution.
///
/// The first caller for a key runs the work. Callers arriving while it is in
/// flight wait for that result instead of running their own, so a failure is
/// delivered to everyone at once. The key is released as soon as the flight
/// lands; the next caller starts a new one.
pub struct SingleFlight<T> {
    flights: Arc<Mutex<HashMap<String, broadcast::Sender<T>>>>,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

enum Role<T> {
    Leader(broadcast::Sender<T>),
    Waiter(broadcast::Receiver<T>),
}

/// Releases the key even if the leader is dropped mid-flight.
struct Release<'a, T> {
    flights: &'a Mutex<HashMap<String, broadcast::Sender<T>>>,
    key: &'a str,
}

impl<T> Drop for Release<'_, T> {
    fn drop(&mut self) {
        lock(self.flights).remove(self.key);
    }
}

fn lock<T>(
    flights: &Mutex<HashMap<String, broadcast::Sender<T>>>,
) -> MutexGuard<'_, HashMap<String, broadcast::Sender<T>>> {
    flights.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` for `key`, or share the result of the flight already running.
    ///
    /// If the leader is cancelled before it lands, its waiters run `f`
    /// themselves.
    pub async fn run<F, Fut>(&self, key: &str, f: F) -> (T, Flight)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let role = {
            let mut flights = lock(&self.flights);
            match flights.get(key) {
                Some(tx) => Role::Waiter(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(1);
                    flights.insert(key.to_string(), tx.clone());
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Leader(tx) => {
                let release = Release {
                    flights: &self.flights,
                    key,
                };
                let value = f().await;
                drop(release);
                // No receivers just means nobody joined.
                let _ = tx.send(value.clone());
                (value, Flight::Led)
            }
            Role::Waiter(mut rx) => match rx.recv().await {
                Ok(value) => (value, Flight::Joined),
                Err(_) => (f().await, Flight::Led),
            },
        }
    }

    /// Number of keys with a flight in progress.
    pub fn active_keys(&self) -> usize {
        lock(&self.flights).len()
    }
}
