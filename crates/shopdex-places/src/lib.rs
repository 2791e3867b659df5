//! Remote places provider gateway.
//!
//! [`GooglePlacesClient`] talks to a Google-Places-style REST API;
//! [`PlacesGateway`] is the seam the search planner depends on, so tests can
//! substitute a scripted provider.

mod client;
mod error;
mod gateway;
mod types;

pub use client::GooglePlacesClient;
pub use error::PlacesError;
pub use gateway::PlacesGateway;
pub use types::{PlaceHit, PlaceProfile};
