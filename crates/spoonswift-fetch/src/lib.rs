pub mod attempt;
pub mod client;
pub mod engine;
pub mod error;
pub mod relay;
pub mod resource;
pub mod validate;

pub use attempt::{AttemptOutcome, FetchAttempt};
pub use client::TimedFetch;
pub use engine::{ChainSuccess, FetchEngine};
pub use error::{CycleError, FetchError, TransportError, ValidationFailure};
pub use relay::{RelayChain, RelayDescriptor, RelayMode};
pub use resource::{fetch_resource, RequestState, Resource, Status};
pub use validate::{
    ListingData, ListingValidator, MenuData, MenuValidator, SearchData, SearchValidator,
    SuggestionsData, SuggestionsValidator, Validator,
};
