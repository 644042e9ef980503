//! Surf session records and the session form draft.
//!
//! [`SurfSession`] is the read model returned by the external API. Its
//! deserialiser tolerates the shapes the API has been observed to emit, so a
//! single odd record never poisons a whole list. [`SessionDraft`] captures
//! form input and validates it before anything is sent upstream.

mod draft;
mod lenient;
mod record;

pub use draft::{SessionDraft, SessionDraftError, SessionUpdate, ValidatedSession};
pub use lenient::parse_calendar_date;
pub(crate) use lenient::optional_number;
pub use record::{
    MetReading, ParseSwellSlotError, Participant, SurfSession, SwellComponent, SwellComponents,
    SwellSlot, SwellSnapshot, TideReading,
};
