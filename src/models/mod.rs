mod media;
mod profile;
mod room;
mod tmdb;
mod vote;

pub use media::{MediaItem, MediaKind};
pub use profile::{InvitePreference, Profile};
pub use room::{RoomStatus, WatchRoom};
pub use tmdb::{TmdbMovie, TmdbSearchPage};
pub use vote::VoteValue;
