/// Catalog types for the Minarets player
mod concert;
mod ids;
mod list;
mod playlist;
mod track;

pub use concert::Concert;
pub use ids::{ArtistId, ConcertId, PlaylistId, TrackId};
pub use list::ListResponse;
pub use playlist::{Playlist, PlaylistSummary};
pub use track::Track;
