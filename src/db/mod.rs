pub mod media;
pub mod postgres;
pub mod profiles;
pub mod redis;
pub mod rooms;
pub mod votes;

pub use media::{MediaCache, PgMediaCache};
pub use postgres::create_pool;
pub use profiles::{PgProfileStore, ProfileStore};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use rooms::{PgRoomStore, RoomStore};
pub use votes::{PgVoteLedger, VoteLedger};
