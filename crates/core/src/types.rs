/// All villa identities are 64-bit; the PostgreSQL backend stores them as BIGSERIAL.
pub type DbId = i64;
