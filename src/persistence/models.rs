//! Database models for articles and the conviction meter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored row from the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Article {
    /// Auto-increment row ID.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// Body text; also the input to the background AI analysis.
    pub content: String,
    /// Language tag as supplied by the author (e.g. `"ja"`).
    pub language: String,
    /// Free-form author name.
    pub author: String,
    /// Per-article conviction tally.
    pub conviction_count: i64,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a new article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Language tag.
    pub language: String,
    /// Author name.
    pub author: String,
}

/// The single row of the `conviction_meters` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ConvictionMeter {
    /// Always `1`; the meter is site-wide.
    pub id: i64,
    /// Stored count.
    pub count: i64,
    /// Time of the last stored increment.
    pub last_hit: Option<DateTime<Utc>>,
}

/// Primary key of the site-wide meter row.
pub const CONVICTION_METER_ID: i64 = 1;
