use lazy_static::lazy_static;
use regex::Regex;
use sqlx::{migrate::MigrateDatabase, sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow}, Sqlite, Row};
use crate::models::{VoterRecord, VotingStatus};

lazy_static! {
    static ref LIKE_WILDCARDS: Regex = Regex::new(r"[%_\\]").unwrap();
}

// Columns the free-text search looks at
const SEARCH_COLUMNS: [&str; 6] = ["name", "relative_name", "voter_card_no", "mobile", "address", "booth_id"];

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(db_url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let in_memory = db_url.contains(":memory:");

        // Create database if it doesn't exist
        if !in_memory && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        // Every connection to an in-memory database is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    // Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS voters (
                id INTEGER PRIMARY KEY,
                voter_card_no TEXT,
                name TEXT,
                relative_name TEXT,
                mobile TEXT,
                address TEXT,
                booth_id TEXT,
                voting_status TEXT,
                surveyed_at TEXT,
                transfer_flag TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_voters_booth ON voters (booth_id);")
            .execute(pool)
            .await?;

        Ok(())
    }

    // One page of voters plus the total number of matching rows
    pub async fn list_voters(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<(Vec<VoterRecord>, u64), Box<dyn std::error::Error + Send + Sync>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let where_clause = if pattern.is_some() {
            let conditions: Vec<String> = SEARCH_COLUMNS
                .iter()
                .map(|column| format!("LOWER(COALESCE({}, '')) LIKE ? ESCAPE '\\'", column))
                .collect();
            format!("WHERE {}", conditions.join(" OR "))
        } else {
            String::new()
        };

        let count_sql = format!("SELECT COUNT(*) AS total FROM voters {}", where_clause);
        let mut count_query = sqlx::query(&count_sql);
        if let Some(pattern) = &pattern {
            for _ in SEARCH_COLUMNS {
                count_query = count_query.bind(pattern);
            }
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.get("total");

        let page_sql = format!(
            r#"
            SELECT id, voter_card_no, name, relative_name, mobile, address, booth_id, voting_status, surveyed_at, transfer_flag
            FROM voters
            {}
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
            where_clause
        );
        // u32 page times u32 limit can exceed i64; SQLite returns no rows either way.
        let offset = (page.max(1) as i64 - 1).saturating_mul(limit as i64);
        let mut page_query = sqlx::query(&page_sql);
        if let Some(pattern) = &pattern {
            for _ in SEARCH_COLUMNS {
                page_query = page_query.bind(pattern);
            }
        }
        let voters = page_query
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(voter_from_row)
            .collect();

        Ok((voters, total.max(0) as u64))
    }
}

// Escape LIKE wildcards so the search is a plain substring match
fn like_pattern(term: &str) -> String {
    format!("%{}%", LIKE_WILDCARDS.replace_all(&term.to_lowercase(), r"\$0"))
}

fn voter_from_row(row: &SqliteRow) -> VoterRecord {
    let surveyed_at = text_column(row, "surveyed_at");
    VoterRecord {
        id: row.try_get::<i64, _>("id").unwrap_or_default(),
        voter_card_no: text_column(row, "voter_card_no").unwrap_or_default(),
        name: text_column(row, "name").unwrap_or_default(),
        relative_name: text_column(row, "relative_name").unwrap_or_default(),
        mobile: text_column(row, "mobile").unwrap_or_default(),
        address: text_column(row, "address").unwrap_or_default(),
        booth_id: text_column(row, "booth_id").unwrap_or_default(),
        voting_status: VotingStatus::from(text_column(row, "voting_status")),
        surveyed_at,
        transfer_flag: text_column(row, "transfer_flag").unwrap_or_default(),
    }
}

// SQLite columns are loosely typed; numbers in a text column come back stringified
fn text_column(row: &SqliteRow, column: &str) -> Option<String> {
    if let Ok(value) = row.try_get::<Option<String>, _>(column) {
        return value;
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
        return value.map(|v| v.to_string());
    }
    row.try_get::<Option<f64>, _>(column)
        .ok()
        .flatten()
        .map(|v| v.to_string())
}
