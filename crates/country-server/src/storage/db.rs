//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, DurationRound, SecondsFormat, Utc};
use country_core::ports::CountryStore;
use country_core::{
    name_key, BatchReport, CountryError, CountryFilter, CountryRecord, CountrySort, NewCountry,
};
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, currency_code, \
     exchange_rate, estimated_gdp, flag_url, last_refreshed_at";

/// How long a writer waits for another batch to release the write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);

        // Create parent directory if needed
        if let Some(parent) = database_file(database_url)
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
        {
            tracing::info!("Creating parent directory: {}", parent.display());
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_url)
            })?;

        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Private in-memory database. A single long-lived connection keeps the
    /// data alive for the lifetime of the pool.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::run_migrations(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS countries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL UNIQUE,
                capital TEXT,
                region TEXT,
                population INTEGER NOT NULL CHECK (population >= 0),
                currency_code TEXT,
                exchange_rate REAL,
                estimated_gdp REAL,
                flag_url TEXT,
                last_refreshed_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Single row holding the latest batch timestamp ever issued
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS refresh_clock (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                last_issued_at TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_countries_region ON countries (region COLLATE NOCASE)",
            "CREATE INDEX IF NOT EXISTS idx_countries_currency ON countries (currency_code COLLATE NOCASE)",
            "CREATE INDEX IF NOT EXISTS idx_countries_gdp ON countries (estimated_gdp)",
        ] {
            sqlx::query(statement).execute(pool).await?;
        }

        Ok(())
    }
}

/// File path behind a `sqlite:` URL, `None` for in-memory databases
fn database_file(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path.starts_with(":memory:") {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Fixed-width UTC text so that `MAX()` over the column is chronological
fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str) -> country_core::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| CountryError::Storage(format!("bad timestamp {:?}: {}", raw, e)))
}

fn storage_err(e: sqlx::Error) -> CountryError {
    CountryError::Storage(e.to_string())
}

/// Constraint failures caused by one record's values
fn is_record_rejection(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => matches!(
            db.kind(),
            ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
        ),
        _ => false,
    }
}

/// `now` at microsecond precision, or 1µs past `previous` if that is not earlier
fn next_timestamp(now: DateTime<Utc>, previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = now
        .duration_trunc(ChronoDuration::microseconds(1))
        .unwrap_or(now);

    match previous {
        Some(previous) if previous >= now => previous + ChronoDuration::microseconds(1),
        _ => now,
    }
}

fn order_clause(sort: CountrySort) -> &'static str {
    // absent GDP always trails, whichever direction is requested
    match sort {
        CountrySort::GdpDesc => "estimated_gdp IS NULL, estimated_gdp DESC, name_key",
        CountrySort::GdpAsc => "estimated_gdp IS NULL, estimated_gdp ASC, name_key",
        CountrySort::NameAsc => "name_key ASC",
        CountrySort::NameDesc => "name_key DESC",
        CountrySort::PopulationDesc => "population DESC, name_key",
        CountrySort::PopulationAsc => "population ASC, name_key",
    }
}

/// Upsert on an existing connection or transaction
async fn upsert_on(
    conn: &mut SqliteConnection,
    country: &NewCountry,
    refreshed_at: DateTime<Utc>,
) -> sqlx::Result<(CountryRow, bool)> {
    let key = country.key();

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM countries WHERE name_key = ?1")
        .bind(&key)
        .fetch_optional(&mut *conn)
        .await?;

    let row: CountryRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO countries (name, name_key, capital, region, population, currency_code,
                               exchange_rate, estimated_gdp, flag_url, last_refreshed_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(name_key) DO UPDATE SET
            name = excluded.name,
            capital = excluded.capital,
            region = excluded.region,
            population = excluded.population,
            currency_code = excluded.currency_code,
            exchange_rate = excluded.exchange_rate,
            estimated_gdp = excluded.estimated_gdp,
            flag_url = excluded.flag_url,
            last_refreshed_at = excluded.last_refreshed_at
        RETURNING {}
        "#,
        COUNTRY_COLUMNS
    ))
    .bind(&country.name)
    .bind(&key)
    .bind(&country.capital)
    .bind(&country.region)
    .bind(country.population)
    .bind(&country.currency_code)
    .bind(country.exchange_rate)
    .bind(country.estimated_gdp)
    .bind(&country.flag_url)
    .bind(encode_timestamp(refreshed_at))
    .fetch_one(&mut *conn)
    .await?;

    Ok((row, existing.is_none()))
}

#[async_trait]
impl CountryStore for Database {
    async fn upsert_by_name(
        &self,
        country: &NewCountry,
        refreshed_at: DateTime<Utc>,
    ) -> country_core::Result<(CountryRecord, bool)> {
        let mut conn = self.pool.acquire().await.map_err(storage_err)?;
        let (row, created) = upsert_on(&mut conn, country, refreshed_at)
            .await
            .map_err(storage_err)?;
        Ok((row.try_into()?, created))
    }

    async fn upsert_batch(
        &self,
        countries: &[NewCountry],
        now: DateTime<Utc>,
    ) -> country_core::Result<BatchReport> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        // the first statement writes, so the write lock is held before any read
        sqlx::query(
            "INSERT INTO refresh_clock (id, last_issued_at) VALUES (1, NULL) \
             ON CONFLICT(id) DO NOTHING",
        )
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        let issued: Option<String> =
            sqlx::query_scalar("SELECT last_issued_at FROM refresh_clock WHERE id = 1")
                .fetch_one(&mut *tx)
                .await
                .map_err(storage_err)?;
        let stored: Option<String> =
            sqlx::query_scalar("SELECT MAX(last_refreshed_at) FROM countries")
                .fetch_one(&mut *tx)
                .await
                .map_err(storage_err)?;
        let previous = issued
            .into_iter()
            .chain(stored)
            .max()
            .as_deref()
            .map(decode_timestamp)
            .transpose()?;

        let refreshed_at = next_timestamp(now, previous);
        sqlx::query("UPDATE refresh_clock SET last_issued_at = ?1 WHERE id = 1")
            .bind(encode_timestamp(refreshed_at))
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        let mut report = BatchReport {
            refreshed_at,
            created: 0,
            updated: 0,
            failures: Vec::new(),
        };

        for country in countries {
            // a rejected statement only rolls back itself, the transaction stays usable
            match upsert_on(&mut *tx, country, refreshed_at).await {
                Ok((_, true)) => report.created += 1,
                Ok((_, false)) => report.updated += 1,
                Err(e) if is_record_rejection(&e) => {
                    report.failures.push((country.name.clone(), storage_err(e)))
                }
                Err(e) => {
                    tracing::error!("Batch upsert aborted at {}: {}", country.name, e);
                    return Err(storage_err(e));
                }
            }
        }

        tx.commit().await.map_err(storage_err)?;

        tracing::debug!(
            "Batch upsert committed at {}: created={}, updated={}, failed={}",
            refreshed_at,
            report.created,
            report.updated,
            report.failures.len()
        );

        Ok(report)
    }

    async fn get_by_name(&self, name: &str) -> country_core::Result<Option<CountryRecord>> {
        let row: Option<CountryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM countries WHERE name_key = ?1",
            COUNTRY_COLUMNS
        ))
        .bind(name_key(name))
        .fetch_optional(&*self.pool)
        .await
        .map_err(storage_err)?;

        row.map(CountryRecord::try_from).transpose()
    }

    async fn list_all(
        &self,
        filter: &CountryFilter,
        sort: CountrySort,
    ) -> country_core::Result<Vec<CountryRecord>> {
        let rows: Vec<CountryRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM countries
            WHERE (?1 IS NULL OR region = ?1 COLLATE NOCASE)
              AND (?2 IS NULL OR currency_code = ?2 COLLATE NOCASE)
            ORDER BY {}
            "#,
            COUNTRY_COLUMNS,
            order_clause(sort)
        ))
        .bind(&filter.region)
        .bind(&filter.currency)
        .fetch_all(&*self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(CountryRecord::try_from).collect()
    }

    async fn count(&self) -> country_core::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(&*self.pool)
            .await
            .map_err(storage_err)
    }

    async fn top_by_gdp(&self, limit: u32) -> country_core::Result<Vec<CountryRecord>> {
        let rows: Vec<CountryRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM countries
            WHERE estimated_gdp IS NOT NULL
            ORDER BY estimated_gdp DESC, name_key
            LIMIT ?1
            "#,
            COUNTRY_COLUMNS
        ))
        .bind(i64::from(limit))
        .fetch_all(&*self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(CountryRecord::try_from).collect()
    }

    async fn most_recent_refresh(&self) -> country_core::Result<Option<DateTime<Utc>>> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(last_refreshed_at) FROM countries")
            .fetch_one(&*self.pool)
            .await
            .map_err(storage_err)?;

        latest.as_deref().map(decode_timestamp).transpose()
    }

    async fn delete(&self, name: &str) -> country_core::Result<bool> {
        let result = sqlx::query("DELETE FROM countries WHERE name_key = ?1")
            .bind(name_key(name))
            .execute(&*self.pool)
            .await
            .map_err(storage_err)?;

        Ok(result.rows_affected() > 0)
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct CountryRow {
    id: i64,
    name: String,
    capital: Option<String>,
    region: Option<String>,
    population: i64,
    currency_code: Option<String>,
    exchange_rate: Option<f64>,
    estimated_gdp: Option<f64>,
    flag_url: Option<String>,
    last_refreshed_at: String,
}

impl TryFrom<CountryRow> for CountryRecord {
    type Error = CountryError;

    fn try_from(r: CountryRow) -> country_core::Result<Self> {
        Ok(CountryRecord {
            last_refreshed_at: decode_timestamp(&r.last_refreshed_at)?,
            id: r.id,
            name: r.name,
            capital: r.capital,
            region: r.region,
            population: r.population,
            currency_code: r.currency_code,
            exchange_rate: r.exchange_rate,
            estimated_gdp: r.estimated_gdp,
            flag_url: r.flag_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn country(name: &str, region: &str, population: i64, code: &str, gdp: Option<f64>) -> NewCountry {
        NewCountry {
            name: name.to_string(),
            capital: None,
            region: Some(region.to_string()),
            population,
            currency_code: Some(code.to_string()),
            exchange_rate: gdp.map(|_| 1.0),
            estimated_gdp: gdp,
            flag_url: None,
        }
    }

    async fn seeded() -> Database {
        let db = Database::in_memory().await.unwrap();
        let now = Utc::now();
        for c in [
            country("Nigeria", "Africa", 206_139_589, "NGN", Some(300.0)),
            country("Ghana", "Africa", 31_072_940, "GHS", Some(500.0)),
            country("France", "Europe", 67_391_582, "EUR", None),
            country("Germany", "Europe", 83_240_525, "EUR", Some(900.0)),
            country("Bouvet Island", "Antarctic", 0, "NOK", None),
        ] {
            db.upsert_by_name(&c, now).await.unwrap();
        }
        db
    }

    fn names(records: &[CountryRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates_case_insensitively() {
        let db = Database::in_memory().await.unwrap();
        let first = Utc::now();

        let (created, was_created) = db
            .upsert_by_name(&country("Nigeria", "Africa", 100, "NGN", Some(1.0)), first)
            .await
            .unwrap();
        assert!(was_created);

        let later = first + Duration::seconds(5);
        let (updated, was_created) = db
            .upsert_by_name(&country("  NIGERIA ", "West Africa", 200, "NGN", None), later)
            .await
            .unwrap();
        assert!(!was_created);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.population, 200);
        assert_eq!(updated.region.as_deref(), Some("West Africa"));
        assert_eq!(updated.estimated_gdp, None);
        assert!(updated.last_refreshed_at > created.last_refreshed_at);
        assert_eq!(db.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_name_ignores_case() {
        let db = seeded().await;
        let found = db.get_by_name("gHaNa").await.unwrap().unwrap();
        assert_eq!(found.name, "Ghana");
        assert!(db.get_by_name("Wakanda").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_are_case_insensitive() {
        let db = seeded().await;

        let africa = db
            .list_all(
                &CountryFilter {
                    region: Some("africa".to_string()),
                    currency: None,
                },
                CountrySort::NameAsc,
            )
            .await
            .unwrap();
        assert_eq!(names(&africa), vec!["Ghana", "Nigeria"]);

        let euro = db
            .list_all(
                &CountryFilter {
                    region: Some("EUROPE".to_string()),
                    currency: Some("eur".to_string()),
                },
                CountrySort::NameDesc,
            )
            .await
            .unwrap();
        assert_eq!(names(&euro), vec!["Germany", "France"]);
    }

    #[tokio::test]
    async fn test_gdp_sorts_put_missing_values_last() {
        let db = seeded().await;

        let desc = db
            .list_all(&CountryFilter::default(), CountrySort::GdpDesc)
            .await
            .unwrap();
        assert_eq!(
            names(&desc),
            vec!["Germany", "Ghana", "Nigeria", "Bouvet Island", "France"]
        );
        let gdps: Vec<f64> = desc.iter().filter_map(|r| r.estimated_gdp).collect();
        assert!(gdps.windows(2).all(|w| w[0] >= w[1]));

        let asc = db
            .list_all(&CountryFilter::default(), CountrySort::GdpAsc)
            .await
            .unwrap();
        assert_eq!(
            names(&asc),
            vec!["Nigeria", "Ghana", "Germany", "Bouvet Island", "France"]
        );
    }

    #[tokio::test]
    async fn test_population_sort() {
        let db = seeded().await;
        let desc = db
            .list_all(&CountryFilter::default(), CountrySort::PopulationDesc)
            .await
            .unwrap();
        assert_eq!(desc[0].name, "Nigeria");
        assert_eq!(desc.last().unwrap().name, "Bouvet Island");
    }

    #[tokio::test]
    async fn test_top_by_gdp_skips_missing_and_limits() {
        let db = seeded().await;
        let top = db.top_by_gdp(2).await.unwrap();
        assert_eq!(names(&top), vec!["Germany", "Ghana"]);

        let all = db.top_by_gdp(10).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_most_recent_refresh() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.most_recent_refresh().await.unwrap(), None);

        let early = Utc::now() - Duration::hours(1);
        let late = Utc::now();
        db.upsert_by_name(&country("A", "X", 1, "AAA", None), late)
            .await
            .unwrap();
        db.upsert_by_name(&country("B", "X", 1, "BBB", None), early)
            .await
            .unwrap();

        let latest = db.most_recent_refresh().await.unwrap().unwrap();
        assert_eq!(latest.timestamp_micros(), late.timestamp_micros());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = seeded().await;
        assert!(db.delete("FRANCE").await.unwrap());
        assert!(db.get_by_name("France").await.unwrap().is_none());
        assert!(!db.delete("France").await.unwrap());
        assert_eq!(db.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_batch_skips_rejected_rows_and_commits_the_rest() {
        let db = Database::in_memory().await.unwrap();
        let batch = vec![
            country("Ghana", "Africa", 10, "GHS", None),
            // violates the population CHECK constraint
            country("Broken", "Nowhere", -5, "XXX", None),
            country("GHANA", "Africa", 20, "GHS", None),
            country("Togo", "Africa", 30, "XOF", None),
        ];

        let report = db.upsert_batch(&batch, Utc::now()).await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.updated, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "Broken");

        assert_eq!(db.count().await.unwrap(), 2);
        let ghana = db.get_by_name("ghana").await.unwrap().unwrap();
        assert_eq!(ghana.population, 20);
    }

    #[tokio::test]
    async fn test_batch_timestamps_never_go_backwards() {
        let db = Database::in_memory().await.unwrap();
        let batch = vec![country("Ghana", "Africa", 10, "GHS", None)];
        let now = Utc::now();

        let first = db.upsert_batch(&batch, now).await.unwrap();
        let second = db
            .upsert_batch(&batch, now - Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(
            second.refreshed_at,
            first.refreshed_at + Duration::microseconds(1)
        );
        let ghana = db.get_by_name("Ghana").await.unwrap().unwrap();
        assert_eq!(ghana.last_refreshed_at, second.refreshed_at);

        // the clock survives deleting every stamped record
        assert!(db.delete("Ghana").await.unwrap());
        let third = db
            .upsert_batch(&batch, now - Duration::hours(2))
            .await
            .unwrap();
        assert!(third.refreshed_at > second.refreshed_at);
    }

    #[test]
    fn test_next_timestamp() {
        let now = DateTime::parse_from_rfc3339("2025-10-22T18:00:00.123456789Z")
            .unwrap()
            .with_timezone(&Utc);
        let truncated = DateTime::parse_from_rfc3339("2025-10-22T18:00:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(next_timestamp(now, None), truncated);
        assert_eq!(
            next_timestamp(now, Some(truncated - Duration::seconds(1))),
            truncated
        );
        assert_eq!(
            next_timestamp(now, Some(truncated)),
            truncated + Duration::microseconds(1)
        );
    }

    #[tokio::test]
    async fn test_batch_aborts_on_storage_failure() {
        let db = Database::in_memory().await.unwrap();
        sqlx::query("DROP TABLE countries")
            .execute(&*db.pool)
            .await
            .unwrap();

        let batch = vec![country("Ghana", "Africa", 10, "GHS", None)];
        let err = db.upsert_batch(&batch, Utc::now()).await.unwrap_err();
        assert!(matches!(err, CountryError::Storage(_)), "{err}");

        let issued: Option<String> =
            sqlx::query_scalar("SELECT last_issued_at FROM refresh_clock WHERE id = 1")
                .fetch_optional(&*db.pool)
                .await
                .unwrap()
                .flatten();
        assert_eq!(issued, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_batches_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("countries.db").display());
        let db = Arc::new(Database::new(&url).await.unwrap());

        let batch: Vec<NewCountry> = (0..2000)
            .map(|i| country(&format!("Country {i}"), "Somewhere", i, "XXX", None))
            .collect();
        let batch = Arc::new(batch);

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let db = db.clone();
                let batch = batch.clone();
                tokio::spawn(async move { db.upsert_batch(&batch, Utc::now()).await })
            })
            .collect();

        let mut reports = Vec::new();
        for handle in handles {
            let report = handle.await.unwrap().unwrap();
            assert!(report.failures.is_empty());
            assert_eq!(report.created + report.updated, 2000);
            reports.push(report);
        }
        reports.sort_by_key(|r| r.refreshed_at);

        assert_eq!(reports[0].created, 2000);
        assert_eq!(reports[1].updated, 2000);
        assert!(reports[1].refreshed_at > reports[0].refreshed_at);
        assert_eq!(db.count().await.unwrap(), 2000);
        assert_eq!(
            db.most_recent_refresh().await.unwrap(),
            Some(reports[1].refreshed_at)
        );
    }

    #[test]
    fn test_database_file_from_url() {
        assert_eq!(
            database_file("sqlite://data/countries.db"),
            Some(PathBuf::from("data/countries.db"))
        );
        assert_eq!(
            database_file("sqlite:/var/lib/cc/c.db?mode=rwc"),
            Some(PathBuf::from("/var/lib/cc/c.db"))
        );
        assert_eq!(database_file("sqlite::memory:"), None);
    }

    #[test]
    fn test_timestamp_encoding_is_fixed_width() {
        let ts = DateTime::parse_from_rfc3339("2025-10-22T18:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(encode_timestamp(ts), "2025-10-22T18:00:00.000000Z");
        assert_eq!(decode_timestamp(&encode_timestamp(ts)).unwrap(), ts);
    }
}
