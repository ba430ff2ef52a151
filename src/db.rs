use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::catalog;
use crate::models::{ActivityReport, RabProposal, SupervisionItem, SupervisionRecord};
use crate::scoring::Aggregate;
use crate::workflow::{RabStatus, ReviewStatus};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unknown indicator {category_number}.{indicator_number}")]
    UnknownIndicator {
        category_number: i32,
        indicator_number: i32,
    },
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let teachers = vec![
        (
            Uuid::parse_str("8a1f4c2e-6d3b-4f9a-b0c5-1e2d7a8b9c0d")?,
            "Ust. Fauzan Hakim",
            "fauzan.hakim@alhikmah.sch.id",
            "Tahfidz Putra",
        ),
        (
            Uuid::parse_str("2b9e8d7c-5a4f-4e3d-9c2b-0a1f6e5d4c3b")?,
            "Ustzh. Nadia Rahmi",
            "nadia.rahmi@alhikmah.sch.id",
            "Tahfidz Putri",
        ),
        (
            Uuid::parse_str("c4d5e6f7-1a2b-4c3d-8e9f-0b1c2d3e4f5a")?,
            "Ust. Ridwan Syafii",
            "ridwan.syafii@alhikmah.sch.id",
            "Tahfidz Putra",
        ),
    ];

    for (id, name, email, unit) in teachers {
        sqlx::query(
            r#"
            INSERT INTO pesantren_reports.teachers (id, full_name, email, unit)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name, unit = EXCLUDED.unit
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(unit)
        .execute(pool)
        .await?;
    }

    let supervision_id = ensure_supervision(
        pool,
        "fauzan.hakim@alhikmah.sch.id",
        "2026-S1",
        "KH. Abdul Basith",
        NaiveDate::from_ymd_opt(2026, 2, 10).context("invalid date")?,
    )
    .await?;

    let seed_items = [(1, 1, 5), (1, 2, 4), (2, 1, 5), (2, 2, 4), (3, 1, 3)];
    for (category_number, indicator_number, score) in seed_items {
        upsert_item(
            pool,
            supervision_id,
            &SupervisionItem {
                category_number,
                indicator_number,
                score,
                note: None,
            },
        )
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO pesantren_reports.activity_reports (id, title, period, description, status)
        VALUES ($1, $2, $3, $4, 'draft')
        ON CONFLICT (title, period) DO NOTHING
        "#,
    )
    .bind(Uuid::parse_str("7f6e5d4c-3b2a-4190-8f7e-6d5c4b3a2910")?)
    .bind("Pelatihan Tahsin Asatidz")
    .bind("2026-S1")
    .bind("Pelatihan tahsin untuk seluruh asatidz tahfidz.")
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO pesantren_reports.rab_proposals
        (id, title, period, amount, justification, status)
        VALUES ($1, $2, $3, $4, $5, 'draft')
        ON CONFLICT (title, period) DO NOTHING
        "#,
    )
    .bind(Uuid::parse_str("1c2d3e4f-5a6b-4c7d-8e9f-a0b1c2d3e4f5")?)
    .bind("Pengadaan Mushaf Santri Baru")
    .bind("2026-S1")
    .bind(7_500_000i64)
    .bind("Pengadaan mushaf untuk 50 santri baru angkatan 2026.")
    .execute(pool)
    .await?;

    Ok(())
}

async fn ensure_supervision(
    pool: &PgPool,
    teacher_email: &str,
    period: &str,
    supervisor: &str,
    supervised_at: NaiveDate,
) -> anyhow::Result<Uuid> {
    let teacher_id: Uuid =
        sqlx::query("SELECT id FROM pesantren_reports.teachers WHERE email = $1")
            .bind(teacher_email)
            .fetch_one(pool)
            .await
            .with_context(|| format!("no teacher with email {teacher_email}"))?
            .get("id");

    if let Some(row) = sqlx::query(
        "SELECT id, status FROM pesantren_reports.supervisions \
         WHERE teacher_id = $1 AND period = $2",
    )
    .bind(teacher_id)
    .bind(period)
    .fetch_optional(pool)
    .await?
    {
        let status: String = row.get("status");
        ensure_scorable(ReviewStatus::parse(&status)?, teacher_email, period)?;

        let id: Uuid = row.get("id");
        sqlx::query("UPDATE pesantren_reports.supervisions SET supervisor = $2 WHERE id = $1")
            .bind(id)
            .bind(supervisor)
            .execute(pool)
            .await?;
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO pesantren_reports.supervisions
        (id, teacher_id, period, supervisor, status, supervised_at)
        VALUES ($1, $2, $3, $4, 'draft', $5)
        "#,
    )
    .bind(id)
    .bind(teacher_id)
    .bind(period)
    .bind(supervisor)
    .bind(supervised_at)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Submitted and forwarded supervisions are locked; neither seeding nor a
/// CSV import may touch them, not even the supervisor column.
fn ensure_scorable(status: ReviewStatus, teacher_email: &str, period: &str) -> anyhow::Result<()> {
    if status.allows_scoring() {
        return Ok(());
    }
    anyhow::bail!(
        "supervision for {teacher_email} in {period} is {} and no longer accepts scores",
        status.as_str()
    )
}

async fn upsert_item(
    pool: &PgPool,
    supervision_id: Uuid,
    item: &SupervisionItem,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO pesantren_reports.supervision_items
        (id, supervision_id, category_number, indicator_number, score, note)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (supervision_id, category_number, indicator_number) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(supervision_id)
    .bind(item.category_number)
    .bind(item.indicator_number)
    .bind(item.score)
    .bind(item.note.as_deref())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        teacher_email: String,
        full_name: String,
        unit: String,
        period: String,
        supervisor: String,
        supervised_at: NaiveDate,
        category_number: i32,
        indicator_number: i32,
        score: i32,
        note: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        if !(1..=5).contains(&row.score) {
            return Err(crate::scoring::ScoreError::InvalidScore(row.score).into());
        }
        if catalog::find(row.category_number, row.indicator_number).is_none() {
            return Err(ImportError::UnknownIndicator {
                category_number: row.category_number,
                indicator_number: row.indicator_number,
            }
            .into());
        }

        sqlx::query(
            r#"
            INSERT INTO pesantren_reports.teachers (id, full_name, email, unit)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name, unit = EXCLUDED.unit
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.full_name)
        .bind(&row.teacher_email)
        .bind(&row.unit)
        .execute(pool)
        .await?;

        let supervision_id = ensure_supervision(
            pool,
            &row.teacher_email,
            &row.period,
            &row.supervisor,
            row.supervised_at,
        )
        .await?;

        let item = SupervisionItem {
            category_number: row.category_number,
            indicator_number: row.indicator_number,
            score: row.score,
            note: row.note,
        };
        if upsert_item(pool, supervision_id, &item).await? {
            inserted += 1;
        }
    }

    tracing::info!(inserted, "csv import finished");
    Ok(inserted)
}

pub async fn fetch_supervision(
    pool: &PgPool,
    teacher_email: &str,
    period: &str,
) -> anyhow::Result<SupervisionRecord> {
    let row = sqlx::query(
        r#"
        SELECT s.id, t.full_name, t.email, t.unit,
               s.period, s.supervisor, s.status, s.supervised_at
        FROM pesantren_reports.supervisions s
        JOIN pesantren_reports.teachers t ON t.id = s.teacher_id
        WHERE t.email = $1 AND s.period = $2
        "#,
    )
    .bind(teacher_email)
    .bind(period)
    .fetch_one(pool)
    .await
    .with_context(|| format!("no supervision for {teacher_email} in {period}"))?;

    let status: String = row.get("status");
    let mut record = SupervisionRecord {
        id: row.get("id"),
        teacher_name: row.get("full_name"),
        teacher_email: row.get("email"),
        unit: row.get("unit"),
        period: row.get("period"),
        supervisor: row.get("supervisor"),
        status: ReviewStatus::parse(&status)?,
        supervised_at: row.get("supervised_at"),
        items: Vec::new(),
    };
    record.items = fetch_items(pool, record.id).await?;
    Ok(record)
}

async fn fetch_items(pool: &PgPool, supervision_id: Uuid) -> anyhow::Result<Vec<SupervisionItem>> {
    let rows = sqlx::query(
        r#"
        SELECT category_number, indicator_number, score, note
        FROM pesantren_reports.supervision_items
        WHERE supervision_id = $1
        ORDER BY category_number, indicator_number
        "#,
    )
    .bind(supervision_id)
    .fetch_all(pool)
    .await?;

    let mut items = Vec::new();
    for row in rows {
        items.push(SupervisionItem {
            category_number: row.get("category_number"),
            indicator_number: row.get("indicator_number"),
            score: row.get("score"),
            note: row.get("note"),
        });
    }
    Ok(items)
}

pub async fn fetch_supervisions_for_period(
    pool: &PgPool,
    period: &str,
    teacher_email: Option<&str>,
) -> anyhow::Result<Vec<SupervisionRecord>> {
    let mut query = String::from(
        "SELECT s.id, t.full_name, t.email, t.unit, \
         s.period, s.supervisor, s.status, s.supervised_at \
         FROM pesantren_reports.supervisions s \
         JOIN pesantren_reports.teachers t ON t.id = s.teacher_id \
         WHERE s.period = $1",
    );
    if teacher_email.is_some() {
        query.push_str(" AND t.email = $2");
    }
    query.push_str(" ORDER BY t.full_name");

    let mut rows = sqlx::query(&query).bind(period);
    if let Some(value) = teacher_email {
        rows = rows.bind(value);
    }

    let mut records = Vec::new();
    for row in rows.fetch_all(pool).await? {
        let status: String = row.get("status");
        let mut record = SupervisionRecord {
            id: row.get("id"),
            teacher_name: row.get("full_name"),
            teacher_email: row.get("email"),
            unit: row.get("unit"),
            period: row.get("period"),
            supervisor: row.get("supervisor"),
            status: ReviewStatus::parse(&status)?,
            supervised_at: row.get("supervised_at"),
            items: Vec::new(),
        };
        record.items = fetch_items(pool, record.id).await?;
        records.push(record);
    }
    Ok(records)
}

/// Refreshes the cached aggregate columns. The items remain the source of
/// truth; these columns are only ever written from a fresh recompute.
pub async fn store_aggregate(
    pool: &PgPool,
    supervision_id: Uuid,
    aggregate: &Aggregate,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE pesantren_reports.supervisions
        SET total_score = $2, max_score = $3, percentage = $4, category = $5
        WHERE id = $1
        "#,
    )
    .bind(supervision_id)
    .bind(aggregate.total_score)
    .bind(aggregate.max_score)
    .bind(aggregate.percentage)
    .bind(aggregate.category.label())
    .execute(pool)
    .await?;

    tracing::debug!(%supervision_id, percentage = aggregate.percentage, "aggregate stored");
    Ok(())
}

pub async fn set_supervision_status(
    pool: &PgPool,
    supervision_id: Uuid,
    status: ReviewStatus,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE pesantren_reports.supervisions SET status = $2 WHERE id = $1")
        .bind(supervision_id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    tracing::info!(%supervision_id, status = status.as_str(), "supervision status updated");
    Ok(())
}

pub async fn fetch_activity_report(
    pool: &PgPool,
    title: &str,
    period: &str,
) -> anyhow::Result<ActivityReport> {
    let row = sqlx::query(
        r#"
        SELECT id, title, period, description, status
        FROM pesantren_reports.activity_reports
        WHERE title = $1 AND period = $2
        "#,
    )
    .bind(title)
    .bind(period)
    .fetch_one(pool)
    .await
    .with_context(|| format!("no activity report titled '{title}' in {period}"))?;

    let status: String = row.get("status");
    Ok(ActivityReport {
        id: row.get("id"),
        title: row.get("title"),
        period: row.get("period"),
        description: row.get("description"),
        status: ReviewStatus::parse(&status)?,
    })
}

pub async fn set_activity_status(
    pool: &PgPool,
    report_id: Uuid,
    status: ReviewStatus,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE pesantren_reports.activity_reports SET status = $2 WHERE id = $1")
        .bind(report_id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    tracing::info!(%report_id, status = status.as_str(), "activity report status updated");
    Ok(())
}

pub async fn fetch_rab(pool: &PgPool, title: &str, period: &str) -> anyhow::Result<RabProposal> {
    let row = sqlx::query(
        r#"
        SELECT id, title, period, amount, justification, status, foundation_note
        FROM pesantren_reports.rab_proposals
        WHERE title = $1 AND period = $2
        "#,
    )
    .bind(title)
    .bind(period)
    .fetch_one(pool)
    .await
    .with_context(|| format!("no RAB proposal titled '{title}' in {period}"))?;

    let status: String = row.get("status");
    Ok(RabProposal {
        id: row.get("id"),
        title: row.get("title"),
        period: row.get("period"),
        amount: row.get("amount"),
        justification: row.get("justification"),
        status: RabStatus::parse(&status)?,
        foundation_note: row.get("foundation_note"),
    })
}

pub async fn set_rab_status(
    pool: &PgPool,
    proposal_id: Uuid,
    status: RabStatus,
    foundation_note: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE pesantren_reports.rab_proposals
        SET status = $2, foundation_note = COALESCE($3, foundation_note)
        WHERE id = $1
        "#,
    )
    .bind(proposal_id)
    .bind(status.as_str())
    .bind(foundation_note)
    .execute(pool)
    .await?;
    tracing::info!(%proposal_id, status = status.as_str(), "rab status updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_supervisions_refuse_new_scores() {
        let email = "fauzan.hakim@alhikmah.sch.id";
        assert!(ensure_scorable(ReviewStatus::Draft, email, "2026-S1").is_ok());
        assert!(ensure_scorable(ReviewStatus::Submitted, email, "2026-S1").is_err());
        assert!(ensure_scorable(ReviewStatus::SentToFoundation, email, "2026-S1").is_err());
    }

    #[test]
    fn lock_error_names_the_record() {
        let error = ensure_scorable(
            ReviewStatus::SentToFoundation,
            "nadia.rahmi@alhikmah.sch.id",
            "2026-S1",
        )
        .unwrap_err();
        let message = error.to_string();
        assert!(message.contains("nadia.rahmi@alhikmah.sch.id"));
        assert!(message.contains("sent_to_foundation"));
    }
}
