use std::fmt::Write;

use crate::catalog;
use crate::models::{SupervisionItem, SupervisionRecord};
use crate::scoring::{self, Aggregate};

pub struct CategoryBreakdown {
    pub category_number: i32,
    pub category_name: &'static str,
    pub item_count: usize,
    pub subtotal: i32,
    pub percentage: i32,
}

pub fn breakdown_by_category(items: &[SupervisionItem]) -> Vec<CategoryBreakdown> {
    let mut rows: Vec<CategoryBreakdown> = Vec::new();

    for item in items {
        match rows
            .iter_mut()
            .find(|row| row.category_number == item.category_number)
        {
            Some(row) => {
                row.item_count += 1;
                row.subtotal += item.score;
            }
            None => rows.push(CategoryBreakdown {
                category_number: item.category_number,
                category_name: catalog::category_name(item.category_number).unwrap_or("Lainnya"),
                item_count: 1,
                subtotal: item.score,
                percentage: 0,
            }),
        }
    }

    for row in rows.iter_mut() {
        row.percentage = scoring::percentage_of(row.subtotal, 5 * row.item_count as i32);
    }
    rows.sort_by_key(|row| row.category_number);
    rows
}

pub fn build_report(
    period: &str,
    teacher_email: Option<&str>,
    records: &[(SupervisionRecord, Aggregate)],
) -> String {
    let mut output = String::new();
    let scope = teacher_email.unwrap_or("seluruh guru tahfidz");

    let _ = writeln!(output, "# Laporan Supervisi Guru Tahfidz");
    let _ = writeln!(output, "Periode {period} ({scope})");
    let _ = writeln!(output);

    if records.is_empty() {
        let _ = writeln!(output, "Belum ada supervisi pada periode ini.");
        return output;
    }

    let _ = writeln!(output, "## Ringkasan");
    for (record, aggregate) in records {
        let _ = writeln!(
            output,
            "- {} ({}, {}): {}/{} = {}% — {} [{}]",
            record.teacher_name,
            record.teacher_email,
            record.unit,
            aggregate.total_score,
            aggregate.max_score,
            aggregate.percentage,
            aggregate.category.label(),
            record.status.as_str()
        );
    }

    for (record, aggregate) in records {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", record.teacher_name);
        let _ = writeln!(
            output,
            "Supervisor {} pada {}",
            record.supervisor, record.supervised_at
        );
        let _ = writeln!(
            output,
            "Nilai {} dari {} ({}%), kategori {}.",
            aggregate.total_score,
            aggregate.max_score,
            aggregate.percentage,
            aggregate.category.label()
        );
        let _ = writeln!(output, "Rekomendasi: {}.", aggregate.category.recommendation());

        if record.items.is_empty() {
            let _ = writeln!(output, "Belum ada indikator yang dinilai.");
            continue;
        }

        let _ = writeln!(output);
        for row in breakdown_by_category(&record.items) {
            let _ = writeln!(
                output,
                "- {}: {}/{} ({}%) dari {} indikator",
                row.category_name,
                row.subtotal,
                5 * row.item_count as i32,
                row.percentage,
                row.item_count
            );
        }

        let noted: Vec<&SupervisionItem> =
            record.items.iter().filter(|i| i.note.is_some()).collect();
        if !noted.is_empty() {
            let _ = writeln!(output);
            let _ = writeln!(output, "Catatan supervisor:");
            for item in noted {
                let indicator_text = catalog::find(item.category_number, item.indicator_number)
                    .map(|i| i.text)
                    .unwrap_or("(indikator tidak dikenal)");
                let _ = writeln!(
                    output,
                    "- {} — {}: {}",
                    indicator_text,
                    scoring::score_label(item.score).unwrap_or("?"),
                    item.note.as_deref().unwrap_or("")
                );
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::aggregate;
    use crate::workflow::ReviewStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn sample_record(items: Vec<SupervisionItem>) -> (SupervisionRecord, Aggregate) {
        let agg = aggregate(&items).unwrap();
        (
            SupervisionRecord {
                id: Uuid::new_v4(),
                teacher_name: "Ust. Fauzan Hakim".to_string(),
                teacher_email: "fauzan.hakim@alhikmah.sch.id".to_string(),
                unit: "Tahfidz Putra".to_string(),
                period: "2026-S1".to_string(),
                supervisor: "KH. Abdul Basith".to_string(),
                status: ReviewStatus::Submitted,
                supervised_at: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                items,
            },
            agg,
        )
    }

    fn item(category: i32, indicator: i32, score: i32, note: Option<&str>) -> SupervisionItem {
        SupervisionItem {
            category_number: category,
            indicator_number: indicator,
            score,
            note: note.map(str::to_string),
        }
    }

    #[test]
    fn breakdown_groups_and_rounds_per_category() {
        let items = vec![
            item(1, 1, 5, None),
            item(1, 2, 4, None),
            item(2, 1, 3, None),
        ];
        let rows = breakdown_by_category(&items);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category_number, 1);
        assert_eq!(rows[0].subtotal, 9);
        assert_eq!(rows[0].percentage, 90);
        assert_eq!(rows[1].subtotal, 3);
        assert_eq!(rows[1].percentage, 60);
    }

    #[test]
    fn report_includes_aggregate_and_recommendation() {
        let entry = sample_record(vec![
            item(1, 1, 5, None),
            item(1, 2, 4, Some("Perlu konsistensi jadwal")),
            item(2, 1, 5, None),
            item(2, 2, 3, None),
        ]);
        let report = build_report("2026-S1", None, std::slice::from_ref(&entry));
        assert!(report.contains("# Laporan Supervisi Guru Tahfidz"));
        assert!(report.contains("17/20 = 85% — Jayyid Jiddan"));
        assert!(report.contains("Direkomendasikan untuk kenaikan jenjang"));
        assert!(report.contains("Perlu konsistensi jadwal"));
    }

    #[test]
    fn empty_period_renders_placeholder() {
        let report = build_report("2026-S2", None, &[]);
        assert!(report.contains("Belum ada supervisi"));
    }

    #[test]
    fn unscored_record_is_flagged() {
        let entry = sample_record(vec![]);
        let report = build_report("2026-S1", Some("fauzan.hakim@alhikmah.sch.id"), &[entry]);
        assert!(report.contains("0/0 = 0% — Dha'if"));
        assert!(report.contains("Belum ada indikator yang dinilai."));
    }
}
