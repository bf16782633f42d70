//! Per-user aggregates over symptom logs and treatment usage.
//!
//! Grouping happens in SQL; averages are rounded to one decimal here.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use uuid::Uuid;

use crate::db;
use crate::db::repository::{timestamp_column, uuid_column};
use crate::error::AccessError;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;
/// Larger windows are clamped; the result is the same as "everything".
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomStats {
    pub window_days: i64,
    pub since: Option<DateTime<Utc>>,
    pub total_logs: u32,
    pub symptoms: Vec<SymptomSummary>,
    pub daily: Vec<DailySeverity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomSummary {
    pub symptom_id: Uuid,
    pub symptom_name: String,
    pub count: u32,
    pub average_severity: f64,
    pub min_severity: i32,
    pub max_severity: i32,
    pub last_logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeverity {
    pub date: NaiveDate,
    pub count: u32,
    pub average_severity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentEffect {
    pub treatment_id: Uuid,
    pub treatment_name: String,
    /// Usage rows that carry an effectiveness rating.
    pub sample_size: u32,
    pub average_effect: Option<f64>,
    pub usage_count: u32,
}

impl SymptomStats {
    fn empty(window_days: i64) -> Self {
        Self {
            window_days,
            since: None,
            total_logs: 0,
            symptoms: Vec::new(),
            daily: Vec::new(),
        }
    }
}

/// Symptom frequency and severity over the last `window_days` days.
pub fn symptom_stats(
    conn: &Connection,
    user_id: &Uuid,
    window_days: i64,
) -> Result<SymptomStats, AccessError> {
    symptom_stats_at(conn, user_id, window_days, Utc::now())
}

/// Same as [`symptom_stats`] with an explicit reference time.
pub fn symptom_stats_at(
    conn: &Connection,
    user_id: &Uuid,
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<SymptomStats, AccessError> {
    if window_days <= 0 {
        return Ok(SymptomStats::empty(window_days));
    }

    let since = db::stored_precision(now - Duration::days(window_days.min(MAX_WINDOW_DAYS)));
    let since_key = db::format_timestamp(&since);
    let user_key = user_id.to_string();

    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, COUNT(*), AVG(l.severity), MIN(l.severity),
                MAX(l.severity), MAX(l.logged_at)
         FROM symptom_logs l
         JOIN symptoms s ON s.id = l.symptom_id
         WHERE l.user_id = ?1 AND l.logged_at >= ?2
         GROUP BY s.id, s.name
         ORDER BY s.name ASC, s.id ASC",
    )?;
    let symptoms = stmt
        .query_map(params![user_key, since_key], |row| {
            Ok(SymptomSummary {
                symptom_id: uuid_column(row, 0)?,
                symptom_name: row.get(1)?,
                count: row.get(2)?,
                average_severity: round_one_decimal(row.get(3)?),
                min_severity: row.get(4)?,
                max_severity: row.get(5)?,
                last_logged_at: timestamp_column(row, 6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    // Stored timestamps are UTC, so the first ten characters are the UTC date.
    let mut stmt = conn.prepare(
        "SELECT substr(logged_at, 1, 10) AS day, COUNT(*), AVG(severity)
         FROM symptom_logs
         WHERE user_id = ?1 AND logged_at >= ?2
         GROUP BY day
         ORDER BY day ASC",
    )?;
    let daily = stmt
        .query_map(params![user_key, since_key], |row| {
            let day: String = row.get(0)?;
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(DailySeverity {
                date,
                count: row.get(1)?,
                average_severity: round_one_decimal(row.get(2)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let total_logs = symptoms.iter().map(|s| s.count).sum();
    tracing::debug!(%user_id, window_days, total_logs, "Symptom stats computed");

    Ok(SymptomStats {
        window_days,
        since: Some(since),
        total_logs,
        symptoms,
        daily,
    })
}

/// Effectiveness summary for every treatment the user has recorded usage for.
pub fn treatment_stats(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<TreatmentEffect>, AccessError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, COUNT(u.effectiveness), AVG(u.effectiveness), COUNT(*)
         FROM treatment_usage u
         JOIN treatments t ON t.id = u.treatment_id
         WHERE u.user_id = ?1
         GROUP BY t.id, t.name
         ORDER BY t.name ASC, t.id ASC",
    )?;
    let effects = stmt
        .query_map(params![user_id.to_string()], |row| {
            let average: Option<f64> = row.get(3)?;
            Ok(TreatmentEffect {
                treatment_id: uuid_column(row, 0)?,
                treatment_name: row.get(1)?,
                sample_size: row.get(2)?,
                average_effect: average.map(round_one_decimal),
                usage_count: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(effects)
}

/// Half away from zero, one decimal place.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::journal::{create_symptom, log_symptom, NewSymptom, SymptomLogEntry};
    use crate::models::enums::Role;
    use crate::models::Symptom;
    use crate::test_support::{seed_user, test_db};
    use crate::treatments::{
        create_treatment, record_treatment_usage, NewTreatment, TreatmentUsageEntry,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn symptom(conn: &Connection, name: &str) -> Symptom {
        create_symptom(conn, &NewSymptom {
            name: Some(name.into()),
            ..Default::default()
        })
        .unwrap()
    }

    fn log_at(conn: &Connection, user: &Uuid, symptom: &Symptom, severity: i64, at: DateTime<Utc>) {
        log_symptom(conn, user, &SymptomLogEntry {
            symptom_id: Some(symptom.id.to_string()),
            severity: Some(severity),
            logged_at: Some(at),
            ..Default::default()
        })
        .unwrap();
    }

    #[test]
    fn rounding_is_one_decimal_half_away_from_zero() {
        assert_eq!(round_one_decimal(4.25), 4.3);
        assert_eq!(round_one_decimal(3.333_333), 3.3);
        assert_eq!(round_one_decimal(7.0), 7.0);
    }

    #[test]
    fn non_positive_window_is_empty_not_error() {
        let conn = test_db();
        let user = seed_user(&conn, Role::Patient);
        let headache = symptom(&conn, "Headache");
        log_at(&conn, &user, &headache, 5, now());

        for days in [0, -1, -30] {
            let stats = symptom_stats_at(&conn, &user, days, now()).unwrap();
            assert_eq!(stats.total_logs, 0);
            assert!(stats.symptoms.is_empty());
            assert!(stats.daily.is_empty());
            assert_eq!(stats.since, None);
        }
    }

    #[test]
    fn no_logs_yields_empty_aggregate() {
        let conn = test_db();
        let user = seed_user(&conn, Role::Patient);
        let stats = symptom_stats_at(&conn, &user, 7, now()).unwrap();
        assert_eq!(stats.window_days, 7);
        assert_eq!(stats.total_logs, 0);
        assert!(stats.symptoms.is_empty());

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalLogs"], 0);
        assert_eq!(json["symptoms"], serde_json::json!([]));
    }

    #[test]
    fn groups_by_symptom_within_window() {
        let conn = test_db();
        let user = seed_user(&conn, Role::Patient);
        let other = seed_user(&conn, Role::Patient);
        let nausea = symptom(&conn, "Nausea");
        let fatigue = symptom(&conn, "Fatigue");

        log_at(&conn, &user, &nausea, 3, now() - Duration::days(1));
        log_at(&conn, &user, &nausea, 6, now() - Duration::hours(2));
        log_at(&conn, &user, &fatigue, 4, now() - Duration::days(2));
        log_at(&conn, &user, &fatigue, 5, now() - Duration::days(2));
        log_at(&conn, &user, &fatigue, 5, now() - Duration::days(2));
        // Outside the window
        log_at(&conn, &user, &fatigue, 10, now() - Duration::days(8));
        // Someone else's log
        log_at(&conn, &other, &nausea, 9, now());

        let stats = symptom_stats_at(&conn, &user, 7, now()).unwrap();
        assert_eq!(stats.total_logs, 5);
        assert_eq!(stats.since, Some(now() - Duration::days(7)));

        let names: Vec<_> = stats.symptoms.iter().map(|s| s.symptom_name.as_str()).collect();
        assert_eq!(names, vec!["Fatigue", "Nausea"]);

        let fatigue_stats = &stats.symptoms[0];
        assert_eq!(fatigue_stats.count, 3);
        assert_eq!(fatigue_stats.average_severity, 4.7);
        assert_eq!(fatigue_stats.min_severity, 4);
        assert_eq!(fatigue_stats.max_severity, 5);

        let nausea_stats = &stats.symptoms[1];
        assert_eq!(nausea_stats.average_severity, 4.5);
        assert_eq!(nausea_stats.last_logged_at, now() - Duration::hours(2));

        let days: Vec<_> = stats.daily.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(days, vec!["2025-03-08", "2025-03-09", "2025-03-10"]);
        assert_eq!(stats.daily[0].count, 3);
    }

    #[test]
    fn huge_window_is_clamped() {
        let conn = test_db();
        let user = seed_user(&conn, Role::Patient);
        let cough = symptom(&conn, "Cough");
        log_at(&conn, &user, &cough, 2, now() - Duration::days(400));

        let stats = symptom_stats_at(&conn, &user, i64::MAX, now()).unwrap();
        assert_eq!(stats.total_logs, 1);
        assert_eq!(stats.window_days, i64::MAX);
    }

    #[test]
    fn unrated_usage_has_null_average() {
        let conn = test_db();
        let user = seed_user(&conn, Role::Patient);
        let yoga = create_treatment(&conn, &NewTreatment {
            name: Some("Yoga".into()),
            treatment_type: Some("lifestyle".into()),
            ..Default::default()
        })
        .unwrap();
        record_treatment_usage(&conn, &user, &TreatmentUsageEntry {
            treatment_id: Some(yoga.id.to_string()),
            ..Default::default()
        })
        .unwrap();

        let stats = treatment_stats(&conn, &user).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].sample_size, 0);
        assert_eq!(stats[0].usage_count, 1);
        assert_eq!(stats[0].average_effect, None);

        let json = serde_json::to_value(&stats[0]).unwrap();
        assert!(json["averageEffect"].is_null());
    }

    #[test]
    fn treatment_stats_average_rated_rows_only() {
        let conn = test_db();
        let user = seed_user(&conn, Role::Patient);
        let other = seed_user(&conn, Role::Patient);
        let mut ids = Vec::new();
        for name in ["Ibuprofen", "Acupuncture"] {
            let treatment = create_treatment(&conn, &NewTreatment {
                name: Some(name.into()),
                treatment_type: Some("medication".into()),
                ..Default::default()
            })
            .unwrap();
            ids.push(treatment.id);
        }
        let record = |who: &Uuid, id: &Uuid, effectiveness: Option<i64>| {
            record_treatment_usage(&conn, who, &TreatmentUsageEntry {
                treatment_id: Some(id.to_string()),
                effectiveness,
                ..Default::default()
            })
            .unwrap();
        };
        record(&user, &ids[0], Some(7));
        record(&user, &ids[0], Some(8));
        record(&user, &ids[0], None);
        record(&user, &ids[1], Some(3));
        record(&other, &ids[1], Some(10));

        let stats = treatment_stats(&conn, &user).unwrap();
        assert_eq!(stats[0].treatment_name, "Acupuncture");
        assert_eq!(stats[0].average_effect, Some(3.0));
        assert_eq!(stats[1].treatment_name, "Ibuprofen");
        assert_eq!(stats[1].sample_size, 2);
        assert_eq!(stats[1].usage_count, 3);
        assert_eq!(stats[1].average_effect, Some(7.5));
    }
}
