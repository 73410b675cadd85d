//! Group roster records and propose merges for sparse job titles.
//!
//! This module turns the flat record table into the summary table:
//!
//! ```text
//! Records (one per employee)        →  Summary (one per group + TOTAL)
//! ┌───────────────────────────┐        ┌──────────────────────────────────┐
//! │ Madrid, Ventas, Clerk     │        │ Madrid, Ventas, Clerk     2  ⚠️  │
//! │ Madrid, Ventas, Clerk     │   →    │ Madrid, Ventas, Manager   4      │
//! │ Madrid, Ventas, Manager ×4│        │ TOTAL                     6      │
//! └───────────────────────────┘        └──────────────────────────────────┘
//! ```
//!
//! Groups at or below [`LOW_HEADCOUNT_MAX`] people get the warning flag and
//! a merge proposal: first another job title in the same center *and*
//! department with more than [`MERGE_TARGET_MIN`] people, then the same
//! center alone, then a generic fallback. Candidates are taken in scan order
//! over the sorted group sequence, not by size; that tie-break is part of
//! the observable output and must stay.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::models::{
    GroupKey, GroupRecord, ResolvedColumns, SummaryTable, LOW_HEADCOUNT_MAX,
    MERGE_TARGET_MIN, SUGGESTION_FALLBACK, SUGGESTION_PREFIX,
};

/// Count headcount per (work center, department, job title) triple.
///
/// Rows with a blank value in any key column are dropped. The result is
/// sorted ascending by the triple, courtesy of the `BTreeMap` and the
/// field order of [`GroupKey`].
pub fn count_groups(
    records: &[Map<String, Value>],
    columns: &ResolvedColumns,
) -> Vec<(GroupKey, usize)> {
    let mut counts: BTreeMap<GroupKey, usize> = BTreeMap::new();

    for record in records {
        let center = key_component(record, &columns.work_center);
        let department = key_component(record, &columns.department);
        let job_title = key_component(record, &columns.job_title);

        if let (Some(center), Some(department), Some(job_title)) =
            (center, department, job_title)
        {
            let key = GroupKey {
                work_center: center,
                department,
                job_title,
            };
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    counts.into_iter().collect()
}

/// Classify the counted groups and assemble the summary table.
pub fn build_summary(
    groups: Vec<(GroupKey, usize)>,
    key_columns: ResolvedColumns,
) -> SummaryTable {
    let total = groups.iter().map(|(_, count)| count).sum();

    let records = groups
        .iter()
        .map(|(key, count)| {
            if *count > LOW_HEADCOUNT_MAX {
                GroupRecord::clean(key.clone(), *count)
            } else {
                let suggestion = find_merge_target(&groups, key)
                    .map(|title| format!("{SUGGESTION_PREFIX}{title}"))
                    .unwrap_or_else(|| SUGGESTION_FALLBACK.to_string());
                GroupRecord::flagged(key.clone(), *count, suggestion)
            }
        })
        .collect();

    SummaryTable {
        key_columns,
        groups: records,
        total,
    }
}

/// Two-pass candidate search over the sorted group sequence.
///
/// Pass one wants the same center and department; pass two relaxes to the
/// same center. Either way the candidate must be a different job title with
/// a headcount above [`MERGE_TARGET_MIN`], and the first match in scan
/// order wins.
fn find_merge_target<'a>(
    groups: &'a [(GroupKey, usize)],
    key: &GroupKey,
) -> Option<&'a str> {
    let candidate = |same_department: bool| {
        groups.iter().find(move |(other, count)| {
            other.work_center == key.work_center
                && (!same_department || other.department == key.department)
                && other.job_title != key.job_title
                && *count > MERGE_TARGET_MIN
        })
    };

    candidate(true)
        .or_else(|| candidate(false))
        .map(|(other, _)| other.job_title.as_str())
}

fn key_component(record: &Map<String, Value>, column: &str) -> Option<String> {
    match record.get(column) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COL_HEADCOUNT, LOW_HEADCOUNT_WARNING, TOTAL_LABEL};
    use serde_json::json;

    fn columns() -> ResolvedColumns {
        ResolvedColumns {
            work_center: "CENTRO DE TRABAJO".into(),
            department: "DEPARTAMENTO".into(),
            job_title: "PUESTO DE TRABAJO".into(),
        }
    }

    fn record(center: &str, department: &str, job_title: &str) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("CENTRO DE TRABAJO".into(), json!(center));
        row.insert("DEPARTAMENTO".into(), json!(department));
        row.insert("PUESTO DE TRABAJO".into(), json!(job_title));
        row
    }

    fn records(rows: &[(&str, &str, &str, usize)]) -> Vec<Map<String, Value>> {
        rows.iter()
            .flat_map(|(c, d, t, n)| (0..*n).map(move |_| record(c, d, t)))
            .collect()
    }

    fn summarize(rows: &[(&str, &str, &str, usize)]) -> SummaryTable {
        let recs = records(rows);
        build_summary(count_groups(&recs, &columns()), columns())
    }

    #[test]
    fn test_clerk_merges_into_manager() {
        let summary = summarize(&[("A", "X", "Clerk", 2), ("A", "X", "Manager", 4)]);

        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.total, 6);

        let clerk = &summary.groups[0];
        assert_eq!(clerk.key.job_title, "Clerk");
        assert_eq!(clerk.headcount, 2);
        assert_eq!(clerk.warning, LOW_HEADCOUNT_WARNING);
        assert_eq!(clerk.suggestion, "Unificar con: Manager");

        let manager = &summary.groups[1];
        assert_eq!(manager.headcount, 4);
        assert!(manager.warning.is_empty());
        assert!(manager.suggestion.is_empty());
    }

    #[test]
    fn test_exactly_three_is_never_flagged() {
        let summary = summarize(&[("A", "X", "Clerk", 3)]);

        let clerk = &summary.groups[0];
        assert!(clerk.warning.is_empty());
        assert!(clerk.suggestion.is_empty());
    }

    #[test]
    fn test_exactly_three_is_never_a_target() {
        // The only neighbour has 3 people, below the >3 acceptor.
        let summary = summarize(&[("A", "X", "Clerk", 1), ("A", "X", "Manager", 3)]);

        assert_eq!(summary.groups[0].suggestion, SUGGESTION_FALLBACK);
    }

    #[test]
    fn test_fallback_when_no_candidate_anywhere() {
        let summary = summarize(&[("A", "X", "Clerk", 1), ("B", "X", "Manager", 9)]);

        let clerk = &summary.groups[0];
        assert_eq!(clerk.warning, LOW_HEADCOUNT_WARNING);
        assert_eq!(clerk.suggestion, SUGGESTION_FALLBACK);
    }

    #[test]
    fn test_same_department_preferred_over_same_center() {
        // "Big" sorts before the low group's department, so a flat scan of
        // the center would find it first; the department pass must win.
        let summary = summarize(&[
            ("A", "W", "Big", 5),
            ("A", "X", "Low", 1),
            ("A", "X", "Target", 4),
        ]);

        let low = summary
            .groups
            .iter()
            .find(|g| g.key.job_title == "Low")
            .unwrap();
        assert_eq!(low.suggestion, "Unificar con: Target");
    }

    #[test]
    fn test_same_center_pass_when_department_has_none() {
        let summary = summarize(&[
            ("A", "W", "Big", 5),
            ("A", "X", "Low", 1),
            ("A", "X", "Peer", 2),
        ]);

        let low = summary
            .groups
            .iter()
            .find(|g| g.key.job_title == "Low")
            .unwrap();
        assert_eq!(low.suggestion, "Unificar con: Big");
    }

    #[test]
    fn test_first_candidate_by_scan_order_not_by_size() {
        let summary = summarize(&[
            ("A", "X", "Aaa", 4),
            ("A", "X", "Low", 2),
            ("A", "X", "Zzz", 10),
        ]);

        let low = summary
            .groups
            .iter()
            .find(|g| g.key.job_title == "Low")
            .unwrap();
        assert_eq!(low.suggestion, "Unificar con: Aaa");
    }

    #[test]
    fn test_groups_sorted_and_keys_distinct() {
        let summary = summarize(&[
            ("B", "Y", "Clerk", 4),
            ("A", "Z", "Clerk", 4),
            ("A", "X", "Manager", 4),
            ("A", "X", "Clerk", 4),
        ]);

        let keys: Vec<&GroupKey> = summary.groups.iter().map(|g| &g.key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted);
        assert_eq!(summary.groups.len(), 4);
        assert_eq!(summary.total, 16);
    }

    #[test]
    fn test_blank_key_rows_are_dropped() {
        let mut rows = records(&[("A", "X", "Manager", 4)]);

        let mut missing_department = record("A", "", "Clerk");
        missing_department.insert("DEPARTAMENTO".into(), Value::Null);
        rows.push(missing_department);
        rows.push(record("A", "   ", "Clerk"));

        let groups = count_groups(&rows, &columns());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1, 4);
    }

    #[test]
    fn test_numeric_keys_group_by_rendering() {
        let mut a = Map::new();
        a.insert("CENTRO DE TRABAJO".into(), json!(101));
        a.insert("DEPARTAMENTO".into(), json!("Ventas"));
        a.insert("PUESTO DE TRABAJO".into(), json!("Clerk"));

        let groups = count_groups(&[a.clone(), a], &columns());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0.work_center, "101");
        assert_eq!(groups[0].1, 2);
    }

    #[test]
    fn test_total_row_is_last_and_sums_headcounts() {
        let summary = summarize(&[("A", "X", "Clerk", 2), ("A", "X", "Manager", 4)]);

        let rows = summary.to_rows();
        let total = rows.last().unwrap();
        assert_eq!(total["CENTRO DE TRABAJO"], json!(TOTAL_LABEL));
        assert_eq!(total[COL_HEADCOUNT], json!(6));
    }
}
