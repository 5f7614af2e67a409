use crate::cavity::loader::SkipReason;
use crate::cavity::types::{CavityRecord, Druggability, FileMetrics};
use crate::utility::{first_argmax, mean};
use std::cmp::Ordering;
use tracing::warn;

/// Number of pockets listed in the per-file summary line.
const TOP_N: usize = 3;

/// Keeps rows with a non-negative `DrugScore` whose class is not `Weak`.
pub fn filter_rows(rows: &[CavityRecord]) -> Vec<&CavityRecord> {
    rows.iter()
        .filter(|r| matches!(r.drug_score, Some(s) if s >= 0.0))
        .filter(|r| r.druggability != Druggability::Weak)
        .collect()
}

/// Filters `rows` and reduces the survivors into a [`FileMetrics`].
///
/// Unrecognized druggability labels survive the filter and count towards
/// every DrugScore/surface metric, but have no numeric class score and are
/// left out of `promedio_druggability`.
pub fn compute_metrics(file: &str, rows: &[CavityRecord]) -> Result<FileMetrics, SkipReason> {
    let kept = filter_rows(rows);
    if kept.is_empty() {
        return Err(SkipReason::NoValidRows);
    }

    let class_scores: Vec<f64> = kept.iter().filter_map(|r| r.druggability.score()).collect();
    let unmapped = kept
        .iter()
        .filter(|r| matches!(r.druggability, Druggability::Unrecognized(_)))
        .count();
    if unmapped > 0 {
        warn!(file, unmapped, "Unrecognized druggability labels left out of the mean");
    }
    let promedio_druggability = if class_scores.is_empty() {
        None
    } else {
        Some(mean(&class_scores))
    };

    let conteo_strong = kept
        .iter()
        .filter(|r| r.druggability == Druggability::Strong)
        .count();

    // every kept row has a score
    let scores: Vec<f64> = kept.iter().filter_map(|r| r.drug_score).collect();
    let max_drugscore = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg_drugscore = mean(&scores);

    let surface = first_argmax(kept.iter().map(|r| r.surface_area));
    let max_surface_area = surface.and_then(|i| kept[i].surface_area);
    let index_max_surface = surface.map(|i| kept[i].index.clone());

    Ok(FileMetrics {
        file: file.to_string(),
        promedio_druggability,
        conteo_strong,
        max_drugscore,
        avg_drugscore,
        max_surface_area,
        index_max_surface,
        top3_indices: top_indices(&kept, TOP_N),
    })
}

/// Indices of the `n` highest-scoring rows, descending; the stable sort keeps
/// earlier rows first on ties.
fn top_indices(rows: &[&CavityRecord], n: usize) -> Vec<String> {
    let mut ranked: Vec<&CavityRecord> = rows.to_vec();
    ranked.sort_by(|a, b| {
        let a = a.drug_score.unwrap_or(f64::NEG_INFINITY);
        let b = b.drug_score.unwrap_or(f64::NEG_INFINITY);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
    ranked.into_iter().take(n).map(|r| r.index.clone()).collect()
}

/// One-line human summary written for each file that produced metrics.
pub fn summary_line(m: &FileMetrics) -> String {
    let surface = match (m.max_surface_area, &m.index_max_surface) {
        (Some(v), Some(idx)) => format!("{v:.2} (Index {idx})"),
        _ => "n/a".to_string(),
    };
    format!(
        "{}: Top 3 indices by DrugScore = [{}]; Max surface area = {}",
        m.file,
        m.top3_indices.join(", "),
        surface
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn row(index: &str, drugg: &str, score: f64, surface: f64) -> CavityRecord {
        CavityRecord {
            index: index.to_string(),
            druggability: Druggability::from_label(drugg),
            drug_score: Some(score),
            surface_area: Some(surface),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_single_survivor_example() {
        let rows = vec![
            row("1", "Weak", 5.0, 100.0),
            row("2", "Strong", 3.0, 200.0),
            row("3", "Medium", -1.0, 50.0),
        ];

        let m = compute_metrics("a.csv", &rows).unwrap();
        assert_eq!(m.promedio_druggability, Some(3.0));
        assert_eq!(m.conteo_strong, 1);
        assert_eq!(m.max_drugscore, 3.0);
        assert_eq!(m.avg_drugscore, 3.0);
        assert_eq!(m.max_surface_area, Some(200.0));
        assert_eq!(m.index_max_surface.as_deref(), Some("2"));
        assert_eq!(m.top3_indices, vec!["2".to_string()]);
    }

    #[test]
    fn test_all_rows_filtered() {
        let rows = vec![row("1", "Weak", 0.9, 100.0), row("2", "Strong", -0.1, 10.0)];
        assert_eq!(compute_metrics("b.csv", &rows), Err(SkipReason::NoValidRows));
    }

    #[test]
    fn test_missing_score_never_passes() {
        let mut r = row("1", "Strong", 0.0, 10.0);
        r.drug_score = None;
        assert!(filter_rows(&[r]).is_empty());
    }

    #[test]
    fn test_zero_score_passes() {
        let rows = vec![row("7", "Medium", 0.0, 10.0)];
        assert_eq!(filter_rows(&rows).len(), 1);
    }

    #[test]
    fn test_unrecognized_label_excluded_from_mean_only() {
        let rows = vec![
            row("1", "Medium", 0.4, 10.0),
            row("2", "Unknown", 0.8, 90.0),
        ];

        let m = compute_metrics("c.csv", &rows).unwrap();
        assert_eq!(m.promedio_druggability, Some(2.0));
        assert_eq!(m.max_drugscore, 0.8);
        assert!((m.avg_drugscore - 0.6).abs() < 1e-12);
        assert_eq!(m.index_max_surface.as_deref(), Some("2"));
    }

    #[test]
    fn test_only_unrecognized_labels_have_no_mean() {
        let rows = vec![row("1", "???", 0.4, 10.0)];
        let m = compute_metrics("d.csv", &rows).unwrap();
        assert_eq!(m.promedio_druggability, None);
    }

    #[test]
    fn test_top3_descending_with_stable_ties() {
        let rows = vec![
            row("a", "Medium", 0.5, 1.0),
            row("b", "Strong", 0.9, 1.0),
            row("c", "Medium", 0.5, 1.0),
            row("d", "Weak", 0.99, 1.0),
            row("e", "Medium", 0.1, 1.0),
        ];

        let m = compute_metrics("e.csv", &rows).unwrap();
        assert_eq!(m.top3_indices, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_surface_tie_takes_first_row() {
        let rows = vec![
            row("x", "Medium", 0.5, 300.0),
            row("y", "Strong", 0.6, 300.0),
        ];
        let m = compute_metrics("f.csv", &rows).unwrap();
        assert_eq!(m.index_max_surface.as_deref(), Some("x"));
        assert_eq!(m.max_surface_area, Some(300.0));
    }

    #[test]
    fn test_rows_without_surface_area() {
        let mut a = row("1", "Strong", 0.7, 0.0);
        a.surface_area = None;
        let mut b = row("2", "Medium", 0.3, 0.0);
        b.surface_area = Some(f64::NAN);

        let m = compute_metrics("blank.csv", &[a, b]).unwrap();
        assert_eq!(m.max_surface_area, None);
        assert_eq!(m.index_max_surface, None);
        assert_eq!(
            summary_line(&m),
            "blank.csv: Top 3 indices by DrugScore = [1, 2]; Max surface area = n/a"
        );
    }

    #[test]
    fn test_summary_line() {
        let rows = vec![row("2", "Strong", 3.0, 200.0), row("5", "Medium", 1.0, 20.0)];
        let m = compute_metrics("model.csv", &rows).unwrap();
        assert_eq!(
            summary_line(&m),
            "model.csv: Top 3 indices by DrugScore = [2, 5]; Max surface area = 200.00 (Index 2)"
        );
    }
}
