use crate::quality::types::{ScoreFilter, ScoreRow, Software, SoftwareStats};
use crate::utility::{mean, sample_stddev};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Applies `filter` to `rows` without touching them.
///
/// With `all_models` unset, survivors are ranked (Favored desc, Outliers asc,
/// Z-Score asc, missing values last), at most `models_per_software` rows are
/// kept per software, and the ranking is capped at `top_n`. Rows with no
/// software tag cannot be grouped and are dropped in that mode.
pub fn filter_scores<'a>(rows: &'a [ScoreRow], filter: &ScoreFilter) -> Vec<&'a ScoreRow> {
    let mut kept: Vec<&ScoreRow> = rows
        .iter()
        .filter(|r| {
            !(filter.relaxed && !filter.relaxation_levels.is_empty())
                || filter.relaxation_levels.contains(&r.relaxation)
        })
        .filter(|r| within(&filter.structures, r.structure))
        .filter(|r| within(&filter.software, r.software))
        .filter(|r| within(&filter.proteins, r.protein))
        .filter(|r| {
            filter.models.is_empty()
                || r.model_base
                    .as_ref()
                    .is_some_and(|m| filter.models.contains(m))
        })
        .collect();

    if filter.all_models {
        return kept;
    }

    kept.sort_by(|a, b| rank(a, b));

    let mut per_software: BTreeMap<Software, usize> = BTreeMap::new();
    kept.into_iter()
        .filter(|r| {
            let Some(software) = r.software else {
                return false;
            };
            let seen = per_software.entry(software).or_default();
            *seen += 1;
            *seen <= filter.models_per_software
        })
        .take(filter.top_n)
        .collect()
}

fn within<T: PartialEq>(allowed: &[T], value: Option<T>) -> bool {
    allowed.is_empty() || value.is_some_and(|v| allowed.contains(&v))
}

/// Orders rows best-first.
fn rank(a: &ScoreRow, b: &ScoreRow) -> Ordering {
    cmp_missing_last(a.favored, b.favored, true)
        .then_with(|| cmp_missing_last(a.outliers, b.outliers, false))
        .then_with(|| cmp_missing_last(a.z_score, b.z_score, false))
}

fn cmp_missing_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Mean and sample standard deviation of Favored per software, sorted by
/// software code. Missing Favored values are ignored.
pub fn software_statistics(rows: &[&ScoreRow]) -> Vec<SoftwareStats> {
    let mut groups: BTreeMap<Software, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let Some(software) = row.software {
            let values = groups.entry(software).or_default();
            if let Some(v) = row.favored {
                values.push(v);
            }
        }
    }

    groups
        .into_iter()
        .map(|(software, values)| {
            let avg = if values.is_empty() {
                None
            } else {
                Some(mean(&values))
            };
            SoftwareStats {
                software,
                count: values.len(),
                mean: avg,
                std: avg.and_then(|m| sample_stddev(&values, m)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::loader::FileNameParser;
    use crate::quality::types::{Protein, Structure};

    fn row(name: &str, favored: f64, outliers: f64, z: f64) -> ScoreRow {
        let tags = FileNameParser::new().unwrap().parse(name);
        ScoreRow {
            file_name: name.to_string(),
            structure: tags.structure,
            software: tags.software,
            protein: tags.protein,
            model_base: tags.model_base,
            relaxation: tags.relaxation,
            favored: Some(favored),
            outliers: Some(outliers),
            z_score: Some(z),
            extra: BTreeMap::new(),
        }
    }

    fn names(rows: &[&ScoreRow]) -> Vec<String> {
        rows.iter().map(|r| r.file_name.clone()).collect()
    }

    fn sample() -> Vec<ScoreRow> {
        vec![
            row("MON-AF-NCChumano-01", 97.0, 0.2, 1.0),
            row("MON-AF-NCChumano-02", 99.0, 0.0, 0.5),
            row("MON-AF-NCChumano-02-Relaxed1", 99.0, 0.0, -0.5),
            row("DIM-RF-NCCAnguila-01", 98.5, 0.1, 0.3),
            row("DIM-SM-NCCAnguila-03-Relaxed2", 95.0, 0.4, 1.5),
            row("MON-MD-NCChumano-04", 96.0, 0.3, 0.1),
        ]
    }

    #[test]
    fn test_all_models_keeps_input_order() {
        let rows = sample();
        let filter = ScoreFilter {
            all_models: true,
            ..Default::default()
        };

        let out = filter_scores(&rows, &filter);
        assert_eq!(out.len(), rows.len());
        assert_eq!(out[0].file_name, "MON-AF-NCChumano-01");
    }

    #[test]
    fn test_ranking_breaks_ties_on_outliers_then_z() {
        let rows = sample();
        let out = filter_scores(&rows, &ScoreFilter::default());

        assert_eq!(
            names(&out)[..3],
            [
                "MON-AF-NCChumano-02-Relaxed1",
                "MON-AF-NCChumano-02",
                "DIM-RF-NCCAnguila-01"
            ]
        );
    }

    #[test]
    fn test_models_per_software_limit() {
        let rows = sample();
        let filter = ScoreFilter {
            models_per_software: 1,
            ..Default::default()
        };

        let out = filter_scores(&rows, &filter);
        let af = out.iter().filter(|r| r.software == Some(Software::Af)).count();
        assert_eq!(af, 1);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_top_n_caps_ranking() {
        let rows = sample();
        let filter = ScoreFilter {
            top_n: 2,
            ..Default::default()
        };
        assert_eq!(filter_scores(&rows, &filter).len(), 2);
    }

    #[test]
    fn test_dimension_filters() {
        let rows = sample();
        let filter = ScoreFilter {
            structures: vec![Structure::Dim],
            proteins: vec![Protein::NccAnguila],
            software: vec![Software::Sm],
            all_models: true,
            ..Default::default()
        };

        assert_eq!(
            names(&filter_scores(&rows, &filter)),
            vec!["DIM-SM-NCCAnguila-03-Relaxed2"]
        );
    }

    #[test]
    fn test_models_filter() {
        let rows = sample();
        let filter = ScoreFilter {
            models: vec!["02".to_string()],
            all_models: true,
            ..Default::default()
        };
        assert_eq!(filter_scores(&rows, &filter).len(), 2);
    }

    #[test]
    fn test_relaxation_levels_need_flag() {
        let rows = sample();
        let mut filter = ScoreFilter {
            relaxation_levels: vec!["Base".to_string()],
            all_models: true,
            ..Default::default()
        };
        assert_eq!(filter_scores(&rows, &filter).len(), 6);

        filter.relaxed = true;
        assert_eq!(filter_scores(&rows, &filter).len(), 4);
    }

    #[test]
    fn test_relaxed_without_levels_is_no_constraint() {
        let rows = sample();
        let filter = ScoreFilter {
            relaxed: true,
            all_models: true,
            ..Default::default()
        };
        assert_eq!(filter_scores(&rows, &filter).len(), 6);
    }

    #[test]
    fn test_untagged_rows_dropped_when_grouping() {
        let rows = vec![row("model-x", 99.9, 0.0, 0.0), row("MON-AF-NCChumano-01", 90.0, 1.0, 1.0)];

        let grouped = filter_scores(&rows, &ScoreFilter::default());
        assert_eq!(names(&grouped), vec!["MON-AF-NCChumano-01"]);
    }

    #[test]
    fn test_missing_favored_sorts_last() {
        let mut rows = sample();
        rows[1].favored = None;

        let out = filter_scores(&rows, &ScoreFilter::default());
        assert_eq!(out.last().unwrap().file_name, "MON-AF-NCChumano-02");
    }

    #[test]
    fn test_software_statistics() {
        let rows = sample();
        let refs: Vec<&ScoreRow> = rows.iter().collect();
        let stats = software_statistics(&refs);

        let software: Vec<Software> = stats.iter().map(|s| s.software).collect();
        assert_eq!(software, vec![Software::Af, Software::Md, Software::Rf, Software::Sm]);

        let af = &stats[0];
        assert_eq!(af.count, 3);
        assert!((af.mean.unwrap() - 295.0 / 3.0).abs() < 1e-9);
        assert!(af.std.unwrap() > 0.0);
        assert_eq!(stats[1].std, None);
    }
}
