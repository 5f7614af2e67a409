use crate::cavity::types::{FileMetrics, Leader, Leaderboard};
use crate::output::metrics_table;
use crate::utility::first_argmax;

pub const NO_VALID_DATA: &str = "No valid data found in any file.";

fn leader_by<F>(files: &[FileMetrics], value: F) -> Option<Leader>
where
    F: Fn(&FileMetrics) -> Option<f64>,
{
    let i = first_argmax(files.iter().map(&value))?;
    Some(Leader {
        file: files[i].file.clone(),
        value: value(&files[i])?,
    })
}

/// Picks the first file maximizing each metric. Returns `None` for an empty
/// folder. Files without a druggability mean or a surface area are skipped
/// for that metric.
pub fn build_leaderboard(files: &[FileMetrics]) -> Option<Leaderboard> {
    let surface_idx = first_argmax(files.iter().map(|m| m.max_surface_area));

    Some(Leaderboard {
        promedio_druggability: leader_by(files, |m| m.promedio_druggability),
        conteo_strong: leader_by(files, |m| Some(m.conteo_strong as f64))?,
        max_drugscore: leader_by(files, |m| Some(m.max_drugscore))?,
        avg_drugscore: leader_by(files, |m| Some(m.avg_drugscore))?,
        max_surface_area: leader_by(files, |m| m.max_surface_area),
        index_max_surface: surface_idx.and_then(|i| files[i].index_max_surface.clone()),
    })
}

/// Renders the closing section of a folder report: the per-file table and
/// one line per metric leader, or [`NO_VALID_DATA`] alone.
pub fn render_section(files: &[FileMetrics]) -> String {
    let Some(board) = build_leaderboard(files) else {
        return format!("{NO_VALID_DATA}\n");
    };

    let mut out = String::new();
    out.push_str("\nSummary per file:\n");
    out.push_str(&metrics_table(files));
    out.push_str("\n\n");

    match &board.promedio_druggability {
        Some(l) => out.push_str(&format!(
            "Best druggability mean:  {} ({:.2})\n",
            l.file, l.value
        )),
        None => out.push_str("Best druggability mean:  n/a\n"),
    }
    out.push_str(&format!(
        "Most Strong pockets:     {} ({:.0})\n",
        board.conteo_strong.file, board.conteo_strong.value
    ));
    out.push_str(&format!(
        "Max DrugScore:           {} ({})\n",
        board.max_drugscore.file, board.max_drugscore.value
    ));
    out.push_str(&format!(
        "Mean DrugScore:          {} ({:.2})\n",
        board.avg_drugscore.file, board.avg_drugscore.value
    ));
    match (&board.max_surface_area, &board.index_max_surface) {
        (Some(l), Some(idx)) => out.push_str(&format!(
            "Max surface area:        {} ({:.2}, Index {})\n",
            l.file, l.value, idx
        )),
        _ => out.push_str("Max surface area:        n/a\n"),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(
        file: &str,
        prom: Option<f64>,
        strong: usize,
        max: f64,
        avg: f64,
        surf: Option<f64>,
    ) -> FileMetrics {
        FileMetrics {
            file: file.to_string(),
            promedio_druggability: prom,
            conteo_strong: strong,
            max_drugscore: max,
            avg_drugscore: avg,
            max_surface_area: surf,
            index_max_surface: surf.map(|_| format!("{file}-idx")),
            top3_indices: vec![],
        }
    }

    #[test]
    fn test_empty_folder_has_no_leaderboard() {
        assert!(build_leaderboard(&[]).is_none());
        assert_eq!(render_section(&[]), "No valid data found in any file.\n");
    }

    #[test]
    fn test_each_metric_picks_its_own_winner() {
        let files = vec![
            metrics("a", Some(2.5), 1, 0.9, 0.4, Some(100.0)),
            metrics("b", Some(2.0), 4, 0.7, 0.6, Some(300.0)),
        ];

        let board = build_leaderboard(&files).unwrap();
        assert_eq!(board.promedio_druggability.unwrap().file, "a");
        assert_eq!(board.conteo_strong.file, "b");
        assert_eq!(board.max_drugscore.file, "a");
        assert_eq!(board.avg_drugscore.file, "b");
        assert_eq!(board.max_surface_area.unwrap().file, "b");
        assert_eq!(board.index_max_surface.as_deref(), Some("b-idx"));
    }

    #[test]
    fn test_ties_go_to_first_file() {
        let files = vec![
            metrics("first", Some(3.0), 2, 0.5, 0.5, Some(50.0)),
            metrics("second", Some(3.0), 2, 0.5, 0.5, Some(50.0)),
        ];

        let board = build_leaderboard(&files).unwrap();
        assert_eq!(board.promedio_druggability.unwrap().file, "first");
        assert_eq!(board.conteo_strong.file, "first");
        assert_eq!(board.max_surface_area.unwrap().file, "first");
    }

    #[test]
    fn test_missing_mean_is_skipped_for_that_metric() {
        let files = vec![
            metrics("none", None, 0, 0.5, 0.5, Some(50.0)),
            metrics("some", Some(2.0), 0, 0.1, 0.1, Some(10.0)),
        ];

        let board = build_leaderboard(&files).unwrap();
        assert_eq!(board.promedio_druggability.unwrap().file, "some");
        assert_eq!(board.max_drugscore.file, "none");
    }

    #[test]
    fn test_file_without_surface_never_wins_surface() {
        let files = vec![
            metrics("good.csv", Some(2.0), 1, 0.5, 0.5, Some(500.0)),
            metrics("blank.csv", Some(2.0), 0, 0.4, 0.4, None),
        ];

        let board = build_leaderboard(&files).unwrap();
        assert_eq!(board.max_surface_area.unwrap().file, "good.csv");
        assert_eq!(board.index_max_surface.as_deref(), Some("good.csv-idx"));

        let section = render_section(&files);
        assert!(section.contains("Max surface area:        good.csv (500.00, Index good.csv-idx)"));
        assert!(!section.contains("NaN"));
    }

    #[test]
    fn test_no_surface_anywhere_reads_na() {
        let files = vec![metrics("blank.csv", None, 0, 0.4, 0.4, None)];

        let board = build_leaderboard(&files).unwrap();
        assert!(board.max_surface_area.is_none());
        assert!(render_section(&files).contains("Max surface area:        n/a\n"));
    }

    #[test]
    fn test_section_lists_five_leaders() {
        let files = vec![metrics("m.csv", Some(3.0), 1, 3.0, 3.0, Some(200.0))];
        let section = render_section(&files);

        assert!(section.contains("Summary per file:"));
        assert!(section.contains("Best druggability mean:  m.csv (3.00)"));
        assert!(section.contains("Most Strong pockets:     m.csv (1)"));
        assert!(section.contains("Max DrugScore:           m.csv (3)"));
        assert!(section.contains("Mean DrugScore:          m.csv (3.00)"));
        assert!(section.contains("Max surface area:        m.csv (200.00, Index m.csv-idx)"));
    }
}
