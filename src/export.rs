use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::metrics::TeamMetrics;
use crate::open_data::MatchRecord;
use crate::state::Comparison;
use crate::tally::VenueTally;

pub struct ExportReport {
    pub sheets: usize,
    pub match_rows: usize,
}

/// Write the current matchup to an xlsx workbook: a Matchup sheet with the
/// prediction, a Form sheet with both teams' venue splits and rates, and a
/// Matches sheet listing every record either team appeared in.
pub fn export_comparison(
    path: &Path,
    season_label: &str,
    cmp: &Comparison,
    matches: &[MatchRecord],
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();

    let matchup_rows = matchup_rows(season_label, cmp);
    let form_rows = form_rows(cmp);
    let match_rows = match_rows(cmp, matches);
    let match_row_count = match_rows.len().saturating_sub(1);

    write_sheet(workbook.add_worksheet(), "Matchup", &matchup_rows)?;
    write_sheet(workbook.add_worksheet(), "Form", &form_rows)?;
    write_sheet(workbook.add_worksheet(), "Matches", &match_rows)?;

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        sheets: 3,
        match_rows: match_row_count,
    })
}

fn matchup_rows(season_label: &str, cmp: &Comparison) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec!["Season".to_string(), season_label.to_string()],
        vec!["Team 1".to_string(), cmp.team1.clone()],
        vec!["Team 2".to_string(), cmp.team2.clone()],
        vec![
            "Team 1 matches".to_string(),
            cmp.metrics1.matches_played.to_string(),
        ],
        vec![
            "Team 2 matches".to_string(),
            cmp.metrics2.matches_played.to_string(),
        ],
    ];
    match &cmp.outcome {
        Some(p) => {
            rows.push(vec![
                format!("P({} win)", cmp.team1),
                format!("{:.2}%", p.p_team1),
            ]);
            rows.push(vec!["P(draw)".to_string(), format!("{:.2}%", p.p_draw)]);
            rows.push(vec![
                format!("P({} win)", cmp.team2),
                format!("{:.2}%", p.p_team2),
            ]);
        }
        None => rows.push(vec![
            "Prediction".to_string(),
            "insufficient data".to_string(),
        ]),
    }
    rows
}

fn form_rows(cmp: &Comparison) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Team".to_string(),
        "Venue".to_string(),
        "W".to_string(),
        "D".to_string(),
        "L".to_string(),
        "GF".to_string(),
        "GA".to_string(),
        "Win%".to_string(),
        "Draw%".to_string(),
        "Loss%".to_string(),
        "Avg GF".to_string(),
        "Avg GA".to_string(),
    ]];

    for (team, split, metrics) in [
        (&cmp.team1, &cmp.split1, &cmp.metrics1),
        (&cmp.team2, &cmp.split2, &cmp.metrics2),
    ] {
        rows.push(venue_row(team, "Home", &split.home, None));
        rows.push(venue_row(team, "Away", &split.away, None));
        rows.push(venue_row(
            team,
            "Overall",
            &VenueTally {
                wins: split.home.wins + split.away.wins,
                draws: split.home.draws + split.away.draws,
                losses: split.home.losses + split.away.losses,
                goals_for: split.home.goals_for + split.away.goals_for,
                goals_against: split.home.goals_against + split.away.goals_against,
            },
            Some(metrics),
        ));
    }
    rows
}

fn venue_row(
    team: &str,
    venue: &str,
    tally: &VenueTally,
    metrics: Option<&TeamMetrics>,
) -> Vec<String> {
    let mut row = vec![
        team.to_string(),
        venue.to_string(),
        tally.wins.to_string(),
        tally.draws.to_string(),
        tally.losses.to_string(),
        tally.goals_for.to_string(),
        tally.goals_against.to_string(),
    ];
    match metrics {
        Some(m) => row.extend([
            format!("{:.2}", m.win_rate),
            format!("{:.2}", m.draw_rate),
            format!("{:.2}", m.loss_rate),
            format!("{:.2}", m.avg_goals_for),
            format!("{:.2}", m.avg_goals_against),
        ]),
        None => row.extend(std::iter::repeat_n(String::new(), 5)),
    }
    row
}

fn match_rows(cmp: &Comparison, matches: &[MatchRecord]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Date".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "Score".to_string(),
    ]];
    for m in matches {
        let involved = m.home_team == cmp.team1
            || m.away_team == cmp.team1
            || m.home_team == cmp.team2
            || m.away_team == cmp.team2;
        if !involved {
            continue;
        }
        rows.push(vec![
            m.match_date.clone(),
            m.home_team.clone(),
            m.away_team.clone(),
            format!("{}-{}", m.home_score, m.away_score),
        ]);
    }
    rows
}

fn write_sheet(worksheet: &mut Worksheet, name: &str, rows: &[Vec<String>]) -> Result<()> {
    worksheet.set_name(name).context("set worksheet name")?;
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            worksheet
                .write_string(r as u32, c as u16, cell)
                .with_context(|| format!("write cell {r}:{c} in {name}"))?;
        }
    }
    Ok(())
}
