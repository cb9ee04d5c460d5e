//! `coach rounds`: the interview rounds and the guidance the interviewer follows.

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use coach_core::interview::prompt::round_guidance;
use coach_types::interview::InterviewRound;

#[derive(Debug, Serialize)]
struct RoundInfo {
    slug: &'static str,
    name: String,
    guidance: &'static str,
}

fn round_infos() -> Vec<RoundInfo> {
    InterviewRound::ALL
        .iter()
        .map(|round| RoundInfo {
            slug: round.slug(),
            name: round.to_string(),
            guidance: round_guidance(*round),
        })
        .collect()
}

pub fn list_rounds(json: bool) -> anyhow::Result<()> {
    let rounds = round_infos();

    if json {
        println!("{}", serde_json::to_string_pretty(&rounds)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Round").fg(Color::White),
        Cell::new("Flag").fg(Color::White),
        Cell::new("Interviewer focus").fg(Color::White),
    ]);

    for info in &rounds {
        table.add_row(vec![
            Cell::new(&info.name).fg(Color::Cyan),
            Cell::new(info.slug),
            Cell::new(info.guidance),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {}",
        console::style("Start one with: coach start --round <flag>").dim()
    );
    println!();
    Ok(())
}
