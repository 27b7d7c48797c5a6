// src/specs/rows.rs
use scraper::ElementRef;

use crate::core::html::{child_elements, same_node, tag, text_of};
use crate::core::sanitize::char_len;
use crate::data::{MatchResult, RowMatch};

/// Column positions resolved from a results table's header row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Columns {
    pub round: Option<usize>,
    pub opponent: usize,
    pub result: usize,
    pub playoff: bool,
}

/// Parse every match row of `table`. `None` when the table lacks an opponent
/// or a result column, i.e. it is not a results table at all.
pub fn parse_table(table: ElementRef<'_>) -> Option<Vec<RowMatch>> {
    let (header, cols) = read_header(table)?;
    let rows = table
        .select(sel!("tr"))
        .filter(|tr| !same_node(*tr, header))
        .filter_map(|tr| parse_row(&cells(tr), &cols))
        .collect();
    Some(rows)
}

fn cells(tr: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    child_elements(tr).filter(|c| matches!(tag(*c), "td" | "th")).collect()
}

/// First row with `th` cells, else the first row.
fn read_header(table: ElementRef<'_>) -> Option<(ElementRef<'_>, Columns)> {
    let header = table
        .select(sel!("tr"))
        .find(|tr| cells(*tr).iter().any(|c| tag(*c) == "th"))
        .or_else(|| table.select(sel!("tr")).next())?;
    let labels: Vec<String> = cells(header).into_iter().map(|c| text_of(c).to_lowercase()).collect();
    classify_columns(&labels).map(|cols| (header, cols))
}

pub fn classify_columns(labels: &[String]) -> Option<Columns> {
    let mut round = None;
    let mut opponent = None;
    let mut result = None;
    for (i, label) in labels.iter().enumerate() {
        if opponent.is_none() && label.contains("opponent") {
            opponent = Some(i);
        } else if result.is_none() && label.contains("result") {
            result = Some(i);
        } else if round.is_none() && re!(r"(?i)\b(?:round|playoffs?|rnd)\b|#").is_match(label) {
            round = Some(i);
        }
    }
    let playoff = labels.iter().any(|l| re!(r"(?i)\b(?:playoffs?|top)\b").is_match(l));
    Some(Columns { round, opponent: opponent?, result: result?, playoff })
}

pub fn parse_row(cells: &[ElementRef<'_>], cols: &Columns) -> Option<RowMatch> {
    let opponent_raw = text_of(*cells.get(cols.opponent)?);
    if is_bye(&opponent_raw) || char_len(&opponent_raw) < 2 {
        return None;
    }
    let result = MatchResult::parse(&text_of(*cells.get(cols.result)?))?;
    let (opponent, opponent_gem_id) = split_opponent(&opponent_raw);

    let round_text = cols
        .round
        .and_then(|i| cells.get(i))
        .map(|c| text_of(*c))
        .unwrap_or_default();
    let (round, round_label) = if cols.playoff {
        let plain = round_text.trim().parse::<u32>().unwrap_or(0);
        (plain, s!(playoff_label(&round_text)))
    } else {
        (first_number(&round_text).unwrap_or(0), s!())
    };

    Some(RowMatch { round, round_label, opponent, opponent_gem_id, result })
}

pub fn is_bye(opponent: &str) -> bool {
    re!(r"(?i)\bbye\b").is_match(opponent)
}

/// "Smith, Jane (1234)" → ("Smith, Jane", "1234"); no id → empty id.
pub fn split_opponent(raw: &str) -> (String, String) {
    match re!(r"^(.*?)\s*\(\s*(\d+)\s*\)\s*$").captures(raw.trim()) {
        Some(c) => (s!(c[1].trim()), s!(&c[2])),
        None => (s!(raw.trim()), s!()),
    }
}

/// Ordered: finals, semifinal, quarterfinal, explicit top 4 / top 8, generic.
pub fn playoff_label(round_text: &str) -> &'static str {
    let lc = round_text.to_lowercase();
    if lc.contains("final") && !lc.contains("semi") && !lc.contains("quarter") {
        "Finals"
    } else if lc.contains("semi") {
        "Top 4"
    } else if lc.contains("quarter") {
        "Top 8"
    } else if re!(r"top\s*4\b").is_match(&lc) {
        "Top 4"
    } else if re!(r"top\s*8\b").is_match(&lc) {
        "Top 8"
    } else {
        "Playoff"
    }
}

fn first_number(text: &str) -> Option<u32> {
    re!(r"\d+").find(text).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn parse(html: &str) -> Option<Vec<RowMatch>> {
        let doc = Html::parse_document(html);
        let table = doc.select(sel!("table")).next().unwrap();
        parse_table(table)
    }

    #[test]
    fn swiss_rows_with_bye_and_junk_result() {
        let rows = parse(
            "<table><thead><tr><th>Round</th><th>Opponent</th><th>Result</th></tr></thead><tbody>\
             <tr><td>1</td><td>Smith, Jane (1234)</td><td>Win</td></tr>\
             <tr><td>2</td><td>Bye</td><td>Loss</td></tr>\
             <tr><td>3</td><td>Doe, John</td><td>D</td></tr>\
             <tr><td>4</td><td>Roe, Rick</td><td>Pending</td></tr>\
             </tbody></table>",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].round, 1);
        assert_eq!(rows[0].opponent, "Smith, Jane");
        assert_eq!(rows[0].opponent_gem_id, "1234");
        assert_eq!(rows[0].result, MatchResult::Win);
        assert_eq!(rows[1].round, 3);
        assert_eq!(rows[1].opponent_gem_id, "");
        assert_eq!(rows[1].result, MatchResult::Draw);
        assert!(rows.iter().all(|r| r.round_label.is_empty()));
    }

    #[test]
    fn tables_without_required_columns_are_skipped() {
        assert!(parse("<table><tr><th>Hero</th><th>Format</th></tr><tr><td>Kano</td><td>CC</td></tr></table>").is_none());
        assert!(parse("<table><tr><th>Opponent</th></tr><tr><td>X</td></tr></table>").is_none());
    }

    #[test]
    fn playoff_tables_get_labels() {
        let rows = parse(
            "<table><tr><th>Playoff Round</th><th>Opponent</th><th>Result</th></tr>\
             <tr><td>Quarterfinal</td><td>A Person</td><td>W</td></tr>\
             <tr><td>Semifinal</td><td>B Person</td><td>W</td></tr>\
             <tr><td>Final</td><td>C Person</td><td>L</td></tr></table>",
        )
        .unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.round_label.as_str()).collect();
        assert_eq!(labels, vec!["Top 8", "Top 4", "Finals"]);
        assert!(rows.iter().all(|r| r.round == 0));
    }

    #[test]
    fn label_ordering() {
        assert_eq!(playoff_label("Semi-Finals"), "Top 4");
        assert_eq!(playoff_label("Quarter Finals"), "Top 8");
        assert_eq!(playoff_label("Grand Final"), "Finals");
        assert_eq!(playoff_label("Top 8"), "Top 8");
        assert_eq!(playoff_label("Top 4"), "Top 4");
        assert_eq!(playoff_label("Elimination"), "Playoff");
    }

    #[test]
    fn opponent_split() {
        assert_eq!(split_opponent(" Doe, John ( 77 ) "), (s!("Doe, John"), s!("77")));
        assert_eq!(split_opponent("Doe, John (guest)"), (s!("Doe, John (guest)"), s!()));
    }
}
