// benches/scan_page.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use chrono::NaiveDate;
use gem_scrape::specs::page::scan_page;

/// A history page with `events` blocks: heading, metadata lines, a results
/// table, and a decklist on every third event.
fn synthetic_page(events: usize) -> String {
    let mut html = String::from("<html><body><main><h2>Match History</h2>");
    for e in 0..events {
        html.push_str(&format!(
            "<div class=\"event\"><p>March {}, 2024</p><h4>Card Dojo - Armory Blitz #{e}</h4>\
             <p>Blitz</p><p>Rated</p><p>Dragonfly Games</p>\
             <table><thead><tr><th>Round</th><th>Opponent</th><th>Result</th></tr></thead><tbody>",
            e % 28 + 1
        ));
        for r in 1..=4 {
            html.push_str(&format!(
                "<tr><td>{r}</td><td>Player{e}x{r}, Some ({})</td><td>{}</td></tr>",
                1000 + e * 10 + r,
                ["W", "L", "D", "Bye"][r % 4]
            ));
        }
        html.push_str("</tbody></table>");
        if e % 3 == 0 {
            html.push_str("<h5>Decklists</h5><table><tr><th>Hero</th></tr><tr><td><a href=\"#\">Fai</a></td></tr></table>");
        }
        html.push_str("</div>");
    }
    html.push_str("</main></body></html>");
    html
}

fn bench_scan(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let small = synthetic_page(5);
    let large = synthetic_page(60);

    c.bench_function("scan_page_5_events", |b| {
        b.iter(|| {
            let recs = scan_page(black_box(&small), today);
            black_box(recs.len())
        })
    });

    c.bench_function("scan_page_60_events", |b| {
        b.iter(|| {
            let recs = scan_page(black_box(&large), today);
            black_box(recs.len())
        })
    });
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
